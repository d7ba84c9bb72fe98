// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tracks which kind of callable body the walk is currently inside.

/// The innermost enclosing callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FunctionContext {
    /// Top-level code.
    #[default]
    None,
    Function,
    Method,
}

impl FunctionContext {
    pub fn allows_return(self) -> bool {
        self != FunctionContext::None
    }
}

#[derive(Debug, Default)]
pub struct FunctionContextTracker {
    current: FunctionContext,
}

impl FunctionContextTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to `kind`, handing back the context to restore afterwards.
    #[must_use = "the previous context has to be restored"]
    pub fn enter(&mut self, kind: FunctionContext) -> FunctionContext {
        std::mem::replace(&mut self.current, kind)
    }

    pub fn restore(&mut self, previous: FunctionContext) {
        self.current = previous;
    }

    pub fn current(&self) -> FunctionContext {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_top_level() {
        let tracker = FunctionContextTracker::new();
        assert_eq!(tracker.current(), FunctionContext::None);
        assert!(!tracker.current().allows_return());
    }

    #[test]
    fn nested_enter_restores_in_order() {
        let mut tracker = FunctionContextTracker::new();
        let outer = tracker.enter(FunctionContext::Method);
        let inner = tracker.enter(FunctionContext::Function);
        assert_eq!(tracker.current(), FunctionContext::Function);

        tracker.restore(inner);
        assert_eq!(tracker.current(), FunctionContext::Method);
        assert!(tracker.current().allows_return());

        tracker.restore(outer);
        assert_eq!(tracker.current(), FunctionContext::None);
    }
}
