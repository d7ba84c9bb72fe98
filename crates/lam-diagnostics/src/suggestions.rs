// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Did-you-mean suggestions for mistyped commands and codes.

/// Compute edit distance (Levenshtein) between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, a_ch) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// The candidate closest to `name`, if any is close enough to be a typo.
pub fn closest<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let max_distance = match name.len() {
        0..=2 => 1,
        3..=5 => 2,
        _ => 3,
    };

    candidates
        .into_iter()
        .filter(|candidate| name.len().abs_diff(candidate.len()) <= max_distance)
        .map(|candidate| (candidate, edit_distance(&name.to_ascii_lowercase(), &candidate.to_ascii_lowercase())))
        .filter(|&(_, dist)| dist <= max_distance)
        .min_by_key(|&(_, dist)| dist)
        .map(|(candidate, _)| candidate)
}

/// Returns `Some("did you mean `closest`?")` if a close match is found.
pub fn did_you_mean<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    closest(name, candidates).map(|c| format!("did you mean `{}`?", c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_did_you_mean() {
        let commands = ["lex", "parse", "resolve", "check", "explain"];

        assert_eq!(did_you_mean("resolv", commands), Some("did you mean `resolve`?".to_string()));
        assert_eq!(did_you_mean("chekc", commands), Some("did you mean `check`?".to_string()));
        assert_eq!(did_you_mean("compile", commands), None);
    }

    #[test]
    fn codes_match_case_insensitively() {
        assert_eq!(closest("e0201", ["E0201", "E0300"]), Some("E0201"));
        assert_eq!(closest("E0210", ["E0201", "E0204"]), Some("E0201"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "hello"), 5);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("abc", "abd"), 1);
    }
}
