use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Find the candidate closest to `input`, if any is similar enough.
///
/// Ties keep the earliest candidate so suggestions are stable.
pub fn closest_match<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = input.to_lowercase();
    let mut best: Option<(&str, f64)> = None;

    for candidate in candidates {
        let score = jaro_winkler(&needle, &candidate.to_lowercase());
        if score <= SUGGESTION_THRESHOLD {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_match_finds_typo() {
        let keys = ["toor_dal", "moong_dal", "rice"];
        assert_eq!(
            closest_match("toor_dall", keys.iter().copied()),
            Some("toor_dal".to_string())
        );
    }

    #[test]
    fn test_closest_match_none_for_unrelated() {
        let keys = ["rice", "wheat_flour"];
        assert_eq!(closest_match("zzzzzz", keys.iter().copied()), None);
    }
}
