//! Guess normalization and the scoring table.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::round::Country;

/// Points lost when a round fails after the player chose to continue past the summary.
pub const CONTINUED_FAILURE_PENALTY: i32 = 1;

/// Points awarded for a correct guess on the given 1-based attempt.
///
/// 1 → 3, 2 → 2, 3 → 1, anything later → 0.
pub fn points_for_attempt(attempt: u32) -> i32 {
    match attempt {
        1 => 3,
        2 => 2,
        3 => 1,
        _ => 0,
    }
}

/// Normalizes free-form input for comparison.
///
/// Lowercases, strips diacritics, drops apostrophes and turns every other
/// non-alphanumeric run into a single space.
pub fn normalize_guess(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.nfd().filter(|c| !is_combining_mark(*c)) {
        if c == '\'' || c == '’' {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

/// Returns true when `guess` names `country` by name or by code.
pub fn matches_country(guess: &str, country: &Country) -> bool {
    let guess = normalize_guess(guess);
    if guess.is_empty() {
        return false;
    }
    guess == normalize_guess(&country.name) || guess == normalize_guess(&country.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(points_for_attempt(1), 3);
        assert_eq!(points_for_attempt(2), 2);
        assert_eq!(points_for_attempt(3), 1);
        assert_eq!(points_for_attempt(4), 0);
        assert_eq!(points_for_attempt(0), 0);
    }

    #[test]
    fn test_normalize_strips_case_and_diacritics() {
        assert_eq!(normalize_guess("  CÔTE d'Ivoire "), "cote divoire");
        assert_eq!(normalize_guess("São-Tomé"), "sao tome");
        assert_eq!(normalize_guess("!!!"), "");
    }

    #[test]
    fn test_matches_name_or_code() {
        let country = Country::new("Türkiye", "TR");
        assert!(matches_country("turkiye", &country));
        assert!(matches_country("tr", &country));
        assert!(!matches_country("turkey", &country));
        assert!(!matches_country("   ", &country));
    }
}
