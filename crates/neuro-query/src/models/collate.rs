//! English-style string collation.
//!
//! Strings are compared on base letters ignoring case and accents first, then
//! on accents, then on case with lowercase ordered before uppercase. Identical
//! keys at every level fall back to code point order so the result is a total
//! order.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two strings the way an English locale orders them.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    primary(a)
        .cmp(primary(b))
        .then_with(|| secondary(a).cmp(secondary(b)))
        .then_with(|| tertiary(a).cmp(tertiary(b)))
        .then_with(|| a.cmp(b))
}

fn primary(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase)
}

fn secondary(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn tertiary(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).map(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_is_secondary_to_letters() {
        assert_eq!(compare("apple", "Banana"), Ordering::Less);
        assert_eq!(compare("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn test_lowercase_before_uppercase() {
        assert_eq!(compare("a", "A"), Ordering::Less);
        assert_eq!(compare("cortex", "Cortex"), Ordering::Less);
    }

    #[test]
    fn test_accents_sort_next_to_base_letter() {
        assert_eq!(compare("resume", "résumé"), Ordering::Less);
        assert_eq!(compare("résumé", "rope"), Ordering::Less);
        assert_eq!(compare("résumé", "rez"), Ordering::Less);
    }

    #[test]
    fn test_empty_sorts_first() {
        assert_eq!(compare("", "a"), Ordering::Less);
        assert_eq!(compare("", ""), Ordering::Equal);
    }
}
