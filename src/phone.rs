//! E.164 phone number normalization.
//!
//! Voice tickets carry the caller number in whatever shape the telephony
//! integration produced: `(303) 587-2087`, `303-587-2087`, `13035872087`,
//! `+13035872087`, and so on. The reconciler needs a single canonical form to
//! search users by, so everything is normalized to E.164 (`+` followed by
//! country code and digits) before any lookup or write-back.
//!
//! Normalization is a pure function with no I/O and no failure modes beyond
//! returning `None` for empty input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A phone number in E.164 form.
///
/// Derived by [`normalize`], never persisted independently; only written back
/// onto ticket and user records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(pub String);

impl PhoneNumber {
    /// Returns the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes a raw phone string to E.164 form.
///
/// Rules, applied in order:
///
/// 1. Empty input yields `None`.
/// 2. Strip all non-digit characters.
/// 3. 11 digits starting with `1` (NANP with country code) become `+digits`.
/// 4. 10 digits (NANP without country code) become `+1digits`.
/// 5. Otherwise, if the original input already starts with `+`, it is
///    returned unchanged (not the stripped form).
/// 6. Otherwise the stripped digits are prefixed with `+` regardless of
///    length. This fallback can produce a malformed number for inputs that
///    are neither 10/11 digits nor already `+`-prefixed; it is deliberately
///    not "fixed" further.
///
/// Idempotent on already-normalized E.164 strings.
pub fn normalize(raw: &str) -> Option<PhoneNumber> {
    if raw.is_empty() {
        return None;
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.len() == 11 && digits.starts_with('1') {
        return Some(PhoneNumber(format!("+{digits}")));
    }

    if digits.len() == 10 {
        return Some(PhoneNumber(format!("+1{digits}")));
    }

    if raw.starts_with('+') {
        return Some(PhoneNumber(raw.to_string()));
    }

    Some(PhoneNumber(format!("+{digits}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(raw: &str) -> String {
        normalize(raw).unwrap().0
    }

    #[test]
    fn ten_digit_number_gets_country_code() {
        assert_eq!(normalized("3035872087"), "+13035872087");
    }

    #[test]
    fn eleven_digit_number_gets_plus() {
        assert_eq!(normalized("13035872087"), "+13035872087");
    }

    #[test]
    fn already_normalized_is_unchanged() {
        assert_eq!(normalized("+13035872087"), "+13035872087");
    }

    #[test]
    fn empty_input_is_none() {
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(normalized("(303) 587-2087"), "+13035872087");
        assert_eq!(normalized("303.587.2087"), "+13035872087");
        assert_eq!(normalized("1-303-587-2087"), "+13035872087");
    }

    #[test]
    fn plus_prefixed_international_passes_through() {
        // 12 digits, not NANP: kept exactly as given, formatting included.
        assert_eq!(normalized("+44 20 7946 0958"), "+44 20 7946 0958");
    }

    #[test]
    fn odd_length_input_gets_fallback_prefix() {
        // Documented edge case: the fallback may produce a malformed number.
        assert_eq!(normalized("12345"), "+12345");
    }

    #[test]
    fn non_digit_input_without_plus_becomes_bare_plus() {
        assert_eq!(normalized("ext. none"), "+");
    }

    #[test]
    fn idempotent_on_normalized_output() {
        for raw in ["3035872087", "13035872087", "+13035872087", "(303) 587-2087"] {
            let once = normalized(raw);
            assert_eq!(normalized(&once), once, "not idempotent for {raw:?}");
        }
    }
}
