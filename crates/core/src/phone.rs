//! Normalization and validation for RU mobile phone numbers.
//!
//! Checkout accepts free-text phone input, so normalization is deliberately
//! lenient: `7`-prefixed, `8`-prefixed, and bare 10-digit mobile numbers all
//! canonicalize to the same 11-digit form starting with `7`. Input that does
//! not fit any known shape passes through unchanged and fails [`is_valid`]
//! downstream instead of raising an error here - every function in this
//! module is total.

use core::fmt;

use serde::Serialize;

/// Canonical phone length: `7` plus a 10-digit subscriber number.
const CANONICAL_LEN: usize = 11;

/// Strip every non-digit character from the input.
///
/// ```
/// use nexus_gear_core::phone::digits_only;
///
/// assert_eq!(digits_only("+7 (999) 123-45-67"), "79991234567");
/// assert_eq!(digits_only("abc"), "");
/// ```
#[must_use]
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize free-text input toward the canonical 11-digit `7…` form.
///
/// Accepted shapes:
/// - 11 digits starting `7` or `8`: leading digit becomes `7`
/// - 10 digits starting `9`: `7` is prepended
/// - more than 11 digits: truncated to the first 11, then an `8` prefix
///   becomes `7` (trailing digits are discarded before the prefix check;
///   this matches the checkout form's long-standing behavior)
///
/// Anything else is returned as its bare digit run, which [`is_valid`]
/// rejects.
///
/// ```
/// use nexus_gear_core::phone::normalize;
///
/// assert_eq!(normalize("8 (999) 123-45-67"), "79991234567");
/// assert_eq!(normalize("9991234567"), "79991234567");
/// assert_eq!(normalize("12345"), "12345");
/// ```
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut digits = digits_only(input);
    if digits.is_empty() {
        return digits;
    }
    if digits.len() == CANONICAL_LEN && (digits.starts_with('7') || digits.starts_with('8')) {
        digits.replace_range(0..1, "7");
    } else if digits.len() == 10 && digits.starts_with('9') {
        digits.insert(0, '7');
    } else if digits.len() > CANONICAL_LEN {
        digits.truncate(CANONICAL_LEN);
        if digits.starts_with('8') {
            digits.replace_range(0..1, "7");
        }
    }
    digits
}

/// Format input as `+7 (DDD) DDD-DD-DD` for live-typing feedback.
///
/// Partial input yields a partial mask: missing digits and their
/// placeholders are dropped, the surrounding punctuation stays. Empty
/// input yields an empty string.
#[must_use]
pub fn mask(input: &str) -> String {
    let normalized = normalize(input);
    if normalized.is_empty() {
        return normalized;
    }
    let mut slots = ['_'; CANONICAL_LEN];
    for (slot, digit) in slots.iter_mut().zip(normalized.chars()) {
        *slot = digit;
    }
    let masked = format!(
        "+7 ({}{}{}) {}{}{}-{}{}-{}{}",
        slots[1],
        slots[2],
        slots[3],
        slots[4],
        slots[5],
        slots[6],
        slots[7],
        slots[8],
        slots[9],
        slots[10],
    );
    masked.chars().filter(|&c| c != '_').collect()
}

/// Whether the input normalizes to a complete canonical number.
#[must_use]
pub fn is_valid(input: &str) -> bool {
    let normalized = normalize(input);
    normalized.len() == CANONICAL_LEN && normalized.starts_with('7')
}

/// A phone number in canonical form: exactly 11 digits, first digit `7`.
///
/// Scoped to the checkout flow; never persisted as part of cart state.
///
/// ```
/// use nexus_gear_core::phone::CanonicalPhone;
///
/// let phone = CanonicalPhone::parse("+7 (999) 123-45-67").expect("valid");
/// assert_eq!(phone.as_str(), "79991234567");
/// assert!(CanonicalPhone::parse("7999123456").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    /// Parse free-text input into a canonical phone.
    ///
    /// Returns `None` when the input does not normalize to a complete
    /// canonical number.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = normalize(input);
        (normalized.len() == CANONICAL_LEN && normalized.starts_with('7'))
            .then_some(Self(normalized))
    }

    /// The canonical 11-digit form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form, `+7 (DDD) DDD-DD-DD`.
    #[must_use]
    pub fn masked(&self) -> String {
        mask(&self.0)
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("+7 (999) 123-45-67"), "79991234567");
        assert_eq!(digits_only("abc"), "");
        assert_eq!(digits_only(""), "");
    }

    #[test]
    fn test_normalize_known_shapes() {
        assert_eq!(normalize("+7 (999) 123-45-67"), "79991234567");
        assert_eq!(normalize("8 (999) 123-45-67"), "79991234567");
        assert_eq!(normalize("9991234567"), "79991234567");
    }

    #[test]
    fn test_normalize_truncates_overlong_input_before_prefix_fix() {
        // 13 digits: the trailing two are discarded first, then the `8`
        // prefix is rewritten.
        assert_eq!(normalize("8999123456789"), "79991234567");
        assert_eq!(normalize("7999123456700"), "79991234567");
    }

    #[test]
    fn test_normalize_passes_through_unrecognized_shapes() {
        assert_eq!(normalize("12345"), "12345");
        assert_eq!(normalize("5999123456"), "5999123456");
        assert_eq!(normalize("59991234567"), "59991234567");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_mask_full_number() {
        assert!(mask("79991234567").contains("+7 (999) 123-45-67"));
        assert!(mask("9991234567").contains("+7 (999) 123-45-67"));
    }

    #[test]
    fn test_mask_partial_input() {
        assert_eq!(mask("7999"), "+7 (999) --");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("79991234567"));
        // An 8-prefixed number normalizes to 7 and counts as valid.
        assert!(is_valid("89991234567"));
        assert!(!is_valid("7999123456"));
        assert!(!is_valid(""));
        assert!(!is_valid("abc"));
    }

    #[test]
    fn test_canonical_phone_parse() {
        let phone = CanonicalPhone::parse("8 (999) 123-45-67").unwrap();
        assert_eq!(phone.as_str(), "79991234567");
        assert_eq!(phone.masked(), "+7 (999) 123-45-67");
        assert!(CanonicalPhone::parse("999").is_none());
    }

    #[test]
    fn test_canonical_phone_serializes_transparent() {
        let phone = CanonicalPhone::parse("79991234567").unwrap();
        assert_eq!(
            serde_json::to_string(&phone).unwrap(),
            "\"79991234567\""
        );
    }
}
