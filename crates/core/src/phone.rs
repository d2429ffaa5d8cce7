//! Phone number normalisation for the WhatsApp gateway.

/// Country calling code prepended to numbers stored without one (Brazil).
pub const DEFAULT_COUNTRY_CODE: &str = "55";

/// Strip everything but digits and ensure the number carries a country code.
///
/// Returns `None` when no digits remain; such guests are skipped by the
/// broadcast rather than sent to the gateway.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    if digits.starts_with(DEFAULT_COUNTRY_CODE) {
        Some(digits)
    } else {
        Some(format!("{DEFAULT_COUNTRY_CODE}{digits}"))
    }
}
