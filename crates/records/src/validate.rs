//! Registration input checks
//!
//! Names are trimmed and must be 2 to 50 characters. Phone numbers may use
//! `+`, digits, spaces, `-`, `(` and `)`, must be at least 10 characters and
//! carry at least 10 digits. Records are keyed on the digits alone.

use crate::error::ValidationError;

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 50;
pub const MIN_PHONE_DIGITS: usize = 10;

/// Trimmed name, if its length is within bounds.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(ValidationError::NameLength);
    }
    Ok(name.to_string())
}

/// Digits of a well-formed phone number.
pub fn validate_phone(phone: &str) -> Result<String, ValidationError> {
    let phone = phone.trim();
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')');
    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body.chars().all(allowed) {
        return Err(ValidationError::PhoneCharacters);
    }
    let digits = phone_digits(phone);
    if body.chars().count() < MIN_PHONE_DIGITS || digits.len() < MIN_PHONE_DIGITS {
        return Err(ValidationError::PhoneTooShort);
    }
    Ok(digits)
}

/// Just the ASCII digits.
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Display form: `(XXX) XXX-XXXX` once ten digits are known, `(XXX) rest` for
/// three to five digits, digits unchanged otherwise.
///
/// ```
/// use make_it_12_records::validate::format_phone;
///
/// assert_eq!(format_phone("555.123.4567"), "(555) 123-4567");
/// assert_eq!(format_phone("5551"), "(555) 1");
/// ```
pub fn format_phone(phone: &str) -> String {
    let d = phone_digits(phone);
    match d.len() {
        n if n >= 10 => format!("({}) {}-{}{}", &d[..3], &d[3..6], &d[6..10], &d[10..]),
        3..=5 => format!("({}) {}", &d[..3], &d[3..]),
        _ => d,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_bounds() {
        assert_eq!(validate_name("  Al "), Ok("Al".to_string()));
        assert_eq!(validate_name("A"), Err(ValidationError::NameLength));
        assert_eq!(validate_name("   "), Err(ValidationError::NameLength));
        assert!(validate_name(&"x".repeat(50)).is_ok());
        assert_eq!(validate_name(&"x".repeat(51)), Err(ValidationError::NameLength));
    }

    #[test]
    fn phone_formats_accepted() {
        assert_eq!(validate_phone("(555) 123-4567"), Ok("5551234567".to_string()));
        assert_eq!(validate_phone("+1 555 123 4567"), Ok("15551234567".to_string()));
        assert_eq!(validate_phone("5551234567"), Ok("5551234567".to_string()));
    }

    #[test]
    fn phone_rejections() {
        assert_eq!(validate_phone("555-CALL-NOW"), Err(ValidationError::PhoneCharacters));
        assert_eq!(validate_phone("12+3456789012"), Err(ValidationError::PhoneCharacters));
        assert_eq!(validate_phone("555-1234"), Err(ValidationError::PhoneTooShort));
        // Long enough, but only nine digits.
        assert_eq!(validate_phone("(55) 512-3456"), Err(ValidationError::PhoneTooShort));
    }

    #[test]
    fn display_format() {
        assert_eq!(format_phone("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone("+1 555 123 4567"), "(155) 512-34567");
        assert_eq!(format_phone("55512"), "(555) 12");
        assert_eq!(format_phone("555123"), "555123");
        assert_eq!(format_phone("55"), "55");
    }
}
