use std::fmt;

use thiserror::Error;

/// Digits required in a national number.
pub const NATIONAL_DIGITS: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Invalid phone number: expected 10 digits, got {digits:?}")]
    WrongDigitCount { digits: String },
}

/// A validated number in `+<country><10 digits>` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keep only the digits of a spoken or typed number.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Strip everything but digits and prefix `country_code`.
///
/// Exactly ten digits must remain; there is no other accepted format.
pub fn normalize_phone(input: &str, country_code: &str) -> Result<PhoneNumber, PhoneError> {
    let digits = digits_only(input);
    if digits.len() != NATIONAL_DIGITS {
        return Err(PhoneError::WrongDigitCount { digits });
    }
    Ok(PhoneNumber(format!("{country_code}{digits}")))
}
