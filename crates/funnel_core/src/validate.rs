use std::fmt;

/// Local mobile numbers carry nine digits.
pub const DEFAULT_MIN_PHONE_DIGITS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TooFewDigits { min: usize, actual: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooFewDigits { .. } => {
                write!(f, "Please enter a valid phone number.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Strips everything but ASCII digits and checks the digit-count lower bound.
/// Returns the stripped digits on success.
pub fn validate_phone(raw: &str, min_digits: usize) -> Result<String, ValidationError> {
    let digits = strip_non_digits(raw);
    if digits.len() < min_digits {
        return Err(ValidationError::TooFewDigits {
            min: min_digits,
            actual: digits.len(),
        });
    }
    Ok(digits)
}
