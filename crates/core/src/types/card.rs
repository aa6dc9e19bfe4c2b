//! Payment card number as accepted by the customer profile form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CardNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CardNumberError {
    /// Fewer than 13 or more than 19 digits once spaces are removed.
    #[error("Card number must be between 13 and 19 digits.")]
    Length,
    /// Something other than digits and spaces.
    #[error("Card number must contain only digits.")]
    NonDigit,
    /// Larger than the backend's signed 64-bit column can hold.
    #[error("Card number is too large.")]
    OutOfRange,
}

/// A card number, stored and sent as an integer.
///
/// The backend keeps card numbers in a numeric column, so the payload carries
/// a JSON number rather than a string. Spaces typed between digit groups are
/// ignored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardNumber(u64);

impl CardNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 13;
    /// Maximum number of digits.
    pub const MAX_DIGITS: usize = 19;
    /// Largest value the backend can store.
    pub const MAX_VALUE: u64 = i64::MAX.unsigned_abs();

    /// Parse a card number typed into a form.
    ///
    /// # Errors
    ///
    /// Returns [`CardNumberError::Length`] when the digit count is outside
    /// 13..=19, [`CardNumberError::NonDigit`] for any other character and
    /// [`CardNumberError::OutOfRange`] above [`CardNumber::MAX_VALUE`].
    pub fn parse(s: &str) -> Result<Self, CardNumberError> {
        let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(CardNumberError::Length);
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CardNumberError::NonDigit);
        }
        match digits.parse::<u64>() {
            Ok(value) if value <= Self::MAX_VALUE => Ok(Self(value)),
            _ => Err(CardNumberError::OutOfRange),
        }
    }

    /// Wrap a number already stored by the backend.
    #[must_use]
    pub const fn from_stored(value: u64) -> Self {
        Self(value)
    }

    /// The last four digits, zero padded.
    #[must_use]
    pub fn last_four(&self) -> String {
        format!("{:04}", self.0 % 10_000)
    }
}

// Never print the full number in logs.
impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardNumber(****{})", self.last_four())
    }
}
