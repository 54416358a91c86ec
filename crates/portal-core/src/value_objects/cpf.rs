//! CPF - Brazilian taxpayer registry number, the login identifier of the portal
//!
//! Stored and compared as the bare 11 digits. Formatting characters
//! (`123.456.789-09`) are accepted on input and stripped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Validated CPF (11 digits, check digits verified)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    /// Parse and validate a CPF from user input
    ///
    /// # Errors
    /// Returns an error if the input is not 11 digits after stripping
    /// separators, is a repeated-digit sequence, or fails the check digits.
    pub fn parse(input: &str) -> Result<Self, CpfParseError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();

        if digits.len() != 11 {
            return Err(CpfParseError::InvalidLength(digits.len()));
        }

        // All-same-digit sequences (000..., 111...) pass the checksum but are not valid CPFs
        let first = digits.as_bytes()[0];
        if digits.bytes().all(|b| b == first) {
            return Err(CpfParseError::RepeatedDigits);
        }

        let nums: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();

        if check_digit(&nums[..9]) != nums[9] || check_digit(&nums[..10]) != nums[10] {
            return Err(CpfParseError::InvalidCheckDigits);
        }

        Ok(Self(digits))
    }

    /// Get the bare 11-digit representation
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format with the conventional separators: `123.456.789-09`
    pub fn formatted(&self) -> String {
        format!(
            "{}.{}.{}-{}",
            &self.0[..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..]
        )
    }
}

/// Compute a CPF check digit over the given prefix
fn check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    let rem = (sum * 10) % 11;
    if rem == 10 {
        0
    } else {
        rem
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cpf {
    type Err = CpfParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Cpf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cpf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// CPF parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CpfParseError {
    #[error("CPF must have 11 digits, got {0}")]
    InvalidLength(usize),

    #[error("CPF cannot be a repeated digit sequence")]
    RepeatedDigits,

    #[error("CPF check digits do not match")]
    InvalidCheckDigits,
}
