//! Decimal text quantities
//!
//! Fees, amounts, balances, balance changes and gas figures travel as JSON
//! strings so that nodes can report values beyond 64 bits. They are kept as
//! text for their whole lifetime here.

use crate::error::DecimalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An arbitrary-precision signed decimal integer held as its wire text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DecimalString(String);

impl DecimalString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }

    pub fn is_zero(&self) -> bool {
        self.0.trim_start_matches('-').bytes().all(|b| b == b'0')
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_decimal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl TryFrom<String> for DecimalString {
    type Error = DecimalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_decimal(&value) {
            Ok(DecimalString(value))
        } else {
            Err(DecimalError(value))
        }
    }
}

impl FromStr for DecimalString {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DecimalString::try_from(s.to_string())
    }
}

impl From<DecimalString> for String {
    fn from(value: DecimalString) -> Self {
        value.0
    }
}

impl From<u64> for DecimalString {
    fn from(value: u64) -> Self {
        DecimalString(value.to_string())
    }
}

impl From<i64> for DecimalString {
    fn from(value: i64) -> Self {
        DecimalString(value.to_string())
    }
}

impl AsRef<str> for DecimalString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecimalString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
