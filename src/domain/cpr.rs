// src/domain/cpr.rs

use crate::errors::AttestError;
use chrono::NaiveDate;
use std::fmt;

/// A Danish CPR number, stored as its ten digits.
///
/// Accepts `"1234561234"` as well as the dashed `"123456-1234"` form.
/// `Display` always renders the dashed form used on the certificate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpr(String);

impl Cpr {
    pub fn parse(input: &str) -> Result<Self, AttestError> {
        let trimmed = input.trim();
        let digits: String = match trimmed.split_once('-') {
            Some((head, tail)) if head.len() == 6 => format!("{head}{tail}"),
            Some(_) => return Err(AttestError::InvalidCpr(trimmed.to_string())),
            None => trimmed.to_string(),
        };

        if digits.len() != 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AttestError::InvalidCpr(trimmed.to_string()));
        }

        Ok(Self(digits))
    }

    /// The undashed ten digits, as stored in the warehouse.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Only the birth-date part, for log lines.
    pub fn masked(&self) -> String {
        format!("{}-****", &self.0[..6])
    }

    /// Birth date encoded in the first six digits. The century comes from
    /// the seventh digit combined with the two-digit year.
    pub fn birth_date(&self) -> Result<NaiveDate, AttestError> {
        let num = |range: std::ops::Range<usize>| -> u32 {
            // Digits were validated in `parse`.
            self.0[range].parse().unwrap_or_default()
        };

        let day = num(0..2);
        let month = num(2..4);
        let yy = num(4..6) as i32;
        let century_digit = num(6..7);

        let century = match century_digit {
            0..=3 => 1900,
            4 | 9 if yy <= 36 => 2000,
            4 | 9 => 1900,
            5..=8 if yy <= 57 => 2000,
            _ => 1800,
        };

        NaiveDate::from_ymd_opt(century + yy, month, day)
            .ok_or_else(|| AttestError::InvalidCpr(format!("no birth date in {}", self.masked())))
    }
}

impl fmt::Display for Cpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", &self.0[..6], &self.0[6..])
    }
}

/// Formats a raw warehouse CPR string with a dash after the sixth digit.
/// Values that are not valid CPR numbers are returned unchanged.
pub fn format_cpr(raw: &str) -> String {
    match Cpr::parse(raw) {
        Ok(cpr) => cpr.to_string(),
        Err(_) => raw.trim().to_string(),
    }
}
