// src/domain/names.rs

use crate::domain::dates::date_from_yyyymmdd;
use crate::errors::AttestError;
use chrono::NaiveDate;

/// One row of the citizen's name register. Dates are the warehouse's
/// yyyymmdd integers.
#[derive(Debug, Clone, PartialEq)]
pub struct NameRecord {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub valid_from: i64,
    pub valid_to: i64,
}

impl NameRecord {
    /// First, middle and last name joined by single spaces. Missing or blank
    /// parts are skipped.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .flatten()
            .flat_map(|part| part.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A span of time during which the citizen carried one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub name: String,
}

impl TryFrom<&NameRecord> for NamePeriod {
    type Error = AttestError;

    fn try_from(record: &NameRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            from: date_from_yyyymmdd(record.valid_from)?,
            to: date_from_yyyymmdd(record.valid_to)?,
            name: record.full_name(),
        })
    }
}

/// Turns the newest-first name register into the name history shown on the
/// certificate. Adjacent rows with the same name become one period.
///
/// The register always has at least the current name, so an empty input
/// means the caller skipped a lookup; that is reported, not papered over.
pub fn consolidate(records: &[NameRecord]) -> Result<Vec<NamePeriod>, AttestError> {
    if records.is_empty() {
        return Err(AttestError::PreconditionViolation(
            "name history consolidation needs at least one name record".into(),
        ));
    }

    let periods = records
        .iter()
        .map(NamePeriod::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(merge_adjacent(periods))
}

/// Merges neighbouring periods that carry the same name. Input is newest
/// first, so a merge moves the kept period's start back to the older one.
pub fn merge_adjacent(periods: Vec<NamePeriod>) -> Vec<NamePeriod> {
    let mut merged: Vec<NamePeriod> = Vec::with_capacity(periods.len());

    for period in periods {
        match merged.last_mut() {
            Some(last) if last.name == period.name => last.from = period.from,
            _ => merged.push(period),
        }
    }

    merged
}
