// src/domain/dates.rs

use crate::errors::AttestError;
use chrono::{Datelike, Locale, NaiveDate, NaiveTime, TimeZone, Utc};

/// The warehouse writes 9999-12-31 as the end of a period that has not ended.
pub fn is_open_end(date: NaiveDate) -> bool {
    date.year() == 9999 && date.month() == 12 && date.day() == 31
}

/// Renders dates for the certificate in a fixed locale.
#[derive(Debug, Clone, Copy)]
pub struct DateFormatter {
    locale: Locale,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(Locale::da_DK)
    }
}

impl DateFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// "1. januar 2015"
    pub fn format_long(&self, date: NaiveDate) -> String {
        let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
        midnight
            .format_localized("%-d. %B %Y", self.locale)
            .to_string()
    }

    /// "01.01.2015", or "-" for an open-ended period.
    pub fn format_short(&self, date: NaiveDate) -> String {
        if is_open_end(date) {
            return "-".to_string();
        }
        date.format("%d.%m.%Y").to_string()
    }
}

/// Converts a warehouse integer date (yyyymmdd) to a calendar date.
pub fn date_from_yyyymmdd(value: i64) -> Result<NaiveDate, AttestError> {
    let year = value / 10_000;
    let month = (value / 100) % 100;
    let day = value % 100;

    if !(1..=9999).contains(&year) {
        return Err(AttestError::LookupFailure(format!(
            "integer date {value} is not yyyymmdd"
        )));
    }

    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).ok_or_else(|| {
        AttestError::LookupFailure(format!("integer date {value} is not a calendar date"))
    })
}
