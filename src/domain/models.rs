// src/domain/models.rs

use crate::domain::address::format_address;
use chrono::NaiveDate;

/// Current registration of a citizen, as printed at the top of the certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
    /// Undashed CPR as stored in the warehouse.
    pub national_id: String,
    pub addressing_name: String,
    pub full_name: String,
    pub address: String,
    pub zip_city: String,
}

/// One stay at one address. `move_out` is 9999-12-31 for the current address.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressPeriod {
    pub move_in: NaiveDate,
    pub move_out: NaiveDate,
    pub street: String,
    pub house_number: String,
    pub floor: String,
    pub side: String,
    pub postal_code: String,
    pub city: String,
}

impl AddressPeriod {
    pub fn formatted_address(&self) -> String {
        format_address(
            &self.street,
            &self.house_number,
            &self.floor,
            &self.side,
            &self.postal_code,
            &self.city,
        )
    }
}
