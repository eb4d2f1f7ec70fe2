// src/db/lookup.rs
use crate::db::{history, person};
use crate::domain::{AddressPeriod, Cpr, NameRecord, PersonRecord};
use crate::errors::AttestError;
use chrono::NaiveDate;
use rusqlite::Connection;

/// Everything the certificate reads about a citizen.
///
/// Implemented for a warehouse `Connection`; tests substitute in-memory
/// fakes to drive the context builder without SQL.
pub trait PersonLookup {
    fn person(&self, cpr: &Cpr) -> Result<PersonRecord, AttestError>;

    /// Name register, newest first.
    fn name_records(&self, cpr: &Cpr) -> Result<Vec<NameRecord>, AttestError>;

    /// Address stays that ended after `since`, newest first.
    fn address_history(&self, cpr: &Cpr, since: NaiveDate)
        -> Result<Vec<AddressPeriod>, AttestError>;

    fn citizenship(&self, cpr: &Cpr) -> Result<Option<String>, AttestError>;

    fn civil_status(&self, cpr: &Cpr) -> Result<Option<String>, AttestError>;

    /// Undashed CPR numbers of children living with the citizen.
    fn children(&self, cpr: &Cpr) -> Result<Vec<String>, AttestError>;
}

impl PersonLookup for Connection {
    fn person(&self, cpr: &Cpr) -> Result<PersonRecord, AttestError> {
        person::get_person_info(self, cpr)
    }

    fn name_records(&self, cpr: &Cpr) -> Result<Vec<NameRecord>, AttestError> {
        history::get_name_records(self, cpr)
    }

    fn address_history(
        &self,
        cpr: &Cpr,
        since: NaiveDate,
    ) -> Result<Vec<AddressPeriod>, AttestError> {
        history::get_address_history(self, cpr, since)
    }

    fn citizenship(&self, cpr: &Cpr) -> Result<Option<String>, AttestError> {
        person::get_citizenship(self, cpr)
    }

    fn civil_status(&self, cpr: &Cpr) -> Result<Option<String>, AttestError> {
        person::get_civil_status(self, cpr)
    }

    fn children(&self, cpr: &Cpr) -> Result<Vec<String>, AttestError> {
        person::get_children(self, cpr)
    }
}
