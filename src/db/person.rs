// src/db/person.rs
use crate::domain::{Cpr, PersonRecord};
use crate::errors::AttestError;
use rusqlite::{params, Connection, OptionalExtension};

fn missing(what: &str, cpr: &Cpr) -> AttestError {
    AttestError::UnknownCitizen(format!("no {what} row for {}", cpr.masked()))
}

/// Name and current address of the citizen.
pub fn get_person_info(conn: &Connection, cpr: &Cpr) -> Result<PersonRecord, AttestError> {
    conn.query_row(
        r#"
        select cpr, adresseringsnavn, borgerligt_navn, adresseringsadresse, postnummer_og_by
        from adresse_aktuel
        where cpr = ?1
        "#,
        params![cpr.digits()],
        |r| {
            Ok(PersonRecord {
                national_id: r.get(0)?,
                addressing_name: r.get(1)?,
                full_name: r.get(2)?,
                address: r.get(3)?,
                zip_city: r.get(4)?,
            })
        },
    )
    .optional()
    .map_err(|e| AttestError::LookupFailure(format!("select person failed: {e}")))?
    .ok_or_else(|| missing("person", cpr))
}

/// Reads one nullable text column of the citizen's current registration.
/// A missing row is an error; a null value is `None`.
fn current_column(
    conn: &Connection,
    cpr: &Cpr,
    column: &'static str,
) -> Result<Option<String>, AttestError> {
    let sql = format!("select {column} from adresse_aktuel where cpr = ?1");
    conn.query_row(&sql, params![cpr.digits()], |r| r.get::<_, Option<String>>(0))
        .optional()
        .map_err(|e| AttestError::LookupFailure(format!("select {column} failed: {e}")))?
        .ok_or_else(|| missing(column, cpr))
}

pub fn get_citizenship(conn: &Connection, cpr: &Cpr) -> Result<Option<String>, AttestError> {
    current_column(conn, cpr, "statsborgerskab")
}

pub fn get_civil_status(conn: &Connection, cpr: &Cpr) -> Result<Option<String>, AttestError> {
    current_column(conn, cpr, "civilstand")
}

/// Children registered at the same address as the parent.
pub fn get_children(conn: &Connection, cpr: &Cpr) -> Result<Vec<String>, AttestError> {
    let mut stmt = conn
        .prepare(
            r#"
            select child.cpr
            from adresse_aktuel as parent
            join adresse_aktuel as child
              on (child.mor_cpr = parent.cpr or child.far_cpr = parent.cpr)
            where parent.cpr = ?1
              and parent.adressenoegle = child.adressenoegle
            order by child.cpr
            "#,
        )
        .map_err(|e| AttestError::LookupFailure(format!("prepare children failed: {e}")))?;

    let rows = stmt
        .query_map(params![cpr.digits()], |r| r.get::<_, String>(0))
        .map_err(|e| AttestError::LookupFailure(format!("select children failed: {e}")))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AttestError::LookupFailure(format!("read children failed: {e}")))
}
