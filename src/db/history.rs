// src/db/history.rs
use crate::domain::{AddressPeriod, Cpr, NameRecord};
use crate::errors::AttestError;
use chrono::NaiveDate;
use rusqlite::{params, Connection};

/// Addresses the citizen has lived at since `since`, newest move first.
/// A stay counts when it ended after `since`; the current stay ends 9999-12-31.
pub fn get_address_history(
    conn: &Connection,
    cpr: &Cpr,
    since: NaiveDate,
) -> Result<Vec<AddressPeriod>, AttestError> {
    let mut stmt = conn
        .prepare(
            r#"
            select distinct
              fh.dato_tilflyt, fh.dato_fraflyt,
              ah.vejnavn, coalesce(ah.hus_nr, ''), coalesce(ah.etage, ''), coalesce(ah.side, ''),
              ah.postnummer, ah.postdistrikt
            from flyttehistorik as fh
            join adresse_historik as ah
              on fh.adressenoegle = ah.adressenoegle and fh.cpr = ah.cpr
            where fh.cpr = ?1
              and fh.dato_fraflyt > ?2
            order by fh.dato_tilflyt desc
            "#,
        )
        .map_err(|e| AttestError::LookupFailure(format!("prepare address history failed: {e}")))?;

    let rows = stmt
        .query_map(params![cpr.digits(), since], |r| {
            Ok(AddressPeriod {
                move_in: r.get(0)?,
                move_out: r.get(1)?,
                street: r.get(2)?,
                house_number: r.get(3)?,
                floor: r.get(4)?,
                side: r.get(5)?,
                postal_code: r.get(6)?,
                city: r.get(7)?,
            })
        })
        .map_err(|e| AttestError::LookupFailure(format!("select address history failed: {e}")))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AttestError::LookupFailure(format!("read address history failed: {e}")))
}

/// Raw name register rows, newest first.
pub fn get_name_records(conn: &Connection, cpr: &Cpr) -> Result<Vec<NameRecord>, AttestError> {
    let mut stmt = conn
        .prepare(
            r#"
            select fornavn, mellemnavn, efternavn, gyldig_fra, gyldig_til
            from borger_dim
            where cpr = ?1
            order by gyldig_fra desc
            "#,
        )
        .map_err(|e| AttestError::LookupFailure(format!("prepare name history failed: {e}")))?;

    let rows = stmt
        .query_map(params![cpr.digits()], |r| {
            Ok(NameRecord {
                first_name: r.get(0)?,
                middle_name: r.get(1)?,
                last_name: r.get(2)?,
                valid_from: r.get(3)?,
                valid_to: r.get(4)?,
            })
        })
        .map_err(|e| AttestError::LookupFailure(format!("select name history failed: {e}")))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AttestError::LookupFailure(format!("read name history failed: {e}")))
}
