// src/certificate.rs
use crate::config::AppConfig;
use crate::db::Database;
use crate::documents::{CertificateOptions, ContextBuilder, DocxTemplate};
use crate::domain::Cpr;
use crate::errors::AttestError;
use chrono::NaiveDate;
use tracing::info;

#[derive(Debug, Clone)]
pub struct CertificateRequest {
    pub cpr: Cpr,
    pub options: CertificateOptions,
}

/// Produces the finished .docx for one citizen.
///
/// The template is parsed and every warehouse lookup has succeeded before
/// the case registry is asked for a case number. Any failure aborts the
/// whole run.
pub fn create_certificate(
    config: &AppConfig,
    request: &CertificateRequest,
    today: NaiveDate,
) -> Result<Vec<u8>, AttestError> {
    info!(cpr = %request.cpr.masked(), "creating residence certificate");

    let template = DocxTemplate::open(&config.template_path)?;
    let cases = config.case_registry()?;
    let db = Database::new(&config.database_path);

    let context = db.with_conn(|conn| {
        ContextBuilder::new(conn, config.dates, today).build(
            &request.cpr,
            &request.options,
            |party_name| cases.allocate_case(&request.cpr, party_name),
        )
    })?;

    let document = template.render(&context)?;
    info!(
        cpr = %request.cpr.masked(),
        case_number = %context.case_number,
        bytes = document.len(),
        "certificate rendered"
    );
    Ok(document)
}
