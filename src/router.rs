use crate::certificate::{create_certificate, CertificateRequest};
use crate::config::AppConfig;
use crate::documents::CertificateOptions;
use crate::domain::Cpr;
use crate::errors::AttestError;
use crate::responses::{docx_response, html_response, ResultResp};
use crate::templates;
use astra::Request;
use chrono::{Local, NaiveDate};
use std::collections::HashMap;

pub fn handle(req: Request, config: &AppConfig) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();

    match (method, path) {
        ("GET", "/") => html_response(templates::pages::home_page()),
        ("GET", "/certificate") => {
            let request = certificate_request(&parse_query(&req))?;
            let document = create_certificate(config, &request, Local::now().date_naive())?;
            let filename = format!("Bopaelsattest-{}.docx", &request.cpr.digits()[..6]);
            docx_response(document, &filename)
        }
        _ => Err(AttestError::NotFound),
    }
}

/// Reads the form fields of `/certificate`. Checkboxes are only sent when
/// ticked, so a missing flag means "leave the section out".
fn certificate_request(params: &HashMap<String, String>) -> Result<CertificateRequest, AttestError> {
    let cpr = params
        .get("cpr")
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AttestError::BadRequest("cpr is required".into()))?;
    let cpr = Cpr::parse(cpr)?;

    let mut options = CertificateOptions {
        include_citizenship: params.contains_key("citizenship"),
        include_civil_status: params.contains_key("civil_status"),
        include_children: params.contains_key("children"),
        include_name_history: params.contains_key("name_history"),
        ..CertificateOptions::default()
    };

    if let Some(from) = params.get("from").filter(|v| !v.is_empty()) {
        options.address_history_from = NaiveDate::parse_from_str(from, "%Y-%m-%d")
            .map_err(|_| AttestError::BadRequest(format!("from must be YYYY-MM-DD, got {from}")))?;
    }

    Ok(CertificateRequest { cpr, options })
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}
