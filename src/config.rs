// src/config.rs
use crate::cases::{CaseProfile, CaseRegistry, FixedCaseNumber, NovaClient, NovaConfig};
use crate::cli::ConfigArgs;
use crate::domain::DateFormatter;
use crate::errors::AttestError;
use std::path::PathBuf;

/// Where case numbers come from.
#[derive(Debug, Clone)]
pub enum CaseBackend {
    Nova(NovaConfig),
    Fixed(String),
}

/// Everything a certificate run needs from outside. Built once at startup
/// and handed to each entry point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub template_path: PathBuf,
    pub dates: DateFormatter,
    pub case_backend: CaseBackend,
}

impl AppConfig {
    pub fn from_args(args: &ConfigArgs) -> Result<Self, AttestError> {
        Ok(Self {
            database_path: args.database.clone(),
            template_path: args.template.clone(),
            dates: DateFormatter::default(),
            case_backend: case_backend(args)?,
        })
    }

    pub fn case_registry(&self) -> Result<Box<dyn CaseRegistry>, AttestError> {
        Ok(match &self.case_backend {
            CaseBackend::Nova(nova) => Box::new(NovaClient::new(nova.clone())?),
            CaseBackend::Fixed(number) => Box::new(FixedCaseNumber(number.clone())),
        })
    }
}

/// Nova wins when all four Nova settings are present; a fixed case number
/// is the fallback. Partial Nova settings are a mistake, not a fallback.
fn case_backend(args: &ConfigArgs) -> Result<CaseBackend, AttestError> {
    let nova = [
        &args.nova_domain,
        &args.nova_token_url,
        &args.nova_client_id,
        &args.nova_client_secret,
    ];

    match (
        &args.nova_domain,
        &args.nova_token_url,
        &args.nova_client_id,
        &args.nova_client_secret,
    ) {
        (Some(domain), Some(token_url), Some(client_id), Some(client_secret)) => {
            Ok(CaseBackend::Nova(NovaConfig {
                domain: domain.clone(),
                token_url: token_url.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                profile: CaseProfile::default(),
            }))
        }
        _ if nova.iter().any(|v| v.is_some()) => Err(AttestError::Config(
            "Nova needs NOVA_DOMAIN, NOVA_TOKEN_URL, NOVA_CLIENT_ID and NOVA_CLIENT_SECRET".into(),
        )),
        _ => match &args.case_number {
            Some(number) if !number.trim().is_empty() => {
                Ok(CaseBackend::Fixed(number.trim().to_string()))
            }
            _ => Err(AttestError::Config(
                "no case registry: set the Nova credentials or ATTEST_CASE_NUMBER".into(),
            )),
        },
    }
}
