// src/cases/nova.rs
//
// Opens a "Bopælsattest" case in KMD Nova and reads back its case number.

use crate::cases::registry::CaseRegistry;
use crate::domain::Cpr;
use crate::errors::AttestError;
use chrono::{DateTime, Local};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const API_VERSION: &str = "2.0-Case";

/// Department reference as Nova's organisation register knows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub user_key: String,
}

/// Fixed classification and ownership of every certificate case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseProfile {
    pub kle_number: String,
    pub proceeding_facet: String,
    pub sensitivity: String,
    pub progress_state: String,
    pub caseworker_name: String,
    pub caseworker_ident: String,
    pub caseworker_uuid: String,
    pub responsible_department: Department,
    pub security_unit: Department,
}

impl Default for CaseProfile {
    fn default() -> Self {
        Self {
            kle_number: "23.05.03".into(),
            proceeding_facet: "G01".into(),
            sensitivity: "Fortrolige".into(),
            progress_state: "Opstaaet".into(),
            caseworker_name: "Rpabruger Rpa16 - MÅ IKKE SLETTES".into(),
            caseworker_ident: "AZRPA16".into(),
            caseworker_uuid: "02b35232-9fc4-4e95-aab7-fa9d0e1910cc".into(),
            responsible_department: Department {
                id: 70403,
                name: "Folkeregister og Sygesikring".into(),
                user_key: "4BFOLKEREG".into(),
            },
            security_unit: Department {
                id: 818485,
                name: "Borgerservice".into(),
                user_key: "4BBORGER".into(),
            },
        }
    }
}

#[derive(Clone)]
pub struct NovaConfig {
    /// Base URL of the Nova API, e.g. "https://cap-wsswlbs-wm3q2021.kmd.dk".
    pub domain: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub profile: CaseProfile,
}

impl fmt::Debug for NovaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NovaConfig")
            .field("domain", &self.domain)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("profile", &self.profile)
            .finish()
    }
}

// --- wire types -----------------------------------------------------------

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Common {
    transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Paging {
    start_row: u32,
    number_of_rows: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseAttributes {
    title: String,
    case_date: String,
}

#[derive(Serialize)]
struct Code {
    code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseClassification {
    kle_number: Code,
    proceeding_facet: Code,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseParty {
    index: String,
    identification_type: String,
    identification: String,
    party_role: String,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KspIdentity {
    racf_id: String,
    full_name: String,
    nova_user_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Caseworker {
    ksp_identity: KspIdentity,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LosIdentity {
    administrative_unit_id: i64,
    full_name: String,
    user_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DepartmentRef {
    los_identity: LosIdentity,
}

impl From<&Department> for DepartmentRef {
    fn from(d: &Department) -> Self {
        Self {
            los_identity: LosIdentity {
                administrative_unit_id: d.id,
                full_name: d.name.clone(),
                user_key: d.user_key.clone(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseImport {
    common: Common,
    paging: Paging,
    case_attributes: CaseAttributes,
    case_classification: CaseClassification,
    state: String,
    sensitivity: String,
    case_parties: Vec<CaseParty>,
    caseworker: Caseworker,
    responsible_department: DepartmentRef,
    security_unit: DepartmentRef,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseLookup {
    common: Common,
    paging: Paging,
    case_get_output: CaseGetOutput,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseGetOutput {
    case_attributes: CaseNumberFlag,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseNumberFlag {
    user_friendly_case_number: bool,
}

#[derive(Deserialize)]
struct CaseList {
    #[serde(default)]
    cases: Vec<CaseListItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaseListItem {
    case_attributes: CaseNumberAttributes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaseNumberAttributes {
    user_friendly_case_number: Option<String>,
}

// --- client ---------------------------------------------------------------

pub struct NovaClient {
    client: Client,
    config: NovaConfig,
}

impl NovaClient {
    pub fn new(config: NovaConfig) -> Result<Self, AttestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AttestError::CaseRegistry(format!("client init failed: {e}")))?;

        Ok(Self { client, config })
    }

    fn access_token(&self) -> Result<String, AttestError> {
        let resp = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("scope", "client"),
            ])
            .send()
            .map_err(|e| AttestError::CaseRegistry(format!("token request failed: {e}")))?;

        let resp = ensure_success(resp, "token request")?;
        let token: TokenResponse = resp
            .json()
            .map_err(|e| AttestError::CaseRegistry(format!("token response unreadable: {e}")))?;
        Ok(token.access_token)
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{path}?api-version={API_VERSION}",
            self.config.domain.trim_end_matches('/')
        )
    }

    fn read_case_number(&self, token: &str, case_uuid: &str) -> Result<String, AttestError> {
        let lookup = CaseLookup {
            common: Common {
                transaction_id: Uuid::new_v4().to_string(),
                uuid: Some(case_uuid.to_string()),
            },
            paging: Paging {
                start_row: 1,
                number_of_rows: 1,
            },
            case_get_output: CaseGetOutput {
                case_attributes: CaseNumberFlag {
                    user_friendly_case_number: true,
                },
            },
        };

        let resp = self
            .client
            .put(self.api_url("Case/GetList"))
            .bearer_auth(token)
            .json(&lookup)
            .send()
            .map_err(|e| AttestError::CaseRegistry(format!("case lookup failed: {e}")))?;

        let list: CaseList = ensure_success(resp, "case lookup")?
            .json()
            .map_err(|e| AttestError::CaseRegistry(format!("case list unreadable: {e}")))?;

        list.cases
            .into_iter()
            .next()
            .and_then(|c| c.case_attributes.user_friendly_case_number)
            .ok_or_else(|| {
                AttestError::CaseRegistry(format!("case {case_uuid} has no case number"))
            })
    }
}

impl CaseRegistry for NovaClient {
    fn allocate_case(&self, cpr: &Cpr, party_name: &str) -> Result<String, AttestError> {
        let token = self.access_token()?;

        let case_uuid = Uuid::new_v4().to_string();
        let import = case_import(&self.config.profile, cpr, party_name, &case_uuid, Local::now());

        let resp = self
            .client
            .post(self.api_url("Case/Import"))
            .bearer_auth(&token)
            .json(&import)
            .send()
            .map_err(|e| AttestError::CaseRegistry(format!("case import failed: {e}")))?;
        ensure_success(resp, "case import")?;
        debug!(case_uuid = %case_uuid, "nova case imported");

        let case_number = self.read_case_number(&token, &case_uuid)?;
        info!(case_number = %case_number, cpr = %cpr.masked(), "nova case created");
        Ok(case_number)
    }
}

fn ensure_success(
    resp: reqwest::blocking::Response,
    what: &str,
) -> Result<reqwest::blocking::Response, AttestError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
    Err(AttestError::CaseRegistry(format!(
        "{what}: Nova API error {status} - {text}"
    )))
}

fn case_import(
    profile: &CaseProfile,
    cpr: &Cpr,
    party_name: &str,
    case_uuid: &str,
    now: DateTime<Local>,
) -> CaseImport {
    CaseImport {
        common: Common {
            transaction_id: Uuid::new_v4().to_string(),
            uuid: Some(case_uuid.to_string()),
        },
        paging: Paging {
            start_row: 1,
            number_of_rows: 100,
        },
        case_attributes: CaseAttributes {
            title: format!("Bopælsattest {}", now.format("%d/%m/%Y")),
            case_date: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        },
        case_classification: CaseClassification {
            kle_number: Code {
                code: profile.kle_number.clone(),
            },
            proceeding_facet: Code {
                code: profile.proceeding_facet.clone(),
            },
        },
        state: profile.progress_state.clone(),
        sensitivity: profile.sensitivity.clone(),
        case_parties: vec![CaseParty {
            index: "1".into(),
            identification_type: "CprNummer".into(),
            identification: cpr.digits().to_string(),
            party_role: "Primær".into(),
            name: party_name.to_string(),
        }],
        caseworker: Caseworker {
            ksp_identity: KspIdentity {
                racf_id: profile.caseworker_ident.clone(),
                full_name: profile.caseworker_name.clone(),
                nova_user_id: profile.caseworker_uuid.clone(),
            },
        },
        responsible_department: (&profile.responsible_department).into(),
        security_unit: (&profile.security_unit).into(),
    }
}
