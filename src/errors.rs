use astra::Response;
// errors.rs
use thiserror::Error;

/// Errors raised while assembling or rendering a certificate, plus the
/// request-level errors of the HTTP surface.
#[derive(Debug, Error)]
pub enum AttestError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid CPR number: {0}")]
    InvalidCpr(String),

    #[error("Database Error: {0}")]
    DbError(String),

    /// The warehouse has no registration for the CPR number.
    #[error("Unknown citizen: {0}")]
    UnknownCitizen(String),

    /// A warehouse query failed or returned unusable data.
    #[error("Lookup failed: {0}")]
    LookupFailure(String),

    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Case registry error: {0}")]
    CaseRegistry(String),

    /// The template could not be rendered against the context.
    #[error("Template incompatible: {0}")]
    RenderIncompatibility(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, AttestError>;

impl AttestError {
    /// HTTP status used when the error reaches the router.
    pub fn status(&self) -> u16 {
        match self {
            AttestError::NotFound => 404,
            AttestError::BadRequest(_) | AttestError::InvalidCpr(_) => 400,
            AttestError::UnknownCitizen(_) => 404,
            AttestError::CaseRegistry(_) => 502,
            _ => 500,
        }
    }
}

impl From<rusqlite::Error> for AttestError {
    fn from(err: rusqlite::Error) -> Self {
        AttestError::DbError(err.to_string())
    }
}
