// responses/docx.rs
use crate::errors::AttestError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// Return a Word document as a download
pub fn docx_response(buffer: Vec<u8>, filename: &str) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(200)
        .header(
            "Content-Type",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        )
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(buffer))
        .map_err(|_| AttestError::InternalError)?; // Convert any builder error

    Ok(resp)
}
