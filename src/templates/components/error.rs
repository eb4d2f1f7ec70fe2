use crate::errors::AttestError;
use crate::templates::desktop_layout;
use astra::{Body, Response, ResponseBuilder};
use maud::html;

/// Convert an AttestError into a proper HTML response page
pub fn html_error_response(err: AttestError) -> Response {
    let status = err.status();
    let message = match &err {
        AttestError::NotFound => "Siden findes ikke".to_string(),
        // Internal details stay in the log.
        AttestError::DbError(_)
        | AttestError::LookupFailure(_)
        | AttestError::InternalError
        | AttestError::Io(_) => {
            "Intern fejl - attesten blev ikke dannet".to_string()
        }
        other => other.to_string(),
    };

    render_error(status, &message)
}

/// Build a basic HTML error page
fn render_error(status: u16, message: &str) -> Response {
    let page = desktop_layout(
        &format!("Fejl {status}"),
        html! {
            h1 { "Fejl " (status) }
            p { (message) }
            p { a href="/" { "← Tilbage" } }
        },
    );

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(page.into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
