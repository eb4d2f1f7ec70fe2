use crate::certificate::{create_certificate, CertificateRequest};
use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::domain::Cpr;
use crate::errors::AttestError;
use crate::router::handle;
use astra::Server;
use chrono::Local;
use clap::Parser;
use std::fs;
use tracing::{error, info, warn};

mod cases;
mod certificate;
mod cli;
mod config;
mod db;
mod documents;
mod domain;
mod errors;
mod responses;
mod router;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AttestError> {
    match cli.command {
        Commands::InitDb { schema } => init_db(&Database::new(&cli.config.database), schema),

        Commands::Generate {
            certificate,
            output,
        } => {
            let config = AppConfig::from_args(&cli.config)?;
            let request = CertificateRequest {
                cpr: Cpr::parse(&certificate.cpr)?,
                options: certificate.options(),
            };

            let document = create_certificate(&config, &request, Local::now().date_naive())?;
            fs::write(&output, document)?;
            info!(output = %output.display(), "certificate written");
            Ok(())
        }

        Commands::Serve { addr } => {
            let config = AppConfig::from_args(&cli.config)?;
            info!("Starting server at http://{addr}");

            let server = Server::bind(&addr).max_workers(8);

            server
                .serve(move |req, _info| match handle(req, &config) {
                    Ok(resp) => resp,
                    Err(err) => {
                        warn!(status = err.status(), "request failed: {err}");
                        templates::html_error_response(err)
                    }
                })?;

            info!("Server shut down cleanly.");
            Ok(())
        }
    }
}
