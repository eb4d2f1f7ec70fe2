use crate::documents::CertificateOptions;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_TEMPLATE: &str = "Bopaelsattest - skabelon.docx";

#[derive(Parser, Debug)]
#[command(name = "attest", version, about = "Residence certificate (bopælsattest) generator")]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        global = true,
        env = "ATTEST_DATABASE",
        default_value = "warehouse.sqlite3",
        help = "SQLite copy of the data warehouse"
    )]
    pub database: PathBuf,
    #[arg(long, global = true, env = "ATTEST_TEMPLATE", default_value = DEFAULT_TEMPLATE)]
    pub template: PathBuf,
    #[arg(
        long,
        global = true,
        env = "ATTEST_CASE_NUMBER",
        help = "Use this case number instead of opening a Nova case"
    )]
    pub case_number: Option<String>,
    #[arg(long, global = true, env = "NOVA_DOMAIN")]
    pub nova_domain: Option<String>,
    #[arg(long, global = true, env = "NOVA_TOKEN_URL")]
    pub nova_token_url: Option<String>,
    #[arg(long, global = true, env = "NOVA_CLIENT_ID")]
    pub nova_client_id: Option<String>,
    #[arg(long, global = true, env = "NOVA_CLIENT_SECRET", hide_env_values = true)]
    pub nova_client_secret: Option<String>,
}

impl fmt::Debug for ConfigArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigArgs")
            .field("database", &self.database)
            .field("template", &self.template)
            .field("case_number", &self.case_number)
            .field("nova_domain", &self.nova_domain)
            .field("nova_token_url", &self.nova_token_url)
            .field("nova_client_id", &self.nova_client_id)
            .field(
                "nova_client_secret",
                &self.nova_client_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a certificate for one citizen to a .docx file.
    Generate {
        #[command(flatten)]
        certificate: CertificateArgs,
        #[arg(long, short, default_value = "Output.docx")]
        output: PathBuf,
    },
    /// Serve the certificate form over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Apply the warehouse schema to the configured database.
    InitDb {
        #[arg(long, default_value = "sql/schema.sql")]
        schema: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CertificateArgs {
    #[arg(long)]
    pub cpr: String,
    #[arg(
        long,
        default_value = "2015-01-01",
        help = "Address history start (YYYY-MM-DD)"
    )]
    pub from: NaiveDate,
    #[arg(long, default_value_t = false)]
    pub no_citizenship: bool,
    #[arg(long, default_value_t = false)]
    pub no_civil_status: bool,
    #[arg(long, default_value_t = false)]
    pub no_children: bool,
    #[arg(long, default_value_t = false)]
    pub no_name_history: bool,
}

impl CertificateArgs {
    pub fn options(&self) -> CertificateOptions {
        CertificateOptions {
            include_citizenship: !self.no_citizenship,
            include_civil_status: !self.no_civil_status,
            include_children: !self.no_children,
            include_name_history: !self.no_name_history,
            address_history_from: self.from,
        }
    }
}
