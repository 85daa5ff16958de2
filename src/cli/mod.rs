pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendSettings, RestAuthClient, RestTableClient};
use crate::error::AdminResult;
use crate::services::{PdvService, UserService};

#[derive(Parser)]
#[command(name = "pdv-admin")]
#[command(about = "Administration of users and points of sale on the hosted backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "User management")]
    Usuarios {
        #[command(subcommand)]
        cmd: commands::usuarios::UsuarioCommands,
    },

    #[command(about = "Point-of-sale management")]
    Pdvs {
        #[command(subcommand)]
        cmd: commands::pdvs::PdvCommands,
    },

    #[command(about = "Check whether a value is a usable record id")]
    CheckId {
        #[arg(help = "Value to check", allow_hyphen_values = true)]
        value: String,
    },

    #[command(about = "Load users and points of sale together and summarize them")]
    Dashboard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Services wired to the hosted backend named in the environment
pub fn connect() -> AdminResult<(UserService<RestTableClient, RestAuthClient>, PdvService<RestTableClient>)> {
    let settings = BackendSettings::from_config(crate::config::config())?;
    let table = RestTableClient::new(settings.clone())?;
    let auth = RestAuthClient::new(settings)?;
    Ok((UserService::new(table.clone(), auth), PdvService::new(table)))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Usuarios { cmd } => commands::usuarios::handle(cmd, output_format).await,
        Commands::Pdvs { cmd } => commands::pdvs::handle(cmd, output_format).await,
        Commands::CheckId { value } => commands::check_id::handle(value, output_format),
        Commands::Dashboard => commands::dashboard::handle(output_format).await,
    }
}
