use clap::Parser;
use pdv_admin::cli::{utils::output_error, Cli, OutputFormat};
use pdv_admin::error::AdminError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so BACKEND_URL and BACKEND_ANON_KEY can live there
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = pdv_admin::cli::run(cli).await {
        match e.downcast_ref::<AdminError>() {
            Some(admin_error) => output_error(&output_format, admin_error)?,
            None => match std::env::var("CLI_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            },
        }
        std::process::exit(1);
    }

    Ok(())
}
