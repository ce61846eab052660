use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auto_sanitize::{api::create_router, config::LogFormat, Config};

#[derive(Parser)]
#[command(about = "Serve an echo API behind the request sanitization layer")]
struct Cli {
    /// Policy overrides file (.toml, .yaml, .yml or .json)
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    listen: Option<String>,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration, CLI flags win over the environment
    let mut config = Config::from_env();
    if let Some(policy) = cli.policy {
        config.policy_file = Some(policy);
    }
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }

    init_tracing(config.log_format);
    info!("Starting auto_sanitize service");

    config.validate()?;
    info!("Configuration loaded and validated");

    let sanitizer = config.load_sanitizer().map_err(|e| {
        tracing::error!("Failed to load sanitization policy: {}", e);
        e
    })?;

    let app = create_router(sanitizer, config.input_sanitization());

    info!("Listening on {}", config.listen_addr);
    let listener = TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
