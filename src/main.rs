use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod cli;

use agency_admin::api::{ApiClient, ApiError};
use agency_admin::config::Config;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "agency_admin=info");
    }

    let cli = Cli::parse();
    init_logging(cli.command.is_tui());

    let config = Config::from_env()?;
    config.validate()?;
    info!("Using API at {}", config.api_base());

    let client = ApiClient::new(&config)?;

    if let Err(e) = cli::execute(cli.command, &config, client).await {
        error!("Command failed: {:#}", e);
        if e
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_unauthorized)
        {
            error!("Session rejected. Run `agency-admin login` or set AGENCY_API_TOKEN");
        }
        return Err(e);
    }
    Ok(())
}

/// Log to stderr and `agency-admin.log`; the dashboard logs to the file only
fn init_logging(file_only: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(".", "agency-admin.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env());

    let stderr_layer = (!file_only).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
