//! FileForge — file conversion gateway.
//!
//! CLI entry point: validates a local file against its declared category,
//! hands it to the external converter, and writes the artifact.

use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

use fileforge_core::config::GatewayConfig;
use fileforge_core::error::AppError;
use fileforge_gateway::{ConversionGateway, UploadedPayload};

/// Convert a file through the validation-and-conversion pipeline.
#[derive(Debug, Parser)]
#[command(name = "fileforge", version, about)]
struct Cli {
    /// File to convert.
    input: PathBuf,

    /// Declared category: image, video, audio, or document.
    #[arg(short, long)]
    category: String,

    /// Target format handed to the converter (e.g. jpeg, pdf, mp4).
    #[arg(short = 'f', long)]
    format: String,

    /// Where to write the artifact. Defaults to the input name with the
    /// target format as extension, in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Declared MIME type. Only consulted for plain text, which has no
    /// magic bytes; content is otherwise sniffed.
    #[arg(long, default_value = "application/octet-stream")]
    mime: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env = std::env::var("FILEFORGE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match GatewayConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Conversion failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &GatewayConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Drive one conversion through the gateway.
async fn run(cli: Cli, config: GatewayConfig) -> Result<(), AppError> {
    tracing::info!("Starting FileForge v{}", env!("CARGO_PKG_VERSION"));

    let file_name = cli
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let data = tokio::fs::read(&cli.input).await?;

    let gateway = ConversionGateway::new(&config)?;
    let payload = UploadedPayload::new(data, file_name, cli.mime.clone());

    // Ctrl-C kills the in-flight converter instead of orphaning it
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling conversion");
                cancel.cancel();
            }
        });
    }

    let artifact = gateway
        .convert_with_cancel(payload, &cli.category, &cli.format, cancel)
        .await
        .map_err(AppError::from)?;

    let output = cli.output.unwrap_or_else(|| {
        let stem = cli
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("converted");
        PathBuf::from(format!("{stem}.{}", cli.format))
    });

    let copy_result = tokio::fs::copy(artifact.path(), &output).await;
    artifact
        .release()
        .await
        .map_err(|e| AppError::storage(format!("Failed to release artifact: {e}")))?;
    copy_result?;

    tracing::info!(
        output = %output.display(),
        "Conversion complete"
    );
    println!("{}", output.display());
    Ok(())
}
