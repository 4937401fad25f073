use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod layout;
mod llm;
mod models;
mod server;

#[derive(Parser, Debug)]
#[command(name = "ocr-layout-server")]
#[command(about = "Reconstructs document layout from OCR fragments and renders Markdown")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "OCR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "OCR_PORT", default_value = "8004")]
    pub port: u16,

    /// Maximum request body size in bytes (default: 10MB)
    #[arg(long, env = "OCR_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Comma separated list of allowed CORS origins, or "*"
    #[arg(long, env = "OCR_ALLOWED_ORIGINS", default_value = "*")]
    pub allowed_origins: String,

    /// Fraction of the average line height within which fragments share a line
    #[arg(long, env = "OCR_LINE_THRESHOLD_RATIO", default_value = "0.5")]
    pub line_threshold_ratio: f64,

    /// Multiple of the average line gap that starts a new paragraph
    #[arg(long, env = "OCR_PARAGRAPH_GAP_RATIO", default_value = "1.5")]
    pub paragraph_gap_ratio: f64,

    /// Base URL of an OpenAI compatible API used for LLM formatting
    #[arg(long, env = "LLM_BASE_URL")]
    pub llm_base_url: Option<String>,

    /// API key for the LLM endpoint
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Model name sent to the LLM endpoint
    #[arg(long, env = "LLM_MODEL", default_value = "gpt-4o-mini")]
    pub llm_model: String,

    /// LLM request timeout in seconds
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value = "30")]
    pub llm_timeout_secs: u64,

    /// Maximum number of tokens the LLM may produce
    #[arg(long, env = "LLM_MAX_TOKENS", default_value = "4096")]
    pub llm_max_tokens: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!("Starting ocr-layout-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Binding to {}:{}", config.host, config.port);
    if config.llm.is_configured() {
        tracing::info!("LLM formatting enabled with model {}", config.llm.model);
    }

    server::run(config).await
}
