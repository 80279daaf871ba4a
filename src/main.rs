use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use report_assistant_lib::catalog::Catalog;
use report_assistant_lib::gemini::{self, GeminiConfig};
use report_assistant_lib::server::{self, ServerAppState};
use report_assistant_lib::shutdown::{register_signal_handlers, ShutdownState};

/// Report Assistant - turns bug/enhancement/requirement reports into ticket form data
#[derive(Parser, Debug)]
#[command(name = "report-assistant")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Gemini API key; without it the assistant route answers 503
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = gemini::DEFAULT_MODEL)]
    gemini_model: String,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "GEMINI_API_URL", default_value = gemini::DEFAULT_API_URL)]
    gemini_api_url: String,

    /// Timeout for a single Gemini call, in seconds
    #[arg(long, env = "GEMINI_TIMEOUT_SECS", default_value_t = gemini::DEFAULT_TIMEOUT_SECS)]
    gemini_timeout_secs: u64,

    /// Directory holding products.json and users.json
    #[arg(long, env = "CATALOG_DIR", default_value = "data")]
    catalog_dir: PathBuf,

    /// Allowed CORS origins (comma-separated); any origin when omitted
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Option<Vec<String>>,
}

fn main() {
    // .env is optional; real environment variables take precedence
    let dotenv_result = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = dotenv_result {
        if !e.not_found() {
            log::warn!("Failed to load .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(cli)) {
        log::error!("Erro ao iniciar servidor: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let shutdown_state = ShutdownState::new();
    if let Err(e) = register_signal_handlers(shutdown_state.clone()) {
        log::warn!("Failed to register signal handlers: {}", e);
    }

    let catalog = Arc::new(Catalog::load_from_dir(&cli.catalog_dir)?);

    let gemini_config = GeminiConfig::from_key(cli.gemini_api_key.as_deref()).map(|config| {
        config
            .with_model(cli.gemini_model.clone())
            .with_api_url(cli.gemini_api_url.clone())
            .with_timeout(Duration::from_secs(cli.gemini_timeout_secs))
    });
    let assistant = report_assistant_lib::build_assistant(gemini_config, catalog.clone())?;

    let state = ServerAppState::new(catalog, assistant, shutdown_state);
    server::run_server(cli.port, &cli.bind, state, cli.cors_origins).await
}
