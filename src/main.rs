use anyhow::Result;
use arcane_eye::app::{App, DescribeRequest};
use arcane_eye::config::ClientConfig;
use arcane_eye::http::RetryPolicy;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "arcane-eye")]
#[command(about = "Describe an image with a Gemini vision model")]
struct CliArgs {
    /// Image to describe (jpeg, png or webp).
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Follow-up question appended to the default instruction.
    #[arg(short, long)]
    question: Option<String>,

    /// Override the detected MIME type, e.g. image/png.
    #[arg(long)]
    mime_type: Option<String>,

    /// API key. Falls back to GEMINI_API_KEY.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model ID. Falls back to GEMINI_MODEL.
    #[arg(long)]
    model: Option<String>,

    /// Total attempts per request.
    #[arg(long)]
    max_retries: Option<u32>,

    /// Initial backoff delay in milliseconds; doubles after each retry.
    #[arg(long)]
    base_delay_ms: Option<u64>,

    /// Per-attempt timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl CliArgs {
    /// Environment variables shadowed by a flag on this command line.
    fn overridden_vars(&self) -> Vec<&'static str> {
        let mut vars = Vec::new();
        if self.model.is_some() {
            vars.push("GEMINI_MODEL");
        }
        if self.max_retries.is_some() {
            vars.push("GEMINI_MAX_RETRIES");
        }
        if self.base_delay_ms.is_some() {
            vars.push("GEMINI_RETRY_BASE_DELAY_MS");
        }
        if self.timeout_secs.is_some() {
            vars.push("GEMINI_TIMEOUT_SECS");
        }
        vars
    }

    /// Build the client config from `lookup`, with flags taking precedence.
    /// A variable a flag overrides is never read, so a bad value there
    /// cannot fail the run.
    fn config<F>(&self, lookup: F) -> arcane_eye::Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overridden = self.overridden_vars();
        let config = ClientConfig::from_lookup(|key| {
            if overridden.iter().any(|var| *var == key) {
                None
            } else {
                lookup(key)
            }
        })?;
        Ok(self.apply(config))
    }

    fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if self.max_retries.is_some() || self.base_delay_ms.is_some() {
            let retry = RetryPolicy::new(
                self.max_retries.unwrap_or(config.retry.max_retries),
                self.base_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(config.retry.base_delay),
            );
            config = config.with_retry(retry);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    fn request(&self) -> DescribeRequest {
        DescribeRequest {
            image_path: self.image.clone(),
            mime_type: self.mime_type.clone(),
            question: self.question.clone(),
            credential: self.api_key.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcane_eye=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load .env before clap so GEMINI_API_KEY can come from it.
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();
    let config = args.config(|key| std::env::var(key).ok())?;
    let app = App::new(config);

    match app.describe(&args.request()).await {
        Ok(answer) => {
            println!("{}", answer);
            info!("Description completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Description failed: {}", e);
            std::process::exit(1);
        }
    }
}
