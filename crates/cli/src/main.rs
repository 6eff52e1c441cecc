//! repolens: LLM-generated summaries for public GitHub repositories.
//!
//! `repolens serve` exposes `POST /summarize` over HTTP; `repolens
//! summarize <url>` runs one request and prints the JSON summary to stdout.

use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::sync::Arc;

use repolens_github::GitHubClient;
use repolens_summarizer::ChatCompletionsClient;

mod config;
mod http;
mod service;

use config::AppConfig;
use service::SummarizeService;

#[derive(Parser)]
#[command(name = "repolens")]
#[command(about = "LLM summaries for public GitHub repositories", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the summarization API over HTTP (POST /summarize)
    Serve(ServeArgs),

    /// Summarize one repository and print the JSON summary
    Summarize(SummarizeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:7800
    #[arg(long, default_value = "127.0.0.1:7800")]
    bind: String,
}

#[derive(Args)]
struct SummarizeArgs {
    /// Repository URL, e.g. https://github.com/owner/repo
    url: String,

    /// Pretty-print the JSON summary
    #[arg(long)]
    pretty: bool,
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let service = Arc::new(build_service(&config)?);

    match cli.command {
        Commands::Serve(args) => serve(args, service).await,
        Commands::Summarize(args) => summarize_once(args, service).await,
    }
}

fn build_service(config: &AppConfig) -> Result<SummarizeService> {
    let github = GitHubClient::new(config.github_token.as_deref())
        .context("Failed to build GitHub client")?;
    let model = ChatCompletionsClient::new(config.summarizer.clone())
        .context("Failed to build summarizer client")?;
    config
        .limits
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid context limits")?;
    Ok(SummarizeService::new(github, Arc::new(model), config.limits))
}

async fn serve(args: ServeArgs, service: Arc<SummarizeService>) -> Result<()> {
    let app = http::router(service);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");

    print_stdout(&format!("Serving summarize API: {base_url}/summarize"))?;
    print_stdout(&format!("Health endpoint: {base_url}/health"))?;
    print_stdout(&format!(
        "Try: curl -X POST {base_url}/summarize -H 'Content-Type: application/json' \
         -d '{{\"repository_url\": \"https://github.com/owner/repo\"}}'"
    ))?;

    axum::serve(listener, app).await?;
    Ok(())
}

async fn summarize_once(args: SummarizeArgs, service: Arc<SummarizeService>) -> Result<()> {
    let summary = service
        .summarize_url(&args.url)
        .await
        .context("Summarization failed")?;

    let raw = if args.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    print_stdout(&raw)
}
