//! Neuro Query - Entry Point
//!
//! Loads the term vocabulary, then reads commands from stdin.

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use neuro_query::repl::{self, OutputFormat, Session};
use neuro_query::{Config, NeuroQueryClient, QueryPipeline, TermCatalog};

#[derive(Parser, Debug)]
#[command(name = "neuro-query")]
#[command(about = "Build study queries from a term vocabulary")]
#[command(version)]
struct Cli {
    /// Backend API base URL [default: $NEURO_QUERY_API_BASE, else http://localhost:8000/api]
    #[arg(long)]
    api_base: Option<String>,

    /// Output format for panels
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // stdout carries the panels
    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let config = match cli.api_base.as_deref() {
        Some(base) => Config::new(base)?,
        None => Config::from_env()?,
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api_base = %config.api_base,
        "Starting neuro-query"
    );

    let client = Arc::new(NeuroQueryClient::new(config)?);

    let mut catalog = TermCatalog::new();
    catalog.load(client.as_ref()).await;

    let pipeline = QueryPipeline::new(client);
    let session = Session::new(catalog, pipeline, cli.format);

    let mut stdout = tokio::io::stdout();
    let intro = format!("{}\n\n{}\n", session.render_terms(), repl::HELP);
    stdout.write_all(intro.as_bytes()).await?;
    stdout.flush().await?;

    repl::run(session, BufReader::new(tokio::io::stdin()), stdout).await
}
