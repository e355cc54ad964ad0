//! answer-chart CLI - Serve, fetch and preview answer charts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{debug, info, warn};

mod client;
mod error;
mod page;
mod server;
mod store;

use answer_chart_core::SeriesPayload;
use client::AnswerClient;
use page::PageConfig;
use store::SeriesStore;

/// answer-chart: answer data endpoint and chart preview tools
#[derive(Parser, Debug)]
#[command(name = "answer-chart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve /api/answer-data/{answer_id} and static files
    Serve(ServeArgs),
    /// Fetch an answer's series from a running server
    Fetch(FetchArgs),
    /// Store a series payload for an answer
    Store(StoreArgs),
    /// Generate a preview page with one chart per answer
    Page(PageArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    #[arg(long, env = "ANSWER_CHART_ADDR", default_value = "127.0.0.1:5000")]
    addr: SocketAddr,

    #[arg(long, env = "ANSWER_CHART_STORE", default_value = "data/answer-series.json")]
    store: PathBuf,

    /// Directory served for every other path (preview page, wasm package)
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FetchArgs {
    answer_id: String,

    #[arg(long, env = "ANSWER_CHART_URL", default_value = "http://127.0.0.1:5000")]
    base_url: String,

    /// Print the raw payload instead of a summary
    #[arg(long, default_value = "false")]
    json: bool,
}

#[derive(Parser, Debug)]
struct StoreArgs {
    answer_id: String,

    /// JSON file with {"x": [...], "y": [...]}
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    #[arg(long, env = "ANSWER_CHART_STORE", default_value = "data/answer-series.json")]
    store: PathBuf,
}

#[derive(Parser, Debug)]
struct PageArgs {
    /// Answer ids to chart
    #[arg(short, long = "answer", required = true)]
    answers: Vec<String>,

    #[arg(short, long, default_value = "dist/index.html")]
    output: PathBuf,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    x_label: Option<String>,

    #[arg(long)]
    y_label: Option<String>,

    #[arg(long, default_value = "false")]
    dark: bool,

    /// Draw with the built-in canvas renderer instead of Chart.js
    #[arg(long, default_value = "false")]
    no_chartjs: bool,

    #[arg(long)]
    module_path: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => serve_command(args),
        Commands::Fetch(args) => fetch_command(args),
        Commands::Store(args) => store_command(args),
        Commands::Page(args) => page_command(args),
    }
}

fn serve_command(args: ServeArgs) -> Result<()> {
    let store = SeriesStore::load_from_file(&args.store)
        .with_context(|| format!("Failed to load series store: {:?}", args.store))?;
    if store.is_empty() {
        info!(
            "No stored series, only the demo answer {} is available",
            store::DEMO_ANSWER_ID
        );
    } else {
        info!("Loaded {} series from {:?}", store.len(), args.store);
    }

    if let Some(ref dir) = args.static_dir {
        if !dir.is_dir() {
            warn!("Static directory {:?} does not exist", dir);
        }
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(server::serve(
            args.addr,
            server::AppState::new(store),
            args.static_dir,
        ))
        .with_context(|| format!("Server on {} failed", args.addr))?;

    Ok(())
}

fn fetch_command(args: FetchArgs) -> Result<()> {
    let client = AnswerClient::new(&args.base_url)
        .with_context(|| format!("Invalid base URL: {}", args.base_url))?;
    debug!("GET {}", client.url_for(&args.answer_id)?);

    match client.fetch(&args.answer_id) {
        Ok(payload) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}", client::summarize(&args.answer_id, &payload));
            }
            Ok(())
        }
        Err(error::Error::Core(e)) => {
            // same wording the page would show
            anyhow::bail!("{}", e.notice().text)
        }
        Err(e) => Err(e.into()),
    }
}

fn store_command(args: StoreArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read payload file: {:?}", args.file))?;
    let payload = SeriesPayload::from_json(&content)
        .with_context(|| format!("Invalid payload in {:?}", args.file))?;

    if payload.x.len() != payload.y.len() {
        warn!(
            "x has {} entries but y has {}",
            payload.x.len(),
            payload.y.len()
        );
    }

    let mut store = SeriesStore::load_from_file(&args.store)
        .with_context(|| format!("Failed to load series store: {:?}", args.store))?;
    let points = payload.len();

    if store.insert(&args.answer_id, payload).is_some() {
        info!("Replaced series for answer {}", args.answer_id);
    }
    store
        .save_to_file(&args.store)
        .with_context(|| "Failed to save series store")?;

    info!(
        "Stored {} points for answer {} in {:?}",
        points, args.answer_id, args.store
    );
    Ok(())
}

fn page_command(args: PageArgs) -> Result<()> {
    let defaults = PageConfig::default();
    let config = PageConfig {
        title: args.title.unwrap_or(defaults.title),
        chartjs_url: if args.no_chartjs { None } else { defaults.chartjs_url },
        module_path: args.module_path.unwrap_or(defaults.module_path),
        dark: args.dark,
        x_label: args.x_label,
        y_label: args.y_label,
    };

    page::write_page(&args.answers, &config, &args.output)
        .with_context(|| format!("Failed to write page: {:?}", args.output))?;

    info!(
        "Generated {:?} with {} chart(s)",
        args.output,
        args.answers.len()
    );
    info!("Build the loader with: wasm-pack build crates/web --target web");
    Ok(())
}
