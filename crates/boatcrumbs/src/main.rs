mod report;
mod routes;
mod source;
mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use boatcrumbs_core::{summary::TrackSummary, PipelineConfig, PipelineMode, TrackPipeline};
use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use source::FileFixSource;
use state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Vessel track cleaning and speed annotation", long_about = None)]
struct Cli {
    /// Optional TOML file with pipeline settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Annotate a fix dump and print the track as JSON
    Process(ProcessArgs),
    /// Print segment and idle-stop tables for a fix dump
    Summary(InputArgs),
    /// Serve the track over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// JSON array or CSV dump of raw fixes
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Annotate every sample against its predecessor without coalescing dwell
    #[arg(long)]
    pairwise: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// JSON array or CSV dump of raw fixes
    #[arg(long)]
    fixes: PathBuf,
    #[arg(long, default_value = "0.0.0.0:3000")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Process(args) => handle_process(args, config).await,
        Command::Summary(args) => handle_summary(args, config).await,
        Command::Serve(args) => handle_serve(args, config).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let config = config
        .with_env_overrides()
        .context("invalid BOATCRUMBS_* environment override")?;
    info!(look_back = %config.look_back, "Pipeline configured");
    Ok(config)
}

async fn handle_process(args: ProcessArgs, config: PipelineConfig) -> Result<()> {
    let source = FileFixSource::load(&args.input.input).await?;
    let mode = if args.pairwise {
        PipelineMode::Pairwise
    } else {
        PipelineMode::Coalesce
    };

    let positions = TrackPipeline::new(config)
        .run(mode, source.all().iter().cloned())
        .with_context(|| format!("failed to process {}", source.path().display()))?;

    println!("{}", serde_json::to_string_pretty(&positions)?);
    Ok(())
}

async fn handle_summary(args: InputArgs, config: PipelineConfig) -> Result<()> {
    let source = FileFixSource::load(&args.input).await?;
    let pipeline = TrackPipeline::new(config);
    let positions = pipeline
        .process(source.all().iter().cloned())
        .with_context(|| format!("failed to process {}", source.path().display()))?;
    let summary = TrackSummary::build(&positions, pipeline.config());

    println!(
        "{} fixes, {:.2} miles, max {:.1} knots",
        summary.fix_count, summary.total_distance_miles, summary.max_knots
    );
    println!("{}", report::segments_table(&summary));
    if summary.stops.is_empty() {
        println!("No idle stops.");
    } else {
        println!("{}", report::stops_table(&summary));
    }
    Ok(())
}

async fn handle_serve(args: ServeArgs, config: PipelineConfig) -> Result<()> {
    let source = FileFixSource::load(&args.fixes).await?;
    let state = AppState::new(Arc::new(source), TrackPipeline::new(config));
    let router = routes::router(state);

    let listener = TcpListener::bind(args.addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
