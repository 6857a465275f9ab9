//! docs-builder: build a grouped JSON documentation artifact from
//! JSDoc-annotated JavaScript sources.
//!
//! Pipeline: list sources → extract records (one file at a time) → assemble
//! entries → group by category → append static docs → write JSON.
//!
//! `docs-builder` with no arguments reads `./docs.toml` and writes
//! `./dist/<name>.json`.

mod assemble;
mod config;
mod error;
mod group;
mod lister;
mod model;
mod params;
mod parser;
mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docs-builder",
    about = "Build a grouped JSON documentation artifact from JSDoc-annotated sources"
)]
struct Cli {
    /// Documentation config file. Relative paths inside it resolve against
    /// its directory.
    #[arg(short = 'c', long, default_value = "docs.toml")]
    config: PathBuf,

    /// Log every file and skipped block
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    run(&cli).await
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("docs_builder={}", level)))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let config = config::DocsConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let root = config::project_root(&cli.config);

    let files = lister::list_sources(&root, &config.sources)?;
    tracing::info!(files = files.len(), "scanning sources");

    let engine = parser::create_engine(&config.engine);
    let records = parser::extract_all(engine.as_ref(), &files)
        .await
        .context("comment extraction failed")?;
    tracing::info!(records = records.len(), engine = engine.name(), "extracted records");

    let entries = records
        .into_iter()
        .map(|record| assemble::assemble(record, &config.package))
        .collect::<Vec<_>>();

    let grouped = group::group(entries, &config.groups).context("grouping failed")?;
    let grouped = group::inject_static(grouped, &config.static_docs, &root)
        .await
        .context("static docs failed")?;

    let out_path = config.output_path(&root);
    writer::write_docs(&grouped, &out_path, config.output.pretty)?;
    Ok(())
}
