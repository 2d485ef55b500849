//! CLI entrypoint for enzymeml-llm
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod logging;

use anyhow::{Context, Result, bail};
use clap::Parser;
use commands::{Cli, Command};
use enzymeml_application::{
    ChainConfig, ChainObserver, DatabaseSearchTool, EventSink, Scheduler, ToolExecutor,
    ToolRegistry,
};
use enzymeml_domain::{DATABASE_SEARCH_TOOL, Database, Model, ToolCall};
use enzymeml_infrastructure::{
    CompositeChainObserver, ConfigLoader, FileConfig, JsonlChainLogger, RestRecordFetcher,
    TracingChainObserver,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    let _log_guard = logging::init(cli.verbose, config.logging.log_dir.as_deref().map(Path::new))?;
    info!("Starting enzymeml-tools");

    match cli.command {
        Command::Config => show_config(&config, cli.config.as_ref()),
        Command::Tools => show_tools(&config),
        Command::Fetch {
            database,
            ids,
            split,
            events,
        } => fetch(&config, &database, ids, split, events).await,
    }
}

fn show_config(config: &FileConfig, explicit: Option<&PathBuf>) -> Result<()> {
    println!("Configuration sources (in priority order):");
    for line in ConfigLoader::describe_sources(explicit) {
        println!("{}", line);
    }
    println!();
    println!("{}", toml::to_string_pretty(config)?);

    let problems = config.validate();
    if !problems.is_empty() {
        println!("Problems:");
        for problem in &problems {
            println!("  - {}", problem);
        }
    }
    Ok(())
}

fn registry(config: &FileConfig) -> Result<ToolRegistry> {
    let fetcher = RestRecordFetcher::new(&config.databases)?;
    Ok(ToolRegistry::new().with_default_tool(DatabaseSearchTool::handler(Arc::new(fetcher))))
}

fn show_tools(config: &FileConfig) -> Result<()> {
    let specs: Vec<_> = registry(config)?
        .specs()
        .iter()
        .map(|spec| spec.to_api_tool())
        .collect();
    println!("{}", serde_json::to_string_pretty(&specs)?);
    Ok(())
}

fn observer(config: &FileConfig, events: Option<PathBuf>) -> Option<Arc<dyn ChainObserver>> {
    let mut composite = CompositeChainObserver::new();
    if config.logging.trace_events {
        composite.push(Arc::new(TracingChainObserver::new()));
    }

    let path = events.or_else(|| config.logging.jsonl_path.as_ref().map(PathBuf::from));
    if let Some(path) = path {
        match JsonlChainLogger::new(&path) {
            Some(logger) => {
                info!("Writing chain events to {}", logger.path().display());
                composite.push(Arc::new(logger));
            }
            None => warn!("Chain event log disabled"),
        }
    }

    if composite.is_empty() {
        None
    } else {
        Some(Arc::new(composite))
    }
}

async fn fetch(
    config: &FileConfig,
    database: &str,
    ids: Vec<String>,
    split: bool,
    events: Option<PathBuf>,
) -> Result<()> {
    let database: Database = database.parse()?;
    let chain: ChainConfig = config
        .to_chain_config()
        .context("Invalid configuration")?;

    let executor = Arc::new(ToolExecutor::new(
        Arc::new(registry(config)?),
        chain.execution.clone(),
    ));
    let scheduler = Scheduler::new(executor, chain.scheduler.clone());
    let sink = EventSink::new(chain.context(&Model::default()), observer(config, events));

    let batches: Vec<Vec<String>> = if split {
        ids.into_iter().map(|id| vec![id]).collect()
    } else {
        vec![ids]
    };
    let calls = batches
        .into_iter()
        .enumerate()
        .map(|(index, ids)| {
            let arguments = json!({ "database": database, "ids": ids });
            ToolCall::new(format!("cli_{}", index + 1), DATABASE_SEARCH_TOOL, arguments.to_string())
                .with_index(index)
        })
        .collect();

    let results = scheduler.run(calls, &sink).await;
    println!("{}", serde_json::to_string_pretty(&results)?);

    if results.iter().all(|r| !r.is_success()) {
        bail!("No {} lookup succeeded", database.display_name());
    }
    Ok(())
}
