//! Tabletoe - unified CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tabletoe::{
    Board, DecisionTable, GameSession, Model, TableLoader, TableSource, TabletoeConfig, evaluate,
    router, select_move,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,tabletoe=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { model } => {
            initialize_file_tracing()?;
            let config = TabletoeConfig::load(&cli.config)?;
            run_play(config, model).await
        }
        Command::Serve {
            port,
            host,
            tables_dir,
        } => {
            initialize_tracing();
            let config = TabletoeConfig::load(&cli.config)?;
            run_serve(config, host, port, tables_dir).await
        }
        Command::Suggest { board, model } => {
            initialize_tracing();
            let config = TabletoeConfig::load(&cli.config)?;
            run_suggest(config, &board, model).await
        }
        Command::Models => {
            for model in <Model as strum::IntoEnumIterator>::iter() {
                println!("{:<10} {:<16} {}", model, model.label(), model.file_name());
            }
            Ok(())
        }
    }
}

/// Run the terminal UI
async fn run_play(config: TabletoeConfig, model: Option<Model>) -> Result<()> {
    let session = GameSession::from_config(&config);
    session.change_model(model.unwrap_or(*config.default_model()));
    tabletoe::tui::run_tui(session).await
}

/// Run the HTTP boundary
#[instrument(skip(config))]
async fn run_serve(
    config: TabletoeConfig,
    host: String,
    port: u16,
    tables_dir: Option<PathBuf>,
) -> Result<()> {
    let tables_dir = tables_dir.or_else(|| match TableSource::parse(config.table_source()) {
        TableSource::Directory(dir) => Some(dir),
        TableSource::Http(_) => None,
    });

    let session = GameSession::from_config(&config);
    session.change_model(*config.default_model());

    let app = router(session, tables_dir);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    info!("Server ready at http://{}:{}/", host, port);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Print the AI's view of one board
#[instrument(skip(config))]
async fn run_suggest(config: TabletoeConfig, board: &str, model: Option<Model>) -> Result<()> {
    let board = Board::parse(board).context("Invalid board")?;
    let model = model.unwrap_or(*config.default_model());

    let loader = TableLoader::new(TableSource::parse(config.table_source()));
    let table = match loader.load(model).await {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "Falling back to an empty table");
            println!("{}", e.notice());
            DecisionTable::empty()
        }
    };

    let key = table.key_for(&board);
    let values = table.values_for(&board);
    let outcome = evaluate(&board);

    println!("{}\n", board.display());
    println!("model:   {} ({} states)", model.label(), table.len());
    println!("key:     {}", key);
    println!("known:   {}", table.lookup(&key).is_some());
    println!("values:  {:?}", values);
    if outcome.is_terminal() {
        println!("result:  {}", outcome);
    }

    match select_move(&board, Some(&table), &mut rand::rng()) {
        Some(pos) => println!("choice:  {} ({})", pos.to_index(), pos),
        None => println!("choice:  none (board full)"),
    }
    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Log to a file so the terminal UI is not overwritten.
fn initialize_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create("tabletoe_tui.log").context("Failed to create log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}
