//! Entry point for the readflow CLI.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load configuration from `conf/config.toml`.
//! - Run the ingestion pipeline over a plain-text file.
//! - Print an import summary as JSON for downstream tooling.

use anyhow::{Context, Result, anyhow};
use readflow::config::load_config;
use readflow::content_filter::ContentFilter;
use readflow::ingest::{ParsedDocument, import_document};
use readflow::session::PlaybackSession;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

#[derive(Serialize)]
struct ImportSummary {
    title: String,
    author: Option<String>,
    sentences: usize,
    paragraphs: usize,
    tokens: usize,
    estimated_secs: f64,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let text_path = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %text_path.display(),
        level = %config.log_level,
        "Ingesting document"
    );

    let raw = fs::read_to_string(&text_path)
        .with_context(|| format!("Failed to read {}", text_path.display()))?;
    let source_name = text_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("book");

    let filter = ContentFilter::new(config.content_filtering.clone());
    let book = import_document(source_name, ParsedDocument::RawText(raw), &filter);

    let mut session = PlaybackSession::new(config.playback.clone());
    session.load_book(book.content.sentences.clone());
    let snapshot = session.snapshot();

    let summary = ImportSummary {
        title: book.content.title.clone(),
        author: book.content.author.clone(),
        sentences: book.content.sentences.len(),
        paragraphs: book.token_stream.paragraphs.len(),
        tokens: book.token_stream.tokens.len(),
        estimated_secs: snapshot.durations.iter().sum(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn parse_args() -> Result<PathBuf> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("Usage: readflow <path-to-text-file>"))?;

    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.as_path().display()));
    }
    Ok(path)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(filter_layer))
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
