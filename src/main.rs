mod config;
mod models;
mod render;
mod search;
mod widget;

use anyhow::Context;
use config::Config;
use search::HttpSearchService;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use widget::{ResultsContainer, SearchWidget};

/// Results container that writes every new content as one line, stdout in
/// practice. Write failures (a closed pipe, say) are logged, never fatal.
struct WriterContainer<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> WriterContainer<W> {
    fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> ResultsContainer for WriterContainer<W> {
    fn replace_content(&self, html: String) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{}", html).and_then(|_| out.flush()) {
            warn!("Failed to write results: {}", e);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries rendered HTML
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("🏢 Unit Search");
    info!("=============");

    let config = Config::load();
    info!("Searching via {}", config.search_url());
    info!("Type a term per line; an empty line restores the initial view");

    let service = HttpSearchService::new(&config).context("Failed to create search service")?;

    let (edits, input) = mpsc::unbounded_channel();
    let container = WriterContainer::new(io::stdout());
    let (_widget, listener) =
        SearchWidget::initialize(Arc::new(service), Arc::new(container), input);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read search input")?
    {
        if edits.send(line).is_err() {
            break;
        }
    }

    drop(edits);
    listener.await.context("Search listener stopped unexpectedly")?;

    info!("Input closed, bye");
    Ok(())
}
