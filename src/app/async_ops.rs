//! Async operations for the TUI
//!
//! Uses channels to communicate between the sync TUI loop and the worker.
//! The worker only talks to the network; fetched articles travel back over
//! the result channel and are ingested on the owner thread, so every store
//! write stays with the single state owner.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::fetch::{ArticleSource, Fetcher};
use crate::models::Article;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum AsyncCommand {
    /// Fetch the full feed
    RefreshFeed,
    /// Fetch the feed scoped to today's entries
    RefreshToday,
    /// Download a paper's PDF
    DownloadPaper { paper_id: String },
    /// Scrape the full abstract for an article
    FetchAbstract { link: String, paper_id: String },
    /// Shutdown the worker
    Shutdown,
}

/// Results sent back from the async worker to the TUI
#[derive(Debug)]
pub enum AsyncResult {
    /// Feed fetched; articles are ingested by the owner thread
    Fetched { articles: Vec<Article> },
    /// PDF download finished
    Downloaded { paper_id: String, ok: bool },
    /// Abstract scrape finished (empty text on failure)
    AbstractFetched { link: String, text: String },
    /// Status message (for progress updates)
    Status { message: String },
}

/// Channel handles for communicating with the async worker
pub struct AsyncHandle {
    /// Send commands to the worker
    pub cmd_tx: mpsc::Sender<AsyncCommand>,
    /// Receive results from the worker
    pub result_rx: mpsc::Receiver<AsyncResult>,
}

/// Spawn the async worker and return handles.
///
/// Fails if the fetcher cannot be constructed (download path collision).
pub fn spawn_worker(topics: Vec<String>, download_dir: PathBuf) -> Result<AsyncHandle> {
    let fetcher = Arc::new(Fetcher::new(topics, &download_dir)?);

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<AsyncCommand>(32);
    let (result_tx, result_rx) = mpsc::channel::<AsyncResult>(32);

    // Spawn the worker task
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                AsyncCommand::Shutdown => break,
                AsyncCommand::RefreshFeed => {
                    handle_refresh(&result_tx, &fetcher, false).await;
                }
                AsyncCommand::RefreshToday => {
                    handle_refresh(&result_tx, &fetcher, true).await;
                }
                AsyncCommand::DownloadPaper { paper_id } => {
                    handle_download(&result_tx, &fetcher, paper_id).await;
                }
                AsyncCommand::FetchAbstract { link, paper_id } => {
                    handle_abstract(&result_tx, &fetcher, link, paper_id).await;
                }
            }
        }
    });

    Ok(AsyncHandle { cmd_tx, result_rx })
}

async fn handle_refresh(
    result_tx: &mpsc::Sender<AsyncResult>,
    fetcher: &Arc<Fetcher>,
    today_only: bool,
) {
    let _ = result_tx
        .send(AsyncResult::Status {
            message: "Refreshing feed...".to_string(),
        })
        .await;

    let fetcher = Arc::clone(fetcher);
    let articles = tokio::task::spawn_blocking(move || {
        if today_only {
            fetcher.fetch_today()
        } else {
            fetcher.fetch()
        }
    })
    .await
    .unwrap_or_default();

    let _ = result_tx.send(AsyncResult::Fetched { articles }).await;
}

async fn handle_download(
    result_tx: &mpsc::Sender<AsyncResult>,
    fetcher: &Arc<Fetcher>,
    paper_id: String,
) {
    let _ = result_tx
        .send(AsyncResult::Status {
            message: format!("Downloading {paper_id}..."),
        })
        .await;

    let fetcher = Arc::clone(fetcher);
    let id = paper_id.clone();
    let ok = tokio::task::spawn_blocking(move || {
        let filename = format!("{id}.pdf");
        fetcher.download_paper(&id, &filename)
    })
    .await
    .unwrap_or(false);

    let _ = result_tx.send(AsyncResult::Downloaded { paper_id, ok }).await;
}

async fn handle_abstract(
    result_tx: &mpsc::Sender<AsyncResult>,
    fetcher: &Arc<Fetcher>,
    link: String,
    paper_id: String,
) {
    let fetcher = Arc::clone(fetcher);
    let text = tokio::task::spawn_blocking(move || fetcher.paper_abstract(&paper_id))
        .await
        .unwrap_or_default();

    let _ = result_tx.send(AsyncResult::AbstractFetched { link, text }).await;
}
