use crate::{Result, journal::CommandLog, server::Worker};
use log::{info, warn};
use std::path::Path;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

/// Owns orderly shutdown: the signal watch, worker reaping, the ticker
/// join, closing the log, and backing-file removal.
pub(crate) struct LifecycleSupervisor {
    shutdown: CancellationToken,
    workers: JoinSet<()>,
    ticker: Option<JoinHandle<()>>,
    signal_watch: Option<JoinHandle<()>>,
}

impl LifecycleSupervisor {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            shutdown,
            workers: JoinSet::new(),
            ticker: None,
            signal_watch: None,
        }
    }

    /// Cancels the shutdown token on the first SIGINT or SIGTERM. The
    /// signal path does nothing else; all teardown runs in normal task
    /// context.
    pub fn watch_signals(&mut self) -> Result<()> {
        use tokio::signal::unix::{SignalKind, signal};
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        let shutdown = self.shutdown.clone();
        self.signal_watch = Some(tokio::spawn(async move {
            tokio::select! {
                _ = interrupt.recv() => {}
                _ = terminate.recv() => {}
            }
            info!("Caught signal, exiting");
            shutdown.cancel();
        }));
        Ok(())
    }

    pub fn set_ticker(&mut self, ticker: JoinHandle<()>) {
        self.ticker = Some(ticker);
    }

    pub fn spawn_worker(&mut self, worker: Worker) {
        self.workers.spawn(worker.run());
    }

    /// Joins every worker that has already completed, without blocking.
    pub fn reap_finished(&mut self) {
        while let Some(result) = self.workers.try_join_next() {
            if let Err(e) = result {
                warn!("worker task failed: {e}");
            }
        }
    }

    /// Orderly teardown: join the ticker, join the remaining workers, close
    /// the log, remove the backing file.
    pub async fn finish(mut self, log: &CommandLog, backing_file: Option<&Path>) {
        self.shutdown.cancel();
        if let Some(ticker) = self.ticker.take() {
            if let Err(e) = ticker.await {
                warn!("ticker task failed: {e}");
            }
        }
        while let Some(result) = self.workers.join_next().await {
            if let Err(e) = result {
                warn!("worker task failed: {e}");
            }
        }
        if let Some(watch) = self.signal_watch.take() {
            watch.abort();
        }
        log.close().await;
        if let Some(path) = backing_file {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("removal of {} failed: {e}", path.display());
            }
        }
    }
}
