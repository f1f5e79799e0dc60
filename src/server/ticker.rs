use crate::{Error, journal::CommandLog};
use chrono::Local;
use log::{debug, warn};
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;

const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Periodic producer appending one wall-clock timestamp line per period as
/// a complete command.
pub(crate) struct TimestampTicker {
    log: Arc<CommandLog>,
    period: Duration,
    shutdown: CancellationToken,
}

impl TimestampTicker {
    pub fn new(log: Arc<CommandLog>, period: Duration, shutdown: CancellationToken) -> Self {
        Self {
            log,
            period,
            shutdown,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// The sleep is coalesced with the cancellation token and the flag is
    /// checked again after waking, so shutdown is honored promptly.
    async fn run(self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = sleep(self.period) => {}
            }
            if self.shutdown.is_cancelled() {
                break;
            }
            let line = format!("timestamp:{}\n", Local::now().format(TIMESTAMP_FORMAT));
            match self.log.append_chunk(line.as_bytes()).await {
                Ok(_) => debug!("appended {}", line.trim_end()),
                Err(Error::Interrupted) => break,
                Err(e) => {
                    warn!("timestamp append failed: {e}");
                    break;
                }
            }
        }
        debug!("timestamp ticker stopped");
    }
}
