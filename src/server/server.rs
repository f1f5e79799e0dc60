use crate::{
    Error, Result,
    journal::{CommandLog, FileMirror},
    server::{Acceptor, LifecycleSupervisor, ServerConfig, TimestampTicker, Worker},
};
use log::{error, info};
use std::{net::TcpListener as StdTcpListener, sync::Arc};
use tokio_util::sync::CancellationToken;

/// The network front-end: one acceptor, one worker task per connection, all
/// sharing one [`CommandLog`].
pub struct Server {
    config: ServerConfig,
    shutdown: CancellationToken,
}

impl Server {
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            shutdown: CancellationToken::new(),
        })
    }

    /// Token that requests shutdown when cancelled, in place of signal
    /// delivery.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Binds the listening socket for this configuration.
    ///
    /// Split from [`run`](Server::run) so the caller can daemonize between
    /// a successful bind and serving.
    pub fn bind(&self) -> Result<StdTcpListener> {
        Acceptor::bind(self.config.port)
    }

    /// Serves connections until the first termination signal or an external
    /// cancellation of the shutdown token, then tears down in order.
    pub async fn run(self, listener: StdTcpListener) -> Result<()> {
        let mut supervisor = LifecycleSupervisor::new(self.shutdown.clone());
        supervisor.watch_signals()?;
        self.serve(listener, supervisor).await
    }

    /// [`run`](Server::run) without the signal watch, for embedders that own
    /// the shutdown token.
    pub async fn run_with_shutdown(self, listener: StdTcpListener) -> Result<()> {
        let supervisor = LifecycleSupervisor::new(self.shutdown.clone());
        self.serve(listener, supervisor).await
    }

    async fn serve(
        self,
        listener: StdTcpListener,
        mut supervisor: LifecycleSupervisor,
    ) -> Result<()> {
        let log = Arc::new(match &self.config.backing_file {
            Some(path) => {
                let mirror = FileMirror::create(path).await?;
                info!("mirroring log to {}", mirror.path().display());
                CommandLog::with_mirror(self.config.capacity, mirror, self.shutdown.clone())
            }
            None => CommandLog::with_shutdown(self.config.capacity, self.shutdown.clone()),
        });

        if let Some(period) = self.config.timestamp_period {
            let ticker = TimestampTicker::new(log.clone(), period, self.shutdown.clone());
            supervisor.set_ticker(ticker.spawn());
        }

        let acceptor = Acceptor::new(listener, self.shutdown.clone())?;
        let result = loop {
            match acceptor.accept().await {
                Ok((stream, peer)) => {
                    info!("Accepted connection from {}", peer.ip());
                    supervisor.spawn_worker(Worker::new(
                        log.clone(),
                        stream,
                        peer,
                        self.shutdown.clone(),
                        self.config.recv_chunk_size,
                    ));
                    supervisor.reap_finished();
                }
                Err(Error::Interrupted) => break Ok(()),
                Err(e) => {
                    error!("accept failed: {e}");
                    break Err(e);
                }
            }
        };

        // close the listening socket before joining workers
        drop(acceptor);
        supervisor
            .finish(&log, self.config.backing_file.as_deref())
            .await;
        result
    }
}
