mod device;

use crate::{
    Error, Result,
    journal::{Command, CommandLog, PositionCursor},
    server::{Server, ServerConfig},
};
use bytes::Bytes;
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn cmd(s: &str) -> Command {
    Command::new(Bytes::copy_from_slice(s.as_bytes()))
}

pub(crate) async fn append_all(log: &CommandLog, chunks: &[&str]) -> Result<()> {
    for chunk in chunks {
        log.append_chunk(chunk.as_bytes()).await?;
    }
    Ok(())
}

/// Repeated command-sliced reads from offset 0 until a zero-length read.
pub(crate) async fn drain_all(log: &CommandLog) -> Result<Vec<u8>> {
    let mut cursor = PositionCursor::new();
    let mut drained = Vec::new();
    loop {
        let bytes = log.read_at(&mut cursor, 1024).await?;
        if bytes.is_empty() {
            return Ok(drained);
        }
        drained.extend_from_slice(&bytes);
    }
}

/// A server for one test: ephemeral port, no backing file, no ticker unless
/// the config says otherwise.
pub(crate) fn test_config() -> ServerConfig {
    ServerConfig {
        port: 0,
        backing_file: None,
        timestamp_period: None,
        ..ServerConfig::default()
    }
}

pub(crate) struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: CancellationToken,
    pub handle: JoinHandle<Result<()>>,
}

impl TestServer {
    pub async fn spawn(config: ServerConfig) -> Result<Self> {
        init_logging();
        let server = Server::new(config)?;
        let shutdown = server.shutdown_token();
        let listener = server.bind()?;
        let mut addr = listener.local_addr()?;
        if addr.ip().is_unspecified() {
            addr.set_ip(match addr {
                SocketAddr::V4(_) => std::net::Ipv4Addr::LOCALHOST.into(),
                SocketAddr::V6(_) => std::net::Ipv6Addr::LOCALHOST.into(),
            });
        }
        let handle = tokio::spawn(server.run_with_shutdown(listener));
        Ok(Self {
            addr,
            shutdown,
            handle,
        })
    }

    pub async fn stop(self) -> Result<()> {
        self.shutdown.cancel();
        self.handle
            .await
            .map_err(|e| Error::IO(std::io::Error::other(e)))?
    }
}
