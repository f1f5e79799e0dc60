use crate::{
    Error, Result,
    journal::{CommandLog, PositionCursor, TERMINATOR},
};
use bytes::BytesMut;
use log::{debug, error, info};
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};
use tokio_util::sync::CancellationToken;

/// One connection worker: receives chunks, appends them to the shared log as
/// a single producer identity, and streams the entire log back after every
/// chunk ending in the terminator.
pub(crate) struct Worker {
    log: Arc<CommandLog>,
    stream: TcpStream,
    peer: SocketAddr,
    shutdown: CancellationToken,
    chunk_size: usize,
}

impl Worker {
    pub fn new(
        log: Arc<CommandLog>,
        stream: TcpStream,
        peer: SocketAddr,
        shutdown: CancellationToken,
        chunk_size: usize,
    ) -> Self {
        Self {
            log,
            stream,
            peer,
            shutdown,
            chunk_size,
        }
    }

    /// Runs the worker until the client closes its write side, a socket or
    /// log error occurs, or shutdown is requested. Failures terminate only
    /// this worker.
    pub async fn run(mut self) {
        match self.serve().await {
            Ok(()) | Err(Error::Interrupted) => {}
            Err(e) => error!("connection from {} failed: {e}", self.peer),
        }
        info!("Closed connection from {}", self.peer.ip());
    }

    async fn serve(&mut self) -> Result<()> {
        let mut chunk = BytesMut::with_capacity(self.chunk_size);
        loop {
            chunk.clear();
            let received = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return Err(Error::Interrupted),
                received = self.stream.read_buf(&mut chunk) => received?,
            };
            if received == 0 {
                // client closed its write side
                return Ok(());
            }
            self.log.append_chunk(&chunk).await?;
            if chunk.last() == Some(&TERMINATOR) {
                self.drain().await?;
            }
        }
    }

    /// Streams the entire current log to the client, one command tail per
    /// read, from a fresh cursor at offset 0 until a zero-length read.
    async fn drain(&mut self) -> Result<()> {
        debug!("draining log to {}", self.peer);
        let mut cursor = PositionCursor::new();
        loop {
            let bytes = self.log.read_at(&mut cursor, self.chunk_size).await?;
            if bytes.is_empty() {
                return Ok(());
            }
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return Err(Error::Interrupted),
                sent = self.stream.write_all(&bytes) => sent?,
            }
        }
    }
}
