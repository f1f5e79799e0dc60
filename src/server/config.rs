use crate::{Error, Result, journal::DEFAULT_CAPACITY};
use std::{path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_BACKING_PATH: &str = "/var/tmp/aesdsocketdata";
const DEFAULT_TIMESTAMP_PERIOD: Duration = Duration::from_secs(10);
const DEFAULT_RECV_CHUNK_SIZE: usize = 1024;

/// Configuration options for a [`Server`](crate::server::Server)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port the acceptor listens on; `0` picks an ephemeral port.
    ///
    /// The default is 9000
    pub port: u16,
    /// Command capacity of the circular buffer.
    ///
    /// The default is 10
    pub capacity: usize,
    /// Size of one socket receive chunk, also the cap on one drain read.
    ///
    /// The default is 1024
    pub recv_chunk_size: usize,
    /// Path of the backing file mirroring the accepted byte stream, removed
    /// on shutdown.
    ///
    /// `None` runs the server without persistent state, for deployments
    /// where a character-device adapter owns the storage surface.
    ///
    /// The default is `/var/tmp/aesdsocketdata`
    pub backing_file: Option<PathBuf>,
    /// Period of the wall-clock timestamp producer; `None` disables it.
    ///
    /// The default is 10 seconds
    pub timestamp_period: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            capacity: DEFAULT_CAPACITY,
            recv_chunk_size: DEFAULT_RECV_CHUNK_SIZE,
            backing_file: Some(PathBuf::from(DEFAULT_BACKING_PATH)),
            timestamp_period: Some(DEFAULT_TIMESTAMP_PERIOD),
        }
    }
}

impl ServerConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Config("capacity must be at least 1".to_owned()));
        }
        if self.recv_chunk_size == 0 {
            return Err(Error::Config(
                "recv_chunk_size must be at least 1".to_owned(),
            ));
        }
        if self.timestamp_period == Some(Duration::ZERO) {
            return Err(Error::Config(
                "timestamp_period must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }
}
