/*!
ringlog is a newline-delimited, append-only command log behind two
front-ends: a TCP server and a character-device-style byte-stream handle.

# Model
Writes from any producer accumulate by newline into discrete *commands*.
Completed commands live in a fixed-capacity circular buffer that evicts the
oldest command when capacity is exceeded. The full log can be read back at
any time by any client as the FIFO concatenation of resident commands.

# Modules
* [`journal`]: the core circular command buffer, the write assembler, the
  [`CommandLog`](journal::CommandLog) facade serializing all access,
  per-handle cursors, and the optional backing-file mirror.
* [`server`]: the TCP front-end, with an acceptor, per-connection workers
  that echo the entire log after every terminated write, the periodic
  timestamp producer, and lifecycle supervision.
* [`device`]: the byte-stream handle adapter with read/write/seek and
  seek-to-command semantics.

# Basic usage

```no_run
use ringlog::{
    Result,
    server::{Server, ServerConfig},
};

fn main() -> Result<()> {
    let server = Server::new(ServerConfig::default())?;
    let listener = server.bind()?;

    tokio::runtime::Runtime::new()?.block_on(server.run(listener))
}
```

Embedders can skip the server entirely and drive a shared log through
device handles:

```
use ringlog::{Result, device::DeviceHandle, journal::CommandLog};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let log = Arc::new(CommandLog::new(10));

    let mut handle = DeviceHandle::open(log.clone());
    handle.write(b"hello\n").await?;

    let mut buf = [0u8; 16];
    let count = handle.read(&mut buf).await?;
    assert_eq!(&buf[..count], b"hello\n");

    Ok(())
}
```
*/

pub mod device;
mod error;
pub mod journal;
pub mod server;

pub use error::*;

/// Library general result type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests;
