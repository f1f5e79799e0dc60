use crate::{Error, Result};
use log::{debug, info};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener as StdTcpListener};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

const LISTEN_BACKLOG: i32 = 50;

/// The listening socket, delivering connection handles to worker tasks
/// until shutdown.
#[derive(Debug)]
pub struct Acceptor {
    listener: TcpListener,
    shutdown: CancellationToken,
}

impl Acceptor {
    /// Binds a listening socket on `port` with address reuse enabled,
    /// preferring the dual-stack wildcard and falling back to IPv4.
    ///
    /// Binding is synchronous so the network variant can daemonize between a
    /// successful bind and serving.
    pub fn bind(port: u16) -> Result<StdTcpListener> {
        let candidates: [SocketAddr; 2] = [
            (Ipv6Addr::UNSPECIFIED, port).into(),
            (Ipv4Addr::UNSPECIFIED, port).into(),
        ];
        let mut last_error = None;
        for addr in candidates {
            match Self::bind_addr(addr) {
                Ok(listener) => {
                    info!("Listening on {}", listener.local_addr()?);
                    return Ok(listener);
                }
                Err(e) => {
                    debug!("bind on {addr} failed: {e}");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| Error::Config("no usable listen address".to_owned())))
    }

    fn bind_addr(addr: SocketAddr) -> Result<StdTcpListener> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(LISTEN_BACKLOG)?;
        socket.set_nonblocking(true)?;
        Ok(socket.into())
    }

    /// Wraps an already bound listener for the running accept loop.
    pub fn new(listener: StdTcpListener, shutdown: CancellationToken) -> Result<Self> {
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener: TcpListener::from_std(listener)?,
            shutdown,
        })
    }

    /// Waits for the next connection.
    ///
    /// Fails with [`Error::Interrupted`] once shutdown is requested; that is
    /// the clean exit path of the accept loop.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(Error::Interrupted),
            accepted = self.listener.accept() => Ok(accepted?),
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}
