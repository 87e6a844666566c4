//! TCP front end: one request line in, one response line out, per connection.
use crate::handler::RequestHandler;
use log::{debug, error, info};
use quote_common::protocol::{MAX_REQUEST_BYTES, encode_line};
use quote_common::{QuoteError, Result};
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long a connection may stay silent (or stall a write) before it is closed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP receiver that accepts client requests.
///
/// Each accepted connection is served on its own thread: one newline-terminated JSON
/// request is read, handed to the [`RequestHandler`], and its response is written back
/// as one JSON line. A failing connection is logged and closed; the accept loop keeps
/// serving other clients. Reads and writes on accepted streams are bounded by the idle
/// timeout.
pub struct QuoteReceiver {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
    idle_timeout: Duration,
}

impl QuoteReceiver {
    /// Bind a new TCP receiver to the provided `bind_addr` (e.g., `0.0.0.0:4000`).
    pub fn new(bind_addr: &str) -> Result<Self, QuoteError> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self {
            socket,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        })
    }

    /// Override the per-connection idle timeout.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking accept loop.
    pub fn serve(self, handler: Arc<RequestHandler>) -> Result<()> {
        info!("Quote TCP server is started on {}", self.socket.local_addr()?);
        let idle_timeout = self.idle_timeout;

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    let handler = Arc::clone(&handler);
                    thread::spawn(move || {
                        let peer = stream
                            .peer_addr()
                            .map(|a| a.to_string())
                            .unwrap_or_else(|_| String::from("unknown peer"));
                        if let Err(e) = handle_connection(stream, &handler, idle_timeout) {
                            error!("Connection from {} failed: {}", peer, e);
                        }
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

fn handle_connection(stream: TcpStream, handler: &RequestHandler, idle_timeout: Duration) -> Result<()> {
    debug!("client_tcp_addr: {:?}", stream.peer_addr());
    stream.set_read_timeout(Some(idle_timeout))?;
    stream.set_write_timeout(Some(idle_timeout))?;
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream.take(MAX_REQUEST_BYTES));

    let mut buf = Vec::new();
    match reader.read_until(b'\n', &mut buf) {
        Ok(0) => {
            debug!("Client closed the connection without a request");
            return Ok(());
        }
        Ok(_) => {}
        Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
            info!("Closing connection idle for {:?}", idle_timeout);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }
    let line = String::from_utf8_lossy(&buf);

    handler.handle_line(&line, &mut |response| {
        writer.write_all(&encode_line(response)?)?;
        writer.flush()?;
        Ok(())
    })
}
