//! Sending requests to the quote server over TCP.
//!
//! One request per connection: the request is written as a single JSON line and the
//! server answers with a single JSON line.
use log::{debug, info};
use quote_common::protocol::{Request, Response, encode_line};
use quote_common::{QuoteError, Result};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Read/write timeout for a single exchange.
const TIMEOUT_SECS: u64 = 30;

/// Helper type for sending requests to the server.
pub struct RequestSender;

impl RequestSender {
    /// Send `request` to `server_address` and wait for the response.
    pub fn send(server_address: &str, request: &Request) -> Result<Response> {
        info!("Connecting to TCP server at {}", server_address);
        let mut stream = TcpStream::connect(server_address)
            .map_err(|e| QuoteError::Protocol(format!("Failed to connect to server: {}", e)))?;
        stream.set_read_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))?;
        stream.set_write_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))?;

        let line = encode_line(request)?;
        debug!("Sending request: {}", String::from_utf8_lossy(&line).trim_end());
        stream.write_all(&line)?;
        stream.flush()?;

        let mut reader = BufReader::new(stream);
        let mut reply = String::new();
        if reader.read_line(&mut reply)? == 0 {
            return Err(QuoteError::Protocol(String::from(
                "Server closed the connection without a response",
            )));
        }
        Ok(serde_json::from_str(&reply)?)
    }
}
