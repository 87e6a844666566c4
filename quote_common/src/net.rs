//! Shared networking constants and helpers used by client and server.

/// TCP port the quote server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 4000;

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
