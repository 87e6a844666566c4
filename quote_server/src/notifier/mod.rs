//! Best-effort query notifications.
//!
//! - `Notifier` — the delivery capability: `notify(address, subject, body)`.
//! - `LogNotifier` — writes notifications to the log; used when no mail server is set.
//! - `smtp::SmtpNotifier` — SMTP delivery with optional AUTH and TLS.
//! - `dispatcher::NotificationDispatcher` — worker thread that runs a `Notifier` off the
//!   request path.
//!
//! Nothing here reports back to the request that caused a notification: every
//! `NotifyError` ends in the log.
use log::info;
use quote_common::query::QuoteQuery;
use thiserror::Error;

pub mod dispatcher;
pub mod smtp;

/// Delivery failure of a single notification.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Sender or recipient is not a valid mailbox.
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Invalid message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connection, TLS, AUTH, or a rejecting reply from the mail server.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// A header value would break the message framing.
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

/// Anything able to deliver a notification.
pub trait Notifier: Send + Sync {
    /// Deliver `body` with `subject` to `address`.
    fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notification logged instead of sent.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!("Notification to {} [{}]: {}", address, subject, body);
        Ok(())
    }
}

/// One pending notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl Notification {
    /// Notification describing a served quote query.
    pub fn for_query(query: &QuoteQuery, company_name: &str) -> Self {
        Notification {
            to: query.notify_address.clone(),
            subject: String::from(company_name),
            body: format!(
                "From {} to {}",
                query.range.start_date, query.range.end_date
            ),
        }
    }
}
