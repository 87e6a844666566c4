//! Request/response envelopes exchanged between client and server.
//!
//! Messages are single JSON documents terminated by a newline. A client opens a TCP
//! connection, writes one `Request` line, and reads one `Response` line back.
//!
//! ```text
//! {"command":"quotes","payload":{"symbol":"AAPL","startDate":"2024-10-01",...}}
//! {"status":"ok","body":{"symbol":"AAPL","companyName":"Apple Inc.",...}}
//! ```
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{Display, EnumString};

use crate::error::QuoteError;
use crate::validation::FieldErrors;

/// Upper bound on the size of a single request line.
pub const MAX_REQUEST_BYTES: u64 = 64 * 1024;

/// Client request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", content = "payload", rename_all = "lowercase")]
pub enum Request {
    /// Liveness probe.
    Health,
    /// Full symbol lookup listing.
    Symbols,
    /// Quote query. The payload stays untyped until the server validates it.
    Quotes(Value),
}

/// Outcome class of a response, mirroring the usual HTTP status families.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    /// Request served.
    Ok,
    /// Malformed request or failed validation.
    BadRequest,
    /// The symbol has no stored series.
    NotFound,
    /// Anything the caller cannot fix.
    InternalError,
}

impl Status {
    /// HTTP-style numeric code for this status.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::InternalError => 500,
        }
    }
}

/// Server response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Outcome class.
    pub status: Status,
    /// Seconds the consumer may cache this body for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_max_age: Option<u64>,
    /// Payload on success, `{"error": ...}` otherwise.
    pub body: Value,
}

impl Response {
    /// Successful response carrying `body`.
    pub fn ok(body: Value) -> Self {
        Response {
            status: Status::Ok,
            cache_max_age: None,
            body,
        }
    }

    /// Successful response the consumer may cache for `max_age_secs`.
    pub fn cached(body: Value, max_age_secs: u64) -> Self {
        Response {
            status: Status::Ok,
            cache_max_age: Some(max_age_secs),
            body,
        }
    }

    /// Error response with a plain message.
    pub fn error(status: Status, message: &str) -> Self {
        Response {
            status,
            cache_max_age: None,
            body: json!({ "error": message }),
        }
    }

    /// `bad_request` response carrying per-field validation messages.
    pub fn validation(errors: &FieldErrors) -> Self {
        Response {
            status: Status::BadRequest,
            cache_max_age: None,
            body: json!({ "error": { "fieldErrors": errors } }),
        }
    }

    /// Map a pipeline error to the response a client should see. Internal details are
    /// never exposed.
    pub fn from_error(err: &QuoteError) -> Self {
        match err {
            QuoteError::Validation(errors) => Response::validation(errors),
            QuoteError::SymbolDataNotFound(_) => Response::error(Status::NotFound, "Symbol not found"),
            QuoteError::Protocol(message) => Response::error(Status::BadRequest, message),
            _ => Response::error(Status::InternalError, "Internal Server Error"),
        }
    }

    /// Field errors carried by a validation response, if this is one.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        if self.status != Status::BadRequest {
            return None;
        }
        let errors = self.body.get("error")?.get("fieldErrors")?;
        serde_json::from_value(errors.clone()).ok()
    }

    /// Plain error message, if the body carries one.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error")?.as_str()
    }
}

/// Encode a message as one newline-terminated JSON line.
pub fn encode_line<T: Serialize>(message: &T) -> Result<Vec<u8>, QuoteError> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    Ok(line)
}
