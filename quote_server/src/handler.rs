//! Request routing.
//!
//! `RequestHandler` decodes one request line, runs the matching operation, and passes
//! exactly one `Response` to the `reply` callback. Outcome mapping:
//!
//! | Outcome                       | Status           |
//! |-------------------------------|------------------|
//! | served                        | `ok`             |
//! | undecodable request line      | `bad_request`    |
//! | validation failure            | `bad_request`    |
//! | symbol without stored series  | `not_found`      |
//! | anything else                 | `internal_error` |
use std::sync::Arc;

use log::{error, info};
use quote_common::protocol::{Request, Response};
use quote_common::{QuoteError, Result};
use serde_json::{Value, json};

use crate::model::directory::SymbolDirectory;
use crate::service::QuoteService;

/// Routes decoded requests to the directory and the quote service.
pub struct RequestHandler {
    directory: Arc<SymbolDirectory>,
    service: QuoteService,
    symbols_cache_secs: u64,
}

impl RequestHandler {
    /// Create a handler; symbol listings are marked cacheable for `symbols_cache_secs`.
    pub fn new(directory: Arc<SymbolDirectory>, service: QuoteService, symbols_cache_secs: u64) -> Self {
        Self {
            directory,
            service,
            symbols_cache_secs,
        }
    }

    /// Handle one raw request line. `reply` is called exactly once unless it fails.
    pub fn handle_line(
        &self,
        line: &str,
        reply: &mut dyn FnMut(&Response) -> Result<()>,
    ) -> Result<()> {
        let request = match serde_json::from_str::<Request>(line.trim()) {
            Ok(request) => request,
            Err(e) => {
                info!("Rejected undecodable request: {}", e);
                let err = QuoteError::Protocol(String::from("Malformed request"));
                return reply(&Response::from_error(&err));
            }
        };

        match request {
            Request::Health => reply(&Response::ok(json!({ "ok": true }))),
            Request::Symbols => {
                let response = match self.symbols() {
                    Ok(body) => Response::cached(body, self.symbols_cache_secs),
                    Err(e) => failure(&e),
                };
                reply(&response)
            }
            Request::Quotes(payload) => {
                let served = self.service.retrieve_with(&payload, |result| {
                    let body = serde_json::to_value(result)?;
                    reply(&Response::ok(body))
                });
                match served {
                    Ok(replied) => replied,
                    Err(e) => reply(&failure(&e)),
                }
            }
        }
    }

    /// Handle a request and collect the response.
    pub fn handle(&self, line: &str) -> Result<Response> {
        let mut collected = None;
        self.handle_line(line, &mut |response| {
            collected = Some(response.clone());
            Ok(())
        })?;
        collected.ok_or_else(|| QuoteError::Internal(String::from("handler produced no response")))
    }

    fn symbols(&self) -> Result<Value> {
        let entries = self.directory.lookup_all()?;
        Ok(serde_json::to_value(entries)?)
    }
}

fn failure(err: &QuoteError) -> Response {
    if err.is_client_error() {
        info!("Request failed: {}", err);
    } else {
        error!("Request failed: {}", err);
    }
    Response::from_error(err)
}
