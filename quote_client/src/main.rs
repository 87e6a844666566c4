//! Quote Client — a command-line client for the historical quote server. It sends one
//! request over TCP, waits for the JSON answer, and prints it to stdout.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --server-ip 192.168.0.10 symbols
//! quote_client quotes --symbol AAPL --start-date 2024-10-01 --end-date 2024-10-02 --email me@example.com
//! ```
//!
//! Quote requests are validated locally with the same rules the server applies, so
//! malformed input is reported without a round trip.
#![warn(missing_docs)]
mod args;
mod sender;

use crate::args::{Args, Command};
use crate::sender::RequestSender;
use clap::Parser;
use log::{error, info};
use quote_common::dates::today_utc;
use quote_common::net::addr;
use quote_common::protocol::{Request, Response, Status};
use quote_common::query::{QuoteQueryResult, QuoteRequest};
use quote_common::symbol::SymbolLookupEntry;
use quote_common::validation::{FieldErrors, validate_quote_request};
use quote_common::{QuoteError, Result};

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let server_ip = args.server_ip.trim().replace("\"", "");
    let server_address = addr(&server_ip, args.port);

    let request = match build_request(&args.command) {
        Ok(request) => request,
        Err(QuoteError::Validation(errors)) => {
            print_field_errors(&errors);
            return Err(QuoteError::Validation(errors));
        }
        Err(e) => return Err(e),
    };

    let response = RequestSender::send(&server_address, &request)?;
    info!("Server answered {} ({})", response.status, response.status.code());
    report(&args.command, response)
}

/// Turn the parsed command into a protocol request, validating quote input locally.
fn build_request(command: &Command) -> Result<Request> {
    match command {
        Command::Health => Ok(Request::Health),
        Command::Symbols => Ok(Request::Symbols),
        Command::Quotes {
            symbol,
            start_date,
            end_date,
            email,
        } => {
            let payload = serde_json::to_value(QuoteRequest {
                symbol: symbol.clone(),
                start_date: start_date.clone(),
                end_date: end_date.clone(),
                email: email.clone(),
            })?;
            validate_quote_request(&payload, today_utc()).map_err(QuoteError::Validation)?;
            Ok(Request::Quotes(payload))
        }
    }
}

/// Print a successful body, or the error the server reported.
fn report(command: &Command, response: Response) -> Result<()> {
    match response.status {
        Status::Ok => {}
        Status::BadRequest => {
            if let Some(errors) = response.field_errors() {
                print_field_errors(&errors);
                return Err(QuoteError::Validation(errors));
            }
            let message = response.error_message().unwrap_or("Bad request").to_string();
            error!("{}", message);
            return Err(QuoteError::Protocol(message));
        }
        Status::NotFound => {
            let message = response.error_message().unwrap_or("Not found").to_string();
            error!("{}", message);
            return Err(QuoteError::SymbolDataNotFound(message));
        }
        Status::InternalError => {
            let message = response.error_message().unwrap_or("Internal Server Error").to_string();
            error!("{}", message);
            return Err(QuoteError::Internal(message));
        }
    }

    match command {
        Command::Health => println!("Server is healthy"),
        Command::Symbols => {
            let entries: Vec<SymbolLookupEntry> = serde_json::from_value(response.body)?;
            for line in render_symbols(&entries) {
                println!("{}", line);
            }
            if let Some(max_age) = response.cache_max_age {
                info!("Listing may be cached for {}s", max_age);
            }
        }
        Command::Quotes { .. } => {
            let result: QuoteQueryResult = serde_json::from_value(response.body)?;
            for line in render_quotes(&result) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn print_field_errors(errors: &FieldErrors) {
    for field in errors.fields() {
        for message in errors.get(field).unwrap_or_default() {
            error!("{}: {}", field, message);
        }
    }
}

fn render_symbols(entries: &[SymbolLookupEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| format!("{:<8} {}", entry.value, entry.label))
        .collect()
}

fn render_quotes(result: &QuoteQueryResult) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} ({}) {} .. {}",
            result.company_name, result.symbol_code, result.range.start_date, result.range.end_date
        ),
        format!(
            "{:<10} {:>10} {:>10} {:>10} {:>10} {:>12}",
            "date", "open", "high", "low", "close", "volume"
        ),
    ];
    lines.extend(result.quotes.iter().map(|q| {
        format!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}",
            q.date, q.open, q.high, q.low, q.close, q.volume
        )
    }));
    if result.quotes.is_empty() {
        lines.push(String::from("(no quotes in range)"));
    }
    lines
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
