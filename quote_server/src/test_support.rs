//! Shared fixtures for the server's unit tests.
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use crossbeam_channel::{Receiver, Sender, unbounded};
use quote_common::quote::QuoteRecord;
use tempfile::{TempDir, tempdir};

use crate::handler::RequestHandler;
use crate::model::directory::SymbolDirectory;
use crate::model::store::JsonFileStore;
use crate::notifier::dispatcher::NotificationDispatcher;
use crate::notifier::{Notification, NotifyError, Notifier};
use crate::service::QuoteService;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn fixed_today() -> NaiveDate {
    day(2026, 10, 16)
}

pub fn aapl_rows() -> Vec<QuoteRecord> {
    vec![
        QuoteRecord {
            date: day(2024, 10, 1),
            open: 1.0,
            high: 2.0,
            low: 1.0,
            close: 2.0,
            volume: 10,
        },
        QuoteRecord {
            date: day(2024, 10, 2),
            open: 2.0,
            high: 3.0,
            low: 2.0,
            close: 3.0,
            volume: 20,
        },
    ]
}

/// Temporary data directory: `symbols.json` with AAPL and MSFT, `quotes/AAPL.json`
/// with two days of data.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("symbols.json"),
            r#"[{"Symbol":"AAPL","Company Name":"Apple Inc."},{"Symbol":"MSFT","Company Name":"Microsoft"}]"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("quotes")).unwrap();
        let fixture = Fixture { dir };
        fixture.write_series("AAPL", &aapl_rows());
        fixture
    }

    pub fn symbols_path(&self) -> PathBuf {
        self.dir.path().join("symbols.json")
    }

    pub fn quotes_dir(&self) -> PathBuf {
        self.dir.path().join("quotes")
    }

    pub fn write_series(&self, symbol: &str, rows: &[QuoteRecord]) {
        let json = serde_json::to_string(rows).unwrap();
        self.write_raw_series(symbol, &json);
    }

    pub fn write_raw_series(&self, symbol: &str, json: &str) {
        fs::write(self.quotes_dir().join(format!("{}.json", symbol)), json).unwrap();
    }

    pub fn directory(&self) -> Arc<SymbolDirectory> {
        let directory = Arc::new(SymbolDirectory::new(self.symbols_path()));
        directory.load().unwrap();
        directory
    }

    pub fn service(&self, notifier: Box<dyn Notifier>) -> QuoteService {
        self.service_with_directory(self.directory(), notifier)
    }

    pub fn service_with_directory(
        &self,
        directory: Arc<SymbolDirectory>,
        notifier: Box<dyn Notifier>,
    ) -> QuoteService {
        QuoteService::new(
            directory,
            Arc::new(JsonFileStore::new(self.quotes_dir())),
            NotificationDispatcher::start(notifier),
        )
        .with_clock(fixed_today)
    }

    pub fn handler(&self, notifier: Box<dyn Notifier>) -> RequestHandler {
        let directory = self.directory();
        let service = self.service_with_directory(Arc::clone(&directory), notifier);
        RequestHandler::new(directory, service, 300)
    }
}

/// Forwards every notification to a channel.
pub struct RecordingNotifier {
    tx: Sender<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, Receiver<Notification>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let _ = self.tx.send(Notification {
            to: String::from(address),
            subject: String::from(subject),
            body: String::from(body),
        });
        Ok(())
    }
}

/// Fails every delivery, reporting each attempted address.
pub struct FailingNotifier {
    tx: Sender<String>,
}

impl FailingNotifier {
    pub fn new() -> (Self, Receiver<String>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl Notifier for FailingNotifier {
    fn notify(&self, address: &str, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        let _ = self.tx.send(String::from(address));
        Err(NotifyError::InvalidHeader("recipient"))
    }
}

/// Blocks every delivery until the returned sender is dropped.
pub struct GatedNotifier {
    gate: Receiver<()>,
}

impl GatedNotifier {
    pub fn new() -> (Self, Sender<()>) {
        let (tx, rx) = unbounded();
        (Self { gate: rx }, tx)
    }
}

impl Notifier for GatedNotifier {
    fn notify(&self, _address: &str, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        let _ = self.gate.recv();
        Ok(())
    }
}
