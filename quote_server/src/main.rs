//! Quote server binary.
//!
//! Startup order:
//! 1. logger, then configuration (`ENV_FILE` dotenv + environment),
//! 2. first symbol directory load; any failure here aborts the process,
//! 3. optional periodic directory refresh,
//! 4. record store, notifier worker, quote service, request handler,
//! 5. TCP receiver; the accept loop runs until the process is stopped.
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use quote_common::QuoteError;
use quote_common::Result;
use quote_server::config::ServerConfig;
use quote_server::handler::RequestHandler;
use quote_server::model::directory::SymbolDirectory;
use quote_server::model::refresh::spawn_directory_refresh;
use quote_server::model::store::JsonFileStore;
use quote_server::notifier::dispatcher::NotificationDispatcher;
use quote_server::notifier::smtp::SmtpNotifier;
use quote_server::notifier::{LogNotifier, Notifier};
use quote_server::receiver::QuoteReceiver;
use quote_server::service::QuoteService;

fn main() -> Result<(), QuoteError> {
    init_logger();
    let config = ServerConfig::from_env()?;

    let directory = Arc::new(SymbolDirectory::new(&config.symbols_file));
    match directory.load() {
        Ok(0) => warn!("Symbol directory {} is empty", directory.source().display()),
        Ok(_) => {}
        Err(e) => {
            error!("Fatal: cannot load symbols from {}: {}", directory.source().display(), e);
            return Err(e);
        }
    }
    let _refresh = (config.symbols_reload_secs > 0).then(|| {
        spawn_directory_refresh(
            Arc::clone(&directory),
            Duration::from_secs(config.symbols_reload_secs),
        )
    });

    let store = JsonFileStore::new(&config.quotes_dir);
    info!("Serving quote series from {}", store.quotes_dir().display());

    let notifications = NotificationDispatcher::start(build_notifier(&config)?);
    let service = QuoteService::new(Arc::clone(&directory), Arc::new(store), notifications);
    let handler = Arc::new(RequestHandler::new(
        directory,
        service,
        config.symbols_cache_secs,
    ));

    let receiver = QuoteReceiver::new(&config.listen_addr())?;
    info!("Started quote server on {}", receiver.local_addr()?);
    receiver.serve(handler)
}

fn build_notifier(config: &ServerConfig) -> Result<Box<dyn Notifier>> {
    match config.smtp_options() {
        Some(options) => {
            info!(
                "Notifications via SMTP {}:{} (tls: {}, auth: {})",
                options.host,
                options.port,
                if options.secure { "implicit" } else { "starttls when offered" },
                options.credentials().is_some()
            );
            let notifier = SmtpNotifier::new(&options, &config.email_from)
                .map_err(|e| QuoteError::Config(format!("SMTP notifier: {}", e)))?;
            Ok(Box::new(notifier))
        }
        None => {
            info!("SMTP_HOST not set, notifications are only logged");
            Ok(Box::new(LogNotifier))
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
