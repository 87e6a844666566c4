//! Periodic symbol directory reload.
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use log::{debug, info, warn};

use crate::model::directory::SymbolDirectory;

/// Reload `directory` every `interval` on a background thread.
///
/// The thread stops once the returned sender is dropped (or used). A failed reload is
/// logged and the previous snapshot stays in place.
pub fn spawn_directory_refresh(directory: Arc<SymbolDirectory>, interval: Duration) -> Sender<()> {
    let (stop_tx, stop_rx) = bounded::<()>(1);

    thread::spawn(move || {
        info!(
            "Symbol directory refresh every {:?} from {}",
            interval,
            directory.source().display()
        );
        loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = directory.load() {
                        warn!("Symbol directory reload failed, keeping previous snapshot: {}", e);
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("Symbol directory refresh stopping...");
    });
    stop_tx
}
