// Passsssword - Cleaner Module
//
// This module keeps track of rendered secret files that are still on disk
// and removes them when:
// - their owning scope ends
// - the process receives SIGINT (Ctrl+C)

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing::{debug, warn};

/// Rendered files owned by live scopes
static LIVE_FILES: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();

fn live_files() -> &'static Mutex<HashSet<PathBuf>> {
    LIVE_FILES.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Register a rendered file so an interrupt can still remove it
pub fn register(path: &Path) {
    if let Ok(mut files) = live_files().lock() {
        files.insert(path.to_path_buf());
    }
}

/// Forget a rendered file once its scope has cleaned up
pub fn unregister(path: &Path) {
    if let Ok(mut files) = live_files().lock() {
        files.remove(path);
    }
}

/// Whether `path` is currently registered
pub fn is_registered(path: &Path) -> bool {
    live_files()
        .lock()
        .map(|files| files.contains(path))
        .unwrap_or(false)
}

/// Delete a rendered file, ignoring one that is already gone.
///
/// Returns `true` if a file was removed. Other failures are logged and
/// swallowed: cleanup must never mask the error that triggered it.
pub fn remove_rendered(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "rendered file removed");
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to remove rendered file");
            false
        }
    }
}

/// Remove every registered rendered file.
///
/// Idempotent - safe to call multiple times. Returns the number of files
/// actually removed.
pub fn cleanup_all() -> usize {
    let files = match live_files().lock() {
        Ok(mut files) => std::mem::take(&mut *files),
        Err(_) => return 0,
    };

    files.iter().filter(|path| remove_rendered(path)).count()
}

/// Setup a Ctrl+C handler that deletes live rendered files before exiting
///
/// # Example
/// ```no_run
/// use passsssword::cleaner::install_signal_handler;
///
/// install_signal_handler();
/// ```
pub fn install_signal_handler() {
    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\n🛑 Received SIGINT (Ctrl+C)");
        let removed = cleanup_all();
        if removed > 0 {
            eprintln!("🧹 Removed {} rendered secrets file(s)", removed);
        }
        std::process::exit(130);
    }) {
        warn!("Failed to set SIGINT handler: {}", e);
    }
}
