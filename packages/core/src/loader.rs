//! Loading of a rendered `KEY=VALUE` file into the process environment.
//!
//! Existing variables of the same name are overwritten. Nothing set here
//! is ever removed again; callers that need isolation snapshot and restore
//! the environment themselves.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{InjectError, Result};

/// Parse `path` and set every entry as a process environment variable.
///
/// Lines that are not `KEY=VALUE` assignments are skipped with a warning;
/// only an unreadable file fails. Returns the key names in file order.
/// Values are never logged.
pub fn load(path: &Path) -> Result<Vec<String>> {
    let to_error = |source| InjectError::Load {
        path: path.to_path_buf(),
        source,
    };

    let mut keys = Vec::new();
    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = match item {
            Ok(entry) => entry,
            Err(dotenvy::Error::LineParse(_, index)) => {
                // The line itself may hold a secret; report the position only.
                warn!(path = %path.display(), index, "skipping malformed line");
                continue;
            }
            Err(e) => return Err(to_error(e)),
        };
        std::env::set_var(&key, value);
        keys.push(key);
    }

    debug!(keys = ?keys, "environment variables set");
    info!("Loaded {} secret(s) from {}", keys.len(), path.display());

    Ok(keys)
}
