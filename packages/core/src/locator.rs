//! Template discovery in the working directory and its ancestors.
//!
//! At each depth the rendered-file check runs before the template check,
//! and the walk stops at the first depth where either file exists. A
//! rendered file anywhere on the path therefore shadows every template
//! further up.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{InjectError, Result};

/// A template found by [`locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTemplate {
    /// Path relative to the start directory, e.g. `../.env.op`
    pub relative: PathBuf,
    /// Directory that held the template
    pub directory: PathBuf,
    /// Parent hops from the start directory (0 = the start directory)
    pub depth: usize,
}

/// Search `start` and up to `search_depth - 1` ancestors for `template`.
///
/// # Errors
///
/// - [`InjectError::ConflictingRenderedFile`] when `rendered` exists at a
///   depth reached before any template
/// - [`InjectError::TemplateNotFound`] when no depth holds a template
pub fn locate(
    start: &Path,
    template: &str,
    rendered: &str,
    search_depth: usize,
) -> Result<LocatedTemplate> {
    for depth in 0..search_depth {
        let hops = parent_hops(depth);
        let search_dir = start.join(&hops);

        if search_dir.join(rendered).exists() {
            let directory = fs::canonicalize(&search_dir).unwrap_or(search_dir);
            return Err(InjectError::ConflictingRenderedFile { directory });
        }

        if search_dir.join(template).exists() {
            debug!(depth, template, "template located");
            let directory = fs::canonicalize(&search_dir).unwrap_or(search_dir);
            return Ok(LocatedTemplate {
                relative: hops.join(template),
                directory,
                depth,
            });
        }
    }

    Err(InjectError::TemplateNotFound {
        searched: search_depth,
    })
}

/// `..` repeated `depth` times; empty for depth 0.
fn parent_hops(depth: usize) -> PathBuf {
    std::iter::repeat(Component::ParentDir).take(depth).collect()
}
