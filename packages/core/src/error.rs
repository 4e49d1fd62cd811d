//! Error taxonomy for the guarded secret lifecycle.
//!
//! Every variant aborts the whole sequence. None of them is recovered
//! internally; cleanup of the rendered file still runs on the way out.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Failure kinds surfaced by [`Injector`](crate::guard::Injector).
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    /// The secrets CLI is not resolvable on `PATH`
    #[error("The '{tool}' software is not installed. Please install it first.")]
    ToolNotFound {
        /// Program name or path that was looked up
        tool: String,
    },

    /// A rendered file already sits somewhere on the search path
    #[error("A rendered secrets file already exists in the directory: {}. Operation aborted.", directory.display())]
    ConflictingRenderedFile {
        /// Directory holding the conflicting file
        directory: PathBuf,
    },

    /// No template file within the search depth
    #[error("The template file was not found in the {searched} searched directories. Operation aborted.")]
    TemplateNotFound {
        /// Number of directories examined
        searched: usize,
    },

    /// The secrets CLI exited unsuccessfully
    #[error("'{tool} inject' failed with {status}")]
    RenderFailed {
        /// Program that was run
        tool: String,
        /// Exit status reported by the child
        status: ExitStatus,
    },

    /// The secrets CLI was found but could not be started
    #[error("Failed to execute '{tool}'")]
    Spawn {
        /// Program that was run
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The rendered file could not be read or parsed
    #[error("Failed to load environment from {}", path.display())]
    Load {
        /// Rendered file path
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// Settings that would search nowhere or write outside the working directory
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// The working directory could not be determined
    #[error("Failed to get current directory")]
    WorkingDir(#[source] std::io::Error),
}

/// Convenience alias used throughout the library.
pub type Result<T, E = InjectError> = std::result::Result<T, E>;
