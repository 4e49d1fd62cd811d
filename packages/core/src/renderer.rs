//! Rendering of a template through the secrets CLI.
//!
//! The CLI is invoked as `<tool> inject -i <template> -o <rendered>` with
//! the working directory as its current directory. Both paths are passed
//! relative to that directory. Output streams are discarded.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{InjectError, Result};

/// Resolve the secrets CLI on `PATH`.
///
/// A value containing a path separator is checked as a path instead.
pub fn resolve_tool(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|_| InjectError::ToolNotFound {
        tool: tool.to_string(),
    })
}

/// Run `inject` and wait for it to exit.
///
/// # Errors
///
/// - [`InjectError::Spawn`] if the program cannot be started
/// - [`InjectError::RenderFailed`] on a non-zero exit status
pub fn render(program: &Path, working_dir: &Path, template: &Path, rendered: &str) -> Result<()> {
    let tool = program.display().to_string();
    debug!(%tool, template = %template.display(), rendered, "running inject");

    let status = Command::new(program)
        .arg("inject")
        .arg("-i")
        .arg(template)
        .arg("-o")
        .arg(rendered)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| InjectError::Spawn {
            tool: tool.clone(),
            source,
        })?;

    if !status.success() {
        return Err(InjectError::RenderFailed { tool, status });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_missing_tool() {
        let result = resolve_tool("nonexistent_op_command_xyz");
        match result {
            Err(InjectError::ToolNotFound { tool }) => assert_eq!(tool, "nonexistent_op_command_xyz"),
            other => panic!("expected ToolNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_render_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = render(
            &dir.path().join("no-such-tool"),
            dir.path(),
            Path::new(".env.op"),
            ".env",
        );
        assert!(matches!(result, Err(InjectError::Spawn { .. })));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-op");
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_resolve_explicit_path() {
            let dir = tempfile::tempdir().unwrap();
            let tool = script(dir.path(), "exit 0");
            let resolved = resolve_tool(tool.to_str().unwrap()).unwrap();
            assert!(resolved.ends_with("fake-op"));
        }

        #[test]
        fn test_render_passes_fixed_arguments() {
            let dir = tempfile::tempdir().unwrap();
            let log = dir.path().join("args.log");
            let tool = script(dir.path(), &format!("echo \"$@\" > '{}'", log.display()));

            render(&tool, dir.path(), Path::new("../.env.op"), ".env").unwrap();

            let args = fs::read_to_string(&log).unwrap();
            assert_eq!(args.trim(), "inject -i ../.env.op -o .env");
        }

        #[test]
        fn test_render_runs_in_working_dir() {
            let dir = tempfile::tempdir().unwrap();
            let work = dir.path().join("work");
            fs::create_dir(&work).unwrap();
            let tool = script(dir.path(), "pwd > where.txt");

            render(&tool, &work, Path::new(".env.op"), ".env").unwrap();

            assert!(work.join("where.txt").exists());
        }

        #[test]
        fn test_render_non_zero_exit() {
            let dir = tempfile::tempdir().unwrap();
            let tool = script(dir.path(), "echo 'boom' >&2; exit 3");

            match render(&tool, dir.path(), Path::new(".env.op"), ".env") {
                Err(InjectError::RenderFailed { status, .. }) => assert_eq!(status.code(), Some(3)),
                other => panic!("expected RenderFailed, got {:?}", other),
            }
        }
    }
}
