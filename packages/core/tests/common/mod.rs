//! Common testing utilities for Passsssword integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test context with a four-level directory tree and a separate `bin/`.
///
/// ```text
/// <tmp>/bin/                      mock tools
/// <tmp>/l3/l2/l1/project/         working directory (depth 0)
/// ```
pub struct TestContext {
    /// Root of the temporary tree
    pub root: PathBuf,
    /// Working directory the tests run in
    pub project: PathBuf,
    /// The temporary directory (kept to prevent early deletion)
    _temp_dir: TempDir,
}

impl TestContext {
    /// Create a new test context.
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().to_path_buf();
        let project = root.join("l3").join("l2").join("l1").join("project");
        fs::create_dir_all(&project)?;
        fs::create_dir_all(root.join("bin"))?;

        Ok(Self {
            root,
            project,
            _temp_dir: temp_dir,
        })
    }

    /// Directory `depth` levels above the project (0 = project).
    pub fn level(&self, depth: usize) -> PathBuf {
        self.project
            .ancestors()
            .nth(depth)
            .expect("depth within the temp tree")
            .to_path_buf()
    }

    /// Create a file at `depth` with content.
    pub fn create_file(&self, depth: usize, name: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = self.level(depth).join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a `.env.op` template at `depth`.
    pub fn template_at(&self, depth: usize) -> PathBuf {
        self.create_file(depth, ".env.op", "SECRET=op://vault/item/field\n")
            .unwrap()
    }

    /// Path of the rendered file in the project directory.
    pub fn rendered(&self) -> PathBuf {
        self.project.join(".env")
    }

    /// Where mock tools append their arguments.
    pub fn args_log(&self) -> PathBuf {
        self.root.join("args.log")
    }

    /// Argument lines recorded by mock tools, one per invocation.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.args_log())
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Shell scripts standing in for the `op` CLI.
pub struct MockOp;

#[cfg(unix)]
impl MockOp {
    fn install(ctx: &TestContext, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = ctx.root.join("bin").join(name);
        let script = format!(
            "#!/bin/sh\necho \"$@\" >> '{log}'\nout=\"\"\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"-o\" ]; then out=\"$2\"; fi\n  shift\ndone\n{body}\n",
            log = ctx.args_log().display(),
            body = body,
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// A tool that writes `content` to the `-o` target and succeeds.
    pub fn writing(ctx: &TestContext, content: &str) -> PathBuf {
        Self::install(
            ctx,
            "op",
            &format!("cat > \"$out\" <<'MOCK_EOF'\n{}\nMOCK_EOF", content),
        )
    }

    /// A tool that leaves a partial `-o` target behind and exits with `code`.
    pub fn failing(ctx: &TestContext, code: i32) -> PathBuf {
        Self::install(
            ctx,
            "op",
            &format!("echo 'PARTIAL=' > \"$out\"\necho '[ERROR] not signed in' >&2\nexit {}", code),
        )
    }

    /// A tool that succeeds without writing anything.
    pub fn silent(ctx: &TestContext) -> PathBuf {
        Self::install(ctx, "op", "exit 0")
    }
}

/// Settings pointing at `tool` with default file names.
pub fn settings_for(tool: &Path) -> passsssword::Settings {
    passsssword::Settings {
        tool: tool.display().to_string(),
        ..passsssword::Settings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_context_levels() {
        let ctx = TestContext::new().unwrap();
        assert_eq!(ctx.level(0), ctx.project);
        assert_eq!(ctx.level(4), ctx.root);
        assert!(ctx.level(3).ends_with("l3"));
    }
}
