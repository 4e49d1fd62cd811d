//! Guarded execution: locate, render, load, run, clean up.
//!
//! [`Injector::enter`] performs the whole acquisition and hands back a
//! [`SecretScope`]. The scope owns the rendered file and deletes it when
//! dropped, whether the caller returns normally, bails out with `?`, or
//! unwinds from a panic. The closure-based entry points ([`Injector::run`],
//! [`Injector::try_run`], [`Injector::wrap`]) are thin adapters that hold a
//! scope across the body, so both surfaces go through the same sequence.
//!
//! # Example
//!
//! ```no_run
//! use passsssword::Injector;
//!
//! # fn main() -> Result<(), passsssword::InjectError> {
//! // Closure form
//! let url = Injector::new().run(|| std::env::var("DATABASE_URL"))?;
//!
//! // Scoped form
//! {
//!     let _scope = Injector::new().enter()?;
//!     // secrets are in the environment here
//! } // rendered file deleted
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cleaner;
use crate::config::Settings;
use crate::error::{InjectError, Result};
use crate::loader;
use crate::locator::{self, LocatedTemplate};
use crate::renderer;

/// Entry point for running code with rendered secrets in the environment.
#[derive(Debug, Clone, Default)]
pub struct Injector {
    settings: Settings,
    working_dir: Option<PathBuf>,
}

impl Injector {
    /// Injector with default settings, rooted at the process working
    /// directory as it is when the injector is entered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Injector with explicit settings.
    ///
    /// Settings are checked with [`Settings::validate`] each time the
    /// injector is entered, before the tool is resolved.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            working_dir: None,
        }
    }

    /// Root the search and the rendered file at `dir` instead of the
    /// process working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Settings in effect.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn check_settings(&self) -> Result<()> {
        self.settings
            .validate()
            .map_err(|e| InjectError::InvalidSettings(e.to_string()))
    }

    fn resolve_working_dir(&self) -> Result<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(InjectError::WorkingDir),
        }
    }

    /// Check the tool and find the template without rendering anything.
    pub fn locate(&self) -> Result<LocatedTemplate> {
        self.check_settings()?;
        renderer::resolve_tool(&self.settings.tool)?;
        let working_dir = self.resolve_working_dir()?;
        locator::locate(
            &working_dir,
            &self.settings.template,
            &self.settings.rendered,
            self.settings.search_depth,
        )
    }

    /// Acquire secrets: the scoped-block entry point.
    ///
    /// On success the rendered file exists and its variables are set. The
    /// file is removed when the returned scope is dropped.
    ///
    /// # Errors
    ///
    /// Fails fast with the first failing step, in order:
    /// [`InjectError::InvalidSettings`], [`InjectError::ToolNotFound`],
    /// [`InjectError::ConflictingRenderedFile`] or
    /// [`InjectError::TemplateNotFound`], [`InjectError::Spawn`] or
    /// [`InjectError::RenderFailed`], [`InjectError::Load`].
    pub fn enter(&self) -> Result<SecretScope> {
        self.check_settings()?;
        let tool = renderer::resolve_tool(&self.settings.tool)?;
        debug!(tool = %tool.display(), "tool resolved");

        let working_dir = self.resolve_working_dir()?;
        let template = locator::locate(
            &working_dir,
            &self.settings.template,
            &self.settings.rendered,
            self.settings.search_depth,
        )?;

        // The locator proved the rendered path absent, so anything that
        // shows up there from now on belongs to this scope.
        let mut scope = SecretScope::own(working_dir.join(&self.settings.rendered), template);

        renderer::render(&tool, &working_dir, &scope.template.relative, &self.settings.rendered)?;
        debug!(path = %scope.rendered.display(), "rendered");

        scope.loaded_keys = loader::load(&scope.rendered)?;

        Ok(scope)
    }

    /// Run `body` with secrets loaded and return its value.
    pub fn run<T, F>(&self, body: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        let _scope = self.enter()?;
        Ok(body())
    }

    /// Run a fallible `body` with secrets loaded.
    ///
    /// Errors from `body` are returned unchanged; lifecycle errors are
    /// converted through `From<InjectError>`.
    pub fn try_run<T, E, F>(&self, body: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: From<InjectError>,
    {
        let _scope = self.enter()?;
        body()
    }

    /// Wrap `f` so every call runs inside a fresh guarded lifecycle.
    ///
    /// Arguments are captured by the closure.
    pub fn wrap<T, F>(self, mut f: F) -> impl FnMut() -> Result<T>
    where
        F: FnMut() -> T,
    {
        move || self.run(&mut f)
    }
}

/// Ownership of one rendered secrets file.
///
/// Dropping the scope deletes the file if it still exists. Environment
/// variables it loaded stay set.
#[derive(Debug)]
#[must_use = "the rendered file is deleted as soon as the scope is dropped"]
pub struct SecretScope {
    rendered: PathBuf,
    template: LocatedTemplate,
    loaded_keys: Vec<String>,
}

impl SecretScope {
    fn own(rendered: PathBuf, template: LocatedTemplate) -> Self {
        cleaner::register(&rendered);
        Self {
            rendered,
            template,
            loaded_keys: Vec::new(),
        }
    }

    /// Path of the rendered file.
    pub fn rendered_path(&self) -> &Path {
        &self.rendered
    }

    /// Template the secrets were rendered from.
    pub fn template(&self) -> &LocatedTemplate {
        &self.template
    }

    /// Names of the variables set from the rendered file, in file order.
    pub fn loaded_keys(&self) -> &[String] {
        &self.loaded_keys
    }

    /// End the scope now.
    pub fn close(self) {}
}

impl Drop for SecretScope {
    fn drop(&mut self) {
        cleaner::remove_rendered(&self.rendered);
        cleaner::unregister(&self.rendered);
    }
}

/// Run `body` with secrets rendered from the nearest template, using
/// default settings.
pub fn with_secrets<T, F>(body: F) -> Result<T>
where
    F: FnOnce() -> T,
{
    Injector::new().run(body)
}

/// Scoped-block form of [`with_secrets`].
pub fn secret_scope() -> Result<SecretScope> {
    Injector::new().enter()
}
