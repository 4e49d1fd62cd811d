//! Passsssword - scoped 1Password secrets for local processes.
//!
//! This library renders a `.env.op` template through `op inject`, loads the
//! resulting `.env` into the process environment, runs caller code, and
//! deletes the rendered file afterwards, on every exit path.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod guard;
pub mod loader;
pub mod locator;
pub mod logging;
pub mod renderer;

pub use config::Settings;
pub use error::InjectError;
pub use guard::{secret_scope, with_secrets, Injector, SecretScope};
