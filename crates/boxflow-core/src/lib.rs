//! boxflow core
//!
//! Data model and configuration plumbing shared by the build and publish
//! stages: the target catalog, project discovery, the `site-local.env`
//! overlay, environment-derived settings and typed command invocations.

pub mod catalog;
pub mod discovery;
pub mod error;
pub mod invocation;
pub mod model;
pub mod settings;
pub mod site_env;

pub use catalog::Catalog;
pub use discovery::{ProjectPaths, find_project_root};
pub use error::{ConfigError, Result};
pub use invocation::{Invocation, shell_escape};
pub use model::*;
pub use settings::Settings;
pub use site_env::{apply_site_env, diff_env};
