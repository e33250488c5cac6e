//! Deploy stage for boxflow
//!
//! Hands built artifacts to the per-family `os/deploy.<family>.sh` scripts and
//! invalidates the cache for every deployed target. Families that ship a
//! `can-batch` marker get a single grouped invocation after all targets.

pub mod deferred;
pub mod error;
pub mod outcome;
pub mod publisher;

pub use deferred::{DeferredGroup, DeferredGroups};
pub use error::{DeployError, Result};
pub use outcome::{NON_FATAL_EXIT_CODE, ScriptOutcome};
pub use publisher::{PublishOptions, PublishReport, Publisher};
