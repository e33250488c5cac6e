//! boxflow build orchestration
//!
//! Validates every requested target before running any of them, then builds
//! them one after another and reports which succeeded.

pub mod error;
pub mod orchestrator;
pub mod report;

pub use error::{BuildError, Result};
pub use orchestrator::{BuildOrchestrator, BuildPhase, ValidatedTarget};
pub use report::{BuildReport, BuildReporter, NoopReporter};
