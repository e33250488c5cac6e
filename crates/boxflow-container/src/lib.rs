pub mod converter;
pub mod docker;
pub mod entrypoint;
pub mod error;
pub mod resolver;
pub mod runner;
pub mod runtime;
#[cfg(any(test, feature = "test-util"))]
pub mod testutil;

pub use converter::*;
pub use docker::*;
pub use entrypoint::*;
pub use error::*;
pub use resolver::*;
pub use runner::*;
pub use runtime::*;
