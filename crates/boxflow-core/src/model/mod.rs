//! Data model
//!
//! Build targets as declared in `confs/machines.json`.

mod target;

pub use target::*;
