//! Input/output helpers.
//!
//! - series export to CSV (`export`)
//! - session snapshot and cost-surface JSON (`snapshot`)

pub mod export;
pub mod snapshot;

pub use export::*;
pub use snapshot::*;
