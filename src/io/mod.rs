//! Input/output helpers.
//!
//! - filtered-record CSV export (`export`)
//! - dashboard JSON read/write (`dashboard`)

pub mod dashboard;
pub mod export;

pub use dashboard::*;
pub use export::*;
