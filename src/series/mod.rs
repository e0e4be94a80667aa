//! The date-alignment pipeline core.
//!
//! - source-date normalization (`normalize`)
//! - three-series key-union alignment (`align`)
//! - inclusive date-range filtering (`filter`)
//!
//! All stages are synchronous pure functions: fresh output per run, no shared
//! mutable state, no I/O.

pub mod align;
pub mod filter;
pub mod normalize;

pub use align::*;
pub use filter::*;
pub use normalize::*;
