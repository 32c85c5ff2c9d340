//! Core data models for the career comparison engine.

mod career;
mod matrix;
mod metric;
mod record;

pub use career::*;
pub use matrix::*;
pub use metric::*;
pub use record::*;
