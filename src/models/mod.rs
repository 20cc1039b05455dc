//! Core data models for the tier board.

mod classification;
mod record;
mod score_gain;
mod tier;

pub use classification::*;
pub use record::*;
pub use score_gain::*;
pub use tier::*;
