//! Platform-agnostic building blocks: the score model, label formatting and
//! target detection.

pub mod format;
pub mod platform;
pub mod scorecard;
