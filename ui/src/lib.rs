//! Shared UI crate for Fairway: the score model, the capture-and-share
//! workflow and the screen every platform shell renders.

pub mod core;
pub mod share;
pub mod views;

/// Shared theme, embedded by every shell.
pub const THEME_CSS: &str = include_str!("../assets/theme/main.css");

/// Course photo behind the card, shown on screen and composited into captures.
pub const BACKGROUND_PNG: &[u8] = include_bytes!("../assets/images/golf-background.png");
