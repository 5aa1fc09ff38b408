//! The score card shown on the share screen.
//!
//! A card is built once and handed to the screen as a prop; there is no
//! mutation path. The total is always derived from the per-hole strokes.

use serde::{Deserialize, Serialize};

use super::format;

/// Number of holes on a card (front nine).
pub const HOLE_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleScore {
    /// 1-based hole number; matches display order.
    pub hole: u8,
    pub strokes: u32,
}

impl HoleScore {
    pub fn label(&self) -> String {
        format::hole_label(self.hole)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    course_name: String,
    holes: [HoleScore; HOLE_COUNT],
}

impl ScoreCard {
    /// Builds a card from strokes in hole order (hole 1 first).
    pub fn new(course_name: impl Into<String>, strokes: [u32; HOLE_COUNT]) -> Self {
        let mut hole = 0u8;
        let holes = strokes.map(|strokes| {
            hole += 1;
            HoleScore { hole, strokes }
        });
        Self {
            course_name: course_name.into(),
            holes,
        }
    }

    /// Today's round at Mountain View.
    pub fn mountain_view() -> Self {
        Self::new("Mountain View Golf Club", [4, 3, 5, 4, 3, 4, 5, 3, 4])
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    pub fn holes(&self) -> &[HoleScore] {
        &self.holes
    }

    pub fn total_score(&self) -> u32 {
        self.holes.iter().map(|h| h.strokes).sum()
    }

    pub fn total_label(&self) -> String {
        format::total_label(self.total_score())
    }
}

impl Default for ScoreCard {
    fn default() -> Self {
        Self::mountain_view()
    }
}
