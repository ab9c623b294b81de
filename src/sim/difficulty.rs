//! Difficulty levels and their fixed lookup tables

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grid dimensions for a difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
    pub total_pieces: u32,
}

impl GridSize {
    pub const fn square(n: u32) -> Self {
        Self {
            rows: n,
            cols: n,
            total_pieces: n * n,
        }
    }

    /// Longer grid side, which sets the piece size
    #[inline]
    pub fn max_side(&self) -> u32 {
        self.rows.max(self.cols)
    }
}

/// Named grid size
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Difficulty {
    #[serde(rename = "2x2")]
    Easy,
    #[default]
    #[serde(rename = "3x3")]
    Medium,
    #[serde(rename = "4x4")]
    Hard,
    #[serde(rename = "5x5")]
    Challenging,
    #[serde(rename = "6x6")]
    Expert,
    #[serde(rename = "8x8")]
    Master,
}

impl Difficulty {
    /// Every difficulty, easiest first
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Challenging,
        Difficulty::Expert,
        Difficulty::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "2x2",
            Difficulty::Medium => "3x3",
            Difficulty::Hard => "4x4",
            Difficulty::Challenging => "5x5",
            Difficulty::Expert => "6x6",
            Difficulty::Master => "8x8",
        }
    }

    pub fn grid_size(&self) -> GridSize {
        match self {
            Difficulty::Easy => GridSize::square(2),
            Difficulty::Medium => GridSize::square(3),
            Difficulty::Hard => GridSize::square(4),
            Difficulty::Challenging => GridSize::square(5),
            Difficulty::Expert => GridSize::square(6),
            Difficulty::Master => GridSize::square(8),
        }
    }

    /// Distance under which a dropped piece locks to its slot
    pub fn snapping_radius(&self) -> f32 {
        match self {
            Difficulty::Easy => 40.0,
            Difficulty::Medium => 35.0,
            Difficulty::Hard => 30.0,
            Difficulty::Challenging => 27.0,
            Difficulty::Expert => 25.0,
            Difficulty::Master => 20.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy (4 pieces)",
            Difficulty::Medium => "Medium (9 pieces)",
            Difficulty::Hard => "Hard (16 pieces)",
            Difficulty::Challenging => "Challenging (25 pieces)",
            Difficulty::Expert => "Expert (36 pieces)",
            Difficulty::Master => "Master (64 pieces)",
        }
    }

    /// Rough play time shown on the selection screen
    pub fn estimated_time(&self) -> &'static str {
        match self {
            Difficulty::Easy => "1-2 min",
            Difficulty::Medium => "3-5 min",
            Difficulty::Hard => "8-12 min",
            Difficulty::Challenging => "12-20 min",
            Difficulty::Expert => "20-30 min",
            Difficulty::Master => "45-60 min",
        }
    }

    /// Next harder difficulty, if any
    pub fn next(&self) -> Option<Difficulty> {
        let idx = Self::ALL.iter().position(|d| d == self)?;
        Self::ALL.get(idx + 1).copied()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown difficulty '{s}' (expected one of 2x2, 3x3, 4x4, 5x5, 6x6, 8x8)")
            })
    }
}
