//! Stats derived from a puzzle state
//!
//! Nothing here is stored on the state; the UI recomputes on demand.

use serde::{Deserialize, Serialize};

use super::collision::completion_percentage;
use super::state::PuzzleState;
use crate::Timestamp;
use crate::consts::{
    ONE_STAR_MOVES_PER_PIECE, ONE_STAR_SECS_PER_PIECE, TWO_STAR_MOVES_PER_PIECE,
    TWO_STAR_SECS_PER_PIECE,
};

/// Live stats for the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameStats {
    /// 0..=100
    pub completion_percentage: u8,
    pub elapsed_secs: f64,
    /// 1..=3
    pub star_rating: u8,
    pub hints_remaining: u32,
}

/// Payload of the completion event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Seconds from start to the last snap
    pub time_spent: f64,
    pub move_count: u32,
    pub star_rating: u8,
}

pub fn compute_stats(state: &PuzzleState, now: Timestamp) -> GameStats {
    let completion_percentage = if state.is_complete {
        100
    } else {
        completion_percentage(&state.pieces)
    };
    let elapsed_secs = elapsed_secs(state, now);

    GameStats {
        completion_percentage,
        elapsed_secs,
        star_rating: star_rating(elapsed_secs, state.move_count, state.pieces.len()),
        hints_remaining: state.hints_remaining(),
    }
}

/// Seconds since start, frozen at the end time once complete
pub fn elapsed_secs(state: &PuzzleState, now: Timestamp) -> f64 {
    let end = state.end_time.unwrap_or(now);
    end.saturating_sub(state.start_time) as f64 / 1000.0
}

/// 3 stars by default, fewer for slow or move-heavy solves
pub fn star_rating(elapsed_secs: f64, move_count: u32, piece_count: usize) -> u8 {
    if piece_count == 0 {
        return 3;
    }
    let avg_time = elapsed_secs / piece_count as f64;
    let avg_moves = move_count as f64 / piece_count as f64;

    if avg_time > ONE_STAR_SECS_PER_PIECE || avg_moves > ONE_STAR_MOVES_PER_PIECE {
        1
    } else if avg_time > TWO_STAR_SECS_PER_PIECE || avg_moves > TWO_STAR_MOVES_PER_PIECE {
        2
    } else {
        3
    }
}

impl CompletionStats {
    pub fn from_state(state: &PuzzleState, now: Timestamp) -> Self {
        let stats = compute_stats(state, now);
        Self {
            time_spent: stats.elapsed_secs,
            move_count: state.move_count,
            star_rating: stats.star_rating,
        }
    }
}

/// `MM:SS`, minutes keep growing past an hour
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
