//! Deterministic puzzle engine
//!
//! All gameplay rules live here. This module must stay pure:
//! - Seeded RNG only (carried on the state)
//! - Time is passed in, never read
//! - Stable iteration order (by piece id)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod difficulty;
pub mod layout;
pub mod piece;
pub mod reducer;
pub mod slicer;
pub mod state;
pub mod stats;

pub use collision::{
    PieceCollision, adjacent_pieces, boxes_overlap, check_snap, closest_snapped_piece,
    colliding_pieces, completion_percentage, detect_pile, distance, is_corner_piece,
    is_edge_piece, is_puzzle_complete, magnetic_force, separate_overlapping,
};
pub use difficulty::{Difficulty, GridSize};
pub use layout::{LayoutMode, compute_layout};
pub use piece::{Piece, PieceId, SourceRect};
pub use reducer::{Action, reduce};
pub use slicer::{calculate_piece_size, interlocking_outline, piece_outline, scatter_slots, slice};
pub use state::{DEFAULT_SEED, InitOptions, PuzzleState, choose_hint_piece};
pub use stats::{CompletionStats, GameStats, compute_stats, format_time, star_rating};
