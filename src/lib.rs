//! Jigsaw Engine - state core for a casual jigsaw puzzle game
//!
//! Core modules:
//! - `sim`: Deterministic puzzle engine (slicing, layout, snapping, reducer, stats)
//! - `session`: UI-facing store that owns the state and fires completion events
//! - `audio`: Sound effect collaborator boundary
//! - `haptics`: Vibration feedback collaborator boundary
//! - `progress`: Per-puzzle records and difficulty unlocks
//! - `settings`: Player preferences (JSON)
//! - `error`: Error taxonomy

pub mod audio;
pub mod error;
pub mod haptics;
pub mod progress;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{PuzzleError, Result};
pub use progress::{ProgressBook, PuzzleProgress};
pub use session::{Clock, CompletionListener, ManualClock, PuzzleSession, SystemClock};
pub use settings::Settings;

use glam::Vec2;

/// Milliseconds since the Unix epoch (or any fixed origin a `Clock` picks)
pub type Timestamp = u64;

/// Engine tuning constants
pub mod consts {
    /// Canvas edge length used when the caller doesn't pick one
    pub const DEFAULT_CANVAS_SIZE: f32 = 1024.0;
    /// Hints granted per puzzle
    pub const DEFAULT_MAX_HINTS: u32 = 3;

    /// Pieces never sit closer than this to the right/bottom canvas edge
    pub const CANVAS_EDGE_MARGIN: f32 = 2.0;

    /// Starting scatter jitter, as a fraction of piece size
    pub const SCATTER_JITTER_RATIO: f32 = 0.12;
    /// Smallest jitter amplitude in pixels
    pub const SCATTER_JITTER_MIN: f32 = 2.0;

    /// Tray layout: left edge of the tray as a fraction of the canvas
    pub const TRAY_START_RATIO: f32 = 0.62;
    /// Tray layout: step between stacked pieces as a fraction of piece size
    pub const TRAY_STEP_RATIO: f32 = 0.42;
    pub const TRAY_STEP_MIN: f32 = 18.0;
    pub const TRAY_TOP: f32 = 16.0;
    pub const TRAY_RIGHT_MARGIN: f32 = 8.0;

    /// Search radius for `closest_snapped_piece`
    pub const CLOSEST_SNAPPED_MAX_DISTANCE: f32 = 100.0;
    /// Interlocking tab depth as a fraction of piece size
    pub const DEFAULT_TAB_RATIO: f32 = 0.2;

    /// Star rating thresholds (seconds / moves per piece)
    pub const TWO_STAR_SECS_PER_PIECE: f64 = 30.0;
    pub const TWO_STAR_MOVES_PER_PIECE: f64 = 5.0;
    pub const ONE_STAR_SECS_PER_PIECE: f64 = 60.0;
    pub const ONE_STAR_MOVES_PER_PIECE: f64 = 10.0;
}

/// Largest top-left coordinate a piece may take on either axis
#[inline]
pub fn max_piece_offset(canvas_size: f32, piece_size: f32) -> f32 {
    (canvas_size - piece_size - consts::CANVAS_EDGE_MARGIN).max(0.0)
}

/// Clamp a top-left position so the piece stays inside the canvas
#[inline]
pub fn clamp_to_canvas(pos: Vec2, canvas_size: f32, piece_size: f32) -> Vec2 {
    let max = max_piece_offset(canvas_size, piece_size);
    Vec2::new(pos.x.clamp(0.0, max), pos.y.clamp(0.0, max))
}
