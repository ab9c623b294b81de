//! Puzzle state and initialization
//!
//! `PuzzleState` is the aggregate root. It is only ever changed through the
//! reducer, which clones it and returns the new value. The state carries its
//! own seeded RNG, so every transition is reproducible from the initial seed.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::is_puzzle_complete;
use super::difficulty::{Difficulty, GridSize};
use super::piece::{Piece, PieceId};
use super::slicer::{calculate_piece_size, slice};
use crate::consts::{DEFAULT_CANVAS_SIZE, DEFAULT_MAX_HINTS};
use crate::error::Result;
use crate::{Timestamp, clamp_to_canvas};

/// Seed used when the caller doesn't supply one
pub const DEFAULT_SEED: u64 = 0x5EED_2520;

/// Arguments for starting a puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitOptions {
    pub puzzle_id: String,
    pub image_id: String,
    pub canvas_size: f32,
    pub rotation_enabled: bool,
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
    pub max_hints: u32,
    /// Seeds slicing and every later random choice
    pub seed: u64,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            puzzle_id: String::new(),
            image_id: String::new(),
            canvas_size: DEFAULT_CANVAS_SIZE,
            rotation_enabled: true,
            sound_enabled: true,
            haptics_enabled: true,
            max_hints: DEFAULT_MAX_HINTS,
            seed: DEFAULT_SEED,
        }
    }
}

/// Complete puzzle state (serializable, cheap to clone)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleState {
    pub id: String,
    pub image_id: String,
    pub image_ref: String,
    pub difficulty: Difficulty,
    pub grid: GridSize,
    /// Row-major, id == index
    pub pieces: Vec<Piece>,
    /// Edge length of the square canvas
    pub canvas_size: f32,
    pub piece_size: f32,
    pub snapping_radius: f32,
    pub is_complete: bool,
    pub start_time: Timestamp,
    /// Set once, when the last piece snaps
    pub end_time: Option<Timestamp>,
    pub move_count: u32,
    pub hints_used: u32,
    pub max_hints: u32,
    pub rotation_enabled: bool,
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
    /// Next z value handed out; only grows
    pub(crate) next_z: u64,
    pub(crate) rng: Pcg32,
}

impl PuzzleState {
    /// Slice the image and build a fresh puzzle
    pub fn initialize(
        image_ref: &str,
        difficulty: Difficulty,
        options: &InitOptions,
        now: Timestamp,
    ) -> Result<Self> {
        let mut rng = Pcg32::seed_from_u64(options.seed);
        let pieces = slice(image_ref, difficulty, options.canvas_size, &mut rng)?;
        let grid = difficulty.grid_size();
        let next_z = pieces.len() as u64;

        log::info!(
            "Puzzle '{}' initialized: {} pieces, canvas {}, seed {}",
            options.puzzle_id,
            pieces.len(),
            options.canvas_size,
            options.seed
        );

        Ok(Self {
            id: options.puzzle_id.clone(),
            image_id: options.image_id.clone(),
            image_ref: image_ref.to_string(),
            difficulty,
            grid,
            pieces,
            canvas_size: options.canvas_size,
            piece_size: calculate_piece_size(options.canvas_size, grid),
            snapping_radius: difficulty.snapping_radius(),
            is_complete: false,
            start_time: now,
            end_time: None,
            move_count: 0,
            hints_used: 0,
            max_hints: options.max_hints,
            rotation_enabled: options.rotation_enabled,
            sound_enabled: options.sound_enabled,
            haptics_enabled: options.haptics_enabled,
            next_z,
            rng,
        })
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Index of a piece that may still be moved (exists and isn't snapped)
    pub(crate) fn movable_index(&self, id: PieceId) -> Option<usize> {
        self.pieces.iter().position(|p| p.id == id && !p.is_snapped)
    }

    pub fn snapped_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_snapped).count()
    }

    pub fn unsnapped(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| !p.is_snapped)
    }

    pub fn hints_remaining(&self) -> u32 {
        self.max_hints.saturating_sub(self.hints_used)
    }

    /// Clamp a drag position into the canvas (done by callers before
    /// dispatching `UpdatePosition`)
    pub fn clamp_position(&self, x: f32, y: f32) -> Vec2 {
        clamp_to_canvas(Vec2::new(x, y), self.canvas_size, self.piece_size)
    }

    /// Allocate the next z value
    pub(crate) fn bump_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Re-derive `is_complete` / `end_time` from the pieces
    ///
    /// Never clears a completed puzzle and never moves an existing end time.
    pub(crate) fn refresh_completion(&mut self, now: Timestamp) {
        if self.is_complete {
            return;
        }
        if !self.pieces.is_empty() && is_puzzle_complete(&self.pieces) {
            self.is_complete = true;
            self.end_time = Some(now);
        }
    }

    /// Uniform position in `[0, canvas - piece)` on both axes
    pub(crate) fn random_position(&mut self) -> Vec2 {
        let span = (self.canvas_size - self.piece_size).max(0.0);
        Vec2::new(
            self.rng.random::<f32>() * span,
            self.rng.random::<f32>() * span,
        )
    }
}

/// Pick an unplaced piece to highlight for a hint
///
/// Uniform over the unsnapped pieces; None once everything is placed.
pub fn choose_hint_piece<R: Rng + ?Sized>(state: &PuzzleState, rng: &mut R) -> Option<PieceId> {
    let candidates: Vec<PieceId> = state.unsnapped().map(|p| p.id).collect();
    candidates.choose(rng).copied()
}
