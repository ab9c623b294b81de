//! Image slicing: grid pieces with scattered starting positions
//!
//! The slicer never touches pixels. It computes the source rectangle each
//! piece renders and where on the canvas it starts and belongs. The scatter
//! is a derangement of grid slots with a small jitter, so no piece starts in
//! its own slot.

use std::fmt::Write;

use glam::Vec2;
use rand::Rng;

use super::difficulty::{Difficulty, GridSize};
use super::piece::{Piece, PieceId, SourceRect};
use crate::consts::{SCATTER_JITTER_MIN, SCATTER_JITTER_RATIO};
use crate::error::{PuzzleError, Result};
use crate::max_piece_offset;

/// Edge length of one square piece
#[inline]
pub fn calculate_piece_size(canvas_size: f32, grid: GridSize) -> f32 {
    canvas_size / grid.max_side() as f32
}

/// Reject inputs that can't produce a puzzle
pub fn validate_input(image_ref: &str, canvas_size: f32) -> Result<()> {
    if image_ref.trim().is_empty() {
        return Err(PuzzleError::InvalidInput(
            "image reference is empty".to_string(),
        ));
    }
    if !canvas_size.is_finite() || canvas_size <= 0.0 {
        return Err(PuzzleError::InvalidInput(format!(
            "canvas size must be positive, got {canvas_size}"
        )));
    }
    Ok(())
}

/// Slice an image into row-major pieces with scattered start positions
pub fn slice<R: Rng + ?Sized>(
    image_ref: &str,
    difficulty: Difficulty,
    canvas_size: f32,
    rng: &mut R,
) -> Result<Vec<Piece>> {
    if let Err(err) = validate_input(image_ref, canvas_size) {
        log::warn!("Refusing to slice '{}': {}", image_ref, err);
        return Err(err);
    }

    let grid = difficulty.grid_size();
    let piece_size = calculate_piece_size(canvas_size, grid);
    let max_offset = max_piece_offset(canvas_size, piece_size);
    let jitter = (piece_size * SCATTER_JITTER_RATIO).floor().max(SCATTER_JITTER_MIN);
    let slots = scatter_slots(grid.total_pieces as usize, rng);

    let mut pieces = Vec::with_capacity(slots.len());
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let index = (row * grid.cols + col) as usize;
            let start_slot = slots[index] as u32;
            let start_col = start_slot % grid.cols;
            let start_row = start_slot / grid.cols;

            let jitter_x = (rng.random_range(-1.0f32..=1.0) * jitter).round();
            let jitter_y = (rng.random_range(-1.0f32..=1.0) * jitter).round();
            let start = Vec2::new(
                (start_col as f32 * piece_size + jitter_x).clamp(0.0, max_offset),
                (start_row as f32 * piece_size + jitter_y).clamp(0.0, max_offset),
            );
            let target = Vec2::new(col as f32 * piece_size, row as f32 * piece_size);

            pieces.push(Piece {
                id: index as PieceId,
                grid_col: col,
                grid_row: row,
                source_rect: SourceRect {
                    x: target.x,
                    y: target.y,
                    width: piece_size,
                    height: piece_size,
                },
                current_position: start,
                target_position: target,
                rotation: 0.0,
                is_snapped: false,
                z_index: index as u64,
            });
        }
    }

    log::info!(
        "Sliced '{}' into {} pieces ({}, piece size {:.1})",
        image_ref,
        pieces.len(),
        difficulty,
        piece_size
    );
    Ok(pieces)
}

/// Random permutation of `0..count` with no fixed points when `count > 1`
///
/// Fisher-Yates shuffle, then any `slots[i] == i` is swapped with its right
/// neighbour (wrapping). Entry `i` is the slot piece `i` starts in.
pub fn scatter_slots<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<usize> {
    let mut slots: Vec<usize> = (0..count).collect();
    for i in (1..count).rev() {
        let j = rng.random_range(0..=i);
        slots.swap(i, j);
    }
    if count > 1 {
        for i in 0..count {
            if slots[i] == i {
                slots.swap(i, (i + 1) % count);
            }
        }
    }
    slots
}

/// SVG path of a piece's plain square outline, in source space
pub fn piece_outline(piece: &Piece) -> String {
    let SourceRect { x, y, width, height } = piece.source_rect;
    format!(
        "M {} {} L {} {} L {} {} L {} {} Z",
        x,
        y,
        x + width,
        y,
        x + width,
        y + height,
        x,
        y + height
    )
}

/// SVG path with a rounded tab on every edge that faces another piece
///
/// Border edges stay straight. `tab_ratio` is the tab depth as a fraction
/// of `piece_size`.
pub fn interlocking_outline(
    piece: &Piece,
    grid: GridSize,
    piece_size: f32,
    tab_ratio: f32,
) -> String {
    let x = piece.source_rect.x;
    let y = piece.source_rect.y;
    let right = x + piece_size;
    let bottom = y + piece_size;
    let mid_x = x + piece_size / 2.0;
    let mid_y = y + piece_size / 2.0;
    let tab = piece_size * tab_ratio;
    let half = tab / 2.0;
    let mut path = String::new();

    // Writing to a String can't fail
    let _ = write!(path, "M {x} {y}");

    if piece.grid_row > 0 {
        let _ = write!(path, " L {} {y}", mid_x - half);
        let _ = write!(path, " Q {mid_x} {} {} {y}", y - tab, mid_x + half);
    }
    let _ = write!(path, " L {right} {y}");

    if piece.grid_col + 1 < grid.cols {
        let _ = write!(path, " L {right} {}", mid_y - half);
        let _ = write!(path, " Q {} {mid_y} {right} {}", right + tab, mid_y + half);
    }
    let _ = write!(path, " L {right} {bottom}");

    if piece.grid_row + 1 < grid.rows {
        let _ = write!(path, " L {} {bottom}", mid_x + half);
        let _ = write!(path, " Q {mid_x} {} {} {bottom}", bottom + tab, mid_x - half);
    }
    let _ = write!(path, " L {x} {bottom}");

    if piece.grid_col > 0 {
        let _ = write!(path, " L {x} {}", mid_y + half);
        let _ = write!(path, " Q {} {mid_y} {x} {}", x - tab, mid_y - half);
    }
    let _ = write!(path, " L {x} {y} Z");
    path
}
