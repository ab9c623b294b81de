//! Puzzle piece type
//!
//! A piece is one square tile of the source image. Its grid slot is fixed at
//! slicing time; only its canvas position, rotation, z order and snap flag
//! change during play.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable piece identifier (row-major index into the grid)
pub type PieceId = u32;

/// Region of the source image a piece renders, in source pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    /// Grid column of the correct slot
    pub grid_col: u32,
    /// Grid row of the correct slot
    pub grid_row: u32,
    pub source_rect: SourceRect,
    /// Top-left corner on the canvas
    pub current_position: Vec2,
    /// Where the piece belongs: `(grid_col, grid_row) * piece_size`
    pub target_position: Vec2,
    /// Degrees in [0, 360)
    pub rotation: f32,
    /// Locked in place; immovable from here on
    pub is_snapped: bool,
    /// Paint/interaction order, higher is on top
    pub z_index: u64,
}

impl Piece {
    /// Lock the piece into its slot
    pub fn snap(&mut self) {
        self.current_position = self.target_position;
        self.is_snapped = true;
        self.rotation = 0.0;
    }

    /// Distance from the current position to the target slot
    #[inline]
    pub fn distance_to_target(&self) -> f32 {
        self.current_position.distance(self.target_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece_at(x: f32, y: f32) -> Piece {
        Piece {
            id: 0,
            grid_col: 1,
            grid_row: 1,
            source_rect: SourceRect {
                x: 100.0,
                y: 100.0,
                width: 100.0,
                height: 100.0,
            },
            current_position: Vec2::new(x, y),
            target_position: Vec2::new(100.0, 100.0),
            rotation: 90.0,
            is_snapped: false,
            z_index: 0,
        }
    }

    #[test]
    fn test_snap_moves_to_target_and_clears_rotation() {
        let mut piece = piece_at(130.0, 140.0);
        piece.snap();
        assert!(piece.is_snapped);
        assert_eq!(piece.current_position, piece.target_position);
        assert_eq!(piece.rotation, 0.0);
    }

    #[test]
    fn test_distance_to_target() {
        let piece = piece_at(103.0, 104.0);
        assert!((piece.distance_to_target() - 5.0).abs() < 1e-5);
    }
}
