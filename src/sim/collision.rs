//! Collision detection and snapping for square pieces
//!
//! Everything here is a pure function of its arguments. Overlap tests use each
//! piece's `current_position` as the top-left corner of a `size x size` box;
//! adjacency and edge tests only look at grid coordinates.

use glam::Vec2;

use super::piece::{Piece, PieceId};

/// Overlap between a piece and one of its neighbours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceCollision {
    pub other: PieceId,
    /// Distance between the two top-left corners
    pub distance: f32,
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Axis-aligned bounding box intersection (touching edges don't count)
pub fn boxes_overlap(a: &Piece, b: &Piece, size: f32) -> bool {
    let p1 = a.current_position;
    let p2 = b.current_position;
    p1.x < p2.x + size && p1.x + size > p2.x && p1.y < p2.y + size && p1.y + size > p2.y
}

/// True if the piece is close enough to its slot to lock in
#[inline]
pub fn check_snap(piece: &Piece, radius: f32) -> bool {
    piece.distance_to_target() <= radius
}

/// True if every piece is snapped
pub fn is_puzzle_complete(pieces: &[Piece]) -> bool {
    pieces.iter().all(|p| p.is_snapped)
}

/// Rounded percentage of snapped pieces (0 for an empty set)
pub fn completion_percentage(pieces: &[Piece]) -> u8 {
    if pieces.is_empty() {
        return 0;
    }
    let snapped = pieces.iter().filter(|p| p.is_snapped).count();
    ((snapped as f64 / pieces.len() as f64) * 100.0).round() as u8
}

/// All other pieces whose boxes overlap `piece`
pub fn colliding_pieces(piece: &Piece, all: &[Piece], size: f32) -> Vec<PieceCollision> {
    all.iter()
        .filter(|other| other.id != piece.id && boxes_overlap(piece, other, size))
        .map(|other| PieceCollision {
            other: other.id,
            distance: distance(piece.current_position, other.current_position),
        })
        .collect()
}

/// Ids of the pieces stacked under or over `piece`
pub fn detect_pile(piece: &Piece, all: &[Piece], size: f32) -> Vec<PieceId> {
    all.iter()
        .filter(|other| other.id != piece.id && boxes_overlap(piece, other, size))
        .map(|other| other.id)
        .collect()
}

/// Grid neighbours in top, right, bottom, left order
pub fn adjacent_pieces<'a>(piece: &Piece, all: &'a [Piece]) -> Vec<&'a Piece> {
    const DIRS: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
    let col = piece.grid_col as i64;
    let row = piece.grid_row as i64;
    DIRS.iter()
        .filter_map(|(dx, dy)| {
            all.iter()
                .find(|p| p.grid_col as i64 == col + dx && p.grid_row as i64 == row + dy)
        })
        .collect()
}

/// True for pieces on the outer border of the grid
pub fn is_edge_piece(piece: &Piece, rows: u32, cols: u32) -> bool {
    piece.grid_col == 0
        || piece.grid_row == 0
        || piece.grid_col + 1 == cols
        || piece.grid_row + 1 == rows
}

/// True for the four corner pieces
pub fn is_corner_piece(piece: &Piece, rows: u32, cols: u32) -> bool {
    (piece.grid_col == 0 || piece.grid_col + 1 == cols)
        && (piece.grid_row == 0 || piece.grid_row + 1 == rows)
}

/// Nearest snapped piece strictly within `max_distance`
pub fn closest_snapped_piece<'a>(
    piece: &Piece,
    all: &'a [Piece],
    max_distance: f32,
) -> Option<&'a Piece> {
    let mut closest = None;
    let mut closest_distance = max_distance;
    for other in all {
        if other.id == piece.id || !other.is_snapped {
            continue;
        }
        let dist = distance(piece.current_position, other.current_position);
        if dist < closest_distance {
            closest_distance = dist;
            closest = Some(other);
        }
    }
    closest
}

/// Unit pull from `from` toward `to`, scaled by `strength`
///
/// Zero when the points coincide.
pub fn magnetic_force(from: Vec2, to: Vec2, strength: f32) -> Vec2 {
    (to - from).normalize_or_zero() * strength
}

/// Push two overlapping positions apart along their center line
///
/// Returns the new `(a, b)` positions. Coincident points don't have a line
/// to push along, so they stay put.
pub fn separate_overlapping(a: Vec2, b: Vec2, force: f32) -> (Vec2, Vec2) {
    let delta = a - b;
    let dist = delta.length();
    let dist = if dist == 0.0 { 1.0 } else { dist };
    let push = delta / dist * force;
    (a + push, b - push)
}
