//! Packing of unsnapped pieces
//!
//! Two deterministic layouts:
//! - `Spread`: a near-square grid over the whole canvas, ordered by piece id
//! - `Tray`: a compact stack on the right side, ordered by current visual
//!   position so pieces shift minimally when one leaves the tray
//!
//! Snapped pieces never move. Every position is clamped to
//! `[0, canvas - piece - 2]` on both axes.

use std::cmp::Ordering;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceId};
use crate::consts::{TRAY_RIGHT_MARGIN, TRAY_START_RATIO, TRAY_STEP_MIN, TRAY_STEP_RATIO, TRAY_TOP};
use crate::max_piece_offset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    Spread,
    Tray,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Spread => "spread",
            LayoutMode::Tray => "tray",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spread" => Some(LayoutMode::Spread),
            "tray" => Some(LayoutMode::Tray),
            _ => None,
        }
    }

    /// The other mode (layout toggle button)
    pub fn toggled(&self) -> Self {
        match self {
            LayoutMode::Spread => LayoutMode::Tray,
            LayoutMode::Tray => LayoutMode::Spread,
        }
    }
}

/// New positions for every unsnapped piece except `exclude`
///
/// Returned in assignment order. Empty when nothing is left to place.
pub fn compute_layout(
    pieces: &[Piece],
    canvas_size: f32,
    piece_size: f32,
    mode: LayoutMode,
    exclude: Option<PieceId>,
) -> Vec<(PieceId, Vec2)> {
    let mut loose: Vec<&Piece> = pieces
        .iter()
        .filter(|p| !p.is_snapped && Some(p.id) != exclude)
        .collect();
    if loose.is_empty() {
        return Vec::new();
    }
    let max = max_piece_offset(canvas_size, piece_size);

    match mode {
        LayoutMode::Spread => {
            let count = loose.len();
            let cols = ((count as f32).sqrt().ceil() as usize).max(1);
            let rows = count.div_ceil(cols).max(1);
            let step_x = if cols == 1 { 0.0 } else { max / (cols - 1) as f32 };
            let step_y = if rows == 1 { 0.0 } else { max / (rows - 1) as f32 };
            loose.sort_by_key(|p| p.id);

            loose
                .iter()
                .enumerate()
                .map(|(idx, p)| {
                    let col = idx % cols;
                    let row = idx / cols;
                    let x = (col as f32 * step_x).round().clamp(0.0, max);
                    let y = (row as f32 * step_y).round().clamp(0.0, max);
                    (p.id, Vec2::new(x, y))
                })
                .collect()
        }
        LayoutMode::Tray => {
            let tray_start_x = (canvas_size * TRAY_START_RATIO).floor();
            let step = (piece_size * TRAY_STEP_RATIO).floor().max(TRAY_STEP_MIN);
            let available = (canvas_size - tray_start_x - piece_size - TRAY_RIGHT_MARGIN).max(step);
            let cols = ((available / step).floor() as usize).max(1);

            // Stable sort keeps id order for pieces stacked on the same spot
            loose.sort_by(|a, b| visual_order(a.current_position, b.current_position));

            loose
                .iter()
                .enumerate()
                .map(|(idx, p)| {
                    let col = idx % cols;
                    let row = idx / cols;
                    let x = (tray_start_x + col as f32 * step).clamp(0.0, max);
                    let y = (TRAY_TOP + row as f32 * step).clamp(0.0, max);
                    (p.id, Vec2::new(x, y))
                })
                .collect()
        }
    }
}

/// Top-to-bottom, then left-to-right
fn visual_order(a: Vec2, b: Vec2) -> Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::piece::SourceRect;
    use proptest::prelude::*;

    fn loose_piece(id: PieceId, pos: Vec2) -> Piece {
        Piece {
            id,
            grid_col: id,
            grid_row: 0,
            source_rect: SourceRect {
                x: 0.0,
                y: 0.0,
                width: 50.0,
                height: 50.0,
            },
            current_position: pos,
            target_position: Vec2::ZERO,
            rotation: 0.0,
            is_snapped: false,
            z_index: 0,
        }
    }

    #[test]
    fn test_spread_four_pieces_hits_corners() {
        let pieces: Vec<Piece> = (0..4).map(|i| loose_piece(i, Vec2::ZERO)).collect();
        let layout = compute_layout(&pieces, 200.0, 100.0, LayoutMode::Spread, None);
        let positions: Vec<(PieceId, (f32, f32))> =
            layout.iter().map(|(id, p)| (*id, (p.x, p.y))).collect();
        assert_eq!(
            positions,
            vec![
                (0, (0.0, 0.0)),
                (1, (98.0, 0.0)),
                (2, (0.0, 98.0)),
                (3, (98.0, 98.0)),
            ]
        );
    }

    #[test]
    fn test_spread_single_piece_sits_at_origin() {
        let pieces = vec![loose_piece(5, Vec2::new(40.0, 40.0))];
        let layout = compute_layout(&pieces, 200.0, 100.0, LayoutMode::Spread, None);
        assert_eq!(layout, vec![(5, Vec2::ZERO)]);
    }

    #[test]
    fn test_skips_snapped_and_excluded() {
        let mut pieces: Vec<Piece> = (0..4).map(|i| loose_piece(i, Vec2::ZERO)).collect();
        pieces[0].snap();
        let layout = compute_layout(&pieces, 400.0, 100.0, LayoutMode::Tray, Some(2));
        let ids: Vec<PieceId> = layout.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 3]);

        for p in pieces.iter_mut() {
            p.snap();
        }
        assert!(compute_layout(&pieces, 400.0, 100.0, LayoutMode::Spread, None).is_empty());
    }

    #[test]
    fn test_tray_orders_by_visual_position() {
        // canvas 1000, piece 125: tray starts at 620, step 52, cols = 247 / 52 = 4
        let pieces = vec![
            loose_piece(0, Vec2::new(500.0, 300.0)),
            loose_piece(1, Vec2::new(10.0, 10.0)),
            loose_piece(2, Vec2::new(400.0, 10.0)),
        ];
        let layout = compute_layout(&pieces, 1000.0, 125.0, LayoutMode::Tray, None);
        assert_eq!(
            layout,
            vec![
                (1, Vec2::new(620.0, 16.0)),
                (2, Vec2::new(672.0, 16.0)),
                (0, Vec2::new(724.0, 16.0)),
            ]
        );
    }

    #[test]
    fn test_tray_wraps_rows() {
        let pieces: Vec<Piece> = (0..6)
            .map(|i| loose_piece(i, Vec2::new(i as f32, 0.0)))
            .collect();
        let layout = compute_layout(&pieces, 1000.0, 125.0, LayoutMode::Tray, None);
        assert_eq!(layout[4], (4, Vec2::new(620.0, 68.0)));
    }

    #[test]
    fn test_mode_helpers() {
        assert_eq!(LayoutMode::from_str("TRAY"), Some(LayoutMode::Tray));
        assert_eq!(LayoutMode::from_str("grid"), None);
        assert_eq!(LayoutMode::Spread.toggled(), LayoutMode::Tray);
        assert_eq!(LayoutMode::Tray.as_str(), "tray");
    }

    proptest! {
        #[test]
        fn prop_layout_stays_clamped(
            count in 1u32..80,
            canvas in 100.0f32..2000.0,
            side in 2u32..=8,
            tray in any::<bool>(),
            xs in prop::collection::vec(0.0f32..2000.0, 80),
        ) {
            let piece_size = canvas / side as f32;
            let pieces: Vec<Piece> = (0..count)
                .map(|i| loose_piece(i, Vec2::new(xs[i as usize], xs[79 - i as usize])))
                .collect();
            let mode = if tray { LayoutMode::Tray } else { LayoutMode::Spread };
            let layout = compute_layout(&pieces, canvas, piece_size, mode, None);
            let max = canvas - piece_size - 2.0;
            prop_assert_eq!(layout.len(), count as usize);
            for (_, pos) in layout {
                prop_assert!(pos.x >= 0.0 && pos.x <= max);
                prop_assert!(pos.y >= 0.0 && pos.y <= max);
            }
        }
    }
}
