//! Puzzle reducer
//!
//! `reduce(state, action, now)` is pure: it never mutates its input. A no-op
//! returns `Cow::Borrowed(state)`, anything else returns a new owned state.
//!
//! Rules the reducer upholds:
//! - snapped pieces never move, rotate or re-snap
//! - `move_count` only grows on a real position update
//! - a complete puzzle stays complete (only `ResetPuzzle` starts over)
//! - stale piece ids and exhausted hints are ignored, never errors

use std::borrow::Cow;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::collision::check_snap;
use super::layout::{LayoutMode, compute_layout};
use super::piece::PieceId;
use super::state::PuzzleState;
use crate::Timestamp;
use crate::max_piece_offset;

/// Everything the UI can ask of the puzzle
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the state wholesale with a freshly initialized puzzle
    InitComplete(Box<PuzzleState>),
    /// Raise a grabbed piece above the others
    BringToFront { piece_id: PieceId },
    /// Drag a piece; x/y are already clamped by the caller
    UpdatePosition { piece_id: PieceId, x: f32, y: f32 },
    UpdateRotation { piece_id: PieceId, rotation: f32 },
    /// Re-layout every unsnapped piece
    SetLayout { mode: LayoutMode },
    /// Re-layout every unsnapped piece except the one being dragged
    Repack {
        mode: LayoutMode,
        exclude: Option<PieceId>,
    },
    /// Lock a piece into its slot if it's within the snapping radius
    SnapPiece { piece_id: PieceId },
    /// Release the first snapped piece back onto the canvas
    UndoMove,
    UseHint,
    ShuffleUnsnapped,
    ToggleSound,
    ToggleHaptics,
    CheckCompletion,
    /// Unsnap everything, scatter, and restart the clock
    ResetPuzzle,
}

/// Apply one action
pub fn reduce(state: &PuzzleState, action: Action, now: Timestamp) -> Cow<'_, PuzzleState> {
    match action {
        Action::InitComplete(next) => Cow::Owned(*next),

        Action::BringToFront { piece_id } => {
            let Some(idx) = state.movable_index(piece_id) else {
                return Cow::Borrowed(state);
            };
            let mut next = state.clone();
            next.pieces[idx].z_index = next.bump_z();
            Cow::Owned(next)
        }

        Action::UpdatePosition { piece_id, x, y } => {
            let Some(idx) = state.movable_index(piece_id) else {
                return Cow::Borrowed(state);
            };
            let mut next = state.clone();
            let z = next.bump_z();
            let piece = &mut next.pieces[idx];
            piece.current_position = Vec2::new(x, y);
            piece.z_index = z;
            next.move_count += 1;
            Cow::Owned(next)
        }

        Action::UpdateRotation { piece_id, rotation } => {
            let Some(idx) = state.movable_index(piece_id) else {
                return Cow::Borrowed(state);
            };
            let mut next = state.clone();
            next.pieces[idx].rotation = rotation.rem_euclid(360.0);
            Cow::Owned(next)
        }

        Action::SetLayout { mode } => apply_layout(state, mode, None),

        Action::Repack { mode, exclude } => apply_layout(state, mode, exclude),

        Action::SnapPiece { piece_id } => {
            let Some(idx) = state.movable_index(piece_id) else {
                return Cow::Borrowed(state);
            };
            if !check_snap(&state.pieces[idx], state.snapping_radius) {
                return Cow::Borrowed(state);
            }
            let mut next = state.clone();
            next.pieces[idx].snap();
            next.refresh_completion(now);
            log::debug!(
                "Snapped piece {} ({}/{})",
                piece_id,
                next.snapped_count(),
                next.pieces.len()
            );
            if next.is_complete {
                log::info!(
                    "Puzzle '{}' complete in {} moves",
                    next.id,
                    next.move_count
                );
            }
            Cow::Owned(next)
        }

        Action::UndoMove => {
            // No move history: the first snapped piece found is released
            if state.is_complete {
                return Cow::Borrowed(state);
            }
            let Some(idx) = state.pieces.iter().position(|p| p.is_snapped) else {
                return Cow::Borrowed(state);
            };
            let mut next = state.clone();
            let pos = next.random_position();
            let piece = &mut next.pieces[idx];
            piece.current_position = pos;
            piece.is_snapped = false;
            next.move_count = next.move_count.saturating_sub(1);
            log::debug!("Undo released piece {}", next.pieces[idx].id);
            Cow::Owned(next)
        }

        Action::UseHint => {
            if state.hints_used >= state.max_hints || state.unsnapped().next().is_none() {
                return Cow::Borrowed(state);
            }
            let mut next = state.clone();
            next.hints_used += 1;
            Cow::Owned(next)
        }

        Action::ShuffleUnsnapped => {
            let mut order: Vec<usize> = state
                .pieces
                .iter()
                .enumerate()
                .filter(|(_, p)| !p.is_snapped)
                .map(|(idx, _)| idx)
                .collect();
            if order.is_empty() {
                return Cow::Borrowed(state);
            }
            let mut next = state.clone();
            let max = max_piece_offset(next.canvas_size, next.piece_size);
            order.shuffle(&mut next.rng);
            for idx in order {
                let x = next.rng.random::<f32>() * max;
                let y = next.rng.random::<f32>() * max;
                let z = next.bump_z();
                let piece = &mut next.pieces[idx];
                piece.current_position = Vec2::new(x, y);
                piece.z_index = z;
            }
            Cow::Owned(next)
        }

        Action::ToggleSound => {
            let mut next = state.clone();
            next.sound_enabled = !next.sound_enabled;
            Cow::Owned(next)
        }

        Action::ToggleHaptics => {
            let mut next = state.clone();
            next.haptics_enabled = !next.haptics_enabled;
            Cow::Owned(next)
        }

        Action::CheckCompletion => {
            if state.is_complete || state.unsnapped().next().is_some() || state.pieces.is_empty() {
                return Cow::Borrowed(state);
            }
            let mut next = state.clone();
            next.refresh_completion(now);
            Cow::Owned(next)
        }

        Action::ResetPuzzle => {
            let mut next = state.clone();
            for idx in 0..next.pieces.len() {
                let pos = next.random_position();
                let piece = &mut next.pieces[idx];
                piece.current_position = pos;
                piece.is_snapped = false;
                piece.rotation = 0.0;
            }
            next.is_complete = false;
            next.end_time = None;
            next.move_count = 0;
            next.hints_used = 0;
            next.start_time = now;
            log::info!("Puzzle '{}' reset", next.id);
            Cow::Owned(next)
        }
    }
}

/// Move the unsnapped pieces (minus `exclude`) to their layout slots
fn apply_layout(
    state: &PuzzleState,
    mode: LayoutMode,
    exclude: Option<PieceId>,
) -> Cow<'_, PuzzleState> {
    let positions = compute_layout(
        &state.pieces,
        state.canvas_size,
        state.piece_size,
        mode,
        exclude,
    );
    if positions.is_empty() {
        return Cow::Borrowed(state);
    }

    let mut next = state.clone();
    let z_base = next.next_z;
    for (id, pos) in positions {
        if let Some(idx) = next.pieces.iter().position(|p| p.id == id) {
            let piece = &mut next.pieces[idx];
            piece.current_position = pos;
            piece.z_index = z_base + idx as u64;
        }
    }
    next.next_z = z_base + next.pieces.len() as u64;
    log::debug!("Applied {} layout (exclude {:?})", mode.as_str(), exclude);
    Cow::Owned(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Difficulty;
    use crate::sim::state::InitOptions;
    use proptest::prelude::*;

    fn new_state(difficulty: Difficulty, canvas: f32, seed: u64) -> PuzzleState {
        let options = InitOptions {
            puzzle_id: "test".to_string(),
            canvas_size: canvas,
            seed,
            ..Default::default()
        };
        PuzzleState::initialize("img.png", difficulty, &options, 0).unwrap()
    }

    /// Drop a piece exactly on its target and snap it
    fn place(state: PuzzleState, id: PieceId, now: Timestamp) -> PuzzleState {
        let target = state.pieces[id as usize].target_position;
        let state = reduce(
            &state,
            Action::UpdatePosition {
                piece_id: id,
                x: target.x,
                y: target.y,
            },
            now,
        )
        .into_owned();
        reduce(&state, Action::SnapPiece { piece_id: id }, now).into_owned()
    }

    fn assert_invariants(state: &PuzzleState) {
        assert_eq!(state.is_complete, state.pieces.iter().all(|p| p.is_snapped));
        assert_eq!(state.end_time.is_some(), state.is_complete);
        for p in state.pieces.iter().filter(|p| p.is_snapped) {
            assert_eq!(p.current_position, p.target_position);
            assert_eq!(p.rotation, 0.0);
        }
    }

    #[test]
    fn test_update_position_counts_moves() {
        let mut state = new_state(Difficulty::Easy, 200.0, 1);
        for i in 0..3 {
            state = reduce(
                &state,
                Action::UpdatePosition {
                    piece_id: 2,
                    x: 10.0 * i as f32,
                    y: 5.0,
                },
                0,
            )
            .into_owned();
        }
        assert_eq!(state.move_count, 3);
        assert_eq!(state.pieces[2].current_position, Vec2::new(20.0, 5.0));
        let top = state.pieces.iter().map(|p| p.z_index).max().unwrap();
        assert_eq!(state.pieces[2].z_index, top);
    }

    #[test]
    fn test_snapped_piece_ignores_moves() {
        let state = place(new_state(Difficulty::Easy, 200.0, 1), 0, 10);
        let before = state.move_count;
        let result = reduce(
            &state,
            Action::UpdatePosition {
                piece_id: 0,
                x: 50.0,
                y: 50.0,
            },
            20,
        );
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.move_count, before);
    }

    #[test]
    fn test_missing_piece_is_noop() {
        let state = new_state(Difficulty::Easy, 200.0, 1);
        for action in [
            Action::BringToFront { piece_id: 99 },
            Action::UpdatePosition {
                piece_id: 99,
                x: 1.0,
                y: 1.0,
            },
            Action::UpdateRotation {
                piece_id: 99,
                rotation: 90.0,
            },
            Action::SnapPiece { piece_id: 99 },
        ] {
            assert!(matches!(reduce(&state, action, 0), Cow::Borrowed(_)));
        }
    }

    #[test]
    fn test_snap_out_of_radius_is_noop() {
        let state = new_state(Difficulty::Easy, 200.0, 1);
        let target = state.pieces[1].target_position;
        let state = reduce(
            &state,
            Action::UpdatePosition {
                piece_id: 1,
                x: target.x - 41.0,
                y: target.y,
            },
            0,
        )
        .into_owned();
        assert!(matches!(
            reduce(&state, Action::SnapPiece { piece_id: 1 }, 0),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_snap_within_radius_locks_piece() {
        let state = new_state(Difficulty::Easy, 200.0, 1);
        let target = state.pieces[1].target_position;
        let state = reduce(
            &state,
            Action::UpdatePosition {
                piece_id: 1,
                x: target.x - 30.0,
                y: target.y,
            },
            0,
        )
        .into_owned();
        let state = reduce(
            &state,
            Action::UpdateRotation {
                piece_id: 1,
                rotation: 90.0,
            },
            0,
        )
        .into_owned();
        let state = reduce(&state, Action::SnapPiece { piece_id: 1 }, 0).into_owned();
        let piece = &state.pieces[1];
        assert!(piece.is_snapped);
        assert_eq!(piece.current_position, target);
        assert_eq!(piece.rotation, 0.0);
        assert_invariants(&state);
    }

    #[test]
    fn test_snap_twice_is_idempotent() {
        let state = place(new_state(Difficulty::Easy, 200.0, 1), 3, 10);
        let again = reduce(&state, Action::SnapPiece { piece_id: 3 }, 99);
        assert!(matches!(again, Cow::Borrowed(_)));
        assert_eq!(again.pieces, state.pieces);
        assert_eq!(again.move_count, state.move_count);
    }

    #[test]
    fn test_completion_sets_end_time() {
        let mut state = new_state(Difficulty::Easy, 200.0, 5);
        for id in 0..4 {
            assert!(!state.is_complete);
            state = place(state, id, 1_000 + id as u64);
        }
        assert!(state.is_complete);
        assert_eq!(state.end_time, Some(1_003));
        assert_invariants(&state);
    }

    #[test]
    fn test_complete_puzzle_is_frozen() {
        let mut state = new_state(Difficulty::Easy, 200.0, 5);
        for id in 0..4 {
            state = place(state, id, 0);
        }
        for action in [
            Action::UndoMove,
            Action::UseHint,
            Action::ShuffleUnsnapped,
            Action::SetLayout {
                mode: LayoutMode::Tray,
            },
            Action::CheckCompletion,
            Action::SnapPiece { piece_id: 0 },
        ] {
            let result = reduce(&state, action, 50);
            assert!(matches!(result, Cow::Borrowed(_)));
            assert!(result.is_complete);
        }
    }

    #[test]
    fn test_rotation_normalized() {
        let state = new_state(Difficulty::Easy, 200.0, 1);
        let state = reduce(
            &state,
            Action::UpdateRotation {
                piece_id: 0,
                rotation: -90.0,
            },
            0,
        );
        assert_eq!(state.pieces[0].rotation, 270.0);
    }

    #[test]
    fn test_undo_releases_first_snapped_piece() {
        let mut state = new_state(Difficulty::Easy, 200.0, 2);
        state = place(state, 2, 0);
        state = place(state, 1, 0);
        assert_eq!(state.move_count, 2);

        let state = reduce(&state, Action::UndoMove, 0).into_owned();
        assert!(!state.pieces[1].is_snapped);
        assert!(state.pieces[2].is_snapped);
        assert_eq!(state.move_count, 1);
        let pos = state.pieces[1].current_position;
        assert!(pos.x >= 0.0 && pos.x < 100.0 && pos.y >= 0.0 && pos.y < 100.0);
        assert_invariants(&state);
    }

    #[test]
    fn test_undo_without_snapped_piece_is_noop() {
        let state = new_state(Difficulty::Easy, 200.0, 2);
        assert!(matches!(reduce(&state, Action::UndoMove, 0), Cow::Borrowed(_)));
    }

    #[test]
    fn test_hints_run_out() {
        let mut state = new_state(Difficulty::Medium, 300.0, 2);
        for _ in 0..3 {
            state = reduce(&state, Action::UseHint, 0).into_owned();
        }
        assert_eq!(state.hints_used, 3);
        assert!(matches!(reduce(&state, Action::UseHint, 0), Cow::Borrowed(_)));
    }

    #[test]
    fn test_shuffle_moves_only_unsnapped() {
        let state = place(new_state(Difficulty::Medium, 300.0, 3), 4, 0);
        let shuffled = reduce(&state, Action::ShuffleUnsnapped, 0).into_owned();
        assert_eq!(shuffled.pieces[4], state.pieces[4]);
        assert_eq!(shuffled.move_count, state.move_count);
        let max = max_piece_offset(300.0, 100.0);
        for p in shuffled.unsnapped() {
            assert!(p.current_position.x >= 0.0 && p.current_position.x <= max);
            assert!(p.current_position.y >= 0.0 && p.current_position.y <= max);
            assert!(p.z_index >= state.next_z);
        }
        // Positions were actually re-rolled
        assert_ne!(
            shuffled.pieces.iter().map(|p| p.current_position).collect::<Vec<_>>(),
            state.pieces.iter().map(|p| p.current_position).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_repack_keeps_dragged_piece() {
        let state = new_state(Difficulty::Medium, 300.0, 4);
        let dragged = state.pieces[5].current_position;
        let packed = reduce(
            &state,
            Action::Repack {
                mode: LayoutMode::Tray,
                exclude: Some(5),
            },
            0,
        )
        .into_owned();
        assert_eq!(packed.pieces[5].current_position, dragged);
        assert_eq!(packed.move_count, 0);
    }

    #[test]
    fn test_toggles() {
        let state = new_state(Difficulty::Easy, 200.0, 1);
        let state = reduce(&state, Action::ToggleSound, 0).into_owned();
        assert!(!state.sound_enabled);
        let state = reduce(&state, Action::ToggleHaptics, 0).into_owned();
        assert!(!state.haptics_enabled);
        let state = reduce(&state, Action::ToggleSound, 0).into_owned();
        assert!(state.sound_enabled);
    }

    #[test]
    fn test_reset_starts_over() {
        let mut state = new_state(Difficulty::Easy, 200.0, 8);
        for id in 0..4 {
            state = place(state, id, 100);
        }
        state = reduce(&state, Action::ToggleSound, 100).into_owned();
        let reset = reduce(&state, Action::ResetPuzzle, 500).into_owned();
        assert!(!reset.is_complete);
        assert_eq!(reset.end_time, None);
        assert_eq!(reset.move_count, 0);
        assert_eq!(reset.hints_used, 0);
        assert_eq!(reset.start_time, 500);
        assert!(!reset.sound_enabled);
        for (a, b) in reset.pieces.iter().zip(&state.pieces) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.target_position, b.target_position);
            assert!(!a.is_snapped);
        }
    }

    #[test]
    fn test_init_complete_replaces_state() {
        let state = new_state(Difficulty::Easy, 200.0, 1);
        let fresh = new_state(Difficulty::Master, 800.0, 2);
        let next = reduce(&state, Action::InitComplete(Box::new(fresh)), 0);
        assert_eq!(next.pieces.len(), 64);
    }

    fn arb_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0u32..10).prop_map(|piece_id| Action::BringToFront { piece_id }),
            (0u32..10, 0.0f32..300.0, 0.0f32..300.0)
                .prop_map(|(piece_id, x, y)| Action::UpdatePosition { piece_id, x, y }),
            (0u32..10, -720.0f32..720.0)
                .prop_map(|(piece_id, rotation)| Action::UpdateRotation { piece_id, rotation }),
            (0u32..10).prop_map(|piece_id| Action::SnapPiece { piece_id }),
            any::<bool>().prop_map(|tray| Action::SetLayout {
                mode: if tray { LayoutMode::Tray } else { LayoutMode::Spread }
            }),
            Just(Action::UndoMove),
            Just(Action::UseHint),
            Just(Action::ShuffleUnsnapped),
            Just(Action::ToggleSound),
            Just(Action::CheckCompletion),
        ]
    }

    /// Adds "drag to target" moves so random runs actually snap pieces
    fn arb_run() -> impl Strategy<Value = Vec<(Action, bool)>> {
        prop::collection::vec((arb_action(), any::<bool>()), 1..60)
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(seed in any::<u64>(), run in arb_run()) {
            let mut state = new_state(Difficulty::Medium, 300.0, seed);
            let mut now = 0;
            for (action, assist) in run {
                now += 1_000;
                let was_complete = state.is_complete;
                let is_move = matches!(action, Action::UpdatePosition { .. });

                if assist {
                    if let Action::SnapPiece { piece_id } = &action {
                        if let Some(p) = state.piece(*piece_id) {
                            let target = p.target_position;
                            state = reduce(&state, Action::UpdatePosition {
                                piece_id: *piece_id, x: target.x, y: target.y,
                            }, now).into_owned();
                        }
                    }
                }

                let result = reduce(&state, action, now);
                let noop = matches!(result, Cow::Borrowed(_));
                let next = result.into_owned();
                if noop {
                    prop_assert_eq!(next.move_count, state.move_count);
                }
                if !is_move {
                    prop_assert!(next.move_count <= state.move_count);
                }
                prop_assert!(!(was_complete && !next.is_complete));
                prop_assert_eq!(next.is_complete, next.pieces.iter().all(|p| p.is_snapped));
                prop_assert_eq!(next.end_time.is_some(), next.is_complete);
                for p in next.pieces.iter().filter(|p| p.is_snapped) {
                    prop_assert_eq!(p.current_position, p.target_position);
                    prop_assert_eq!(p.rotation, 0.0);
                }
                state = next;
            }
        }

        #[test]
        fn prop_noop_actions_leave_move_count(
            seed in any::<u64>(),
            x in 0.0f32..200.0,
            y in 0.0f32..200.0,
        ) {
            let state = place(new_state(Difficulty::Easy, 200.0, seed), 0, 0);
            let before = state.move_count;
            let snapped = reduce(&state, Action::UpdatePosition { piece_id: 0, x, y }, 1);
            prop_assert_eq!(snapped.move_count, before);
            let missing = reduce(&state, Action::UpdatePosition { piece_id: 77, x, y }, 1);
            prop_assert_eq!(missing.move_count, before);
        }
    }
}
