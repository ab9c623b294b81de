//! UI-facing puzzle store
//!
//! `PuzzleSession` wraps the pure reducer with the things it deliberately
//! doesn't know about: the clock, the audio and haptics sinks, completion
//! listeners, and the current piece layout mode. It is single-threaded;
//! every dispatch runs to completion before the next.

use std::borrow::Cow;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::Timestamp;
use crate::audio::{AudioSink, SoundEffect};
use crate::error::Result;
use crate::haptics::{HapticsSink, ImpactStyle};
use crate::sim::{
    Action, CompletionStats, Difficulty, GameStats, InitOptions, LayoutMode, PieceId,
    PuzzleState, choose_hint_piece, compute_stats, reduce,
};

/// Source of "now" in milliseconds
pub trait Clock {
    fn now_ms(&self) -> Timestamp;
}

/// Wall clock, milliseconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Timestamp)
            .unwrap_or(0)
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: Timestamp) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        self.now.get()
    }
}

/// Notified once per puzzle when the last piece snaps
pub trait CompletionListener {
    fn on_completion(&mut self, stats: &CompletionStats);
}

impl<F: FnMut(&CompletionStats)> CompletionListener for F {
    fn on_completion(&mut self, stats: &CompletionStats) {
        self(stats)
    }
}

pub struct PuzzleSession {
    state: Option<PuzzleState>,
    clock: Box<dyn Clock>,
    audio: Box<dyn AudioSink>,
    haptics: Box<dyn HapticsSink>,
    listeners: Vec<Box<dyn CompletionListener>>,
    /// Tray mode keeps loose pieces packed after every move and snap
    layout_mode: LayoutMode,
    /// Picks hint targets; kept off the state so hint highlighting
    /// doesn't perturb the puzzle's own random sequence
    hint_rng: Pcg32,
}

impl PuzzleSession {
    /// Create a session and initialize its audio and haptics sinks
    pub fn new(
        clock: Box<dyn Clock>,
        mut audio: Box<dyn AudioSink>,
        mut haptics: Box<dyn HapticsSink>,
    ) -> Result<Self> {
        audio.init()?;
        haptics.init()?;
        Ok(Self {
            state: None,
            clock,
            audio,
            haptics,
            listeners: Vec::new(),
            layout_mode: LayoutMode::default(),
            hint_rng: Pcg32::seed_from_u64(0),
        })
    }

    pub fn add_listener(&mut self, listener: impl CompletionListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Slice a new puzzle and make it current
    ///
    /// A session in tray mode packs the new pieces into the tray right away.
    pub fn init(
        &mut self,
        image_ref: &str,
        difficulty: Difficulty,
        options: &InitOptions,
    ) -> Result<()> {
        let now = self.clock.now_ms();
        let mut state = PuzzleState::initialize(image_ref, difficulty, options, now)?;
        if self.layout_mode == LayoutMode::Tray {
            let mode = LayoutMode::Tray;
            state = reduce(&state, Action::SetLayout { mode }, now).into_owned();
        }
        self.hint_rng = Pcg32::seed_from_u64(options.seed.rotate_left(32));
        self.dispatch(Action::InitComplete(Box::new(state)));
        Ok(())
    }

    /// Run one action through the reducer
    ///
    /// Returns false when the action was a no-op (or arrived before init).
    pub fn dispatch(&mut self, action: Action) -> bool {
        let now = self.clock.now_ms();

        let Some(current) = self.state.as_ref() else {
            return match action {
                Action::InitComplete(next) => {
                    self.state = Some(*next);
                    true
                }
                other => {
                    log::debug!("Ignoring {:?} before init", other);
                    false
                }
            };
        };

        let is_init = matches!(action, Action::InitComplete(_));
        let tap = matches!(
            action,
            Action::UndoMove | Action::ShuffleUnsnapped | Action::SetLayout { .. }
        );
        if let Action::SetLayout { mode } = action {
            self.layout_mode = mode;
        }
        let was_complete = current.is_complete;
        let snapped_before = current.snapped_count();
        let hints_before = current.hints_used;

        let next = match reduce(current, action, now) {
            Cow::Borrowed(_) => return false,
            Cow::Owned(next) => next,
        };

        let snapped = !is_init && next.snapped_count() > snapped_before;
        let hinted = !is_init && next.hints_used > hints_before;
        let completed = !is_init && !was_complete && next.is_complete;
        let sound = next.sound_enabled;
        let haptics = next.haptics_enabled;
        self.state = Some(next);

        if sound {
            if snapped {
                self.audio.play(SoundEffect::Snap);
            }
            if hinted {
                self.audio.play(SoundEffect::Hint);
            }
            if completed {
                self.audio.play(SoundEffect::Completion);
            }
        }
        if haptics {
            if tap || hinted {
                self.haptics.impact(ImpactStyle::Light);
            }
            if completed {
                self.haptics.success();
            }
        }
        if completed {
            self.notify_completion(now);
        }
        true
    }

    /// Raise a grabbed piece above the rest
    pub fn grab_piece(&mut self, piece_id: PieceId) -> bool {
        self.dispatch(Action::BringToFront { piece_id })
    }

    /// Drag a piece, clamped to the canvas
    ///
    /// In tray mode the other loose pieces are repacked around it; the
    /// dragged piece itself stays where it was dropped.
    pub fn move_piece(&mut self, piece_id: PieceId, x: f32, y: f32) -> bool {
        let Some(pos) = self.state.as_ref().map(|s| s.clamp_position(x, y)) else {
            return false;
        };
        let moved = self.dispatch(Action::UpdatePosition {
            piece_id,
            x: pos.x,
            y: pos.y,
        });
        if moved && self.layout_mode == LayoutMode::Tray {
            self.dispatch(Action::Repack {
                mode: LayoutMode::Tray,
                exclude: Some(piece_id),
            });
        }
        moved
    }

    /// Try to lock a dropped piece into its slot
    ///
    /// In tray mode every loose piece goes back into the tray afterwards,
    /// including this one if it missed.
    pub fn snap_piece(&mut self, piece_id: PieceId) -> bool {
        let snapped = self.dispatch(Action::SnapPiece { piece_id });
        if self.layout_mode == LayoutMode::Tray {
            self.dispatch(Action::Repack {
                mode: LayoutMode::Tray,
                exclude: None,
            });
        }
        snapped
    }

    /// Switch between spread and tray, laying out the loose pieces
    pub fn toggle_layout(&mut self) -> LayoutMode {
        self.set_layout(self.layout_mode.toggled());
        self.layout_mode
    }

    pub fn set_layout(&mut self, mode: LayoutMode) -> bool {
        self.layout_mode = mode;
        self.dispatch(Action::SetLayout { mode })
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    /// Spend a hint and pick the piece to highlight
    pub fn use_hint(&mut self) -> Option<PieceId> {
        let target = choose_hint_piece(self.state.as_ref()?, &mut self.hint_rng)?;
        self.dispatch(Action::UseHint).then_some(target)
    }

    pub fn state(&self) -> Option<&PuzzleState> {
        self.state.as_ref()
    }

    /// Live stats at the clock's current time
    pub fn stats(&self) -> Option<GameStats> {
        self.state
            .as_ref()
            .map(|state| compute_stats(state, self.clock.now_ms()))
    }

    pub fn now_ms(&self) -> Timestamp {
        self.clock.now_ms()
    }

    /// Release the audio and haptics sinks
    pub fn shutdown(&mut self) {
        self.audio.shutdown();
        self.haptics.shutdown();
    }

    fn notify_completion(&mut self, now: Timestamp) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let stats = CompletionStats::from_state(state, now);
        log::info!(
            "Completion: {:.1}s, {} moves, {} stars",
            stats.time_spent,
            stats.move_count,
            stats.star_rating
        );
        for listener in self.listeners.iter_mut() {
            listener.on_completion(&stats);
        }
    }
}
