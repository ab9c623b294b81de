//! Sound effect collaborator
//!
//! The engine never plays audio itself. It names the effect and hands it to
//! an `AudioSink` the application constructed and initialized.

use crate::error::Result;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Piece locked into its slot
    Snap,
    /// Last piece placed
    Completion,
    /// Achievement unlocked
    Achievement,
    /// UI button press
    Click,
    /// Rejected action
    Error,
    /// Hint revealed
    Hint,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Snap => "snap",
            SoundEffect::Completion => "completion",
            SoundEffect::Achievement => "achievement",
            SoundEffect::Click => "click",
            SoundEffect::Error => "error",
            SoundEffect::Hint => "hint",
        }
    }
}

/// Audio backend with an explicit lifecycle
pub trait AudioSink {
    /// Acquire the device. Safe to call more than once.
    fn init(&mut self) -> Result<()>;
    fn play(&mut self, effect: SoundEffect);
    fn shutdown(&mut self);
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn play(&mut self, _effect: SoundEffect) {}

    fn shutdown(&mut self) {}
}

/// Logs each effect instead of playing it (headless runs, debugging)
#[derive(Debug)]
pub struct LogAudio {
    volume: f32,
    muted: bool,
    initialized: bool,
    played: usize,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            volume: 0.7,
            muted: false,
            initialized: false,
            played: 0,
        }
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of effects played so far
    pub fn played(&self) -> usize {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn init(&mut self) -> Result<()> {
        if !self.initialized {
            self.initialized = true;
            log::info!("Audio initialized (log backend, volume {:.2})", self.volume);
        }
        Ok(())
    }

    fn play(&mut self, effect: SoundEffect) {
        if !self.initialized {
            log::warn!("Dropping '{}' - audio not initialized", effect.as_str());
            return;
        }
        if self.muted || self.volume <= 0.0 {
            return;
        }
        log::debug!("Play '{}' at volume {:.2}", effect.as_str(), self.volume);
        self.played += 1;
    }

    fn shutdown(&mut self) {
        if self.initialized {
            self.initialized = false;
            log::info!("Audio shut down after {} effects", self.played);
        }
    }
}
