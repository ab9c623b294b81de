//! Haptic feedback collaborator
//!
//! Like audio, the engine only decides *when* the device should buzz. The
//! application supplies a `HapticsSink` that knows how.

use crate::error::Result;

/// Strength of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

impl ImpactStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactStyle::Light => "light",
            ImpactStyle::Medium => "medium",
            ImpactStyle::Heavy => "heavy",
        }
    }
}

/// Haptics backend with an explicit lifecycle
pub trait HapticsSink {
    fn init(&mut self) -> Result<()>;
    /// Short tap (hint, undo, shuffle, layout change)
    fn impact(&mut self, style: ImpactStyle);
    /// Success pattern (puzzle complete)
    fn success(&mut self);
    fn shutdown(&mut self);
}

/// No vibration motor
#[derive(Debug, Default)]
pub struct SilentHaptics;

impl HapticsSink for SilentHaptics {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn impact(&mut self, _style: ImpactStyle) {}

    fn success(&mut self) {}

    fn shutdown(&mut self) {}
}

/// Logs feedback at debug level
#[derive(Debug, Default)]
pub struct LogHaptics {
    initialized: bool,
}

impl HapticsSink for LogHaptics {
    fn init(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn impact(&mut self, style: ImpactStyle) {
        if self.initialized {
            log::debug!("Haptic impact ({})", style.as_str());
        }
    }

    fn success(&mut self) {
        if self.initialized {
            log::debug!("Haptic success");
        }
    }

    fn shutdown(&mut self) {
        self.initialized = false;
    }
}
