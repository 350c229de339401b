//! Engine state and phase machine types
//!
//! All mutable animation state lives in one [`EngineState`] owned by the
//! frame loop. There is no global state; multiple independent engines can
//! run side by side, which is also what makes the tests straightforward.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use thiserror::Error;

use super::fracture::FractureSystem;
use super::heartbeat::HeartbeatOscillator;
use super::tension::TensionModel;
use crate::consts::*;

/// Current phase of the animation.
///
/// Exactly one phase is active. Every phase after `Oppressed` carries the
/// timestamp of its entry; that timestamp is the only transition memory
/// the machine keeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Heart bound by the chain, tension building with presses
    Oppressed,
    /// Chain fractured, debris scattering
    Breaking { started_at: f64 },
    /// Screen ramps to white, then holds
    WhiteFlash { started_at: f64, from_brightness: f32 },
    /// Freedom scene fades in layer by layer
    FadeIn { started_at: f64 },
    /// Calm resting state, reset control visible
    Freedom { started_at: f64 },
    /// Fade to black on the way back to the start
    Resetting { started_at: f64 },
}

/// Phase discriminant without payload, for comparisons and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Oppressed,
    Breaking,
    WhiteFlash,
    FadeIn,
    Freedom,
    Resetting,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Oppressed => PhaseKind::Oppressed,
            Phase::Breaking { .. } => PhaseKind::Breaking,
            Phase::WhiteFlash { .. } => PhaseKind::WhiteFlash,
            Phase::FadeIn { .. } => PhaseKind::FadeIn,
            Phase::Freedom { .. } => PhaseKind::Freedom,
            Phase::Resetting { .. } => PhaseKind::Resetting,
        }
    }
}

/// Ambient loop selection for the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientTrack {
    Oppressed,
    Freedom,
}

/// One-shot events produced by a tick, consumed by the audio collaborator.
/// Best-effort: dropping them is a valid degraded mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Heartbeat onset with suggested volume
    Beat { volume: f32 },
    /// The chain just fractured
    ChainShattered,
    /// Press landed while tension was already high
    TensionCreak,
    /// Swap the looping ambient bed
    AmbientChanged { track: AmbientTrack },
}

/// Construction-time validation failures. These guard constants, not
/// runtime values, so they surface once and loudly.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("tension step must be in (0, 1], got {0}")]
    TensionStep(f32),
    #[error("tension decay must be in (0, 1), got {0}")]
    TensionDecay(f32),
    #[error("tension smoothing must be in (0, 1], got {0}")]
    TensionSmoothing(f32),
    #[error("break threshold must satisfy 0 < threshold <= cap ({cap}), got {threshold}")]
    BreakThreshold { threshold: f32, cap: f32 },
    #[error("{name} duration must be in (0, 60000] ms, got {got}")]
    Duration { name: &'static str, got: f64 },
}

/// Tunable constants validated at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tension_step: f32,
    pub tension_decay: f32,
    pub tension_smoothing: f32,
    pub tension_cap: f32,
    pub break_threshold: f32,
    pub breaking_ms: f64,
    pub white_flash_ms: f64,
    pub fade_in_ms: f64,
    pub reset_fade_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tension_step: TENSION_STEP,
            tension_decay: TENSION_DECAY,
            tension_smoothing: TENSION_SMOOTHING,
            tension_cap: TENSION_CAP,
            break_threshold: BREAK_THRESHOLD,
            breaking_ms: BREAKING_MS,
            white_flash_ms: WHITE_FLASH_MS,
            fade_in_ms: FADE_IN_MS,
            reset_fade_ms: RESET_FADE_MS,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tension_step > 0.0 && self.tension_step <= 1.0) {
            return Err(ConfigError::TensionStep(self.tension_step));
        }
        if !(self.tension_decay > 0.0 && self.tension_decay < 1.0) {
            return Err(ConfigError::TensionDecay(self.tension_decay));
        }
        if !(self.tension_smoothing > 0.0 && self.tension_smoothing <= 1.0) {
            return Err(ConfigError::TensionSmoothing(self.tension_smoothing));
        }
        if !(self.break_threshold > 0.0 && self.break_threshold <= self.tension_cap) {
            return Err(ConfigError::BreakThreshold {
                threshold: self.break_threshold,
                cap: self.tension_cap,
            });
        }
        for (name, ms) in [
            ("breaking", self.breaking_ms),
            ("white flash", self.white_flash_ms),
            ("fade-in", self.fade_in_ms),
            ("reset fade", self.reset_fade_ms),
        ] {
            if !(ms > 0.0 && ms <= 60_000.0) {
                return Err(ConfigError::Duration { name, got: ms });
            }
        }
        Ok(())
    }
}

/// Complete animation state, advanced once per display frame.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub config: EngineConfig,
    pub phase: Phase,
    pub tension: TensionModel,
    pub heartbeat: HeartbeatOscillator,
    pub fracture: FractureSystem,
    /// Scale multiplier applied to the heart, recomputed each tick
    pub heart_scale: f32,
    /// Whether the reset control should be shown
    pub reset_visible: bool,
    /// Events produced by the last tick, drained by the frontend
    pub events: Vec<EngineEvent>,
    pub(super) rng: Pcg32,
}

impl EngineState {
    /// Engine with default tuning. The seed only drives debris scatter.
    pub fn new(seed: u64) -> Self {
        // Default constants are in range by construction
        Self::with_config(EngineConfig::default(), seed)
            .unwrap_or_else(|e| unreachable!("default config invalid: {e}"))
    }

    pub fn with_config(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let tension = TensionModel::new(
            config.tension_step,
            config.tension_decay,
            config.tension_smoothing,
            config.tension_cap,
        );
        Ok(Self {
            config,
            phase: Phase::Oppressed,
            tension,
            heartbeat: HeartbeatOscillator::new(),
            fracture: FractureSystem::new(),
            heart_scale: 1.0,
            reset_visible: false,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// Hand the last tick's events to the audio collaborator.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_out_of_range_step_rejected() {
        let config = EngineConfig {
            tension_step: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TensionStep(0.0)));
    }

    #[test]
    fn test_threshold_above_cap_rejected() {
        let config = EngineConfig {
            break_threshold: 3.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BreakThreshold { threshold, cap })
                if threshold == 3.0 && cap == TENSION_CAP
        ));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = EngineConfig {
            fade_in_ms: 0.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fade-in"));
    }

    #[test]
    fn test_new_starts_oppressed() {
        let state = EngineState::new(1);
        assert_eq!(state.phase_kind(), PhaseKind::Oppressed);
        assert_eq!(state.tension.value, 0.0);
        assert!(!state.reset_visible);
        assert!(!state.fracture.is_active());
    }
}
