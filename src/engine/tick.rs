//! Per-frame engine tick
//!
//! The transition table from the phase machine lives here, in one match,
//! rather than scattered across draw code. Input events are queued by the
//! frontend and applied only at the start of a tick; nothing mutates engine
//! state mid-frame.

use super::heartbeat::HeartbeatOscillator;
use super::state::{AmbientTrack, EngineEvent, EngineState, Phase};
use crate::consts::*;
use crate::ease_out_cubic;

/// Input snapshot for a single tick. One-shot flags (`press_started`,
/// `reset`) are cleared by the frontend after the tick consumes them.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Monotonic wall clock in milliseconds
    pub now_ms: f64,
    /// Pointer currently held down
    pub pressed: bool,
    /// Pointer went down since the last tick
    pub press_started: bool,
    /// Reset control was invoked
    pub reset: bool,
}

/// Envelope amplitude of the calm resting heartbeat.
const REST_AMPLITUDE: f32 = 0.15;
/// Heartbeat volume once the heart is free.
const REST_VOLUME: f32 = 0.5;

/// Advance the animation by one frame.
pub fn tick(state: &mut EngineState, input: &TickInput) {
    let now = input.now_ms;

    match state.phase {
        Phase::Oppressed => {
            if input.press_started {
                state.tension.on_press();
                if state.tension.value > 0.5 {
                    state.events.push(EngineEvent::TensionCreak);
                }
            }
            state.tension.tick(input.pressed);

            let tension = state.tension.value;
            beat_interactive(state, now, tension);

            if tension > state.config.break_threshold {
                log::info!("chain fracture at tension {tension:.2}");
                state.fracture.clear();
                let rng = &mut state.rng;
                state.fracture.begin(rng);
                state.events.push(EngineEvent::ChainShattered);
                state.phase = Phase::Breaking { started_at: now };
            }
        }

        Phase::Breaking { started_at } => {
            // Tension is frozen here so the heartbeat stays locked at the
            // panic maximum for the whole fracture sequence.
            beat_interactive(state, now, state.config.break_threshold);
            state.fracture.tick();

            if now - started_at > state.config.breaking_ms {
                let from_brightness = 20.0 + state.tension.value * 15.0;
                state.fracture.clear();
                state.phase = Phase::WhiteFlash {
                    started_at: now,
                    from_brightness,
                };
            }
        }

        Phase::WhiteFlash { started_at, .. } => {
            // No beats under the flash; the heart is gone from view
            state.heart_scale = 1.0;
            if now - started_at > state.config.white_flash_ms {
                state.phase = Phase::FadeIn { started_at: now };
                state.events.push(EngineEvent::AmbientChanged {
                    track: AmbientTrack::Freedom,
                });
            }
        }

        Phase::FadeIn { started_at } => {
            let t = ((now - started_at) / state.config.fade_in_ms).clamp(0.0, 1.0) as f32;
            let eased = ease_out_cubic(t);
            beat_calm(state, now, REST_VOLUME * eased, REST_AMPLITUDE * eased);

            if t >= 1.0 {
                state.phase = Phase::Freedom { started_at: now };
                state.reset_visible = true;
            }
        }

        Phase::Freedom { .. } => {
            beat_calm(state, now, REST_VOLUME, REST_AMPLITUDE);

            if input.reset {
                state.reset_visible = false;
                state.phase = Phase::Resetting { started_at: now };
            }
        }

        Phase::Resetting { started_at } => {
            // Reset requests while already resetting are ignored
            let fade = (now - started_at) / state.config.reset_fade_ms;
            if fade >= 1.0 {
                state.tension.reset();
                state.fracture.clear();
                state.heartbeat.reset();
                state.heart_scale = 1.0;
                state.phase = Phase::Oppressed;
                state.events.push(EngineEvent::AmbientChanged {
                    track: AmbientTrack::Oppressed,
                });
                log::info!("animation reset");
            }
        }
    }
}

/// Tension-paced heartbeat for the oppressed/breaking phases.
fn beat_interactive(state: &mut EngineState, now: f64, tension: f32) {
    let interval = HeartbeatOscillator::interval_for_tension(tension);
    let volume = HeartbeatOscillator::volume_for_tension(tension);
    if let Some(onset) = state.heartbeat.advance(now, interval, volume) {
        state.events.push(EngineEvent::Beat {
            volume: onset.volume,
        });
    }
    let amplitude = HeartbeatOscillator::amplitude_for_tension(tension);
    state.heart_scale = state.heartbeat.heart_scale(now, interval, amplitude);
}

/// Fixed resting heartbeat for the fade-in/freedom phases.
fn beat_calm(state: &mut EngineState, now: f64, volume: f32, amplitude: f32) {
    let interval = BEAT_INTERVAL_REST_MS;
    if let Some(onset) = state.heartbeat.advance(now, interval, volume) {
        state.events.push(EngineEvent::Beat {
            volume: onset.volume,
        });
    }
    state.heart_scale = state.heartbeat.heart_scale(now, interval, amplitude);
}
