//! Heartbeat oscillator
//!
//! Converts tension into a beat interval and a per-frame scale envelope.
//! The envelope is deliberately asymmetric: a fast positive systolic spike
//! followed by a smaller inverted rebound, then diastolic rest. A plain
//! sinusoid reads as "balloon", not "heart".

use crate::consts::*;
use crate::{lerp, map_range};

/// Fraction of the beat cycle taken by the systolic spike
const SYSTOLE_END: f32 = 0.15;
/// End of the rebound lobe
const REBOUND_END: f32 = 0.35;
/// Peak of the systolic lobe
const SYSTOLE_GAIN: f32 = 0.15;
/// Peak magnitude of the inverted rebound
const REBOUND_GAIN: f32 = 0.08;

/// A beat onset emitted when a new cycle starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatOnset {
    /// Suggested playback volume for the audio collaborator, 0..1
    pub volume: f32,
}

/// Beat timing state. The envelope itself is derived, not stored.
#[derive(Debug, Clone)]
pub struct HeartbeatOscillator {
    last_beat_ms: f64,
}

impl HeartbeatOscillator {
    pub fn new() -> Self {
        Self { last_beat_ms: 0.0 }
    }

    /// Beat interval for the oppressed/breaking phases: 2000 ms at rest
    /// down to 400 ms at panic tension.
    pub fn interval_for_tension(tension: f32) -> f64 {
        let t = (tension / BREAK_THRESHOLD).clamp(0.0, 1.0);
        lerp(BEAT_INTERVAL_CALM_MS as f32, BEAT_INTERVAL_PANIC_MS as f32, t) as f64
    }

    /// Heartbeat volume scaled with tension while interactive.
    pub fn volume_for_tension(tension: f32) -> f32 {
        map_range(tension, 0.0, BREAK_THRESHOLD, 0.3, 0.8).clamp(0.3, 0.8)
    }

    /// Advance the clock; returns a beat onset when a new cycle starts.
    pub fn advance(&mut self, now_ms: f64, interval_ms: f64, volume: f32) -> Option<BeatOnset> {
        if now_ms - self.last_beat_ms > interval_ms {
            self.last_beat_ms = now_ms;
            Some(BeatOnset { volume })
        } else {
            None
        }
    }

    /// Phase progress of the current cycle, in [0, 1) for a live cycle.
    pub fn phase_progress(&self, now_ms: f64, interval_ms: f64) -> f32 {
        ((now_ms - self.last_beat_ms) / interval_ms) as f32
    }

    /// Two-lobe contraction/relaxation envelope at progress `p`.
    pub fn envelope(p: f32) -> f32 {
        if p < SYSTOLE_END {
            (p * std::f32::consts::PI / SYSTOLE_END).sin() * SYSTOLE_GAIN
        } else if p < REBOUND_END {
            ((p - SYSTOLE_END) * std::f32::consts::PI / (REBOUND_END - SYSTOLE_END)
                + std::f32::consts::PI)
                .sin()
                * REBOUND_GAIN
        } else {
            0.0
        }
    }

    /// Scale multiplier applied to the heart this frame.
    pub fn heart_scale(&self, now_ms: f64, interval_ms: f64, amplitude: f32) -> f32 {
        1.0 + Self::envelope(self.phase_progress(now_ms, interval_ms)) * amplitude
    }

    /// Envelope amplitude while interactive, growing with tension.
    pub fn amplitude_for_tension(tension: f32) -> f32 {
        0.08 + tension * 0.475
    }

    pub fn reset(&mut self) {
        self.last_beat_ms = 0.0;
    }
}

impl Default for HeartbeatOscillator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_mapping() {
        assert_eq!(HeartbeatOscillator::interval_for_tension(0.0), 2000.0);
        assert_eq!(HeartbeatOscillator::interval_for_tension(2.0), 400.0);
        // Clamped above the threshold
        assert_eq!(HeartbeatOscillator::interval_for_tension(2.5), 400.0);
        let mid = HeartbeatOscillator::interval_for_tension(1.0);
        assert!(mid > 400.0 && mid < 2000.0);
    }

    #[test]
    fn test_envelope_lobes() {
        // Systole midpoint: positive spike
        let systole = HeartbeatOscillator::envelope(0.075);
        assert!(systole > 0.0);
        // Relaxation midpoint: inverted rebound
        let rebound = HeartbeatOscillator::envelope(0.25);
        assert!(rebound < 0.0);
        // Diastole: flat
        assert_eq!(HeartbeatOscillator::envelope(0.6), 0.0);
        // Spike dominates the rebound
        assert!(systole.abs() > rebound.abs());
    }

    #[test]
    fn test_envelope_lobe_boundaries() {
        // Both lobes land near zero at their edges
        assert!(HeartbeatOscillator::envelope(0.0).abs() < 1e-6);
        assert!(HeartbeatOscillator::envelope(0.1499).abs() < 0.01);
        assert!(HeartbeatOscillator::envelope(0.3499).abs() < 0.01);
    }

    #[test]
    fn test_beat_onset_fires_and_resets() {
        let mut hb = HeartbeatOscillator::new();
        assert!(hb.advance(100.0, 800.0, 0.5).is_none());
        let onset = hb.advance(900.5, 800.0, 0.5);
        assert_eq!(onset, Some(BeatOnset { volume: 0.5 }));
        // Cycle restarted, no immediate second onset
        assert!(hb.advance(901.0, 800.0, 0.5).is_none());
        assert!(hb.phase_progress(901.0, 800.0) < 0.01);
    }

    #[test]
    fn test_heart_scale_spikes_then_rests() {
        let mut hb = HeartbeatOscillator::new();
        hb.advance(1000.0, 800.0, 0.5);
        // Mid-systole: scale above 1
        assert!(hb.heart_scale(1000.5 + 0.075 * 800.0, 800.0, 1.0) > 1.0);
        // Diastole: back to exactly 1
        assert_eq!(hb.heart_scale(1000.5 + 0.6 * 800.0, 800.0, 1.0), 1.0);
    }

    #[test]
    fn test_volume_scales_with_tension() {
        assert_eq!(HeartbeatOscillator::volume_for_tension(0.0), 0.3);
        assert_eq!(HeartbeatOscillator::volume_for_tension(2.0), 0.8);
        assert!(HeartbeatOscillator::volume_for_tension(1.0) > 0.3);
    }
}
