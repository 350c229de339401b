//! Break Free - an interactive generative animation
//!
//! A beating heart bound by a chain of beads. Rapid pointer presses raise
//! tension until the chain fractures, the screen flashes white, and a calm
//! freedom scene fades in layer by layer.
//!
//! Core modules:
//! - `engine`: Renderer-agnostic animation engine (tension, heartbeat,
//!   fracture physics, phase state machine, frame descriptor)
//! - `render`: Canvas-2D frontend consuming the frame descriptor (wasm)
//! - `audio`: Procedural Web Audio cues (wasm)
//! - `settings`: User preferences persisted to LocalStorage

pub mod engine;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use settings::Settings;

/// Animation tuning constants
pub mod consts {
    /// Tension added per pointer press
    pub const TENSION_STEP: f32 = 0.25;
    /// Tension target decay per unpressed frame
    pub const TENSION_DECAY: f32 = 0.02;
    /// Exponential smoothing factor pulling value toward target each frame
    pub const TENSION_SMOOTHING: f32 = 0.1;
    /// Tension value that triggers the fracture
    pub const BREAK_THRESHOLD: f32 = 2.0;
    /// Hard cap on the tension target
    pub const TENSION_CAP: f32 = 2.5;

    /// Beat interval at zero tension (ms)
    pub const BEAT_INTERVAL_CALM_MS: f64 = 2000.0;
    /// Beat interval at panic tension (ms)
    pub const BEAT_INTERVAL_PANIC_MS: f64 = 400.0;
    /// Fixed resting interval after the transition (ms)
    pub const BEAT_INTERVAL_REST_MS: f64 = 800.0;

    /// Dwell in the breaking phase before the white flash (ms)
    pub const BREAKING_MS: f64 = 3000.0;
    /// White flash duration (ms)
    pub const WHITE_FLASH_MS: f64 = 1200.0;
    /// Freedom fade-in duration (ms)
    pub const FADE_IN_MS: f64 = 2000.0;
    /// Reset fade-to-black duration (ms)
    pub const RESET_FADE_MS: f64 = 1000.0;

    /// Scattered beads spawned when the chain fractures
    pub const BEAD_COUNT: usize = 50;
    /// Every Nth bead is the large kind
    pub const LARGE_BEAD_EVERY: usize = 6;
    /// Bead launch speed range (units/frame)
    pub const BEAD_SPEED_MIN: f32 = 3.0;
    pub const BEAD_SPEED_MAX: f32 = 10.0;
    /// Downward acceleration on fracture debris (units/frame^2)
    pub const FRACTURE_GRAVITY: f32 = 0.3;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Remap `v` from `[in_min, in_max]` to `[out_min, out_max]`, unclamped
#[inline]
pub fn map_range(v: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (v - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// Cubic ease-out: fast start, soft landing at 1
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(2.0, 10.0, 0.5), 6.0);
    }

    #[test]
    fn test_map_range() {
        assert_eq!(map_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        // Unclamped by design, callers clamp where it matters
        assert_eq!(map_range(15.0, 0.0, 10.0, 0.0, 100.0), 150.0);
        // Inverted output range
        assert_eq!(map_range(0.0, 0.0, 2.0, 2000.0, 400.0), 2000.0);
        assert_eq!(map_range(2.0, 0.0, 2.0, 2000.0, 400.0), 400.0);
    }

    #[test]
    fn test_ease_out_cubic_shape() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        // Ease-out runs ahead of linear in the middle
        assert!(ease_out_cubic(0.5) > 0.5);
        // Monotonic
        let mut prev = 0.0;
        for i in 1..=20 {
            let e = ease_out_cubic(i as f32 / 20.0);
            assert!(e >= prev);
            prev = e;
        }
    }
}
