//! Tension model
//!
//! A scalar accumulator driven by pointer presses. `target` jumps up on each
//! press and decays while released; `value` low-pass-filters toward `target`
//! every frame. Everything downstream (heartbeat pacing, glow, background
//! brightness) is paced by this one number.

use crate::lerp;

/// Accumulated interaction pressure, 0 at rest, capped at `cap`.
#[derive(Debug, Clone)]
pub struct TensionModel {
    /// Smoothed tension, the figure the rest of the engine reads
    pub value: f32,
    /// Raw target the value chases
    pub target: f32,
    step: f32,
    decay: f32,
    smoothing: f32,
    cap: f32,
}

impl TensionModel {
    pub fn new(step: f32, decay: f32, smoothing: f32, cap: f32) -> Self {
        Self {
            value: 0.0,
            target: 0.0,
            step,
            decay,
            smoothing,
            cap,
        }
    }

    /// Raise the target by one press step, capped.
    pub fn on_press(&mut self) {
        self.target = (self.target + self.step).min(self.cap);
    }

    /// Per-frame update: smooth the value toward the target, decay the
    /// target while the pointer is up. Non-finite values are clamped to 0
    /// so a bad frame never poisons the animation.
    pub fn tick(&mut self, pressed: bool) {
        self.value = lerp(self.value, self.target, self.smoothing);
        if !pressed {
            self.target = (self.target - self.decay).max(0.0);
        }
        if !self.value.is_finite() || self.value < 0.0 {
            self.value = 0.0;
        }
        if !self.target.is_finite() || self.target < 0.0 {
            self.target = 0.0;
        }
    }

    /// Back to rest.
    pub fn reset(&mut self) {
        self.value = 0.0;
        self.target = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn model() -> TensionModel {
        TensionModel::new(TENSION_STEP, TENSION_DECAY, TENSION_SMOOTHING, TENSION_CAP)
    }

    #[test]
    fn test_rest_stays_at_zero() {
        let mut t = model();
        for _ in 0..500 {
            t.tick(false);
        }
        assert_eq!(t.value, 0.0);
        assert_eq!(t.target, 0.0);
    }

    #[test]
    fn test_press_steps_and_caps() {
        let mut t = model();
        for _ in 0..30 {
            t.on_press();
        }
        assert_eq!(t.target, TENSION_CAP);
    }

    #[test]
    fn test_single_press_decays_within_bound() {
        let mut t = model();
        t.on_press();
        let frames = (TENSION_STEP / TENSION_DECAY).ceil() as usize;
        for _ in 0..frames {
            t.tick(false);
        }
        assert_eq!(t.target, 0.0);
    }

    #[test]
    fn test_value_chases_target() {
        let mut t = model();
        t.target = 2.5;
        let before = t.value;
        t.tick(true);
        assert!(t.value > before);
        // One smoothing step of 0.1 toward 2.5
        assert!((t.value - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_nan_is_clamped() {
        let mut t = model();
        t.value = f32::NAN;
        t.target = f32::INFINITY;
        t.tick(false);
        assert_eq!(t.value, 0.0);
        assert_eq!(t.target, 0.0);
    }

    proptest! {
        /// Invariants hold under any interleaving of presses and frames.
        #[test]
        fn prop_invariants(ops in proptest::collection::vec(any::<(bool, bool)>(), 0..400)) {
            let mut t = model();
            for (press, held) in ops {
                if press {
                    t.on_press();
                }
                t.tick(held);
                prop_assert!(t.value >= 0.0);
                prop_assert!(t.target >= 0.0);
                prop_assert!(t.target <= TENSION_CAP);
            }
        }
    }
}
