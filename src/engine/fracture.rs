//! Fracture particle system
//!
//! When the chain breaks, its beads scatter as free particles and the cross
//! pendant detaches as a single rigid body. Integration is per-frame Euler
//! with constant gravity; the fade-out is driven by wall-clock time since
//! the fracture began so it stays synchronized with the state machine's
//! dwell in the breaking phase, independent of frame rate.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::chain;
use crate::consts::*;

/// One scattered chain bead.
#[derive(Debug, Clone)]
pub struct Bead {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// The detached cross pendant, simulated as a single rigid body.
#[derive(Debug, Clone)]
pub struct FallingCross {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// Owns the debris for the duration of the breaking phase.
#[derive(Debug, Clone, Default)]
pub struct FractureSystem {
    beads: Vec<Bead>,
    cross: Option<FallingCross>,
}

/// Read-only per-frame view for the renderer.
pub struct FractureView<'a> {
    pub beads: &'a [Bead],
    pub cross: Option<&'a FallingCross>,
    /// 1.0 at fracture onset, 0.0 once the debris has faded out
    pub fade: f32,
}

impl FractureSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scatter the chain. Idempotent: only the first call per cycle
    /// allocates, so repeated breaking-phase frames are free.
    pub fn begin<R: Rng>(&mut self, rng: &mut R) {
        if !self.beads.is_empty() {
            return;
        }

        for i in 0..BEAD_COUNT {
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(BEAD_SPEED_MIN..BEAD_SPEED_MAX);
            self.beads.push(Bead {
                pos: Vec2::new(rng.random_range(-100.0..100.0), rng.random_range(-80.0..80.0)),
                // Slight upward bias so the burst reads as a snap, not a drop
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 2.0),
                size: if i % LARGE_BEAD_EVERY == 0 {
                    chain::BEAD_SIZE_LARGE
                } else {
                    chain::BEAD_SIZE_SMALL
                },
                rotation: rng.random_range(0.0..TAU),
                rotation_speed: rng.random_range(-0.2..0.2),
            });
        }

        self.cross = Some(FallingCross {
            pos: chain::CROSS_ANCHOR,
            vel: Vec2::new(rng.random_range(-2.0..2.0), -3.0),
            rotation: 0.0,
            rotation_speed: rng.random_range(-0.15..0.15),
        });
    }

    /// Integrate one frame of debris motion.
    pub fn tick(&mut self) {
        for bead in &mut self.beads {
            bead.pos += bead.vel;
            bead.vel.y += FRACTURE_GRAVITY;
            bead.rotation += bead.rotation_speed;
        }
        if let Some(cross) = &mut self.cross {
            cross.pos += cross.vel;
            cross.vel.y += FRACTURE_GRAVITY;
            cross.rotation += cross.rotation_speed;
        }
    }

    /// Fade coefficient for debris rendering, from elapsed time since the
    /// fracture began. Linear 1 -> 0 over the breaking dwell.
    pub fn fade_alpha(elapsed_ms: f64) -> f32 {
        (1.0 - elapsed_ms / BREAKING_MS).clamp(0.0, 1.0) as f32
    }

    pub fn view(&self, elapsed_ms: f64) -> FractureView<'_> {
        FractureView {
            beads: &self.beads,
            cross: self.cross.as_ref(),
            fade: Self::fade_alpha(elapsed_ms),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.beads.is_empty()
    }

    pub fn bead_count(&self) -> usize {
        self.beads.len()
    }

    /// Drop all debris. Called once per cycle when leaving the breaking
    /// phase (and on reset) so repeated cycles never accumulate beads.
    pub fn clear(&mut self) {
        self.beads.clear();
        self.cross = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_begin_allocates_batch() {
        let mut fx = FractureSystem::new();
        let mut rng = rng();
        fx.begin(&mut rng);
        assert_eq!(fx.bead_count(), BEAD_COUNT);
        assert!(fx.view(0.0).cross.is_some());
    }

    #[test]
    fn test_begin_is_idempotent() {
        let mut fx = FractureSystem::new();
        let mut rng = rng();
        fx.begin(&mut rng);
        fx.begin(&mut rng);
        assert_eq!(fx.bead_count(), BEAD_COUNT);
    }

    #[test]
    fn test_clear_then_begin_reallocates() {
        let mut fx = FractureSystem::new();
        let mut rng = rng();
        fx.begin(&mut rng);
        fx.clear();
        assert_eq!(fx.bead_count(), 0);
        assert!(fx.view(0.0).cross.is_none());
        fx.begin(&mut rng);
        assert_eq!(fx.bead_count(), BEAD_COUNT);
    }

    #[test]
    fn test_every_sixth_bead_is_large() {
        let mut fx = FractureSystem::new();
        let mut rng = rng();
        fx.begin(&mut rng);
        for (i, bead) in fx.view(0.0).beads.iter().enumerate() {
            if i % LARGE_BEAD_EVERY == 0 {
                assert_eq!(bead.size, chain::BEAD_SIZE_LARGE);
            } else {
                assert_eq!(bead.size, chain::BEAD_SIZE_SMALL);
            }
        }
    }

    #[test]
    fn test_launch_distribution() {
        let mut fx = FractureSystem::new();
        let mut rng = rng();
        fx.begin(&mut rng);
        let mut left = 0;
        let mut right = 0;
        for bead in fx.view(0.0).beads {
            // Speed before the upward bias is within the configured range
            let launch = Vec2::new(bead.vel.x, bead.vel.y + 2.0);
            let speed = launch.length();
            assert!(speed >= BEAD_SPEED_MIN - 1e-3 && speed <= BEAD_SPEED_MAX + 1e-3);
            // Spawn box
            assert!(bead.pos.x.abs() <= 100.0);
            assert!(bead.pos.y.abs() <= 80.0);
            if bead.vel.x < 0.0 {
                left += 1;
            } else {
                right += 1;
            }
        }
        // Full-circle launch angles scatter both ways
        assert!(left > 5 && right > 5);
    }

    #[test]
    fn test_gravity_pulls_debris_down() {
        let mut fx = FractureSystem::new();
        let mut rng = rng();
        fx.begin(&mut rng);
        let vy_before: Vec<f32> = fx.view(0.0).beads.iter().map(|b| b.vel.y).collect();
        fx.tick();
        for (bead, before) in fx.view(0.0).beads.iter().zip(vy_before) {
            assert!((bead.vel.y - (before + FRACTURE_GRAVITY)).abs() < 1e-6);
        }
        let cross = fx.view(0.0).cross.unwrap().clone();
        fx.tick();
        assert!(fx.view(0.0).cross.unwrap().vel.y > cross.vel.y);
    }

    #[test]
    fn test_fade_alpha_contract() {
        assert_eq!(FractureSystem::fade_alpha(0.0), 1.0);
        assert_eq!(FractureSystem::fade_alpha(BREAKING_MS), 0.0);
        assert_eq!(FractureSystem::fade_alpha(BREAKING_MS + 500.0), 0.0);
        let mut prev = 1.0;
        for step in 0..=30 {
            let a = FractureSystem::fade_alpha(step as f64 * 100.0);
            assert!(a <= prev);
            prev = a;
        }
    }
}
