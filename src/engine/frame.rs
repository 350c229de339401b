//! Frame descriptor
//!
//! Aggregates the engine's per-frame outputs into a declarative parameter
//! set for the rendering layer: colors, alphas, scales, debris snapshots.
//! The engine never draws; any renderer that can fill paths, ellipses and
//! rectangles in a center-origin coordinate space can consume this.

use super::fracture::FractureView;
use super::state::{EngineState, Phase};
use crate::consts::*;
use crate::{ease_out_cubic, lerp, map_range};

/// 8-bit-range color channels kept as floats for interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
        }
    }
}

/// Soft off-white the freedom scene settles on
pub const FREEDOM_BG: Rgb = Rgb::new(245.0, 235.0, 240.0);
const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);

/// Heart rendering parameters for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartParams {
    /// Beat-synchronized scale multiplier
    pub scale: f32,
    /// 0..1 opacity (staggered during fade-in)
    pub alpha: f32,
    /// Additive brightness from tension (oppressed heart only)
    pub brightness: f32,
    /// Healthy red heart vs the dark oppressed one
    pub healthy: bool,
}

/// Dull red glow behind the oppressed heart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowParams {
    /// 0..1 peak opacity of the glow rings
    pub alpha: f32,
    /// Outer diameter of the glow
    pub size: f32,
}

/// Everything the renderer needs for one frame.
pub struct FrameParams<'a> {
    pub background: Rgb,
    pub heart: Option<HeartParams>,
    /// Oppressed-phase ambient glow, intensifying with tension
    pub ambient_glow: Option<GlowParams>,
    /// Spiral rainbow rays, 0 hidden .. 1 full
    pub rays_alpha: f32,
    /// Golden freedom glow, 0 hidden .. 1 full
    pub freedom_glow_alpha: f32,
    /// Draw the intact chain ornament
    pub chain_intact: bool,
    /// Scattering debris while the chain breaks
    pub fracture: Option<FractureView<'a>>,
    /// "Click fast to break free" prompt
    pub instruction_visible: bool,
    /// Credits render dark on the light freedom background
    pub dark_text: bool,
    pub reset_visible: bool,
    /// Fade-to-black overlay while resetting, 0..1
    pub overlay_alpha: f32,
}

/// Build the render descriptor for the current engine state.
pub fn frame_params(state: &EngineState, now_ms: f64) -> FrameParams<'_> {
    match state.phase {
        Phase::Oppressed => oppressed_params(state, None),
        Phase::Breaking { started_at } => {
            oppressed_params(state, Some(state.fracture.view(now_ms - started_at)))
        }
        Phase::WhiteFlash {
            started_at,
            from_brightness,
        } => {
            let elapsed = now_ms - started_at;
            let half = state.config.white_flash_ms * 0.5;
            let brightness = if elapsed < half {
                map_range(elapsed as f32, 0.0, half as f32, from_brightness, 255.0)
            } else {
                255.0
            };
            FrameParams {
                background: Rgb::new(brightness, brightness, brightness),
                heart: None,
                ambient_glow: None,
                rays_alpha: 0.0,
                freedom_glow_alpha: 0.0,
                chain_intact: false,
                fracture: None,
                instruction_visible: false,
                dark_text: false,
                reset_visible: state.reset_visible,
                overlay_alpha: 0.0,
            }
        }
        Phase::FadeIn { started_at } => {
            let t = ((now_ms - started_at) / state.config.fade_in_ms).clamp(0.0, 1.0) as f32;
            let eased = ease_out_cubic(t);

            // Layers unlock in order: rays, then glow, then the heart,
            // each remapped to its own sub-range of the eased progress.
            let rays_alpha = if eased > 0.1 {
                map_range(eased, 0.1, 0.7, 0.0, 1.0).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let freedom_glow_alpha = if eased > 0.2 {
                map_range(eased, 0.2, 0.8, 0.0, 1.0).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let heart = (eased > 0.3).then(|| HeartParams {
                scale: state.heart_scale,
                alpha: map_range(eased, 0.3, 1.0, 0.0, 1.0).clamp(0.0, 1.0),
                brightness: 0.0,
                healthy: true,
            });

            FrameParams {
                background: WHITE.lerp(FREEDOM_BG, eased),
                heart,
                ambient_glow: None,
                rays_alpha,
                freedom_glow_alpha,
                chain_intact: false,
                fracture: None,
                instruction_visible: false,
                dark_text: true,
                reset_visible: state.reset_visible,
                overlay_alpha: 0.0,
            }
        }
        Phase::Freedom { .. } => freedom_params(state, 0.0),
        Phase::Resetting { started_at } => {
            let fade = ((now_ms - started_at) / state.config.reset_fade_ms).clamp(0.0, 1.0) as f32;
            freedom_params(state, fade)
        }
    }
}

/// Oppressed and breaking share a scene; breaking adds debris and freezes
/// the tension figure feeding it.
fn oppressed_params<'a>(
    state: &'a EngineState,
    fracture: Option<FractureView<'a>>,
) -> FrameParams<'a> {
    let tension = state.tension.value;
    let b = 20.0 + tension * 15.0;
    let breaking = fracture.is_some();
    FrameParams {
        background: Rgb::new(b, b - 5.0, b + 5.0),
        heart: Some(HeartParams {
            scale: state.heart_scale,
            alpha: 1.0,
            brightness: tension * 15.0,
            healthy: false,
        }),
        ambient_glow: Some(GlowParams {
            alpha: (5.0 + tension * 20.0) / 255.0,
            size: 400.0 + tension * 200.0,
        }),
        rays_alpha: 0.0,
        freedom_glow_alpha: 0.0,
        chain_intact: !breaking,
        fracture,
        instruction_visible: true,
        dark_text: false,
        reset_visible: state.reset_visible,
        overlay_alpha: 0.0,
    }
}

fn freedom_params(state: &EngineState, overlay_alpha: f32) -> FrameParams<'_> {
    FrameParams {
        background: FREEDOM_BG,
        heart: Some(HeartParams {
            scale: state.heart_scale,
            alpha: 1.0,
            brightness: 0.0,
            healthy: true,
        }),
        ambient_glow: None,
        rays_alpha: 1.0,
        freedom_glow_alpha: 1.0,
        chain_intact: false,
        fracture: None,
        instruction_visible: false,
        dark_text: true,
        reset_visible: state.reset_visible,
        overlay_alpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineState;

    /// Eased progress `e` back to wall-clock time inside the fade-in.
    fn fade_in_time_for(state: &EngineState, eased: f32) -> f64 {
        // e = 1 - (1-t)^3  =>  t = 1 - (1-e)^(1/3)
        let t = 1.0 - (1.0 - eased).powf(1.0 / 3.0);
        t as f64 * state.config.fade_in_ms
    }

    fn state_in(phase: Phase) -> EngineState {
        let mut state = EngineState::new(1);
        state.phase = phase;
        state
    }

    #[test]
    fn test_oppressed_background_tracks_tension() {
        let mut state = EngineState::new(1);
        let calm = frame_params(&state, 0.0).background;
        state.tension.value = 2.0;
        let tense = frame_params(&state, 0.0).background;
        assert!(tense.r > calm.r);
        assert_eq!(calm.r, 20.0);
        assert_eq!(tense.r, 50.0);
        // Cool cast: blue above red, green below
        assert!(tense.b > tense.r && tense.g < tense.r);
    }

    #[test]
    fn test_oppressed_shows_chain_and_instruction() {
        let state = EngineState::new(1);
        let params = frame_params(&state, 0.0);
        assert!(params.chain_intact);
        assert!(params.instruction_visible);
        assert!(params.fracture.is_none());
        assert!(!params.dark_text);
        let heart = params.heart.unwrap();
        assert!(!heart.healthy);
        assert_eq!(heart.alpha, 1.0);
    }

    #[test]
    fn test_breaking_swaps_chain_for_debris() {
        let mut state = state_in(Phase::Breaking { started_at: 1000.0 });
        let mut rng = rand_pcg::Pcg32::new(1, 1);
        state.fracture.begin(&mut rng);
        let params = frame_params(&state, 2500.0);
        assert!(!params.chain_intact);
        let fx = params.fracture.expect("debris visible while breaking");
        assert_eq!(fx.beads.len(), crate::consts::BEAD_COUNT);
        assert!((fx.fade - 0.5).abs() < 1e-6);
        assert!(params.instruction_visible);
    }

    #[test]
    fn test_white_flash_ramps_then_holds() {
        let state = state_in(Phase::WhiteFlash {
            started_at: 0.0,
            from_brightness: 50.0,
        });
        assert_eq!(frame_params(&state, 0.0).background.r, 50.0);
        let mid = frame_params(&state, 300.0).background.r;
        assert!(mid > 50.0 && mid < 255.0);
        assert_eq!(frame_params(&state, 600.0).background.r, 255.0);
        assert_eq!(frame_params(&state, 1100.0).background.r, 255.0);
        assert!(frame_params(&state, 600.0).heart.is_none());
    }

    #[test]
    fn test_fade_in_reveal_order() {
        let state = state_in(Phase::FadeIn { started_at: 0.0 });

        // Just past the ray threshold: rays only
        let now = fade_in_time_for(&state, 0.15);
        let params = frame_params(&state, now);
        assert!(params.rays_alpha > 0.0);
        assert_eq!(params.freedom_glow_alpha, 0.0);
        assert!(params.heart.is_none());

        // Past the glow threshold: rays and glow, no heart yet
        let now = fade_in_time_for(&state, 0.25);
        let params = frame_params(&state, now);
        assert!(params.rays_alpha > 0.0);
        assert!(params.freedom_glow_alpha > 0.0);
        assert!(params.heart.is_none());

        // Past the heart threshold: all three, heart still translucent
        let now = fade_in_time_for(&state, 0.5);
        let params = frame_params(&state, now);
        assert!(params.rays_alpha > 0.0);
        assert!(params.freedom_glow_alpha > 0.0);
        let heart = params.heart.unwrap();
        assert!(heart.healthy);
        assert!(heart.alpha > 0.0 && heart.alpha < 1.0);
    }

    #[test]
    fn test_fade_in_layers_saturate() {
        let state = state_in(Phase::FadeIn { started_at: 0.0 });
        let params = frame_params(&state, state.config.fade_in_ms);
        assert_eq!(params.rays_alpha, 1.0);
        assert_eq!(params.freedom_glow_alpha, 1.0);
        assert_eq!(params.heart.unwrap().alpha, 1.0);
        assert_eq!(params.background, FREEDOM_BG);
    }

    #[test]
    fn test_fade_in_background_leaves_white() {
        let state = state_in(Phase::FadeIn { started_at: 0.0 });
        let early = frame_params(&state, 1.0).background;
        assert!(early.r > 254.0);
        let late = frame_params(&state, 1500.0).background;
        assert!(late.r < 255.0 && late.g < late.r);
    }

    #[test]
    fn test_freedom_scene_complete() {
        let mut state = state_in(Phase::Freedom { started_at: 0.0 });
        state.reset_visible = true;
        let params = frame_params(&state, 5000.0);
        assert_eq!(params.background, FREEDOM_BG);
        assert_eq!(params.rays_alpha, 1.0);
        assert_eq!(params.freedom_glow_alpha, 1.0);
        assert!(params.heart.unwrap().healthy);
        assert!(params.reset_visible);
        assert!(params.dark_text);
        assert_eq!(params.overlay_alpha, 0.0);
    }

    #[test]
    fn test_resetting_overlay_ramps() {
        let state = state_in(Phase::Resetting { started_at: 0.0 });
        assert_eq!(frame_params(&state, 0.0).overlay_alpha, 0.0);
        let mid = frame_params(&state, 500.0).overlay_alpha;
        assert!((mid - 0.5).abs() < 1e-6);
        assert_eq!(frame_params(&state, 2000.0).overlay_alpha, 1.0);
    }
}
