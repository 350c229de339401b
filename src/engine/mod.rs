//! Procedural animation engine
//!
//! All temporal logic lives here. This module must stay pure and
//! renderer-agnostic:
//! - One tick per display frame, clock passed in (never read)
//! - Seeded RNG only, stored in the engine state
//! - No drawing, no platform dependencies
//!
//! Per-frame flow is one-directional: pointer input -> tension ->
//! heartbeat -> (while breaking) fracture -> frame descriptor.

pub mod chain;
pub mod fracture;
pub mod frame;
pub mod heartbeat;
pub mod state;
pub mod tension;
pub mod tick;

pub use chain::BeadAnchor;
pub use fracture::{Bead, FallingCross, FractureSystem, FractureView};
pub use frame::{frame_params, FrameParams, GlowParams, HeartParams, Rgb};
pub use heartbeat::{BeatOnset, HeartbeatOscillator};
pub use state::{
    AmbientTrack, ConfigError, EngineConfig, EngineEvent, EngineState, Phase, PhaseKind,
};
pub use tension::TensionModel;
pub use tick::{tick, TickInput};
