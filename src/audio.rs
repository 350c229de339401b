//! Audio collaborator using the Web Audio API
//!
//! Everything is synthesized from oscillators - no sample files to load.
//! All calls are best-effort: if the AudioContext cannot be created (or the
//! browser keeps it suspended) the animation simply runs silent.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::engine::{AmbientTrack, EngineEvent};
use crate::settings::Settings;

/// A running ambient drone: oscillators kept alive until the track swaps.
struct AmbientVoice {
    oscs: Vec<OscillatorNode>,
    gain: GainNode,
}

/// Audio manager for the animation
pub struct AudioManager {
    ctx: Option<AudioContext>,
    ambient: Option<(AmbientTrack, AmbientVoice)>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, ambient: None }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Feed one tick's engine events through the speaker.
    pub fn handle_events(&mut self, events: &[EngineEvent], settings: &Settings) {
        for event in events {
            match *event {
                EngineEvent::Beat { volume } => {
                    self.play_heartbeat(volume * settings.effective_sfx())
                }
                EngineEvent::ChainShattered => self.play_shatter(settings.effective_sfx()),
                EngineEvent::TensionCreak => self.play_creak(0.4 * settings.effective_sfx()),
                EngineEvent::AmbientChanged { track } => {
                    self.loop_ambient(track, settings.effective_ambient())
                }
            }
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Heartbeat - the classic lub-dub, two low thumps
    pub fn play_heartbeat(&self, vol: f32) {
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        let t = ctx.current_time();

        // Lub - the strong first sound
        if let Some((osc, gain)) = self.create_osc(ctx, 55.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.8, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(55.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(35.0, t + 0.12)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        // Dub - softer, slightly higher, right behind
        if let Some((osc, gain)) = self.create_osc(ctx, 65.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(0.0001, t).ok();
            gain.gain().set_value_at_time(vol * 0.5, t + 0.14).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.26)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }

    /// Chain shatter - crackling metallic burst plus a bass thump
    pub fn play_shatter(&self, vol: f32) {
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let t = ctx.current_time();

        // Crackling frequency jumps
        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency().set_value_at_time(3200.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(250.0, t + 0.04).ok();
            osc.frequency().set_value_at_time(2600.0, t + 0.07).ok();
            osc.frequency().set_value_at_time(150.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(1800.0, t + 0.14).ok();
            osc.frequency().set_value_at_time(90.0, t + 0.2).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        // Metallic ring from the scattering beads
        if let Some((osc, gain)) = self.create_osc(ctx, 5200.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(5200.0, t).ok();
            osc.frequency().set_value_at_time(6800.0, t + 0.03).ok();
            osc.frequency().set_value_at_time(4400.0, t + 0.08).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        // Bass thump
        if let Some((osc, gain)) = self.create_osc(ctx, 50.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }
    }

    /// Rope creak when presses land on an already-tense chain
    pub fn play_creak(&self, vol: f32) {
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.18)
                .ok();
            osc.frequency().set_value_at_time(90.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(140.0, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// Start (or swap to) the looping ambient bed for a track.
    pub fn loop_ambient(&mut self, track: AmbientTrack, vol: f32) {
        self.stop_ambient();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        let Ok(gain) = ctx.create_gain() else { return };
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        let t = ctx.current_time();
        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(vol.max(0.001), t + 1.5)
            .ok();

        // Two slightly detuned oscillators make a slow-beating drone
        let freqs: &[(f32, OscillatorType)] = match track {
            AmbientTrack::Oppressed => &[(48.0, OscillatorType::Sawtooth), (48.7, OscillatorType::Sine)],
            AmbientTrack::Freedom => &[(196.0, OscillatorType::Sine), (294.3, OscillatorType::Sine)],
        };

        let mut oscs = Vec::new();
        for &(freq, osc_type) in freqs {
            let Ok(osc) = ctx.create_oscillator() else {
                continue;
            };
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                oscs.push(osc);
            }
        }

        if oscs.is_empty() {
            return;
        }
        self.ambient = Some((track, AmbientVoice { oscs, gain }));
    }

    /// Stop whichever ambient bed is playing.
    pub fn stop_ambient(&mut self) {
        if let Some((_, voice)) = self.ambient.take() {
            if let Some(ctx) = &self.ctx {
                let t = ctx.current_time();
                voice.gain.gain().set_value_at_time(0.0001, t + 0.2).ok();
            }
            for osc in voice.oscs {
                let _ = osc.stop();
            }
        }
    }

    pub fn current_ambient(&self) -> Option<AmbientTrack> {
        self.ambient.as_ref().map(|(track, _)| *track)
    }
}
