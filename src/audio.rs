//! Sound effects
//!
//! Gameplay events map to a small set of procedurally generated tones; no
//! external files needed. The simulation never calls audio directly: the
//! session routes each tick's events through an [`AudioSink`].

use crate::settings::Settings;
use crate::sim::{FallSeverity, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Charge released
    Jump,
    /// Touched down
    Land,
    /// Charging began
    Charge,
    /// Landing after a noticeable drop
    FallSmall,
    FallMedium,
    FallBig,
    /// Catastrophic fall
    Death,
}

/// Oscillator shape for a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// A single decaying tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub freq: f32,
    /// Seconds
    pub duration: f64,
    pub waveform: Waveform,
}

/// Peak gain of every voice before volume scaling
pub const VOICE_GAIN: f32 = 0.3;
/// Exponential decay time constant in seconds
pub const VOICE_DECAY: f64 = 0.2;

impl SoundEffect {
    pub const fn voice(self) -> Voice {
        let (freq, duration, waveform) = match self {
            SoundEffect::Jump => (450.0, 0.15, Waveform::Square),
            SoundEffect::Land => (200.0, 0.1, Waveform::Sine),
            SoundEffect::Charge => (300.0, 0.08, Waveform::Sine),
            SoundEffect::FallSmall => (300.0, 0.3, Waveform::Sawtooth),
            SoundEffect::FallMedium => (250.0, 0.5, Waveform::Sawtooth),
            SoundEffect::FallBig => (150.0, 0.8, Waveform::Sawtooth),
            SoundEffect::Death => (150.0, 1.0, Waveform::Sawtooth),
        };
        Voice {
            freq,
            duration,
            waveform,
        }
    }
}

impl From<FallSeverity> for SoundEffect {
    fn from(severity: FallSeverity) -> Self {
        match severity {
            FallSeverity::Small => SoundEffect::FallSmall,
            FallSeverity::Medium => SoundEffect::FallMedium,
            FallSeverity::Big => SoundEffect::FallBig,
        }
    }
}

/// Sound for a gameplay event, if it has one
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::Charge => Some(SoundEffect::Charge),
        GameEvent::Jump => Some(SoundEffect::Jump),
        GameEvent::Land => Some(SoundEffect::Land),
        GameEvent::Fall(severity) => Some((*severity).into()),
        GameEvent::SafetyReset => Some(SoundEffect::Death),
        GameEvent::SectionGenerated { .. } => None,
    }
}

/// Something that can play sound effects. Implementations absorb their own
/// failures; playing never errors.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Pick up volume and mute preferences
    fn apply_settings(&mut self, _settings: &Settings) {}

    /// Release the backend; later plays are silent
    fn dispose(&mut self) {}
}

/// Play the sound for every event of a tick, in order
pub fn route_events(sink: &mut dyn AudioSink, events: &[GameEvent]) {
    for effect in events.iter().filter_map(sound_for) {
        sink.play(effect);
    }
}

/// Silent sink for headless runs and browsers without Web Audio
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect, VOICE_DECAY, VOICE_GAIN, Waveform};
    use crate::settings::Settings;

    /// Web Audio backend
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: Settings::default().effect_volume(),
            }
        }

        /// Oscillator wired through a gain node to the output
        fn create_osc(
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
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let voice = effect.voice();
            let osc_type = match voice.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = Self::create_osc(ctx, voice.freq, osc_type) else {
                log::warn!("Could not play {:?}", effect);
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * VOICE_GAIN, t).ok();
            gain.gain().set_target_at_time(0.0, t, VOICE_DECAY).ok();

            osc.start().ok();
            osc.stop_with_when(t + voice.duration).ok();
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effect_volume();
        }

        fn dispose(&mut self) {
            if let Some(ctx) = self.ctx.take() {
                log::info!("Closing audio context");
                let _ = ctx.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SectionMode;

    #[derive(Default)]
    struct Recorder(Vec<SoundEffect>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.0.push(effect);
        }
    }

    #[test]
    fn test_event_sounds() {
        assert_eq!(sound_for(&GameEvent::Charge), Some(SoundEffect::Charge));
        assert_eq!(sound_for(&GameEvent::Jump), Some(SoundEffect::Jump));
        assert_eq!(sound_for(&GameEvent::Land), Some(SoundEffect::Land));
        assert_eq!(sound_for(&GameEvent::SafetyReset), Some(SoundEffect::Death));
        assert_eq!(
            sound_for(&GameEvent::Fall(FallSeverity::Big)),
            Some(SoundEffect::FallBig)
        );
        assert_eq!(
            sound_for(&GameEvent::SectionGenerated {
                level_index: 3,
                mode: SectionMode::Pattern(3),
            }),
            None
        );
    }

    #[test]
    fn test_route_preserves_order() {
        let mut sink = Recorder::default();
        let events = [
            GameEvent::Land,
            GameEvent::Fall(FallSeverity::Small),
            GameEvent::SectionGenerated {
                level_index: 1,
                mode: SectionMode::Pattern(1),
            },
        ];
        route_events(&mut sink, &events);
        assert_eq!(sink.0, vec![SoundEffect::Land, SoundEffect::FallSmall]);
    }

    #[test]
    fn test_fall_voices_get_longer_and_lower() {
        let small = SoundEffect::FallSmall.voice();
        let medium = SoundEffect::FallMedium.voice();
        let big = SoundEffect::FallBig.voice();
        assert!(small.duration < medium.duration && medium.duration < big.duration);
        assert!(small.freq > medium.freq && medium.freq > big.freq);
        assert_eq!(SoundEffect::Jump.voice().waveform, Waveform::Square);
    }
}
