//! Frame driver
//!
//! Owns the run and everything that feeds it. The host calls `frame` once
//! per animation frame with the frame timestamp; the session turns that into
//! exactly one simulation tick.

use crate::audio::{self, AudioSink};
use crate::consts::MAX_FRAME_DT;
use crate::hud::HudSnapshot;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameState};

use super::input::InputLatch;

pub struct Session {
    state: GameState,
    input: InputLatch,
    settings: Settings,
    audio: Option<Box<dyn AudioSink>>,
    /// Timestamp of the previous ticked frame in milliseconds
    last_timestamp: Option<f64>,
    running: bool,
}

impl Session {
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            state: GameState::new(seed),
            input: InputLatch::new(),
            settings,
            audio: None,
            last_timestamp: None,
            running: false,
        }
    }

    /// Attach a sound backend
    pub fn with_audio(mut self, mut sink: Box<dyn AudioSink>) -> Self {
        sink.apply_settings(&self.settings);
        self.audio = Some(sink);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input_mut(&mut self) -> &mut InputLatch {
        &mut self.input
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        if let Some(sink) = self.audio.as_mut() {
            sink.apply_settings(&settings);
        }
        self.settings = settings;
        self.cap_particles();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin ticking on the next frame
    pub fn start(&mut self) {
        if !self.running {
            log::info!("Session started");
            self.running = true;
            self.last_timestamp = None;
        }
    }

    /// No frame ticks after this returns
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Session stopped after {} ticks", self.state.time_ticks);
            self.running = false;
        }
    }

    /// Stop for good and release the audio backend
    pub fn shutdown(&mut self) {
        self.stop();
        if let Some(mut sink) = self.audio.take() {
            sink.dispose();
        }
    }

    /// Flip mute and persist the preference
    pub fn toggle_mute(&mut self) {
        let mut settings = self.settings.clone();
        settings.toggle_mute();
        settings.save();
        self.set_settings(settings);
    }

    /// Replace the run and clear held input in one step
    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting with seed {}", seed);
        self.state = GameState::new(seed);
        self.input.reset();
        self.last_timestamp = None;
    }

    /// Advance one tick for an animation frame and return its events
    pub fn frame(&mut self, timestamp_ms: f64) -> &[GameEvent] {
        if !self.running {
            return &[];
        }

        let dt = match self.last_timestamp {
            Some(last) => (((timestamp_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        let intent = self.input.snapshot();
        sim::step(&mut self.state, &intent, dt);

        if let Some(sink) = self.audio.as_mut() {
            audio::route_events(&mut **sink, &self.state.events);
        }
        self.cap_particles();

        &self.state.events
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::from_state(&self.state)
    }

    /// Drop the oldest particles beyond the configured cap
    fn cap_particles(&mut self) {
        let cap = self.settings.max_particles();
        let len = self.state.particles.len();
        if len > cap {
            self.state.particles.drain(..len - cap);
        }
    }
}
