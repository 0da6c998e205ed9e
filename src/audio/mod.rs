//! Audio system
//!
//! Procedurally generated sound effects - no sample assets. Sound is an
//! enhancement only: every failure is swallowed here and gameplay never sees it.

pub mod effects;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::Cell;

pub use effects::{PEAK_GAIN, SoundEffect, Tone, Waveform};
#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

use crate::error::AudioError;
use crate::settings::Settings;

/// Backend that turns tones into audible output
pub trait ToneSink {
    /// Acquire the output device ahead of time (call from a user gesture)
    fn prepare(&self) -> Result<(), AudioError> {
        Ok(())
    }

    /// Schedule one tone at the given peak gain
    fn play_tone(&self, tone: &Tone, peak_gain: f32) -> Result<(), AudioError>;
}

/// Backend for builds without an audio device
#[derive(Debug, Default)]
pub struct SilentSink;

impl ToneSink for SilentSink {
    fn play_tone(&self, _tone: &Tone, _peak_gain: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sound manager shared by the shell and every session
pub struct SoundManager {
    sink: Box<dyn ToneSink>,
    muted: Cell<bool>,
    volume: Cell<f32>,
}

impl SoundManager {
    pub fn new(sink: Box<dyn ToneSink>) -> Self {
        Self {
            sink,
            muted: Cell::new(false),
            volume: Cell::new(1.0),
        }
    }

    /// Create a manager honoring persisted preferences
    pub fn from_settings(sink: Box<dyn ToneSink>, settings: &Settings) -> Self {
        let manager = Self::new(sink);
        manager.set_muted(settings.muted);
        manager.set_volume(settings.volume);
        manager
    }

    /// Manager that never makes a sound
    pub fn silent() -> Self {
        Self::new(Box::new(SilentSink))
    }

    /// Warm up the backend from a user gesture
    pub fn warm_up(&self) {
        if let Err(e) = self.sink.prepare() {
            log::warn!("Audio disabled: {}", e);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
    }

    /// Flip the mute flag, returning the new state
    pub fn toggle_mute(&self) -> bool {
        let muted = !self.muted.get();
        self.muted.set(muted);
        log::info!("Sound {}", if muted { "muted" } else { "unmuted" });
        muted
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&self, vol: f32) {
        self.volume.set(vol.clamp(0.0, 1.0));
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.muted.get() {
            return;
        }
        let gain = PEAK_GAIN * self.volume.get();
        if gain <= 0.0 {
            return;
        }
        for tone in effect.tones() {
            if let Err(e) = self.sink.play_tone(&tone, gain) {
                log::debug!("Skipping {} sound: {}", effect.as_str(), e);
                return;
            }
        }
    }

    /// Play an effect by name; unknown names are ignored
    pub fn play_named(&self, name: &str) {
        if let Some(effect) = SoundEffect::from_name(name) {
            self.play(effect);
        }
    }
}
