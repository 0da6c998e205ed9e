//! Web Audio backend
//!
//! The context is created on first use; browsers refuse to start audio before
//! a user gesture, so creating it early only yields a suspended context.

use std::cell::RefCell;

use web_sys::{AudioContext, AudioContextState, OscillatorType};

use super::ToneSink;
use super::effects::{DECAY_FLOOR, Tone, Waveform};
use crate::error::AudioError;

fn node_err(e: wasm_bindgen::JsValue) -> AudioError {
    AudioError::Node(format!("{:?}", e))
}

/// Plays tones through a lazily created `AudioContext`
#[derive(Default)]
pub struct WebAudioSink {
    ctx: RefCell<Option<AudioContext>>,
}

impl WebAudioSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the context, resuming it if suspended
    fn context(&self) -> Result<AudioContext, AudioError> {
        let mut slot = self.ctx.borrow_mut();
        if slot.is_none() {
            let ctx = AudioContext::new()
                .map_err(|e| AudioError::Unavailable(format!("{:?}", e)))?;
            log::info!("AudioContext created");
            *slot = Some(ctx);
        }
        let ctx = slot
            .as_ref()
            .ok_or_else(|| AudioError::Unavailable("no context".to_string()))?;

        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Ok(ctx.clone())
    }
}

impl ToneSink for WebAudioSink {
    fn prepare(&self) -> Result<(), AudioError> {
        self.context().map(|_| ())
    }

    fn play_tone(&self, tone: &Tone, peak_gain: f32) -> Result<(), AudioError> {
        let ctx = self.context()?;
        let osc = ctx.create_oscillator().map_err(node_err)?;
        let gain = ctx.create_gain().map_err(node_err)?;

        osc.set_type(match tone.waveform {
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Triangle => OscillatorType::Triangle,
        });

        let t = ctx.current_time() + tone.offset;
        let end = t + tone.duration;

        osc.frequency()
            .set_value_at_time(tone.freq, t)
            .map_err(node_err)?;
        if let Some(end_freq) = tone.end_freq {
            osc.frequency()
                .linear_ramp_to_value_at_time(end_freq, end)
                .map_err(node_err)?;
        }

        gain.gain().set_value_at_time(peak_gain, t).map_err(node_err)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(DECAY_FLOOR, end)
            .map_err(node_err)?;

        osc.connect_with_audio_node(&gain).map_err(node_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(node_err)?;

        osc.start_with_when(t).map_err(node_err)?;
        osc.stop_with_when(end).map_err(node_err)?;
        Ok(())
    }
}
