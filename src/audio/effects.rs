//! The closed table of arcade sound effects
//!
//! Each effect is one or more oscillator tones. Pure data so it can be tested
//! without an audio device.

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator voice with an exponential decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start frequency (Hz)
    pub freq: f32,
    /// Linear ramp target (Hz), if the pitch slides
    pub end_freq: Option<f32>,
    /// Length in seconds; gain has decayed to `DECAY_FLOOR` by then
    pub duration: f64,
    pub waveform: Waveform,
    /// Delay from the trigger time (seconds)
    pub offset: f64,
}

/// Gain the envelope decays to
pub const DECAY_FLOOR: f32 = 0.001;

/// Peak gain at full volume
pub const PEAK_GAIN: f32 = 0.15;

impl Tone {
    const fn new(freq: f32, duration: f64, waveform: Waveform) -> Self {
        Self {
            freq,
            end_freq: None,
            duration,
            waveform,
            offset: 0.0,
        }
    }

    const fn sweep(freq: f32, end_freq: f32, duration: f64, waveform: Waveform) -> Self {
        Self {
            freq,
            end_freq: Some(end_freq),
            duration,
            waveform,
            offset: 0.0,
        }
    }
}

/// Sound effect names used by the games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Blip,
    Score,
    Die,
    Move,
    Clear,
    Drop,
    Hit,
    Powerup,
    Select,
    Start,
    GameOver,
    Click,
    Win,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 13] = [
        SoundEffect::Blip,
        SoundEffect::Score,
        SoundEffect::Die,
        SoundEffect::Move,
        SoundEffect::Clear,
        SoundEffect::Drop,
        SoundEffect::Hit,
        SoundEffect::Powerup,
        SoundEffect::Select,
        SoundEffect::Start,
        SoundEffect::GameOver,
        SoundEffect::Click,
        SoundEffect::Win,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Blip => "blip",
            SoundEffect::Score => "score",
            SoundEffect::Die => "die",
            SoundEffect::Move => "move",
            SoundEffect::Clear => "clear",
            SoundEffect::Drop => "drop",
            SoundEffect::Hit => "hit",
            SoundEffect::Powerup => "powerup",
            SoundEffect::Select => "select",
            SoundEffect::Start => "start",
            SoundEffect::GameOver => "gameover",
            SoundEffect::Click => "click",
            SoundEffect::Win => "win",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }

    /// The voices that make up this effect
    pub fn tones(&self) -> Vec<Tone> {
        use Waveform::*;
        match self {
            SoundEffect::Blip => vec![Tone::new(800.0, 0.05, Square)],
            SoundEffect::Score => vec![Tone::sweep(600.0, 900.0, 0.1, Square)],
            SoundEffect::Die => vec![Tone::sweep(200.0, 50.0, 0.3, Sawtooth)],
            SoundEffect::Move => vec![Tone::new(400.0, 0.03, Square)],
            SoundEffect::Clear => vec![Tone::sweep(400.0, 800.0, 0.15, Square)],
            SoundEffect::Drop => vec![Tone::new(150.0, 0.1, Triangle)],
            SoundEffect::Hit => vec![Tone::sweep(300.0, 100.0, 0.08, Square)],
            SoundEffect::Powerup => vec![Tone::sweep(300.0, 1200.0, 0.2, Square)],
            SoundEffect::Select => vec![Tone::new(500.0, 0.06, Square)],
            SoundEffect::Start => vec![Tone::sweep(200.0, 600.0, 0.15, Square)],
            SoundEffect::GameOver => vec![Tone::sweep(400.0, 100.0, 0.5, Sawtooth)],
            SoundEffect::Click => vec![Tone::new(1000.0, 0.02, Square)],
            SoundEffect::Win => arpeggio(&[523.0, 659.0, 784.0, 1047.0], 0.1, Square),
        }
    }
}

/// Notes played back to back, each `note_len` long
fn arpeggio(freqs: &[f32], note_len: f64, waveform: Waveform) -> Vec<Tone> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, &freq)| Tone {
            offset: i as f64 * note_len,
            ..Tone::new(freq, note_len, waveform)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for effect in SoundEffect::ALL {
            assert_eq!(SoundEffect::from_name(effect.as_str()), Some(effect));
        }
        assert_eq!(SoundEffect::from_name("kazoo"), None);
    }

    #[test]
    fn test_every_effect_has_voices() {
        for effect in SoundEffect::ALL {
            let tones = effect.tones();
            assert!(!tones.is_empty(), "{:?} is silent", effect);
            assert!(tones.iter().all(|t| t.duration > 0.0 && t.freq > 0.0));
        }
    }

    #[test]
    fn test_win_arpeggio_is_sequenced() {
        let tones = SoundEffect::Win.tones();
        let offsets: Vec<f64> = tones.iter().map(|t| t.offset).collect();
        assert_eq!(tones.len(), 4);
        assert_eq!(tones[3].freq, 1047.0);
        assert!(offsets.windows(2).all(|w| w[1] > w[0]));
    }
}
