//! Phase-accumulator oscillator with phase-modulation and
//! pitch-multiplier inputs.

use crate::{lut, INV_SAMPLE_RATE, SAMPLE_RATE};

/// Audio-rate waveforms. Sine reads the lookup table, the rest are
/// closed forms.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Sine,

    Triangle,
    SawDown,
    SawUp,
    Square,
}

impl<T> From<T> for Waveform
where
    T: Into<usize>,
{
    fn from(value: T) -> Self {
        match value.into() {
            1 => Waveform::Triangle,
            2 => Waveform::SawDown,
            3 => Waveform::SawUp,
            4 => Waveform::Square,
            _ => Waveform::Sine,
        }
    }
}

#[derive(Debug, Default)]
pub struct Oscillator {
    phase: f32,
    phase_increment: f32,
    waveform: Waveform,
}

impl Oscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp to [0, 20 kHz] and cache the per-sample phase increment.
    pub fn set_frequency(&mut self, frequency: f32) {
        let frequency = frequency.clamp(0.0, 20000.0);
        self.phase_increment = frequency * INV_SAMPLE_RATE;
    }

    pub fn frequency(&self) -> f32 {
        self.phase_increment * SAMPLE_RATE
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Produce one sample. `phase_mod` is added to the read phase only;
    /// `pitch_mod` multiplies the frequency for this sample. A single
    /// conditional wrap is enough for the bounded modulation depths the
    /// engine produces.
    #[inline]
    pub fn process(&mut self, phase_mod: f32, pitch_mod: f32) -> f32 {
        let mut modulated_phase = self.phase + phase_mod;

        if modulated_phase >= 1.0 {
            modulated_phase -= 1.0;
        } else if modulated_phase < 0.0 {
            modulated_phase += 1.0;
        }

        self.phase += self.phase_increment * pitch_mod;

        if self.phase >= 1.0 {
            self.phase -= 1.0;
        } else if self.phase < 0.0 {
            self.phase += 1.0;
        }

        match self.waveform {
            Waveform::Sine => lut::sin(modulated_phase),
            Waveform::Triangle => lut::triangle(modulated_phase),
            Waveform::SawDown => lut::saw(modulated_phase),
            Waveform::SawUp => -lut::saw(modulated_phase),
            Waveform::Square => lut::square(modulated_phase),
        }
    }
}
