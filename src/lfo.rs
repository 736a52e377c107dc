//! Six-waveform low-frequency oscillator for vibrato and tremolo.
//!
//! The LFO is global to the synthesizer: one instance modulates every
//! voice. During the configured onset delay the outputs are pinned to
//! their neutral values and the phase does not advance.

use crate::dx_units::{INV_PARAM_99, LFO_DELAY, LFO_PMS, LFO_SPEED};
use crate::params::LfoParams;
use crate::{lut, INV_SAMPLE_RATE, SAMPLE_RATE};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Triangle,

    SawDown,
    SawUp,
    Square,
    Sine,
    SampleHold,
}

impl<T> From<T> for Waveform
where
    T: Into<usize>,
{
    fn from(value: T) -> Self {
        match value.into() {
            1 => Waveform::SawDown,
            2 => Waveform::SawUp,
            3 => Waveform::Square,
            4 => Waveform::Sine,
            5 => Waveform::SampleHold,
            _ => Waveform::Triangle,
        }
    }
}

#[derive(Debug)]
pub struct Lfo {
    waveform: Waveform,
    speed: u8,
    delay: u8,
    pitch_mod_depth: u8,
    amp_mod_depth: u8,
    pitch_mod_sens: u8,
    key_sync: bool,

    phase: f32,
    amp_mod: f32,
    pitch_mod: f32,
    delay_samples: i32,
    sample_hold: f32,
    rand_state: u32,
    configured: bool,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Lfo {
    pub fn new() -> Self {
        Self {
            waveform: Waveform::Triangle,
            speed: 0,
            delay: 0,
            pitch_mod_depth: 0,
            amp_mod_depth: 0,
            pitch_mod_sens: 0,
            key_sync: false,

            phase: 0.0,
            amp_mod: 0.0,
            pitch_mod: 1.0,
            delay_samples: 0,
            sample_hold: 0.0,
            rand_state: 12345,
            configured: false,
        }
    }

    pub fn configure(&mut self, params: &LfoParams) {
        self.waveform = Waveform::from(u8::min(params.waveform, 5));
        self.speed = u8::min(params.speed, 99);
        self.delay = u8::min(params.delay, 99);
        self.pitch_mod_depth = u8::min(params.pitch_mod_depth, 99);
        self.amp_mod_depth = u8::min(params.amp_mod_depth, 99);
        self.pitch_mod_sens = u8::min(params.pitch_mod_sens, 7);
        self.key_sync = params.key_sync;
        self.configured = true;
    }

    /// Restart the waveform and reload the onset delay.
    pub fn trigger(&mut self) {
        self.phase = 0.0;
        self.amp_mod = 0.0;
        self.pitch_mod = 1.0;
        if self.configured {
            self.delay_samples = (LFO_DELAY[self.delay as usize] * SAMPLE_RATE) as i32;
        }
    }

    #[inline]
    pub fn process(&mut self) {
        if !self.configured {
            return;
        }

        if self.delay_samples > 0 {
            self.delay_samples -= 1;
            self.amp_mod = 0.0;
            self.pitch_mod = 1.0;
            return;
        }

        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        let value = match self.waveform {
            Waveform::Triangle => lut::triangle(self.phase),
            Waveform::SawDown => -lut::saw(self.phase),
            Waveform::SawUp => lut::saw(self.phase),
            Waveform::Square => lut::square(self.phase),
            Waveform::Sine => lut::sin(self.phase),
            Waveform::SampleHold => {
                // The held value refreshes when the phase wraps.
                self.phase += LFO_SPEED[self.speed as usize] * INV_SAMPLE_RATE;
                if self.phase >= 1.0 {
                    self.phase -= 1.0;
                    self.sample_hold = self.next_random();
                }
                let value = self.sample_hold;
                self.update_mods(value);
                return;
            }
        };

        self.update_mods(value);

        self.phase += LFO_SPEED[self.speed as usize] * INV_SAMPLE_RATE;
    }

    #[inline]
    fn update_mods(&mut self, value: f32) {
        self.amp_mod = (value * 0.5 + 0.5) * self.amp_mod_depth as f32 * INV_PARAM_99;
        self.pitch_mod = lut::exp2(
            value
                * self.pitch_mod_depth as f32
                * INV_PARAM_99
                * LFO_PMS[self.pitch_mod_sens as usize],
        );
    }

    /// Amplitude modulation amount in [0, 1].
    #[inline]
    pub fn amp_mod(&self) -> f32 {
        self.amp_mod
    }

    /// Pitch modulation as a frequency multiplier.
    #[inline]
    pub fn pitch_mod(&self) -> f32 {
        self.pitch_mod
    }

    /// Whether every note-on should restart the LFO.
    pub fn key_sync(&self) -> bool {
        self.key_sync
    }

    // xorshift32
    #[inline]
    fn next_random(&mut self) -> f32 {
        self.rand_state ^= self.rand_state << 13;
        self.rand_state ^= self.rand_state >> 17;
        self.rand_state ^= self.rand_state << 5;
        self.rand_state as f32 * 4.6566129e-10 * 2.0 - 1.0
    }
}
