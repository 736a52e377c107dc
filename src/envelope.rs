//! Four-stage envelopes in the Q24 log domain.
//!
//! [`Envelope`] is the amplitude envelope: levels and rates move on the
//! hardware's exponential ladders, equal-level stages pause for the
//! hand-tuned static durations, and ascending segments snap to the jump
//! target before integrating. [`PitchEnvelope`] shares the stage machine
//! but runs on the signed pitch tables and returns a frequency
//! multiplier instead of a gain.
//!
//! All level arithmetic is 32-bit with 24 fractional bits; rescaling by
//! the sample-rate multiplier goes through 64 bits.

use crate::dx_units::{scale_out_level, PITCHENV_RATE, PITCHENV_TAB};
use crate::params::{EnvelopeParams, PitchEnvelopeParams};
use crate::{lut, INV_Q24_ONE, Q24_ONE, SAMPLE_RATE};

/// Q24 rescaling factor from the 44.1 kHz reference timings to the
/// compiled sample rate.
const SR_MULTIPLIER: i64 = (44100.0 / SAMPLE_RATE * Q24_ONE as f32) as i64;

/// Ascending segments start no lower than this level.
const JUMP_TARGET: u32 = 1716 << 16;

/// Stage durations in samples for equal-level (static) transitions,
/// indexed by the scaled rate. Rates 77-99 use `20 * (99 - rate)`.
const STATICS: [i32; 77] = [
    1764000, 1764000, 1411200, 1411200, 1190700, 1014300, 992250, 882000, 705600, 705600,
    584325, 507150, 502740, 441000, 418950, 352800, 308700, 286650, 253575, 220500, 220500,
    176400, 145530, 145530, 125685, 110250, 110250, 88200, 88200, 74970, 61740, 61740, 55125,
    48510, 44100, 37485, 31311, 30870, 27562, 27562, 22050, 18522, 17640, 15435, 14112, 13230,
    11025, 9261, 9261, 7717, 6615, 6615, 5512, 5512, 4410, 3969, 3969, 3439, 2866, 2690, 2249,
    1984, 1896, 1808, 1411, 1367, 1234, 1146, 926, 837, 837, 705, 573, 573, 529, 441, 441,
];

/// DX7-style four-stage amplitude envelope. Stage 4 is idle.
#[derive(Debug)]
pub struct Envelope {
    levels: [u8; 4],
    rates: [u8; 4],
    output_level: i32,

    current_level: u32,
    increment: i32,
    target_level: i32,
    static_count: i32,
    rate_scaling: i32,
    stage: u8,
    rising: bool,
    key_down: bool,
    configured: bool,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            levels: [0; 4],
            rates: [0; 4],
            output_level: 0,
            current_level: 0,
            increment: 0,
            target_level: 0,
            static_count: 0,
            rate_scaling: 0,
            stage: 4,
            rising: false,
            key_down: false,
            configured: false,
        }
    }

    /// Adopt a parameter set and drop to idle at level zero.
    pub fn set_config(&mut self, params: &EnvelopeParams) {
        self.copy_params(params);
        self.current_level = 0;
        self.static_count = 0;
        self.configured = true;
        self.go_to_stage(4);
    }

    /// Adopt edited parameters without leaving the current stage; the
    /// stage target and rate are recomputed in place.
    pub fn update(&mut self, params: &EnvelopeParams) {
        if !self.configured {
            self.set_config(params);
            return;
        }
        self.copy_params(params);
        self.go_to_stage(self.stage);
    }

    fn copy_params(&mut self, params: &EnvelopeParams) {
        self.levels = [params.l1, params.l2, params.l3, params.l4];
        self.rates = [params.r1, params.r2, params.r3, params.r4];
        self.output_level = i32::from(scale_out_level(params.output_level)) << 5;
    }

    /// Install the per-note rate offset computed from the key position.
    pub fn set_rate_scaling(&mut self, rate_scaling: i32) {
        self.rate_scaling = rate_scaling;
        self.go_to_stage(self.stage);
    }

    pub fn trigger(&mut self) {
        self.key_down = true;
        self.go_to_stage(0);
    }

    pub fn release(&mut self) {
        self.key_down = false;
        if self.stage < 3 {
            self.go_to_stage(3);
        }
    }

    pub fn reset(&mut self) {
        self.go_to_stage(4);
        self.current_level = 0;
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    /// The envelope sounds while a stage runs, or holds at L4 when L4 is
    /// above zero.
    pub fn is_active(&self) -> bool {
        self.configured && (self.stage < 4 || self.levels[3] > 0)
    }

    fn go_to_stage(&mut self, stage: u8) {
        self.stage = stage;
        if stage >= 4 {
            return;
        }

        let new_level = self.levels[stage as usize];
        let mut actual_level = i32::from(scale_out_level(new_level)) >> 1;
        actual_level = (actual_level << 6) + self.output_level - 4256;
        if actual_level < 16 {
            actual_level = 16;
        }

        self.target_level = actual_level << 16;
        self.rising = self.target_level as u32 > self.current_level;

        let mut q_rate = (i32::from(self.rates[stage as usize]) * 41) >> 6;
        q_rate += self.rate_scaling;
        if q_rate > 63 {
            q_rate = 63;
        }

        // Equal-level stages still consume an audible amount of time.
        if self.target_level as u32 == self.current_level || (stage == 0 && new_level == 0) {
            let mut static_rate = i32::from(self.rates[stage as usize]) + self.rate_scaling;
            if static_rate > 99 {
                static_rate = 99;
            }

            let mut count = if static_rate < 77 {
                STATICS[static_rate as usize]
            } else {
                20 * (99 - static_rate)
            };
            if static_rate < 77 && stage == 0 && new_level == 0 {
                count /= 20;
            }
            self.static_count = ((i64::from(count) * SR_MULTIPLIER) >> 24) as i32;
        } else {
            self.static_count = 0;
        }

        let increment = (4 + (q_rate & 3)) << (2 + (q_rate >> 2));
        self.increment = ((i64::from(increment) * SR_MULTIPLIER) >> 24) as i32;
    }

    /// Advance one sample and return the linear gain.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if !self.configured {
            return 0.0;
        }

        // Equal-level pause: hold, count down, advance on expiry.
        if self.static_count > 0 {
            self.static_count -= 1;
            if self.static_count == 0 {
                self.go_to_stage(self.stage + 1);
            }
            return lut::exp2(self.current_level as f32 * INV_Q24_ONE - 14.0);
        }

        let should_step = self.stage < 3 || (self.stage == 3 && !self.key_down);

        if should_step {
            if self.rising {
                if self.current_level < JUMP_TARGET {
                    self.current_level = JUMP_TARGET;
                }
                self.current_level +=
                    (((17u32 << 24) - self.current_level) >> 24) * self.increment as u32;
                if self.current_level >= self.target_level as u32 {
                    self.current_level = self.target_level as u32;
                    self.go_to_stage(self.stage + 1);
                }
            } else {
                self.current_level = self.current_level.wrapping_sub(self.increment as u32);
                if self.current_level <= self.target_level as u32 {
                    self.current_level = self.target_level as u32;
                    self.go_to_stage(self.stage + 1);
                }
            }
        }

        lut::exp2(self.current_level as f32 * INV_Q24_ONE - 14.0)
    }
}

/// Per-sample pitch envelope increment for rate setting 0, in Q24.
const PITCH_UNIT: f32 = (Q24_ONE as f32 / (21.3 * 44100.0)) * (44100.0 / SAMPLE_RATE);

/// Four-stage pitch envelope; stage 3 doubles as idle and only runs
/// after key-up. Returns a frequency multiplier around 1.0.
#[derive(Debug)]
pub struct PitchEnvelope {
    levels: [u8; 4],
    rates: [u8; 4],

    level: i32,
    target_level: i32,
    increment: i32,
    stage: u8,
    rising: bool,
    key_down: bool,
    configured: bool,
}

impl Default for PitchEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

impl PitchEnvelope {
    pub fn new() -> Self {
        Self {
            levels: [0; 4],
            rates: [0; 4],
            level: 0,
            target_level: 0,
            increment: 0,
            stage: 3,
            rising: false,
            key_down: false,
            configured: false,
        }
    }

    pub fn set_config(&mut self, params: &PitchEnvelopeParams) {
        self.levels = [params.l1, params.l2, params.l3, params.l4];
        self.rates = [params.r1, params.r2, params.r3, params.r4];
        self.level = i32::from(PITCHENV_TAB[usize::min(self.levels[3] as usize, 99)]) << 19;
        self.key_down = false;
        self.stage = 3;
        self.configured = true;
    }

    pub fn trigger(&mut self) {
        if !self.configured {
            return;
        }
        self.key_down = true;
        self.advance_stage(0);
    }

    pub fn release(&mut self) {
        if !self.configured {
            return;
        }
        self.key_down = false;
        self.advance_stage(3);
    }

    pub fn reset(&mut self) {
        if self.configured {
            self.level = i32::from(PITCHENV_TAB[usize::min(self.levels[3] as usize, 99)]) << 19;
        } else {
            self.level = 0;
        }
        self.stage = 3;
        self.key_down = false;
    }

    fn advance_stage(&mut self, stage: u8) {
        self.stage = stage;
        if stage >= 4 {
            return;
        }

        let rate = usize::min(self.rates[stage as usize] as usize, 99);
        let level = usize::min(self.levels[stage as usize] as usize, 99);

        self.target_level = i32::from(PITCHENV_TAB[level]) << 19;
        self.rising = self.target_level > self.level;
        self.increment = (f32::from(PITCHENV_RATE[rate]) * PITCH_UNIT) as i32;
    }

    /// Advance one sample and return the pitch multiplier.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if !self.configured {
            return 1.0;
        }

        let should_step = self.stage < 3 || (self.stage == 3 && !self.key_down);

        if should_step {
            if self.rising {
                self.level += self.increment;
                if self.level >= self.target_level {
                    self.level = self.target_level;
                    if self.stage < 3 {
                        self.advance_stage(self.stage + 1);
                    }
                }
            } else {
                self.level -= self.increment;
                if self.level <= self.target_level {
                    self.level = self.target_level;
                    if self.stage < 3 {
                        self.advance_stage(self.stage + 1);
                    }
                }
            }
        }

        lut::exp2(self.level as f32 * INV_Q24_ONE)
    }
}
