//! Voice, LFO and pitch-envelope parameter sets.
//!
//! All scalars use the DX7-canonical 0-99 / small-integer ranges and are
//! clamped at the point of use, never validated here. Parameters are
//! immutable while a note sounds; they flow into the runtime state on
//! `configure` or note-on.

use crate::NUM_OPERATORS;

/// Four-stage amplitude envelope parameters plus the operator level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeParams {
    /// Operator volume (0-99).
    pub output_level: u8,

    /// Stage target levels (0-99).
    pub l1: u8,
    pub l2: u8,
    pub l3: u8,
    pub l4: u8,

    /// Stage rates (0-99).
    pub r1: u8,
    pub r2: u8,
    pub r3: u8,
    pub r4: u8,

    /// Keyboard rate scaling sensitivity (0-7).
    pub rate_scaling: u8,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            output_level: 99,
            l1: 99,
            l2: 99,
            l3: 99,
            l4: 0,
            r1: 99,
            r2: 0,
            r3: 0,
            r4: 99,
            rate_scaling: 0,
        }
    }
}

/// Operator frequency parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyParams {
    /// false = ratio mode, true = fixed-frequency mode.
    pub fixed_mode: bool,

    /// 0-14, centred at 7 (no detune).
    pub detune: u8,

    /// 0-31; in ratio mode 0 denotes the half ratio 0.5.
    pub coarse: u8,

    /// 0-99, adds up to 99% of the coarse value.
    pub fine: u8,
}

impl Default for FrequencyParams {
    fn default() -> Self {
        Self {
            fixed_mode: false,
            detune: 7,
            coarse: 0,
            fine: 0,
        }
    }
}

/// Keyboard level scaling around a breakpoint key.
///
/// Curves: 0 = -linear, 1 = -exponential, 2 = +exponential, 3 = +linear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyScaleParams {
    pub breakpoint: u8,
    pub left_depth: u8,
    pub right_depth: u8,
    pub left_curve: u8,
    pub right_curve: u8,
}

/// One FM operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorParams {
    pub enabled: bool,
    pub frequency: FrequencyParams,
    pub envelope: EnvelopeParams,

    /// 0-7.
    pub velocity_sensitivity: u8,

    /// 0-3.
    pub amp_mod_sens: u8,

    pub key_scale: KeyScaleParams,

    /// Restart the oscillator phase on every note-on.
    pub osc_key_sync: bool,

    /// 0 = sine, 1 = triangle, 2 = saw down, 3 = saw up, 4 = square.
    pub waveform: u8,
}

impl Default for OperatorParams {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: FrequencyParams::default(),
            envelope: EnvelopeParams::default(),
            velocity_sensitivity: 0,
            amp_mod_sens: 0,
            key_scale: KeyScaleParams::default(),
            osc_key_sync: false,
            waveform: 0,
        }
    }
}

/// One complete voice: six operators plus routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceParams {
    pub operators: [OperatorParams; NUM_OPERATORS],

    /// Index into the algorithm catalogue (0-31).
    pub algorithm: u8,

    /// Feedback amount for the designated feedback operator (0-7).
    pub feedback: u8,

    /// 0-48; effective semitone offset is `transpose - 24`.
    pub transpose: u8,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            operators: core::array::from_fn(|_| OperatorParams::default()),
            algorithm: 0,
            feedback: 0,
            transpose: 24,
        }
    }
}

/// Low-frequency oscillator parameters.
///
/// Waveforms: 0 = triangle, 1 = saw down, 2 = saw up, 3 = square,
/// 4 = sine, 5 = sample & hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LfoParams {
    pub waveform: u8,
    pub speed: u8,
    pub delay: u8,
    pub pitch_mod_depth: u8,
    pub amp_mod_depth: u8,

    /// 0-7.
    pub pitch_mod_sens: u8,

    /// Restart the LFO on every note-on instead of only when the pool
    /// goes from silent to sounding.
    pub key_sync: bool,
}

/// Pitch envelope parameters. Level 50 is unity pitch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchEnvelopeParams {
    pub l1: u8,
    pub l2: u8,
    pub l3: u8,
    pub l4: u8,

    pub r1: u8,
    pub r2: u8,
    pub r3: u8,
    pub r4: u8,
}

impl Default for PitchEnvelopeParams {
    fn default() -> Self {
        Self {
            l1: 50,
            l2: 50,
            l3: 50,
            l4: 50,
            r1: 0,
            r2: 0,
            r3: 0,
            r4: 0,
        }
    }
}

/// Everything the synthesizer needs to make sound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthParams {
    pub voice: VoiceParams,
    pub lfo: LfoParams,
    pub pitch_envelope: PitchEnvelopeParams,
    pub monophonic: bool,
}
