//! DX7 SysEx voice-bank decoder.
//!
//! A 32-voice bank dump is 4104 bytes: 6 framing bytes (accepted, not
//! validated), then 32 consecutive 128-byte packed voices, then trailing
//! framing. Each packed voice expands to 155 parameters; the bit fields
//! are masked explicitly, field by field, per the DX7 data format.
//!
//! The decoder only consumes byte buffers. Reading files from a card or
//! a filesystem is the caller's concern.

use crate::error::Error;
use crate::params::{
    EnvelopeParams, FrequencyParams, KeyScaleParams, LfoParams, OperatorParams,
    PitchEnvelopeParams, SynthParams, VoiceParams,
};
use crate::{NUM_ALGORITHMS, NUM_OPERATORS};

/// Bytes in a complete 32-voice bank dump.
pub const BANK_FILE_SIZE: usize = 4104;

/// Offset of the first packed voice.
pub const BANK_HEADER_SIZE: usize = 6;

/// Bytes per packed voice.
pub const PACKED_VOICE_SIZE: usize = 128;

/// Voices per bank.
pub const NUM_BANK_VOICES: usize = 32;

/// Decoded parameters per voice.
pub const NUM_VOICE_PARAMS: usize = 155;

/// Offset of the global block inside a packed voice.
const GLOBAL_BASE: usize = 102;

/// Expand one 128-byte packed voice into its 155 parameters.
///
/// Operators are stored in DX7 order, OP6 first; the expanded layout
/// keeps that order (21 parameters per operator, globals from index
/// 126, the 10 name characters at 145).
pub fn unpack_voice(packed: &[u8; PACKED_VOICE_SIZE], params: &mut [u8; NUM_VOICE_PARAMS]) {
    for op in 0..NUM_OPERATORS {
        let base = op * 17;
        let param_base = op * 21;

        // EG rates and levels.
        for j in 0..4 {
            params[param_base + j] = packed[base + j] & 0x7F;
            params[param_base + 4 + j] = packed[base + 4 + j] & 0x7F;
        }

        // Keyboard level scaling.
        params[param_base + 8] = packed[base + 8] & 0x7F;
        params[param_base + 9] = packed[base + 9] & 0x7F;
        params[param_base + 10] = packed[base + 10] & 0x7F;

        let curves = packed[base + 11] & 0x0F;
        params[param_base + 11] = curves & 0x03;
        params[param_base + 12] = (curves >> 2) & 0x03;

        let detune_rs = packed[base + 12] & 0x7F;
        params[param_base + 13] = detune_rs & 0x07;
        params[param_base + 20] = (detune_rs >> 3) & 0x0F;

        let kvs_ams = packed[base + 13] & 0x1F;
        params[param_base + 14] = kvs_ams & 0x03;
        params[param_base + 15] = (kvs_ams >> 2) & 0x07;

        params[param_base + 16] = packed[base + 14] & 0x7F;

        let coarse_mode = packed[base + 15] & 0x3F;
        params[param_base + 17] = coarse_mode & 0x01;
        params[param_base + 18] = (coarse_mode >> 1) & 0x1F;

        params[param_base + 19] = packed[base + 16] & 0x7F;
    }

    // Pitch envelope.
    for j in 0..8 {
        params[126 + j] = packed[GLOBAL_BASE + j] & 0x7F;
    }

    params[134] = packed[GLOBAL_BASE + 8] & 0x1F;

    let oks_fb = packed[GLOBAL_BASE + 9] & 0x0F;
    params[135] = oks_fb & 0x07;
    params[136] = (oks_fb >> 3) & 0x01;

    params[137] = packed[GLOBAL_BASE + 10] & 0x7F;
    params[138] = packed[GLOBAL_BASE + 11] & 0x7F;
    params[139] = packed[GLOBAL_BASE + 12] & 0x7F;
    params[140] = packed[GLOBAL_BASE + 13] & 0x7F;

    let pms_lfw_lks = packed[GLOBAL_BASE + 14] & 0x7F;
    params[141] = pms_lfw_lks & 0x01;
    params[142] = (pms_lfw_lks >> 1) & 0x07;
    params[143] = (pms_lfw_lks >> 4) & 0x07;

    params[144] = packed[GLOBAL_BASE + 15] & 0x7F;

    for i in 0..10 {
        params[145 + i] = packed[GLOBAL_BASE + 16 + i] & 0x7F;
    }
}

/// Re-pack 155 parameters into the 128-byte voice layout. The exact
/// inverse of [`unpack_voice`]; reserved bits come out zero.
pub fn pack_voice(params: &[u8; NUM_VOICE_PARAMS], packed: &mut [u8; PACKED_VOICE_SIZE]) {
    for op in 0..NUM_OPERATORS {
        let base = op * 17;
        let param_base = op * 21;

        for j in 0..4 {
            packed[base + j] = params[param_base + j] & 0x7F;
            packed[base + 4 + j] = params[param_base + 4 + j] & 0x7F;
        }

        packed[base + 8] = params[param_base + 8] & 0x7F;
        packed[base + 9] = params[param_base + 9] & 0x7F;
        packed[base + 10] = params[param_base + 10] & 0x7F;

        packed[base + 11] = (params[param_base + 11] & 0x03) | ((params[param_base + 12] & 0x03) << 2);
        packed[base + 12] = (params[param_base + 13] & 0x07) | ((params[param_base + 20] & 0x0F) << 3);
        packed[base + 13] = (params[param_base + 14] & 0x03) | ((params[param_base + 15] & 0x07) << 2);

        packed[base + 14] = params[param_base + 16] & 0x7F;
        packed[base + 15] = (params[param_base + 17] & 0x01) | ((params[param_base + 18] & 0x1F) << 1);
        packed[base + 16] = params[param_base + 19] & 0x7F;
    }

    for j in 0..8 {
        packed[GLOBAL_BASE + j] = params[126 + j] & 0x7F;
    }

    packed[GLOBAL_BASE + 8] = params[134] & 0x1F;
    packed[GLOBAL_BASE + 9] = (params[135] & 0x07) | ((params[136] & 0x01) << 3);

    packed[GLOBAL_BASE + 10] = params[137] & 0x7F;
    packed[GLOBAL_BASE + 11] = params[138] & 0x7F;
    packed[GLOBAL_BASE + 12] = params[139] & 0x7F;
    packed[GLOBAL_BASE + 13] = params[140] & 0x7F;

    packed[GLOBAL_BASE + 14] =
        (params[141] & 0x01) | ((params[142] & 0x07) << 1) | ((params[143] & 0x07) << 4);

    packed[GLOBAL_BASE + 15] = params[144] & 0x7F;

    for i in 0..10 {
        packed[GLOBAL_BASE + 16 + i] = params[145 + i] & 0x7F;
    }
}

/// A decoded 32-voice bank.
#[derive(Debug)]
pub struct Bank {
    params: [[u8; NUM_VOICE_PARAMS]; NUM_BANK_VOICES],
    loaded: bool,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl Bank {
    pub const fn new() -> Self {
        Self {
            params: [[0; NUM_VOICE_PARAMS]; NUM_BANK_VOICES],
            loaded: false,
        }
    }

    /// Decode a bank dump. A size other than 4104 bytes is tolerated
    /// with a warning as long as all 32 voices are present; a shorter
    /// buffer aborts and leaves the bank unloaded.
    pub fn load(&mut self, data: &[u8]) -> Result<(), Error> {
        self.loaded = false;

        if data.len() != BANK_FILE_SIZE {
            log::warn!(
                "bank is {} bytes (expected {} for a 32-voice dump)",
                data.len(),
                BANK_FILE_SIZE
            );
        }

        let required = BANK_HEADER_SIZE + NUM_BANK_VOICES * PACKED_VOICE_SIZE;

        for voice in 0..NUM_BANK_VOICES {
            let offset = BANK_HEADER_SIZE + voice * PACKED_VOICE_SIZE;
            let Some(packed) = data.get(offset..offset + PACKED_VOICE_SIZE) else {
                log::error!("bank too small for 32 voices");
                return Err(Error::BankTooShort {
                    expected: required,
                    actual: data.len(),
                });
            };
            let packed: &[u8; PACKED_VOICE_SIZE] = packed.try_into().unwrap();
            unpack_voice(packed, &mut self.params[voice]);
        }

        self.loaded = true;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn unload(&mut self) {
        self.loaded = false;
    }

    /// The 10 raw ASCII name bytes of a preset.
    pub fn voice_name(&self, preset: usize) -> Option<&[u8]> {
        if !self.loaded || preset >= NUM_BANK_VOICES {
            return None;
        }
        Some(&self.params[preset][145..155])
    }

    /// The decoded 155-parameter block of a preset.
    pub fn raw_params(&self, preset: usize) -> Option<&[u8; NUM_VOICE_PARAMS]> {
        if !self.loaded || preset >= NUM_BANK_VOICES {
            return None;
        }
        Some(&self.params[preset])
    }

    /// Materialise one preset into a complete parameter set.
    pub fn synth_params(&self, preset: usize) -> Result<SynthParams, Error> {
        if !self.loaded {
            return Err(Error::BankNotLoaded);
        }
        if preset >= NUM_BANK_VOICES {
            return Err(Error::InvalidPresetIndex(preset as u8));
        }

        Ok(materialize(&self.params[preset]))
    }
}

/// Map a 155-parameter block onto the engine's parameter structs.
///
/// Operator order is reversed so that core operator 0 is DX7 OP1; the
/// index-descending evaluation of the algorithm router then matches the
/// hardware's operator numbering.
fn materialize(params: &[u8; NUM_VOICE_PARAMS]) -> SynthParams {
    let mut voice = VoiceParams::default();

    for dx7_op in 0..NUM_OPERATORS {
        let our_op = NUM_OPERATORS - 1 - dx7_op;
        let p = &params[dx7_op * 21..];

        voice.operators[our_op] = OperatorParams {
            enabled: true,
            frequency: FrequencyParams {
                fixed_mode: p[17] == 1,
                detune: u8::min(p[20], 14),
                coarse: u8::min(p[18], 31),
                fine: u8::min(p[19], 99),
            },
            envelope: EnvelopeParams {
                output_level: u8::min(p[16], 99),
                l1: u8::min(p[4], 99),
                l2: u8::min(p[5], 99),
                l3: u8::min(p[6], 99),
                l4: u8::min(p[7], 99),
                r1: u8::min(p[0], 99),
                r2: u8::min(p[1], 99),
                r3: u8::min(p[2], 99),
                r4: u8::min(p[3], 99),
                rate_scaling: u8::min(p[13], 7),
            },
            velocity_sensitivity: u8::min(p[15], 7),
            amp_mod_sens: u8::min(p[14], 3),
            key_scale: KeyScaleParams {
                breakpoint: u8::min(p[8], 99),
                left_depth: u8::min(p[9], 99),
                right_depth: u8::min(p[10], 99),
                left_curve: u8::min(p[11], 3),
                right_curve: u8::min(p[12], 3),
            },
            osc_key_sync: params[136] == 1,
            waveform: 0,
        };
    }

    voice.algorithm = if usize::from(params[134]) >= NUM_ALGORITHMS {
        log::warn!("algorithm index {} out of range, using 0", params[134]);
        0
    } else {
        params[134]
    };
    voice.feedback = u8::min(params[135], 7);
    voice.transpose = u8::min(params[144], 48);

    let lfo = LfoParams {
        waveform: u8::min(params[142], 5),
        speed: u8::min(params[137], 99),
        delay: u8::min(params[138], 99),
        pitch_mod_depth: u8::min(params[139], 99),
        amp_mod_depth: u8::min(params[140], 99),
        pitch_mod_sens: u8::min(params[143], 7),
        key_sync: params[141] == 1,
    };

    let pitch_envelope = PitchEnvelopeParams {
        l1: u8::min(params[130], 99),
        l2: u8::min(params[131], 99),
        l3: u8::min(params[132], 99),
        l4: u8::min(params[133], 99),
        r1: u8::min(params[126], 99),
        r2: u8::min(params[127], 99),
        r3: u8::min(params[128], 99),
        r4: u8::min(params[129], 99),
    };

    SynthParams {
        voice,
        lfo,
        pitch_envelope,
        monophonic: false,
    }
}
