//! Native binary preset format.
//!
//! A preset file is a 40-byte header — the `AS7\0` magic, a format
//! version, three reserved bytes and a 32-byte null-padded name —
//! followed by a flat serialisation of the complete parameter set, one
//! byte per scalar with booleans as 0/1. The layout is fixed; a decode
//! of an encode is byte-identical.

use crate::error::Error;
use crate::params::{
    EnvelopeParams, FrequencyParams, KeyScaleParams, LfoParams, OperatorParams,
    PitchEnvelopeParams, SynthParams, VoiceParams,
};
use crate::NUM_OPERATORS;

/// ASCII `AS7\0`, little endian on disk.
pub const MAGIC: u32 = 0x0037_5341;

pub const VERSION: u8 = 1;

pub const HEADER_SIZE: usize = 40;
pub const NAME_SIZE: usize = 32;

/// 24 bytes per operator, then algorithm/feedback/transpose, the LFO,
/// the pitch envelope and the monophonic flag.
pub const PAYLOAD_SIZE: usize = NUM_OPERATORS * 24 + 3 + 7 + 8 + 1;

pub const FILE_SIZE: usize = HEADER_SIZE + PAYLOAD_SIZE;

/// A decoded preset file.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: [u8; NAME_SIZE],
    pub params: SynthParams,
}

/// Serialise a parameter set. The name is truncated to 31 bytes so the
/// stored field always ends in at least one null.
pub fn encode(params: &SynthParams, name: &[u8], out: &mut [u8; FILE_SIZE]) {
    out.fill(0);

    out[0..4].copy_from_slice(&MAGIC.to_le_bytes());
    out[4] = VERSION;

    let name_len = usize::min(name.len(), NAME_SIZE - 1);
    out[8..8 + name_len].copy_from_slice(&name[..name_len]);

    let mut offset = HEADER_SIZE;
    let mut push = |buffer: &mut [u8; FILE_SIZE], value: u8| {
        buffer[offset] = value;
        offset += 1;
    };

    for op in params.voice.operators.iter() {
        push(out, op.enabled as u8);

        push(out, op.frequency.fixed_mode as u8);
        push(out, op.frequency.detune);
        push(out, op.frequency.coarse);
        push(out, op.frequency.fine);

        push(out, op.envelope.output_level);
        push(out, op.envelope.l1);
        push(out, op.envelope.l2);
        push(out, op.envelope.l3);
        push(out, op.envelope.l4);
        push(out, op.envelope.r1);
        push(out, op.envelope.r2);
        push(out, op.envelope.r3);
        push(out, op.envelope.r4);
        push(out, op.envelope.rate_scaling);

        push(out, op.velocity_sensitivity);
        push(out, op.amp_mod_sens);
        push(out, op.key_scale.breakpoint);
        push(out, op.key_scale.left_depth);
        push(out, op.key_scale.right_depth);
        push(out, op.key_scale.left_curve);
        push(out, op.key_scale.right_curve);
        push(out, op.osc_key_sync as u8);
        push(out, op.waveform);
    }

    push(out, params.voice.algorithm);
    push(out, params.voice.feedback);
    push(out, params.voice.transpose);

    push(out, params.lfo.waveform);
    push(out, params.lfo.speed);
    push(out, params.lfo.delay);
    push(out, params.lfo.pitch_mod_depth);
    push(out, params.lfo.amp_mod_depth);
    push(out, params.lfo.pitch_mod_sens);
    push(out, params.lfo.key_sync as u8);

    push(out, params.pitch_envelope.l1);
    push(out, params.pitch_envelope.l2);
    push(out, params.pitch_envelope.l3);
    push(out, params.pitch_envelope.l4);
    push(out, params.pitch_envelope.r1);
    push(out, params.pitch_envelope.r2);
    push(out, params.pitch_envelope.r3);
    push(out, params.pitch_envelope.r4);

    push(out, params.monophonic as u8);
}

/// Decode a preset file, rejecting unknown magic or version.
pub fn decode(data: &[u8]) -> Result<Preset, Error> {
    if data.len() < FILE_SIZE {
        return Err(Error::TruncatedPreset {
            expected: FILE_SIZE,
            actual: data.len(),
        });
    }

    let magic = u32::from_le_bytes(data[0..4].try_into().unwrap());
    if magic != MAGIC {
        return Err(Error::BadMagic(magic));
    }

    if data[4] != VERSION {
        return Err(Error::BadVersion(data[4]));
    }

    let mut name = [0; NAME_SIZE];
    name.copy_from_slice(&data[8..8 + NAME_SIZE]);

    let mut offset = HEADER_SIZE;
    let mut pull = || {
        let value = data[offset];
        offset += 1;
        value
    };

    let mut voice = VoiceParams::default();

    for op in 0..NUM_OPERATORS {
        let enabled = pull() != 0;

        let frequency = FrequencyParams {
            fixed_mode: pull() != 0,
            detune: pull(),
            coarse: pull(),
            fine: pull(),
        };

        let envelope = EnvelopeParams {
            output_level: pull(),
            l1: pull(),
            l2: pull(),
            l3: pull(),
            l4: pull(),
            r1: pull(),
            r2: pull(),
            r3: pull(),
            r4: pull(),
            rate_scaling: pull(),
        };

        let velocity_sensitivity = pull();
        let amp_mod_sens = pull();

        let key_scale = KeyScaleParams {
            breakpoint: pull(),
            left_depth: pull(),
            right_depth: pull(),
            left_curve: pull(),
            right_curve: pull(),
        };

        voice.operators[op] = OperatorParams {
            enabled,
            frequency,
            envelope,
            velocity_sensitivity,
            amp_mod_sens,
            key_scale,
            osc_key_sync: pull() != 0,
            waveform: pull(),
        };
    }

    voice.algorithm = pull();
    voice.feedback = pull();
    voice.transpose = pull();

    let lfo = LfoParams {
        waveform: pull(),
        speed: pull(),
        delay: pull(),
        pitch_mod_depth: pull(),
        amp_mod_depth: pull(),
        pitch_mod_sens: pull(),
        key_sync: pull() != 0,
    };

    let pitch_envelope = PitchEnvelopeParams {
        l1: pull(),
        l2: pull(),
        l3: pull(),
        l4: pull(),
        r1: pull(),
        r2: pull(),
        r3: pull(),
        r4: pull(),
    };

    let monophonic = pull() != 0;

    Ok(Preset {
        name,
        params: SynthParams {
            voice,
            lfo,
            pitch_envelope,
            monophonic,
        },
    })
}
