#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

pub mod algorithm;
pub mod dx_units;
pub mod envelope;
pub mod error;
pub mod lfo;
pub mod lut;
pub mod operator;
pub mod oscillator;
pub mod params;
pub mod preset;
pub mod synth;
pub mod sysex;
pub mod voice;

/// Sample rate the engine runs at. Every per-sample increment in the
/// crate is derived from this at compile time.
pub const SAMPLE_RATE: f32 = 44100.0;
pub const INV_SAMPLE_RATE: f32 = 1.0 / SAMPLE_RATE;

/// Number of FM operators per voice.
pub const NUM_OPERATORS: usize = 6;

/// Number of routing algorithms in the catalogue.
pub const NUM_ALGORITHMS: usize = 32;

/// Size of the voice pool.
pub const POLYPHONY: usize = 8;

/// Gain applied to summed modulator outputs before they phase-modulate a
/// carrier. A perceptual tuning constant with no hardware reference.
pub const MODULATION_SCALING: f32 = 12.5;

/// Recommended gain for consumers mixing the engine output down to a
/// [-1, 1] stream (eight voices of up to several carriers each).
pub const OPERATOR_SCALING: f32 = 0.125;

/// One in Q24 fixed point, the envelope level format.
pub const Q24_ONE: i32 = 1 << 24;
pub const INV_Q24_ONE: f32 = 1.0 / Q24_ONE as f32;
