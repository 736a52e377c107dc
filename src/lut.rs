//! Sine and exp2 lookup tables with linear interpolation, plus the
//! closed-form waveforms.
//!
//! [`init`] must be called once at process start, before the first audio
//! callback. Until then `sin` returns 0.0 and `exp2` returns 1.0, the
//! silent defaults of an unconfigured engine. After initialisation every
//! lookup is reentrant and allocation-free.

#[allow(unused_imports)]
use num_traits::float::Float;

use spin::Once;

pub const OSC_LUT_SIZE: usize = 4096;
const OSC_LUT_SIZE_F: f32 = OSC_LUT_SIZE as f32;
const INV_OSC_LUT_SIZE: f32 = 1.0 / OSC_LUT_SIZE_F;

pub const EXP2_LUT_SIZE: usize = 4096;
const EXP2_LUT_SIZE_F: f32 = EXP2_LUT_SIZE as f32;
const INV_EXP2_LUT_SIZE: f32 = 1.0 / EXP2_LUT_SIZE_F;
pub const EXP2_LUT_MIN: f32 = -20.0;
pub const EXP2_LUT_MAX: f32 = 10.0;
const EXP2_LUT_RANGE: f32 = EXP2_LUT_MAX - EXP2_LUT_MIN;
const EXP2_LUT_RANGE_INV: f32 = 1.0 / EXP2_LUT_RANGE;

struct Tables {
    sin: [f32; OSC_LUT_SIZE],
    exp2: [f32; EXP2_LUT_SIZE],
}

static TABLES: Once<Tables> = Once::new();

/// Populate the tables. Idempotent; must run before the hot path.
pub fn init() {
    TABLES.call_once(|| {
        let mut tables = Tables {
            sin: [0.0; OSC_LUT_SIZE],
            exp2: [0.0; EXP2_LUT_SIZE],
        };

        for (i, entry) in tables.sin.iter_mut().enumerate() {
            *entry = (core::f32::consts::TAU * i as f32 * INV_OSC_LUT_SIZE).sin();
        }

        for (i, entry) in tables.exp2.iter_mut().enumerate() {
            *entry = (EXP2_LUT_MIN + i as f32 * INV_EXP2_LUT_SIZE * EXP2_LUT_RANGE).exp2();
        }

        tables
    });
}

/// Interpolated sine of `phase` periods. The caller keeps `phase` near
/// [-1, 2); a single conditional wrap brings it into [0, 1).
#[inline]
pub fn sin(mut phase: f32) -> f32 {
    let Some(tables) = TABLES.get() else {
        return 0.0;
    };

    if phase < 0.0 {
        phase += 1.0;
    } else if phase >= 1.0 {
        phase -= 1.0;
    }

    let index = phase * OSC_LUT_SIZE_F;
    let i0 = (index as usize) & (OSC_LUT_SIZE - 1);
    let frac = index - (index as usize) as f32;
    let i1 = (i0 + 1) & (OSC_LUT_SIZE - 1);

    tables.sin[i0] + frac * (tables.sin[i1] - tables.sin[i0])
}

/// Interpolated 2^x over [-20, 10). Out-of-range inputs are clamped.
#[inline]
pub fn exp2(mut x: f32) -> f32 {
    // Fast path for the common case.
    if x == 0.0 {
        return 1.0;
    }

    let Some(tables) = TABLES.get() else {
        return 1.0;
    };

    if x < EXP2_LUT_MIN {
        x = EXP2_LUT_MIN;
    } else if x >= EXP2_LUT_MAX {
        x = EXP2_LUT_MAX - 0.001;
    }

    let normalized = (x - EXP2_LUT_MIN) * EXP2_LUT_RANGE_INV;
    let index = normalized * (EXP2_LUT_SIZE_F - 1.0);
    let i0 = index as usize;
    let frac = index - i0 as f32;

    tables.exp2[i0] + frac * (tables.exp2[i0 + 1] - tables.exp2[i0])
}

/// Triangle wave, expects `phase` in [0, 1).
#[inline]
pub fn triangle(phase: f32) -> f32 {
    1.0 - 2.0 * f32::abs(2.0 * phase - 1.0)
}

/// Descending sawtooth, expects `phase` in [0, 1).
#[inline]
pub fn saw(phase: f32) -> f32 {
    1.0 - 2.0 * phase
}

/// Square wave, expects `phase` in [0, 1).
#[inline]
pub fn square(phase: f32) -> f32 {
    if phase < 0.5 {
        1.0
    } else {
        -1.0
    }
}
