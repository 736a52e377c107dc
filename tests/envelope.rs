//! Tests for the amplitude and pitch envelopes.

use as7_dsp::envelope::{Envelope, PitchEnvelope};
use as7_dsp::lut;
use as7_dsp::params::{EnvelopeParams, PitchEnvelopeParams};

fn fast_full_envelope() -> EnvelopeParams {
    EnvelopeParams {
        output_level: 99,
        l1: 99,
        l2: 99,
        l3: 99,
        l4: 0,
        r1: 99,
        r2: 99,
        r3: 99,
        r4: 99,
        rate_scaling: 0,
    }
}

#[test]
fn unconfigured_envelope_is_silent_and_inactive() {
    lut::init();

    let mut env = Envelope::new();

    assert!(!env.is_active());
    for _ in 0..100 {
        assert_eq!(env.process(), 0.0);
    }
}

#[test]
fn output_is_non_negative_and_bounded() {
    lut::init();

    let mut env = Envelope::new();
    env.set_config(&fast_full_envelope());

    env.trigger();
    for _ in 0..44100 {
        let gain = env.process();
        assert!(gain.is_finite());
        assert!(gain >= 0.0);
        assert!(gain <= 2.0);
    }

    env.release();
    for _ in 0..44100 {
        let gain = env.process();
        assert!(gain >= 0.0);
        assert!(gain <= 2.0);
    }
}

#[test]
fn release_terminates_at_idle() {
    lut::init();

    let mut env = Envelope::new();
    env.set_config(&fast_full_envelope());

    env.trigger();
    for _ in 0..44100 {
        env.process();
    }

    env.release();
    for _ in 0..44100 {
        env.process();
    }

    // L4 is zero: idle and inactive, holding a constant floor value.
    assert_eq!(env.stage(), 4);
    assert!(!env.is_active());

    let held = env.process();
    for _ in 0..1000 {
        assert_eq!(env.process(), held);
    }
}

#[test]
fn nonzero_final_level_keeps_the_envelope_active() {
    lut::init();

    let mut env = Envelope::new();
    let mut params = fast_full_envelope();
    params.l4 = 50;
    env.set_config(&params);

    env.trigger();
    env.release();
    for _ in 0..88200 {
        env.process();
    }

    assert_eq!(env.stage(), 4);
    assert!(env.is_active());
    assert!(env.process() > 0.0);
}

#[test]
fn attack_rises_monotonically() {
    lut::init();

    let mut env = Envelope::new();
    let mut params = fast_full_envelope();
    params.r1 = 60;
    env.set_config(&params);

    env.trigger();

    let mut previous = 0.0;
    while env.stage() == 0 {
        let gain = env.process();
        assert!(gain >= previous);
        previous = gain;
    }
}

#[test]
fn equal_levels_pause_for_the_static_duration() {
    lut::init();

    let mut env = Envelope::new();
    let mut params = fast_full_envelope();
    params.r2 = 50;
    env.set_config(&params);

    env.trigger();

    let mut guard = 0;
    while env.stage() == 0 {
        env.process();
        guard += 1;
        assert!(guard < 10000, "attack did not finish");
    }
    assert_eq!(env.stage(), 1);

    // L1 == L2 with rate 50 pauses for the tabulated 6615 samples.
    let mut pause = 0;
    while env.stage() == 1 {
        env.process();
        pause += 1;
        assert!(pause < 100000, "static pause did not end");
    }
    assert_eq!(pause, 6615);
}

#[test]
fn zero_attack_level_divides_the_pause() {
    lut::init();

    let mut env = Envelope::new();
    let params = EnvelopeParams {
        output_level: 99,
        l1: 0,
        l2: 99,
        l3: 99,
        l4: 0,
        r1: 60,
        r2: 99,
        r3: 99,
        r4: 99,
        rate_scaling: 0,
    };
    env.set_config(&params);

    env.trigger();

    // Rate 60 maps to a 2249-sample pause, divided by 20 for the silent
    // attack stage.
    let mut pause = 0;
    while env.stage() == 0 {
        env.process();
        pause += 1;
        assert!(pause < 100000, "attack pause did not end");
    }
    assert_eq!(pause, 2249 / 20);
}

#[test]
fn neutral_pitch_envelope_is_unity() {
    lut::init();

    let mut env = PitchEnvelope::new();
    env.set_config(&PitchEnvelopeParams::default());

    env.trigger();
    for _ in 0..10000 {
        assert_eq!(env.process(), 1.0);
    }

    env.release();
    for _ in 0..10000 {
        assert_eq!(env.process(), 1.0);
    }
}

#[test]
fn unconfigured_pitch_envelope_is_unity() {
    let mut env = PitchEnvelope::new();

    for _ in 0..100 {
        assert_eq!(env.process(), 1.0);
    }
}

#[test]
fn pitch_envelope_sweeps_up_and_returns() {
    lut::init();

    let mut env = PitchEnvelope::new();
    let params = PitchEnvelopeParams {
        l1: 99,
        l2: 99,
        l3: 99,
        l4: 50,
        r1: 99,
        r2: 99,
        r3: 99,
        r4: 99,
    };
    env.set_config(&params);

    // Before the first trigger the envelope idles at L4 (unity).
    assert_eq!(env.process(), 1.0);

    env.trigger();
    let mut peak: f32 = 0.0;
    for _ in 0..44100 {
        peak = peak.max(env.process());
    }

    // Level 99 maps close to a four-octave raise.
    assert!(peak > 15.0);
    assert!(peak < 16.5);

    env.release();
    for _ in 0..88200 {
        env.process();
    }
    let settled = env.process();
    assert!((settled - 1.0).abs() < 1e-3);
}
