//! Tests for the polyphonic synthesizer: silence, voice allocation,
//! stealing and monophonic behaviour.


use as7_dsp::params::SynthParams;
use as7_dsp::synth::Synth;
use as7_dsp::{lut, OPERATOR_SCALING, SAMPLE_RATE};

/// A patch that holds its level while the key is down: full sustain
/// levels with instant rates, on the all-carrier algorithm.
fn sustain_params() -> SynthParams {
    let mut params = SynthParams::default();
    params.voice.algorithm = 31;

    for op in params.voice.operators.iter_mut() {
        op.frequency.coarse = 1;
        op.envelope.l1 = 99;
        op.envelope.l2 = 99;
        op.envelope.l3 = 99;
        op.envelope.l4 = 0;
        op.envelope.r1 = 99;
        op.envelope.r2 = 99;
        op.envelope.r3 = 99;
        op.envelope.r4 = 99;
    }

    params
}

#[test]
fn unconfigured_synth_is_silent() {
    lut::init();

    let mut synth = Synth::new();

    for _ in 0..1000 {
        assert_eq!(synth.process(), 0.0);
    }
}

#[test]
fn silence_before_first_note() {
    lut::init();

    let mut synth = Synth::new();
    synth.configure(&sustain_params());

    for _ in 0..4410 {
        assert_eq!(synth.process(), 0.0);
    }
}

#[test]
fn release_decays_to_exact_silence() {
    lut::init();

    let mut synth = Synth::new();
    synth.configure(&sustain_params());

    synth.note_on(69, 100);
    for _ in 0..44100 {
        let sample = synth.process();
        assert!(sample.is_finite());
    }

    synth.note_off(69);
    let mut tail = Vec::new();
    for _ in 0..44100 {
        tail.push(synth.process());
    }

    assert_eq!(synth.active_voices(), 0);
    for sample in &tail[44000..] {
        assert_eq!(*sample, 0.0);
    }
}

#[test]
fn output_is_bounded_and_finite() {
    lut::init();

    let mut params = sustain_params();
    params.voice.algorithm = 0;
    params.voice.feedback = 7;
    params.lfo.speed = 40;
    params.lfo.pitch_mod_depth = 30;
    params.lfo.amp_mod_depth = 30;
    params.lfo.pitch_mod_sens = 5;

    let mut synth = Synth::new();
    synth.configure(&params);

    let mut wav_data = Vec::new();

    synth.note_on(57, 110);
    synth.note_on(64, 90);

    for _ in 0..(SAMPLE_RATE as usize) {
        let sample = synth.process();
        assert!(sample.is_finite());
        assert!(sample.abs() < 64.0);
        wav_data.push(sample * OPERATOR_SCALING);
    }

    synth.note_off(57);
    synth.note_off(64);

    for _ in 0..(SAMPLE_RATE as usize) {
        let sample = synth.process();
        assert!(sample.is_finite());
        wav_data.push(sample * OPERATOR_SCALING);
    }

    wav_writer::write("synth/two_notes.wav", &wav_data).ok();
}

#[test]
fn ninth_note_steals_the_oldest_voice() {
    lut::init();

    let mut synth = Synth::new();
    synth.configure(&sustain_params());

    for note in 60..68 {
        synth.note_on(note, 100);
        synth.process();
    }
    assert_eq!(synth.active_voices(), 8);

    synth.note_on(68, 100);

    assert_eq!(synth.active_voices(), 8);
    assert_eq!(synth.voice_note(0), 68);
}

#[test]
fn voice_pool_never_exceeds_polyphony() {
    lut::init();

    let mut synth = Synth::new();
    synth.configure(&sustain_params());

    for note in 40..72 {
        synth.note_on(note, 100);
        synth.process();
        assert!(synth.active_voices() <= 8);
    }

    assert_eq!(synth.active_voices(), 8);
}

#[test]
fn monophonic_mode_retriggers_voice_zero() {
    lut::init();

    let mut params = sustain_params();
    params.monophonic = true;

    let mut synth = Synth::new();
    synth.configure(&params);

    synth.note_on(60, 100);
    for _ in 0..100 {
        synth.process();
    }

    synth.note_on(67, 100);
    for _ in 0..100 {
        synth.process();
    }

    assert_eq!(synth.voice_note(0), 67);
    assert!(synth.voice_is_active(0));
    for voice in 1..8 {
        assert!(!synth.voice_is_active(voice));
    }

    synth.note_off(67);
    for _ in 0..44100 {
        synth.process();
    }
    assert_eq!(synth.active_voices(), 0);
}

#[test]
fn note_off_releases_only_the_matching_voice() {
    lut::init();

    let mut synth = Synth::new();
    synth.configure(&sustain_params());

    synth.note_on(60, 100);
    synth.note_on(64, 100);
    synth.note_on(67, 100);
    assert_eq!(synth.active_voices(), 3);

    synth.note_off(64);
    for _ in 0..44100 {
        synth.process();
    }

    assert_eq!(synth.active_voices(), 2);
    assert!(synth.voice_is_active(0));
    assert!(!synth.voice_is_active(1));
    assert!(synth.voice_is_active(2));
}
