//! Tests for the algorithm catalogue and the modulation routing,
//! including frequency and spectral checks on the rendered output.

use as7_dsp::algorithm::CATALOG;
use as7_dsp::params::SynthParams;
use as7_dsp::synth::Synth;
use as7_dsp::{lut, NUM_OPERATORS, SAMPLE_RATE};

/// A sustained patch with a single enabled operator at ratio `coarse`.
fn single_operator_params(enabled_op: usize, coarse: u8, detune: u8) -> SynthParams {
    let mut params = SynthParams::default();
    params.voice.algorithm = 31;

    for (i, op) in params.voice.operators.iter_mut().enumerate() {
        op.enabled = i == enabled_op;
        op.frequency.coarse = coarse;
        op.frequency.detune = detune;
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

fn render(synth: &mut Synth, samples: usize) -> Vec<f32> {
    (0..samples).map(|_| synth.process()).collect()
}

/// Frequency estimate from interpolated upward zero crossings.
fn estimate_frequency(signal: &[f32]) -> f32 {
    let mut first = None;
    let mut last = None;
    let mut cycles = 0;

    for i in 1..signal.len() {
        if signal[i - 1] < 0.0 && signal[i] >= 0.0 {
            let frac = -signal[i - 1] / (signal[i] - signal[i - 1]);
            let position = (i - 1) as f32 + frac;
            if first.is_none() {
                first = Some(position);
            } else {
                cycles += 1;
            }
            last = Some(position);
        }
    }

    let (first, last) = (first.unwrap(), last.unwrap());
    cycles as f32 / (last - first) * SAMPLE_RATE
}

/// Amplitude-fitted energy ratio of everything that is not the
/// fundamental.
fn residual_ratio(signal: &[f32], fundamental: f32) -> f32 {
    let n = signal.len() as f32;
    let omega = core::f32::consts::TAU * fundamental / SAMPLE_RATE;

    let mut cos_sum = 0.0;
    let mut sin_sum = 0.0;
    for (i, sample) in signal.iter().enumerate() {
        cos_sum += sample * (omega * i as f32).cos();
        sin_sum += sample * (omega * i as f32).sin();
    }
    let a = 2.0 * cos_sum / n;
    let b = 2.0 * sin_sum / n;

    let mut residual_energy = 0.0;
    let mut total_energy = 0.0;
    for (i, sample) in signal.iter().enumerate() {
        let fitted = a * (omega * i as f32).cos() + b * (omega * i as f32).sin();
        residual_energy += (sample - fitted) * (sample - fitted);
        total_energy += sample * sample;
    }

    residual_energy / total_energy
}

#[test]
fn every_modulator_index_is_greater_than_its_carrier() {
    for (index, spec) in CATALOG.iter().enumerate() {
        for op in 0..NUM_OPERATORS {
            for &modulator in spec.modulators(op) {
                assert!(
                    modulator > op,
                    "algorithm {index}: operator {op} modulated by {modulator}"
                );
            }
        }
    }
}

#[test]
fn every_algorithm_has_a_carrier_and_a_valid_feedback_operator() {
    for (index, spec) in CATALOG.iter().enumerate() {
        let carriers = (0..NUM_OPERATORS).filter(|&op| spec.is_carrier(op)).count();
        assert!(carriers > 0, "algorithm {index} has no carrier");

        if let Some(op) = spec.feedback_operator() {
            assert!(op < NUM_OPERATORS, "algorithm {index} feedback {op}");
        }
    }
}

#[test]
fn connection_matrix_mirrors_the_adjacency() {
    for spec in CATALOG.iter() {
        for carrier in 0..NUM_OPERATORS {
            for modulator in 0..NUM_OPERATORS {
                assert_eq!(
                    spec.modulates(modulator, carrier),
                    spec.modulators(carrier).contains(&modulator)
                );
            }
        }
    }
}

#[test]
fn detune_shifts_the_fundamental() {
    lut::init();

    // Detune 8 is one step sharp: 440 Hz * (1 + 0.078 / 1000).
    let mut synth = Synth::new();
    synth.configure(&single_operator_params(0, 1, 8));

    synth.note_on(69, 100);
    render(&mut synth, 2000);
    let signal = render(&mut synth, SAMPLE_RATE as usize);

    let frequency = estimate_frequency(&signal);
    assert!(
        (frequency - 440.034_32).abs() < 0.01,
        "estimated {frequency} Hz"
    );
}

#[test]
fn centre_detune_is_exact() {
    lut::init();

    let mut synth = Synth::new();
    synth.configure(&single_operator_params(0, 1, 7));

    synth.note_on(69, 100);
    render(&mut synth, 2000);
    let signal = render(&mut synth, SAMPLE_RATE as usize);

    let frequency = estimate_frequency(&signal);
    assert!((frequency - 440.0).abs() < 0.01, "estimated {frequency} Hz");
}

#[test]
fn feedback_zero_is_a_pure_sine() {
    lut::init();

    // Operator 5 carries the feedback path in algorithm 32.
    let mut params = single_operator_params(5, 1, 7);
    params.voice.feedback = 0;

    let mut synth = Synth::new();
    synth.configure(&params);

    synth.note_on(69, 100);
    render(&mut synth, 2000);
    let signal = render(&mut synth, SAMPLE_RATE as usize);

    assert!(residual_ratio(&signal, 440.0) < 1e-4);
}

#[test]
fn full_feedback_produces_broadband_content() {
    lut::init();

    let mut params = single_operator_params(5, 1, 7);
    params.voice.feedback = 7;

    let mut synth = Synth::new();
    synth.configure(&params);

    synth.note_on(69, 100);
    render(&mut synth, 2000);
    let signal = render(&mut synth, SAMPLE_RATE as usize);

    assert!(residual_ratio(&signal, 440.0) > 0.1);
}

#[test]
fn feedback_level_scales_monotonically() {
    lut::init();

    let mut previous = -1.0;
    for feedback in [0, 3, 5, 7] {
        let mut params = single_operator_params(5, 1, 7);
        params.voice.feedback = feedback;

        let mut synth = Synth::new();
        synth.configure(&params);

        synth.note_on(69, 100);
        render(&mut synth, 2000);
        let signal = render(&mut synth, 8192);

        let ratio = residual_ratio(&signal, 440.0);
        assert!(
            ratio > previous,
            "feedback {feedback}: ratio {ratio} not above {previous}"
        );
        previous = ratio;
    }
}

#[test]
fn all_carrier_algorithm_sums_identical_operators() {
    lut::init();

    // Six identical carriers on algorithm 32 against one: the mix is six
    // times the single operator, up to float rounding.
    let mut all = Synth::new();
    let mut params = single_operator_params(0, 1, 7);
    for op in params.voice.operators.iter_mut() {
        op.enabled = true;
    }
    params.voice.feedback = 0;
    all.configure(&params);

    let mut single = Synth::new();
    let mut solo = single_operator_params(0, 1, 7);
    solo.voice.feedback = 0;
    single.configure(&solo);

    all.note_on(69, 100);
    single.note_on(69, 100);

    for _ in 0..44100 {
        let summed = all.process();
        let alone = single.process();
        assert!((summed - 6.0 * alone).abs() < 1e-4 + summed.abs() * 1e-5);
    }
}

#[test]
fn modulated_algorithm_differs_from_additive() {
    lut::init();

    // Algorithm 1 chains OP2 into OP1; the result must not be the plain
    // carrier sine.
    let mut modulated = Synth::new();
    let mut params = single_operator_params(0, 1, 7);
    params.voice.operators[1].enabled = true;
    params.voice.algorithm = 0;
    params.voice.feedback = 0;
    modulated.configure(&params);

    modulated.note_on(69, 100);
    render(&mut modulated, 2000);
    let signal = render(&mut modulated, SAMPLE_RATE as usize);

    assert!(residual_ratio(&signal, 440.0) > 0.05);
}
