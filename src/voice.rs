//! One polyphonic voice: six operators, one routing algorithm, one
//! pitch envelope, one sounding note.

use crate::algorithm::{Algorithm, AlgorithmSpec, CATALOG};
use crate::envelope::PitchEnvelope;
use crate::operator::Operator;
use crate::params::{PitchEnvelopeParams, VoiceParams};
use crate::{NUM_ALGORITHMS, NUM_OPERATORS};

fn catalog_entry(index: u8) -> &'static AlgorithmSpec {
    let mut index = index as usize;
    if index >= NUM_ALGORITHMS {
        log::warn!("algorithm index {index} out of range, using 0");
        index = 0;
    }
    &CATALOG[index]
}

#[derive(Debug, Default)]
pub struct Voice {
    operators: [Operator; NUM_OPERATORS],
    algorithm: Algorithm,
    pitch_envelope: PitchEnvelope,

    feedback: u8,
    transpose: u8,
    current_midi_note: u8,
    configured: bool,
}

impl Voice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialise a parameter set and return the voice to idle.
    pub fn configure(&mut self, params: &VoiceParams) {
        self.algorithm.clear();

        for (operator, config) in self.operators.iter_mut().zip(params.operators.iter()) {
            operator.set_config(config);
        }

        self.algorithm.set_spec(catalog_entry(params.algorithm));
        self.feedback = params.feedback;
        self.transpose = params.transpose;
        self.apply_feedback();

        self.configured = true;
        self.reset();
    }

    /// Apply edited parameters without silencing a sounding note.
    pub fn update_config(&mut self, params: &VoiceParams) {
        for (operator, config) in self.operators.iter_mut().zip(params.operators.iter()) {
            operator.update_config(config);
        }

        self.algorithm.set_spec(catalog_entry(params.algorithm));
        self.feedback = params.feedback;
        self.transpose = params.transpose;
        self.apply_feedback();

        self.configured = true;
    }

    pub fn set_pitch_envelope(&mut self, params: &PitchEnvelopeParams) {
        self.pitch_envelope.set_config(params);
    }

    /// Switch the routing graph. Feedback is not re-applied here: the
    /// amount configured earlier stays on the operator that received
    /// it, until the next configure or SetFeedback event.
    pub fn set_algorithm(&mut self, index: u8) {
        self.algorithm.set_spec(catalog_entry(index));
    }

    pub fn set_feedback(&mut self, feedback: u8) {
        self.feedback = feedback;
        self.apply_feedback();
    }

    pub fn set_osc_key_sync(&mut self, sync: bool) {
        for operator in self.operators.iter_mut() {
            operator.set_osc_key_sync(sync);
        }
    }

    fn apply_feedback(&mut self) {
        if let Some(spec) = self.algorithm.spec() {
            if let Some(op) = spec.feedback_operator() {
                self.operators[op].set_feedback(self.feedback);
            }
        }
    }

    pub fn note_on(&mut self, midi_note: u8, velocity: u8) {
        if !self.configured {
            return;
        }

        self.current_midi_note = midi_note;

        let note = (i32::from(midi_note) + i32::from(self.transpose) - 24).clamp(0, 127) as u8;

        for operator in self.operators.iter_mut() {
            operator.trigger(note, velocity);
        }

        self.pitch_envelope.trigger();
    }

    pub fn note_off(&mut self) {
        for operator in self.operators.iter_mut() {
            operator.release();
        }
        self.pitch_envelope.release();
    }

    /// One output sample. The LFO factors come from the synthesizer's
    /// global LFO; the pitch envelope multiplies into the pitch factor.
    #[inline]
    pub fn process(&mut self, lfo_pitch_mod: f32, lfo_amp_mod: f32) -> f32 {
        let pitch_mod = self.pitch_envelope.process() * lfo_pitch_mod;
        self.algorithm
            .process(&mut self.operators, pitch_mod, lfo_amp_mod)
    }

    pub fn reset(&mut self) {
        self.algorithm.clear();
        for operator in self.operators.iter_mut() {
            operator.reset();
        }
        self.pitch_envelope.reset();
    }

    pub fn current_midi_note(&self) -> u8 {
        self.current_midi_note
    }

    /// A voice sounds while any of its operator envelopes is active.
    pub fn is_active(&self) -> bool {
        self.operators.iter().any(Operator::is_active)
    }
}
