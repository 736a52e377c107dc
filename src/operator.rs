//! FM operator: one oscillator and one amplitude envelope, plus the
//! per-note trims (velocity, keyboard level scaling, rate scaling) and
//! the feedback memory.

use crate::dx_units::{
    keyboard_scaling, midi_to_frequency, operator_frequency, rate_scaling, velocity_factor,
    FEEDBACK_TABLE, INV_PARAM_3,
};
use crate::envelope::Envelope;
use crate::oscillator::{Oscillator, Waveform};
use crate::params::OperatorParams;

#[derive(Debug)]
pub struct Operator {
    oscillator: Oscillator,
    envelope: Envelope,

    params: OperatorParams,

    // Recomputed on trigger, constant while the note sounds.
    calculated_frequency: f32,
    velocity_factor: f32,
    level_scaling_factor: f32,
    feedback_level: f32,
    previous_output: f32,

    amp_mod_sens: f32,
    enabled: bool,
    configured: bool,
}

impl Default for Operator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator {
    pub fn new() -> Self {
        Self {
            oscillator: Oscillator::new(),
            envelope: Envelope::new(),
            params: OperatorParams::default(),
            calculated_frequency: 440.0,
            velocity_factor: 1.0,
            level_scaling_factor: 1.0,
            feedback_level: 0.0,
            previous_output: 0.0,
            amp_mod_sens: 0.0,
            enabled: false,
            configured: false,
        }
    }

    pub fn set_config(&mut self, params: &OperatorParams) {
        self.envelope.set_config(&params.envelope);
        self.adopt(params);
    }

    /// Apply edited parameters without restarting the envelope.
    pub fn update_config(&mut self, params: &OperatorParams) {
        self.envelope.update(&params.envelope);
        self.adopt(params);
    }

    fn adopt(&mut self, params: &OperatorParams) {
        self.params = params.clone();
        self.enabled = params.enabled;
        self.amp_mod_sens = u8::min(params.amp_mod_sens, 3) as f32 * INV_PARAM_3;
        self.oscillator
            .set_waveform(Waveform::from(self.params.waveform));
        self.configured = true;
    }

    pub fn set_feedback(&mut self, feedback: u8) {
        self.feedback_level = FEEDBACK_TABLE[usize::min(feedback as usize, 7)];
    }

    pub fn set_osc_key_sync(&mut self, sync: bool) {
        self.params.osc_key_sync = sync;
    }

    /// Start a note: recompute the frequency, velocity and scaling
    /// factors, optionally restart the phase, and fire the envelope.
    pub fn trigger(&mut self, midi_note: u8, velocity: u8) {
        if !self.configured {
            return;
        }

        let base_frequency = midi_to_frequency(midi_note);
        self.calculated_frequency = operator_frequency(&self.params.frequency, base_frequency);
        self.oscillator.set_frequency(self.calculated_frequency);

        self.velocity_factor = velocity_factor(velocity, self.params.velocity_sensitivity);
        self.level_scaling_factor = keyboard_scaling(
            midi_note,
            self.params.envelope.output_level,
            &self.params.key_scale,
        );

        if self.params.osc_key_sync {
            self.oscillator.reset();
        }

        self.envelope
            .set_rate_scaling(rate_scaling(midi_note, self.params.envelope.rate_scaling));
        self.envelope.trigger();
        self.previous_output = 0.0;
    }

    pub fn release(&mut self) {
        self.envelope.release();
    }

    pub fn reset(&mut self) {
        self.oscillator.reset();
        self.envelope.reset();
        self.previous_output = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.envelope.is_active()
    }

    pub fn frequency(&self) -> f32 {
        self.calculated_frequency
    }

    /// One sample with external phase modulation.
    #[inline]
    pub fn process(&mut self, phase_mod: f32, pitch_mod: f32, amp_mod: f32) -> f32 {
        if !self.enabled {
            return 0.0;
        }

        let envelope_level = self.envelope.process();
        let oscillator_value = self.oscillator.process(phase_mod, pitch_mod);
        let amp_mod_factor = amp_mod * self.amp_mod_sens;

        oscillator_value
            * envelope_level
            * self.velocity_factor
            * self.level_scaling_factor
            * (1.0 - amp_mod_factor)
    }

    /// One sample with self phase modulation from the previous output.
    /// The stored feedback sample is taken before amplitude modulation.
    #[inline]
    pub fn process_feedback(&mut self, pitch_mod: f32, amp_mod: f32) -> f32 {
        if !self.enabled {
            return 0.0;
        }

        let envelope_level = self.envelope.process();

        let phase_mod = self.feedback_level * self.previous_output;
        let oscillator_value = self.oscillator.process(phase_mod, pitch_mod);
        let gained_output = oscillator_value
            * envelope_level
            * self.velocity_factor
            * self.level_scaling_factor;

        self.previous_output = gained_output;
        let amp_mod_factor = amp_mod * self.amp_mod_sens;

        gained_output * (1.0 - amp_mod_factor)
    }
}
