//! Polyphonic synthesizer: the eight-voice pool, oldest-voice stealing,
//! the global LFO, and the per-sample mixdown.

use crate::lfo::Lfo;
use crate::params::SynthParams;
use crate::voice::Voice;
use crate::POLYPHONY;

#[derive(Debug, Default)]
pub struct Synth {
    voices: [Voice; POLYPHONY],
    voice_age: [u64; POLYPHONY],
    global_age_counter: u64,
    active_note_count: i32,

    lfo: Lfo,
    monophonic: bool,
    configured: bool,
}

impl Synth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialise a complete parameter set into every voice and the
    /// global LFO.
    pub fn configure(&mut self, params: &SynthParams) {
        self.lfo.configure(&params.lfo);

        for voice in self.voices.iter_mut() {
            voice.configure(&params.voice);
            voice.set_pitch_envelope(&params.pitch_envelope);
        }

        self.monophonic = params.monophonic;
        self.configured = true;
    }

    /// Apply edits without cutting sounding notes.
    pub fn update_config(&mut self, params: &SynthParams) {
        self.lfo.configure(&params.lfo);

        for voice in self.voices.iter_mut() {
            voice.update_config(&params.voice);
            voice.set_pitch_envelope(&params.pitch_envelope);
        }

        self.monophonic = params.monophonic;
        self.configured = true;
    }

    pub fn note_on(&mut self, midi_note: u8, velocity: u8) {
        if !self.configured {
            return;
        }

        if self.monophonic {
            for voice in self.voices.iter_mut() {
                voice.note_off();
            }
            self.lfo.trigger();
            self.voices[0].note_on(midi_note, velocity);
            return;
        }

        // First inactive voice wins.
        for i in 0..POLYPHONY {
            if !self.voices[i].is_active() {
                self.voice_age[i] = self.global_age_counter;
                self.global_age_counter += 1;
                self.voices[i].note_on(midi_note, velocity);
                self.active_note_count += 1;

                if self.active_note_count == 1 || self.lfo.key_sync() {
                    self.lfo.trigger();
                }
                return;
            }
        }

        // Pool exhausted: steal the oldest voice. Its note is released,
        // not cut, so the tail overlaps the new attack.
        let mut oldest_index = 0;
        let mut oldest_age = self.voice_age[0];

        for i in 1..POLYPHONY {
            if self.voice_age[i] < oldest_age {
                oldest_age = self.voice_age[i];
                oldest_index = i;
            }
        }

        self.voices[oldest_index].note_off();
        self.voice_age[oldest_index] = self.global_age_counter;
        self.global_age_counter += 1;
        self.voices[oldest_index].note_on(midi_note, velocity);
    }

    pub fn note_off(&mut self, midi_note: u8) {
        if !self.configured {
            return;
        }

        if self.monophonic {
            self.voices[0].note_off();
            return;
        }

        for voice in self.voices.iter_mut() {
            if voice.is_active() && voice.current_midi_note() == midi_note {
                voice.note_off();
                self.active_note_count -= 1;
                return;
            }
        }
    }

    /// One mono output sample: advance the LFO once, then sum the
    /// active voices.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if !self.configured {
            return 0.0;
        }

        self.lfo.process();
        let pitch_mod = self.lfo.pitch_mod();
        let amp_mod = self.lfo.amp_mod();

        let mut sample = 0.0;
        for voice in self.voices.iter_mut() {
            if voice.is_active() {
                sample += voice.process(pitch_mod, amp_mod);
            }
        }

        sample
    }

    pub fn set_algorithm(&mut self, index: u8) {
        for voice in self.voices.iter_mut() {
            voice.set_algorithm(index);
        }
    }

    pub fn set_feedback(&mut self, feedback: u8) {
        for voice in self.voices.iter_mut() {
            voice.set_feedback(feedback);
        }
    }

    pub fn set_osc_key_sync(&mut self, sync: bool) {
        for voice in self.voices.iter_mut() {
            voice.set_osc_key_sync(sync);
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|voice| voice.is_active()).count()
    }

    pub fn voice_note(&self, index: usize) -> u8 {
        self.voices[index].current_midi_note()
    }

    pub fn voice_is_active(&self, index: usize) -> bool {
        self.voices[index].is_active()
    }
}
