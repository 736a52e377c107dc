//! Offline renderer: load a DX7 bank, play a short phrase, write a WAV
//! file.
//!
//! ```text
//! cargo run --example render_wav -- [bank.syx [preset]]
//! ```
//!
//! Without arguments the default patch is rendered.

use std::fs;
use std::fs::File;
use std::time::Instant;

use simple_logger::SimpleLogger;

use as7_dsp::params::SynthParams;
use as7_dsp::synth::Synth;
use as7_dsp::sysex::Bank;
use as7_dsp::{lut, OPERATOR_SCALING, SAMPLE_RATE};

const FILE_NAME: &str = "fm_synth.wav";
const NOTE_DURATION: f32 = 8.0;
const TOTAL_DURATION: f32 = 10.0;

fn main() -> std::io::Result<()> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .unwrap();

    lut::init();

    let mut args = std::env::args().skip(1);
    let bank_path = args.next();
    let preset: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);

    let params = match bank_path {
        Some(path) => {
            let data = fs::read(&path)?;
            let mut bank = Bank::new();
            bank.load(&data).expect("failed to decode bank");

            let name = bank.voice_name(preset).unwrap_or(b"?");
            log::info!(
                "loaded preset {}: {}",
                preset,
                String::from_utf8_lossy(name).trim_end()
            );

            bank.synth_params(preset).expect("failed to decode preset")
        }
        None => SynthParams::default(),
    };

    let mut synth = Synth::new();
    synth.configure(&params);

    let total_samples = (SAMPLE_RATE * TOTAL_DURATION) as usize;
    let note_off_at = (SAMPLE_RATE * NOTE_DURATION) as usize;
    let mut samples = Vec::with_capacity(total_samples);

    let start = Instant::now();

    synth.note_on(69, 100);

    for i in 0..total_samples {
        if i == (SAMPLE_RATE * 1.0) as usize {
            synth.note_on(72, 100);
        }
        if i == (SAMPLE_RATE * 2.0) as usize {
            synth.note_on(76, 100);
        }
        if i == note_off_at {
            synth.note_off(69);
            synth.note_off(72);
            synth.note_off(76);
        }

        samples.push(synth.process() * OPERATOR_SCALING);
    }

    let elapsed = start.elapsed().as_secs_f32();

    let header = wav::Header::new(wav::WAV_FORMAT_IEEE_FLOAT, 1, SAMPLE_RATE as u32, 32);
    let mut file = File::create(FILE_NAME)?;
    wav::write(header, &wav::BitDepth::from(samples.clone()), &mut file)?;

    log::info!("wrote {} ({} samples)", FILE_NAME, samples.len());
    log::info!(
        "rendered {}s of audio in {:.3}s ({:.1}x real time)",
        TOTAL_DURATION,
        elapsed,
        TOTAL_DURATION / elapsed
    );

    Ok(())
}
