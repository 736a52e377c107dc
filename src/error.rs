//! Error type for the configuration and file-decoding paths.
//!
//! The per-sample DSP path has no error channel: unconfigured components
//! contribute silence and out-of-range parameters are clamped at the
//! point of use.

use core::fmt;

/// Errors reported by the bank and preset decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The SysEx buffer ends before the last of the 32 packed voices.
    BankTooShort { expected: usize, actual: usize },
    /// No bank has been loaded yet.
    BankNotLoaded,
    /// Preset index outside 0..32.
    InvalidPresetIndex(u8),
    /// A preset file does not start with the `AS7\0` magic.
    BadMagic(u32),
    /// A preset file carries an unsupported format version.
    BadVersion(u8),
    /// A preset file ends before the payload is complete.
    TruncatedPreset { expected: usize, actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BankTooShort { expected, actual } => {
                write!(f, "bank of {actual} bytes is too short ({expected} required)")
            }
            Self::BankNotLoaded => write!(f, "no voice bank loaded"),
            Self::InvalidPresetIndex(index) => {
                write!(f, "preset index {index} out of range (0-31)")
            }
            Self::BadMagic(magic) => write!(f, "bad preset magic {magic:#010x}"),
            Self::BadVersion(version) => write!(f, "unsupported preset version {version}"),
            Self::TruncatedPreset { expected, actual } => {
                write!(f, "preset of {actual} bytes is truncated ({expected} required)")
            }
        }
    }
}

impl core::error::Error for Error {}
