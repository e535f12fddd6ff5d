//! Error types for the enigma library.

use std::fmt;

/// Errors produced by the enigma library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnigmaError {
    /// No wheel with the requested id exists in the catalog.
    UnknownWheel(String),
    /// No reflector with the requested id exists in the catalog.
    UnknownReflector(String),
    /// A configuration field was modified while the machine is locked.
    ConfigurationLocked,
    /// A daily-key entry contains pair text that is not a run of two-letter groups.
    MalformedPreset(String),
    /// A pair, plug or rotor slot index is outside the valid range.
    IndexOutOfRange,
}

impl fmt::Display for EnigmaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnigmaError::UnknownWheel(id) => {
                write!(f, "No wheel named '{}' in the catalog", id)
            }
            EnigmaError::UnknownReflector(id) => {
                write!(f, "No reflector named '{}' in the catalog", id)
            }
            EnigmaError::ConfigurationLocked => {
                write!(f, "Configuration cannot change while translation is active")
            }
            EnigmaError::MalformedPreset(text) => {
                write!(f, "Daily key pair text '{}' is not two-letter groups", text)
            }
            EnigmaError::IndexOutOfRange => {
                write!(f, "Slot index is outside the valid range")
            }
        }
    }
}

impl std::error::Error for EnigmaError {}
