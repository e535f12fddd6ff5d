//! Historically accurate Enigma machine cipher engine.
//!
//! Models the electromechanical cipher machines of the Wehrmacht and
//! Kriegsmarine, plus the commercial, German Railway (Rocket) and
//! Swiss-K variants: rotor wiring with ring settings, the lever stepping
//! mechanism with its double-step anomaly, fixed and reconfigurable
//! reflectors, and the plugboard. Each keypress produces exactly one
//! letter-to-letter substitution, and the machine is self-reciprocal:
//! the same settings that encipher a message decipher it.
//!
//! # Architecture
//!
//! ```text
//! Mapper      (atomic unit — one 26-letter substitution + inverse)
//!     ↑ composed by
//! Rotor       (Mapper + ring setting + rotation, notch and turnover)
//!     ↑ four slots, advanced by the stepping mechanism
//! Machine     (orchestrator — PairSets + catalog wheels + pipeline:
//!              plugboard → wheels → reflector → wheels → plugboard)
//! ```
//!
//! # Examples
//!
//! Encipher and decipher with the same settings:
//!
//! ```
//! use enigma::{Machine, LEFT, MIDDLE, RIGHT};
//!
//! let mut sender = Machine::new();
//! sender.set_wheel_choice(LEFT, "I").unwrap();
//! sender.set_wheel_choice(MIDDLE, "II").unwrap();
//! sender.set_wheel_choice(RIGHT, "III").unwrap();
//! let mut receiver = sender.clone();
//!
//! assert!(sender.set_encipher(true));
//! assert!(receiver.set_encipher(true));
//!
//! let mut ciphertext = String::new();
//! for key in "WETTERBERICHT".chars() {
//!     ciphertext.push(sender.key_down(key).unwrap());
//!     sender.key_up(key);
//! }
//! assert_ne!(ciphertext, "WETTERBERICHT");
//!
//! let mut plaintext = String::new();
//! for key in ciphertext.chars() {
//!     plaintext.push(receiver.key_down(key).unwrap());
//!     receiver.key_up(key);
//! }
//! assert_eq!(plaintext, "WETTERBERICHT");
//! ```
//!
//! Configure a plugboard and inspect validity before locking:
//!
//! ```
//! use enigma::Machine;
//!
//! let mut machine = Machine::new();
//! machine.set_plug_text(0, "AQ").unwrap();
//! machine.set_plug_text(1, "QZ").unwrap();
//! assert!(!machine.is_plugboard_valid()); // Q used twice
//! assert!(!machine.set_encipher(true));
//!
//! machine.set_plug_text(1, "BZ").unwrap();
//! assert!(machine.set_encipher(true));
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod catalog;
pub mod error;
pub mod machine;
pub mod mapper;
pub mod pairs;
pub mod rotor;

pub use error::EnigmaError;
pub use machine::{
    DailyKey, Machine, Settings, FULL_COUNT, LEFT, MIDDLE, PAIR_COUNT, PLUG_COUNT, RIGHT,
    ROTOR_COUNT, SLOW,
};
pub use mapper::{Direction, Mapper};
pub use pairs::{Pair, PairSet};
pub use rotor::Rotor;
