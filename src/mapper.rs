//! Mapper: a directional 26-letter substitution.
//!
//! A Mapper captures one fixed wiring. For wheel I of an Enigma I the
//! letter A maps to E on the inbound (right-to-left) pass, while the
//! return (left-to-right) pass uses the derived inverse, so E maps back
//! to A. A wiring whose map is its own inverse with no fixed points is a
//! reflector mapping and `is_reflector()` returns true.

use crate::alphabet::{char_to_index, ALPHABET_SIZE};

/// Signal direction through a mapping.
///
/// `RightToLeft` is the inbound pass from the keyboard towards the
/// reflector, `LeftToRight` the return pass towards the lampboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    RightToLeft,
    LeftToRight,
}

/// A fixed 26-letter substitution with its derived inverse.
///
/// Immutable once constructed. Plugboards and reflectors are plain
/// Mappers; wheels wrap one in a [`Rotor`](crate::rotor::Rotor) that adds
/// ring setting and rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapper {
    id: String,
    map: [usize; ALPHABET_SIZE],
    inverse: [usize; ALPHABET_SIZE],
    reflector: bool,
}

impl Mapper {
    /// Creates a Mapper from an index array.
    ///
    /// # Parameters
    /// - `id`: Name of this mapping, used in trace output.
    /// - `map`: Substitution table; `map[i]` is the right-to-left image of `i`.
    ///
    /// # Panics
    /// Panics if `map` is not a permutation of `0..26`. Wiring tables are
    /// compiled-in or pre-validated, so a violation is a programming error.
    pub fn new(id: &str, map: [usize; ALPHABET_SIZE]) -> Self {
        let mut inverse = [usize::MAX; ALPHABET_SIZE];
        for (i, &c) in map.iter().enumerate() {
            assert!(c < ALPHABET_SIZE, "{}: entry {} out of range", id, c);
            assert!(
                inverse[c] == usize::MAX,
                "{}: wiring is not a permutation, {} repeats",
                id,
                c
            );
            inverse[c] = i;
        }

        let reflector = map
            .iter()
            .enumerate()
            .all(|(i, &c)| c != i && map[c] == i);

        Mapper {
            id: id.to_string(),
            map,
            inverse,
            reflector,
        }
    }

    /// Creates a Mapper from a 26-letter cipher string such as
    /// `"EKMFLGDQVZNTOWYHXUSPAIBRCJ"`.
    ///
    /// # Panics
    /// Panics if the string is not 26 letters or not a permutation.
    pub fn from_cipher(id: &str, cipher: &str) -> Self {
        assert_eq!(
            cipher.chars().count(),
            ALPHABET_SIZE,
            "{}: cipher string must be 26 letters",
            id
        );

        let mut map = [0usize; ALPHABET_SIZE];
        for (i, c) in cipher.chars().enumerate() {
            map[i] = char_to_index(c)
                .unwrap_or_else(|| panic!("{}: '{}' is not a letter", id, c));
        }

        Self::new(id, map)
    }

    /// Returns the name of this mapping.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if this Mapper has the given id.
    pub fn is(&self, target: &str) -> bool {
        self.id == target
    }

    /// Returns the right-to-left substitution table.
    pub fn map(&self) -> &[usize; ALPHABET_SIZE] {
        &self.map
    }

    /// Returns the derived inverse table.
    pub fn inverse(&self) -> &[usize; ALPHABET_SIZE] {
        &self.inverse
    }

    /// Returns true if the mapping is a fixed-point-free involution, the
    /// defining property of a reflector (and of every plugboard map).
    pub fn is_reflector(&self) -> bool {
        self.reflector
    }

    /// Translates an index through the mapping in the given direction.
    ///
    /// # Parameters
    /// - `direction`: Which pass of the signal path is being taken.
    /// - `index`: Letter index in `[0, 26)`, pre-validated by the caller.
    ///
    /// # Returns
    /// The translated index.
    pub fn swap(&self, direction: Direction, index: usize) -> usize {
        match direction {
            Direction::RightToLeft => self.map[index],
            Direction::LeftToRight => self.inverse[index],
        }
    }
}
