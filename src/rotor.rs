//! Rotor: a wheel wiring with ring setting and rotation.
//!
//! A Rotor composes a [`Mapper`] with the ring setting fixed at lock-in
//! and the offset advanced every keystroke by the stepping mechanism.
//! The ring setting rotates the wiring relative to the letter ring, so
//! changing it rebuilds the directional maps; the offset is applied
//! arithmetically on every translation instead.

use crate::alphabet::ALPHABET_SIZE;
use crate::catalog::RotorSpec;
use crate::mapper::{Direction, Mapper};

/// A wheel in a machine slot: wiring, ring setting and current rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    spec: &'static RotorSpec,
    mapper: Mapper,
    right_map: [usize; ALPHABET_SIZE],
    left_map: [usize; ALPHABET_SIZE],
    ring_setting: usize,
    offset: usize,
}

impl Rotor {
    /// Creates a Rotor for the given catalog entry.
    ///
    /// # Parameters
    /// - `spec`: Wiring definition from the catalog.
    /// - `ring_setting`: Ring setting index in `[0, 26)`.
    pub fn new(spec: &'static RotorSpec, ring_setting: usize) -> Self {
        let mut rotor = Rotor {
            spec,
            mapper: Mapper::from_cipher(spec.id, spec.cipher),
            right_map: [0; ALPHABET_SIZE],
            left_map: [0; ALPHABET_SIZE],
            ring_setting: 0,
            offset: 0,
        };

        rotor.set_ring_setting(ring_setting);
        rotor
    }

    /// Returns the wheel id, e.g. `"III"`.
    pub fn id(&self) -> &str {
        self.mapper.id()
    }

    /// Returns the catalog entry this Rotor was built from.
    pub fn spec(&self) -> &'static RotorSpec {
        self.spec
    }

    /// Returns the current ring setting.
    pub fn ring_setting(&self) -> usize {
        self.ring_setting
    }

    /// Returns the current rotation.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Sets the current rotation. Called once per keystroke by the
    /// stepping mechanism; O(1).
    pub fn set_offset(&mut self, value: usize) {
        self.offset = value % ALPHABET_SIZE;
    }

    /// Sets the ring setting and rebuilds the directional maps. Called at
    /// lock-in, not per keystroke.
    ///
    /// The ring rotates the wiring against the letter ring: entry `i` of
    /// the wiring serves position `(i + ring) % 26` and its image shifts
    /// by the same amount. The left map is the derived inverse.
    pub fn set_ring_setting(&mut self, index: usize) {
        let index = index % ALPHABET_SIZE;
        self.ring_setting = index;

        let map = self.mapper.map();
        for i in 0..ALPHABET_SIZE {
            self.right_map[(i + index) % ALPHABET_SIZE] = (map[i] + index) % ALPHABET_SIZE;
        }
        for i in 0..ALPHABET_SIZE {
            self.left_map[self.right_map[i]] = i;
        }
    }

    /// Translates an index through the rotated wiring.
    ///
    /// The index is shifted into the rotor's rotated frame, substituted
    /// through the ring-adjusted map for the given direction, then
    /// shifted back.
    ///
    /// # Parameters
    /// - `direction`: Which pass of the signal path is being taken.
    /// - `index`: Letter index in `[0, 26)`.
    pub fn swap(&self, direction: Direction, index: usize) -> usize {
        let shift = (index + self.offset) % ALPHABET_SIZE;

        let mapped = match direction {
            Direction::RightToLeft => self.right_map[shift],
            Direction::LeftToRight => self.left_map[shift],
        };

        (mapped + ALPHABET_SIZE - self.offset) % ALPHABET_SIZE
    }

    /// Returns true if `index` is a notch point of this wheel.
    pub fn is_notch_point(&self, index: usize) -> bool {
        self.spec.is_notch_point(index)
    }

    /// Returns true if `index` is a turnover point of this wheel.
    pub fn is_turnover_point(&self, index: usize) -> bool {
        self.spec.is_turnover_point(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_wheel;

    #[test]
    fn test_maps_are_mutual_inverses_for_every_ring() {
        let spec = find_wheel("I").unwrap();
        let mut rotor = Rotor::new(spec, 0);

        for ring in 0..ALPHABET_SIZE {
            rotor.set_ring_setting(ring);
            for i in 0..ALPHABET_SIZE {
                let out = rotor.swap(Direction::RightToLeft, i);
                assert_eq!(
                    rotor.swap(Direction::LeftToRight, out),
                    i,
                    "ring {} index {}",
                    ring,
                    i
                );
            }
        }
    }

    #[test]
    fn test_ring_a_matches_plain_wiring() {
        let rotor = Rotor::new(find_wheel("I").unwrap(), 0);
        // Wheel I at ring A, offset A: A -> E.
        assert_eq!(rotor.swap(Direction::RightToLeft, 0), 4);
    }

    #[test]
    fn test_ring_b_shifts_wiring() {
        // Wheel I with ring setting B encodes A as K at position A.
        let rotor = Rotor::new(find_wheel("I").unwrap(), 1);
        assert_eq!(rotor.swap(Direction::RightToLeft, 0), 10);
    }

    #[test]
    fn test_offset_advances_the_frame() {
        let mut rotor = Rotor::new(find_wheel("I").unwrap(), 0);
        rotor.set_offset(1);
        // At offset B the signal enters one position further round:
        // A enters at B, maps to K, and shifts back to J.
        assert_eq!(rotor.swap(Direction::RightToLeft, 0), 9);
    }

    #[test]
    fn test_offset_wraps() {
        let mut rotor = Rotor::new(find_wheel("I").unwrap(), 0);
        rotor.set_offset(ALPHABET_SIZE + 3);
        assert_eq!(rotor.offset(), 3);
    }

    #[test]
    fn test_notch_and_turnover_delegate_to_spec() {
        let rotor = Rotor::new(find_wheel("III").unwrap(), 0);
        assert!(rotor.is_turnover_point(22)); // W
        assert!(rotor.is_notch_point(21)); // V
        assert!(!rotor.is_turnover_point(0));
    }

    #[test]
    fn test_ring_setting_does_not_move_notch() {
        // Notch and turnover live on the letter ring, not the wiring.
        let mut rotor = Rotor::new(find_wheel("III").unwrap(), 0);
        rotor.set_ring_setting(5);
        assert!(rotor.is_turnover_point(22));
    }
}
