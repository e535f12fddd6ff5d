//! Static catalog of historical wheel and reflector wirings.
//!
//! Read-only dataset loaded at startup: wiring cipher strings, turnover
//! letters and provenance for the Enigma I / M3 / M4 wheel sets plus the
//! commercial, German Railway (Rocket) and Swiss-K machines. Whether an
//! entry is a reflector is derived from its wiring (a fixed-point-free
//! involution), not flagged by hand.
//!
//! Note: for the commercial, Rocket and Swiss-K wheels the turnover
//! points are guesses and may be incorrect.

use crate::alphabet::{char_to_index, ALPHABET_SIZE};

/// One catalog entry: a wheel or reflector wiring definition.
///
/// `date` and `group` are historical metadata and take no part in the
/// cipher logic. `turnovers` holds 0, 1 or 2 letters; the naval wheels
/// VI, VII and VIII carry two.
#[derive(Debug, PartialEq, Eq)]
pub struct RotorSpec {
    pub id: &'static str,
    pub cipher: &'static str,
    pub date: &'static str,
    pub group: &'static str,
    pub turnovers: &'static str,
}

impl RotorSpec {
    /// Returns true if `index` is one of this wheel's turnover points,
    /// the position whose reaching during a keystroke advances the
    /// neighbouring wheel.
    pub fn is_turnover_point(&self, index: usize) -> bool {
        self.turnovers
            .chars()
            .any(|c| char_to_index(c) == Some(index))
    }

    /// Returns true if `index` is one of this wheel's notch points.
    /// The turnover point immediately follows the notch point.
    pub fn is_notch_point(&self, index: usize) -> bool {
        self.turnovers
            .chars()
            .filter_map(char_to_index)
            .any(|t| (t + ALPHABET_SIZE - 1) % ALPHABET_SIZE == index)
    }

    /// Returns true if the wiring is a fixed-point-free involution and the
    /// entry therefore serves as a reflector rather than a wheel.
    pub fn is_reflector(&self) -> bool {
        let map: Vec<usize> = self
            .cipher
            .chars()
            .map(|c| char_to_index(c).expect("catalog cipher holds letters only"))
            .collect();

        map.iter().enumerate().all(|(i, &c)| c != i && map[c] == i)
    }
}

/// Commercial Enigma A/B wheels (1924).
pub static COMMERCIAL: [RotorSpec; 3] = [
    RotorSpec { id: "IC", cipher: "DMTWSILRUYQNKFEJCAZBPGXOHV", date: "1924", group: "Commercial Enigma A, B", turnovers: "R" },
    RotorSpec { id: "IIC", cipher: "HQZGPJTMOBLNCIFDYAWVEUSRKX", date: "1924", group: "Commercial Enigma A, B", turnovers: "F" },
    RotorSpec { id: "IIIC", cipher: "UQNTLSZFMREHDPXKIBVYGJCWOA", date: "1924", group: "Commercial Enigma A, B", turnovers: "W" },
];

/// German Railway (Rocket) wheels, reflector and entry wheel (1941).
pub static ROCKET: [RotorSpec; 5] = [
    RotorSpec { id: "I-R", cipher: "JGDQOXUSCAMIFRVTPNEWKBLZYH", date: "7 February 1941", group: "German Railway (Rocket)", turnovers: "R" },
    RotorSpec { id: "II-R", cipher: "NTZPSFBOKMWRCJDIVLAEYUXHGQ", date: "7 February 1941", group: "German Railway (Rocket)", turnovers: "F" },
    RotorSpec { id: "III-R", cipher: "JVIUBHTCDYAKEQZPOSGXNRMWFL", date: "7 February 1941", group: "German Railway (Rocket)", turnovers: "W" },
    RotorSpec { id: "UKW-R", cipher: "QYHOGNECVPUZTFDJAXWMKISRBL", date: "7 February 1941", group: "German Railway (Rocket)", turnovers: "" },
    RotorSpec { id: "ETW-R", cipher: "QWERTZUIOASDFGHJKPYXCVBNML", date: "7 February 1941", group: "German Railway (Rocket)", turnovers: "" },
];

/// Swiss-K wheels, reflector and entry wheel (1939).
pub static SWISS_K: [RotorSpec; 5] = [
    RotorSpec { id: "I-K", cipher: "PEZUOHXSCVFMTBGLRINQJWAYDK", date: "February 1939", group: "Swiss K", turnovers: "R" },
    RotorSpec { id: "II-K", cipher: "ZOUESYDKFWPCIQXHMVBLGNJRAT", date: "February 1939", group: "Swiss K", turnovers: "F" },
    RotorSpec { id: "III-K", cipher: "EHRVXGAOBQUSIMZFLYNWKTPDJC", date: "February 1939", group: "Swiss K", turnovers: "W" },
    RotorSpec { id: "UKW-K", cipher: "IMETCGFRAYSQBZXWLHKDVUPOJN", date: "February 1939", group: "Swiss K", turnovers: "" },
    RotorSpec { id: "ETW-K", cipher: "QWERTZUIOASDFGHJKPYXCVBNML", date: "February 1939", group: "Swiss K", turnovers: "" },
];

/// Enigma I, M3 Army and M3/M4 Naval wheels.
pub static M3: [RotorSpec; 8] = [
    RotorSpec { id: "I", cipher: "EKMFLGDQVZNTOWYHXUSPAIBRCJ", date: "1930", group: "Enigma I", turnovers: "R" },
    RotorSpec { id: "II", cipher: "AJDKSIRUXBLHWTMCQGZNPYFVOE", date: "1930", group: "Enigma I", turnovers: "F" },
    RotorSpec { id: "III", cipher: "BDFHJLCPRTXVZNYEIWGAKMUSQO", date: "1930", group: "Enigma I", turnovers: "W" },
    RotorSpec { id: "IV", cipher: "ESOVPZJAYQUIRHXLNFTGKDCMWB", date: "December 1938", group: "M3 Army", turnovers: "K" },
    RotorSpec { id: "V", cipher: "VZBRGITYUPSDNHLXAWMJQOFECK", date: "December 1938", group: "M3 Army", turnovers: "A" },
    RotorSpec { id: "VI", cipher: "JPGVOUMFYQBENHZRDKASXLICTW", date: "1939", group: "M3 & M4 Naval (FEB 1942)", turnovers: "AN" },
    RotorSpec { id: "VII", cipher: "NZJHGRCXMYSWBOUFAIVLPEKQDT", date: "1939", group: "M3 & M4 Naval (FEB 1942)", turnovers: "AN" },
    RotorSpec { id: "VIII", cipher: "FKQHTLXOCBJSPDZRAMEWNIUYGV", date: "1939", group: "M3 & M4 Naval (FEB 1942)", turnovers: "AN" },
];

/// M4 thin wheels, the standard reflectors and the entry wheel.
pub static M4: [RotorSpec; 8] = [
    RotorSpec { id: "Beta", cipher: "LEYJVCNIXWPBQMDRTAKZGFUHOS", date: "Spring 1941", group: "M4 R2", turnovers: "" },
    RotorSpec { id: "Gamma", cipher: "FSOKANUERHMBTIYCWLQPZXVGJD", date: "Spring 1942", group: "M4 R2", turnovers: "" },
    RotorSpec { id: "Reflector A", cipher: "EJMZALYXVBWFCRQUONTSPIKHGD", date: "", group: "", turnovers: "" },
    RotorSpec { id: "Reflector B", cipher: "YRUHQSLDPXNGOKMIEBFZCWVJAT", date: "", group: "", turnovers: "" },
    RotorSpec { id: "Reflector C", cipher: "FVPJIAOYEDRZXWGCTKUQSBNMHL", date: "", group: "", turnovers: "" },
    RotorSpec { id: "Reflector B Thin", cipher: "ENKQAUYWJICOPBLMDXZVFTHRGS", date: "1940", group: "M4 R1 (M3 + Thin)", turnovers: "" },
    RotorSpec { id: "Reflector C Thin", cipher: "RDOBJNTKVEHMLFCWZAXGYIPSUQ", date: "1940", group: "M4 R1 (M3 + Thin)", turnovers: "" },
    RotorSpec { id: "ETW", cipher: "ABCDEFGHIJKLMNOPQRSTUVWXYZ", date: "", group: "Enigma I", turnovers: "" },
];

/// Returns every selectable wheel in presentation order: Enigma I / M3
/// wheels first, then M4 extras, Rocket, Swiss-K and commercial. Entries
/// whose wiring is a reflector are excluded.
pub fn wheels() -> Vec<&'static RotorSpec> {
    let mut list = Vec::new();

    for spec in M3.iter() {
        if !spec.is_reflector() {
            list.push(spec);
        }
    }
    for group in [&M4[..], &ROCKET[..], &SWISS_K[..], &COMMERCIAL[..]] {
        for spec in group {
            if !spec.is_reflector() {
                list.push(spec);
            }
        }
    }

    list
}

/// Returns every selectable reflector in presentation order.
pub fn reflectors() -> Vec<&'static RotorSpec> {
    let mut list = Vec::new();

    for group in [&M4[..], &ROCKET[..], &SWISS_K[..]] {
        for spec in group {
            if spec.is_reflector() {
                list.push(spec);
            }
        }
    }

    list
}

/// Finds a wheel by id.
pub fn find_wheel(id: &str) -> Option<&'static RotorSpec> {
    wheels().into_iter().find(|spec| spec.id == id)
}

/// Finds a reflector by id.
pub fn find_reflector(id: &str) -> Option<&'static RotorSpec> {
    reflectors().into_iter().find(|spec| spec.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Mapper;

    /// Startup invariant: every catalog wiring is a 26-letter permutation.
    /// Mapper::from_cipher panics on anything else.
    #[test]
    fn test_every_cipher_is_a_permutation() {
        for group in [&COMMERCIAL[..], &ROCKET[..], &SWISS_K[..], &M3[..], &M4[..]] {
            for spec in group {
                let _ = Mapper::from_cipher(spec.id, spec.cipher);
            }
        }
    }

    #[test]
    fn test_wheel_and_reflector_partition() {
        assert_eq!(wheels().len(), 22);
        assert_eq!(reflectors().len(), 7);

        for spec in wheels() {
            assert!(!spec.is_reflector(), "{} listed as wheel", spec.id);
        }
        for spec in reflectors() {
            assert!(spec.is_reflector(), "{} listed as reflector", spec.id);
        }
    }

    #[test]
    fn test_identity_entry_wheel_is_not_a_reflector() {
        let etw = find_wheel("ETW").expect("ETW in wheel list");
        assert!(!etw.is_reflector());
    }

    #[test]
    fn test_find_by_id() {
        assert_eq!(find_wheel("I").unwrap().cipher, "EKMFLGDQVZNTOWYHXUSPAIBRCJ");
        assert!(find_wheel("Reflector B").is_none());
        assert_eq!(
            find_reflector("Reflector B").unwrap().cipher,
            "YRUHQSLDPXNGOKMIEBFZCWVJAT"
        );
        assert!(find_reflector("I").is_none());
    }

    #[test]
    fn test_turnover_follows_notch() {
        // Wheel I turns its neighbour over when stepping from Q to R.
        let wheel = find_wheel("I").unwrap();
        assert!(wheel.is_turnover_point(17)); // R
        assert!(wheel.is_notch_point(16)); // Q
        assert!(!wheel.is_turnover_point(16));
        assert!(!wheel.is_notch_point(17));
    }

    #[test]
    fn test_naval_wheels_have_two_turnovers() {
        let wheel = find_wheel("VI").unwrap();
        assert!(wheel.is_turnover_point(0)); // A
        assert!(wheel.is_turnover_point(13)); // N
        assert!(wheel.is_notch_point(25)); // Z, one before A
        assert!(wheel.is_notch_point(12)); // M, one before N
    }

    #[test]
    fn test_fixed_wheels_never_trigger() {
        let beta = find_wheel("Beta").unwrap();
        for i in 0..ALPHABET_SIZE {
            assert!(!beta.is_turnover_point(i));
            assert!(!beta.is_notch_point(i));
        }
    }
}
