//! End-to-end tests for the public machine API.
//!
//! All expected ciphertext values are frozen reference sequences for the
//! historical machines: any change in output indicates a regression in
//! the wiring, stepping or pipeline logic.
//!
//! Coverage:
//! - known-answer sequences for the Enigma I wheel set
//! - self-reciprocity under plugboard and reconfigurable reflector
//! - the M4 thin-reflector emulation of the M3
//! - lockdown idempotence and validity gating
//! - daily-key presets
//! - permutation properties (proptest)

use proptest::prelude::*;

use enigma::alphabet::ALPHABET_SIZE;
use enigma::mapper::{Direction, Mapper};
use enigma::pairs::PairSet;
use enigma::rotor::Rotor;
use enigma::{catalog, DailyKey, Machine, LEFT, MIDDLE, RIGHT, SLOW};

/// Types a string on a locked machine, pressing and releasing each key.
fn type_text(machine: &mut Machine, text: &str) -> String {
    let mut output = String::new();
    for key in text.chars() {
        output.push(machine.key_down(key).expect("keypress accepted"));
        machine.key_up(key);
    }
    output
}

/// Wheels I/II/III left to right, Reflector B, rings and offsets at A.
fn army_machine() -> Machine {
    let mut machine = Machine::new();
    machine.set_wheel_choice(LEFT, "I").unwrap();
    machine.set_wheel_choice(MIDDLE, "II").unwrap();
    machine.set_wheel_choice(RIGHT, "III").unwrap();
    machine
}

// ═══════════════════════════════════════════════════════════════════════
// Known-answer sequences — frozen reference ciphertext
// ═══════════════════════════════════════════════════════════════════════

/// The reference sequence for an Enigma I at the all-A ground setting:
/// five presses of A light B, D, Z, G, O.
#[test]
fn known_answer_aaaaa() {
    let mut machine = army_machine();
    assert!(machine.set_encipher(true));

    assert_eq!(type_text(&mut machine, "AAAAA"), "BDZGO");
}

/// The same sequence through the raw translate primitive.
#[test]
fn known_answer_aaaaa_via_translate() {
    let mut machine = army_machine();
    assert!(machine.set_encipher(true));

    let output: Vec<usize> = (0..5).map(|_| machine.translate(0).unwrap()).collect();
    assert_eq!(output, vec![1, 3, 25, 6, 14]); // B D Z G O
}

/// Deciphering the frozen sequence restores the plaintext.
#[test]
fn known_answer_is_reciprocal() {
    let mut machine = army_machine();
    assert!(machine.set_encipher(true));

    assert_eq!(type_text(&mut machine, "BDZGO"), "AAAAA");
}

// ═══════════════════════════════════════════════════════════════════════
// Self-reciprocity under richer configurations
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn reciprocal_with_plugboard_and_rings() {
    let mut sender = Machine::new();
    sender.set_wheel_choice(LEFT, "IV").unwrap();
    sender.set_wheel_choice(MIDDLE, "V").unwrap();
    sender.set_wheel_choice(RIGHT, "VI").unwrap();
    sender.set_ring_index(LEFT, 3).unwrap();
    sender.set_ring_index(MIDDLE, 17).unwrap();
    sender.set_ring_index(RIGHT, 9).unwrap();
    sender.set_rotor_offset(LEFT, 11).unwrap();
    sender.set_rotor_offset(MIDDLE, 4).unwrap();
    sender.set_rotor_offset(RIGHT, 22).unwrap();
    sender.set_plug_text(0, "AQ").unwrap();
    sender.set_plug_text(1, "BZ").unwrap();
    sender.set_plug_text(2, "CM").unwrap();
    sender.set_plug_text(3, "DX").unwrap();

    let mut receiver = sender.clone();
    assert!(sender.set_encipher(true));
    assert!(receiver.set_encipher(true));

    let plaintext = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG";
    let ciphertext = type_text(&mut sender, plaintext);
    assert_ne!(ciphertext, plaintext);

    // No letter ever maps to itself on a reflector machine.
    for (input, output) in plaintext.chars().zip(ciphertext.chars()) {
        assert_ne!(input, output);
    }

    assert_eq!(type_text(&mut receiver, &ciphertext), plaintext);
}

/// A reconfigurable reflector wired with twelve of Reflector B's
/// thirteen pairs behaves exactly like Reflector B — the thirteenth
/// pair is completed automatically.
#[test]
fn reconfigurable_reflector_matches_catalog_wiring() {
    let mut fixed = army_machine();

    let mut rewired = army_machine();
    rewired.set_reconfigurable(true).unwrap();
    let pairs = [
        "AY", "BR", "CU", "DH", "EQ", "FS", "GL", "IP", "JX", "KN", "MO", "TZ",
    ];
    for (index, text) in pairs.iter().enumerate() {
        rewired.set_pair_text(index, text).unwrap();
    }
    // V and W are the leftover pair, completed at lock time.
    assert!(rewired.is_reflector_valid());

    assert!(fixed.set_encipher(true));
    assert!(rewired.set_encipher(true));

    let probe = "AQZMFTENIGMA";
    assert_eq!(
        type_text(&mut rewired, probe),
        type_text(&mut fixed, probe)
    );
}

/// An M4 with Beta at position A, ring A and the thin B reflector is
/// wired identically to an M3 with Reflector B.
#[test]
fn thin_reflector_with_beta_emulates_m3() {
    let mut m3 = army_machine();

    let mut m4 = army_machine();
    m4.set_fourth_wheel(true).unwrap();
    m4.set_wheel_choice(SLOW, "Beta").unwrap();
    m4.set_reflector_choice("Reflector B Thin").unwrap();

    assert!(m3.set_encipher(true));
    assert!(m4.set_encipher(true));

    let probe = "SIXMACHINESWERERECOVERED";
    assert_eq!(type_text(&mut m4, probe), type_text(&mut m3, probe));
}

// ═══════════════════════════════════════════════════════════════════════
// Lockdown semantics
// ═══════════════════════════════════════════════════════════════════════

/// Re-locking an already locked machine changes nothing: both machines
/// continue with identical translations.
#[test]
fn relocking_is_idempotent() {
    let mut first = army_machine();
    first.set_plug_text(0, "HW").unwrap();
    assert!(first.set_encipher(true));

    let mut second = first.clone();
    assert!(second.set_encipher(true));

    for key in "IDEMPOTENCE".chars() {
        let a = first.key_down(key);
        let b = second.key_down(key);
        first.key_up(key);
        second.key_up(key);
        assert_eq!(a, b, "divergence after relock at key {}", key);
    }
}

#[test]
fn lock_gated_on_reflector_validity() {
    let mut machine = army_machine();
    machine.set_reconfigurable(true).unwrap();

    // Eleven pairs: 22 letters, one short of the required 24.
    let pairs = [
        "AY", "BR", "CU", "DH", "EQ", "FS", "GL", "IP", "JX", "KN", "MO",
    ];
    for (index, text) in pairs.iter().enumerate() {
        machine.set_pair_text(index, text).unwrap();
    }
    assert!(!machine.is_reflector_valid());
    assert!(!machine.set_encipher(true));

    machine.set_pair_text(11, "TZ").unwrap();
    assert!(machine.is_reflector_valid());
    assert!(machine.set_encipher(true));
}

#[test]
fn unlock_allows_reconfiguration() {
    let mut machine = army_machine();
    assert!(machine.set_encipher(true));
    let before = type_text(&mut machine, "AAAAA");

    machine.set_encipher(false);
    machine.set_wheel_choice(RIGHT, "IV").unwrap();
    machine.set_rotor_offset(RIGHT, 0).unwrap();
    machine.set_rotor_offset(MIDDLE, 0).unwrap();
    machine.set_rotor_offset(LEFT, 0).unwrap();
    assert!(machine.set_encipher(true));

    assert_ne!(type_text(&mut machine, "AAAAA"), before);
}

// ═══════════════════════════════════════════════════════════════════════
// Daily-key presets
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn preset_configures_and_translates() {
    let entry = DailyKey {
        wheels: ["V".to_string(), "II".to_string(), "IV".to_string()],
        rings: [20, 5, 12],
        reflector_pairs: "AY BR CU DH EQ FS GL IP JX KN MO TZ".to_string(),
        plug_pairs: "AD CN ET FL GI JV KZ PU QY WX".to_string(),
        indicator: "EPK LOM".to_string(),
    };

    let mut sender = Machine::new();
    sender.apply_preset(&entry).unwrap();
    let mut receiver = sender.clone();

    assert!(sender.set_encipher(true));
    assert!(receiver.set_encipher(true));

    let ciphertext = type_text(&mut sender, "MORGENFRUEH");
    assert_eq!(type_text(&mut receiver, &ciphertext), "MORGENFRUEH");
}

#[test]
fn preset_with_reflector_b_pairs_matches_catalog() {
    let entry = DailyKey {
        wheels: ["I".to_string(), "II".to_string(), "III".to_string()],
        rings: [0, 0, 0],
        reflector_pairs: "AY BR CU DH EQ FS GL IP JX KN MO TZ".to_string(),
        plug_pairs: String::new(),
        indicator: String::new(),
    };

    let mut machine = Machine::new();
    machine.apply_preset(&entry).unwrap();
    assert!(machine.set_encipher(true));

    // VW completes Reflector B, so the frozen sequence still holds.
    assert_eq!(type_text(&mut machine, "AAAAA"), "BDZGO");
}

// ═══════════════════════════════════════════════════════════════════════
// Persistence record
// ═══════════════════════════════════════════════════════════════════════

#[cfg(feature = "serde")]
#[test]
fn settings_serialize_round_trip() {
    let mut machine = army_machine();
    machine.set_plug_text(0, "AQ").unwrap();
    machine.set_show(true);
    machine.set_window_position((640.0, 400.0));

    let snapshot = machine.settings();
    let json = serde_json::to_string(&snapshot).expect("serialize settings");
    let restored: enigma::Settings = serde_json::from_str(&json).expect("deserialize settings");
    assert_eq!(restored, snapshot);
}

// ═══════════════════════════════════════════════════════════════════════
// Permutation properties
// ═══════════════════════════════════════════════════════════════════════

fn permutation() -> impl Strategy<Value = Vec<usize>> {
    Just((0..ALPHABET_SIZE).collect::<Vec<usize>>()).prop_shuffle()
}

proptest! {
    /// The derived inverse undoes the map for any permutation.
    #[test]
    fn mapper_inverse_round_trip(perm in permutation()) {
        let mut map = [0usize; ALPHABET_SIZE];
        for (entry, value) in map.iter_mut().zip(&perm) {
            *entry = *value;
        }

        let mapper = Mapper::new("prop", map);
        for i in 0..ALPHABET_SIZE {
            prop_assert_eq!(mapper.inverse()[mapper.map()[i]], i);
            prop_assert_eq!(
                mapper.swap(Direction::LeftToRight, mapper.swap(Direction::RightToLeft, i)),
                i
            );
        }
    }

    /// Ring-adjusted wheel maps stay mutual inverses for every ring and
    /// offset.
    #[test]
    fn rotor_maps_stay_mutual_inverses(
        ring in 0..ALPHABET_SIZE,
        offset in 0..ALPHABET_SIZE,
    ) {
        let spec = catalog::find_wheel("VII").unwrap();
        let mut rotor = Rotor::new(spec, ring);
        rotor.set_offset(offset);

        for i in 0..ALPHABET_SIZE {
            let out = rotor.swap(Direction::RightToLeft, i);
            prop_assert_eq!(rotor.swap(Direction::LeftToRight, out), i);
        }
    }

    /// Every valid plugboard derives an involution: pairs swap, the rest
    /// pass through, and double application restores the input.
    #[test]
    fn plugboard_map_is_involution(
        perm in permutation(),
        leads in 0usize..=10,
    ) {
        let mut plugs = PairSet::new(true, 13);
        for i in 0..leads {
            let a = perm[2 * i];
            let b = perm[2 * i + 1];
            let text = format!(
                "{}{}",
                enigma::alphabet::index_to_char(a),
                enigma::alphabet::index_to_char(b)
            );
            plugs.set_text(i, &text);
        }

        prop_assert!(plugs.is_valid());
        let map = plugs.get_map();
        for i in 0..ALPHABET_SIZE {
            prop_assert_eq!(map[map[i]], i);
        }
    }
}
