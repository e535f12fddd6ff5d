//! Machine: configuration, stepping mechanism and signal pipeline.
//!
//! Orchestrates the whole engine. A [`Machine`] owns the editable
//! configuration (wheel choices, ring settings, offsets, reflector and
//! plugboard pairs, display flags) and, while enciphering, a locked
//! snapshot holding the live [`Mapper`]s, [`Rotor`]s and the stage
//! pipeline. Locking is an explicit transition: it is refused while the
//! configuration is invalid, and unlocking discards every live instance.
//!
//! Keystrokes drive the engine. Each accepted key press advances the
//! wheel offsets (with the double-step anomaly of the lever mechanism),
//! pushes the new offsets into the live rotors, then folds the letter
//! through plugboard, wheels, reflector and back.

use tracing::debug;

use crate::alphabet::{char_to_index, index_to_char, ALPHABET_SIZE};
use crate::catalog::{find_reflector, find_wheel};
use crate::error::EnigmaError;
use crate::mapper::{Direction, Mapper};
use crate::pairs::PairSet;
use crate::rotor::Rotor;

/// Number of wheel slots (slow fourth wheel included).
pub const ROTOR_COUNT: usize = 4;
/// Number of reconfigurable reflector pairs.
pub const PAIR_COUNT: usize = 12;
/// Number of plugboard leads on a standard board.
pub const PLUG_COUNT: usize = 10;
/// Number of plugboard slots with the extended board.
pub const FULL_COUNT: usize = 13;

/// Slot index of the slow (fourth) wheel. It never advances.
pub const SLOW: usize = 0;
/// Slot index of the left wheel.
pub const LEFT: usize = 1;
/// Slot index of the middle wheel.
pub const MIDDLE: usize = 2;
/// Slot index of the right (fast) wheel.
pub const RIGHT: usize = 3;

/// Choice of wheel, ring setting and rotation for one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RotorState {
    wheel: String,
    ring: usize,
    offset: usize,
}

/// Which live component a pipeline stage addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageTag {
    Plugboard,
    Reflector,
    Wheel(usize),
}

/// One step of the signal path: a component and a traversal direction.
#[derive(Debug, Clone, Copy)]
struct Stage {
    tag: StageTag,
    direction: Direction,
}

/// Live instances materialized at lockdown, discarded at unlock.
#[derive(Debug, Clone)]
struct Locked {
    plugboard: Mapper,
    reflector: Mapper,
    rotors: [Rotor; ROTOR_COUNT],
    pipeline: Vec<Stage>,
}

/// Serializable snapshot of every persisted configuration field.
///
/// The engine performs no file I/O; an external persistence layer reads
/// a snapshot with [`Machine::settings`] and restores one with
/// [`Machine::apply_settings`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    pub reflector_choice: String,
    pub reconfigurable: bool,
    pub reflector_pairs: Vec<String>,
    pub wheels: [String; ROTOR_COUNT],
    pub rings: [usize; ROTOR_COUNT],
    pub offsets: [usize; ROTOR_COUNT],
    pub fourth_wheel: bool,
    pub extended: bool,
    pub use_letters: bool,
    pub show: bool,
    pub plugs: Vec<String>,
    pub window_position: (f64, f64),
}

/// One entry of a daily key sheet.
///
/// The sheet itself (one entry per day of the month) is external data;
/// the engine only consumes a single entry via
/// [`Machine::apply_preset`]. Wheels are given left to right; pair
/// strings are space-separated two-letter groups, twelve for the
/// reflector wiring and ten for the plugboard. The indicator groups are
/// historical metadata and take no part in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyKey {
    pub wheels: [String; 3],
    pub rings: [usize; 3],
    pub reflector_pairs: String,
    pub plug_pairs: String,
    pub indicator: String,
}

/// The cipher machine: editable configuration plus, while enciphering,
/// the locked translation state.
///
/// # Examples
///
/// ```
/// use enigma::Machine;
///
/// let mut machine = Machine::new();
/// machine.set_wheel_choice(enigma::LEFT, "I").unwrap();
/// machine.set_wheel_choice(enigma::MIDDLE, "II").unwrap();
/// machine.set_wheel_choice(enigma::RIGHT, "III").unwrap();
///
/// assert!(machine.set_encipher(true));
/// let lamp = machine.key_down('A').unwrap();
/// machine.key_up('A');
/// assert_ne!(lamp, 'A');
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    reflector_choice: String,
    reconfigurable: bool,
    pairs: PairSet,

    rotor_states: [RotorState; ROTOR_COUNT],
    fourth_wheel: bool,
    extended: bool,
    use_letters: bool,
    show: bool,

    plugs: PairSet,
    window_position: (f64, f64),

    locked: Option<Locked>,
    current_key: Option<usize>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Creates a machine with the default settings: Reflector B, wheels
    /// Beta/I/II/III, rings and offsets at A, no plugboard leads, fourth
    /// wheel off, letter display, trace off.
    pub fn new() -> Self {
        let state = |wheel: &str| RotorState {
            wheel: wheel.to_string(),
            ring: 0,
            offset: 0,
        };

        let mut machine = Machine {
            reflector_choice: "Reflector B".to_string(),
            reconfigurable: false,
            pairs: PairSet::new(false, PAIR_COUNT),
            rotor_states: [state("Beta"), state("I"), state("II"), state("III")],
            fourth_wheel: false,
            extended: false,
            use_letters: true,
            show: false,
            plugs: PairSet::new(true, FULL_COUNT),
            window_position: (0.0, 0.0),
            locked: None,
            current_key: None,
        };

        machine.sync_extended_slots();
        machine
    }

    /// Resets every field to the default settings and unlocks.
    pub fn default_settings(&mut self) {
        *self = Machine::new();
    }

    fn ensure_unlocked(&self) -> Result<(), EnigmaError> {
        if self.locked.is_some() {
            Err(EnigmaError::ConfigurationLocked)
        } else {
            Ok(())
        }
    }

    fn ensure_slot(index: usize, count: usize) -> Result<(), EnigmaError> {
        if index < count {
            Ok(())
        } else {
            Err(EnigmaError::IndexOutOfRange)
        }
    }

    /************************************************************************
     * Reflector set-up.
     */

    pub fn reflector_choice(&self) -> &str {
        &self.reflector_choice
    }

    pub fn set_reflector_choice(&mut self, choice: &str) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;
        self.reflector_choice = choice.to_string();
        Ok(())
    }

    pub fn is_reconfigurable(&self) -> bool {
        self.reconfigurable
    }

    pub fn set_reconfigurable(&mut self, state: bool) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;
        self.reconfigurable = state;
        Ok(())
    }

    /// Stores text in one reflector pair slot.
    pub fn set_pair_text(&mut self, index: usize, text: &str) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;
        Self::ensure_slot(index, PAIR_COUNT)?;
        self.pairs.set_text(index, text);
        Ok(())
    }

    /// Returns the text of one reflector pair slot.
    pub fn pair_text(&self, index: usize) -> &str {
        self.pairs.get_text(index)
    }

    /// Checks one reflector pair in the context of the whole set.
    pub fn is_pair_valid(&self, index: usize) -> bool {
        self.pairs.is_valid_at(index)
    }

    /// Checks the reflector as a whole. A catalog reflector is valid when
    /// its id exists; a reconfigurable one needs all twelve pairs.
    pub fn is_reflector_valid(&self) -> bool {
        if self.reconfigurable {
            self.pairs.is_valid()
        } else {
            find_reflector(&self.reflector_choice).is_some()
        }
    }

    /************************************************************************
     * Rotor set-up.
     */

    pub fn wheel_choice(&self, slot: usize) -> &str {
        &self.rotor_states[slot].wheel
    }

    pub fn set_wheel_choice(&mut self, slot: usize, id: &str) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;
        Self::ensure_slot(slot, ROTOR_COUNT)?;
        self.rotor_states[slot].wheel = id.to_string();
        Ok(())
    }

    pub fn ring_index(&self, slot: usize) -> usize {
        self.rotor_states[slot].ring
    }

    pub fn set_ring_index(&mut self, slot: usize, value: usize) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;
        Self::ensure_slot(slot, ROTOR_COUNT)?;
        self.rotor_states[slot].ring = value % ALPHABET_SIZE;
        Ok(())
    }

    pub fn rotor_offset(&self, slot: usize) -> usize {
        self.rotor_states[slot].offset
    }

    /// Sets a wheel's rotation. Offsets are the message key and stay
    /// adjustable while locked; a live rotor picks the change up at once.
    pub fn set_rotor_offset(&mut self, slot: usize, value: usize) -> Result<(), EnigmaError> {
        Self::ensure_slot(slot, ROTOR_COUNT)?;
        self.rotor_states[slot].offset = value % ALPHABET_SIZE;

        if let Some(locked) = self.locked.as_mut() {
            locked.rotors[slot].set_offset(value % ALPHABET_SIZE);
        }
        Ok(())
    }

    fn increment_rotor_offset(&mut self, slot: usize) {
        self.rotor_states[slot].offset = (self.rotor_states[slot].offset + 1) % ALPHABET_SIZE;
    }

    /// Checks that every wheel slot names a known catalog wheel.
    pub fn is_rotor_setup_valid(&self) -> bool {
        self.rotor_states
            .iter()
            .all(|state| find_wheel(&state.wheel).is_some())
    }

    pub fn is_fourth_wheel(&self) -> bool {
        self.fourth_wheel
    }

    pub fn set_fourth_wheel(&mut self, state: bool) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;
        self.fourth_wheel = state;
        Ok(())
    }

    pub fn is_use_letters(&self) -> bool {
        self.use_letters
    }

    /// Display-mode flag: letter or number labels. No cipher effect.
    pub fn set_use_letters(&mut self, state: bool) {
        self.use_letters = state;
    }

    pub fn is_show(&self) -> bool {
        self.show
    }

    /// Diagnostic trace flag: when set, every translation emits one
    /// debug event per pipeline stage. Purely observational.
    pub fn set_show(&mut self, state: bool) {
        self.show = state;
    }

    pub fn window_position(&self) -> (f64, f64) {
        self.window_position
    }

    /// Stores the last window position for the external UI layer. Opaque
    /// to the engine.
    pub fn set_window_position(&mut self, position: (f64, f64)) {
        self.window_position = position;
    }

    /************************************************************************
     * Plugboard connections.
     */

    fn sync_extended_slots(&mut self) {
        for index in PLUG_COUNT..FULL_COUNT {
            self.plugs.set_enabled(index, self.extended);
        }
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// Switches between the 10-lead standard board and the 13-lead
    /// extended board. The last three slots keep their text while
    /// disabled; they simply stop counting.
    pub fn set_extended(&mut self, state: bool) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;
        self.extended = state;
        self.sync_extended_slots();
        Ok(())
    }

    /// Stores text in one plugboard slot.
    pub fn set_plug_text(&mut self, index: usize, text: &str) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;
        Self::ensure_slot(index, FULL_COUNT)?;
        self.plugs.set_text(index, text);
        Ok(())
    }

    /// Returns the text of one plugboard slot.
    pub fn plug_text(&self, index: usize) -> &str {
        self.plugs.get_text(index)
    }

    /// Checks one plugboard slot in the context of the whole board.
    pub fn is_plug_valid(&self, index: usize) -> bool {
        self.plugs.is_valid_at(index)
    }

    /// Checks the plugboard as a whole.
    pub fn is_plugboard_valid(&self) -> bool {
        self.plugs.is_valid()
    }

    /************************************************************************
     * Lockdown and translation.
     */

    /// The sole gating predicate for entering lockdown.
    pub fn is_config_valid(&self) -> bool {
        self.is_plugboard_valid() && self.is_reflector_valid() && self.is_rotor_setup_valid()
    }

    pub fn is_encipher(&self) -> bool {
        self.locked.is_some()
    }

    /// Enters or leaves lockdown.
    ///
    /// Entering is refused while [`is_config_valid`](Self::is_config_valid)
    /// is false. On success the plugboard and reflector maps are built,
    /// the four rotors are constructed with their ring settings and
    /// offsets, and the stage pipeline is assembled. Leaving discards all
    /// of it and releases the key latch.
    ///
    /// # Returns
    /// The resulting encipher state: `true` when locked.
    pub fn set_encipher(&mut self, state: bool) -> bool {
        if !state {
            self.locked = None;
            self.current_key = None;
            return false;
        }

        if !self.is_config_valid() {
            return self.locked.is_some();
        }

        self.locked = Some(self.lockdown_settings());
        true
    }

    /// Builds the locked snapshot from the current configuration. Pure
    /// with respect to the configuration: the same settings always yield
    /// identical maps.
    fn lockdown_settings(&self) -> Locked {
        let plugboard = Mapper::new("Plugboard", self.plugs.get_map());

        let reflector = if self.reconfigurable {
            Mapper::new("Reflector", self.pairs.get_map())
        } else {
            let spec = find_reflector(&self.reflector_choice)
                .expect("reflector validity checked before lockdown");
            Mapper::from_cipher(spec.id, spec.cipher)
        };

        let rotors: [Rotor; ROTOR_COUNT] = std::array::from_fn(|slot| {
            let state = &self.rotor_states[slot];
            let spec = find_wheel(&state.wheel).expect("wheel validity checked before lockdown");
            let mut rotor = Rotor::new(spec, state.ring);
            rotor.set_offset(state.offset);
            rotor
        });

        let pipeline = self.build_pipeline();

        Locked {
            plugboard,
            reflector,
            rotors,
            pipeline,
        }
    }

    /// Assembles the fixed traversal order: plugboard, wheels right to
    /// left, reflector, wheels left to right, plugboard. The slow wheel
    /// joins only when the fourth wheel is enabled.
    fn build_pipeline(&self) -> Vec<Stage> {
        let mut pipeline = Vec::with_capacity(11);

        let stage = |tag, direction| Stage { tag, direction };

        pipeline.push(stage(StageTag::Plugboard, Direction::RightToLeft));
        pipeline.push(stage(StageTag::Wheel(RIGHT), Direction::RightToLeft));
        pipeline.push(stage(StageTag::Wheel(MIDDLE), Direction::RightToLeft));
        pipeline.push(stage(StageTag::Wheel(LEFT), Direction::RightToLeft));

        if self.fourth_wheel {
            pipeline.push(stage(StageTag::Wheel(SLOW), Direction::RightToLeft));
        }

        pipeline.push(stage(StageTag::Reflector, Direction::RightToLeft));

        if self.fourth_wheel {
            pipeline.push(stage(StageTag::Wheel(SLOW), Direction::LeftToRight));
        }

        pipeline.push(stage(StageTag::Wheel(LEFT), Direction::LeftToRight));
        pipeline.push(stage(StageTag::Wheel(MIDDLE), Direction::LeftToRight));
        pipeline.push(stage(StageTag::Wheel(RIGHT), Direction::LeftToRight));
        pipeline.push(stage(StageTag::Plugboard, Direction::LeftToRight));

        pipeline
    }

    /// Advances the wheel offsets for one keystroke.
    ///
    /// The right wheel always steps. If the middle wheel sat on its notch
    /// point before this keystroke, the middle and left wheels both step
    /// (the double-step anomaly). Independently, if the right wheel has
    /// just reached its turnover point, the middle wheel steps; both
    /// checks may fire on the same keystroke.
    fn advance_rotors(&mut self) {
        let locked = self.locked.as_ref().expect("stepping requires lockdown");
        let middle_at_notch = locked.rotors[MIDDLE].is_notch_point(self.rotor_states[MIDDLE].offset);

        self.increment_rotor_offset(RIGHT);

        if middle_at_notch {
            self.increment_rotor_offset(MIDDLE);
            self.increment_rotor_offset(LEFT);
        }

        let locked = self.locked.as_ref().expect("stepping requires lockdown");
        if locked.rotors[RIGHT].is_turnover_point(self.rotor_states[RIGHT].offset) {
            self.increment_rotor_offset(MIDDLE);
        }
    }

    /// Pushes the advanced offsets into the live rotors, once per
    /// keystroke. The pipeline never re-reads offsets mid-translation.
    fn update_pipeline(&mut self) {
        let offsets: [usize; ROTOR_COUNT] =
            std::array::from_fn(|slot| self.rotor_states[slot].offset);

        let locked = self.locked.as_mut().expect("stepping requires lockdown");
        for (rotor, offset) in locked.rotors.iter_mut().zip(offsets) {
            rotor.set_offset(offset);
        }
    }

    /// Folds an index through every stage of the pipeline.
    fn translate_pipeline(&self, index: usize) -> usize {
        let locked = self.locked.as_ref().expect("translation requires lockdown");

        if self.show {
            debug!(target: "enigma::pipeline", "key {}", index_to_char(index));
        }

        let mut current = index;
        for stage in &locked.pipeline {
            let input = current;
            current = match stage.tag {
                StageTag::Plugboard => locked.plugboard.swap(stage.direction, current),
                StageTag::Reflector => locked.reflector.swap(stage.direction, current),
                StageTag::Wheel(slot) => locked.rotors[slot].swap(stage.direction, current),
            };

            if self.show {
                match stage.tag {
                    StageTag::Wheel(slot) => {
                        let rotor = &locked.rotors[slot];
                        debug!(
                            target: "enigma::pipeline",
                            "{}[{}]({}->{})",
                            rotor.id(),
                            index_to_char(rotor.offset()),
                            index_to_char(input),
                            index_to_char(current)
                        );
                    }
                    StageTag::Plugboard => debug!(
                        target: "enigma::pipeline",
                        "{}({}->{})",
                        locked.plugboard.id(),
                        index_to_char(input),
                        index_to_char(current)
                    ),
                    StageTag::Reflector => debug!(
                        target: "enigma::pipeline",
                        "{}({}->{})",
                        locked.reflector.id(),
                        index_to_char(input),
                        index_to_char(current)
                    ),
                }
            }
        }

        if self.show {
            debug!(target: "enigma::pipeline", "lamp {}", index_to_char(current));
        }

        current
    }

    /// Advances the wheels and translates one letter index.
    ///
    /// The engine primitive underneath [`key_down`](Self::key_down).
    ///
    /// # Returns
    /// The translated index, or `None` when the machine is not locked or
    /// the index is out of range.
    pub fn translate(&mut self, index: usize) -> Option<usize> {
        if self.locked.is_none() || index >= ALPHABET_SIZE {
            return None;
        }

        self.advance_rotors();
        self.update_pipeline();
        Some(self.translate_pipeline(index))
    }

    /************************************************************************
     * Keystroke interface.
     */

    /// Handles a key press.
    ///
    /// Acts only while enciphering and while no other key is held; the
    /// latch stops keyboard auto-repeat from advancing the wheels more
    /// than once per physical press. Non-letter keys are ignored.
    ///
    /// # Returns
    /// The lamp letter, or `None` when the press was ignored.
    pub fn key_down(&mut self, key: char) -> Option<char> {
        if self.locked.is_none() {
            return None;
        }

        let index = char_to_index(key)?;
        if self.current_key.is_some() {
            return None;
        }

        self.current_key = Some(index);
        let output = self.translate(index)?;
        Some(index_to_char(output))
    }

    /// Handles a key release: clears the latch when the released letter
    /// matches the held one.
    pub fn key_up(&mut self, key: char) {
        if self.locked.is_none() {
            return;
        }

        if let Some(index) = char_to_index(key) {
            if self.current_key == Some(index) {
                self.current_key = None;
            }
        }
    }

    /************************************************************************
     * Presets and persistence.
     */

    /// Applies one daily key sheet entry to the configuration: wheel
    /// choices and ring settings left to right, the reflector wiring as
    /// reconfigurable pairs, and the plugboard leads. Uses the normal
    /// setters, so the machine must be unlocked.
    ///
    /// # Errors
    /// [`EnigmaError::ConfigurationLocked`] while enciphering;
    /// [`EnigmaError::MalformedPreset`] if a pair group is not exactly
    /// two letters, or a pair list overflows its slots.
    pub fn apply_preset(&mut self, entry: &DailyKey) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;

        let reflector_pairs = Self::parse_pair_groups(&entry.reflector_pairs, PAIR_COUNT)?;
        let plug_pairs = Self::parse_pair_groups(&entry.plug_pairs, PLUG_COUNT)?;

        for (slot, wheel) in [LEFT, MIDDLE, RIGHT].into_iter().zip(&entry.wheels) {
            self.set_wheel_choice(slot, wheel)?;
            self.set_ring_index(slot, entry.rings[slot - LEFT])?;
        }

        self.set_reconfigurable(true)?;
        self.pairs.clear();
        for (index, group) in reflector_pairs.iter().enumerate() {
            self.set_pair_text(index, group)?;
        }

        self.plugs.clear();
        for (index, group) in plug_pairs.iter().enumerate() {
            self.set_plug_text(index, group)?;
        }

        Ok(())
    }

    /// Splits space-separated two-letter groups, upper-cased.
    fn parse_pair_groups(text: &str, capacity: usize) -> Result<Vec<String>, EnigmaError> {
        let mut groups = Vec::new();

        for group in text.split_whitespace() {
            if group.chars().count() != 2 || !group.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(EnigmaError::MalformedPreset(group.to_string()));
            }
            groups.push(group.to_uppercase());
        }

        if groups.len() > capacity {
            return Err(EnigmaError::MalformedPreset(text.to_string()));
        }

        Ok(groups)
    }

    /// Captures the full persisted configuration record.
    pub fn settings(&self) -> Settings {
        Settings {
            reflector_choice: self.reflector_choice.clone(),
            reconfigurable: self.reconfigurable,
            reflector_pairs: self.pairs.links(),
            wheels: std::array::from_fn(|slot| self.rotor_states[slot].wheel.clone()),
            rings: std::array::from_fn(|slot| self.rotor_states[slot].ring),
            offsets: std::array::from_fn(|slot| self.rotor_states[slot].offset),
            fourth_wheel: self.fourth_wheel,
            extended: self.extended,
            use_letters: self.use_letters,
            show: self.show,
            plugs: self.plugs.links(),
            window_position: self.window_position,
        }
    }

    /// Restores a persisted configuration record through the normal
    /// setters. The machine must be unlocked.
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<(), EnigmaError> {
        self.ensure_unlocked()?;

        self.reflector_choice = settings.reflector_choice.clone();
        self.reconfigurable = settings.reconfigurable;
        self.pairs.set_links(&settings.reflector_pairs);

        for slot in 0..ROTOR_COUNT {
            self.rotor_states[slot] = RotorState {
                wheel: settings.wheels[slot].clone(),
                ring: settings.rings[slot] % ALPHABET_SIZE,
                offset: settings.offsets[slot] % ALPHABET_SIZE,
            };
        }

        self.fourth_wheel = settings.fourth_wheel;
        self.extended = settings.extended;
        self.use_letters = settings.use_letters;
        self.show = settings.show;
        self.plugs.set_links(&settings.plugs);
        self.sync_extended_slots();
        self.window_position = settings.window_position;

        Ok(())
    }
}
