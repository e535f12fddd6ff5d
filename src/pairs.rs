//! Letter-pair entry slots for the plugboard and the reconfigurable
//! reflector.
//!
//! A [`PairSet`] owns a fixed number of [`Pair`] text slots and keeps
//! per-letter usage counts up to date on every edit. Two modes exist:
//! lenient (plugboard — empty slots allowed, unpaired letters pass
//! through) and strict (reflector — all twelve pairs required, exactly
//! one letter-pair left unconfigured and completed automatically).

use crate::alphabet::{char_to_index, ALPHABET_SIZE};

/// One two-letter text slot.
///
/// A slot may be disabled, in which case it reads as empty regardless of
/// its text; the plugboard uses this to drop from 13 to 10 active slots
/// when extended mode is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    letters: String,
    enabled: bool,
}

impl Default for Pair {
    fn default() -> Self {
        Self::new()
    }
}

impl Pair {
    /// Creates an empty, enabled slot.
    pub fn new() -> Self {
        Pair {
            letters: String::new(),
            enabled: true,
        }
    }

    /// Replaces the slot text.
    pub fn set(&mut self, text: &str) {
        self.letters = text.to_string();
    }

    /// Empties the slot.
    pub fn clear(&mut self) {
        self.letters.clear();
    }

    /// Returns the raw slot text.
    pub fn get(&self) -> &str {
        &self.letters
    }

    /// Returns the number of characters, or 0 for a disabled slot.
    pub fn count(&self) -> usize {
        if self.enabled {
            self.letters.chars().count()
        } else {
            0
        }
    }

    /// Returns the letter index of the character at `position`, if the
    /// slot is enabled and the character is alphabetic.
    pub fn index_at(&self, position: usize) -> Option<usize> {
        if !self.enabled {
            return None;
        }
        self.letters.chars().nth(position).and_then(char_to_index)
    }

    /// Returns the letter index of the first character.
    pub fn first(&self) -> Option<usize> {
        self.index_at(0)
    }

    /// Returns the letter index of the second character.
    pub fn second(&self) -> Option<usize> {
        self.index_at(1)
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, state: bool) {
        self.enabled = state;
    }

    /// Checks the slot text in isolation: exactly two alphabetic
    /// characters naming two different letters.
    pub fn is_valid(&self) -> bool {
        if self.count() != 2 {
            return false;
        }

        match (self.first(), self.second()) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }

    /// Uppercases the slot text.
    pub fn sanitize(&mut self) {
        self.letters = self.letters.to_uppercase();
    }
}

/// A fixed collection of pair slots with letter-usage bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSet {
    list: Vec<Pair>,
    allow_empty: bool,
    letter_used: [bool; ALPHABET_SIZE],
    multi_use_errors: [bool; ALPHABET_SIZE],
    multi_use_error: bool,
    letter_count: usize,
    letter_counts: [usize; ALPHABET_SIZE],
}

impl PairSet {
    /// Constructs a pair set.
    ///
    /// # Parameters
    /// - `allow_empty`: Lenient mode — empty slots are valid and unpaired
    ///   letters map to themselves.
    /// - `size`: Number of slots.
    pub fn new(allow_empty: bool, size: usize) -> Self {
        let mut set = PairSet {
            list: vec![Pair::new(); size],
            allow_empty,
            letter_used: [false; ALPHABET_SIZE],
            multi_use_errors: [false; ALPHABET_SIZE],
            multi_use_error: false,
            letter_count: 0,
            letter_counts: [0; ALPHABET_SIZE],
        };
        set.count_letter_usage();
        set
    }

    /// Returns the number of slots.
    pub fn size(&self) -> usize {
        self.list.len()
    }

    pub fn is_allowing_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn is_multi_use_error(&self) -> bool {
        self.multi_use_error
    }

    /// Returns the number of distinct letters in use.
    pub fn letter_count(&self) -> usize {
        self.letter_count
    }

    /// Rebuilds the per-letter usage counts, used flags and multi-use
    /// flags from scratch. O(n) over all slots; run after every edit.
    fn count_letter_usage(&mut self) {
        self.multi_use_error = false;
        self.letter_count = 0;
        self.letter_used = [false; ALPHABET_SIZE];
        self.multi_use_errors = [false; ALPHABET_SIZE];
        self.letter_counts = [0; ALPHABET_SIZE];

        for pair in &self.list {
            for position in 0..pair.count() {
                if let Some(index) = pair.index_at(position) {
                    self.letter_counts[index] += 1;

                    if self.letter_used[index] {
                        self.multi_use_errors[index] = true;
                        self.multi_use_error = true;
                    } else {
                        self.letter_used[index] = true;
                        self.letter_count += 1;
                    }
                }
            }
        }
    }

    /// Stores raw text in a slot and recounts letter usage.
    pub fn set_text(&mut self, index: usize, text: &str) {
        self.list[index].set(text);
        self.count_letter_usage();
    }

    /// Returns the raw text of a slot.
    pub fn get_text(&self, index: usize) -> &str {
        self.list[index].get()
    }

    /// Returns the character count of a slot.
    pub fn get_count(&self, index: usize) -> usize {
        self.list[index].count()
    }

    /// Enables or disables a slot and recounts letter usage.
    pub fn set_enabled(&mut self, index: usize, state: bool) {
        self.list[index].set_enabled(state);
        self.count_letter_usage();
    }

    /// Uppercases the text of a slot.
    pub fn sanitize(&mut self, index: usize) {
        self.list[index].sanitize();
    }

    /// Empties every slot and recounts.
    pub fn clear(&mut self) {
        for pair in &mut self.list {
            pair.clear();
        }
        self.count_letter_usage();
    }

    /// Determines if the indexed slot is valid in the context of the
    /// whole set.
    ///
    /// Empty slots are valid only in lenient mode. A non-empty slot must
    /// be two distinct letters; in lenient mode neither letter may be
    /// flagged multi-use, in strict mode both letters must be used
    /// exactly once across the set.
    pub fn is_valid_at(&self, index: usize) -> bool {
        let pair = &self.list[index];

        if self.allow_empty && pair.is_empty() {
            return true;
        }

        if !pair.is_valid() {
            return false;
        }

        let (a, b) = match (pair.first(), pair.second()) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };

        if self.allow_empty {
            !self.multi_use_errors[a] && !self.multi_use_errors[b]
        } else {
            self.letter_counts[a] == 1 && self.letter_counts[b] == 1
        }
    }

    /// Determines if the whole set is valid.
    ///
    /// Strict mode additionally requires exactly 24 of the 26 letters in
    /// use, leaving exactly one unconfigured pair to complete at map time.
    pub fn is_valid(&self) -> bool {
        if self.multi_use_error {
            return false;
        }

        if self.allow_empty {
            self.list
                .iter()
                .all(|pair| pair.is_empty() || pair.is_valid())
        } else {
            self.letter_count == ALPHABET_SIZE - 2
                && self.list.iter().all(|pair| pair.is_valid())
        }
    }

    /// Derives the 26-entry permutation map from the pairs.
    ///
    /// Starts from the identity, swaps each configured pair, and in
    /// strict mode pairs the first two unused letters in ascending order
    /// so the result is a fixed-point-free involution.
    ///
    /// Only meaningful when [`is_valid`](Self::is_valid) holds; callers
    /// gate on validity first.
    pub fn get_map(&self) -> [usize; ALPHABET_SIZE] {
        let mut map = [0usize; ALPHABET_SIZE];
        for (i, entry) in map.iter_mut().enumerate() {
            *entry = i;
        }

        for pair in &self.list {
            if pair.count() != 2 {
                continue;
            }
            if let (Some(a), Some(b)) = (pair.first(), pair.second()) {
                map[a] = b;
                map[b] = a;
            }
        }

        if !self.allow_empty {
            // Complete the single unconfigured pair.
            let mut unused = (0..ALPHABET_SIZE).filter(|&i| !self.letter_used[i]);
            if let (Some(x), Some(y)) = (unused.next(), unused.next()) {
                map[x] = y;
                map[y] = x;
            }
        }

        map
    }

    /// Returns the slot texts in order, for persistence.
    pub fn links(&self) -> Vec<String> {
        self.list.iter().map(|pair| pair.get().to_string()).collect()
    }

    /// Replaces slot texts from a persisted representation. Entries that
    /// are not exactly two characters are skipped, matching the slot
    /// layout produced by [`links`](Self::links).
    pub fn set_links(&mut self, links: &[String]) {
        self.clear();

        let mut index = 0;
        for text in links {
            if text.chars().count() != 2 || index >= self.list.len() {
                continue;
            }
            self.list[index].set(text);
            index += 1;
        }

        self.count_letter_usage();
    }
}
