//! RNG module - tile value sources
//!
//! The engine draws every new tile value through a [`ValueSource`], so a game
//! is reproducible from its seed. [`SimpleRng`] is the default source;
//! [`ScriptedSource`] replays a fixed sequence for tests and replays.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Value;

/// Supplies tile values for board generation and refill.
pub trait ValueSource {
    /// Draw a value in `1..=elements`. `elements` is never zero.
    fn next_value(&mut self, elements: Value) -> Value;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed from the wall clock, for games that do not need to be replayed.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(1);
        Self::new(nanos)
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Takes the high bits: the low bits of a power-of-two LCG cycle with tiny
    /// periods, so `% max` would alternate for `max == 2`.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current RNG state (reseeding with it continues the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ValueSource for SimpleRng {
    fn next_value(&mut self, elements: Value) -> Value {
        self.next_range(elements as u32) as Value + 1
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values outside `1..=elements` are wrapped into range, so a script written
/// for a larger palette still yields legal tiles.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<Value>,
    cursor: usize,
}

impl ScriptedSource {
    /// An empty script yields `1` forever.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Number of values handed out so far
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl ValueSource for ScriptedSource {
    fn next_value(&mut self, elements: Value) -> Value {
        if self.values.is_empty() {
            self.cursor += 1;
            return 1;
        }
        let raw = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        (raw.max(1) - 1) % elements + 1
    }
}
