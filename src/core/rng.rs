//! RNG module - deterministic random tile and task generation
//!
//! A simple LCG keeps board fills and random tasks reproducible from a
//! seed, which the tests rely on.

use crate::types::ShapeKind;

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

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Generate random value in range [min, max] (inclusive)
    pub fn next_between(&mut self, min: u32, max: u32) -> u32 {
        min + self.next_range(max - min + 1)
    }

    /// Draw a uniformly random tile shape
    pub fn next_shape(&mut self) -> ShapeKind {
        ShapeKind::from_index(self.next_range(ShapeKind::COUNT))
    }
}
