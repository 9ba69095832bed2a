// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Random sources for wandering
//!
//! Each agent owns its own source, so agents never share RNG state and a
//! population can be ticked in any order, or in parallel, with identical
//! results. Per-agent seeds are derived from one global seed:
//!
//!   seed = global_seed XOR (agent_index * MIXING_CONSTANT)

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Uniform random scalars in a symmetric range
///
/// Substitute a scripted implementation to make wandering deterministic in tests.
pub trait WanderRandom: Send {
    /// A value drawn uniformly from `[-half_range, +half_range]`
    ///
    /// A zero (or non-positive) half range yields 0.0.
    fn uniform(&mut self, half_range: f64) -> f64;
}

/// Seedable default source backed by `SmallRng`
pub struct SeededRandom(SmallRng);

impl SeededRandom {
    /// Seed directly
    pub fn new(seed: u64) -> Self {
        SeededRandom(SmallRng::seed_from_u64(seed))
    }

    /// Seed deterministically from a run's global seed and an agent index
    pub fn for_agent(global_seed: u64, agent_index: usize) -> Self {
        Self::new(global_seed ^ (agent_index as u64).wrapping_mul(MIXING_CONSTANT))
    }
}

impl WanderRandom for SeededRandom {
    fn uniform(&mut self, half_range: f64) -> f64 {
        if !(half_range > 0.0) || !half_range.is_finite() {
            return 0.0;
        }
        self.0.gen_range(-half_range..=half_range)
    }
}

impl std::fmt::Debug for SeededRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SeededRandom")
    }
}
