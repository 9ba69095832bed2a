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
//! Time sources for host loops
//!
//! The steering core only needs the time elapsed since the previous tick
//! (used by wandering). Hosts with their own frame timing pass `dt` straight
//! to [`crate::agent::Agent::tick`]; [`FixedStep`] serves simple fixed-rate loops.

use crate::error::{SteeringError, SteeringResult};

/// Source of per-tick elapsed time
pub trait Clock: Send {
    /// Time elapsed since the previous tick, advancing the clock
    fn elapsed_since_last_tick(&mut self) -> f64;
}

/// Clock that advances by the same timestep every tick
///
/// # Examples
///
/// ```
/// use steering_engine::clock::{Clock, FixedStep};
///
/// let mut clock = FixedStep::new(1.0 / 60.0);
/// assert_eq!(clock.elapsed_since_last_tick(), 1.0 / 60.0);
/// assert_eq!(clock.ticks(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStep {
    timestep: f64,
    ticks: u64,
}

impl FixedStep {
    /// Create a fixed-step clock
    ///
    /// # Panics
    ///
    /// Panics if `timestep` is non-positive, NaN, or infinite.
    pub fn new(timestep: f64) -> Self {
        assert!(
            timestep > 0.0 && timestep.is_finite(),
            "Timestep must be positive and finite"
        );
        FixedStep { timestep, ticks: 0 }
    }

    /// Create a fixed-step clock, rejecting invalid timesteps
    pub fn try_new(timestep: f64) -> SteeringResult<Self> {
        if timestep > 0.0 && timestep.is_finite() {
            Ok(FixedStep { timestep, ticks: 0 })
        } else {
            Err(SteeringError::InvalidTimestep(timestep))
        }
    }

    /// Get the timestep
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Number of ticks elapsed
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total simulated time
    pub fn total_time(&self) -> f64 {
        self.ticks as f64 * self.timestep
    }
}

impl Clock for FixedStep {
    fn elapsed_since_last_tick(&mut self) -> f64 {
        self.ticks += 1;
        self.timestep
    }
}
