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
//! The steering policy extension point

use crate::steering::primitives::Steering;

/// Decides which primitives an agent runs each tick, in what order and with
/// what weights
///
/// This is the only extension surface: every concrete agent kind is a policy
/// over the same primitive set. Policies may keep state of their own (a
/// target, a quarry) and are free to change it between ticks.
///
/// Closures taking `&mut Steering` are policies too, which is handy for
/// one-off agents and tests.
///
/// # Example
///
/// ```rust
/// use steering_engine::steering::{Steering, SteeringPolicy, DEFAULT_WEIGHT};
///
/// struct Grazer;
///
/// impl SteeringPolicy for Grazer {
///     fn compose_forces(&mut self, steering: &mut Steering<'_>) {
///         steering.wander(DEFAULT_WEIGHT);
///         steering.stay_in_bounds(2.0);
///         steering.avoid_all_obstacles();
///     }
///
///     fn name(&self) -> &str {
///         "grazer"
///     }
/// }
/// ```
pub trait SteeringPolicy: Send {
    /// Invoke zero or more primitives on `steering`
    fn compose_forces(&mut self, steering: &mut Steering<'_>);

    /// Get a descriptive name for this policy
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> SteeringPolicy for F
where
    F: FnMut(&mut Steering<'_>) + Send,
{
    fn compose_forces(&mut self, steering: &mut Steering<'_>) {
        self(steering)
    }
}
