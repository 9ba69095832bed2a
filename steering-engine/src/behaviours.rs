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
//! Ready-made steering policies
//!
//! Each policy is a small recipe over the primitives. All of them keep the
//! agent inside the world and out of obstacles; they differ in what they
//! chase. Hosts with other needs implement [`SteeringPolicy`] directly.

use crate::agent::AgentId;
use crate::math::Vector3;
use crate::steering::{Steering, SteeringPolicy, DEFAULT_LOOK_AHEAD, DEFAULT_WEIGHT};
use tracing::trace;

/// Weight given to returning inside the world bounds
pub const DEFAULT_BOUNDS_WEIGHT: f64 = 3.0;

/// Aimless, smooth wandering
#[derive(Debug, Clone, PartialEq)]
pub struct Wanderer {
    /// Weight of the wander primitive
    pub wander_weight: f64,
    /// Weight of bounds containment
    pub bounds_weight: f64,
}

impl Default for Wanderer {
    fn default() -> Self {
        Wanderer {
            wander_weight: DEFAULT_WEIGHT,
            bounds_weight: DEFAULT_BOUNDS_WEIGHT,
        }
    }
}

impl SteeringPolicy for Wanderer {
    fn compose_forces(&mut self, steering: &mut Steering<'_>) {
        steering.wander(self.wander_weight);
        steering.stay_in_bounds(self.bounds_weight);
        steering.avoid_all_obstacles();
    }

    fn name(&self) -> &str {
        "wanderer"
    }
}

/// Heads for a fixed point, optionally slowing down on arrival
#[derive(Debug, Clone, PartialEq)]
pub struct Seeker {
    target: Vector3,
    arrive: bool,
    /// Weight of the seek/arrive primitive
    pub weight: f64,
}

impl Seeker {
    /// Seek `target` at full speed
    pub fn new(target: Vector3) -> Self {
        Seeker {
            target,
            arrive: false,
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Slow down inside the agent's arrive distance
    pub fn arriving(mut self) -> Self {
        self.arrive = true;
        self
    }

    /// Get the target
    pub fn target(&self) -> Vector3 {
        self.target
    }

    /// Move the target
    pub fn set_target(&mut self, target: Vector3) {
        self.target = target;
    }
}

impl SteeringPolicy for Seeker {
    fn compose_forces(&mut self, steering: &mut Steering<'_>) {
        if self.arrive {
            steering.arrive(self.target, self.weight);
        } else {
            steering.seek(self.target, self.weight);
        }
        steering.avoid_all_obstacles();
    }

    fn name(&self) -> &str {
        "seeker"
    }
}

/// Chases another agent's predicted position, wandering when it is gone
#[derive(Debug, Clone, PartialEq)]
pub struct Pursuer {
    quarry: AgentId,
    /// How far ahead to predict the quarry
    pub look_ahead: f64,
    /// Weight of the pursuit primitive
    pub weight: f64,
}

impl Pursuer {
    /// Pursue the agent with id `quarry`
    pub fn new(quarry: AgentId) -> Self {
        Pursuer {
            quarry,
            look_ahead: DEFAULT_LOOK_AHEAD,
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Get the quarry
    pub fn quarry(&self) -> AgentId {
        self.quarry
    }

    /// Switch to another quarry
    pub fn set_quarry(&mut self, quarry: AgentId) {
        self.quarry = quarry;
    }
}

impl SteeringPolicy for Pursuer {
    fn compose_forces(&mut self, steering: &mut Steering<'_>) {
        match steering.neighbor(self.quarry) {
            Some(quarry) => steering.pursue(quarry, self.look_ahead, self.weight),
            None => {
                trace!(quarry = %self.quarry, "quarry missing from snapshot, wandering");
                steering.wander(DEFAULT_WEIGHT);
            }
        }
        steering.stay_in_bounds(DEFAULT_BOUNDS_WEIGHT);
        steering.avoid_all_obstacles();
    }

    fn name(&self) -> &str {
        "pursuer"
    }
}

/// Runs from another agent's predicted position once it comes close
#[derive(Debug, Clone, PartialEq)]
pub struct Evader {
    threat: AgentId,
    /// Threats further away than this are ignored and the evader wanders
    ///
    /// A negative or non-finite distance never triggers evasion.
    pub panic_distance: f64,
    /// How far ahead to predict the threat
    pub look_ahead: f64,
    /// Weight of the evasion primitive
    pub weight: f64,
}

impl Evader {
    /// Evade the agent with id `threat` whenever it is within `panic_distance`
    pub fn new(threat: AgentId, panic_distance: f64) -> Self {
        Evader {
            threat,
            panic_distance,
            look_ahead: DEFAULT_LOOK_AHEAD,
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Get the threat
    pub fn threat(&self) -> AgentId {
        self.threat
    }
}

impl SteeringPolicy for Evader {
    fn compose_forces(&mut self, steering: &mut Steering<'_>) {
        let panic = self.panic_distance;
        let armed = panic > 0.0 && panic.is_finite();
        let position = steering.state().position;

        match steering.neighbor(self.threat) {
            Some(threat) if armed && threat.position.distance_squared(position) < panic * panic => {
                steering.evade(threat, self.look_ahead, self.weight);
            }
            _ => steering.wander(DEFAULT_WEIGHT),
        }
        steering.stay_in_bounds(DEFAULT_BOUNDS_WEIGHT);
        steering.avoid_all_obstacles();
    }

    fn name(&self) -> &str {
        "evader"
    }
}

/// Boids-style flocking with the rest of the population
#[derive(Debug, Clone, PartialEq)]
pub struct Flocker {
    /// Weight of cohesion
    pub cohere_weight: f64,
    /// Weight of alignment
    pub align_weight: f64,
    /// Weight of wandering, zero to disable
    pub wander_weight: f64,
    /// Weight of bounds containment
    pub bounds_weight: f64,
}

impl Default for Flocker {
    fn default() -> Self {
        Flocker {
            cohere_weight: DEFAULT_WEIGHT,
            align_weight: DEFAULT_WEIGHT,
            wander_weight: 0.5,
            bounds_weight: DEFAULT_BOUNDS_WEIGHT,
        }
    }
}

impl SteeringPolicy for Flocker {
    fn compose_forces(&mut self, steering: &mut Steering<'_>) {
        let neighbors = steering.neighbors();
        steering.flock(neighbors, self.cohere_weight, self.align_weight);
        if self.wander_weight > 0.0 {
            steering.wander(self.wander_weight);
        }
        steering.stay_in_bounds(self.bounds_weight);
        steering.avoid_all_obstacles();
    }

    fn name(&self) -> &str {
        "flocker"
    }
}
