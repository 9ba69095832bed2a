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
//! Steering primitives
//!
//! Every primitive reads the agent's kinematic state as it was at the start
//! of the tick and adds `weight * force` to the tick's [`ForceAccumulator`].
//! Nothing is returned to the caller; composition happens through the
//! accumulator. Because no primitive sees forces added by another, the order
//! in which a policy invokes them does not change the result.
//!
//! Degenerate geometry (a target on top of the agent, an empty neighbour
//! list, nothing visible) yields no contribution rather than an error.

use crate::agent::AgentId;
use crate::body::{Kinematic, KinematicState};
use crate::math::{Vector3, COINCIDENT_EPSILON};
use crate::params::SteeringParams;
use crate::random::WanderRandom;
use crate::steering::accumulator::ForceAccumulator;
use crate::steering::visibility;
use crate::world::{Obstacle, WorldRegistry};

/// Weight used when a policy has no reason to prefer another
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Look-ahead used by pursuit, evasion and bounds containment
pub const DEFAULT_LOOK_AHEAD: f64 = 1.0;

/// Softening added to squared/forward distances in inverse-distance weights
const DISTANCE_SOFTENING: f64 = 0.1;

/// Everything a steering policy may read and write during one tick
///
/// Built by [`crate::agent::Agent`] at the start of each tick and dropped at
/// the end of it.
pub struct Steering<'a> {
    state: KinematicState,
    params: &'a SteeringParams,
    wander_angle: &'a mut f64,
    random: &'a mut dyn WanderRandom,
    accumulator: &'a mut ForceAccumulator,
    world: &'a dyn WorldRegistry,
    neighbors: &'a [KinematicState],
    dt: f64,
}

impl<'a> Steering<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        state: KinematicState,
        params: &'a SteeringParams,
        wander_angle: &'a mut f64,
        random: &'a mut dyn WanderRandom,
        accumulator: &'a mut ForceAccumulator,
        world: &'a dyn WorldRegistry,
        neighbors: &'a [KinematicState],
        dt: f64,
    ) -> Self {
        Steering {
            state,
            params,
            wander_angle,
            random,
            accumulator,
            world,
            neighbors,
            dt,
        }
    }

    /// The agent's kinematic state at the start of the tick
    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// The agent's tuning parameters
    pub fn params(&self) -> &'a SteeringParams {
        self.params
    }

    /// The world this tick runs in
    pub fn world(&self) -> &'a dyn WorldRegistry {
        self.world
    }

    /// Snapshot of the population this tick, indexed by [`AgentId`]
    ///
    /// The list may contain the agent itself; every neighbour-based primitive
    /// skips coincident entries.
    pub fn neighbors(&self) -> &'a [KinematicState] {
        self.neighbors
    }

    /// Look up one member of the population snapshot
    pub fn neighbor(&self, id: AgentId) -> Option<&'a KinematicState> {
        self.neighbors.get(id.index())
    }

    /// Time elapsed since the previous tick
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Current wander angle in degrees
    pub fn wander_angle(&self) -> f64 {
        *self.wander_angle
    }

    /// Unclamped sum of everything contributed so far this tick
    pub fn accumulated(&self) -> Vector3 {
        self.accumulator.total()
    }

    /// Whether `other` is inside this agent's vision cone and range
    pub fn is_visible<K: Kinematic + ?Sized>(&self, other: &K) -> bool {
        visibility::is_visible(&self.state, other, self.params)
    }

    /// Add an arbitrary force, for policies with behaviour of their own
    pub fn add_force(&mut self, force: Vector3, weight: f64) {
        self.accumulator.add(force, weight);
    }

    /// Steer towards `target` at max speed
    pub fn seek(&mut self, target: Vector3, weight: f64) {
        if let Some(direction) = (target - self.state.position).try_normalize() {
            self.steer_towards(direction * self.params.max_speed, weight);
        }
    }

    /// Steer directly away from `target` at max speed
    pub fn flee(&mut self, target: Vector3, weight: f64) {
        if let Some(direction) = (self.state.position - target).try_normalize() {
            self.steer_towards(direction * self.params.max_speed, weight);
        }
    }

    /// Steer towards `target`, slowing linearly to a stop inside the arrive distance
    pub fn arrive(&mut self, target: Vector3, weight: f64) {
        let offset = target - self.state.position;
        let distance = offset.magnitude();
        if !(distance > 0.0) || !distance.is_finite() {
            return;
        }

        let speed = if distance < self.params.arrive_distance {
            self.params.max_speed * distance / self.params.arrive_distance
        } else {
            self.params.max_speed
        };

        self.steer_towards(offset / distance * speed, weight);
    }

    /// Seek a point slightly off the current heading, drifting randomly over time
    ///
    /// The wander angle changes by at most `max_wander_change_per_second * dt`
    /// per tick and never leaves `[-max_wander_angle, max_wander_angle]`.
    pub fn wander(&mut self, weight: f64) {
        let max_change = self.params.max_wander_change_per_second * self.dt;
        let limit = self.params.max_wander_angle;

        let angle = (*self.wander_angle + self.random.uniform(max_change)).clamp(-limit, limit);
        if angle.is_finite() {
            *self.wander_angle = angle;
        }

        let heading = self.state.forward.normalize_or_zero().rotate_z(*self.wander_angle);
        self.seek(heading + self.state.position, weight);
    }

    /// Head back to the world centre when the position one time unit ahead
    /// leaves the world bounds
    ///
    /// A projection exactly on a bound counts as inside.
    pub fn stay_in_bounds(&mut self, weight: f64) {
        let future = self.state.future_position(DEFAULT_LOOK_AHEAD);
        let min = self.world.min_bounds();
        let max = self.world.max_bounds();

        let outside = future.x > max.x
            || future.x < min.x
            || future.y > max.y
            || future.y < min.y
            || future.z > max.z
            || future.z < min.z;

        if outside {
            self.seek(self.world.center(), weight);
        }
    }

    /// Seek where `other` will be after `look_ahead` time units
    pub fn pursue<K: Kinematic + ?Sized>(&mut self, other: &K, look_ahead: f64, weight: f64) {
        self.seek(other.future_position(look_ahead), weight);
    }

    /// Flee from where `other` will be after `look_ahead` time units
    pub fn evade<K: Kinematic + ?Sized>(&mut self, other: &K, look_ahead: f64, weight: f64) {
        self.flee(other.future_position(look_ahead), weight);
    }

    /// Flee every neighbour inside personal space, harder the closer it is
    ///
    /// Each close neighbour is fled with weight
    /// `personal_space² / (distance² + 0.1)`. Visibility is not consulted.
    pub fn separate<N: Kinematic>(&mut self, neighbors: &[N]) {
        let personal_space_sq = self.params.personal_space * self.params.personal_space;

        for other in neighbors {
            let position = other.position();
            let distance_sq = position.distance_squared(self.state.position);

            if distance_sq < COINCIDENT_EPSILON {
                continue;
            }

            if distance_sq < personal_space_sq {
                let weight = personal_space_sq / (distance_sq + DISTANCE_SOFTENING);
                self.flee(position, weight);
            }
        }
    }

    /// Turn towards the average heading of visible neighbours
    ///
    /// The desired velocity is the unit-length flock heading, not scaled to
    /// max speed.
    pub fn align<N: Kinematic>(&mut self, neighbors: &[N], weight: f64) {
        let mut heading = Vector3::zero();
        for other in neighbors {
            if self.is_visible(other) {
                heading += other.forward();
            }
        }

        if heading.is_zero() {
            return;
        }

        if let Some(heading) = heading.try_normalize() {
            self.steer_towards(heading, weight);
        }
    }

    /// Seek the centre of visible neighbours
    pub fn cohere<N: Kinematic>(&mut self, neighbors: &[N], weight: f64) {
        let mut center = Vector3::zero();
        let mut visible = 0usize;

        for other in neighbors {
            if self.is_visible(other) {
                center += other.position();
                visible += 1;
            }
        }

        if visible == 0 {
            return;
        }

        self.seek(center / visible as f64, weight);
    }

    /// Separation, cohesion and alignment, in that order
    pub fn flock<N: Kinematic>(&mut self, neighbors: &[N], cohere_weight: f64, align_weight: f64) {
        self.separate(neighbors);
        self.cohere(neighbors, cohere_weight);
        self.align(neighbors, align_weight);
    }

    /// Sidestep every obstacle in the world that lies on the current heading
    pub fn avoid_all_obstacles(&mut self) {
        let world = self.world;
        for obstacle in world.obstacles() {
            self.avoid_obstacle(obstacle);
        }
    }

    /// Sidestep one obstacle ahead of the agent
    ///
    /// Weight is `vision_range / (forward_distance + 0.1)` and cannot be
    /// scaled by the caller. Agents without a heading do not avoid.
    fn avoid_obstacle(&mut self, obstacle: &Obstacle) {
        let (forward, right) = match (
            self.state.forward.try_normalize(),
            self.state.right.try_normalize(),
        ) {
            (Some(forward), Some(right)) => (forward, right),
            _ => return,
        };

        let to_obstacle = obstacle.position - self.state.position;

        let forward_distance = forward.dot(to_obstacle);
        if forward_distance < 0.0 {
            return;
        }

        let lateral = right.dot(to_obstacle);
        if lateral.abs() > self.state.radius + obstacle.radius {
            return;
        }

        if forward_distance > self.params.vision_range {
            return;
        }

        // steer left of obstacles on the right, right of everything else
        let desired = if lateral > 0.0 {
            right * -self.params.max_speed
        } else {
            right * self.params.max_speed
        };

        let weight = self.params.vision_range / (forward_distance + DISTANCE_SOFTENING);
        self.steer_towards(desired, weight);
    }

    fn steer_towards(&mut self, desired_velocity: Vector3, weight: f64) {
        self.accumulator
            .add(desired_velocity - self.state.velocity, weight);
    }
}
