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
//! Kinematic bodies
//!
//! The steering core never integrates motion itself. It reads an agent's
//! kinematic state through [`Kinematic`] and hands the final force to a
//! [`KinematicBody`]. [`PointMass`] is a small reference body using
//! semi-implicit Euler integration for hosts that have no physics of their own.

use crate::error::{SteeringError, SteeringResult};
use crate::math::Vector3;
use tracing::warn;

/// Read-only view of something that moves
///
/// Steering primitives that look at other agents (pursuit, flocking) are
/// generic over this trait, so neighbours can be live bodies or snapshots.
pub trait Kinematic {
    /// Current position
    fn position(&self) -> Vector3;

    /// Current velocity
    fn velocity(&self) -> Vector3;

    /// Heading; need not be unit length
    fn forward(&self) -> Vector3;

    /// Right-hand direction relative to the heading
    fn right(&self) -> Vector3;

    /// Collision radius
    fn radius(&self) -> f64;

    /// Where this body will be after `look_ahead` time units at its current velocity
    fn future_position(&self, look_ahead: f64) -> Vector3 {
        self.position() + self.velocity() * look_ahead
    }
}

/// A body that accepts the steering force computed each tick
pub trait KinematicBody: Kinematic {
    /// Apply an external force for the current tick
    fn apply_force(&mut self, force: Vector3);
}

/// Copy of a body's kinematic state at one instant
///
/// Population drivers snapshot every body before computing forces so that no
/// agent observes another agent's post-tick state within the same step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicState {
    /// Position
    pub position: Vector3,
    /// Velocity
    pub velocity: Vector3,
    /// Heading
    pub forward: Vector3,
    /// Right-hand direction
    pub right: Vector3,
    /// Collision radius
    pub radius: f64,
}

impl KinematicState {
    /// Create a state on the xy plane whose right direction is derived from `forward`
    pub fn new(position: Vector3, velocity: Vector3, forward: Vector3, radius: f64) -> Self {
        KinematicState {
            position,
            velocity,
            forward,
            right: forward.right_of(),
            radius,
        }
    }

    /// Capture the current state of any kinematic view
    pub fn capture<K: Kinematic + ?Sized>(body: &K) -> Self {
        KinematicState {
            position: body.position(),
            velocity: body.velocity(),
            forward: body.forward(),
            right: body.right(),
            radius: body.radius(),
        }
    }
}

impl Kinematic for KinematicState {
    fn position(&self) -> Vector3 {
        self.position
    }

    fn velocity(&self) -> Vector3 {
        self.velocity
    }

    fn forward(&self) -> Vector3 {
        self.forward
    }

    fn right(&self) -> Vector3 {
        self.right
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

/// Mass with special handling for zero or near-zero values
///
/// # Examples
///
/// ```
/// use steering_engine::body::Mass;
///
/// let mass = Mass::new(2.0);
/// assert_eq!(mass.inverse(), 0.5);
/// assert!(Mass::immovable().is_immovable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    value: f64,
}

impl Mass {
    /// Threshold below which mass is considered effectively zero (immovable)
    pub const IMMOVABLE_THRESHOLD: f64 = 1e-10;

    /// Create a new mass
    ///
    /// # Panics
    ///
    /// Panics if the mass is negative or not finite. Use `try_new` for
    /// fallible construction.
    pub fn new(value: f64) -> Self {
        assert!(value >= 0.0 && value.is_finite(), "Mass must be non-negative and finite");
        Mass { value }
    }

    /// Try to create a new mass
    pub fn try_new(value: f64) -> SteeringResult<Self> {
        if value >= 0.0 && value.is_finite() {
            Ok(Mass { value })
        } else {
            Err(SteeringError::InvalidMass(value))
        }
    }

    /// A mass that never moves under force
    pub fn immovable() -> Self {
        Mass { value: 0.0 }
    }

    /// Get the mass value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Check if this is an immovable body (zero or near-zero mass)
    pub fn is_immovable(&self) -> bool {
        self.value < Self::IMMOVABLE_THRESHOLD
    }

    /// Inverse mass, 0.0 for immovable bodies
    pub fn inverse(&self) -> f64 {
        if self.is_immovable() {
            0.0
        } else {
            1.0 / self.value
        }
    }
}

impl Default for Mass {
    fn default() -> Self {
        Mass::new(1.0)
    }
}

/// Reference point-mass body
///
/// Forces applied during a tick are summed and consumed by [`PointMass::integrate`]:
///
/// - a = F/m
/// - v' = v + a*dt
/// - p' = p + v'*dt
///
/// The heading follows the velocity while the body is moving and keeps its
/// last value when it stops. Speed is not capped here.
#[derive(Debug, Clone)]
pub struct PointMass {
    position: Vector3,
    velocity: Vector3,
    forward: Vector3,
    radius: f64,
    mass: Mass,
    pending_force: Vector3,
    /// Whether to log warnings when integration produces invalid state
    pub warn_on_invalid: bool,
}

impl PointMass {
    /// Create a unit-mass body at `position` facing +x
    pub fn new(position: Vector3) -> Self {
        PointMass {
            position,
            velocity: Vector3::zero(),
            forward: Vector3::new(1.0, 0.0, 0.0),
            radius: 0.5,
            mass: Mass::default(),
            pending_force: Vector3::zero(),
            warn_on_invalid: true,
        }
    }

    /// Set the initial velocity; a moving body faces along it
    pub fn with_velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        if let Some(heading) = velocity.try_normalize() {
            self.forward = heading;
        }
        self
    }

    /// Set the collision radius
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the mass
    pub fn with_mass(mut self, mass: Mass) -> Self {
        self.mass = mass;
        self
    }

    /// Get the mass
    pub fn mass(&self) -> Mass {
        self.mass
    }

    /// Force applied since the last integration
    pub fn pending_force(&self) -> Vector3 {
        self.pending_force
    }

    /// Advance the body by `dt`, consuming the pending force
    ///
    /// Returns false when the body did not move: it is immovable, or the step
    /// produced non-finite state (in which case the previous state is kept).
    pub fn integrate(&mut self, dt: f64) -> bool {
        let force = std::mem::take(&mut self.pending_force);

        if self.mass.is_immovable() {
            return false;
        }

        let acceleration = force * self.mass.inverse();
        let velocity = self.velocity + acceleration * dt;
        let position = self.position + velocity * dt;

        if !velocity.is_valid() || !position.is_valid() {
            if self.warn_on_invalid {
                warn!(?force, dt, "integration produced invalid state, keeping previous state");
            }
            return false;
        }

        self.velocity = velocity;
        self.position = position;
        if let Some(heading) = velocity.try_normalize() {
            self.forward = heading;
        }

        true
    }
}

impl Kinematic for PointMass {
    fn position(&self) -> Vector3 {
        self.position
    }

    fn velocity(&self) -> Vector3 {
        self.velocity
    }

    fn forward(&self) -> Vector3 {
        self.forward
    }

    fn right(&self) -> Vector3 {
        self.forward.right_of()
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

impl KinematicBody for PointMass {
    fn apply_force(&mut self, force: Vector3) {
        self.pending_force += force;
    }
}
