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
//! Steering agents and the per-tick cycle
//!
//! Every tick runs the same cycle:
//!
//! 1. **Reset**: the force accumulator is zeroed
//! 2. **Compose**: the agent's [`SteeringPolicy`] invokes primitives
//! 3. **Clamp**: the sum is capped at `max_force`, direction preserved
//! 4. **Apply**: the clamped force is handed to the body
//! 5. **Discard**: nothing carries over except the wander angle
//!
//! [`Agent::compute_force`] stops after step 3 so drivers can defer step 4
//! until every agent in a population has been computed.

use crate::body::{KinematicBody, KinematicState};
use crate::error::SteeringResult;
use crate::math::Vector3;
use crate::params::SteeringParams;
use crate::random::{SeededRandom, WanderRandom};
use crate::steering::{ForceAccumulator, Steering, SteeringPolicy};
use crate::world::WorldRegistry;
use std::fmt;
use tracing::trace;

/// Index of an agent within a population snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(usize);

impl AgentId {
    /// Create an id from a raw index
    pub fn new(index: usize) -> Self {
        AgentId(index)
    }

    /// Get the raw index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent({})", self.0)
    }
}

/// An autonomous agent: tuning, wander state, random source, accumulator and policy
///
/// All of these are exclusive to the agent, so agents can be ticked in
/// parallel as long as they read a shared, unchanging population snapshot.
///
/// # Examples
///
/// ```
/// use steering_engine::agent::Agent;
/// use steering_engine::body::PointMass;
/// use steering_engine::math::Vector3;
/// use steering_engine::params::SteeringParams;
/// use steering_engine::steering::Steering;
/// use steering_engine::world::{Arena, Bounds};
///
/// let arena = Arena::new(Bounds::planar(-10.0, -10.0, 10.0, 10.0).unwrap());
/// let mut body = PointMass::new(Vector3::zero());
/// let mut agent = Agent::new(
///     SteeringParams::default(),
///     |s: &mut Steering<'_>| s.seek(Vector3::new(10.0, 0.0, 0.0), 1.0),
/// )
/// .unwrap();
///
/// let force = agent.tick(&mut body, &arena, &[], 1.0 / 60.0);
/// assert_eq!(force, Vector3::new(5.0, 0.0, 0.0));
/// ```
pub struct Agent {
    params: SteeringParams,
    wander_angle: f64,
    random: Box<dyn WanderRandom>,
    accumulator: ForceAccumulator,
    policy: Box<dyn SteeringPolicy>,
    last_force: Vector3,
}

impl Agent {
    /// Create an agent, rejecting invalid tuning parameters
    ///
    /// The random source defaults to [`SeededRandom`] with seed 0; use
    /// [`Agent::with_seed`] or [`Agent::with_random`] to vary it.
    pub fn new<P: SteeringPolicy + 'static>(params: SteeringParams, policy: P) -> SteeringResult<Self> {
        params.validate()?;
        Ok(Agent {
            params,
            wander_angle: 0.0,
            random: Box::new(SeededRandom::new(0)),
            accumulator: ForceAccumulator::new(),
            policy: Box::new(policy),
            last_force: Vector3::zero(),
        })
    }

    /// Reseed the random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random = Box::new(SeededRandom::new(seed));
        self
    }

    /// Replace the random source
    pub fn with_random<R: WanderRandom + 'static>(mut self, random: R) -> Self {
        self.random = Box::new(random);
        self
    }

    /// Start wandering from a given angle (degrees), clamped to the wander bounds
    pub fn with_wander_angle(mut self, degrees: f64) -> Self {
        let limit = self.params.max_wander_angle;
        if degrees.is_finite() {
            self.wander_angle = degrees.clamp(-limit, limit);
        }
        self
    }

    /// Get the tuning parameters
    pub fn params(&self) -> &SteeringParams {
        &self.params
    }

    /// Replace the tuning parameters between ticks
    ///
    /// The wander angle is re-clamped to the new bounds.
    pub fn set_params(&mut self, params: SteeringParams) -> SteeringResult<()> {
        params.validate()?;
        let limit = params.max_wander_angle;
        self.wander_angle = self.wander_angle.clamp(-limit, limit);
        self.params = params;
        Ok(())
    }

    /// Current wander angle in degrees
    pub fn wander_angle(&self) -> f64 {
        self.wander_angle
    }

    /// The force produced by the most recent tick
    pub fn last_force(&self) -> Vector3 {
        self.last_force
    }

    /// Get the policy
    pub fn policy(&self) -> &dyn SteeringPolicy {
        self.policy.as_ref()
    }

    /// Get the policy mutably, e.g. to retarget it between ticks
    pub fn policy_mut(&mut self) -> &mut dyn SteeringPolicy {
        self.policy.as_mut()
    }

    /// Silence warnings about dropped non-finite contributions
    pub fn set_warn_on_invalid(&mut self, warn: bool) {
        self.accumulator.warn_on_invalid = warn;
    }

    /// Run the policy against `state` and return the clamped force without applying it
    ///
    /// `neighbors` is the population snapshot for this tick and may include
    /// the agent itself.
    pub fn compute_force(
        &mut self,
        state: &KinematicState,
        world: &dyn WorldRegistry,
        neighbors: &[KinematicState],
        dt: f64,
    ) -> Vector3 {
        self.accumulator.reset();

        {
            let mut steering = Steering::new(
                *state,
                &self.params,
                &mut self.wander_angle,
                self.random.as_mut(),
                &mut self.accumulator,
                world,
                neighbors,
                dt,
            );
            self.policy.compose_forces(&mut steering);
        }

        let contributions = self.accumulator.contribution_count();
        let raw = self.accumulator.total();
        let force = self.accumulator.take_clamped(self.params.max_force);

        trace!(
            policy = self.policy.name(),
            contributions,
            raw_magnitude = raw.magnitude(),
            applied_magnitude = force.magnitude(),
            "composed steering force"
        );

        self.last_force = force;
        force
    }

    /// Run one full tick against `body` and return the force applied to it
    pub fn tick<B: KinematicBody + ?Sized>(
        &mut self,
        body: &mut B,
        world: &dyn WorldRegistry,
        neighbors: &[KinematicState],
        dt: f64,
    ) -> Vector3 {
        let state = KinematicState::capture(body);
        let force = self.compute_force(&state, world, neighbors, dt);
        body.apply_force(force);
        force
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("policy", &self.policy.name())
            .field("params", &self.params)
            .field("wander_angle", &self.wander_angle)
            .field("last_force", &self.last_force)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Kinematic, PointMass};
    use crate::error::SteeringError;
    use crate::world::{Arena, Bounds};

    fn arena() -> Arena {
        Arena::new(Bounds::planar(-10.0, -10.0, 10.0, 10.0).unwrap())
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = SteeringParams::default().with_max_force(-1.0);
        let result = Agent::new(params, |_: &mut Steering<'_>| {});
        assert!(matches!(result, Err(SteeringError::InvalidParameter { .. })));
    }

    #[test]
    fn test_tick_clamps_and_applies() {
        let params = SteeringParams::default().with_max_force(2.0);
        let mut agent = Agent::new(params, |s: &mut Steering<'_>| {
            s.seek(Vector3::new(10.0, 0.0, 0.0), 1.0);
            s.seek(Vector3::new(10.0, 0.0, 0.0), 1.0);
        })
        .unwrap();
        let mut body = PointMass::new(Vector3::zero());

        let force = agent.tick(&mut body, &arena(), &[], 0.1);
        assert!((force.x - 2.0).abs() < 1e-12);
        assert_eq!(body.pending_force(), force);
        assert_eq!(agent.last_force(), force);
    }

    #[test]
    fn test_accumulator_discarded_between_ticks() {
        let mut agent = Agent::new(SteeringParams::default(), |s: &mut Steering<'_>| {
            s.add_force(Vector3::new(1.0, 0.0, 0.0), 1.0);
        })
        .unwrap();
        let state = KinematicState::default();

        let first = agent.compute_force(&state, &arena(), &[], 0.1);
        let second = agent.compute_force(&state, &arena(), &[], 0.1);
        assert_eq!(first, second);
        assert_eq!(second, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_policy_applies_zero() {
        let mut agent = Agent::new(SteeringParams::default(), |_: &mut Steering<'_>| {}).unwrap();
        let mut body = PointMass::new(Vector3::zero()).with_velocity(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(agent.tick(&mut body, &arena(), &[], 0.1), Vector3::zero());
    }

    #[test]
    fn test_policy_reads_tick_start_state() {
        let mut agent = Agent::new(SteeringParams::default(), |s: &mut Steering<'_>| {
            s.seek(Vector3::new(0.0, 10.0, 0.0), 1.0);
            // the second primitive sees the same velocity as the first
            s.seek(Vector3::new(0.0, 10.0, 0.0), 1.0);
        })
        .unwrap();
        let mut body = PointMass::new(Vector3::zero()).with_velocity(Vector3::new(1.0, 0.0, 0.0));

        let force = agent.tick(&mut body, &arena(), &[], 0.1);
        // 2 * ((0,5,0) - (1,0,0)) = (-2, 10, 0), clamped to 5
        let expected = Vector3::new(-2.0, 10.0, 0.0).clamp_magnitude(5.0);
        assert!((force - expected).magnitude() < 1e-12);
        assert_eq!(body.velocity(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_wander_angle_persists() {
        let params = SteeringParams::default().with_wander(30.0, 100.0);
        let mut agent = Agent::new(params, |s: &mut Steering<'_>| s.wander(1.0))
            .unwrap()
            .with_seed(9);
        let state = KinematicState::new(Vector3::zero(), Vector3::zero(), Vector3::new(1.0, 0.0, 0.0), 0.5);

        let mut moved = false;
        for _ in 0..20 {
            agent.compute_force(&state, &arena(), &[], 0.1);
            moved |= agent.wander_angle() != 0.0;
            assert!(agent.wander_angle().abs() <= 30.0);
        }
        assert!(moved);
    }

    #[test]
    fn test_set_params_reclamps_wander() {
        let mut agent = Agent::new(SteeringParams::default(), |_: &mut Steering<'_>| {})
            .unwrap()
            .with_wander_angle(40.0);
        assert_eq!(agent.wander_angle(), 40.0);

        agent
            .set_params(SteeringParams::default().with_wander(10.0, 10.0))
            .unwrap();
        assert_eq!(agent.wander_angle(), 10.0);

        assert!(agent.set_params(SteeringParams::default().with_vision(1.0, 200.0)).is_err());
        assert_eq!(agent.params().max_wander_angle, 10.0);
    }
}
