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
//! Population driver
//!
//! [`Simulation`] owns an [`Arena`], a set of agents and one [`PointMass`]
//! body per agent. Each step runs in three phases:
//!
//! 1. **Snapshot**: every body's kinematic state is copied
//! 2. **Compute**: every agent composes its force against the snapshot
//! 3. **Apply**: forces are applied and bodies integrated
//!
//! No agent sees another agent's post-step state during phase 2, so the
//! compute phase runs in parallel with Rayon when the `parallel` feature is
//! enabled. Every agent owns its random source, so the parallel and
//! sequential paths produce identical results.

use crate::agent::{Agent, AgentId};
use crate::body::{Kinematic, KinematicBody, KinematicState, PointMass};
use crate::clock::{Clock, FixedStep};
use crate::error::{SteeringError, SteeringResult};
use crate::math::Vector3;
use crate::random::SeededRandom;
use crate::world::Arena;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A population of agents stepping through a shared arena
///
/// # Examples
///
/// ```
/// use steering_engine::behaviours::Seeker;
/// use steering_engine::body::{Kinematic, PointMass};
/// use steering_engine::clock::FixedStep;
/// use steering_engine::math::Vector3;
/// use steering_engine::params::SteeringParams;
/// use steering_engine::simulation::Simulation;
/// use steering_engine::world::{Arena, Bounds};
/// use steering_engine::Agent;
///
/// let arena = Arena::new(Bounds::planar(-20.0, -20.0, 20.0, 20.0).unwrap());
/// let mut sim = Simulation::new(arena, FixedStep::new(0.1), 7);
///
/// let agent = Agent::new(SteeringParams::default(), Seeker::new(Vector3::new(10.0, 0.0, 0.0))).unwrap();
/// let id = sim.spawn(agent, PointMass::new(Vector3::zero()));
///
/// sim.run(10);
/// assert!(sim.body(id).unwrap().position().x > 0.0);
/// ```
pub struct Simulation<C: Clock = FixedStep> {
    arena: Arena,
    clock: C,
    seed: u64,
    agents: Vec<Agent>,
    bodies: Vec<PointMass>,
    snapshot: Vec<KinematicState>,
    forces: Vec<Vector3>,
    steps: u64,
    elapsed: f64,
}

impl<C: Clock> Simulation<C> {
    /// Create an empty simulation
    ///
    /// `seed` is mixed with each agent's index to seed its wander source.
    pub fn new(arena: Arena, clock: C, seed: u64) -> Self {
        Simulation {
            arena,
            clock,
            seed,
            agents: Vec::new(),
            bodies: Vec::new(),
            snapshot: Vec::new(),
            forces: Vec::new(),
            steps: 0,
            elapsed: 0.0,
        }
    }

    /// Add an agent driving `body`, returning its id
    ///
    /// The agent's random source is replaced with one derived from the
    /// simulation seed and the new id, so runs are reproducible.
    pub fn spawn(&mut self, agent: Agent, body: PointMass) -> AgentId {
        let id = AgentId::new(self.agents.len());
        let random = SeededRandom::for_agent(self.seed, id.index());
        self.agents.push(agent.with_random(random));
        self.bodies.push(body);
        id
    }

    /// Advance every agent by one clock tick
    ///
    /// Returns the timestep used.
    pub fn step(&mut self) -> f64 {
        let dt = self.clock.elapsed_since_last_tick();

        self.snapshot.clear();
        self.snapshot
            .extend(self.bodies.iter().map(|body| KinematicState::capture(body)));

        self.compute_forces(dt);

        let mut moved = 0usize;
        for (body, force) in self.bodies.iter_mut().zip(&self.forces) {
            body.apply_force(*force);
            if body.integrate(dt) {
                moved += 1;
            }
        }

        self.steps += 1;
        self.elapsed += dt;

        debug!(
            step = self.steps,
            dt,
            agents = self.agents.len(),
            moved,
            "simulation step complete"
        );

        dt
    }

    /// Run `steps` consecutive steps
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    fn compute_forces(&mut self, dt: f64) {
        let world = &self.arena;
        let snapshot = &self.snapshot;

        #[cfg(feature = "parallel")]
        {
            self.agents
                .par_iter_mut()
                .zip(snapshot.par_iter())
                .map(|(agent, state)| agent.compute_force(state, world, snapshot, dt))
                .collect_into_vec(&mut self.forces);
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.forces.clear();
            self.forces.extend(
                self.agents
                    .iter_mut()
                    .zip(snapshot.iter())
                    .map(|(agent, state)| agent.compute_force(state, world, snapshot, dt)),
            );
        }
    }

    /// Get the arena
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Get the arena mutably, e.g. to add or remove obstacles between steps
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Get the clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Get the seed agents' random sources are derived from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of agents
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Number of completed steps
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Total simulated time
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Look up an agent
    pub fn agent(&self, id: AgentId) -> SteeringResult<&Agent> {
        self.agents
            .get(id.index())
            .ok_or(SteeringError::AgentNotFound(id.index()))
    }

    /// Look up an agent mutably
    pub fn agent_mut(&mut self, id: AgentId) -> SteeringResult<&mut Agent> {
        self.agents
            .get_mut(id.index())
            .ok_or(SteeringError::AgentNotFound(id.index()))
    }

    /// Look up an agent's body
    pub fn body(&self, id: AgentId) -> SteeringResult<&PointMass> {
        self.bodies
            .get(id.index())
            .ok_or(SteeringError::AgentNotFound(id.index()))
    }

    /// Look up an agent's body mutably
    pub fn body_mut(&mut self, id: AgentId) -> SteeringResult<&mut PointMass> {
        self.bodies
            .get_mut(id.index())
            .ok_or(SteeringError::AgentNotFound(id.index()))
    }

    /// All bodies, indexed by [`AgentId`]
    pub fn bodies(&self) -> &[PointMass] {
        &self.bodies
    }

    /// The snapshot the most recent step computed against
    pub fn snapshot(&self) -> &[KinematicState] {
        &self.snapshot
    }

    /// Forces applied in the most recent step, indexed by [`AgentId`]
    pub fn last_forces(&self) -> &[Vector3] {
        &self.forces
    }

    /// Mean position of every body, or `None` when empty
    pub fn centroid(&self) -> Option<Vector3> {
        if self.bodies.is_empty() {
            return None;
        }
        let sum = self
            .bodies
            .iter()
            .fold(Vector3::zero(), |acc, body| acc + body.position());
        Some(sum / self.bodies.len() as f64)
    }
}

impl<C: Clock> std::fmt::Debug for Simulation<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("agents", &self.agents.len())
            .field("obstacles", &self.arena.obstacle_count())
            .field("seed", &self.seed)
            .field("steps", &self.steps)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}
