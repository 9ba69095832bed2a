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
//! # Steering Engine
//!
//! A steering-behaviours kernel for autonomous agents: seek, flee, wander,
//! pursuit, evasion, flocking and obstacle avoidance, composed into a single
//! clamped force per agent per tick.
//!
//! ## Features
//!
//! - **Steering Primitives**: Reynolds-style behaviours as weighted force contributions
//! - **Force Accumulation**: Per-tick summing and clamping to `max_force`
//! - **Policies**: One extension trait decides which primitives an agent runs
//! - **Snapshot Stepping**: Population driver that never lets agents see each other's post-tick state
//! - **Parallelization**: Optional Rayon integration for computing agents concurrently
//! - **Scenarios**: TOML configuration for worlds and populations
//!
//! ## Example
//!
//! ```rust
//! use steering_engine::{Agent, Steering, SteeringParams, Vector3};
//! use steering_engine::body::PointMass;
//! use steering_engine::world::{Arena, Bounds};
//!
//! let arena = Arena::new(Bounds::planar(-10.0, -10.0, 10.0, 10.0).unwrap());
//! let mut body = PointMass::new(Vector3::zero());
//! let mut agent = Agent::new(SteeringParams::default(), |s: &mut Steering<'_>| {
//!     s.seek(Vector3::new(5.0, 5.0, 0.0), 1.0);
//!     s.stay_in_bounds(2.0);
//! })
//! .unwrap();
//!
//! agent.tick(&mut body, &arena, &[], 1.0 / 60.0);
//! assert!(body.integrate(1.0 / 60.0));
//! ```

#![warn(missing_docs)]

/// Vector arithmetic
pub mod math;

/// Error types
pub mod error;

/// Per-agent tuning parameters
pub mod params;

/// Kinematic bodies and the reference point mass
pub mod body;

/// World bounds, obstacles and the reference arena
pub mod world;

/// Wander randomness
pub mod random;

/// Time sources
pub mod clock;

/// Steering primitives, visibility, accumulation and policies
pub mod steering;

/// Agents and the tick cycle
pub mod agent;

/// Bundled steering policies
pub mod behaviours;

/// Population driver
pub mod simulation;

/// Scenario configuration
pub mod config;

pub use agent::{Agent, AgentId};
pub use error::{SteeringError, SteeringResult};
pub use math::Vector3;
pub use params::SteeringParams;
pub use simulation::Simulation;
pub use steering::{Steering, SteeringPolicy};
