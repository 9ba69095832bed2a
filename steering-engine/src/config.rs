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
//! Scenario configuration
//!
//! Loads a whole scenario (seed, timestep, arena, default tuning and an
//! optional population) from TOML so experiments can be adjusted without
//! recompiling. Every field has a default.
//!
//! ```toml
//! seed = 7
//! timestep = 0.05
//!
//! [arena]
//! min = [-20.0, -20.0]
//! max = [20.0, 20.0]
//! obstacles = [{ position = { x = 3.0, y = 0.0, z = 0.0 }, radius = 1.0 }]
//!
//! [params]
//! max_speed = 4.0
//!
//! [[agents]]
//! position = { x = 0.0, y = 0.0, z = 0.0 }
//! behaviour = { kind = "flocker" }
//! ```

use crate::agent::{Agent, AgentId};
use crate::behaviours::{Evader, Flocker, Pursuer, Seeker, Wanderer};
use crate::body::{Mass, PointMass};
use crate::clock::FixedStep;
use crate::error::{SteeringError, SteeringResult};
use crate::math::Vector3;
use crate::params::SteeringParams;
use crate::simulation::Simulation;
use crate::world::{Arena, Bounds, Obstacle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Planar arena description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Minimum x and y
    pub min: [f64; 2],
    /// Maximum x and y
    pub max: [f64; 2],
    /// Point agents return to when leaving the bounds
    pub center: Vector3,
    /// Static obstacles
    pub obstacles: Vec<Obstacle>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            min: [-50.0, -50.0],
            max: [50.0, 50.0],
            center: Vector3::zero(),
            obstacles: Vec::new(),
        }
    }
}

/// Which bundled policy an agent runs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviourConfig {
    /// [`Wanderer`] with default weights
    #[default]
    Wanderer,
    /// [`Seeker`] heading for `target`
    Seeker {
        /// Point to head for
        target: Vector3,
        /// Slow down on arrival
        #[serde(default)]
        arrive: bool,
    },
    /// [`Pursuer`] chasing the agent at index `quarry`
    Pursuer {
        /// Index of the quarry
        quarry: usize,
    },
    /// [`Evader`] fleeing the agent at index `threat`
    Evader {
        /// Index of the threat
        threat: usize,
        /// Distance inside which the threat is fled
        panic_distance: f64,
    },
    /// [`Flocker`] with default weights
    Flocker,
}

impl BehaviourConfig {
    /// Check agent references against a population of `population` agents
    fn validate(&self, population: usize) -> SteeringResult<()> {
        match *self {
            BehaviourConfig::Pursuer { quarry } if quarry >= population => {
                Err(SteeringError::AgentNotFound(quarry))
            }
            BehaviourConfig::Evader { threat, .. } if threat >= population => {
                Err(SteeringError::AgentNotFound(threat))
            }
            BehaviourConfig::Evader { panic_distance, .. }
                if !(panic_distance.is_finite() && panic_distance >= 0.0) =>
            {
                Err(SteeringError::InvalidParameter {
                    name: "panic_distance",
                    value: panic_distance,
                })
            }
            _ => Ok(()),
        }
    }
}

/// One agent to spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Starting position
    pub position: Vector3,
    /// Starting velocity
    #[serde(default)]
    pub velocity: Vector3,
    /// Collision radius
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Body mass
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Policy to run
    #[serde(default)]
    pub behaviour: BehaviourConfig,
    /// Per-agent tuning overriding the scenario's
    #[serde(default)]
    pub params: Option<SteeringParams>,
}

fn default_radius() -> f64 {
    0.5
}

fn default_mass() -> f64 {
    1.0
}

/// A complete scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Global seed for wander randomness
    pub seed: u64,
    /// Fixed simulation timestep
    pub timestep: f64,
    /// World bounds and obstacles
    pub arena: ArenaConfig,
    /// Tuning shared by every agent without its own
    pub params: SteeringParams,
    /// Population
    pub agents: Vec<AgentConfig>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            seed: 0,
            timestep: 1.0 / 60.0,
            arena: ArenaConfig::default(),
            params: SteeringParams::default(),
            agents: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    /// Parse and validate a scenario from TOML text
    pub fn from_toml_str(text: &str) -> SteeringResult<Self> {
        let config: ScenarioConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a scenario file
    pub fn from_file(path: impl AsRef<Path>) -> SteeringResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), agents = config.agents.len(), "loaded scenario");
        Ok(config)
    }

    /// Check every value, including per-agent overrides
    pub fn validate(&self) -> SteeringResult<()> {
        FixedStep::try_new(self.timestep)?;
        self.params.validate()?;
        self.bounds()?;
        for obstacle in &self.arena.obstacles {
            obstacle.validate()?;
        }
        for agent in &self.agents {
            Mass::try_new(agent.mass)?;
            if let Some(params) = &agent.params {
                params.validate()?;
            }
            agent.behaviour.validate(self.agents.len())?;
        }
        Ok(())
    }

    /// The arena's bounds
    pub fn bounds(&self) -> SteeringResult<Bounds> {
        let [min_x, min_y] = self.arena.min;
        let [max_x, max_y] = self.arena.max;
        Bounds::planar(min_x, min_y, max_x, max_y)
    }

    /// Build the arena with its obstacles
    pub fn build_arena(&self) -> SteeringResult<Arena> {
        let mut arena = Arena::new(self.bounds()?).with_center(self.arena.center);
        for obstacle in &self.arena.obstacles {
            arena.add_obstacle(*obstacle)?;
        }
        Ok(arena)
    }

    /// Build a simulation with the configured arena and population
    pub fn build_simulation(&self) -> SteeringResult<Simulation> {
        let clock = FixedStep::try_new(self.timestep)?;
        let mut simulation = Simulation::new(self.build_arena()?, clock, self.seed);

        for spawn in &self.agents {
            let params = spawn.params.clone().unwrap_or_else(|| self.params.clone());
            let agent = match &spawn.behaviour {
                BehaviourConfig::Wanderer => Agent::new(params, Wanderer::default())?,
                BehaviourConfig::Seeker { target, arrive } => {
                    let seeker = Seeker::new(*target);
                    let seeker = if *arrive { seeker.arriving() } else { seeker };
                    Agent::new(params, seeker)?
                }
                BehaviourConfig::Pursuer { quarry } => {
                    Agent::new(params, Pursuer::new(AgentId::new(*quarry)))?
                }
                BehaviourConfig::Evader {
                    threat,
                    panic_distance,
                } => Agent::new(params, Evader::new(AgentId::new(*threat), *panic_distance))?,
                BehaviourConfig::Flocker => Agent::new(params, Flocker::default())?,
            };

            let body = PointMass::new(spawn.position)
                .with_velocity(spawn.velocity)
                .with_radius(spawn.radius)
                .with_mass(Mass::try_new(spawn.mass)?);

            simulation.spawn(agent, body);
        }

        Ok(simulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ObstacleSource;

    const SCENARIO: &str = r#"
seed = 7
timestep = 0.05

[arena]
min = [-20.0, -10.0]
max = [20.0, 10.0]
obstacles = [{ position = { x = 3.0, y = 0.0, z = 0.0 }, radius = 1.0 }]

[params]
max_speed = 4.0

[[agents]]
position = { x = 0.0, y = 0.0, z = 0.0 }
behaviour = { kind = "flocker" }

[[agents]]
position = { x = -5.0, y = 0.0, z = 0.0 }
behaviour = { kind = "pursuer", quarry = 0 }
params = { max_speed = 6.0 }
"#;

    #[test]
    fn test_empty_scenario_uses_defaults() {
        let config = ScenarioConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScenarioConfig::default());
    }

    #[test]
    fn test_parse_scenario() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.timestep, 0.05);
        assert_eq!(config.params.max_speed, 4.0);
        assert_eq!(config.params.max_force, 5.0);
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[0].behaviour, BehaviourConfig::Flocker);
        assert_eq!(config.agents[0].radius, 0.5);
        assert_eq!(config.agents[1].behaviour, BehaviourConfig::Pursuer { quarry: 0 });
    }

    #[test]
    fn test_build_simulation() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        let sim = config.build_simulation().unwrap();

        assert_eq!(sim.agent_count(), 2);
        assert_eq!(sim.seed(), 7);
        assert_eq!(sim.arena().obstacles().len(), 1);
        assert_eq!(sim.arena().bounds().max.y, 10.0);

        let pursuer = sim.agent(AgentId::new(1)).unwrap();
        assert_eq!(pursuer.params().max_speed, 6.0);
        assert_eq!(pursuer.policy().name(), "pursuer");
        let flocker = sim.agent(AgentId::new(0)).unwrap();
        assert_eq!(flocker.params().max_speed, 4.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_timestep = ScenarioConfig::from_toml_str("timestep = 0.0");
        assert!(matches!(bad_timestep, Err(SteeringError::InvalidTimestep(_))));

        let bad_bounds = ScenarioConfig::from_toml_str("[arena]\nmin = [5.0, 0.0]\nmax = [1.0, 1.0]");
        assert!(matches!(bad_bounds, Err(SteeringError::InvalidBounds(_))));

        let bad_cone = ScenarioConfig::from_toml_str("[params]\nvision_cone_angle = 270.0");
        assert!(matches!(bad_cone, Err(SteeringError::VisionConeOutOfRange(_))));

        let bad_mass = ScenarioConfig::from_toml_str(
            "[[agents]]\nposition = { x = 0.0, y = 0.0, z = 0.0 }\nmass = -1.0",
        );
        assert!(matches!(bad_mass, Err(SteeringError::InvalidMass(_))));
    }

    #[test]
    fn test_evader_values_rejected() {
        let evader = |threat: usize, panic: &str| {
            ScenarioConfig::from_toml_str(&format!(
                "[[agents]]\nposition = {{ x = 0.0, y = 0.0, z = 0.0 }}\n\
                 [[agents]]\nposition = {{ x = 1.0, y = 0.0, z = 0.0 }}\n\
                 behaviour = {{ kind = \"evader\", threat = {}, panic_distance = {} }}",
                threat, panic
            ))
        };

        assert!(evader(0, "3.0").is_ok());
        assert!(evader(0, "0.0").is_ok());
        assert!(matches!(
            evader(0, "-3.0"),
            Err(SteeringError::InvalidParameter { name: "panic_distance", .. })
        ));
        assert!(matches!(
            evader(0, "inf"),
            Err(SteeringError::InvalidParameter { name: "panic_distance", .. })
        ));
        assert!(matches!(evader(2, "3.0"), Err(SteeringError::AgentNotFound(2))));
    }

    #[test]
    fn test_pursuer_quarry_out_of_range() {
        let result = ScenarioConfig::from_toml_str(
            "[[agents]]\nposition = { x = 0.0, y = 0.0, z = 0.0 }\nbehaviour = { kind = \"pursuer\", quarry = 5 }",
        );
        assert!(matches!(result, Err(SteeringError::AgentNotFound(5))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = ScenarioConfig::from_toml_str("seed = \"seven\"");
        assert!(matches!(result, Err(SteeringError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ScenarioConfig::from_file("/nonexistent/scenario.toml");
        assert!(matches!(result, Err(SteeringError::Io(_))));
    }
}
