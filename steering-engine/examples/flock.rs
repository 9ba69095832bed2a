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
//! Flocking demo
//!
//! Runs a flock around a few obstacles with one predator chasing the first
//! boid, printing flock statistics as it goes. A TOML scenario can be loaded
//! instead of the built-in one.
//!
//! Usage:
//! ```text
//! cargo run --example flock --release -- --agents 64 --steps 600 --seed 7
//! cargo run --example flock -- --scenario scenario.toml
//! RUST_LOG=steering_engine=debug cargo run --example flock
//! ```

use steering_engine::behaviours::{Flocker, Pursuer};
use steering_engine::body::{Kinematic, Mass, PointMass};
use steering_engine::clock::FixedStep;
use steering_engine::config::ScenarioConfig;
use steering_engine::world::{Arena, Bounds, Obstacle};
use steering_engine::{Agent, AgentId, Simulation, SteeringParams, SteeringResult, Vector3};

/// Demo options
struct DemoConfig {
    agents: usize,
    steps: u64,
    seed: u64,
    output_interval: u64,
    scenario: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            agents: 48,
            steps: 600,
            seed: 7,
            output_interval: 60,
            scenario: None,
        }
    }
}

fn parse_args() -> DemoConfig {
    let mut config = DemoConfig::default();
    let args: Vec<String> = std::env::args().collect();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--agents", Some(v)) => config.agents = v.parse().unwrap_or(config.agents),
            ("--steps", Some(v)) => config.steps = v.parse().unwrap_or(config.steps),
            ("--seed", Some(v)) => config.seed = v.parse().unwrap_or(config.seed),
            ("--interval", Some(v)) => {
                config.output_interval = v.parse().unwrap_or(config.output_interval).max(1)
            }
            ("--scenario", Some(v)) => config.scenario = Some(v.clone()),
            (flag, _) => {
                eprintln!("Ignoring unknown or incomplete argument: {}", flag);
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    config
}

fn built_in(config: &DemoConfig) -> SteeringResult<Simulation> {
    let mut arena = Arena::new(Bounds::planar(-40.0, -40.0, 40.0, 40.0)?);
    for position in [(12.0, 0.0), (-10.0, 15.0), (0.0, -20.0)] {
        arena.add_obstacle(Obstacle::new(Vector3::new(position.0, position.1, 0.0), 2.0))?;
    }

    let mut sim = Simulation::new(arena, FixedStep::try_new(1.0 / 30.0)?, config.seed);

    let boid_params = SteeringParams::default().with_vision(4.0, 60.0);
    for i in 0..config.agents {
        let angle = i as f64 * 2.399_963; // golden angle
        let radius = 1.0 + 0.6 * (i as f64).sqrt();
        let position = Vector3::new(radius * angle.cos(), radius * angle.sin(), 0.0);
        let body = PointMass::new(position).with_velocity(Vector3::new(2.0, 0.5, 0.0));
        sim.spawn(Agent::new(boid_params.clone(), Flocker::default())?, body);
    }

    let predator_params = SteeringParams::default().with_max_speed(4.0);
    sim.spawn(
        Agent::new(predator_params, Pursuer::new(AgentId::new(0)))?,
        PointMass::new(Vector3::new(-30.0, -30.0, 0.0)).with_mass(Mass::new(2.0)),
    );

    Ok(sim)
}

fn mean_speed(sim: &Simulation) -> f64 {
    let bodies = sim.bodies();
    if bodies.is_empty() {
        return 0.0;
    }
    bodies.iter().map(|b| b.velocity().magnitude()).sum::<f64>() / bodies.len() as f64
}

fn main() -> SteeringResult<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let config = parse_args();

    let mut sim = match &config.scenario {
        Some(path) => {
            println!("Loading scenario from {}", path);
            ScenarioConfig::from_file(path)?.build_simulation()?
        }
        None => built_in(&config)?,
    };

    println!("=== Steering Engine: Flock ===");
    println!("Agents:    {}", sim.agent_count());
    println!("Obstacles: {}", sim.arena().obstacle_count());
    println!("Timestep:  {:.4} s", sim.clock().timestep());
    println!("Seed:      {}", sim.seed());
    println!();
    println!("{:>6} {:>8} {:>22} {:>10}", "step", "time", "centroid", "speed");

    for step in 1..=config.steps {
        sim.step();

        if step % config.output_interval == 0 || step == config.steps {
            let centroid = sim.centroid().unwrap_or_default();
            println!(
                "{:>6} {:>8.2} {:>10.2},{:>10.2} {:>10.3}",
                step,
                sim.elapsed(),
                centroid.x,
                centroid.y,
                mean_speed(&sim)
            );
        }
    }

    Ok(())
}
