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
//! Population-level tests
//!
//! Determinism of the snapshot driver, long-running behaviour of the bundled
//! policies, and scenario loading from disk.

use steering_engine::behaviours::{Flocker, Pursuer, Seeker, Wanderer};
use steering_engine::body::{Kinematic, KinematicState, PointMass};
use steering_engine::clock::FixedStep;
use steering_engine::config::ScenarioConfig;
use steering_engine::random::SeededRandom;
use steering_engine::world::{Arena, Bounds, Obstacle};
use steering_engine::{Agent, AgentId, Simulation, Steering, SteeringParams, Vector3};

const DT: f64 = 0.05;

fn ring(count: usize, radius: f64) -> Vec<PointMass> {
    (0..count)
        .map(|i| {
            let angle = i as f64 / count as f64 * std::f64::consts::TAU;
            let position = Vector3::new(radius * angle.cos(), radius * angle.sin(), 0.0);
            let velocity = Vector3::new(-angle.sin(), angle.cos(), 0.0);
            PointMass::new(position).with_velocity(velocity)
        })
        .collect()
}

fn flocker() -> Agent {
    Agent::new(SteeringParams::default(), Flocker::default()).unwrap()
}

#[test]
fn test_driver_matches_sequential_replay() {
    let seed = 1234;
    let arena = Arena::new(Bounds::planar(-30.0, -30.0, 30.0, 30.0).unwrap());
    let bodies = ring(24, 3.0);

    let mut sim = Simulation::new(arena.clone(), FixedStep::new(DT), seed);
    for body in &bodies {
        sim.spawn(flocker(), body.clone());
    }

    // same population stepped by hand, one agent at a time
    let mut agents: Vec<Agent> = (0..bodies.len())
        .map(|i| flocker().with_random(SeededRandom::for_agent(seed, i)))
        .collect();
    let mut replay = bodies;

    for _ in 0..100 {
        sim.step();

        let snapshot: Vec<KinematicState> = replay.iter().map(|b| KinematicState::capture(b)).collect();
        for (agent, body) in agents.iter_mut().zip(replay.iter_mut()) {
            agent.tick(body, &arena, &snapshot, DT);
        }
        for body in &mut replay {
            body.integrate(DT);
        }
    }

    for (driven, replayed) in sim.bodies().iter().zip(&replay) {
        assert_eq!(driven.position(), replayed.position());
        assert_eq!(driven.velocity(), replayed.velocity());
    }
}

#[test]
fn test_arriving_seeker_settles_on_target() {
    let arena = Arena::new(Bounds::planar(-30.0, -30.0, 30.0, 30.0).unwrap());
    let mut sim = Simulation::new(arena, FixedStep::new(DT), 0);
    let target = Vector3::new(10.0, 4.0, 0.0);
    let id = sim.spawn(
        Agent::new(SteeringParams::default(), Seeker::new(target).arriving()).unwrap(),
        PointMass::new(Vector3::zero()),
    );

    sim.run(400);

    let body = sim.body(id).unwrap();
    assert!(body.position().distance_squared(target) < 0.01);
    assert!(body.velocity().magnitude() < 0.1);
}

#[test]
fn test_pursuer_catches_slower_quarry() {
    let arena = Arena::new(Bounds::planar(-100.0, -100.0, 100.0, 100.0).unwrap());
    let mut sim = Simulation::new(arena, FixedStep::new(DT), 0);

    let slow = SteeringParams::default().with_max_speed(2.0);
    let quarry = sim.spawn(
        Agent::new(slow, |s: &mut Steering<'_>| s.seek(Vector3::new(90.0, 0.0, 0.0), 1.0)).unwrap(),
        PointMass::new(Vector3::zero()),
    );
    let fast = SteeringParams::default().with_max_speed(6.0);
    let mut pursuer = Pursuer::new(quarry);
    pursuer.look_ahead = 0.25;
    let hunter = sim.spawn(
        Agent::new(fast, pursuer).unwrap(),
        PointMass::new(Vector3::new(-10.0, 5.0, 0.0)),
    );

    let mut closest = f64::INFINITY;
    for _ in 0..300 {
        sim.step();
        let gap = sim
            .body(hunter)
            .unwrap()
            .position()
            .distance_squared(sim.body(quarry).unwrap().position())
            .sqrt();
        closest = closest.min(gap);
    }

    assert!(closest < 1.5, "closest approach was {}", closest);
}

#[test]
fn test_wanderers_stay_near_arena() {
    let arena = Arena::new(Bounds::planar(-10.0, -10.0, 10.0, 10.0).unwrap());
    let mut sim = Simulation::new(arena, FixedStep::new(DT), 99);
    for body in ring(8, 5.0) {
        sim.spawn(
            Agent::new(SteeringParams::default(), Wanderer::default()).unwrap(),
            body,
        );
    }

    for _ in 0..600 {
        sim.step();
        for body in sim.bodies() {
            let p = body.position();
            assert!(p.x.abs() < 15.0 && p.y.abs() < 15.0, "escaped to {:?}", p);
        }
    }
}

#[test]
fn test_obstacles_added_between_steps_are_seen() {
    let arena = Arena::new(Bounds::planar(-30.0, -30.0, 30.0, 30.0).unwrap());
    let mut sim = Simulation::new(arena, FixedStep::new(DT), 0);
    let id = sim.spawn(
        Agent::new(SteeringParams::default(), |s: &mut Steering<'_>| s.avoid_all_obstacles()).unwrap(),
        PointMass::new(Vector3::zero()).with_velocity(Vector3::new(1.0, 0.0, 0.0)),
    );

    sim.step();
    assert_eq!(sim.last_forces()[id.index()], Vector3::zero());

    let position = sim.body(id).unwrap().position();
    sim.arena_mut()
        .add_obstacle(Obstacle::new(position + Vector3::new(1.0, 0.0, 0.0), 0.5))
        .unwrap();
    sim.step();
    assert!(sim.last_forces()[id.index()].y.abs() > 0.0);
}

#[test]
fn test_scenario_file_round_trip() {
    let text = r#"
seed = 11
timestep = 0.05

[arena]
min = [-15.0, -15.0]
max = [15.0, 15.0]

[[agents]]
position = { x = 1.0, y = 0.0, z = 0.0 }
velocity = { x = 0.0, y = 1.0, z = 0.0 }
behaviour = { kind = "flocker" }

[[agents]]
position = { x = -1.0, y = 0.0, z = 0.0 }
behaviour = { kind = "evader", threat = 0, panic_distance = 4.0 }
"#;
    let path = std::env::temp_dir().join(format!("steering-scenario-{}.toml", std::process::id()));
    std::fs::write(&path, text).unwrap();

    let config = ScenarioConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut first = config.build_simulation().unwrap();
    let mut second = config.build_simulation().unwrap();
    first.run(60);
    second.run(60);

    assert_eq!(first.agent_count(), 2);
    assert_eq!(
        first.body(AgentId::new(1)).unwrap().position(),
        second.body(AgentId::new(1)).unwrap().position()
    );
    assert!((first.elapsed() - 3.0).abs() < 1e-9);
}
