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
//! Benchmarks for steering composition
//!
//! These benchmarks measure:
//! - Full simulation steps of a flock for different population sizes
//! - A single agent's tick against a dense neighbour list
//! - Obstacle avoidance cost as the obstacle roster grows

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use steering_engine::behaviours::Flocker;
use steering_engine::body::{KinematicState, PointMass};
use steering_engine::clock::FixedStep;
use steering_engine::world::{Arena, Bounds, Obstacle};
use steering_engine::{Agent, Simulation, Steering, SteeringParams, Vector3};

fn arena() -> Arena {
    Arena::new(Bounds::planar(-50.0, -50.0, 50.0, 50.0).unwrap())
}

// Agents on a square grid, all heading roughly the same way
fn grid_states(count: usize) -> Vec<KinematicState> {
    let side = (count as f64).sqrt().ceil() as usize;
    (0..count)
        .map(|i| {
            let position = Vector3::new((i % side) as f64 * 0.8, (i / side) as f64 * 0.8, 0.0);
            let velocity = Vector3::new(1.0, 0.1 * (i % 3) as f64, 0.0);
            KinematicState::new(position, velocity, velocity, 0.5)
        })
        .collect()
}

fn flock_simulation(count: usize) -> Simulation {
    let mut sim = Simulation::new(arena(), FixedStep::new(1.0 / 60.0), 42);
    for state in grid_states(count) {
        let agent = Agent::new(SteeringParams::default(), Flocker::default()).unwrap();
        sim.spawn(agent, PointMass::new(state.position).with_velocity(state.velocity));
    }
    sim
}

fn bench_flock_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_step");

    for agent_count in [16, 128, 512].iter() {
        group.throughput(Throughput::Elements(*agent_count as u64));

        group.bench_with_input(
            BenchmarkId::new("simulation", agent_count),
            agent_count,
            |b, &agent_count| {
                let mut sim = flock_simulation(agent_count);
                b.iter(|| black_box(sim.step()));
            },
        );
    }

    group.finish();
}

fn bench_single_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_tick");
    let world = arena();

    for neighbor_count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*neighbor_count as u64));

        group.bench_with_input(
            BenchmarkId::new("flock", neighbor_count),
            neighbor_count,
            |b, &neighbor_count| {
                let neighbors = grid_states(neighbor_count);
                let me = neighbors[0];
                let mut agent = Agent::new(SteeringParams::default(), |s: &mut Steering<'_>| {
                    let neighbors = s.neighbors();
                    s.flock(neighbors, 1.0, 1.0);
                })
                .unwrap();

                b.iter(|| agent.compute_force(black_box(&me), &world, black_box(&neighbors), 1.0 / 60.0));
            },
        );
    }

    group.finish();
}

fn bench_obstacle_avoidance(c: &mut Criterion) {
    let mut group = c.benchmark_group("obstacle_avoidance");

    for obstacle_count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*obstacle_count as u64));

        group.bench_with_input(
            BenchmarkId::new("avoid_all", obstacle_count),
            obstacle_count,
            |b, &obstacle_count| {
                let mut world = arena();
                for i in 0..obstacle_count {
                    let x = (i % 40) as f64 * 2.0 - 40.0;
                    let y = (i / 40) as f64 * 2.0 - 40.0;
                    world
                        .add_obstacle(Obstacle::new(Vector3::new(x, y, 0.0), 0.5))
                        .unwrap();
                }
                let me = KinematicState::new(
                    Vector3::new(-41.0, -40.0, 0.0),
                    Vector3::new(1.0, 0.0, 0.0),
                    Vector3::new(1.0, 0.0, 0.0),
                    0.5,
                );
                let mut agent = Agent::new(SteeringParams::default(), |s: &mut Steering<'_>| {
                    s.avoid_all_obstacles()
                })
                .unwrap();

                b.iter(|| agent.compute_force(black_box(&me), &world, &[], 1.0 / 60.0));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_flock_step, bench_single_tick, bench_obstacle_avoidance);
criterion_main!(benches);
