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
//! World registry interfaces and the reference [`Arena`]
//!
//! Steering reads world bounds and the obstacle roster through the
//! [`WorldBounds`] and [`ObstacleSource`] traits. There is no global
//! registry: the host passes a world into every tick.

use crate::error::{SteeringError, SteeringResult};
use crate::math::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spherical obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Centre
    pub position: Vector3,
    /// Radius, non-negative
    pub radius: f64,
}

impl Obstacle {
    /// Create a new obstacle
    pub fn new(position: Vector3, radius: f64) -> Self {
        Obstacle { position, radius }
    }

    /// Check the obstacle has a finite position and a non-negative finite radius
    pub fn validate(&self) -> SteeringResult<()> {
        if !self.position.is_valid() {
            return Err(SteeringError::InvalidObstacle(format!(
                "position {:?} is not finite",
                self.position
            )));
        }
        if !(self.radius >= 0.0 && self.radius.is_finite()) {
            return Err(SteeringError::InvalidObstacle(format!(
                "radius {} must be non-negative and finite",
                self.radius
            )));
        }
        Ok(())
    }
}

/// Axis-aligned world bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vector3,
    /// Maximum corner
    pub max: Vector3,
}

impl Bounds {
    /// Create bounds, checking `min <= max` on every axis
    pub fn new(min: Vector3, max: Vector3) -> SteeringResult<Self> {
        let bounds = Bounds { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Bounds on the xy plane; the z axis is unbounded
    pub fn planar(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> SteeringResult<Self> {
        Bounds::new(
            Vector3::new(min_x, min_y, f64::NEG_INFINITY),
            Vector3::new(max_x, max_y, f64::INFINITY),
        )
    }

    /// Check `min <= max` on every axis and that no component is NaN
    pub fn validate(&self) -> SteeringResult<()> {
        let axes = [
            ("x", self.min.x, self.max.x),
            ("y", self.min.y, self.max.y),
            ("z", self.min.z, self.max.z),
        ];
        for (axis, min, max) in axes {
            // written so that NaN fails the check
            if !(min <= max) {
                return Err(SteeringError::InvalidBounds(format!(
                    "{} axis has min {} above max {}",
                    axis, min, max
                )));
            }
        }
        Ok(())
    }

    /// Whether `point` lies within the bounds; points exactly on a bound are inside
    pub fn contains(&self, point: Vector3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// World bounds as seen by the steering core
pub trait WorldBounds {
    /// Minimum corner of the world
    fn min_bounds(&self) -> Vector3;

    /// Maximum corner of the world
    fn max_bounds(&self) -> Vector3;

    /// Point agents head for when they leave the world
    fn center(&self) -> Vector3 {
        Vector3::zero()
    }
}

/// The live obstacle roster
pub trait ObstacleSource {
    /// Obstacles present this tick; the set may change between ticks
    fn obstacles(&self) -> &[Obstacle];
}

/// Everything a steering tick reads from the world
pub trait WorldRegistry: WorldBounds + ObstacleSource {}

impl<T: WorldBounds + ObstacleSource + ?Sized> WorldRegistry for T {}

/// Generational handle to an obstacle in an [`Arena`]
///
/// A removed obstacle's handle never resolves again, even after the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleId {
    index: u32,
    generation: u32,
}

impl ObstacleId {
    /// Get the slot index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the generation number
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Obstacle({}, gen: {})", self.index, self.generation)
    }
}

/// Reference world registry: bounds plus a mutable obstacle roster
///
/// Obstacles are kept densely so [`ObstacleSource::obstacles`] is a plain
/// slice; removal swaps the last obstacle into the freed position.
///
/// # Examples
///
/// ```
/// use steering_engine::world::{Arena, Bounds, Obstacle, ObstacleSource};
/// use steering_engine::math::Vector3;
///
/// let mut arena = Arena::new(Bounds::planar(-10.0, -10.0, 10.0, 10.0).unwrap());
/// let rock = arena.add_obstacle(Obstacle::new(Vector3::new(2.0, 0.0, 0.0), 1.0)).unwrap();
/// assert_eq!(arena.obstacles().len(), 1);
/// assert!(arena.remove_obstacle(rock));
/// assert!(arena.obstacles().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Arena {
    bounds: Bounds,
    center: Vector3,
    obstacles: Vec<Obstacle>,
    // dense index -> slot
    dense_slots: Vec<u32>,
    // slot -> dense index, None when free
    slot_dense: Vec<Option<usize>>,
    slot_generations: Vec<u32>,
    free_slots: Vec<u32>,
}

impl Arena {
    /// Create an empty arena centred on the origin
    pub fn new(bounds: Bounds) -> Self {
        Arena {
            bounds,
            center: Vector3::zero(),
            obstacles: Vec::new(),
            dense_slots: Vec::new(),
            slot_dense: Vec::new(),
            slot_generations: Vec::new(),
            free_slots: Vec::new(),
        }
    }

    /// Set the point agents return to when leaving the bounds
    pub fn with_center(mut self, center: Vector3) -> Self {
        self.center = center;
        self
    }

    /// Get the bounds
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Add an obstacle, returning its handle
    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> SteeringResult<ObstacleId> {
        obstacle.validate()?;

        let index = match self.free_slots.pop() {
            Some(index) => index,
            None => {
                let index = self.slot_generations.len() as u32;
                self.slot_generations.push(0);
                self.slot_dense.push(None);
                index
            }
        };

        self.slot_dense[index as usize] = Some(self.obstacles.len());
        self.obstacles.push(obstacle);
        self.dense_slots.push(index);

        Ok(ObstacleId {
            index,
            generation: self.slot_generations[index as usize],
        })
    }

    /// Remove an obstacle
    ///
    /// Returns false if the handle is stale or unknown.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> bool {
        let dense = match self.dense_index(id) {
            Some(dense) => dense,
            None => return false,
        };

        self.obstacles.swap_remove(dense);
        self.dense_slots.swap_remove(dense);
        if let Some(&moved_slot) = self.dense_slots.get(dense) {
            self.slot_dense[moved_slot as usize] = Some(dense);
        }

        let slot = id.index as usize;
        self.slot_dense[slot] = None;
        self.slot_generations[slot] = self.slot_generations[slot].wrapping_add(1);
        self.free_slots.push(id.index);
        true
    }

    /// Look up an obstacle by handle
    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.dense_index(id).map(|dense| &self.obstacles[dense])
    }

    /// Check if a handle still refers to a live obstacle
    pub fn contains_obstacle(&self, id: ObstacleId) -> bool {
        self.dense_index(id).is_some()
    }

    /// Number of live obstacles
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Remove every obstacle
    ///
    /// Generations are bumped so old handles stay invalid.
    pub fn clear_obstacles(&mut self) {
        for &slot in &self.dense_slots {
            let slot = slot as usize;
            self.slot_dense[slot] = None;
            self.slot_generations[slot] = self.slot_generations[slot].wrapping_add(1);
            self.free_slots.push(slot as u32);
        }
        self.obstacles.clear();
        self.dense_slots.clear();
    }

    fn dense_index(&self, id: ObstacleId) -> Option<usize> {
        let slot = id.index as usize;
        if self.slot_generations.get(slot).copied() != Some(id.generation) {
            return None;
        }
        self.slot_dense.get(slot).copied().flatten()
    }
}

impl WorldBounds for Arena {
    fn min_bounds(&self) -> Vector3 {
        self.bounds.min
    }

    fn max_bounds(&self) -> Vector3 {
        self.bounds.max
    }

    fn center(&self) -> Vector3 {
        self.center
    }
}

impl ObstacleSource for Arena {
    fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}
