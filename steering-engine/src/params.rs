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
//! Per-agent tuning parameters
//!
//! Parameters are immutable for the duration of a tick and validated when an
//! agent is built, never inside the tick itself.

use crate::error::{SteeringError, SteeringResult};
use serde::{Deserialize, Serialize};

/// Tuning knobs owned by each agent
///
/// Angles are in degrees. Missing fields deserialize to the defaults below.
///
/// # Examples
///
/// ```
/// use steering_engine::params::SteeringParams;
///
/// let params = SteeringParams::default().with_max_speed(8.0);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.max_speed, 8.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringParams {
    /// Magnitude every desired velocity is scaled to
    pub max_speed: f64,
    /// Cap on the accumulated force applied each tick
    pub max_force: f64,
    /// Radius inside which neighbours push this agent away
    pub personal_space: f64,
    /// Perception distance for flocking and obstacle look-ahead
    pub vision_range: f64,
    /// Half-angle of the vision cone in degrees, within [0, 180]
    pub vision_cone_angle: f64,
    /// Distance at which `arrive` starts slowing down
    pub arrive_distance: f64,
    /// Largest deviation of the wander angle from straight ahead, in degrees
    pub max_wander_angle: f64,
    /// Largest change of the wander angle per second, in degrees
    pub max_wander_change_per_second: f64,
}

impl Default for SteeringParams {
    fn default() -> Self {
        SteeringParams {
            max_speed: 5.0,
            max_force: 5.0,
            personal_space: 1.0,
            vision_range: 2.0,
            vision_cone_angle: 25.0,
            arrive_distance: 3.0,
            max_wander_angle: 45.0,
            max_wander_change_per_second: 10.0,
        }
    }
}

impl SteeringParams {
    /// Set the max speed
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Set the max force
    pub fn with_max_force(mut self, max_force: f64) -> Self {
        self.max_force = max_force;
        self
    }

    /// Set the personal-space radius
    pub fn with_personal_space(mut self, personal_space: f64) -> Self {
        self.personal_space = personal_space;
        self
    }

    /// Set the vision range and cone half-angle (degrees)
    pub fn with_vision(mut self, range: f64, cone_angle: f64) -> Self {
        self.vision_range = range;
        self.vision_cone_angle = cone_angle;
        self
    }

    /// Set the arrive slowing distance
    pub fn with_arrive_distance(mut self, arrive_distance: f64) -> Self {
        self.arrive_distance = arrive_distance;
        self
    }

    /// Set the wander bounds (degrees, degrees per second)
    pub fn with_wander(mut self, max_angle: f64, max_change_per_second: f64) -> Self {
        self.max_wander_angle = max_angle;
        self.max_wander_change_per_second = max_change_per_second;
        self
    }

    /// Check every parameter is non-negative and finite and the vision cone
    /// lies within [0, 180] degrees
    pub fn validate(&self) -> SteeringResult<()> {
        let scalars = [
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("personal_space", self.personal_space),
            ("vision_range", self.vision_range),
            ("vision_cone_angle", self.vision_cone_angle),
            ("arrive_distance", self.arrive_distance),
            ("max_wander_angle", self.max_wander_angle),
            ("max_wander_change_per_second", self.max_wander_change_per_second),
        ];

        for (name, value) in scalars {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SteeringError::InvalidParameter { name, value });
            }
        }

        if self.vision_cone_angle > 180.0 {
            return Err(SteeringError::VisionConeOutOfRange(self.vision_cone_angle));
        }

        Ok(())
    }
}
