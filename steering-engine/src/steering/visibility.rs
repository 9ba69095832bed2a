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
//! Vision cone test gating the flocking primitives
//!
//! Only `align` and `cohere` consult it. Separation and obstacle avoidance
//! react to proximity alone.

use crate::body::Kinematic;
use crate::math::COINCIDENT_EPSILON;
use crate::params::SteeringParams;

/// Whether `viewer` can perceive `other`
///
/// False for coincident points (this is how an agent skips itself in a
/// neighbour list), false when `other` lies outside the vision cone, and
/// otherwise true iff `other` is strictly inside the vision range.
pub fn is_visible<V, O>(viewer: &V, other: &O, params: &SteeringParams) -> bool
where
    V: Kinematic + ?Sized,
    O: Kinematic + ?Sized,
{
    let offset = other.position() - viewer.position();
    let distance_sq = offset.magnitude_squared();

    if distance_sq < COINCIDENT_EPSILON {
        return false;
    }

    if viewer.forward().angle_degrees(offset) > params.vision_cone_angle {
        return false;
    }

    distance_sq < params.vision_range * params.vision_range
}
