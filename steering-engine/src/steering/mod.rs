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
//! Force composition
//!
//! This module provides:
//! - The steering primitives, as methods on the per-tick [`Steering`] context
//! - The vision-cone query gating flocking
//! - The per-tick [`ForceAccumulator`]
//! - The [`SteeringPolicy`] extension trait

mod accumulator;
mod policy;
mod primitives;
pub mod visibility;

pub use accumulator::ForceAccumulator;
pub use policy::SteeringPolicy;
pub use primitives::{Steering, DEFAULT_LOOK_AHEAD, DEFAULT_WEIGHT};
pub use visibility::is_visible;
