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
//! Error type for agent construction and configuration
//!
//! Per-tick steering never fails: degenerate geometry resolves to "no
//! contribution". Errors only surface when building agents, bodies and
//! worlds from bad configuration.

use thiserror::Error;

/// Errors raised while configuring the steering engine
#[derive(Debug, Error)]
pub enum SteeringError {
    /// A tuning parameter was negative, NaN or infinite
    #[error("parameter `{name}` must be non-negative and finite, got {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// The vision cone half-angle was outside [0, 180] degrees
    #[error("vision cone half-angle must be within [0, 180] degrees, got {0}")]
    VisionConeOutOfRange(f64),

    /// A body mass was negative, NaN or infinite
    #[error("mass must be non-negative and finite, got {0}")]
    InvalidMass(f64),

    /// World bounds had a minimum above the maximum on some axis
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// An obstacle had a negative or non-finite radius or position
    #[error("invalid obstacle: {0}")]
    InvalidObstacle(String),

    /// The timestep was not positive and finite
    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f64),

    /// No agent with this index exists
    #[error("agent {0} not found")]
    AgentNotFound(usize),

    /// Scenario configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Scenario file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for fallible steering-engine operations
pub type SteeringResult<T> = Result<T, SteeringError>;
