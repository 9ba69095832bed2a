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
//! Per-tick force accumulation

use crate::math::Vector3;
use tracing::warn;

/// Running sum of every steering contribution for one tick
///
/// Each contribution is pre-multiplied by its weight. Contributions that are
/// not finite are dropped so one bad primitive cannot poison the whole sum.
/// The accumulator is reset at the start of every tick and has no identity
/// beyond it.
#[derive(Debug, Clone)]
pub struct ForceAccumulator {
    total: Vector3,
    contributions: usize,
    /// Whether to log warnings for dropped non-finite contributions
    pub warn_on_invalid: bool,
}

impl ForceAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        ForceAccumulator {
            total: Vector3::zero(),
            contributions: 0,
            warn_on_invalid: true,
        }
    }

    /// Add `force * weight`
    ///
    /// Returns false if the weighted force was not finite and was dropped.
    pub fn add(&mut self, force: Vector3, weight: f64) -> bool {
        let weighted = force * weight;
        if !weighted.is_valid() {
            if self.warn_on_invalid {
                warn!(?force, weight, "dropping non-finite steering contribution");
            }
            return false;
        }

        self.total += weighted;
        self.contributions += 1;
        true
    }

    /// Current unclamped sum
    pub fn total(&self) -> Vector3 {
        self.total
    }

    /// Number of contributions accepted since the last reset
    pub fn contribution_count(&self) -> usize {
        self.contributions
    }

    /// Whether nothing has been accumulated since the last reset
    pub fn is_empty(&self) -> bool {
        self.contributions == 0
    }

    /// Sum with its magnitude capped at `max_force`, direction preserved
    pub fn clamped(&self, max_force: f64) -> Vector3 {
        self.total.clamp_magnitude(max_force)
    }

    /// Clear the sum
    pub fn reset(&mut self) {
        self.total = Vector3::zero();
        self.contributions = 0;
    }

    /// Return the clamped sum and reset
    pub fn take_clamped(&mut self, max_force: f64) -> Vector3 {
        let force = self.clamped(max_force);
        self.reset();
        force
    }
}

impl Default for ForceAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_accumulation() {
        let mut acc = ForceAccumulator::new();
        assert!(acc.is_empty());

        acc.add(Vector3::new(10.0, 0.0, 0.0), 1.0);
        acc.add(Vector3::new(0.0, 10.0, 0.0), 2.0);

        assert_eq!(acc.total(), Vector3::new(10.0, 20.0, 0.0));
        assert_eq!(acc.contribution_count(), 2);
    }

    #[test]
    fn test_invalid_contribution_dropped() {
        let mut acc = ForceAccumulator::new();
        acc.warn_on_invalid = false;
        acc.add(Vector3::new(1.0, 0.0, 0.0), 1.0);

        assert!(!acc.add(Vector3::new(f64::NAN, 0.0, 0.0), 1.0));
        assert!(!acc.add(Vector3::new(1.0, 0.0, 0.0), f64::INFINITY));

        assert_eq!(acc.total(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(acc.contribution_count(), 1);
    }

    #[test]
    fn test_clamp_preserves_direction() {
        let mut acc = ForceAccumulator::new();
        acc.add(Vector3::new(300.0, 400.0, 0.0), 1.0);

        let force = acc.clamped(5.0);
        assert!((force.magnitude() - 5.0).abs() < 1e-12);
        assert!((force.x - 3.0).abs() < 1e-12);
        assert!((force.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_under_cap_is_noop() {
        let mut acc = ForceAccumulator::new();
        acc.add(Vector3::new(1.0, 1.0, 0.0), 1.0);
        assert_eq!(acc.clamped(5.0), Vector3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_take_clamped_resets() {
        let mut acc = ForceAccumulator::new();
        acc.add(Vector3::new(100.0, 0.0, 0.0), 1.0);

        let force = acc.take_clamped(10.0);
        assert!((force.x - 10.0).abs() < 1e-12);
        assert!(acc.is_empty());
        assert_eq!(acc.total(), Vector3::zero());
    }
}
