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
//! Vector math used by the steering primitives
//!
//! A single double-precision 3D vector type serves as position, velocity,
//! direction and force. Agents that live on a plane simply keep `z` at zero;
//! rotations happen about the z ("up") axis.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Squared distances below this are treated as coincident points.
///
/// The smallest positive single-precision value (a subnormal), so only truly
/// coincident points are skipped.
pub const COINCIDENT_EPSILON: f64 = 1.401_298_464_324_817e-45;

/// Below this product of magnitudes the angle between two vectors is reported as zero
const ANGLE_DEGENERATE_THRESHOLD: f64 = 1e-15;

/// 3D vector with double-precision components
///
/// # Examples
///
/// ```
/// use steering_engine::math::Vector3;
///
/// let v = Vector3::new(3.0, 4.0, 0.0);
/// assert_eq!(v.magnitude(), 5.0);
/// assert!(v.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// Create a new vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Vector3::new(0.0, 0.0, 0.0)
    }

    /// Check if all components are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Check if this is exactly the zero vector
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Dot product
    pub fn dot(&self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared length
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(*self)
    }

    /// Length
    ///
    /// Finite for every finite vector, even when the squared length overflows.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y).hypot(self.z)
    }

    /// Squared distance to another point
    pub fn distance_squared(&self, other: Vector3) -> f64 {
        (*self - other).magnitude_squared()
    }

    /// Unit vector in the same direction
    ///
    /// Returns `None` for the zero vector and for vectors whose length is not
    /// finite, so callers can treat "no direction" explicitly instead of
    /// propagating NaN.
    pub fn try_normalize(&self) -> Option<Vector3> {
        let mag = self.magnitude();
        if mag > 0.0 && mag.is_finite() {
            Some(*self / mag)
        } else {
            None
        }
    }

    /// Unit vector in the same direction, or zero when there is none
    pub fn normalize_or_zero(&self) -> Vector3 {
        self.try_normalize().unwrap_or_default()
    }

    /// Cap the length at `max`, preserving direction
    ///
    /// Vectors already within the cap are returned unchanged. A non-positive
    /// cap yields the zero vector.
    pub fn clamp_magnitude(&self, max: f64) -> Vector3 {
        if max <= 0.0 {
            return Vector3::zero();
        }
        let mag = self.magnitude();
        if mag <= max {
            return *self;
        }
        if !mag.is_finite() {
            return Vector3::zero();
        }
        *self * (max / mag)
    }

    /// Unsigned angle to another vector, in degrees within [0, 180]
    ///
    /// Degenerate (near-zero) inputs report an angle of zero.
    pub fn angle_degrees(&self, other: Vector3) -> f64 {
        let denominator = (self.magnitude_squared() * other.magnitude_squared()).sqrt();
        if denominator < ANGLE_DEGENERATE_THRESHOLD {
            return 0.0;
        }
        let cos = (self.dot(other) / denominator).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }

    /// Rotate counter-clockwise about the z axis by `degrees`
    pub fn rotate_z(&self, degrees: f64) -> Vector3 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vector3::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }

    /// The direction 90 degrees clockwise about the z axis
    ///
    /// For an agent heading along `self` on the xy plane this is its right hand.
    pub fn right_of(&self) -> Vector3 {
        Vector3::new(self.y, -self.x, 0.0)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}
