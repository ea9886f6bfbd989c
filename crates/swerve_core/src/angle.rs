//! Planar rotations bounded to (-π, π]
//!
//! Every angle that flows between the sensors, the optimizer and the turning
//! controller goes through [`Rotation2d`], so values are wrapped exactly once
//! at construction.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::ops::{Add, Neg, Sub};

/// Wrap an angle in radians into (-π, π].
pub fn wrap_angle(radians: f64) -> f64 {
    let wrapped = PI - (PI - radians).rem_euclid(TAU);
    // rem_euclid may round up to TAU for tiny negative inputs
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Shortest signed angular distance from `from` to `to`, in (-π, π].
pub fn shortest_angle_between(from: f64, to: f64) -> f64 {
    wrap_angle(to - from)
}

/// A rotation in the plane, stored as radians in (-π, π]
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Rotation2d {
    radians: f64,
}

impl Rotation2d {
    /// Zero rotation
    pub const ZERO: Rotation2d = Rotation2d { radians: 0.0 };

    /// Half turn (π)
    pub const HALF_TURN: Rotation2d = Rotation2d { radians: PI };

    /// Create a rotation from radians, wrapping into (-π, π]
    pub fn from_radians(radians: f64) -> Self {
        Self { radians: wrap_angle(radians) }
    }

    /// Create a rotation from degrees, wrapping into (-180°, 180°]
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    pub fn radians(self) -> f64 {
        self.radians
    }

    pub fn degrees(self) -> f64 {
        self.radians.to_degrees()
    }

    pub fn cos(self) -> f64 {
        self.radians.cos()
    }

    pub fn sin(self) -> f64 {
        self.radians.sin()
    }

    /// Shortest signed rotation that takes `self` to `other`
    pub fn delta_to(self, other: Rotation2d) -> Rotation2d {
        Rotation2d::from_radians(shortest_angle_between(self.radians, other.radians))
    }
}

impl From<f64> for Rotation2d {
    fn from(radians: f64) -> Self {
        Rotation2d::from_radians(radians)
    }
}

impl From<Rotation2d> for f64 {
    fn from(rotation: Rotation2d) -> Self {
        rotation.radians
    }
}

impl Add for Rotation2d {
    type Output = Rotation2d;

    fn add(self, rhs: Rotation2d) -> Rotation2d {
        Rotation2d::from_radians(self.radians + rhs.radians)
    }
}

impl Sub for Rotation2d {
    type Output = Rotation2d;

    fn sub(self, rhs: Rotation2d) -> Rotation2d {
        Rotation2d::from_radians(self.radians - rhs.radians)
    }
}

impl Neg for Rotation2d {
    type Output = Rotation2d;

    fn neg(self) -> Rotation2d {
        Rotation2d::from_radians(-self.radians)
    }
}
