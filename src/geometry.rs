//! Solid primitives produced by the package generators.
//!
//! Every solid is an axis-aligned box described by its centre and its size.
//! Coordinates are millimetres with Z pointing up, so `size` reads as
//! `(width, length, height)`.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A 3D vector (mm).
///
/// Serialised as a plain `[x, y, z]` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    /// X coordinate (mm).
    pub x: f64,
    /// Y coordinate (mm).
    pub y: f64,
    /// Z coordinate (mm), up.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// What a solid represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolidKind {
    /// Plastic or ceramic package housing.
    Body,
    /// Metal contact, either a perimeter pad or the exposed pad.
    Pad,
}

impl SolidKind {
    /// Returns the lowercase tag used in exports (`body` / `pad`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Pad => "pad",
        }
    }
}

impl std::fmt::Display for SolidKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    /// Body or pad.
    #[serde(rename = "type")]
    pub kind: SolidKind,
    /// Centre of the box (mm).
    pub position: Vec3,
    /// Width, length, height of the box (mm). All components are non-negative.
    pub size: Vec3,
}

impl Solid {
    /// Creates a body solid.
    #[must_use]
    pub const fn body(position: Vec3, size: Vec3) -> Self {
        Self {
            kind: SolidKind::Body,
            position,
            size,
        }
    }

    /// Creates a pad solid.
    #[must_use]
    pub const fn pad(position: Vec3, size: Vec3) -> Self {
        Self {
            kind: SolidKind::Pad,
            position,
            size,
        }
    }

    /// Returns a copy of this solid with a different size.
    #[must_use]
    pub const fn with_size(self, size: Vec3) -> Self {
        Self { size, ..self }
    }

    /// Returns a copy of this solid translated by `delta`.
    #[must_use]
    pub fn offset(self, delta: Vec3) -> Self {
        offset(&self, delta)
    }

    /// Corner with the smallest coordinates (`position - size / 2`).
    #[must_use]
    pub fn min_corner(&self) -> Vec3 {
        Vec3::new(
            self.position.x - self.size.x / 2.0,
            self.position.y - self.size.y / 2.0,
            self.position.z - self.size.z / 2.0,
        )
    }
}

/// Translates a solid by a vector.
///
/// The position is the componentwise sum of the solid's position and `delta`;
/// kind and size are carried over unchanged.
#[must_use]
pub fn offset(solid: &Solid, delta: Vec3) -> Solid {
    Solid {
        position: solid.position + delta,
        ..*solid
    }
}
