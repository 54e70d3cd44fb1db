//! Volume shapes for audio zones.
//!
//! A shape is split into two pieces, mirroring how zones are authored:
//! the [`Shape`] definition names the geometry variant and is shared
//! between zones, while [`ShapeData`] holds the per-instance parameters
//! (center offset, extents) and is created fresh whenever a zone is
//! assigned a shape.
//!
//! Both queries are pure functions of the local-space point and the
//! instance data; positions are expressed in the owning zone's local
//! frame with the origin at the zone position.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Geometry variant of an audio volume shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box.
    Box,
    /// Sphere.
    Sphere,
}

impl Shape {
    /// Creates fresh default instance data for this shape variant.
    #[must_use]
    pub fn create_instance_data(self) -> ShapeData {
        match self {
            Self::Box => ShapeData::Box {
                center: Vec3::ZERO,
                size: Vec3::ONE,
            },
            Self::Sphere => ShapeData::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
            },
        }
    }

    /// Checks whether the given instance data belongs to this variant.
    #[must_use]
    pub fn matches(self, data: &ShapeData) -> bool {
        matches!(
            (self, data),
            (Self::Box, ShapeData::Box { .. }) | (Self::Sphere, ShapeData::Sphere { .. })
        )
    }

    /// Human-readable variant name, used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Box => "Box",
            Self::Sphere => "Sphere",
        }
    }
}

/// Per-instance parameters for a volume shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeData {
    /// Axis-aligned box parameters.
    Box {
        /// Center offset in zone-local space.
        center: Vec3,
        /// Full edge lengths; components are kept non-negative.
        size: Vec3,
    },
    /// Sphere parameters.
    Sphere {
        /// Center offset in zone-local space.
        center: Vec3,
        /// Radius; kept non-negative.
        radius: f32,
    },
}

impl ShapeData {
    /// Creates box data, clamping the size to non-negative components.
    #[must_use]
    pub fn new_box(center: Vec3, size: Vec3) -> Self {
        Self::Box {
            center,
            size: size.max(Vec3::ZERO),
        }
    }

    /// Creates sphere data, clamping the radius to non-negative.
    #[must_use]
    pub fn new_sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Checks whether a local-space position lies within the shape boundary.
    #[must_use]
    pub fn is_inside(&self, position: Vec3) -> bool {
        match *self {
            Self::Box { center, size } => {
                let relative = position - center;
                let half = size * 0.5;
                relative.x.abs() <= half.x
                    && relative.y.abs() <= half.y
                    && relative.z.abs() <= half.z
            }
            Self::Sphere { center, radius } => {
                (position - center).length_squared() <= radius * radius
            }
        }
    }

    /// Returns the closest point on or within the shape to a local-space
    /// position.
    ///
    /// For the box this clamps each coordinate into the extents, so interior
    /// points map to themselves. For the sphere the point is projected onto
    /// the surface; a query exactly at the center is degenerate and resolves
    /// to a fixed +X direction.
    #[must_use]
    pub fn closest_point(&self, position: Vec3) -> Vec3 {
        match *self {
            Self::Box { center, size } => {
                let half = size * 0.5;
                position.clamp(center - half, center + half)
            }
            Self::Sphere { center, radius } => {
                let offset = position - center;
                let direction = offset.try_normalize().unwrap_or(Vec3::X);
                center + direction * radius
            }
        }
    }
}
