//! Line-of-sight occlusion.
//!
//! The engine never traces geometry itself; it asks the host through
//! [`ObstructionTest`] whether a segment or a small sphere intersects the
//! configured obstruction layer, and turns the answers into a volume
//! attenuation factor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Obstruction queries provided by the host environment.
///
/// Implementations test against whatever physics or voxel representation
/// the host has; the engine only consumes the boolean answers.
pub trait ObstructionTest {
    /// Checks whether the segment between two points crosses an obstruction.
    fn line_blocked(&self, from: Vec3, to: Vec3) -> bool;

    /// Checks whether a sphere overlaps an obstruction.
    fn sphere_blocked(&self, center: Vec3, radius: f32) -> bool;
}

/// An obstruction test that never blocks; useful for scenes with no
/// occlusion geometry and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoObstruction;

impl ObstructionTest for NoObstruction {
    fn line_blocked(&self, _from: Vec3, _to: Vec3) -> bool {
        false
    }

    fn sphere_blocked(&self, _center: Vec3, _radius: f32) -> bool {
        false
    }
}

/// Mock obstruction test for unit tests: blocks everything, or a single
/// axis-aligned slab.
#[derive(Debug, Default)]
pub struct MockObstruction {
    /// Blocks every query when set.
    pub block_all: bool,
    /// Optional slab `x ∈ [min, max]` that blocks segments crossing it and
    /// spheres overlapping it.
    pub slab_x: Option<(f32, f32)>,
}

impl MockObstruction {
    /// A mock that blocks every query.
    #[must_use]
    pub fn blocking() -> Self {
        Self {
            block_all: true,
            slab_x: None,
        }
    }

    /// A mock with a blocking slab on the X axis.
    #[must_use]
    pub fn slab(min_x: f32, max_x: f32) -> Self {
        Self {
            block_all: false,
            slab_x: Some((min_x, max_x)),
        }
    }
}

impl ObstructionTest for MockObstruction {
    fn line_blocked(&self, from: Vec3, to: Vec3) -> bool {
        if self.block_all {
            return true;
        }
        match self.slab_x {
            Some((min_x, max_x)) => {
                let (lo, hi) = (from.x.min(to.x), from.x.max(to.x));
                lo <= max_x && hi >= min_x
            }
            None => false,
        }
    }

    fn sphere_blocked(&self, center: Vec3, radius: f32) -> bool {
        if self.block_all {
            return true;
        }
        match self.slab_x {
            Some((min_x, max_x)) => center.x + radius >= min_x && center.x - radius <= max_x,
            None => false,
        }
    }
}

/// Occlusion tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcclusionConfig {
    /// Volume multiplier applied while line of sight is blocked.
    pub factor: f32,
    /// Time constant for the player volume-multiplier smoothing, seconds.
    pub smooth_time: f32,
    /// Radius of the probe sphere around the emission position.
    pub probe_radius: f32,
}

impl Default for OcclusionConfig {
    fn default() -> Self {
        Self {
            factor: 0.5,
            smooth_time: 0.1,
            probe_radius: 0.25,
        }
    }
}

/// Computes the occluded volume factor for one zone frame.
///
/// For inverted zones only the probe around the emission position counts.
/// For regular zones the emission probe and all three line-of-sight pairs
/// (emission↔listener, boundary↔emission, boundary↔listener) must be clear
/// for full volume.
#[must_use]
pub fn occluded_volume_factor(
    obstruction: &dyn ObstructionTest,
    config: &OcclusionConfig,
    boundary_closest: Vec3,
    emission: Vec3,
    listener: Vec3,
    inverted: bool,
) -> f32 {
    if inverted {
        if obstruction.sphere_blocked(emission, config.probe_radius) {
            return config.factor;
        }
        return 1.0;
    }

    // An emission point buried in geometry counts as occluded even with
    // clear sightlines (covers portals placed inside walls).
    if obstruction.sphere_blocked(emission, config.probe_radius) {
        return config.factor;
    }

    if obstruction.line_blocked(emission, listener)
        || obstruction.line_blocked(boundary_closest, emission)
        || obstruction.line_blocked(boundary_closest, listener)
    {
        return config.factor;
    }
    1.0
}
