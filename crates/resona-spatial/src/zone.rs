//! Audio zones and the per-frame zone evaluation.
//!
//! A zone is a region of space with a shape. While the listener is on the
//! zone's active side the sound plays fully "inside" (blend 0); as the
//! listener leaves, the blend factor ramps up across the feather band and
//! the apparent emission position tracks the closest boundary point — or
//! snaps to the nearest enabled portal of the zone's group once the zone
//! is fully outside (or always, for inverted zones).

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use resona_common::{clamp01, lerp, PortalGroupId, ZoneId};

use crate::occlusion::{occluded_volume_factor, ObstructionTest, OcclusionConfig};
use crate::portal::PortalRegistry;
use crate::shape::{Shape, ShapeData};

/// A spatial audio zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Unique ID.
    pub id: ZoneId,
    /// World position of the zone origin.
    pub position: Vec3,
    /// World rotation. Zones do not support rotation; anything other than
    /// identity is corrected back during evaluation.
    pub rotation: Quat,
    /// Assigned shape variant. Direct edits are picked up by
    /// [`Zone::revalidate`] once per tick; [`Zone::set_shape`] applies
    /// immediately.
    pub shape: Option<Shape>,
    shape_data: Option<ShapeData>,
    feather: f32,
    /// Swaps inside/outside semantics for blend purposes.
    pub inverted: bool,
    /// Portal group this zone routes through.
    pub portal_group: PortalGroupId,
    /// Shape seen by the last revalidation pass.
    previous_shape: Option<Shape>,
    #[serde(skip)]
    rotation_warned: bool,
}

impl Zone {
    /// Creates a zone at `position` with no shape (inert until one is set).
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            id: ZoneId::new(),
            position,
            rotation: Quat::IDENTITY,
            shape: None,
            shape_data: None,
            feather: 0.0,
            inverted: false,
            portal_group: PortalGroupId::DEFAULT,
            previous_shape: None,
            rotation_warned: false,
        }
    }

    /// Assigns a shape, creating fresh instance data for it.
    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.set_shape(Some(shape));
        self
    }

    /// Sets the feather band width.
    #[must_use]
    pub fn with_feather(mut self, feather: f32) -> Self {
        self.set_feather(feather);
        self
    }

    /// Sets the inversion flag.
    #[must_use]
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Sets the portal group.
    #[must_use]
    pub fn with_portal_group(mut self, group: PortalGroupId) -> Self {
        self.portal_group = group;
        self
    }

    /// The shape instance data, if any.
    #[must_use]
    pub fn shape_data(&self) -> Option<&ShapeData> {
        self.shape_data.as_ref()
    }

    /// Replaces the shape. Clearing the shape destroys the instance data;
    /// assigning one creates fresh defaults.
    pub fn set_shape(&mut self, shape: Option<Shape>) {
        self.shape = shape;
        self.shape_data = shape.map(Shape::create_instance_data);
        self.previous_shape = shape;
    }

    /// Overwrites the shape instance data. Data that does not match the
    /// current shape variant is refused and leaves the zone unchanged.
    pub fn set_shape_data(&mut self, data: ShapeData) -> bool {
        match self.shape {
            Some(shape) if shape.matches(&data) => {
                self.shape_data = Some(data);
                true
            }
            _ => false,
        }
    }

    /// Feather band width.
    #[must_use]
    pub fn feather(&self) -> f32 {
        self.feather
    }

    /// Sets the feather band width, clamped to non-negative.
    pub fn set_feather(&mut self, feather: f32) {
        self.feather = feather.max(0.0);
    }

    /// Detects external edits since the last tick and re-initializes
    /// dependent state. Returns `true` when a reset happened.
    ///
    /// Mirrors the authoring-time validation pass: a changed shape variant
    /// invalidates the instance data.
    pub fn revalidate(&mut self) -> bool {
        if self.shape != self.previous_shape {
            let shape = self.shape;
            self.set_shape(shape);
            return true;
        }
        false
    }

    /// A zone without a matching shape/instance-data pair has no effect.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        match (self.shape, &self.shape_data) {
            (Some(shape), Some(data)) => !shape.matches(data),
            _ => true,
        }
    }

    /// Closest point on the zone's shape to a world-space position, in
    /// world space.
    #[must_use]
    pub fn world_closest_point(&self, world_position: Vec3) -> Option<Vec3> {
        let data = self.shape_data.as_ref()?;
        let local = world_position - self.position;
        Some(self.position + data.closest_point(local))
    }
}

/// Per-frame output of evaluating one zone against the listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneFrame {
    /// Spatialization blend: 0 = fully "inside", 1 = fully outside.
    pub blend: f32,
    /// Stereo spread in degrees, derived from the blend.
    pub spread: f32,
    /// Apparent emission position (boundary point or portal).
    pub emission_position: Vec3,
    /// Raw occluded-volume factor (configured factor while blocked, else 1).
    pub occlusion_volume_factor: f32,
    /// Smoothing target for the player's volume multiplier.
    pub volume_multiplier_target: f32,
    /// Whether a portal re-routed the emission position this frame.
    pub routed_through_portal: bool,
}

impl ZoneFrame {
    /// Occlusion input for the filter curves (`1 - volume factor`).
    #[must_use]
    pub fn occlusion_factor(&self) -> f32 {
        1.0 - self.occlusion_volume_factor
    }
}

/// Blend contribution of the distance to the zone boundary.
///
/// A zero-width feather band degenerates to a step function.
fn feather_blend(distance: f32, feather: f32) -> f32 {
    if feather <= 0.0 {
        if distance > 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        clamp01(distance / feather)
    }
}

/// Evaluates a zone for the current frame.
///
/// Returns `None` for inert zones (missing or mismatched shape); the
/// caller must leave the driven player untouched in that case.
pub fn evaluate(
    zone: &mut Zone,
    listener_world: Vec3,
    portals: &PortalRegistry,
    obstruction: &dyn ObstructionTest,
    occlusion: &OcclusionConfig,
) -> Option<ZoneFrame> {
    // Rotation is unsupported; correct it once, loudly.
    if zone.rotation != Quat::IDENTITY {
        if !zone.rotation_warned {
            warn!(
                zone = zone.id.raw(),
                "audio zones do not support rotation; resetting to identity"
            );
            zone.rotation_warned = true;
        }
        zone.rotation = Quat::IDENTITY;
    }

    if zone.is_inert() {
        return None;
    }
    let data = zone.shape_data.as_ref()?;

    let local_listener = listener_world - zone.position;
    let inside = data.is_inside(local_listener);
    let world_closest = zone.position + data.closest_point(local_listener);

    // On the active side (inside for regular zones, outside for inverted
    // ones) the sound keeps full "inside" treatment.
    let on_active_side = !zone.inverted == inside;
    let mut blend = if on_active_side {
        0.0
    } else {
        feather_blend(world_closest.distance(listener_world), zone.feather)
    };

    // Portal routing only becomes meaningful once the zone is fully
    // outside, and always applies to inverted zones.
    let mut emission_position = world_closest;
    let mut routed_through_portal = false;
    if blend >= 1.0 || zone.inverted {
        if let Some(portal) = portals.find_nearest_enabled(zone.portal_group, world_closest) {
            emission_position = portal.position;
            blend = lerp(
                0.5,
                1.0,
                feather_blend(portal.position.distance(listener_world), zone.feather),
            );
            routed_through_portal = true;
        }
    }

    let occlusion_volume_factor = occluded_volume_factor(
        obstruction,
        occlusion,
        world_closest,
        emission_position,
        listener_world,
        zone.inverted,
    );

    // Occlusion attenuates volume only while the listener is judged to be
    // on the active side; elsewhere portal routing carries the effect.
    let volume_multiplier_target = if on_active_side {
        occlusion_volume_factor
    } else {
        1.0
    };

    Some(ZoneFrame {
        blend,
        spread: lerp(360.0, 0.0, blend),
        emission_position,
        occlusion_volume_factor,
        volume_multiplier_target,
        routed_through_portal,
    })
}
