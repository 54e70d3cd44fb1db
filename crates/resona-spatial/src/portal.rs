//! Portals and the per-group portal registry.
//!
//! A portal is a point through which sound can be relayed when a zone's
//! listener is fully outside (or the zone is inverted), simulating
//! propagation around geometry. Portals belong to groups; a zone only
//! ever routes through portals of its own group.

use ahash::AHashMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use resona_common::{PortalGroupId, PortalId, SpatialError};

use crate::octree::Octree;

/// A positioned portal entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    /// Unique ID.
    pub id: PortalId,
    /// World position.
    pub position: Vec3,
    /// Disabled portals stay registered but are skipped by queries.
    pub enabled: bool,
    /// Group this portal belongs to.
    pub group: PortalGroupId,
}

impl Portal {
    /// Creates an enabled portal in the default group.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            id: PortalId::new(),
            position,
            enabled: true,
            group: PortalGroupId::DEFAULT,
        }
    }

    /// Assigns a portal group.
    #[must_use]
    pub fn with_group(mut self, group: PortalGroupId) -> Self {
        self.group = group;
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Fixed spatial-partition parameters for the portal octrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalIndexConfig {
    /// Center of the indexed region.
    pub origin: Vec3,
    /// Half extent of the indexed cube.
    pub half_extent: f32,
    /// Maximum subdivision depth.
    pub max_depth: u8,
    /// Merge threshold per node.
    pub min_per_node: usize,
    /// Split threshold per node.
    pub max_per_node: usize,
}

impl Default for PortalIndexConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            half_extent: 500.0,
            max_depth: 5,
            min_per_node: 1,
            max_per_node: 10,
        }
    }
}

/// Registry of portals, partitioned into one octree per group.
///
/// Group octrees are created lazily on first access; portals registered
/// without a group land in the reserved default group.
#[derive(Debug)]
pub struct PortalRegistry {
    config: PortalIndexConfig,
    groups: AHashMap<PortalGroupId, Octree<Portal>>,
}

impl PortalRegistry {
    /// Creates a registry with the given index parameters.
    #[must_use]
    pub fn new(config: PortalIndexConfig) -> Self {
        Self {
            config,
            groups: AHashMap::new(),
        }
    }

    fn group_index(&mut self, group: PortalGroupId) -> &mut Octree<Portal> {
        let config = self.config;
        self.groups.entry(group).or_insert_with(|| {
            Octree::new(
                config.origin,
                Vec3::splat(config.half_extent),
                config.max_depth,
                config.min_per_node,
                config.max_per_node,
            )
        })
    }

    /// Registers a portal into its group's index.
    ///
    /// A portal outside the index bounds is rejected; the caller gets the
    /// error and the registry logs it as a misconfigured scene.
    pub fn register(&mut self, portal: Portal) -> Result<(), SpatialError> {
        let result = self.group_index(portal.group).insert(portal.position, portal);
        if let Err(err) = &result {
            warn!(portal = portal.id.raw(), %err, "portal rejected by spatial index");
        }
        result
    }

    /// Removes a portal from its group's index.
    ///
    /// Returns `false` when no matching portal was registered at that
    /// position.
    pub fn deregister(&mut self, id: PortalId, position: Vec3, group: PortalGroupId) -> bool {
        match self.groups.get_mut(&group) {
            Some(index) => index.remove(position, |portal| portal.id == id).is_some(),
            None => false,
        }
    }

    /// Flips the enabled flag of a registered portal in place.
    ///
    /// Returns `false` when the portal was not found.
    pub fn set_enabled(
        &mut self,
        id: PortalId,
        position: Vec3,
        group: PortalGroupId,
        enabled: bool,
    ) -> bool {
        // Entries are immutable through queries, so toggle by reinsertion.
        let Some(index) = self.groups.get_mut(&group) else {
            return false;
        };
        match index.remove(position, |portal| portal.id == id) {
            Some(mut portal) => {
                portal.enabled = enabled;
                index.insert(portal.position, portal).is_ok()
            }
            None => false,
        }
    }

    /// Finds the nearest enabled portal of `group` to `position`.
    #[must_use]
    pub fn find_nearest_enabled(&self, group: PortalGroupId, position: Vec3) -> Option<Portal> {
        let index = self.groups.get(&group)?;
        index
            .find_nearest_filtered(position, |portal| portal.enabled)
            .map(|entry| entry.value)
    }

    /// Number of portals registered in `group`.
    #[must_use]
    pub fn group_len(&self, group: PortalGroupId) -> usize {
        self.groups.get(&group).map_or(0, Octree::len)
    }
}

impl Default for PortalRegistry {
    fn default() -> Self {
        Self::new(PortalIndexConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_find() {
        let mut registry = PortalRegistry::default();
        let portal = Portal::new(Vec3::new(10.0, 0.0, 0.0));
        registry.register(portal).expect("in bounds");

        let found = registry
            .find_nearest_enabled(PortalGroupId::DEFAULT, Vec3::ZERO)
            .expect("found");
        assert_eq!(found.id, portal.id);
    }

    #[test]
    fn test_groups_are_isolated() {
        let mut registry = PortalRegistry::default();
        let group_a = PortalGroupId::new(1);
        registry
            .register(Portal::new(Vec3::new(1.0, 0.0, 0.0)).with_group(group_a))
            .expect("in bounds");

        assert!(registry
            .find_nearest_enabled(PortalGroupId::DEFAULT, Vec3::ZERO)
            .is_none());
        assert!(registry.find_nearest_enabled(group_a, Vec3::ZERO).is_some());
    }

    #[test]
    fn test_disabled_portal_skipped() {
        let mut registry = PortalRegistry::default();
        let near = Portal::new(Vec3::new(1.0, 0.0, 0.0)).with_enabled(false);
        let far = Portal::new(Vec3::new(50.0, 0.0, 0.0));
        registry.register(near).expect("in bounds");
        registry.register(far).expect("in bounds");

        let found = registry
            .find_nearest_enabled(PortalGroupId::DEFAULT, Vec3::ZERO)
            .expect("found");
        assert_eq!(found.id, far.id);
    }

    #[test]
    fn test_set_enabled_toggles_visibility() {
        let mut registry = PortalRegistry::default();
        let portal = Portal::new(Vec3::new(1.0, 0.0, 0.0)).with_enabled(false);
        registry.register(portal).expect("in bounds");
        assert!(registry
            .find_nearest_enabled(PortalGroupId::DEFAULT, Vec3::ZERO)
            .is_none());

        assert!(registry.set_enabled(portal.id, portal.position, portal.group, true));
        assert!(registry
            .find_nearest_enabled(PortalGroupId::DEFAULT, Vec3::ZERO)
            .is_some());
    }

    #[test]
    fn test_deregister() {
        let mut registry = PortalRegistry::default();
        let portal = Portal::new(Vec3::new(2.0, 3.0, 4.0));
        registry.register(portal).expect("in bounds");
        assert!(registry.deregister(portal.id, portal.position, portal.group));
        assert_eq!(registry.group_len(PortalGroupId::DEFAULT), 0);
        assert!(!registry.deregister(portal.id, portal.position, portal.group));
    }

    #[test]
    fn test_out_of_bounds_portal_rejected() {
        let mut registry = PortalRegistry::default();
        let portal = Portal::new(Vec3::new(1000.0, 0.0, 0.0));
        assert!(registry.register(portal).is_err());
        assert_eq!(registry.group_len(PortalGroupId::DEFAULT), 0);
    }
}
