//! The audio world: the simulation root owning every subsystem.
//!
//! `AudioWorld` is an explicit context object: it owns the portal
//! registry, the zones, the playback scheduler with its player pool, and
//! the listener position. The host constructs one, feeds it play calls
//! and per-frame updates, and tears it down by dropping it; there is no
//! global access point.

use ahash::AHashMap;
use glam::Vec3;
use tracing::{debug, warn};

use resona_common::{ResonaResult, SessionId, SpatialError, ZoneId};
use resona_playback::clip::AudioObjectConfig;
use resona_playback::routing::{ChannelResolver, PassthroughResolver};
use resona_playback::scheduler::PlaybackScheduler;
use resona_spatial::filter::compute_filter_params;
use resona_spatial::occlusion::ObstructionTest;
use resona_spatial::portal::{Portal, PortalRegistry};
use resona_spatial::zone::{evaluate, Zone};

use crate::config::EngineConfig;

/// The simulation root of the audio engine.
pub struct AudioWorld {
    config: EngineConfig,
    listener_position: Vec3,
    portals: PortalRegistry,
    scheduler: PlaybackScheduler,
    zones: AHashMap<ZoneId, Zone>,
    /// Session driven by each zone's evaluation results.
    bindings: AHashMap<ZoneId, SessionId>,
    resolver: Box<dyn ChannelResolver>,
}

impl std::fmt::Debug for AudioWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioWorld")
            .field("listener_position", &self.listener_position)
            .field("zones", &self.zones.len())
            .field("active_sessions", &self.scheduler.active_sessions())
            .finish_non_exhaustive()
    }
}

impl AudioWorld {
    /// Creates a world from configuration, routing every channel through
    /// as-is. Use [`AudioWorld::with_resolver`] to plug in the host mixer.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            listener_position: Vec3::ZERO,
            portals: PortalRegistry::new(config.portal_index),
            scheduler: PlaybackScheduler::new(config.pool_capacity),
            zones: AHashMap::new(),
            bindings: AHashMap::new(),
            resolver: Box::new(PassthroughResolver),
        }
    }

    /// Replaces the channel resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn ChannelResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current listener position.
    #[must_use]
    pub fn listener_position(&self) -> Vec3 {
        self.listener_position
    }

    /// Moves the single listener.
    pub fn set_listener_position(&mut self, position: Vec3) {
        self.listener_position = position;
    }

    /// Starts playing an audio object at a fixed position.
    pub fn play(
        &mut self,
        now: f64,
        object: AudioObjectConfig,
        position: Vec3,
    ) -> ResonaResult<SessionId> {
        let id = self
            .scheduler
            .play(now, object, position, self.resolver.as_ref())?;
        Ok(id)
    }

    /// Starts playing an audio object attached to a moving target.
    ///
    /// Whether the target position is used at all is decided by the
    /// object's `reposition_to_target` and `parent_to_target` flags.
    pub fn play_at_target(
        &mut self,
        now: f64,
        object: AudioObjectConfig,
        position: Vec3,
        target: Vec3,
    ) -> ResonaResult<SessionId> {
        let id = self
            .scheduler
            .play_following(now, object, position, target, self.resolver.as_ref())?;
        Ok(id)
    }

    /// Stops a session and recycles its player.
    pub fn stop(&mut self, session: SessionId) -> ResonaResult<()> {
        self.scheduler.stop(session)?;
        self.bindings.retain(|_, bound| *bound != session);
        Ok(())
    }

    /// Adds a zone and returns its ID.
    pub fn add_zone(&mut self, zone: Zone) -> ZoneId {
        let id = zone.id;
        self.zones.insert(id, zone);
        id
    }

    /// Removes a zone. Any binding it had disappears with it; the bound
    /// session keeps playing unmodulated.
    pub fn remove_zone(&mut self, id: ZoneId) -> Option<Zone> {
        self.bindings.remove(&id);
        self.zones.remove(&id)
    }

    /// Borrows a zone.
    #[must_use]
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    /// Mutably borrows a zone.
    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones.get_mut(&id)
    }

    /// Makes a zone drive the player of `session`. Returns `false` when
    /// either side is unknown.
    pub fn bind_zone(&mut self, zone: ZoneId, session: SessionId) -> bool {
        if !self.zones.contains_key(&zone) || self.scheduler.session(session).is_none() {
            warn!(zone = zone.raw(), session = session.raw(), "zone binding rejected");
            return false;
        }
        if let Some(player) = self.scheduler.session_player_mut(session) {
            player.use_spatial_blend_multiplier = true;
            player.set_smooth_time(self.config.occlusion.smooth_time);
        }
        self.bindings.insert(zone, session);
        true
    }

    /// Detaches a zone from the session it was driving.
    pub fn unbind_zone(&mut self, zone: ZoneId) -> bool {
        match self.bindings.remove(&zone) {
            Some(session) => {
                if let Some(player) = self.scheduler.session_player_mut(session) {
                    player.use_spatial_blend_multiplier = false;
                }
                true
            }
            None => false,
        }
    }

    /// Registers a portal into the spatial index.
    pub fn register_portal(&mut self, portal: Portal) -> Result<(), SpatialError> {
        self.portals.register(portal)
    }

    /// Removes a portal from the spatial index.
    pub fn deregister_portal(&mut self, portal: &Portal) -> bool {
        self.portals.deregister(portal.id, portal.position, portal.group)
    }

    /// Enables or disables a registered portal.
    pub fn set_portal_enabled(&mut self, portal: &Portal, enabled: bool) -> bool {
        self.portals
            .set_enabled(portal.id, portal.position, portal.group, enabled)
    }

    /// The portal registry, for direct queries.
    #[must_use]
    pub fn portals(&self) -> &PortalRegistry {
        &self.portals
    }

    /// The playback scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    /// The playback scheduler, mutably (listener registration, manual
    /// player tweaks).
    pub fn scheduler_mut(&mut self) -> &mut PlaybackScheduler {
        &mut self.scheduler
    }

    /// Advances the world by one frame.
    ///
    /// Zones are revalidated and evaluated against the listener; their
    /// results are written to the players of bound sessions. Then the
    /// scheduler expires timers and ticks volume smoothing.
    pub fn update(&mut self, now: f64, dt: f32, obstruction: &dyn ObstructionTest) {
        let mut stale = Vec::new();

        for zone in self.zones.values_mut() {
            if zone.revalidate() {
                debug!(zone = zone.id.raw(), "zone re-initialized after edit");
            }

            let Some(frame) = evaluate(
                zone,
                self.listener_position,
                &self.portals,
                obstruction,
                &self.config.occlusion,
            ) else {
                continue;
            };

            let Some(&session) = self.bindings.get(&zone.id) else {
                continue;
            };
            let Some(player) = self.scheduler.session_player_mut(session) else {
                stale.push(zone.id);
                continue;
            };

            player.position = frame.emission_position;
            player.update_spread(frame.spread);
            if player.use_spatial_blend_multiplier {
                player.update_spatial_blend(frame.blend);
            }
            player.set_target_volume_multiplier(frame.volume_multiplier_target);
            player.filters = compute_filter_params(frame.blend, frame.occlusion_factor());
        }

        for zone in stale {
            debug!(zone = zone.raw(), "dropping binding to finished session");
            self.bindings.remove(&zone);
        }

        self.scheduler.tick(now, dt);
    }
}

impl Default for AudioWorld {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_playback::clip::{ClipAsset, ClipConfig};
    use resona_spatial::occlusion::NoObstruction;
    use resona_spatial::shape::{Shape, ShapeData};

    fn object() -> AudioObjectConfig {
        AudioObjectConfig::new(vec![ClipConfig::new(ClipAsset::new("amb", 10.0))])
    }

    fn sphere_zone(radius: f32, feather: f32) -> Zone {
        let mut zone = Zone::new(Vec3::ZERO)
            .with_shape(Shape::Sphere)
            .with_feather(feather);
        zone.set_shape_data(ShapeData::new_sphere(Vec3::ZERO, radius));
        zone
    }

    #[test]
    fn test_bind_requires_both_sides() {
        let mut world = AudioWorld::default();
        let zone = world.add_zone(sphere_zone(5.0, 10.0));
        assert!(!world.bind_zone(zone, SessionId::NULL));

        let session = world.play(0.0, object(), Vec3::ZERO).expect("playable");
        assert!(world.bind_zone(zone, session));
    }

    #[test]
    fn test_update_writes_zone_frame_to_player() {
        let mut world = AudioWorld::default();
        let zone = world.add_zone(sphere_zone(5.0, 10.0));
        let session = world.play(0.0, object(), Vec3::ZERO).expect("playable");
        world.bind_zone(zone, session);

        // Listener halfway through the feather band.
        world.set_listener_position(Vec3::new(10.0, 0.0, 0.0));
        world.update(0.016, 0.016, &NoObstruction);

        let player = world.scheduler().session_player(session).expect("bound");
        assert!((player.spatial_blend - 0.5).abs() < 1e-5);
        assert!((player.spread - 180.0).abs() < 1e-3);
        assert_eq!(player.position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_stop_drops_bindings() {
        let mut world = AudioWorld::default();
        let zone = world.add_zone(sphere_zone(5.0, 10.0));
        let session = world.play(0.0, object(), Vec3::ZERO).expect("playable");
        world.bind_zone(zone, session);

        world.stop(session).expect("active session");
        assert!(!world.unbind_zone(zone));
    }

    #[test]
    fn test_removed_zone_stops_driving() {
        let mut world = AudioWorld::default();
        let zone = world.add_zone(sphere_zone(5.0, 10.0));
        let session = world.play(0.0, object(), Vec3::ZERO).expect("playable");
        world.bind_zone(zone, session);
        world.remove_zone(zone);

        world.set_listener_position(Vec3::new(10.0, 0.0, 0.0));
        world.update(0.016, 0.016, &NoObstruction);

        // The player keeps its play-time position, untouched by the zone.
        let player = world.scheduler().session_player(session).expect("alive");
        assert_eq!(player.position, Vec3::ZERO);
    }
}
