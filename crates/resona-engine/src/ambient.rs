//! Fire-and-forget ambient emitters.
//!
//! An `AmbientEmitter` is the simplest possible sound actor: give it an
//! audio object and a position, spawn it into the world, and it plays
//! (typically looping) until despawned. It exists so hosts do not have to
//! track sessions by hand for scene ambience.

use glam::Vec3;

use resona_common::{ResonaResult, SessionId};
use resona_playback::clip::AudioObjectConfig;

use crate::world::AudioWorld;

/// A positioned ambient sound that plays on spawn.
#[derive(Debug, Clone)]
pub struct AmbientEmitter {
    /// The audio object to play.
    pub object: AudioObjectConfig,
    /// World position of the emitter.
    pub position: Vec3,
    session: Option<SessionId>,
}

impl AmbientEmitter {
    /// Creates an emitter; nothing plays until [`AmbientEmitter::spawn`].
    #[must_use]
    pub fn new(object: AudioObjectConfig, position: Vec3) -> Self {
        Self {
            object,
            position,
            session: None,
        }
    }

    /// Starts playback. Spawning an already-playing emitter restarts it.
    pub fn spawn(&mut self, world: &mut AudioWorld, now: f64) -> ResonaResult<SessionId> {
        if let Some(previous) = self.session.take() {
            // Best effort; the session may have finished on its own.
            let _ = world.stop(previous);
        }
        let session = world.play(now, self.object.clone(), self.position)?;
        self.session = Some(session);
        Ok(session)
    }

    /// Stops playback. Returns `false` when nothing was playing.
    pub fn despawn(&mut self, world: &mut AudioWorld) -> bool {
        match self.session.take() {
            Some(session) => world.stop(session).is_ok(),
            None => false,
        }
    }

    /// The active session, if spawned.
    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// Whether the emitter's session is still alive in the world.
    #[must_use]
    pub fn is_playing(&self, world: &AudioWorld) -> bool {
        self.session
            .is_some_and(|session| world.scheduler().session(session).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_playback::clip::{ClipAsset, ClipConfig};
    use resona_spatial::occlusion::NoObstruction;

    fn looping_object() -> AudioObjectConfig {
        AudioObjectConfig::new(vec![ClipConfig::new(ClipAsset::new("wind", 2.0))])
            .with_looping(1.0, 1.0)
    }

    #[test]
    fn test_spawn_despawn() {
        let mut world = AudioWorld::default();
        let mut emitter = AmbientEmitter::new(looping_object(), Vec3::new(1.0, 0.0, 0.0));
        assert!(!emitter.is_playing(&world));

        emitter.spawn(&mut world, 0.0).expect("playable");
        assert!(emitter.is_playing(&world));

        assert!(emitter.despawn(&mut world));
        assert!(!emitter.is_playing(&world));
        assert!(!emitter.despawn(&mut world));
    }

    #[test]
    fn test_spawn_twice_replaces_session() {
        let mut world = AudioWorld::default();
        let mut emitter = AmbientEmitter::new(looping_object(), Vec3::ZERO);

        let first = emitter.spawn(&mut world, 0.0).expect("playable");
        let second = emitter.spawn(&mut world, 1.0).expect("playable");
        assert_ne!(first, second);
        assert_eq!(world.scheduler().active_sessions(), 1);

        world.update(2.0, 1.0, &NoObstruction);
        assert!(emitter.is_playing(&world));
    }
}
