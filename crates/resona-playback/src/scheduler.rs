//! The playback scheduler.
//!
//! Owns the player pool, the active sessions and the timer queue, and
//! drives clip lifecycles: play requests resolve a route and a clip,
//! bind a pooled player, and arm a stop-at-end timer; expiry either
//! finishes the session or, for looping objects, runs the interval wait
//! and starts the next iteration. All lifecycle events fire through the
//! registered listeners in order.

use ahash::AHashMap;
use glam::Vec3;
use tracing::{debug, info, warn};

use resona_common::{random_in_range, PlaybackError, SessionId};

use crate::clip::AudioObjectConfig;
use crate::events::{EventListeners, ListenerHandle, PlaybackEvent};
use crate::player::Player;
use crate::pool::PlayerPool;
use crate::routing::ChannelResolver;
use crate::session::{PlaybackSession, SessionState};
use crate::source::configure_source;
use crate::timer::{TimerKind, TimerQueue, TimerTask};

/// Drives clip lifecycles over a fixed pool of players.
#[derive(Debug)]
pub struct PlaybackScheduler {
    sessions: AHashMap<SessionId, PlaybackSession>,
    pool: PlayerPool,
    timers: TimerQueue,
    listeners: EventListeners,
}

impl PlaybackScheduler {
    /// Creates a scheduler with a pool of `capacity` players.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: AHashMap::new(),
            pool: PlayerPool::new(capacity),
            timers: TimerQueue::new(),
            listeners: EventListeners::new(),
        }
    }

    /// Starts playing an audio object at a fixed position.
    ///
    /// The route and the first clip are resolved up front; any failure
    /// (unroutable channel, empty catalog, exhausted pool, degenerate
    /// pitch) aborts before a session exists.
    pub fn play(
        &mut self,
        now: f64,
        object: AudioObjectConfig,
        position: Vec3,
        resolver: &dyn ChannelResolver,
    ) -> Result<SessionId, PlaybackError> {
        self.play_inner(now, object, position, None, resolver)
    }

    /// Starts playing an audio object that follows a moving target.
    ///
    /// The object's `reposition_to_target` and `parent_to_target` flags
    /// decide whether the target position is actually used.
    pub fn play_following(
        &mut self,
        now: f64,
        object: AudioObjectConfig,
        position: Vec3,
        target: Vec3,
        resolver: &dyn ChannelResolver,
    ) -> Result<SessionId, PlaybackError> {
        self.play_inner(now, object, position, Some(target), resolver)
    }

    fn play_inner(
        &mut self,
        now: f64,
        object: AudioObjectConfig,
        position: Vec3,
        target: Option<Vec3>,
        resolver: &dyn ChannelResolver,
    ) -> Result<SessionId, PlaybackError> {
        resolver.resolve(object.channel)?;
        if object.clips.is_empty() {
            return Err(PlaybackError::EmptyClipList);
        }

        let player = self.pool.acquire()?;
        let mut session = PlaybackSession::new(player, object, position);
        session.follow_position = target;
        session.parent_to_target = session.object.parent_to_target;
        session.state = SessionState::Configuring;
        session.refresh_position();

        if let Err(err) = Self::start_clip(
            &mut self.pool,
            &mut self.timers,
            &mut self.listeners,
            &mut session,
            now,
        ) {
            self.pool.release(player);
            return Err(err);
        }

        let id = session.id;
        info!(session = id.raw(), player = player.index(), "playback started");
        self.sessions.insert(id, session);
        Ok(id)
    }

    /// Resolves the next clip for `session` and starts it on the bound
    /// player, arming a stop-at-end timer.
    fn start_clip(
        pool: &mut PlayerPool,
        timers: &mut TimerQueue,
        listeners: &mut EventListeners,
        session: &mut PlaybackSession,
        now: f64,
    ) -> Result<(), PlaybackError> {
        let clip_count = session.object.clips.len();
        let index = match session.clip_override {
            Some(index) if index < clip_count => index,
            Some(index) => {
                return Err(PlaybackError::ClipIndexOutOfRange {
                    index,
                    count: clip_count,
                });
            }
            None => session
                .selector
                .select(clip_count)
                .ok_or(PlaybackError::EmptyClipList)?,
        };

        let clip = &session.object.clips[index];
        let settings = configure_source(&session.object, clip)?;

        let player = pool
            .get_mut(session.player)
            .ok_or(PlaybackError::StaleHandle)?;
        player.apply_settings(&settings, session.object.spatial_blend);
        player.position = session.position;

        session.last_settings = Some(settings);
        session.state = SessionState::Playing;

        debug!(
            session = session.id.raw(),
            clip = %clip.clip.name,
            duration = settings.duration,
            "clip started"
        );

        timers.schedule(
            now + f64::from(settings.duration),
            TimerTask {
                session: session.id,
                generation: player.generation(),
                kind: TimerKind::StopAtEnd,
            },
        );

        listeners.emit(session, PlaybackEvent::ClipBegin);
        Ok(())
    }

    /// Stops a session definitively and recycles its player.
    ///
    /// Pending timers for the session die with the player's generation
    /// bump on release.
    pub fn stop(&mut self, id: SessionId) -> Result<(), PlaybackError> {
        let session = self.sessions.remove(&id).ok_or(PlaybackError::StaleHandle)?;
        self.pool.release(session.player);
        info!(session = id.raw(), "playback stopped");
        Ok(())
    }

    /// Advances time: expires due timers and ticks player smoothing.
    pub fn tick(&mut self, now: f64, dt: f32) {
        while let Some(task) = self.timers.pop_due(now) {
            self.handle_timer(task, now);
        }
        self.pool.tick(dt);
    }

    fn handle_timer(&mut self, task: TimerTask, now: f64) {
        let Some(session) = self.sessions.get_mut(&task.session) else {
            // Session already stopped; nothing to do.
            return;
        };
        let Some(player) = self.pool.get(session.player) else {
            return;
        };
        if player.generation() != task.generation {
            // The player was recycled since this timer was armed.
            return;
        }

        match task.kind {
            TimerKind::StopAtEnd => self.handle_clip_end(task.session, now),
            TimerKind::IntervalEnd => self.handle_interval_end(task.session, now),
        }
    }

    fn handle_clip_end(&mut self, id: SessionId, now: f64) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        self.listeners.emit(session, PlaybackEvent::ClipFinish);

        if !session.object.looping {
            session.state = SessionState::Stopped;
            let player = session.player;
            self.sessions.remove(&id);
            self.pool.release(player);
            debug!(session = id.raw(), "playback finished");
            return;
        }

        self.listeners.emit(session, PlaybackEvent::NextLoopStart);

        let (min, max) = session.object.loop_interval;
        let interval = random_in_range(min, max);
        self.listeners.emit(session, PlaybackEvent::IntervalBegin);

        if interval <= 0.0 {
            // No wait: the events still fire, the next iteration starts
            // this same tick.
            self.listeners.emit(session, PlaybackEvent::IntervalEnd);
            self.restart_session(id, now);
            return;
        }

        session.state = SessionState::IntervalWait;
        let generation = self
            .pool
            .get(session.player)
            .map_or(0, Player::generation);
        self.timers.schedule(
            now + f64::from(interval),
            TimerTask {
                session: id,
                generation,
                kind: TimerKind::IntervalEnd,
            },
        );
        debug!(session = id.raw(), interval, "interval wait started");
    }

    fn handle_interval_end(&mut self, id: SessionId, now: f64) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        self.listeners.emit(session, PlaybackEvent::IntervalEnd);
        self.restart_session(id, now);
    }

    /// Starts the next loop iteration of an existing session.
    fn restart_session(&mut self, id: SessionId, now: f64) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        session.refresh_position();
        if let Err(err) = Self::start_clip(
            &mut self.pool,
            &mut self.timers,
            &mut self.listeners,
            session,
            now,
        ) {
            warn!(session = id.raw(), %err, "loop iteration failed, stopping");
            let player = session.player;
            session.state = SessionState::Stopped;
            self.sessions.remove(&id);
            self.pool.release(player);
        }
    }

    /// Registers a lifecycle listener.
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerHandle
    where
        F: FnMut(&mut PlaybackSession, PlaybackEvent) + 'static,
    {
        self.listeners.add(listener)
    }

    /// Removes a lifecycle listener.
    pub fn remove_listener(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(handle)
    }

    /// Borrows a session.
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<&PlaybackSession> {
        self.sessions.get(&id)
    }

    /// Mutably borrows a session.
    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut PlaybackSession> {
        self.sessions.get_mut(&id)
    }

    /// Borrows the player bound to a session.
    #[must_use]
    pub fn session_player(&self, id: SessionId) -> Option<&Player> {
        let session = self.sessions.get(&id)?;
        self.pool.get(session.player)
    }

    /// Mutably borrows the player bound to a session.
    pub fn session_player_mut(&mut self, id: SessionId) -> Option<&mut Player> {
        let player = self.sessions.get(&id)?.player;
        self.pool.get_mut(player)
    }

    /// Number of active sessions.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// The underlying player pool.
    #[must_use]
    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    /// Iterates over active sessions.
    pub fn sessions(&self) -> impl Iterator<Item = &PlaybackSession> {
        self.sessions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{ClipAsset, ClipConfig};
    use crate::routing::{PassthroughResolver, UnroutedResolver};
    use crate::selector::PlayMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn one_shot(length: f32) -> AudioObjectConfig {
        AudioObjectConfig::new(vec![ClipConfig::new(ClipAsset::new("clip", length))])
    }

    #[test]
    fn test_play_and_finish() {
        let mut scheduler = PlaybackScheduler::new(4);
        let id = scheduler
            .play(0.0, one_shot(2.0), Vec3::ZERO, &PassthroughResolver)
            .expect("playable");

        assert_eq!(scheduler.active_sessions(), 1);
        assert_eq!(scheduler.session(id).map(|s| s.state), Some(SessionState::Playing));
        assert_eq!(scheduler.pool().in_use(), 1);

        scheduler.tick(1.0, 1.0);
        assert_eq!(scheduler.active_sessions(), 1);

        scheduler.tick(2.0, 1.0);
        assert_eq!(scheduler.active_sessions(), 0);
        assert_eq!(scheduler.pool().in_use(), 0);
    }

    #[test]
    fn test_routing_failure_aborts_before_session() {
        let mut scheduler = PlaybackScheduler::new(4);
        let result = scheduler.play(0.0, one_shot(1.0), Vec3::ZERO, &UnroutedResolver);
        assert!(matches!(result, Err(PlaybackError::Routing { .. })));
        assert_eq!(scheduler.active_sessions(), 0);
        assert_eq!(scheduler.pool().in_use(), 0);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let mut scheduler = PlaybackScheduler::new(4);
        let result = scheduler.play(
            0.0,
            AudioObjectConfig::new(Vec::new()),
            Vec3::ZERO,
            &PassthroughResolver,
        );
        assert_eq!(result, Err(PlaybackError::EmptyClipList));
        assert_eq!(scheduler.pool().in_use(), 0);
    }

    #[test]
    fn test_clip_override_out_of_range_releases_player() {
        let mut scheduler = PlaybackScheduler::new(1);
        // Force an override through a listener is not possible before play,
        // so exercise the error path via a looping session instead.
        let object = one_shot(1.0).with_looping(0.0, 0.0);
        let id = scheduler
            .play(0.0, object, Vec3::ZERO, &PassthroughResolver)
            .expect("playable");
        scheduler
            .session_mut(id)
            .expect("active")
            .clip_override = Some(9);

        // The loop restart hits the bad override and stops the session.
        scheduler.tick(1.0, 1.0);
        assert_eq!(scheduler.active_sessions(), 0);
        assert_eq!(scheduler.pool().in_use(), 0);
    }

    #[test]
    fn test_loop_with_interval_fires_events_in_order() {
        let mut scheduler = PlaybackScheduler::new(1);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        scheduler.add_listener(move |_, event| sink.borrow_mut().push(event));

        let object = one_shot(1.0).with_looping(1.0, 1.0);
        let id = scheduler
            .play(0.0, object, Vec3::ZERO, &PassthroughResolver)
            .expect("playable");

        // Clip ends at t=1, interval runs until t=2.
        scheduler.tick(1.0, 1.0);
        assert_eq!(
            scheduler.session(id).map(|s| s.state),
            Some(SessionState::IntervalWait)
        );

        scheduler.tick(2.0, 1.0);
        assert_eq!(
            scheduler.session(id).map(|s| s.state),
            Some(SessionState::Playing)
        );

        assert_eq!(
            *events.borrow(),
            vec![
                PlaybackEvent::ClipBegin,
                PlaybackEvent::ClipFinish,
                PlaybackEvent::NextLoopStart,
                PlaybackEvent::IntervalBegin,
                PlaybackEvent::IntervalEnd,
                PlaybackEvent::ClipBegin,
            ]
        );
    }

    #[test]
    fn test_zero_interval_replays_same_tick() {
        let mut scheduler = PlaybackScheduler::new(1);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        scheduler.add_listener(move |_, event| sink.borrow_mut().push(event));

        let object = one_shot(1.0).with_looping(0.0, 0.0);
        let id = scheduler
            .play(0.0, object, Vec3::ZERO, &PassthroughResolver)
            .expect("playable");

        scheduler.tick(1.0, 1.0);
        assert_eq!(
            scheduler.session(id).map(|s| s.state),
            Some(SessionState::Playing)
        );
        // The interval events still fire even with no wait.
        assert_eq!(
            *events.borrow(),
            vec![
                PlaybackEvent::ClipBegin,
                PlaybackEvent::ClipFinish,
                PlaybackEvent::NextLoopStart,
                PlaybackEvent::IntervalBegin,
                PlaybackEvent::IntervalEnd,
                PlaybackEvent::ClipBegin,
            ]
        );
    }

    #[test]
    fn test_stop_cancels_pending_timer() {
        let mut scheduler = PlaybackScheduler::new(1);
        let a = scheduler
            .play(0.0, one_shot(5.0), Vec3::ZERO, &PassthroughResolver)
            .expect("playable");
        scheduler.stop(a).expect("active session");
        assert_eq!(scheduler.pool().in_use(), 0);

        // The same player slot is reused by a fresh session; A's expired
        // stop-at-end timer must not touch it.
        let b = scheduler
            .play(1.0, one_shot(100.0), Vec3::ZERO, &PassthroughResolver)
            .expect("playable");
        scheduler.tick(6.0, 1.0);
        assert_eq!(
            scheduler.session(b).map(|s| s.state),
            Some(SessionState::Playing)
        );
        assert_eq!(scheduler.pool().in_use(), 1);
    }

    #[test]
    fn test_stop_unknown_session() {
        let mut scheduler = PlaybackScheduler::new(1);
        assert_eq!(
            scheduler.stop(SessionId::NULL),
            Err(PlaybackError::StaleHandle)
        );
    }

    #[test]
    fn test_sequential_selection_across_loops() {
        let mut scheduler = PlaybackScheduler::new(1);
        let clips = vec![
            ClipConfig::new(ClipAsset::new("a", 1.0)),
            ClipConfig::new(ClipAsset::new("b", 2.0)),
        ];
        let object = AudioObjectConfig::new(clips)
            .with_play_mode(PlayMode::Sequential)
            .with_looping(0.0, 0.0);
        let id = scheduler
            .play(0.0, object, Vec3::ZERO, &PassthroughResolver)
            .expect("playable");

        let first = scheduler
            .session(id)
            .and_then(|s| s.last_settings)
            .expect("configured");
        assert!((first.duration - 1.0).abs() < 1e-6);

        scheduler.tick(1.0, 1.0);
        let second = scheduler
            .session(id)
            .and_then(|s| s.last_settings)
            .expect("configured");
        assert!((second.duration - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_follow_target_repositions_when_flagged() {
        let mut scheduler = PlaybackScheduler::new(1);
        let mut object = one_shot(1.0);
        object.reposition_to_target = true;
        let target = Vec3::new(3.0, 0.0, 0.0);
        let id = scheduler
            .play_following(0.0, object, Vec3::ZERO, target, &PassthroughResolver)
            .expect("playable");

        let player = scheduler.session_player(id).expect("bound");
        assert_eq!(player.position, target);
    }
}
