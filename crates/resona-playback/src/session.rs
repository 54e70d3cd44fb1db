//! Playback sessions.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use resona_common::{PlayerId, SessionId};

use crate::clip::AudioObjectConfig;
use crate::selector::ClipSelector;
use crate::source::SourceSettings;

/// Lifecycle state of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, nothing configured yet.
    Idle,
    /// Clip resolved, source parameters being applied.
    Configuring,
    /// A clip is playing; a stop-at-end timer is pending.
    Playing,
    /// Between loop iterations; an interval timer is pending.
    IntervalWait,
    /// Definitively stopped; the player has been recycled.
    Stopped,
}

/// Runtime state of one active playback.
///
/// Created when playback starts, mutated on each loop iteration, and
/// recycled when the session definitively stops. Lifecycle listeners
/// receive it mutably and may adjust it between iterations.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    /// Unique session ID.
    pub id: SessionId,
    /// The pooled player bound to this session.
    pub player: PlayerId,
    /// The audio object being played.
    pub object: AudioObjectConfig,
    /// Resolved playback position.
    pub position: Vec3,
    /// Position of a moving target this session follows, if any.
    pub follow_position: Option<Vec3>,
    /// Explicit clip index override; bypasses the selector when set.
    pub clip_override: Option<usize>,
    /// Whether the player stays attached to the follow target.
    pub parent_to_target: bool,
    /// Clip selection state.
    pub selector: ClipSelector,
    /// Settings of the most recently configured clip.
    pub last_settings: Option<SourceSettings>,
    /// Current lifecycle state.
    pub state: SessionState,
}

impl PlaybackSession {
    /// Creates an idle session binding a player to an audio object.
    #[must_use]
    pub fn new(player: PlayerId, object: AudioObjectConfig, position: Vec3) -> Self {
        let selector = ClipSelector::new(object.play_mode);
        Self {
            id: SessionId::new(),
            player,
            object,
            position,
            follow_position: None,
            clip_override: None,
            parent_to_target: false,
            selector,
            last_settings: None,
            state: SessionState::Idle,
        }
    }

    /// Moves the playback position to the follow target, when following.
    pub fn refresh_position(&mut self) {
        if let Some(target) = self.follow_position {
            if self.object.reposition_to_target {
                self.position = target;
            }
        }
    }
}
