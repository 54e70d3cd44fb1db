//! Clip and audio-object configuration.
//!
//! These are immutable authoring-time catalogs: a [`ClipConfig`] holds one
//! clip's playback parameters, an [`AudioObjectConfig`] groups clips with
//! randomization ranges, looping behavior and routing. How the underlying
//! assets are loaded is the host's concern; the engine only sees names and
//! lengths.

use serde::{Deserialize, Serialize};

use resona_common::ChannelId;

use crate::selector::PlayMode;

/// Opaque handle to a loaded audio clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipAsset {
    /// Asset name or path, for diagnostics.
    pub name: String,
    /// Clip length in seconds.
    pub length: f32,
}

impl ClipAsset {
    /// Creates a clip handle.
    #[must_use]
    pub fn new(name: impl Into<String>, length: f32) -> Self {
        Self {
            name: name.into(),
            length: length.max(0.0),
        }
    }
}

/// Playback parameters for one clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipConfig {
    /// The clip to play.
    pub clip: ClipAsset,
    /// Base volume.
    pub volume: f32,
    /// Base pitch (1.0 = unchanged; negative plays in reverse).
    pub pitch: f32,
    /// Stereo pan, -1..1.
    pub pan: f32,
    /// Trim start in seconds from the clip start.
    pub start_position: f32,
    /// Trim end in seconds; `None` means the full clip length.
    pub end_position: Option<f32>,
}

impl ClipConfig {
    /// Creates a config with neutral parameters for the given clip.
    #[must_use]
    pub fn new(clip: ClipAsset) -> Self {
        Self {
            clip,
            volume: 1.0,
            pitch: 1.0,
            pan: 0.0,
            start_position: 0.0,
            end_position: None,
        }
    }

    /// Sets the base volume.
    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Sets the base pitch.
    #[must_use]
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Sets the stereo pan.
    #[must_use]
    pub fn with_pan(mut self, pan: f32) -> Self {
        self.pan = pan.clamp(-1.0, 1.0);
        self
    }

    /// Sets the trim window. The end is clamped so it never precedes the
    /// start.
    #[must_use]
    pub fn with_trim(mut self, start: f32, end: f32) -> Self {
        self.start_position = start.max(0.0);
        self.end_position = Some(end.max(self.start_position));
        self
    }

    /// Resolved trim end: the configured end or the full clip length,
    /// never before the trim start.
    #[must_use]
    pub fn effective_end(&self) -> f32 {
        self.end_position
            .unwrap_or(self.clip.length)
            .max(self.start_position)
    }
}

/// Distance rolloff mode hint for the host's spatializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RolloffMode {
    /// Logarithmic distance falloff.
    #[default]
    Logarithmic,
    /// Linear falloff to the max distance.
    Linear,
    /// Host-defined custom curve.
    Custom,
}

/// An immutable catalog of clips plus playback policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioObjectConfig {
    /// Clip catalog.
    pub clips: Vec<ClipConfig>,
    /// Random volume multiplier range applied per play.
    pub volume_range: (f32, f32),
    /// Random pitch multiplier range applied per play.
    pub pitch_range: (f32, f32),
    /// Rolloff mode hint.
    pub rolloff: RolloffMode,
    /// Default spatial blend (0 = 2D, 1 = 3D) before zones modulate it.
    pub spatial_blend: f32,
    /// Whether playback loops after each clip finishes.
    pub looping: bool,
    /// Random wait range between loop iterations, seconds.
    pub loop_interval: (f32, f32),
    /// Clip selection strategy.
    pub play_mode: PlayMode,
    /// Output routing channel.
    pub channel: ChannelId,
    /// Play at the follow target's position instead of the call position.
    pub reposition_to_target: bool,
    /// Keep the player attached to the follow target while playing.
    pub parent_to_target: bool,
}

impl AudioObjectConfig {
    /// Creates a catalog with neutral policy around the given clips.
    #[must_use]
    pub fn new(clips: Vec<ClipConfig>) -> Self {
        Self {
            clips,
            volume_range: (1.0, 1.0),
            pitch_range: (1.0, 1.0),
            rolloff: RolloffMode::default(),
            spatial_blend: 1.0,
            looping: false,
            loop_interval: (0.0, 0.0),
            play_mode: PlayMode::First,
            channel: ChannelId::MASTER,
            reposition_to_target: false,
            parent_to_target: false,
        }
    }

    /// Sets the random volume multiplier range.
    #[must_use]
    pub fn with_volume_range(mut self, min: f32, max: f32) -> Self {
        self.volume_range = (min, max.max(min));
        self
    }

    /// Sets the random pitch multiplier range.
    #[must_use]
    pub fn with_pitch_range(mut self, min: f32, max: f32) -> Self {
        self.pitch_range = (min, max.max(min));
        self
    }

    /// Enables looping with the given interval range.
    #[must_use]
    pub fn with_looping(mut self, min_interval: f32, max_interval: f32) -> Self {
        self.looping = true;
        self.loop_interval = (min_interval, max_interval.max(min_interval));
        self
    }

    /// Sets the clip selection strategy.
    #[must_use]
    pub fn with_play_mode(mut self, mode: PlayMode) -> Self {
        self.play_mode = mode;
        self
    }

    /// Sets the routing channel.
    #[must_use]
    pub fn with_channel(mut self, channel: ChannelId) -> Self {
        self.channel = channel;
        self
    }

    /// Sets the default spatial blend.
    #[must_use]
    pub fn with_spatial_blend(mut self, blend: f32) -> Self {
        self.spatial_blend = blend.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(length: f32) -> ClipAsset {
        ClipAsset::new("test", length)
    }

    #[test]
    fn test_effective_end_defaults_to_length() {
        let config = ClipConfig::new(clip(4.0));
        assert!((config.effective_end() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_trim_end_never_precedes_start() {
        let config = ClipConfig::new(clip(4.0)).with_trim(2.0, 1.0);
        assert!((config.start_position - 2.0).abs() < f32::EPSILON);
        assert!((config.effective_end() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_object_builder() {
        let object = AudioObjectConfig::new(vec![ClipConfig::new(clip(1.0))])
            .with_volume_range(0.8, 1.2)
            .with_looping(1.0, 3.0)
            .with_play_mode(PlayMode::Random);
        assert!(object.looping);
        assert_eq!(object.loop_interval, (1.0, 3.0));
        assert_eq!(object.play_mode, PlayMode::Random);
    }

    #[test]
    fn test_inverted_ranges_normalized() {
        let object = AudioObjectConfig::new(Vec::new()).with_pitch_range(1.5, 0.5);
        assert_eq!(object.pitch_range, (1.5, 1.5));
    }
}
