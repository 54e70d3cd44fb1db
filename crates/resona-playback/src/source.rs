//! Source configuration: turning a clip config plus an audio object's
//! randomization ranges into concrete source parameters.

use serde::{Deserialize, Serialize};

use resona_common::{random_in_range, PlaybackError};

use crate::clip::{AudioObjectConfig, ClipConfig};

/// Concrete parameters for one playback of one clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Final volume (clip volume × random multiplier).
    pub volume: f32,
    /// Final pitch (clip pitch × random multiplier).
    pub pitch: f32,
    /// Stereo pan.
    pub pan: f32,
    /// Seek position in source time, seconds.
    pub start_time: f32,
    /// Playback duration until the stop-at-end fires, seconds.
    pub duration: f32,
}

/// Resolves the source parameters for a clip under an audio object.
///
/// The trim start is scaled by the resolved pitch; a negative pitch seeks
/// from the end of the clip instead. The duration covers the trim window
/// at the resolved playback speed.
pub fn configure_source(
    object: &AudioObjectConfig,
    clip: &ClipConfig,
) -> Result<SourceSettings, PlaybackError> {
    let volume = clip.volume * random_in_range(object.volume_range.0, object.volume_range.1);
    let pitch = clip.pitch * random_in_range(object.pitch_range.0, object.pitch_range.1);

    if pitch == 0.0 {
        return Err(PlaybackError::ZeroPitch);
    }

    let start = clip.start_position;
    let end = clip.effective_end();

    let start_time = if pitch >= 0.0 {
        (start * pitch).abs()
    } else {
        // Negative pitch plays in reverse; seek from the clip end.
        ((clip.clip.length - start) * pitch).abs()
    };

    let duration = ((end - start) / pitch).abs();

    Ok(SourceSettings {
        volume,
        pitch,
        pan: clip.pan,
        start_time,
        duration,
    })
}
