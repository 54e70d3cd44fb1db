//! The pooled audio player.
//!
//! A player is the runtime actor behind one playback session: it carries
//! the spatial parameters zones write every frame, the smoothed volume
//! multiplier, and the filter parameter targets. It knows nothing about
//! clip lifecycles; the scheduler drives those.

use glam::Vec3;

use resona_common::{smooth_approach, PlayerId};
use resona_spatial::filter::FilterParams;

use crate::source::SourceSettings;

/// Runtime state of one pooled player.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    /// World position sound appears to come from.
    pub position: Vec3,
    /// Base volume from the configured source settings.
    pub base_volume: f32,
    /// Resolved pitch.
    pub pitch: f32,
    /// Stereo pan.
    pub pan: f32,
    /// Spatial blend, 0 = 2D, 1 = 3D.
    pub spatial_blend: f32,
    /// Stereo spread in degrees.
    pub spread: f32,
    /// Whether a zone is allowed to overwrite the spatial blend.
    pub use_spatial_blend_multiplier: bool,
    /// Filter chain targets, written by zone evaluation.
    pub filters: FilterParams,
    current_volume_multiplier: f32,
    target_volume_multiplier: f32,
    smooth_time: f32,
    generation: u64,
    in_use: bool,
}

impl Player {
    /// Creates an idle player for the given pool slot.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
            base_volume: 1.0,
            pitch: 1.0,
            pan: 0.0,
            spatial_blend: 1.0,
            spread: 0.0,
            use_spatial_blend_multiplier: false,
            filters: FilterParams::default(),
            current_volume_multiplier: 1.0,
            target_volume_multiplier: 1.0,
            smooth_time: 0.1,
            generation: 0,
            in_use: false,
        }
    }

    /// Pool slot ID.
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Generation token; pending timers referencing an older generation
    /// are stale and must not act.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidates every outstanding timer for this player.
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Whether the player is bound to a session.
    #[must_use]
    pub fn in_use(&self) -> bool {
        self.in_use
    }

    pub(crate) fn mark_acquired(&mut self) {
        self.in_use = true;
    }

    /// Resets to idle state on release back to the pool. Pending timers
    /// die with the generation bump.
    pub(crate) fn reset(&mut self) {
        self.bump_generation();
        self.in_use = false;
        self.position = Vec3::ZERO;
        self.base_volume = 1.0;
        self.pitch = 1.0;
        self.pan = 0.0;
        self.spatial_blend = 1.0;
        self.spread = 0.0;
        self.use_spatial_blend_multiplier = false;
        self.filters = FilterParams::default();
        self.current_volume_multiplier = 1.0;
        self.target_volume_multiplier = 1.0;
    }

    /// Applies freshly configured source settings.
    pub fn apply_settings(&mut self, settings: &SourceSettings, spatial_blend: f32) {
        self.base_volume = settings.volume;
        self.pitch = settings.pitch;
        self.pan = settings.pan;
        self.spatial_blend = spatial_blend;
    }

    /// Sets the volume-multiplier smoothing time constant.
    pub fn set_smooth_time(&mut self, smooth_time: f32) {
        self.smooth_time = smooth_time.max(0.0);
    }

    /// Current (smoothed) volume multiplier.
    #[must_use]
    pub fn current_volume_multiplier(&self) -> f32 {
        self.current_volume_multiplier
    }

    /// Sets the smoothing target for the volume multiplier.
    pub fn set_target_volume_multiplier(&mut self, target: f32) {
        self.target_volume_multiplier = target.max(0.0);
    }

    /// Zone write: spatial blend.
    pub fn update_spatial_blend(&mut self, blend: f32) {
        self.spatial_blend = blend.clamp(0.0, 1.0);
    }

    /// Zone write: stereo spread.
    pub fn update_spread(&mut self, spread: f32) {
        self.spread = spread.clamp(0.0, 360.0);
    }

    /// Advances the volume-multiplier smoothing by one tick.
    pub fn tick(&mut self, dt: f32) {
        self.current_volume_multiplier = smooth_approach(
            self.current_volume_multiplier,
            self.target_volume_multiplier,
            self.smooth_time,
            dt,
        );
    }

    /// Final output volume: base volume times the smoothed multiplier.
    #[must_use]
    pub fn effective_volume(&self) -> f32 {
        self.base_volume * self.current_volume_multiplier
    }
}
