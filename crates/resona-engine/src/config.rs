//! Engine configuration.

use serde::{Deserialize, Serialize};

use resona_spatial::occlusion::OcclusionConfig;
use resona_spatial::portal::PortalIndexConfig;

/// Tuning parameters for an [`AudioWorld`](crate::world::AudioWorld).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Occlusion factor, smoothing and probe radius.
    pub occlusion: OcclusionConfig,
    /// Bounds and thresholds of the portal spatial index.
    pub portal_index: PortalIndexConfig,
    /// Number of pooled players.
    pub pool_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            occlusion: OcclusionConfig::default(),
            portal_index: PortalIndexConfig::default(),
            pool_capacity: 32,
        }
    }
}
