//! Error types for the Resona audio engine.

use thiserror::Error;

/// Top-level error type for Resona operations.
#[derive(Debug, Error)]
pub enum ResonaError {
    /// Spatial query or registration errors
    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    /// Playback errors
    #[error("playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// Spatial index and geometry errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    /// Position lies outside the fixed bounds of the index
    #[error("position ({x}, {y}, {z}) is outside the index bounds")]
    OutOfBounds {
        /// X coordinate
        x: f32,
        /// Y coordinate
        y: f32,
        /// Z coordinate
        z: f32,
    },

    /// Shape definition and instance data disagree
    #[error("shape data does not match shape variant {shape}")]
    ShapeMismatch {
        /// Name of the shape variant
        shape: &'static str,
    },
}

/// Playback and scheduling errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// The audio object has no clips to choose from
    #[error("audio object has an empty clip list")]
    EmptyClipList,

    /// A clip index was out of range for the catalog
    #[error("clip index {index} out of range (catalog has {count} clips)")]
    ClipIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Catalog size
        count: usize,
    },

    /// A clip was configured with zero pitch
    #[error("clip pitch resolved to zero; duration is undefined")]
    ZeroPitch,

    /// The player pool has no free players
    #[error("player pool exhausted ({capacity} players in use)")]
    PoolExhausted {
        /// Pool capacity
        capacity: usize,
    },

    /// A session or player handle is no longer live
    #[error("stale session or player handle")]
    StaleHandle,

    /// The channel could not be resolved to an output routing target
    #[error("failed to resolve routing for channel {channel}")]
    Routing {
        /// Raw channel ID
        channel: u32,
    },
}

/// Result type alias for Resona operations.
pub type ResonaResult<T> = Result<T, ResonaError>;
