//! # Resona Common
//!
//! Common types, utilities, and shared abstractions for the Resona
//! spatial-audio engine.
//!
//! This crate provides foundational types used across all Resona subsystems:
//! - ID types (SessionId, PlayerId, ZoneId, PortalId, ...)
//! - Common error types
//! - Math helpers (lerp, clamping, exponential smoothing)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::math::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_exports() {
        let id = SessionId::new();
        assert!(id.is_valid());
        assert!((lerp(0.0, 2.0, 0.5) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_default_group_is_reserved() {
        assert_eq!(PortalGroupId::DEFAULT.raw(), 0);
    }
}
