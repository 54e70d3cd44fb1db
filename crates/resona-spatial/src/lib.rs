//! # Resona Spatial
//!
//! Spatial propagation layer of the Resona audio engine.
//!
//! This crate provides the geometric side of sound propagation:
//! - Volume shapes (box, sphere) with inside/closest-point queries
//! - A bounded octree index over portals, partitioned by group
//! - Per-frame zone evaluation (blend factor, emission position, portal
//!   re-routing)
//! - Line-of-sight occlusion through a host-provided obstruction test
//! - Filter parameter modulation from blend/occlusion factors

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod filter;
pub mod occlusion;
pub mod octree;
pub mod portal;
pub mod shape;
pub mod zone;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::filter::*;
    pub use crate::occlusion::*;
    pub use crate::octree::*;
    pub use crate::portal::*;
    pub use crate::shape::*;
    pub use crate::zone::*;
}

pub use prelude::*;
