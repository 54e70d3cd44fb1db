//! # Resona Engine
//!
//! The simulation root of the Resona spatial-audio engine: an explicit
//! [`AudioWorld`](world::AudioWorld) context owning zones, portals, the
//! player pool and the playback scheduler, driven by the host's frame
//! loop.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ambient;
pub mod config;
pub mod world;


/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ambient::*;
    pub use crate::config::*;
    pub use crate::world::*;
}

pub use prelude::*;
