//! # Resona Playback
//!
//! Clip playback layer of the Resona audio engine.
//!
//! This crate turns immutable audio-object configurations into running
//! playback:
//! - Clip catalogs with trim windows and randomization ranges
//! - Selection strategies (first, sequential, random, random-different)
//! - Source configuration (volume/pitch rolls, pitch-scaled seek and
//!   duration)
//! - A fixed pool of players with smoothed volume multipliers
//! - A scheduler driving clip lifecycles, looping and interval waits
//! - Ordered lifecycle listeners and channel routing at the seam to the
//!   host mixer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clip;
pub mod events;
pub mod player;
pub mod pool;
pub mod routing;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod source;
pub mod timer;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::clip::*;
    pub use crate::events::*;
    pub use crate::player::*;
    pub use crate::pool::*;
    pub use crate::routing::*;
    pub use crate::scheduler::*;
    pub use crate::selector::*;
    pub use crate::session::*;
    pub use crate::source::*;
    pub use crate::timer::*;
}

pub use prelude::*;
