//! Output channel routing.
//!
//! The scheduler resolves an audio object's channel to a concrete route
//! before any playback starts. Resolution failures abort the play call;
//! a session is never started half-routed.

use resona_common::{ChannelId, PlaybackError};

/// Opaque handle to a resolved output route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteHandle(u32);

impl RouteHandle {
    /// Creates a handle wrapping a backend-specific route index.
    #[must_use]
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Backend route index.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Resolves logical channels to concrete output routes.
pub trait ChannelResolver {
    /// Resolves `channel`, or fails if the channel has no route.
    fn resolve(&self, channel: ChannelId) -> Result<RouteHandle, PlaybackError>;
}

/// Resolver that maps every channel onto itself.
///
/// Useful for tests and for backends without a mixer hierarchy.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughResolver;

impl ChannelResolver for PassthroughResolver {
    fn resolve(&self, channel: ChannelId) -> Result<RouteHandle, PlaybackError> {
        Ok(RouteHandle::new(channel.raw()))
    }
}

/// Resolver that rejects every channel.
///
/// Test double for exercising routing failure paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnroutedResolver;

impl ChannelResolver for UnroutedResolver {
    fn resolve(&self, channel: ChannelId) -> Result<RouteHandle, PlaybackError> {
        Err(PlaybackError::Routing {
            channel: channel.raw(),
        })
    }
}
