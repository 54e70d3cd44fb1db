//! ID types for players, sessions, zones and portals.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for session IDs.
static SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Global counter for zone IDs.
static ZONE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Global counter for portal IDs.
static PORTAL_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for one playback session.
///
/// A session is the runtime state of one active playback; a fresh ID is
/// allocated every time playback starts, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    /// Creates a new unique session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(SESSION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a session ID from a raw value (for deserialization).
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid session ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) session ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a pooled audio player.
///
/// Player IDs are pool slot handles; they stay stable for the lifetime of
/// the pool and are recycled when a player is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a player ID from a pool slot index.
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Returns the pool slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier for an audio zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(u64);

impl ZoneId {
    /// Creates a new unique zone ID.
    #[must_use]
    pub fn new() -> Self {
        Self(ZONE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortalId(u64);

impl PortalId {
    /// Creates a new unique portal ID.
    #[must_use]
    pub fn new() -> Self {
        Self(PORTAL_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for PortalId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a portal group.
///
/// Zones only route sound through portals of their own group. Portals
/// registered without an explicit group land in [`PortalGroupId::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortalGroupId(u32);

impl PortalGroupId {
    /// The reserved default group.
    pub const DEFAULT: Self = Self(0);

    /// Creates a portal group ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Checks if this is the reserved default group.
    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl Default for PortalGroupId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Identifier for an output routing channel.
///
/// A channel resolves to an opaque output routing target at playback time;
/// how the host maps channels to its mixer is outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(u32);

impl ChannelId {
    /// The master channel.
    pub const MASTER: Self = Self(0);

    /// Creates a channel ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::MASTER
    }
}
