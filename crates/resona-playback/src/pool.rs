//! Fixed-capacity player pool.

use resona_common::{PlaybackError, PlayerId};

use crate::player::Player;

/// Pool of reusable players.
///
/// Capacity is fixed at construction; running out of players is an
/// explicit failure surfaced to the caller, never a silent no-op.
#[derive(Debug)]
pub struct PlayerPool {
    players: Vec<Player>,
    free: Vec<PlayerId>,
}

impl PlayerPool {
    /// Creates a pool with `capacity` players.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let players: Vec<Player> = (0..capacity)
            .map(|i| Player::new(PlayerId::from_index(i as u32)))
            .collect();
        // Hand out low slots first.
        let free: Vec<PlayerId> = players.iter().rev().map(Player::id).collect();
        Self { players, free }
    }

    /// Pool capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.players.len()
    }

    /// Number of players currently bound to sessions.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.players.len() - self.free.len()
    }

    /// Acquires a free player.
    pub fn acquire(&mut self) -> Result<PlayerId, PlaybackError> {
        let id = self.free.pop().ok_or(PlaybackError::PoolExhausted {
            capacity: self.players.len(),
        })?;
        self.players[id.index()].mark_acquired();
        Ok(id)
    }

    /// Releases a player back to the pool, resetting it. Releasing an
    /// already-free player is a logic error and ignored with a debug
    /// assertion.
    pub fn release(&mut self, id: PlayerId) {
        let Some(player) = self.players.get_mut(id.index()) else {
            debug_assert!(false, "release of unknown player {id:?}");
            return;
        };
        if !player.in_use() {
            debug_assert!(false, "double release of player {id:?}");
            return;
        }
        player.reset();
        self.free.push(id);
    }

    /// Borrows a player.
    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Mutably borrows a player.
    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    /// Ticks volume smoothing on every in-use player.
    pub fn tick(&mut self, dt: f32) {
        for player in self.players.iter_mut().filter(|p| p.in_use()) {
            player.tick(dt);
        }
    }
}
