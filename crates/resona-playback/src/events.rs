//! Playback lifecycle events.
//!
//! Listeners are an explicit ordered list invoked synchronously in
//! registration order; there is no global event bus. Listeners observe
//! and may mutate the session (e.g. set a clip override between loop
//! iterations) but cannot cancel the lifecycle itself.

use crate::session::PlaybackSession;

/// Lifecycle events fired by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A clip just started playing.
    ClipBegin,
    /// A clip reached its trim end.
    ClipFinish,
    /// A looping session decided to run another iteration.
    NextLoopStart,
    /// The inter-loop wait started.
    IntervalBegin,
    /// The inter-loop wait ended; a new play follows.
    IntervalEnd,
}

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

type Callback = Box<dyn FnMut(&mut PlaybackSession, PlaybackEvent)>;

/// Ordered list of lifecycle listeners.
#[derive(Default)]
pub struct EventListeners {
    entries: Vec<(ListenerHandle, Callback)>,
    next_handle: u64,
}

impl std::fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl EventListeners {
    /// Creates an empty listener list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; it will be invoked after all previously
    /// registered ones.
    pub fn add<F>(&mut self, listener: F) -> ListenerHandle
    where
        F: FnMut(&mut PlaybackSession, PlaybackEvent) + 'static,
    {
        self.next_handle += 1;
        let handle = ListenerHandle(self.next_handle);
        self.entries.push((handle, Box::new(listener)));
        handle
    }

    /// Removes a listener. Returns `false` if the handle was unknown.
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        self.entries.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invokes every listener in registration order.
    pub fn emit(&mut self, session: &mut PlaybackSession, event: PlaybackEvent) {
        for (_, callback) in &mut self.entries {
            callback(session, event);
        }
    }
}
