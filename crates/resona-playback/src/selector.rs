//! Clip selection strategies.

use serde::{Deserialize, Serialize};

/// Strategy for picking the next clip from a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayMode {
    /// Always the first clip.
    #[default]
    First,
    /// Round-robin through the catalog, wrapping.
    Sequential,
    /// Uniform random pick each call.
    Random,
    /// Uniform random pick avoiding recently played clips; the history
    /// resets once every clip has been used, and the clip just played is
    /// never repeated back-to-back (unless the catalog has one entry).
    RandomDifferent,
}

/// Mutable selection state for one playback session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipSelector {
    mode: PlayMode,
    /// Next index for `Sequential`.
    cursor: usize,
    /// Indices used in the current `RandomDifferent` cycle.
    history: Vec<usize>,
    /// Last pick, to block immediate repeats across cycle resets.
    last: Option<usize>,
}

impl ClipSelector {
    /// Creates selector state for the given strategy.
    #[must_use]
    pub fn new(mode: PlayMode) -> Self {
        Self {
            mode,
            cursor: 0,
            history: Vec::new(),
            last: None,
        }
    }

    /// The strategy this selector follows.
    #[must_use]
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Picks the next clip index from a catalog of `clip_count` entries.
    ///
    /// Returns `None` for an empty catalog.
    pub fn select(&mut self, clip_count: usize) -> Option<usize> {
        if clip_count == 0 {
            return None;
        }
        let index = match self.mode {
            PlayMode::First => 0,
            PlayMode::Sequential => {
                let index = self.cursor % clip_count;
                self.cursor = (index + 1) % clip_count;
                index
            }
            PlayMode::Random => fastrand::usize(..clip_count),
            PlayMode::RandomDifferent => self.select_random_different(clip_count),
        };
        self.last = Some(index);
        Some(index)
    }

    fn select_random_different(&mut self, clip_count: usize) -> usize {
        let mut candidates: Vec<usize> =
            (0..clip_count).filter(|i| !self.history.contains(i)).collect();

        if candidates.is_empty() {
            // Cycle exhausted: reset, but keep the last pick blocked so no
            // clip ever plays twice in a row.
            self.history.clear();
            candidates = (0..clip_count)
                .filter(|i| clip_count == 1 || Some(*i) != self.last)
                .collect();
        }

        let index = candidates[fastrand::usize(..candidates.len())];
        self.history.push(index);
        index
    }

    /// Clears accumulated state (history, cursor).
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.history.clear();
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog() {
        let mut selector = ClipSelector::new(PlayMode::Random);
        assert_eq!(selector.select(0), None);
    }

    #[test]
    fn test_first_always_zero() {
        let mut selector = ClipSelector::new(PlayMode::First);
        for _ in 0..5 {
            assert_eq!(selector.select(4), Some(0));
        }
    }

    #[test]
    fn test_sequential_wraps() {
        let mut selector = ClipSelector::new(PlayMode::Sequential);
        let picks: Vec<_> = (0..7).map(|_| selector.select(3)).collect();
        assert_eq!(
            picks,
            vec![Some(0), Some(1), Some(2), Some(0), Some(1), Some(2), Some(0)]
        );
    }

    #[test]
    fn test_random_in_range() {
        let mut selector = ClipSelector::new(PlayMode::Random);
        for _ in 0..100 {
            let index = selector.select(3).expect("non-empty");
            assert!(index < 3);
        }
    }

    #[test]
    fn test_random_different_no_consecutive_repeats() {
        let mut selector = ClipSelector::new(PlayMode::RandomDifferent);
        let mut previous = None;
        for _ in 0..100 {
            let index = selector.select(3).expect("non-empty");
            assert_ne!(Some(index), previous, "repeated clip back-to-back");
            previous = Some(index);
        }
    }

    #[test]
    fn test_random_different_covers_catalog_each_cycle() {
        let mut selector = ClipSelector::new(PlayMode::RandomDifferent);
        let mut seen = [false; 4];
        for _ in 0..4 {
            let index = selector.select(4).expect("non-empty");
            assert!(!seen[index], "clip repeated before cycle exhausted");
            seen[index] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_random_different_single_clip() {
        let mut selector = ClipSelector::new(PlayMode::RandomDifferent);
        assert_eq!(selector.select(1), Some(0));
        assert_eq!(selector.select(1), Some(0));
    }

    #[test]
    fn test_reset() {
        let mut selector = ClipSelector::new(PlayMode::Sequential);
        let _ = selector.select(3);
        let _ = selector.select(3);
        selector.reset();
        assert_eq!(selector.select(3), Some(0));
    }
}
