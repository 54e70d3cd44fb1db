//! Bounded octree for positioned entries.
//!
//! The tree covers a fixed axis-aligned region chosen at construction;
//! insertions outside that region are rejected rather than silently
//! clamped, so a misconfigured world is diagnosable. Leaves split once
//! they exceed `max_per_node` (while depth allows) and subtrees merge
//! back into a leaf when removal drops them below `min_per_node`.
//!
//! Nearest-neighbor queries prune by distance to child bounds and can
//! filter entries with a predicate during traversal, which is how
//! disabled portals are skipped without being removed.

use glam::Vec3;
use resona_common::SpatialError;

/// A positioned entry stored in the octree.
#[derive(Debug, Clone)]
pub struct OctreeEntry<T> {
    /// World position of the entry.
    pub position: Vec3,
    /// Payload.
    pub value: T,
}

#[derive(Debug)]
struct Node<T> {
    center: Vec3,
    half_extent: Vec3,
    depth: u8,
    /// Entries held directly; non-empty only for leaves.
    entries: Vec<OctreeEntry<T>>,
    children: Option<Box<[Node<T>; 8]>>,
    /// Entry count of this whole subtree.
    count: usize,
}

/// Bounded octree mapping 3D positions to entries of type `T`.
#[derive(Debug)]
pub struct Octree<T> {
    root: Node<T>,
    max_depth: u8,
    min_per_node: usize,
    max_per_node: usize,
}

impl<T> Octree<T> {
    /// Creates an octree covering `center ± half_extent`.
    ///
    /// `max_depth` bounds subdivision; `min_per_node` is the merge
    /// threshold and `max_per_node` the split threshold.
    #[must_use]
    pub fn new(
        center: Vec3,
        half_extent: Vec3,
        max_depth: u8,
        min_per_node: usize,
        max_per_node: usize,
    ) -> Self {
        Self {
            root: Node {
                center,
                half_extent: half_extent.max(Vec3::ZERO),
                depth: 0,
                entries: Vec::new(),
                children: None,
                count: 0,
            },
            max_depth,
            min_per_node,
            max_per_node: max_per_node.max(1),
        }
    }

    /// Number of entries stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.count
    }

    /// Checks whether the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.count == 0
    }

    /// Inserts an entry at `position`.
    ///
    /// Positions outside the tree bounds are rejected with
    /// [`SpatialError::OutOfBounds`].
    pub fn insert(&mut self, position: Vec3, value: T) -> Result<(), SpatialError> {
        if !self.root.contains(position) {
            return Err(SpatialError::OutOfBounds {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }
        self.root
            .insert(OctreeEntry { position, value }, self.max_depth, self.max_per_node);
        Ok(())
    }

    /// Removes the first entry at (approximately) `position` matching the
    /// predicate. Returns the removed value, or `None` if nothing matched.
    pub fn remove<F>(&mut self, position: Vec3, mut predicate: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        if !self.root.contains(position) {
            return None;
        }
        self.root.remove(position, &mut predicate, self.min_per_node)
    }

    /// Finds the entry nearest to `position`.
    #[must_use]
    pub fn find_nearest(&self, position: Vec3) -> Option<&OctreeEntry<T>> {
        self.find_nearest_filtered(position, |_| true)
    }

    /// Finds the nearest entry whose value passes the filter.
    ///
    /// Returns `None` when the tree is empty or every entry is filtered out.
    #[must_use]
    pub fn find_nearest_filtered<F>(&self, position: Vec3, mut filter: F) -> Option<&OctreeEntry<T>>
    where
        F: FnMut(&T) -> bool,
    {
        let mut best: Option<(&OctreeEntry<T>, f32)> = None;
        self.root.nearest(position, &mut filter, &mut best);
        best.map(|(entry, _)| entry)
    }

    /// Visits every entry in the tree.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&OctreeEntry<T>),
    {
        self.root.for_each(&mut visit);
    }
}

/// Octant index of `position` relative to a node center.
fn octant_for(center: Vec3, position: Vec3) -> usize {
    let mut index = 0;
    if position.x >= center.x {
        index |= 1;
    }
    if position.y >= center.y {
        index |= 2;
    }
    if position.z >= center.z {
        index |= 4;
    }
    index
}

impl<T> Node<T> {
    fn contains(&self, position: Vec3) -> bool {
        let offset = (position - self.center).abs();
        offset.x <= self.half_extent.x
            && offset.y <= self.half_extent.y
            && offset.z <= self.half_extent.z
    }

    /// Squared distance from `position` to this node's bounds (0 inside).
    fn bounds_distance_squared(&self, position: Vec3) -> f32 {
        let offset = (position - self.center).abs() - self.half_extent;
        offset.max(Vec3::ZERO).length_squared()
    }

    fn octant_of(&self, position: Vec3) -> usize {
        octant_for(self.center, position)
    }

    fn child_center(&self, octant: usize) -> Vec3 {
        let quarter = self.half_extent * 0.5;
        Vec3::new(
            if octant & 1 != 0 {
                self.center.x + quarter.x
            } else {
                self.center.x - quarter.x
            },
            if octant & 2 != 0 {
                self.center.y + quarter.y
            } else {
                self.center.y - quarter.y
            },
            if octant & 4 != 0 {
                self.center.z + quarter.z
            } else {
                self.center.z - quarter.z
            },
        )
    }

    fn insert(&mut self, entry: OctreeEntry<T>, max_depth: u8, max_per_node: usize) {
        self.count += 1;
        let octant = self.octant_of(entry.position);
        if let Some(children) = self.children.as_mut() {
            children[octant].insert(entry, max_depth, max_per_node);
            return;
        }

        self.entries.push(entry);
        if self.entries.len() > max_per_node && self.depth < max_depth {
            self.split(max_depth, max_per_node);
        }
    }

    fn split(&mut self, max_depth: u8, max_per_node: usize) {
        let depth = self.depth + 1;
        let quarter = self.half_extent * 0.5;
        let children: [Node<T>; 8] = std::array::from_fn(|octant| Node {
            center: self.child_center(octant),
            half_extent: quarter,
            depth,
            entries: Vec::new(),
            children: None,
            count: 0,
        });
        self.children = Some(Box::new(children));

        let entries = std::mem::take(&mut self.entries);
        let center = self.center;
        if let Some(children) = self.children.as_mut() {
            for entry in entries {
                let octant = octant_for(center, entry.position);
                children[octant].insert(entry, max_depth, max_per_node);
            }
        }
    }

    fn remove<F>(&mut self, position: Vec3, predicate: &mut F, min_per_node: usize) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        if self.children.is_some() {
            let octant = self.octant_of(position);
            let removed = self
                .children
                .as_mut()
                .map(|children| children[octant].remove(position, predicate, min_per_node))?;
            if removed.is_some() {
                self.count -= 1;
                self.merge_if_sparse(min_per_node);
            }
            return removed;
        }

        let index = self.entries.iter().position(|entry| {
            entry.position.distance_squared(position) < 1e-6 && predicate(&entry.value)
        })?;
        self.count -= 1;
        Some(self.entries.swap_remove(index).value)
    }

    /// Collapses the subtree back into a leaf when it holds fewer entries
    /// than the merge threshold.
    fn merge_if_sparse(&mut self, min_per_node: usize) {
        if self.children.is_none() || self.count >= min_per_node {
            return;
        }
        let mut collected = Vec::with_capacity(self.count);
        if let Some(children) = self.children.take() {
            for mut child in *children {
                child.drain_into(&mut collected);
            }
        }
        self.entries = collected;
    }

    fn drain_into(&mut self, out: &mut Vec<OctreeEntry<T>>) {
        out.append(&mut self.entries);
        if let Some(children) = self.children.take() {
            for mut child in *children {
                child.drain_into(out);
            }
        }
    }

    fn nearest<'a, F>(
        &'a self,
        position: Vec3,
        filter: &mut F,
        best: &mut Option<(&'a OctreeEntry<T>, f32)>,
    ) where
        F: FnMut(&T) -> bool,
    {
        if self.count == 0 {
            return;
        }
        if let Some((_, best_dist)) = best {
            if self.bounds_distance_squared(position) >= *best_dist {
                return;
            }
        }

        for entry in &self.entries {
            if !filter(&entry.value) {
                continue;
            }
            let dist = entry.position.distance_squared(position);
            let closer = best.map_or(true, |(_, best_dist)| dist < best_dist);
            if closer {
                *best = Some((entry, dist));
            }
        }

        if let Some(children) = self.children.as_ref() {
            // Visit nearer octants first so pruning bites sooner.
            let mut order: Vec<(f32, &Node<T>)> = children
                .iter()
                .map(|child| (child.bounds_distance_squared(position), child))
                .collect();
            order.sort_by(|a, b| a.0.total_cmp(&b.0));
            for (_, child) in order {
                child.nearest(position, filter, best);
            }
        }
    }

    fn for_each<F>(&self, visit: &mut F)
    where
        F: FnMut(&OctreeEntry<T>),
    {
        for entry in &self.entries {
            visit(entry);
        }
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.for_each(visit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Octree<u32> {
        Octree::new(Vec3::ZERO, Vec3::splat(500.0), 5, 1, 10)
    }

    #[test]
    fn test_empty_query_returns_none() {
        let tree = tree();
        assert!(tree.find_nearest(Vec3::ZERO).is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_and_find_nearest() {
        let mut tree = tree();
        tree.insert(Vec3::new(10.0, 0.0, 0.0), 1).expect("in bounds");
        tree.insert(Vec3::new(-30.0, 5.0, 0.0), 2).expect("in bounds");
        tree.insert(Vec3::new(200.0, 0.0, 100.0), 3).expect("in bounds");

        let nearest = tree.find_nearest(Vec3::new(8.0, 0.0, 0.0)).expect("found");
        assert_eq!(nearest.value, 1);

        let nearest = tree.find_nearest(Vec3::new(-100.0, 0.0, 0.0)).expect("found");
        assert_eq!(nearest.value, 2);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut tree = tree();
        let err = tree
            .insert(Vec3::new(501.0, 0.0, 0.0), 1)
            .expect_err("out of bounds");
        assert!(matches!(err, SpatialError::OutOfBounds { .. }));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_split_preserves_entries() {
        let mut tree = tree();
        // More than max_per_node entries forces subdivision.
        for i in 0..50 {
            let offset = i as f32 * 7.3 - 180.0;
            tree.insert(Vec3::new(offset, offset * 0.5, -offset), i)
                .expect("in bounds");
        }
        assert_eq!(tree.len(), 50);

        let mut seen = 0;
        tree.for_each(|_| seen += 1);
        assert_eq!(seen, 50);

        // Every entry is still findable as its own nearest neighbor.
        for i in 0..50 {
            let offset = i as f32 * 7.3 - 180.0;
            let pos = Vec3::new(offset, offset * 0.5, -offset);
            let nearest = tree.find_nearest(pos).expect("found");
            assert_eq!(nearest.value, i);
        }
    }

    #[test]
    fn test_filtered_query_skips_entries() {
        let mut tree = tree();
        tree.insert(Vec3::new(1.0, 0.0, 0.0), 10).expect("in bounds");
        tree.insert(Vec3::new(50.0, 0.0, 0.0), 20).expect("in bounds");

        let nearest = tree
            .find_nearest_filtered(Vec3::ZERO, |v| *v != 10)
            .expect("found");
        assert_eq!(nearest.value, 20);

        assert!(tree.find_nearest_filtered(Vec3::ZERO, |_| false).is_none());
    }

    #[test]
    fn test_remove() {
        let mut tree = tree();
        tree.insert(Vec3::new(1.0, 2.0, 3.0), 7).expect("in bounds");
        tree.insert(Vec3::new(4.0, 5.0, 6.0), 8).expect("in bounds");

        assert_eq!(tree.remove(Vec3::new(1.0, 2.0, 3.0), |v| *v == 7), Some(7));
        assert_eq!(tree.len(), 1);
        // Removing again finds nothing.
        assert_eq!(tree.remove(Vec3::new(1.0, 2.0, 3.0), |v| *v == 7), None);

        let nearest = tree.find_nearest(Vec3::ZERO).expect("found");
        assert_eq!(nearest.value, 8);
    }

    #[test]
    fn test_remove_after_split_merges() {
        let mut tree = Octree::new(Vec3::ZERO, Vec3::splat(100.0), 4, 2, 4);
        let positions: Vec<Vec3> = (0..12)
            .map(|i| Vec3::new(i as f32 * 9.0 - 50.0, 0.0, i as f32 * 3.0 - 18.0))
            .collect();
        for (i, &pos) in positions.iter().enumerate() {
            tree.insert(pos, i).expect("in bounds");
        }
        for (i, &pos) in positions.iter().enumerate().take(11) {
            assert!(tree.remove(pos, |v| *v == i).is_some());
        }
        assert_eq!(tree.len(), 1);
        let nearest = tree.find_nearest(Vec3::ZERO).expect("found");
        assert_eq!(nearest.value, 11);
    }

    #[test]
    fn test_nearest_across_octants() {
        let mut tree = tree();
        // Points straddling the center plane; nearest must not be trapped
        // in the query point's own octant.
        for i in 0..20 {
            tree.insert(Vec3::new(100.0 + i as f32, 100.0, 100.0), i)
                .expect("in bounds");
        }
        tree.insert(Vec3::new(-1.0, 0.0, 0.0), 99).expect("in bounds");
        let nearest = tree.find_nearest(Vec3::new(1.0, 0.0, 0.0)).expect("found");
        assert_eq!(nearest.value, 99);
    }
}
