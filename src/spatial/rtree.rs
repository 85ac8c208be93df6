//! R-tree based spatial index using the rstar crate.
//!
//! The tree is a hierarchical partition of node centers. Collision queries
//! walk it with a selection function that refuses to descend into any subtree
//! whose envelope is strictly separated from the search bounds.

use rstar::{RTree, RTreeObject, SelectionFunction, AABB};

use super::Bounds;
use crate::nodes::NodeId;

/// A node center stored in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
}

impl NodePoint {
    pub fn new(id: NodeId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

/// Prunes subtrees and points that lie strictly outside the bounds.
struct Overlapping(Bounds);

impl SelectionFunction<NodePoint> for Overlapping {
    fn should_unpack_parent(&self, envelope: &AABB<[f32; 2]>) -> bool {
        !self.0.is_separated_from(envelope)
    }

    fn should_unpack_leaf(&self, leaf: &NodePoint) -> bool {
        !self.0.is_separated_from(&leaf.envelope())
    }
}

/// Spatial index over node centers.
///
/// The index holds a snapshot of positions taken at the last rebuild. Callers
/// read live positions from the store for anything they return.
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Replace the contents with a fresh bulk-loaded tree.
    pub fn rebuild(&mut self, points: &[(NodeId, f32, f32)]) {
        let node_points: Vec<_> = points
            .iter()
            .map(|&(id, x, y)| NodePoint::new(id, x, y))
            .collect();

        self.tree = RTree::bulk_load(node_points);
    }

    /// Visit every indexed node whose center is not separated from `bounds`,
    /// pruning whole subtrees on the way down.
    pub fn visit(&self, bounds: Bounds) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .locate_with_selection_function(Overlapping(bounds))
            .map(|point| point.id)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: u32, spacing: f32) -> Vec<(NodeId, f32, f32)> {
        (0..n * n)
            .map(|i| {
                let x = (i % n) as f32 * spacing;
                let y = (i / n) as f32 * spacing;
                (NodeId(i), x, y)
            })
            .collect()
    }

    #[test]
    fn test_visit_returns_points_inside_bounds() {
        let mut index = SpatialIndex::new();
        index.rebuild(&grid(10, 10.0));

        let mut hits: Vec<_> = index.visit(Bounds::around(45.0, 45.0, 6.0)).collect();
        hits.sort();

        // (40,40) (50,40) (40,50) (50,50)
        assert_eq!(hits, vec![NodeId(44), NodeId(45), NodeId(54), NodeId(55)]);
    }

    #[test]
    fn test_visit_includes_points_on_the_edge() {
        let mut index = SpatialIndex::new();
        index.rebuild(&[(NodeId(0), 0.0, 0.0), (NodeId(1), 10.0, 0.0)]);

        let hits: Vec<_> = index.visit(Bounds::around(0.0, 0.0, 10.0)).collect();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_visit_matches_linear_scan() {
        let points = grid(25, 3.7);
        let mut index = SpatialIndex::new();
        index.rebuild(&points);

        for &(cx, cy, half) in &[(0.0, 0.0, 5.0), (40.0, 12.0, 9.5), (88.8, 88.8, 1.0)] {
            let bounds = Bounds::around(cx, cy, half);
            let mut expected: Vec<_> = points
                .iter()
                .filter(|&&(_, x, y)| {
                    x >= bounds.min_x && x <= bounds.max_x && y >= bounds.min_y && y <= bounds.max_y
                })
                .map(|&(id, _, _)| id)
                .collect();
            let mut got: Vec<_> = index.visit(bounds).collect();
            expected.sort();
            got.sort();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut index = SpatialIndex::new();
        assert!(index.is_empty());

        index.rebuild(&grid(3, 1.0));
        assert_eq!(index.len(), 9);

        index.rebuild(&[(NodeId(7), 50.0, 50.0)]);
        assert_eq!(index.len(), 1);
        let hits: Vec<_> = index.visit(Bounds::around(0.0, 0.0, 10.0)).collect();
        assert!(hits.is_empty());
    }
}
