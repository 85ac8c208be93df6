//! Pairwise circle collision relaxation.
//!
//! Each subject node is checked against the nodes the spatial index returns
//! for a square around it. Any overlapping pair is pushed apart along the
//! line between their centers, each node covering half of the overlap. One
//! pass per tick; residual overlap from three-way contacts is left for the
//! next tick.

use crate::error::Result;
use crate::nodes::{NodeId, NodeStore};
use crate::spatial::Bounds;

/// A node's footprint: center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }
}

/// Correction for one overlapping pair.
///
/// Subtract it from the subject, add it to the other node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nudge {
    pub dx: f32,
    pub dy: f32,
}

/// Compute the half-correction that separates `subject` from `other`.
///
/// Returns `None` when the circles do not overlap. Coincident centers have no
/// direction to push along; they are split along the x axis, the subject
/// moving towards +x.
pub fn separation(subject: Circle, other: Circle) -> Option<Nudge> {
    let dx = subject.x - other.x;
    let dy = subject.y - other.y;
    let l = (dx * dx + dy * dy).sqrt();
    let r = subject.radius + other.radius;

    if l >= r {
        return None;
    }

    if l == 0.0 {
        return Some(Nudge {
            dx: -r * 0.5,
            dy: 0.0,
        });
    }

    let s = (l - r) / l * 0.5;
    Some(Nudge {
        dx: dx * s,
        dy: dy * s,
    })
}

/// Search bounds for `subject`.
///
/// The padding is widened to the largest radius in the store so a neighbour
/// bigger than the padding can never hide outside the square.
pub fn search_bounds(store: &NodeStore, subject: Circle, padding: f32) -> Bounds {
    let half_width = subject.radius + padding.max(store.max_radius());
    Bounds::around(subject.x, subject.y, half_width)
}

/// Nodes the index visits for `subject`, excluding the subject itself.
pub fn candidates(store: &NodeStore, subject: NodeId, padding: f32) -> Vec<NodeId> {
    let Some(circle) = store.circle(subject) else {
        return Vec::new();
    };

    store
        .spatial()
        .visit(search_bounds(store, circle, padding))
        .filter(|&id| id != subject)
        .collect()
}

/// Resolve every overlap between `subject` and its candidates.
///
/// The index must have been rebuilt beforehand; candidate lookup uses the
/// indexed snapshot while the overlap test uses live positions, so nudges
/// applied earlier in the pass are taken into account.
///
/// Returns the number of nudges applied.
pub fn resolve_node(store: &mut NodeStore, subject: NodeId, padding: f32) -> Result<usize> {
    let mut applied = 0;

    for other in candidates(store, subject, padding) {
        let (Some(a), Some(b)) = (store.circle(subject), store.circle(other)) else {
            continue;
        };

        if let Some(nudge) = separation(a, b) {
            store.translate(subject, -nudge.dx, -nudge.dy)?;
            store.translate(other, nudge.dx, nudge.dy)?;
            applied += 1;
        }
    }

    Ok(applied)
}

/// One collision pass over the whole store.
///
/// Rebuilds the index, then resolves every node except `root` in slot order.
/// The root can still be pushed as the other node. Other pinned nodes are
/// resolved like any node; the integrator puts them back on the next tick.
pub fn resolve_all(store: &mut NodeStore, padding: f32, root: Option<NodeId>) -> Result<usize> {
    store.rebuild_spatial_index();

    let mut applied = 0;
    for id in store.ids() {
        if Some(id) == root {
            continue;
        }
        applied += resolve_node(store, id, padding)?;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const PADDING: f32 = 16.0;

    fn distance(store: &NodeStore, a: NodeId, b: NodeId) -> f32 {
        let (ax, ay) = store.position(a).unwrap();
        let (bx, by) = store.position(b).unwrap();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }

    #[test]
    fn test_overlapping_pair_moves_three_units_each() {
        let mut store = NodeStore::new();
        let a = store.add_node(0.0, 0.0, 5.0);
        let b = store.add_node(4.0, 0.0, 5.0);

        let applied = resolve_all(&mut store, PADDING, None).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(store.position(a), Some((-3.0, 0.0)));
        assert_eq!(store.position(b), Some((7.0, 0.0)));
        assert_eq!(distance(&store, a, b), 10.0);
    }

    #[test]
    fn test_separated_pair_is_untouched() {
        let mut store = NodeStore::new();
        let a = store.add_node(0.0, 0.0, 5.0);
        let b = store.add_node(20.0, 0.0, 5.0);

        let applied = resolve_all(&mut store, PADDING, None).unwrap();

        assert_eq!(applied, 0);
        assert_eq!(store.position(a), Some((0.0, 0.0)));
        assert_eq!(store.position(b), Some((20.0, 0.0)));
    }

    #[test]
    fn test_touching_circles_do_not_overlap() {
        let a = Circle::new(0.0, 0.0, 5.0);
        let b = Circle::new(10.0, 0.0, 5.0);
        assert_eq!(separation(a, b), None);
    }

    #[test]
    fn test_separation_is_symmetric() {
        let a = Circle::new(1.0, 2.0, 6.0);
        let b = Circle::new(4.0, 6.0, 3.0);

        let ab = separation(a, b).unwrap();
        let ba = separation(b, a).unwrap();

        // Swapping roles flips the vector; the applied displacements are the same.
        assert!((ab.dx + ba.dx).abs() < 1e-6);
        assert!((ab.dy + ba.dy).abs() < 1e-6);
    }

    #[test]
    fn test_single_pass_closes_gap_for_isolated_pairs() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let r1 = rng.gen_range(0.5..16.0);
            let r2 = rng.gen_range(0.5..16.0);
            let l = rng.gen_range(0.1..(r1 + r2));
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);

            let mut store = NodeStore::new();
            let a = store.add_node(50.0, 50.0, r1);
            let b = store.add_node(50.0 + l * angle.cos(), 50.0 + l * angle.sin(), r2);

            let (ax0, ay0) = store.position(a).unwrap();
            let (bx0, by0) = store.position(b).unwrap();

            resolve_all(&mut store, PADDING, None).unwrap();

            let d = distance(&store, a, b);
            assert!((d - (r1 + r2)).abs() < 1e-3, "expected {}, got {}", r1 + r2, d);

            let (ax1, ay1) = store.position(a).unwrap();
            let (bx1, by1) = store.position(b).unwrap();
            assert!(((ax1 - ax0) + (bx1 - bx0)).abs() < 1e-4);
            assert!(((ay1 - ay0) + (by1 - by0)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_coincident_centers_split_along_x() {
        let mut store = NodeStore::new();
        let a = store.add_node(10.0, 10.0, 5.0);
        let b = store.add_node(10.0, 10.0, 5.0);

        resolve_all(&mut store, PADDING, None).unwrap();

        assert_eq!(store.position(a), Some((15.0, 10.0)));
        assert_eq!(store.position(b), Some((5.0, 10.0)));
        assert!(store.positions_x().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_coincident_zero_radius_nodes_stay_put() {
        assert_eq!(
            separation(Circle::new(0.0, 0.0, 0.0), Circle::new(0.0, 0.0, 0.0)),
            None
        );
    }

    #[test]
    fn test_subject_never_visits_itself() {
        let mut store = NodeStore::new();
        let a = store.add_node(0.0, 0.0, 5.0);
        store.rebuild_spatial_index();

        assert!(candidates(&store, a, PADDING).is_empty());
        assert_eq!(resolve_node(&mut store, a, PADDING).unwrap(), 0);
    }

    #[test]
    fn test_pruning_never_skips_an_overlapping_pair() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut store = NodeStore::new();
        for _ in 0..400 {
            let x = rng.gen_range(0.0..300.0);
            let y = rng.gen_range(0.0..300.0);
            // Some radii exceed the padding on purpose.
            let r = rng.gen_range(0.0..24.0);
            store.add_node(x, y, r);
        }
        store.rebuild_spatial_index();

        for subject in store.ids() {
            let found = candidates(&store, subject, PADDING);
            let a = store.circle(subject).unwrap();
            for other in store.ids().filter(|&o| o != subject) {
                let b = store.circle(other).unwrap();
                if separation(a, b).is_some() {
                    assert!(found.contains(&other), "{subject} missed {other}");
                }
            }
        }
    }

    #[test]
    fn test_root_is_pushed_but_never_a_subject() {
        let mut store = NodeStore::new();
        let root = store.add_node(0.0, 0.0, 0.0);
        let b = store.add_node(3.0, 4.0, 10.0);
        store.pin_node(root).unwrap();

        let applied = resolve_all(&mut store, PADDING, Some(root)).unwrap();
        assert_eq!(applied, 1);

        // l = 5, r = 10: each side moves 2.5 along the 3-4-5 axis.
        let (rx, ry) = store.position(root).unwrap();
        assert!((rx + 1.5).abs() < 1e-5 && (ry + 2.0).abs() < 1e-5);
        let (bx, by) = store.position(b).unwrap();
        assert!((bx - 4.5).abs() < 1e-5 && (by - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_pinned_nodes_other_than_root_are_separated() {
        let mut store = NodeStore::new();
        let root = store.add_node(500.0, 500.0, 0.0);
        let a = store.add_node(0.0, 0.0, 5.0);
        let b = store.add_node(4.0, 0.0, 5.0);
        for id in [root, a, b] {
            store.pin_node(id).unwrap();
        }

        let applied = resolve_all(&mut store, PADDING, Some(root)).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(store.position(a), Some((-3.0, 0.0)));
        assert_eq!(store.position(b), Some((7.0, 0.0)));
    }

    #[test]
    fn test_candidates_for_unknown_node_is_empty() {
        let store = NodeStore::new();
        assert!(candidates(&store, NodeId(3), PADDING).is_empty());
    }
}
