//! NodeStore - SoA storage for simulated circles.
//!
//! The store keeps positions, previous positions, radii and charges in
//! separate buffers indexed by `NodeId`, together with per-node state flags
//! and the spatial index used by collision resolution.

use super::node::{NodeId, NodeState};
use crate::error::{Error, Result};
use crate::layout::Circle;
use crate::spatial::{Bounds, SpatialIndex};

/// Storage for every node in a simulation.
///
/// Nodes are append-only: once added they live as long as the store.
pub struct NodeStore {
    /// X positions (SoA layout)
    pos_x: Vec<f32>,

    /// Y positions (SoA layout)
    pos_y: Vec<f32>,

    /// Previous X positions; velocity is `pos - prev`
    prev_x: Vec<f32>,

    /// Previous Y positions
    prev_y: Vec<f32>,

    radius: Vec<f32>,

    /// Charge strength; only non-zero entries act as charge sources
    charge: Vec<f32>,

    states: Vec<NodeState>,

    /// Largest radius added so far
    max_radius: f32,

    /// Spatial index over node centers
    spatial: SpatialIndex,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(capacity),
            pos_y: Vec::with_capacity(capacity),
            prev_x: Vec::with_capacity(capacity),
            prev_y: Vec::with_capacity(capacity),
            radius: Vec::with_capacity(capacity),
            charge: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
            max_radius: 0.0,
            spatial: SpatialIndex::new(),
        }
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node at rest at the given position.
    ///
    /// Negative radii are clamped to zero.
    pub fn add_node(&mut self, x: f32, y: f32, radius: f32) -> NodeId {
        let id = NodeId(self.pos_x.len() as u32);
        let radius = radius.max(0.0);

        self.pos_x.push(x);
        self.pos_y.push(y);
        self.prev_x.push(x);
        self.prev_y.push(y);
        self.radius.push(radius);
        self.charge.push(0.0);
        self.states.push(NodeState::new());
        self.max_radius = self.max_radius.max(radius);

        id
    }

    pub fn len(&self) -> usize {
        self.pos_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos_x.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.len()
    }

    /// All node ids in slot order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.len() as u32).map(NodeId)
    }

    fn slot(&self, id: NodeId) -> Result<usize> {
        if self.contains(id) {
            Ok(id.index())
        } else {
            Err(Error::UnknownNode(id))
        }
    }

    pub fn position(&self, id: NodeId) -> Option<(f32, f32)> {
        self.contains(id)
            .then(|| (self.pos_x[id.index()], self.pos_y[id.index()]))
    }

    pub fn set_position(&mut self, id: NodeId, x: f32, y: f32) -> Result<()> {
        let i = self.slot(id)?;
        self.pos_x[i] = x;
        self.pos_y[i] = y;
        Ok(())
    }

    /// Shift a node's current position, leaving its previous position alone.
    pub fn translate(&mut self, id: NodeId, dx: f32, dy: f32) -> Result<()> {
        let i = self.slot(id)?;
        self.pos_x[i] += dx;
        self.pos_y[i] += dy;
        Ok(())
    }

    pub fn previous_position(&self, id: NodeId) -> Option<(f32, f32)> {
        self.contains(id)
            .then(|| (self.prev_x[id.index()], self.prev_y[id.index()]))
    }

    pub fn set_previous_position(&mut self, id: NodeId, x: f32, y: f32) -> Result<()> {
        let i = self.slot(id)?;
        self.prev_x[i] = x;
        self.prev_y[i] = y;
        Ok(())
    }

    pub fn radius(&self, id: NodeId) -> Option<f32> {
        self.radius.get(id.index()).copied()
    }

    /// Override a node's radius. Used once, to collapse the root.
    pub fn set_radius(&mut self, id: NodeId, radius: f32) -> Result<()> {
        let i = self.slot(id)?;
        let radius = radius.max(0.0);
        self.radius[i] = radius;
        self.max_radius = self.radius.iter().copied().fold(0.0, f32::max);
        Ok(())
    }

    /// Largest radius currently held by any node.
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn charge(&self, id: NodeId) -> Option<f32> {
        self.charge.get(id.index()).copied()
    }

    pub fn set_charge(&mut self, id: NodeId, charge: f32) -> Result<()> {
        let i = self.slot(id)?;
        self.charge[i] = charge;
        Ok(())
    }

    /// Nodes with a non-zero charge.
    pub fn charged(&self) -> Vec<NodeId> {
        self.ids()
            .filter(|id| self.charge[id.index()] != 0.0)
            .collect()
    }

    /// The node as a circle, using its live position.
    pub fn circle(&self, id: NodeId) -> Option<Circle> {
        self.contains(id).then(|| {
            let i = id.index();
            Circle::new(self.pos_x[i], self.pos_y[i], self.radius[i])
        })
    }

    pub fn state(&self, id: NodeId) -> Option<NodeState> {
        self.states.get(id.index()).copied()
    }

    /// Pin a node (exclude from integration and charge).
    pub fn pin_node(&mut self, id: NodeId) -> Result<()> {
        let i = self.slot(id)?;
        self.states[i].set_pinned(true);
        Ok(())
    }

    pub fn unpin_node(&mut self, id: NodeId) -> Result<()> {
        let i = self.slot(id)?;
        self.states[i].set_pinned(false);
        Ok(())
    }

    pub fn is_pinned(&self, id: NodeId) -> bool {
        self.state(id).is_some_and(NodeState::is_pinned)
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<()> {
        let i = self.slot(id)?;
        self.states[i].set_hidden(hidden);
        Ok(())
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.state(id).is_some_and(NodeState::is_hidden)
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    pub fn positions_x(&self) -> &[f32] {
        &self.pos_x
    }

    pub fn positions_y(&self) -> &[f32] {
        &self.pos_y
    }

    pub fn radii(&self) -> &[f32] {
        &self.radius
    }

    /// Mutable access to every SoA buffer at once, for the integrator.
    pub(crate) fn buffers_mut(&mut self) -> Buffers<'_> {
        Buffers {
            pos_x: &mut self.pos_x,
            pos_y: &mut self.pos_y,
            prev_x: &mut self.prev_x,
            prev_y: &mut self.prev_y,
            charge: &self.charge,
            states: &self.states,
        }
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Rebuild the spatial index from current positions.
    pub fn rebuild_spatial_index(&mut self) {
        let points: Vec<_> = self
            .ids()
            .map(|id| (id, self.pos_x[id.index()], self.pos_y[id.index()]))
            .collect();

        self.spatial.rebuild(&points);
    }

    pub fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    /// Bounding box of all node centers, or None if the store is empty.
    pub fn bounds(&self) -> Option<Bounds> {
        if self.is_empty() {
            return None;
        }

        let fold = |values: &[f32]| {
            values
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let (min_x, max_x) = fold(&self.pos_x);
        let (min_y, max_y) = fold(&self.pos_y);

        Some(Bounds::new(min_x, min_y, max_x, max_y))
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Split borrows of the store's buffers.
pub(crate) struct Buffers<'a> {
    pub pos_x: &'a mut [f32],
    pub pos_y: &'a mut [f32],
    pub prev_x: &'a mut [f32],
    pub prev_y: &'a mut [f32],
    pub charge: &'a [f32],
    pub states: &'a [NodeState],
}
