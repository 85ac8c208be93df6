//! Spatial indexing for collision queries.
//!
//! This module provides an R-tree based spatial index over node centers with
//! bounded-region visitation and subtree pruning.

mod bounds;
mod rtree;

pub use bounds::Bounds;
pub use rtree::SpatialIndex;
