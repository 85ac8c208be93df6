//! Node storage.
//!
//! Positions, previous positions, radii and charges live in Structure of
//! Arrays (SoA) buffers so the host can read them as zero-copy typed-array
//! views after each tick.

mod node;
mod store;

pub use node::{NodeId, NodeState};
pub use store::NodeStore;
