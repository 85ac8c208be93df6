//! Per-tick layout passes.
//!
//! `force` advances positions (gravity, charge, integration) and `collide`
//! then relaxes overlaps between circles using the spatial index.

pub mod collide;
pub mod force;

pub use collide::{Circle, Nudge};
pub use force::{Cooling, ForceParams};
