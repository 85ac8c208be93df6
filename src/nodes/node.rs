//! Node identifiers and per-node state flags.
//!
//! Every simulated node is a circle with:
//! - A stable identifier equal to its slot in the store
//! - Position (x, y) and previous position (px, py) for Verlet integration
//! - A radius fixed at creation
//! - State flags (pinned, hidden)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier.
///
/// Nodes are never removed, so the id doubles as the slot index into the
/// store's SoA buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Slot index into the store buffers.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Node state flags packed into a single byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const PINNED: u8 = 0b0000_0001;
    const HIDDEN: u8 = 0b0000_0010;

    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Pinned nodes skip integration and charge; the integrator snaps them
    /// back to their previous position every tick.
    #[inline]
    pub fn is_pinned(self) -> bool {
        self.flags & Self::PINNED != 0
    }

    #[inline]
    pub fn set_pinned(&mut self, pinned: bool) {
        self.set(Self::PINNED, pinned);
    }

    /// Hidden nodes take part in the simulation but are not rendered.
    #[inline]
    pub fn is_hidden(self) -> bool {
        self.flags & Self::HIDDEN != 0
    }

    #[inline]
    pub fn set_hidden(&mut self, hidden: bool) {
        self.set(Self::HIDDEN, hidden);
    }

    #[inline]
    fn set(&mut self, bit: u8, on: bool) {
        if on {
            self.flags |= bit;
        } else {
            self.flags &= !bit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_index_and_display() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{}", id), "Node(42)");
    }

    #[test]
    fn test_node_state_flags_are_independent() {
        let mut state = NodeState::new();
        assert!(!state.is_pinned());
        assert!(!state.is_hidden());

        state.set_pinned(true);
        state.set_hidden(true);
        assert!(state.is_pinned());
        assert!(state.is_hidden());

        state.set_pinned(false);
        assert!(!state.is_pinned());
        assert!(state.is_hidden());
    }
}
