//! Message boundary between the channel transport and the simulation.
//!
//! Host callbacks only ever queue events here; the simulation applies inbound
//! events at the start of its next tick, so transport timing never interleaves
//! with a collision pass.

mod event;
mod join;
mod queue;
mod session;

pub use event::{ChannelEvent, ChatPayload, EventKind, MovePayload};
pub use join::JoinState;
pub use queue::{ChatMessage, EventQueue};
pub use session::ChannelSession;
