//! Error type shared by the simulation, the channel boundary and the config layer.

use crate::nodes::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("unknown channel event: {0:?}")]
    UnknownEvent(String),

    #[error("malformed payload for channel event {event:?}")]
    MalformedPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("non-finite coordinates in channel event {event:?}: ({x}, {y})")]
    NonFiniteCoordinate { event: String, x: f32, y: f32 },

    #[error("unknown join reply status: {0:?}")]
    UnknownReplyStatus(String),

    #[error("join reply received while channel is {0}")]
    UnexpectedReply(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
