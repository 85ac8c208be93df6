//! Join handshake state for a topic.
//!
//! The transport owns the wire handshake; this only tracks what the host
//! reports back: `Idle -> Joining -> Joined | Rejected`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum JoinState {
    Idle,
    Joining,
    Joined,
    Rejected { reason: String },
}

impl JoinState {
    pub fn name(&self) -> &'static str {
        match self {
            JoinState::Idle => "idle",
            JoinState::Joining => "joining",
            JoinState::Joined => "joined",
            JoinState::Rejected { .. } => "rejected",
        }
    }

    /// Start joining. Allowed from `Idle` and after a rejection.
    pub fn begin(&mut self) -> bool {
        match self {
            JoinState::Idle | JoinState::Rejected { .. } => {
                *self = JoinState::Joining;
                true
            }
            JoinState::Joining | JoinState::Joined => false,
        }
    }

    /// Apply a join reply with status `"ok"` or `"error"`.
    pub fn reply(&mut self, status: &str, response: &Value) -> Result<()> {
        if *self != JoinState::Joining {
            return Err(Error::UnexpectedReply(self.name()));
        }

        match status {
            "ok" => {
                *self = JoinState::Joined;
                Ok(())
            }
            "error" => {
                *self = JoinState::Rejected {
                    reason: rejection_reason(response),
                };
                Ok(())
            }
            other => Err(Error::UnknownReplyStatus(other.to_string())),
        }
    }
}

impl fmt::Display for JoinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn rejection_reason(response: &Value) -> String {
    match response.get("reason") {
        Some(Value::String(reason)) => reason.clone(),
        _ => response.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_ok_reply_joins() {
        let mut state = JoinState::Idle;
        assert!(state.begin());
        state.reply("ok", &json!({})).unwrap();
        assert_eq!(state, JoinState::Joined);
        assert!(!state.begin());
    }

    #[test]
    fn test_error_reply_keeps_reason() {
        let mut state = JoinState::Idle;
        state.begin();
        state.reply("error", &json!({"reason": "unauthorized"})).unwrap();
        assert_eq!(
            state,
            JoinState::Rejected {
                reason: "unauthorized".to_string()
            }
        );

        // A rejected join may be retried.
        assert!(state.begin());
    }

    #[test]
    fn test_error_reply_without_reason_uses_raw_response() {
        let mut state = JoinState::Joining;
        state.reply("error", &json!({"code": 4})).unwrap();
        assert_eq!(
            state,
            JoinState::Rejected {
                reason: r#"{"code":4}"#.to_string()
            }
        );
    }

    #[test]
    fn test_reply_outside_join_is_unexpected() {
        let mut state = JoinState::Idle;
        let err = state.reply("ok", &json!({})).unwrap_err();
        assert!(matches!(err, Error::UnexpectedReply("idle")));
    }

    #[test]
    fn test_unknown_status() {
        let mut state = JoinState::Joining;
        let err = state.reply("timeout", &json!({})).unwrap_err();
        assert!(matches!(err, Error::UnknownReplyStatus(s) if s == "timeout"));
        assert_eq!(state, JoinState::Joining);
    }
}
