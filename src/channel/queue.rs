//! FIFO queues between the host's callbacks and the tick loop.

use std::collections::VecDeque;

use serde::Serialize;

use super::event::ChannelEvent;

/// Unbounded FIFO of channel events with non-blocking drain.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<ChannelEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ChannelEvent) {
        self.events.push_back(event);
    }

    /// Take every queued event in arrival order.
    pub fn drain(&mut self) -> Vec<ChannelEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A chat message as shown in the message list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub body: String,
    /// Tick during which the message was applied.
    pub received_tick: u64,
    /// Wall-clock time the message was applied, in milliseconds since the
    /// Unix epoch.
    pub received_at: f64,
}

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub(crate) fn now_millis() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn now_millis() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order_and_empties() {
        let mut queue = EventQueue::new();
        queue.push(ChannelEvent::moved(1.0, 1.0));
        queue.push(ChannelEvent::chat("a"));
        queue.push(ChannelEvent::moved(2.0, 2.0));
        assert_eq!(queue.len(), 3);

        let drained = queue.drain();
        assert_eq!(drained[0], ChannelEvent::moved(1.0, 1.0));
        assert_eq!(drained[1], ChannelEvent::chat("a"));
        assert_eq!(drained[2], ChannelEvent::moved(2.0, 2.0));
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_chat_message_serializes_camel_case() {
        let msg = ChatMessage {
            body: "hi".to_string(),
            received_tick: 3,
            received_at: 1_700_000_000_000.0,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"body": "hi", "receivedTick": 3, "receivedAt": 1_700_000_000_000.0})
        );
    }

    #[test]
    fn test_now_millis_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000.0);
    }
}
