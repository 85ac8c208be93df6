//! Per-topic session state held by the simulation.

use serde_json::Value;

use super::event::ChannelEvent;
use super::join::JoinState;
use super::queue::{self, ChatMessage, EventQueue};
use crate::error::Result;

/// Everything the simulation knows about its channel: the join state, the
/// inbound queue consumed by `tick`, the outbound queue drained by the host,
/// and the chat log.
#[derive(Debug)]
pub struct ChannelSession {
    topic: String,
    join: JoinState,
    inbound: EventQueue,
    outbound: EventQueue,
    messages: Vec<ChatMessage>,
}

impl ChannelSession {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            join: JoinState::Idle,
            inbound: EventQueue::new(),
            outbound: EventQueue::new(),
            messages: Vec::new(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn join_state(&self) -> &JoinState {
        &self.join
    }

    /// Mark the topic as joining. Returns false if already joining or joined.
    pub fn join(&mut self) -> bool {
        let started = self.join.begin();
        if started {
            log::debug!("joining {}", self.topic);
        }
        started
    }

    pub fn handle_join_reply(&mut self, status: &str, response: &Value) -> Result<&JoinState> {
        self.join.reply(status, response)?;
        match &self.join {
            JoinState::Joined => log::info!("Joined successfully {}", self.topic),
            JoinState::Rejected { reason } => {
                log::warn!("Unable to join {}: {}", self.topic, reason)
            }
            _ => {}
        }
        Ok(&self.join)
    }

    /// Decode and queue an inbound event. Rejected events are not queued.
    pub fn receive(&mut self, event: &str, payload: &str) -> Result<()> {
        self.accept(ChannelEvent::decode(event, payload))
    }

    /// Like [`ChannelSession::receive`] for an already parsed payload.
    pub fn receive_value(&mut self, event: &str, payload: Value) -> Result<()> {
        self.accept(ChannelEvent::decode_value(event, payload))
    }

    fn accept(&mut self, decoded: Result<ChannelEvent>) -> Result<()> {
        match decoded {
            Ok(decoded) => {
                log::trace!("queued {} on {}", decoded.kind(), self.topic);
                self.inbound.push(decoded);
                Ok(())
            }
            Err(e) => {
                log::warn!("dropping inbound event on {}: {}", self.topic, e);
                Err(e)
            }
        }
    }

    pub fn enqueue(&mut self, event: ChannelEvent) {
        self.inbound.push(event);
    }

    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }

    pub(crate) fn drain_inbound(&mut self) -> Vec<ChannelEvent> {
        self.inbound.drain()
    }

    /// Queue an event for the host to push.
    pub fn push(&mut self, event: ChannelEvent) {
        self.outbound.push(event);
    }

    pub fn drain_outbound(&mut self) -> Vec<ChannelEvent> {
        self.outbound.drain()
    }

    /// Append to the chat log, stamped with the tick and the current time.
    pub(crate) fn record_message(&mut self, body: String, tick: u64) {
        self.messages.push(ChatMessage {
            body,
            received_tick: tick,
            received_at: queue::now_millis(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
