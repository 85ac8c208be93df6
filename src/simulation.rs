//! The simulation context.
//!
//! `Simulation` owns the node store, the cooling schedule and the channel
//! session. The host calls [`Simulation::tick`] once per animation frame;
//! everything arriving from the transport between frames waits in the inbound
//! queue until then.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::channel::{ChannelEvent, ChannelSession, ChatMessage, JoinState};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::layout::{collide, force, Cooling, ForceParams};
use crate::nodes::{NodeId, NodeStore};

/// What one call to [`Simulation::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Inbound channel events applied before the physics step.
    pub events_applied: usize,
    /// Collision corrections applied.
    pub nudges: usize,
    /// Alpha after this tick; zero once settled.
    pub alpha: f32,
    pub running: bool,
}

pub struct Simulation {
    config: SimulationConfig,
    store: NodeStore,
    root: NodeId,
    cooling: Cooling,
    ticks: u64,
    channel: ChannelSession,
}

impl Simulation {
    /// Create `node_count` nodes from the configured seed and start running.
    ///
    /// Node 0 becomes the root: radius zero, pinned, hidden and charged.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut store = NodeStore::with_capacity(config.node_count as usize);
        for _ in 0..config.node_count {
            let radius = config.min_radius + rng.r#gen::<f32>() * config.radius_spread;
            let x = rng.r#gen::<f32>() * config.width;
            let y = rng.r#gen::<f32>() * config.height;
            store.add_node(x, y, radius);
        }

        Self::with_store(config, store, NodeId(0))
    }

    /// Wrap an existing store, turning `root` into the cursor-driven root.
    pub fn with_store(config: SimulationConfig, mut store: NodeStore, root: NodeId) -> Result<Self> {
        config.validate()?;

        store.set_radius(root, 0.0)?;
        store.set_charge(root, config.root_charge)?;
        store.pin_node(root)?;
        store.set_hidden(root, true)?;

        let cooling = Cooling::new(config.initial_alpha, config.alpha_decay, config.alpha_min);
        let channel = ChannelSession::new(config.topic.clone());

        log::debug!(
            "simulation started with {} nodes on {}",
            store.len(),
            config.topic
        );

        Ok(Self {
            config,
            store,
            root,
            cooling,
            ticks: 0,
            channel,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NodeStore {
        &mut self.store
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn alpha(&self) -> f32 {
        self.cooling.alpha()
    }

    pub fn is_running(&self) -> bool {
        self.cooling.is_running()
    }

    /// Number of ticks the host has requested so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn channel(&self) -> &ChannelSession {
        &self.channel
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Reheat to the initial alpha.
    pub fn resume(&mut self) {
        self.cooling.reheat(self.config.initial_alpha);
    }

    fn force_params(&self) -> ForceParams {
        let (center_x, center_y) = self.config.center();
        ForceParams {
            center_x,
            center_y,
            gravity: self.config.gravity,
            friction: self.config.friction,
        }
    }

    /// Advance one frame.
    ///
    /// Applies queued inbound events, then, if still running, cools, runs the
    /// force step and one collision pass.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.ticks += 1;
        let events_applied = self.apply_inbound()?;

        let was_running = self.cooling.is_running();
        let mut nudges = 0;
        if let Some(alpha) = self.cooling.cool() {
            let params = self.force_params();
            force::step(&mut self.store, &params, alpha);
            nudges = collide::resolve_all(
                &mut self.store,
                self.config.collision_padding,
                Some(self.root),
            )?;
        } else if was_running {
            log::debug!("simulation settled after {} ticks", self.ticks);
        }

        Ok(TickReport {
            events_applied,
            nudges,
            alpha: self.cooling.alpha(),
            running: self.cooling.is_running(),
        })
    }

    fn apply_inbound(&mut self) -> Result<usize> {
        let events = self.channel.drain_inbound();
        let applied = events.len();

        for event in events {
            match event {
                ChannelEvent::Move(p) => {
                    // The integrator snaps the pinned root to this position.
                    self.store.set_previous_position(self.root, p.x, p.y)?;
                    self.resume();
                }
                ChannelEvent::NewMsg(p) => self.channel.record_message(p.body, self.ticks),
            }
        }

        Ok(applied)
    }

    // =========================================================================
    // Channel
    // =========================================================================

    /// Decode and queue an inbound event for the next tick.
    pub fn receive(&mut self, event: &str, payload: &str) -> Result<()> {
        self.channel.receive(event, payload)
    }

    pub fn receive_value(&mut self, event: &str, payload: Value) -> Result<()> {
        self.channel.receive_value(event, payload)
    }

    pub fn enqueue(&mut self, event: ChannelEvent) {
        self.channel.enqueue(event);
    }

    /// Queue an outbound `move` for the cursor position.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.channel.push(ChannelEvent::moved(x, y));
    }

    /// Queue an outbound `new_msg`.
    pub fn submit_chat(&mut self, body: impl Into<String>) {
        self.channel.push(ChannelEvent::chat(body));
    }

    pub fn drain_outbound(&mut self) -> Vec<ChannelEvent> {
        self.channel.drain_outbound()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.channel.messages()
    }

    pub fn join(&mut self) -> bool {
        self.channel.join()
    }

    pub fn handle_join_reply(&mut self, status: &str, response: &Value) -> Result<&JoinState> {
        self.channel.handle_join_reply(status, response)
    }
}
