//! Huddle - WASM Module
//!
//! A cluster of circles that keeps out of each other's way while a hidden,
//! pinned root node follows a cursor position shared over a chat channel.
//! Compiled to WebAssembly and exposed to JavaScript via wasm-bindgen.
//!
//! # Architecture
//!
//! - `nodes`: SoA node storage (positions, radii, pinned/hidden flags)
//! - `spatial`: R-tree spatial index with pruned bounded-region visits
//! - `layout`: force step (gravity, charge, Verlet) and collision relaxation
//! - `channel`: typed `move`/`new_msg` events, queues and join state
//! - `simulation`: the context object tying the above together per tick

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod channel;
pub mod config;
pub mod error;
pub mod layout;
pub mod nodes;
pub mod simulation;
pub mod spatial;

pub use config::SimulationConfig;
pub use error::Error;
pub use simulation::{Simulation, TickReport};

use nodes::NodeId;

/// Initialize the WASM module: panic messages and `log` output go to the
/// browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    {
        // Fails only if a logger is already installed.
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

/// Main entry point for the simulation.
///
/// Wraps [`Simulation`] and exposes a JavaScript-friendly API. The host wires
/// channel callbacks to `receive`/`joinReply`, forwards whatever
/// `drainOutbound` returns to `channel.push`, and calls `tick` once per frame.
#[wasm_bindgen]
pub struct HuddleWasm {
    sim: Simulation,
}

#[wasm_bindgen]
impl HuddleWasm {
    /// Create a simulation with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> std::result::Result<HuddleWasm, JsError> {
        Ok(Self {
            sim: Simulation::new(SimulationConfig::default())?,
        })
    }

    /// Create a simulation from a (partial) config object.
    ///
    /// Missing fields take their defaults, e.g. `{ nodeCount: 50, seed: 7 }`.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config: JsValue) -> std::result::Result<HuddleWasm, JsError> {
        let config: SimulationConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(Self {
            sim: Simulation::new(config)?,
        })
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance one frame. Returns whether the simulation is still running.
    pub fn tick(&mut self) -> std::result::Result<bool, JsError> {
        Ok(self.sim.tick()?.running)
    }

    pub fn alpha(&self) -> f32 {
        self.sim.alpha()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }

    /// Reheat the simulation.
    pub fn resume(&mut self) {
        self.sim.resume();
    }

    #[wasm_bindgen(js_name = tickCount)]
    pub fn tick_count(&self) -> u64 {
        self.sim.tick_count()
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.sim.store().len() as u32
    }

    /// The pinned, hidden node that follows the shared cursor.
    #[wasm_bindgen(js_name = rootId)]
    pub fn root_id(&self) -> u32 {
        self.sim.root().0
    }

    #[wasm_bindgen(js_name = getNodeX)]
    pub fn get_node_x(&self, node_id: u32) -> Option<f32> {
        self.sim.store().position(NodeId(node_id)).map(|(x, _)| x)
    }

    #[wasm_bindgen(js_name = getNodeY)]
    pub fn get_node_y(&self, node_id: u32) -> Option<f32> {
        self.sim.store().position(NodeId(node_id)).map(|(_, y)| y)
    }

    #[wasm_bindgen(js_name = getNodeRadius)]
    pub fn get_node_radius(&self, node_id: u32) -> Option<f32> {
        self.sim.store().radius(NodeId(node_id))
    }

    /// Move a node, resetting its velocity.
    #[wasm_bindgen(js_name = setNodePosition)]
    pub fn set_node_position(
        &mut self,
        node_id: u32,
        x: f32,
        y: f32,
    ) -> std::result::Result<(), JsError> {
        let store = self.sim.store_mut();
        store.set_position(NodeId(node_id), x, y)?;
        store.set_previous_position(NodeId(node_id), x, y)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = pinNode)]
    pub fn pin_node(&mut self, node_id: u32) -> std::result::Result<(), JsError> {
        Ok(self.sim.store_mut().pin_node(NodeId(node_id))?)
    }

    #[wasm_bindgen(js_name = unpinNode)]
    pub fn unpin_node(&mut self, node_id: u32) -> std::result::Result<(), JsError> {
        Ok(self.sim.store_mut().unpin_node(NodeId(node_id))?)
    }

    #[wasm_bindgen(js_name = isNodePinned)]
    pub fn is_node_pinned(&self, node_id: u32) -> bool {
        self.sim.store().is_pinned(NodeId(node_id))
    }

    /// Hidden nodes (the root) should not be drawn.
    #[wasm_bindgen(js_name = isNodeHidden)]
    pub fn is_node_hidden(&self, node_id: u32) -> bool {
        self.sim.store().is_hidden(NodeId(node_id))
    }

    // =========================================================================
    // Position Buffer Access (Zero-Copy)
    // =========================================================================

    /// Get a zero-copy view of X positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for rendering, do not store.
    #[wasm_bindgen(js_name = getPositionsXView)]
    pub fn get_positions_x_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.sim.store().positions_x()) }
    }

    /// Get a zero-copy view of Y positions. Same caveats as the X view.
    #[wasm_bindgen(js_name = getPositionsYView)]
    pub fn get_positions_y_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.sim.store().positions_y()) }
    }

    /// Get a zero-copy view of radii. Same caveats as the X view.
    #[wasm_bindgen(js_name = getRadiiView)]
    pub fn get_radii_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.sim.store().radii()) }
    }

    #[wasm_bindgen(js_name = positionsLen)]
    pub fn positions_len(&self) -> usize {
        self.sim.store().positions_x().len()
    }

    /// Bounding box of all node centers as [min_x, min_y, max_x, max_y].
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f32>> {
        self.sim
            .store()
            .bounds()
            .map(|b| vec![b.min_x, b.min_y, b.max_x, b.max_y])
    }

    // =========================================================================
    // Channel
    // =========================================================================

    /// Queue an outbound `move` for a pointer position.
    #[wasm_bindgen(js_name = pointerMoved)]
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.sim.pointer_moved(x, y);
    }

    /// Queue an outbound `new_msg`.
    #[wasm_bindgen(js_name = submitChat)]
    pub fn submit_chat(&mut self, body: String) {
        self.sim.submit_chat(body);
    }

    /// Queue an inbound channel event for the next tick.
    pub fn receive(&mut self, event: &str, payload: JsValue) -> std::result::Result<(), JsError> {
        let payload: serde_json::Value = serde_wasm_bindgen::from_value(payload)?;
        Ok(self.sim.receive_value(event, payload)?)
    }

    /// Mark the topic as joining. Returns false if already joining or joined.
    pub fn join(&mut self) -> bool {
        self.sim.join()
    }

    /// Apply the join reply (`"ok"` or `"error"`). Returns the new state name.
    #[wasm_bindgen(js_name = joinReply)]
    pub fn join_reply(
        &mut self,
        status: &str,
        response: JsValue,
    ) -> std::result::Result<String, JsError> {
        let response: serde_json::Value = if response.is_undefined() || response.is_null() {
            serde_json::Value::Null
        } else {
            serde_wasm_bindgen::from_value(response)?
        };
        let state = self.sim.handle_join_reply(status, &response)?;
        Ok(state.name().to_string())
    }

    /// Take the outbound events as `[{ event, payload }, ...]`.
    #[wasm_bindgen(js_name = drainOutbound)]
    pub fn drain_outbound(&mut self) -> std::result::Result<JsValue, JsError> {
        let events = self.sim.drain_outbound();
        Ok(serde_wasm_bindgen::to_value(&events)?)
    }

    /// The chat log as `[{ body, receivedTick, receivedAt }, ...]`.
    pub fn messages(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.sim.messages())?)
    }
}
