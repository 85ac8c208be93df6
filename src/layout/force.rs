//! Force step: alpha cooling, center gravity, charge and Verlet integration.
//!
//! Velocity is implicit: it is the difference between a node's current and
//! previous position. Charge acts on the previous position so that it shows
//! up as velocity in the following integration.

use crate::nodes::NodeStore;

/// Cooling schedule for the simulation temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooling {
    alpha: f32,
    decay: f32,
    min: f32,
}

impl Cooling {
    pub fn new(alpha: f32, decay: f32, min: f32) -> Self {
        Self { alpha, decay, min }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.alpha > 0.0
    }

    /// Reheat to `alpha`.
    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = alpha.max(0.0);
    }

    /// Decay alpha by one tick. Returns the new alpha, or `None` once it has
    /// dropped below the minimum, in which case the simulation is stopped.
    pub fn cool(&mut self) -> Option<f32> {
        if !self.is_running() {
            return None;
        }

        self.alpha *= self.decay;
        if self.alpha < self.min {
            self.alpha = 0.0;
            return None;
        }
        Some(self.alpha)
    }
}

/// Parameters for one force step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    pub center_x: f32,
    pub center_y: f32,
    pub gravity: f32,
    pub friction: f32,
}

/// Pull every node towards the center by `alpha * gravity` of the way.
pub fn apply_gravity(store: &mut NodeStore, params: &ForceParams, alpha: f32) {
    let k = alpha * params.gravity;
    if k == 0.0 {
        return;
    }

    let mut buffers = store.buffers_mut();
    for x in buffers.pos_x.iter_mut() {
        *x += (params.center_x - *x) * k;
    }
    for y in buffers.pos_y.iter_mut() {
        *y += (params.center_y - *y) * k;
    }
}

/// Apply charge from every charged node to every unpinned node.
///
/// Negative charge repels. Coincident pairs are skipped.
pub fn apply_charge(store: &mut NodeStore, alpha: f32) {
    let sources = store.charged();
    if sources.is_empty() {
        return;
    }

    let mut b = store.buffers_mut();
    for i in 0..b.pos_x.len() {
        if b.states[i].is_pinned() {
            continue;
        }
        for source in &sources {
            let j = source.index();
            if j == i {
                continue;
            }
            let dx = b.pos_x[j] - b.pos_x[i];
            let dy = b.pos_y[j] - b.pos_y[i];
            let dn = dx * dx + dy * dy;
            if dn > 0.0 {
                let k = alpha * b.charge[j] / dn;
                b.prev_x[i] -= dx * k;
                b.prev_y[i] -= dy * k;
            }
        }
    }
}

/// Position Verlet with friction.
///
/// Pinned nodes are snapped back to their previous position, which is how an
/// externally driven node (the cursor root) gets placed.
pub fn integrate(store: &mut NodeStore, friction: f32) {
    let mut b = store.buffers_mut();
    for i in 0..b.pos_x.len() {
        if b.states[i].is_pinned() {
            b.pos_x[i] = b.prev_x[i];
            b.pos_y[i] = b.prev_y[i];
        } else {
            let (x, y) = (b.pos_x[i], b.pos_y[i]);
            b.pos_x[i] -= (b.prev_x[i] - x) * friction;
            b.pos_y[i] -= (b.prev_y[i] - y) * friction;
            b.prev_x[i] = x;
            b.prev_y[i] = y;
        }
    }
}

/// Gravity, charge and integration for one tick at temperature `alpha`.
pub fn step(store: &mut NodeStore, params: &ForceParams, alpha: f32) {
    apply_gravity(store, params, alpha);
    apply_charge(store, alpha);
    integrate(store, params.friction);
}
