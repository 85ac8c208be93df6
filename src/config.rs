//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a simulation run.
///
/// Field names are camelCase on the wire so the same object can be passed
/// straight from JavaScript. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Canvas width (default: 640.0).
    pub width: f32,
    /// Canvas height (default: 480.0).
    pub height: f32,
    /// Number of nodes including the root (default: 200).
    pub node_count: u32,
    /// Smallest generated radius (default: 4.0).
    pub min_radius: f32,
    /// Generated radii fall in `[min_radius, min_radius + radius_spread)` (default: 12.0).
    pub radius_spread: f32,
    /// Extra reach of the collision search square (default: 16.0).
    pub collision_padding: f32,
    /// Pull towards the canvas center (default: 0.05).
    pub gravity: f32,
    /// Charge carried by the root; negative repels (default: -2000.0).
    pub root_charge: f32,
    /// Velocity retained per tick (default: 0.9).
    pub friction: f32,
    /// Alpha at start and on every resume (default: 0.1).
    pub initial_alpha: f32,
    /// Alpha multiplier per tick (default: 0.99).
    pub alpha_decay: f32,
    /// The simulation stops once alpha drops below this (default: 0.005).
    pub alpha_min: f32,
    /// RNG seed for radii and initial placement (default: 0).
    pub seed: u64,
    /// Channel topic (default: "room:lobby").
    pub topic: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            node_count: 200,
            min_radius: 4.0,
            radius_spread: 12.0,
            collision_padding: 16.0,
            gravity: 0.05,
            root_charge: -2000.0,
            friction: 0.9,
            initial_alpha: 0.1,
            alpha_decay: 0.99,
            alpha_min: 0.005,
            seed: 0,
            topic: "room:lobby".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::InvalidConfig(msg.to_string()))
            }
        }

        let finite = [
            self.width,
            self.height,
            self.min_radius,
            self.radius_spread,
            self.collision_padding,
            self.gravity,
            self.root_charge,
            self.friction,
            self.initial_alpha,
            self.alpha_decay,
            self.alpha_min,
        ];
        check(finite.iter().all(|v| v.is_finite()), "all numeric fields must be finite")?;
        check(self.width > 0.0 && self.height > 0.0, "width and height must be positive")?;
        check(self.node_count > 0, "nodeCount must be at least 1 (the root)")?;
        check(
            self.min_radius >= 0.0 && self.radius_spread >= 0.0,
            "minRadius and radiusSpread must not be negative",
        )?;
        check(self.collision_padding >= 0.0, "collisionPadding must not be negative")?;
        check(
            (0.0..=1.0).contains(&self.friction),
            "friction must be within [0, 1]",
        )?;
        check(
            self.alpha_decay > 0.0 && self.alpha_decay < 1.0,
            "alphaDecay must be within (0, 1)",
        )?;
        check(self.initial_alpha > 0.0, "initialAlpha must be positive")?;
        check(self.alpha_min >= 0.0, "alphaMin must not be negative")?;
        check(!self.topic.is_empty(), "topic must not be empty")?;
        Ok(())
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}
