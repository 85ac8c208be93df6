//! Axis-aligned search bounds used to prune index traversal.

use rstar::AABB;

/// An axis-aligned rectangle in simulation space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Square of the given half-width centered on (x, y).
    pub fn around(x: f32, y: f32, half_width: f32) -> Self {
        Self::new(x - half_width, y - half_width, x + half_width, y + half_width)
    }

    /// True when `envelope` lies strictly outside these bounds on some axis.
    ///
    /// Touching edges do not count as separated.
    pub fn is_separated_from(&self, envelope: &AABB<[f32; 2]>) -> bool {
        let [x1, y1] = envelope.lower();
        let [x2, y2] = envelope.upper();
        x1 > self.max_x || x2 < self.min_x || y1 > self.max_y || y2 < self.min_y
    }
}
