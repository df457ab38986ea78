//! Gates: scrolling obstacles with a vertical passage.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::locatable::Locatable;
use super::params::Params;

/// A pair of pipes scrolling left with a gap between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Left edge.
    pub x: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Distance scrolled per tick.
    pub speed: f32,
    /// Vertical centre of the gap.
    pub gap_y: f32,
    /// Vertical size of the gap.
    pub gap_height: f32,
    /// Set once the first bird clears the gate.
    pub passed: bool,
}

impl Gate {
    /// Creates a gate at `x` with its gap centre drawn uniformly from the configured range.
    pub fn new<R: Rng>(x: f32, params: &Params, rng: &mut R) -> Self {
        let gap_y = rng.random_range(params.gap_min_y..=params.gap_max_y) as f32;
        Self::with_gap(x, gap_y, params)
    }

    /// Creates a gate with a fixed gap centre.
    pub fn with_gap(x: f32, gap_y: f32, params: &Params) -> Self {
        Self {
            x,
            width: params.gate_width,
            speed: params.gate_speed,
            gap_y,
            gap_height: params.gap_height,
            passed: false,
        }
    }

    /// Lower edge of the upper pipe.
    pub fn gap_top(&self) -> f32 {
        self.gap_y - self.gap_height / 2.0
    }

    /// Upper edge of the lower pipe.
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y + self.gap_height / 2.0
    }

    /// Right edge.
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Returns `true` exactly once per gate: on the first call after a bird's
    /// x has moved beyond the gate's right edge. Later birds get no credit.
    pub fn is_passed_by(&mut self, bird: &Bird) -> bool {
        if self.passed || bird.x <= self.trailing_edge() {
            return false;
        }
        self.passed = true;
        true
    }
}

impl Locatable for Gate {
    fn pos(&self) -> (f32, f32) {
        (self.x, self.gap_y)
    }

    /// Scrolls left. Returns `false` once the gate is fully off-screen.
    fn update(&mut self) -> bool {
        self.x -= self.speed;
        self.x > -self.width
    }
}
