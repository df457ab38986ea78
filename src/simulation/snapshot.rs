//! Read-only view of one tick, handed to renderers.

use serde::{Deserialize, Serialize};

/// Render state of a single bird.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirdView {
    /// Population slot.
    pub id: usize,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
    /// Whether the bird is still flying.
    pub alive: bool,
    /// Gates passed.
    pub score: u32,
    /// Render colour.
    pub color: [u8; 3],
}

/// Render state of a single gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateView {
    /// Left edge.
    pub x: f32,
    /// Width.
    pub width: f32,
    /// Gap centre.
    pub gap_y: f32,
    /// Lower edge of the upper pipe.
    pub gap_top: f32,
    /// Upper edge of the lower pipe.
    pub gap_bottom: f32,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All birds in population order, dead ones included.
    pub birds: Vec<BirdView>,
    /// Active gates ordered by x.
    pub gates: Vec<GateView>,
    /// Best score of any bird this round.
    pub score: u32,
    /// Birds still alive.
    pub living_birds: usize,
    /// Frames since the last reset.
    pub frame_count: u64,
    /// All birds are dead.
    pub game_over: bool,
    /// Next gate ahead of the first bird, for the on-screen read-out.
    pub next_gate: Option<GateView>,
}
