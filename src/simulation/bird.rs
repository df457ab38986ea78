//! Bird physics, decisions and collision tests.

use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::error::Result;
use super::features;
use super::gate::Gate;
use super::locatable::Locatable;
use super::params::Params;

/// Output threshold above which a brain triggers a jump.
const JUMP_THRESHOLD: f32 = 0.5;

/// A bird with vertical physics and an optional brain.
///
/// Birds never move horizontally; gates scroll past them instead. A dead bird
/// is frozen: the game loop no longer updates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    /// Slot of the bird in its population. Gates track passes by this id.
    pub id: usize,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Vertical velocity (positive is down).
    pub velocity: f32,
    /// Acceleration added to the velocity every tick.
    pub gravity: f32,
    /// Velocity set by a jump.
    pub jump_strength: f32,
    /// Bounding box width.
    pub width: f32,
    /// Bounding box height.
    pub height: f32,
    /// The bird dies once `y` reaches this value.
    pub ground_limit: f32,
    /// Cleared on the first ground or gate collision.
    pub alive: bool,
    /// Gates passed.
    pub score: u32,
    /// Written by the trainer after the generation ends.
    pub fitness: f32,
    /// Render colour.
    pub color: [u8; 3],
    /// Decision-making network, if the bird is computer-controlled.
    pub brain: Option<Brain>,
}

impl Bird {
    /// Creates a brainless bird at (`x`, `y`) with the physics constants from `params`.
    pub fn new(id: usize, x: f32, y: f32, params: &Params) -> Self {
        Self {
            id,
            x,
            y,
            velocity: 0.0,
            gravity: params.gravity,
            jump_strength: params.jump_strength,
            width: params.bird_width,
            height: params.bird_height,
            ground_limit: params.ground_limit,
            alive: true,
            score: 0,
            fitness: 0.0,
            color: [255, 255, 0],
            brain: None,
        }
    }

    /// Creates a bird controlled by `brain`.
    ///
    /// Fails if the brain does not consume the feature vector.
    pub fn with_brain(id: usize, x: f32, y: f32, brain: Brain, params: &Params) -> Result<Self> {
        features::check_brain(&brain)?;
        let mut bird = Self::new(id, x, y, params);
        bird.brain = Some(brain);
        Ok(bird)
    }

    /// Sets the vertical velocity to the jump impulse, discarding the current one.
    pub fn jump(&mut self) {
        self.velocity = self.jump_strength;
    }

    /// Lets the brain decide whether to jump.
    ///
    /// Does nothing without a brain or without a gate ahead.
    ///
    /// # Returns
    ///
    /// `true` if the bird jumped.
    pub fn decide(&mut self, gates: &[Gate]) -> bool {
        let Some(brain) = &self.brain else {
            return false;
        };
        let Some(inputs) = features::extract(self, gates) else {
            return false;
        };
        if brain.predict(&inputs) > JUMP_THRESHOLD {
            self.jump();
            true
        } else {
            false
        }
    }

    /// Applies gravity and moves the bird. Hitting the ceiling clamps the
    /// bird to y = 0 and absorbs its velocity.
    ///
    /// # Returns
    ///
    /// `false` if the bird reached the ground.
    pub fn tick(&mut self) -> bool {
        self.velocity += self.gravity;
        self.y += self.velocity;

        if self.y < 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
        }

        self.y < self.ground_limit
    }

    /// Whether the bird's box overlaps either pipe of `gate`.
    pub fn collides_with(&self, gate: &Gate) -> bool {
        let overlaps_horizontally =
            self.x + self.width > gate.x && self.x < gate.trailing_edge();
        if !overlaps_horizontally {
            return false;
        }
        // upper pipe, then lower pipe
        self.y < gate.gap_top() || self.y + self.height > gate.gap_bottom()
    }

    /// Marks the bird dead.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Locatable for Bird {
    fn pos(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn update(&mut self) -> bool {
        self.tick()
    }
}
