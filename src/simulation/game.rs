//! The game loop: advances every bird and gate one tick at a time.
//!
//! A tick runs in two phases. The per-bird phase (decide, physics, collision
//! test) touches nothing but the bird itself and reads the gate list, so it
//! can fan out over rayon. The scoring phase then walks the birds in
//! population order, applies deaths, credits passed gates and records events,
//! which keeps runs deterministic regardless of how the first phase was
//! scheduled.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::error::Result;
use super::event_log::{EventKind, EventLog};
use super::features;
use super::gate::Gate;
use super::locatable::Locatable;
use super::params::Params;
use super::snapshot::{BirdView, GateView, Snapshot};

/// Who controls the birds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// The first bird jumps on request from the player.
    Human,
    /// Every bird with a brain decides for itself.
    Ai,
}

/// Compact state of the first bird, for step-by-step callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Top edge of the bird.
    pub bird_y: f32,
    /// Vertical velocity of the bird.
    pub bird_velocity: f32,
    /// Left edge of the next gate.
    pub next_gate_x: f32,
    /// Gap centre of the next gate.
    pub next_gate_gap_y: f32,
}

/// Result of a single [`Game::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Tick reward: collision beats pass beats survival.
    pub reward: f32,
    /// All birds are dead.
    pub done: bool,
    /// State after the tick.
    pub observation: Option<Observation>,
}

/// What the per-bird phase concluded for one bird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fate {
    /// Already dead before this tick.
    Frozen,
    /// Reached the ground.
    Grounded,
    /// Overlaps a pipe.
    Collided,
    /// Still flying.
    Flying,
}

/// Game state shared by all birds of a round.
#[derive(Debug, Clone)]
pub struct Game {
    /// World parameters.
    pub params: Params,
    /// Control mode.
    pub mode: ControlMode,
    /// Birds in population order.
    pub birds: Vec<Bird>,
    /// Active gates ordered by ascending x.
    pub gates: Vec<Gate>,
    /// Best score of any bird this round.
    pub score: u32,
    /// Frames since the last reset.
    pub frame_count: u64,
    /// Birds still alive.
    pub living_birds: usize,
    /// Set once every bird is dead.
    pub game_over: bool,
    /// Recent deaths, passes and spawns.
    pub event_log: EventLog,
    rng: ChaCha8Rng,
}

impl Game {
    /// Creates a game with a single default bird.
    pub fn new(params: Params, mode: ControlMode) -> Result<Self> {
        params.validate()?;
        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        let mut game = Self {
            params,
            mode,
            birds: Vec::new(),
            gates: Vec::new(),
            score: 0,
            frame_count: 0,
            living_birds: 0,
            game_over: false,
            event_log: EventLog::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        game.reset(Vec::new());
        Ok(game)
    }

    /// Starts a new round with `birds`, or with one player bird at the centre
    /// of the left quarter of the screen if `birds` is empty.
    pub fn reset(&mut self, birds: Vec<Bird>) -> Option<Observation> {
        self.game_over = false;
        self.score = 0;
        self.frame_count = 0;
        self.event_log.clear();

        self.birds = if birds.is_empty() {
            vec![Bird::new(
                0,
                self.params.screen_width / 4.0,
                self.params.screen_height / 2.0,
                &self.params,
            )]
        } else {
            birds
        };

        self.gates.clear();
        self.add_gate();

        self.living_birds = self.birds.iter().filter(|bird| bird.alive).count();
        self.observation()
    }

    fn add_gate(&mut self) {
        let gate = Gate::new(self.params.screen_width, &self.params, &mut self.rng);
        self.event_log.log(
            self.frame_count,
            format!("gate spawned with gap at {}", gate.gap_y),
            EventKind::GateSpawned,
        );
        self.gates.push(gate);
    }

    /// State of the first bird relative to its next gate.
    pub fn observation(&self) -> Option<Observation> {
        let bird = self.birds.first()?;
        let (next, _) = features::upcoming_gates(bird.x, &self.gates);
        next.map(|gate| Observation {
            bird_y: bird.y,
            bird_velocity: bird.velocity,
            next_gate_x: gate.x,
            next_gate_gap_y: gate.gap_y,
        })
    }

    /// Advances the game by one tick.
    ///
    /// `jump_requested` only has an effect in [`ControlMode::Human`].
    pub fn step(&mut self, jump_requested: bool) -> StepOutcome {
        self.frame_count += 1;

        if self.frame_count % self.params.gate_interval == 0 {
            self.add_gate();
        }

        if self.mode == ControlMode::Human && jump_requested {
            if let Some(bird) = self.birds.first_mut().filter(|bird| bird.alive) {
                bird.jump();
            }
        }

        self.gates.retain_mut(|gate| gate.update());

        let fates = self.advance_birds();
        let (collided, passed) = self.score_birds(&fates);

        self.game_over = self.living_birds == 0;

        let reward = if collided {
            self.params.collision_reward
        } else if passed {
            self.params.pass_reward
        } else {
            self.params.survive_reward
        };

        StepOutcome {
            reward,
            done: self.game_over,
            observation: self.observation(),
        }
    }

    /// Per-bird phase: decide, move and test for collisions.
    fn advance_birds(&mut self) -> Vec<Fate> {
        let gates = &self.gates;
        let controlled = self.mode == ControlMode::Ai;

        let advance = |bird: &mut Bird| {
            if !bird.alive {
                return Fate::Frozen;
            }
            if controlled {
                bird.decide(gates);
            }
            if !bird.update() {
                return Fate::Grounded;
            }
            if gates.iter().any(|gate| bird.collides_with(gate)) {
                Fate::Collided
            } else {
                Fate::Flying
            }
        };

        if self.params.parallel {
            self.birds.par_iter_mut().map(advance).collect()
        } else {
            self.birds.iter_mut().map(advance).collect()
        }
    }

    /// Scoring phase, in population order.
    ///
    /// A bird that hit a pipe this tick is still checked for passed gates, so
    /// a tick can report both a collision and a pass.
    ///
    /// # Returns
    ///
    /// Whether any bird collided and whether any bird passed a gate.
    fn score_birds(&mut self, fates: &[Fate]) -> (bool, bool) {
        let frame = self.frame_count;
        let mut collided = false;
        let mut passed = false;

        for (bird, &fate) in self.birds.iter_mut().zip(fates) {
            match fate {
                Fate::Frozen => continue,
                Fate::Grounded => {
                    bird.kill();
                    self.living_birds = self.living_birds.saturating_sub(1);
                    self.event_log.log(
                        frame,
                        format!("bird {} hit the ground", bird.id),
                        EventKind::GroundHit,
                    );
                    continue;
                }
                Fate::Collided => {
                    bird.kill();
                    self.living_birds = self.living_birds.saturating_sub(1);
                    collided = true;
                    self.event_log.log(
                        frame,
                        format!("bird {} hit a pipe", bird.id),
                        EventKind::GateHit,
                    );
                }
                Fate::Flying => {}
            }

            for gate in &mut self.gates {
                if gate.is_passed_by(bird) {
                    bird.score += 1;
                    self.score = self.score.max(bird.score);
                    passed = true;
                    self.event_log.log(
                        frame,
                        format!("bird {} passed gate {}", bird.id, bird.score),
                        EventKind::GatePassed,
                    );
                }
            }
        }

        (collided, passed)
    }

    /// Read-only view of the current frame.
    pub fn snapshot(&self) -> Snapshot {
        let gate_view = |gate: &Gate| GateView {
            x: gate.x,
            width: gate.width,
            gap_y: gate.gap_y,
            gap_top: gate.gap_top(),
            gap_bottom: gate.gap_bottom(),
        };

        let next_gate = self.birds.first().and_then(|bird| {
            let (next, _) = features::upcoming_gates(bird.x, &self.gates);
            next.map(gate_view)
        });

        Snapshot {
            birds: self
                .birds
                .iter()
                .map(|bird| {
                    let (x, y) = bird.pos();
                    BirdView {
                        id: bird.id,
                        x,
                        y,
                        width: bird.width,
                        height: bird.height,
                        alive: bird.alive,
                        score: bird.score,
                        color: bird.color,
                    }
                })
                .collect(),
            gates: self.gates.iter().map(gate_view).collect(),
            score: self.score,
            living_birds: self.living_birds,
            frame_count: self.frame_count,
            game_over: self.game_over,
            next_gate,
        }
    }
}
