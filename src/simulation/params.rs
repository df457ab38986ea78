//! Simulation and training parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{Error, Result};
use super::features::FEATURE_COUNT;

/// Parameters that control the game world.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Screen width. Gates spawn at this x coordinate.
    pub screen_width: f32,
    /// Screen height.
    pub screen_height: f32,
    /// Birds die once their y coordinate reaches this value.
    pub ground_limit: f32,
    /// Spawn x of trained and replayed birds.
    pub bird_start_x: f32,
    /// Spawn y of trained and replayed birds.
    pub bird_start_y: f32,
    /// Downward acceleration applied every tick.
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up).
    pub jump_strength: f32,
    /// Bird bounding box width.
    pub bird_width: f32,
    /// Bird bounding box height.
    pub bird_height: f32,
    /// Gate width.
    pub gate_width: f32,
    /// Horizontal distance a gate scrolls per tick.
    pub gate_speed: f32,
    /// Vertical size of the passage through a gate.
    pub gap_height: f32,
    /// Lowest gap centre a new gate can get.
    pub gap_min_y: i32,
    /// Highest gap centre a new gate can get (inclusive).
    pub gap_max_y: i32,
    /// A new gate spawns every this many frames.
    pub gate_interval: u64,
    /// Reward for a tick without events.
    pub survive_reward: f32,
    /// Reward for a tick in which a gate was passed.
    pub pass_reward: f32,
    /// Reward for a tick in which a bird hit a gate.
    pub collision_reward: f32,
    /// Run the per-bird decide/physics/collision phase on the rayon pool.
    pub parallel: bool,
    /// Seed for the game's random source. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            ground_limit: 400.0,
            bird_start_x: 100.0,
            bird_start_y: 300.0,
            gravity: 0.8,
            jump_strength: -10.0,
            bird_width: 34.0,
            bird_height: 24.0,
            gate_width: 60.0,
            gate_speed: 3.0,
            gap_height: 170.0,
            gap_min_y: 180,
            gap_max_y: 320,
            gate_interval: 60,
            survive_reward: 0.1,
            pass_reward: 1.0,
            collision_reward: -1.0,
            parallel: false,
            seed: None,
        }
    }
}

impl Params {
    /// Checks that the values describe a playable world.
    pub fn validate(&self) -> Result<()> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(Error::Config("screen size must be positive".into()));
        }
        if self.ground_limit <= 0.0 {
            return Err(Error::Config("ground_limit must be positive".into()));
        }
        if self.gap_height <= 0.0 {
            return Err(Error::Config("gap_height must be positive".into()));
        }
        if self.gate_interval == 0 {
            return Err(Error::Config("gate_interval must be positive".into()));
        }
        if self.gap_min_y > self.gap_max_y {
            return Err(Error::Config(format!(
                "gap range is empty: {}..={}",
                self.gap_min_y, self.gap_max_y
            )));
        }
        if self.gate_width <= 0.0 || self.gate_speed <= 0.0 {
            return Err(Error::Config(
                "gate width and speed must be positive".into(),
            ));
        }
        if self.bird_width <= 0.0 || self.bird_height <= 0.0 {
            return Err(Error::Config("bird size must be positive".into()));
        }
        Ok(())
    }
}

/// Hyper-parameters of the evolutionary trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    /// Number of brains per generation.
    pub population_size: usize,
    /// Brain input width. Must match the feature vector.
    pub input_size: usize,
    /// Hidden layer width.
    pub hidden_size: usize,
    /// Brain output width.
    pub output_size: usize,
    /// Probability that a single parameter mutates.
    pub mutation_rate: f32,
    /// Scale of the Gaussian noise added to a mutating parameter.
    pub mutation_amount: f32,
    /// Fraction of the population kept as parents.
    pub survival_rate: f32,
    /// Stored for completeness; `next_generation` never reads it.
    pub crossover_rate: f32,
    /// Standard deviation of the initial weights.
    pub init_scale: f32,
    /// Tick budget of one generation.
    pub max_steps: usize,
    /// Number of generations to train.
    pub generations: usize,
    /// Artifacts are written every this many generations.
    pub save_interval: usize,
    /// Fitness points per passed gate.
    pub score_weight: f32,
    /// Maximum bonus for being close to the next gate.
    pub proximity_weight: f32,
    /// Horizontal distance over which the proximity bonus decays to zero.
    pub proximity_range: f32,
    /// Maximum bonus for being level with the next gap.
    pub alignment_weight: f32,
    /// Vertical distance over which the alignment bonus decays to zero.
    pub alignment_range: f32,
    /// Flat bonus for birds still alive at the end of the generation.
    pub survival_bonus: f32,
    /// Seed for the trainer's random source. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            input_size: FEATURE_COUNT,
            hidden_size: 24,
            output_size: 1,
            mutation_rate: 0.2,
            mutation_amount: 0.3,
            survival_rate: 0.3,
            crossover_rate: 0.0,
            init_scale: 0.1,
            max_steps: 1000,
            generations: 100,
            save_interval: 10,
            score_weight: 20.0,
            proximity_weight: 3.0,
            proximity_range: 400.0,
            alignment_weight: 5.0,
            alignment_range: 150.0,
            survival_bonus: 2.0,
            seed: None,
        }
    }
}

impl EvolutionParams {
    /// Smaller, more exploratory preset used when every tick is rendered.
    pub fn visual() -> Self {
        Self {
            population_size: 50,
            generations: 20,
            mutation_rate: 0.3,
            mutation_amount: 0.4,
            survival_rate: 0.4,
            ..Self::default()
        }
    }

    /// Checks the trainer can run with these values.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::Config(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.input_size != FEATURE_COUNT {
            return Err(Error::Config(format!(
                "input_size must be {FEATURE_COUNT}, got {}",
                self.input_size
            )));
        }
        if self.hidden_size == 0 || self.output_size == 0 {
            return Err(Error::Config("layer sizes must be non-zero".into()));
        }
        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("survival_rate", self.survival_rate),
            ("crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::Config(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        if self.mutation_amount < 0.0 || self.init_scale < 0.0 {
            return Err(Error::Config(
                "mutation_amount and init_scale must not be negative".into(),
            ));
        }
        if self.proximity_range <= 0.0 || self.alignment_range <= 0.0 {
            return Err(Error::Config("bonus ranges must be positive".into()));
        }
        Ok(())
    }

    /// Number of parents kept by selection: `ceil(population * survival_rate)`, at least 2.
    ///
    /// Products within float noise of an integer are not rounded up, so
    /// `100 * 0.3` keeps 30 parents rather than 31.
    pub fn survivors_count(&self) -> usize {
        let exact = self.population_size as f64 * f64::from(self.survival_rate);
        let count = if (exact - exact.round()).abs() < 1e-4 {
            exact.round()
        } else {
            exact.ceil()
        };
        (count as usize).max(2)
    }
}

/// Full run configuration as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// World parameters.
    pub game: Params,
    /// Trainer parameters.
    pub evolution: EvolutionParams,
}

impl Config {
    /// Loads a configuration file and validates both sections.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.game.validate()?;
        config.evolution.validate()?;
        Ok(config)
    }

    /// Saves the configuration as pretty JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
