//! Generational trainer.
//!
//! Scores the birds of a finished round, keeps the fittest as parents and
//! refills the population with mutated copies of them. The best brain seen in
//! any generation is carried over unmutated (elitism).

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::bird::Bird;
use super::brain::Brain;
use super::error::{Error, Result};
use super::features;
use super::game::{ControlMode, Game};
use super::gate::Gate;
use super::params::{EvolutionParams, Params};

/// Per-generation fitness statistics, appended once per scored generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessHistory {
    /// Highest fitness of each generation.
    pub max: Vec<f32>,
    /// Mean fitness of each generation.
    pub avg: Vec<f32>,
}

impl FitnessHistory {
    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.max.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.max.is_empty()
    }

    fn push(&mut self, max: f32, avg: f32) {
        self.max.push(max);
        self.avg.push(avg);
    }
}

/// On-disk form of the fitness history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Generation counter at save time.
    pub generation: usize,
    /// RFC 3339 timestamp of the save.
    pub saved_at: String,
    /// All-time best fitness.
    pub best_fitness: f32,
    /// The recorded series.
    pub history: FitnessHistory,
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationReport {
    /// Index of the evaluated generation.
    pub generation: usize,
    /// Ticks simulated.
    pub steps: usize,
    /// Best bird score of the round.
    pub top_score: u32,
    /// Highest fitness of the generation.
    pub max_fitness: f32,
    /// Mean fitness of the generation.
    pub avg_fitness: f32,
    /// All-time best fitness after scoring.
    pub best_fitness: f32,
}

/// Evolves a population of brains through truncation selection and mutation.
#[derive(Debug, Clone)]
pub struct Trainer {
    params: EvolutionParams,
    population: Vec<Brain>,
    best_model: Option<Brain>,
    best_fitness: f32,
    generation: usize,
    history: FitnessHistory,
    rng: ChaCha8Rng,
}

impl Trainer {
    /// Creates a trainer with a random initial population.
    pub fn new(params: EvolutionParams) -> Result<Self> {
        params.validate()?;
        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let population = (0..params.population_size)
            .map(|_| {
                Brain::new(
                    params.input_size,
                    params.hidden_size,
                    params.output_size,
                    params.init_scale,
                    &mut rng,
                )
            })
            .collect();

        Ok(Self {
            params,
            population,
            best_model: None,
            best_fitness: 0.0,
            generation: 0,
            history: FitnessHistory::default(),
            rng,
        })
    }

    /// Trainer parameters.
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    /// Brains waiting to be flown. Empty while a generation is in flight.
    pub fn population(&self) -> &[Brain] {
        &self.population
    }

    /// Best brain seen in any generation.
    pub fn best_model(&self) -> Option<&Brain> {
        self.best_model.as_ref()
    }

    /// Fitness of [`Trainer::best_model`].
    pub fn best_fitness(&self) -> f32 {
        self.best_fitness
    }

    /// Number of generations bred so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Recorded fitness statistics.
    pub fn history(&self) -> &FitnessHistory {
        &self.history
    }

    /// Moves the population into fresh birds at the configured spawn point.
    /// Every brain is checked first, so a failure leaves the population in place.
    ///
    /// The brains come back to the trainer as clones in [`Trainer::next_generation`].
    pub fn spawn_birds(&mut self, params: &Params) -> Result<Vec<Bird>> {
        self.population.iter().try_for_each(features::check_brain)?;
        std::mem::take(&mut self.population)
            .into_iter()
            .enumerate()
            .map(|(id, brain)| {
                let mut bird =
                    Bird::with_brain(id, params.bird_start_x, params.bird_start_y, brain, params)?;
                bird.color = [
                    self.rng.random_range(100..=255),
                    self.rng.random_range(100..=255),
                    self.rng.random_range(100..=255),
                ];
                Ok(bird)
            })
            .collect()
    }

    /// Scores every bird and records the generation's statistics.
    ///
    /// Fitness is `score * 20`, plus 2 for birds still alive. Living birds that
    /// have not passed a gate also earn up to 3 for being close to the next
    /// gate and up to 5 for being level with its gap. Any brain that beats the
    /// all-time best is copied into [`Trainer::best_model`].
    ///
    /// # Returns
    ///
    /// Total and maximum fitness.
    pub fn calculate_fitness(&mut self, birds: &mut [Bird], gates: &[Gate]) -> (f32, f32) {
        let mut total_fitness = 0.0;
        let mut max_fitness = 0.0_f32;

        for bird in birds.iter_mut() {
            let fitness = self.fitness_of(bird, gates);
            bird.fitness = fitness;

            total_fitness += fitness;
            max_fitness = max_fitness.max(fitness);

            if let Some(brain) = &bird.brain {
                if self.best_model.is_none() || fitness > self.best_fitness {
                    self.best_fitness = fitness;
                    self.best_model = Some(brain.clone());
                }
            }
        }

        let avg_fitness = if birds.is_empty() {
            0.0
        } else {
            total_fitness / birds.len() as f32
        };
        self.history.push(max_fitness, avg_fitness);

        (total_fitness, max_fitness)
    }

    fn fitness_of(&self, bird: &Bird, gates: &[Gate]) -> f32 {
        let p = &self.params;
        let mut fitness = bird.score as f32 * p.score_weight;

        if bird.score == 0 && bird.alive {
            if let (Some(next), _) = features::upcoming_gates(bird.x, gates) {
                let proximity = (1.0 - (next.x - bird.x) / p.proximity_range).clamp(0.0, 1.0);
                fitness += proximity * p.proximity_weight;

                let alignment = (1.0 - (next.gap_y - bird.y).abs() / p.alignment_range).max(0.0);
                fitness += alignment * p.alignment_weight;
            }
        }

        if bird.alive {
            fitness += p.survival_bonus;
        }

        fitness
    }

    /// Returns the fittest birds, best first.
    ///
    /// Keeps `ceil(population_size * survival_rate)` birds, at least 2.
    pub fn selection<'a>(&self, birds: &'a [Bird]) -> Vec<&'a Bird> {
        let mut sorted: Vec<&Bird> = birds.iter().collect();
        sorted.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        sorted.truncate(self.params.survivors_count());
        sorted
    }

    /// Builds a child brain taking every parameter from either parent.
    ///
    /// Not used by [`Trainer::next_generation`], which relies on mutation alone.
    pub fn crossover(&mut self, parent1: &Brain, parent2: &Brain) -> Brain {
        Brain::crossover(parent1, parent2, &mut self.rng)
    }

    /// Scores the finished round and breeds the next population.
    ///
    /// The new population starts with an unmutated copy of the best brain ever
    /// seen and is filled with mutated copies of uniformly chosen survivors.
    /// If no survivor carries a brain, the brains of `birds` become the
    /// population again and an error is returned.
    pub fn next_generation(&mut self, birds: &mut [Bird], gates: &[Gate]) -> Result<&[Brain]> {
        let (total_fitness, max_fitness) = self.calculate_fitness(birds, gates);

        let parents: Vec<&Brain> = self
            .selection(birds)
            .into_iter()
            .filter_map(|bird| bird.brain.as_ref())
            .collect();
        if parents.is_empty() {
            self.population = birds.iter().filter_map(|bird| bird.brain.clone()).collect();
            return Err(Error::Config("no surviving bird carries a brain".into()));
        }

        let mut new_population = Vec::with_capacity(self.params.population_size);
        if let Some(best) = &self.best_model {
            new_population.push(best.clone());
        }

        while new_population.len() < self.params.population_size {
            let Some(parent) = parents.choose(&mut self.rng) else {
                break;
            };
            let mut child = (*parent).clone();
            child.mutate(
                self.params.mutation_rate,
                self.params.mutation_amount,
                &mut self.rng,
            );
            new_population.push(child);
        }

        debug!(
            generation = self.generation,
            total_fitness,
            max_fitness,
            parents = parents.len(),
            "bred next generation"
        );

        self.population = new_population;
        self.generation += 1;
        Ok(&self.population)
    }

    /// Flies the current population in `game` until every bird is dead or the
    /// step budget runs out, then breeds the next generation.
    pub fn run_generation(&mut self, game: &mut Game) -> Result<GenerationReport> {
        let birds = self.spawn_birds(&game.params)?;
        game.mode = ControlMode::Ai;
        game.reset(birds);

        let mut steps = 0;
        while steps < self.params.max_steps {
            steps += 1;
            if game.step(false).done {
                break;
            }
        }

        let generation = self.generation;
        let top_score = game.score;
        self.next_generation(&mut game.birds, &game.gates)?;

        Ok(GenerationReport {
            generation,
            steps,
            top_score,
            max_fitness: self.history.max.last().copied().unwrap_or(0.0),
            avg_fitness: self.history.avg.last().copied().unwrap_or(0.0),
            best_fitness: self.best_fitness,
        })
    }

    /// Writes the best brain to `dir/best_model_gen_{generation}.json`.
    ///
    /// # Returns
    ///
    /// The written path, or `None` if no brain has been scored yet.
    pub fn save_best_model(&self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let Some(best) = &self.best_model else {
            return Ok(None);
        };
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("best_model_gen_{}.json", self.generation));
        best.save_to_file(&path)?;
        Ok(Some(path))
    }

    /// Writes the fitness history to `path` as JSON.
    pub fn save_history(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let record = HistoryRecord {
            generation: self.generation,
            saved_at: chrono::Utc::now().to_rfc3339(),
            best_fitness: self.best_fitness,
            history: self.history.clone(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }
}
