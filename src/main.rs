//! Flappy Evo - CLI entry point.
//!
//! Trains bird brains headless or on screen, lets a human play, or replays a
//! saved model.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use flappy_evo::simulation::bird::Bird;
use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::evolution::Trainer;
use flappy_evo::simulation::game::{ControlMode, Game};
use flappy_evo::simulation::params::{Config, EvolutionParams, Params};
use macroquad::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod graphics;
mod ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Evolve brains without a window
    TrainHeadless,
    /// Evolve brains while rendering every tick
    TrainVisual,
    /// Fly a single bird with the space bar
    PlayHuman,
    /// Replay a saved brain
    PlayAi,
}

#[derive(Debug, Parser)]
#[command(name = "flappy-evo")]
#[command(version)]
#[command(about = "Flappy Bird clone with neuroevolved pilots")]
struct Cli {
    /// What to run
    #[arg(short, long, value_enum, default_value_t = Mode::TrainHeadless)]
    mode: Mode,

    /// Number of generations to train
    #[arg(short, long)]
    generations: Option<usize>,

    /// Brains per generation
    #[arg(short, long)]
    population: Option<usize>,

    /// Tick budget per generation (training) or per flight (play-ai)
    #[arg(long)]
    max_steps: Option<usize>,

    /// Saved brain to replay in play-ai mode
    #[arg(long)]
    model: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for models and fitness history
    #[arg(short, long, default_value = "models")]
    output: PathBuf,

    /// Save artifacts every this many generations
    #[arg(long)]
    save_interval: Option<usize>,

    /// Update birds on the rayon thread pool
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.mode {
        Mode::TrainHeadless => train_headless(config, &cli.output),
        Mode::TrainVisual => {
            let conf = window_conf("Flappy Evo - Training", &config.game);
            let output = cli.output.clone();
            macroquad::Window::from_config(conf, async move {
                if let Err(err) = train_visual(config, output).await {
                    error!("visual training failed: {err:#}");
                }
            });
            Ok(())
        }
        Mode::PlayHuman => {
            let game = Game::new(config.game.clone(), ControlMode::Human)?;
            let conf = window_conf("Flappy Evo", &config.game);
            macroquad::Window::from_config(conf, play_human(game));
            Ok(())
        }
        Mode::PlayAi => {
            let Some(model) = cli.model.as_deref() else {
                Cli::command()
                    .error(
                        clap::error::ErrorKind::MissingRequiredArgument,
                        "--model is required in play-ai mode",
                    )
                    .exit()
            };
            let brain = Brain::load_from_file(model)
                .with_context(|| format!("loading model from {}", model.display()))?;
            info!(model = %model.display(), "loaded model");

            let game = Game::new(config.game.clone(), ControlMode::Ai)?;
            let conf = window_conf("Flappy Evo - Replay", &config.game);
            macroquad::Window::from_config(conf, async move {
                if let Err(err) = play_ai(game, brain, cli.max_steps).await {
                    error!("replay failed: {err:#}");
                }
            });
            Ok(())
        }
    }
}

/// Builds the run configuration: file or mode preset first, then CLI overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None if cli.mode == Mode::TrainVisual => Config {
            evolution: EvolutionParams::visual(),
            ..Config::default()
        },
        None => Config::default(),
    };

    let evolution = &mut config.evolution;
    if let Some(generations) = cli.generations {
        evolution.generations = generations;
    }
    if let Some(population) = cli.population {
        evolution.population_size = population;
    }
    if let Some(max_steps) = cli.max_steps {
        evolution.max_steps = max_steps;
    }
    if let Some(save_interval) = cli.save_interval {
        evolution.save_interval = save_interval;
    }
    if let Some(seed) = cli.seed {
        evolution.seed = Some(seed);
        config.game.seed = Some(seed);
    }
    if cli.parallel {
        config.game.parallel = true;
    }

    config.game.validate()?;
    config.evolution.validate()?;
    Ok(config)
}

fn window_conf(title: &str, params: &Params) -> Conf {
    Conf {
        window_title: title.to_owned(),
        window_width: (params.screen_width + ui::STATS_PANEL_WIDTH) as i32,
        window_height: params.screen_height as i32,
        ..Default::default()
    }
}

fn save_artifacts(trainer: &Trainer, output: &Path, history_name: &str) -> Result<()> {
    if let Some(path) = trainer.save_best_model(output)? {
        info!(path = %path.display(), "saved best model");
    }
    let history = output.join(history_name);
    trainer.save_history(&history)?;
    info!(path = %history.display(), "saved fitness history");
    Ok(())
}

fn train_headless(config: Config, output: &Path) -> Result<()> {
    let mut game = Game::new(config.game, ControlMode::Ai)?;
    let mut trainer = Trainer::new(config.evolution)?;
    let generations = trainer.params().generations;
    let save_interval = trainer.params().save_interval;

    info!(
        population = trainer.params().population_size,
        generations,
        parallel = game.params.parallel,
        "starting headless training"
    );

    let start = Instant::now();
    let mut best_score = 0;

    for _ in 0..generations {
        let report = trainer.run_generation(&mut game)?;

        if report.top_score > best_score {
            best_score = report.top_score;
            info!(
                generation = report.generation,
                score = best_score,
                "new best score"
            );
        }

        info!(
            generation = report.generation,
            steps = report.steps,
            top_score = report.top_score,
            max_fitness = report.max_fitness,
            avg_fitness = report.avg_fitness,
            best_fitness = report.best_fitness,
            "generation finished"
        );

        if save_interval > 0 && trainer.generation() % save_interval == 0 {
            save_artifacts(
                &trainer,
                output,
                &format!("fitness_gen_{}.json", trainer.generation()),
            )?;
        }
    }

    save_artifacts(&trainer, output, "fitness_final.json")?;

    info!(
        generations = trainer.generation(),
        best_score,
        best_fitness = trainer.best_fitness(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "training complete"
    );
    Ok(())
}

async fn train_visual(config: Config, output: PathBuf) -> Result<()> {
    let mut game = Game::new(config.game, ControlMode::Ai)?;
    let mut trainer = Trainer::new(config.evolution)?;
    let generations = trainer.params().generations;
    let max_steps = trainer.params().max_steps;
    let save_interval = trainer.params().save_interval;

    let mut ui_state = ui::UIState::new();

    let birds = trainer.spawn_birds(&game.params)?;
    game.reset(birds);
    let mut steps = 0;

    info!(
        population = trainer.params().population_size,
        generations, "starting visual training"
    );

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if trainer.generation() < generations && !ui_state.paused {
            for _ in 0..ui_state.simulation_speed {
                steps += 1;
                let done = game.step(false).done;
                if !done && steps < max_steps {
                    continue;
                }

                let generation = trainer.generation();
                let top_score = game.score;
                trainer.next_generation(&mut game.birds, &game.gates)?;
                info!(
                    generation,
                    steps,
                    top_score,
                    best_fitness = trainer.best_fitness(),
                    "generation finished"
                );

                if save_interval > 0 && trainer.generation() % save_interval == 0 {
                    save_artifacts(
                        &trainer,
                        &output,
                        &format!("fitness_gen_{}.json", trainer.generation()),
                    )?;
                }

                if trainer.generation() >= generations {
                    save_artifacts(&trainer, &output, "fitness_final.json")?;
                    ui_state.status_message = Some(format!(
                        "Training complete, best fitness {:.1}",
                        trainer.best_fitness()
                    ));
                    break;
                }

                let birds = trainer.spawn_birds(&game.params)?;
                game.reset(birds);
                steps = 0;
                break;
            }
        }

        graphics::draw_frame(&game.snapshot(), &game.params, ui::STATS_PANEL_WIDTH);
        ui::draw_ui(&mut ui_state, &game, Some(&trainer));
        ui::process_egui();

        next_frame().await;
    }

    Ok(())
}

async fn play_human(mut game: Game) {
    let mut ui_state = ui::UIState::new();
    ui_state.status_message = Some("Space to jump, R to restart".into());

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if game.game_over {
            if is_key_pressed(KeyCode::R) {
                game.reset(Vec::new());
            }
        } else {
            game.step(is_key_pressed(KeyCode::Space));
        }

        graphics::draw_frame(&game.snapshot(), &game.params, ui::STATS_PANEL_WIDTH);
        ui::draw_ui(&mut ui_state, &game, None);
        ui::process_egui();

        next_frame().await;
    }
}

async fn play_ai(mut game: Game, brain: Brain, max_steps: Option<usize>) -> Result<()> {
    let mut ui_state = ui::UIState::new();
    ui_state.status_message = Some("R to restart".into());

    let spawn = |params: &Params| {
        Bird::with_brain(
            0,
            params.bird_start_x,
            params.bird_start_y,
            brain.clone(),
            params,
        )
    };
    game.reset(vec![spawn(&game.params)?]);
    let mut steps = 0;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        let out_of_steps = max_steps.is_some_and(|limit| steps >= limit);
        if !game.game_over && !out_of_steps {
            for _ in 0..ui_state.simulation_speed {
                steps += 1;
                if game.step(false).done || max_steps.is_some_and(|limit| steps >= limit) {
                    info!(score = game.score, steps, "flight over");
                    break;
                }
            }
        } else if is_key_pressed(KeyCode::R) {
            game.reset(vec![spawn(&game.params)?]);
            steps = 0;
        }

        graphics::draw_frame(&game.snapshot(), &game.params, ui::STATS_PANEL_WIDTH);
        ui::draw_ui(&mut ui_state, &game, None);
        ui::process_egui();

        next_frame().await;
    }

    Ok(())
}
