use egui_macroquad::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use flappy_evo::simulation::evolution::{FitnessHistory, Trainer};
use flappy_evo::simulation::game::Game;

use super::ui::UIState;

pub(super) fn draw_stats_panel(
    egui_ctx: &egui::Context,
    state: &mut UIState,
    game: &Game,
    trainer: Option<&Trainer>,
) {
    egui::SidePanel::right("stats_panel")
        .default_width(state.stats_panel_width)
        .resizable(false)
        .show(egui_ctx, |ui| {
            ui.heading("Flappy Evo");
            ui.separator();

            if let Some(ref msg) = state.status_message {
                ui.label(msg);
                ui.separator();
            }

            ui.label("Simulation Speed");
            ui.add(egui::Slider::new(&mut state.simulation_speed, 1..=50).text("ticks/frame"));
            ui.horizontal(|ui| {
                let pause_text = if state.paused { "▶ Resume" } else { "⏸ Pause" };
                if ui.button(pause_text).clicked() {
                    state.paused = !state.paused;
                }
                ui.checkbox(&mut state.show_events, "Events");
            });

            ui.separator();

            ui.label(format!("Frame: {}", game.frame_count));
            ui.label(format!("Score: {}", game.score));
            ui.label(format!(
                "Alive: {}/{}",
                game.living_birds,
                game.birds.len()
            ));
            if game.game_over {
                ui.label("All birds are down");
            }

            let Some(trainer) = trainer else {
                return;
            };

            ui.separator();
            ui.heading("Training");

            let params = trainer.params();
            ui.label(format!(
                "Generation: {}/{}",
                trainer.generation(),
                params.generations
            ));
            ui.label(format!("Population: {}", params.population_size));
            ui.label(format!("Best fitness: {:.2}", trainer.best_fitness()));

            let history = trainer.history();
            if let (Some(max), Some(avg)) = (history.max.last(), history.avg.last()) {
                ui.label(format!("Last generation: max {:.2}, avg {:.2}", max, avg));
            }

            ui.collapsing("⚙ Evolution Parameters", |ui| {
                ui.label(format!("Mutation rate: {:.2}", params.mutation_rate));
                ui.label(format!("Mutation amount: {:.2}", params.mutation_amount));
                ui.label(format!("Survival rate: {:.2}", params.survival_rate));
                ui.label(format!("Survivors: {}", params.survivors_count()));
                ui.label(format!("Max steps: {}", params.max_steps));
            });

            ui.separator();
            ui.heading("Fitness Over Generations");
            draw_fitness_plot(ui, history);
        });
}

fn draw_fitness_plot(ui: &mut egui::Ui, history: &FitnessHistory) {
    if history.is_empty() {
        ui.label("Waiting for the first generation...");
        return;
    }

    let series = |values: &[f32]| -> PlotPoints {
        values
            .iter()
            .enumerate()
            .map(|(generation, &fitness)| [generation as f64, f64::from(fitness)])
            .collect()
    };

    Plot::new("fitness_plot")
        .height(200.0)
        .show_axes([true, true])
        .legend(Legend::default())
        .label_formatter(|name, value| {
            format!("{}\nGeneration: {:.0}\nFitness: {:.2}", name, value.x, value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(series(&history.max))
                    .color(egui::Color32::from_rgb(100, 200, 100))
                    .name("Max"),
            );
            plot_ui.line(
                Line::new(series(&history.avg))
                    .color(egui::Color32::from_rgb(100, 150, 255))
                    .name("Average"),
            );
        });
}
