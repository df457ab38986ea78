use egui_macroquad::egui;
use flappy_evo::simulation::evolution::Trainer;
use flappy_evo::simulation::game::Game;

/// Width of the right-hand stats panel in pixels.
pub const STATS_PANEL_WIDTH: f32 = 300.0;

pub struct UIState {
    pub stats_panel_width: f32,
    pub status_message: Option<String>,
    /// Game ticks simulated per rendered frame.
    pub simulation_speed: u32,
    pub paused: bool,
    pub show_events: bool,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            stats_panel_width: STATS_PANEL_WIDTH,
            status_message: None,
            simulation_speed: 1,
            paused: false,
            show_events: true,
        }
    }
}

pub fn draw_ui(state: &mut UIState, game: &Game, trainer: Option<&Trainer>) {
    egui_macroquad::ui(|egui_ctx| {
        // Configure brighter text and UI
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        visuals.widgets.noninteractive.fg_stroke.color = egui::Color32::from_rgb(220, 220, 220);
        visuals.widgets.inactive.fg_stroke.color = egui::Color32::from_rgb(200, 200, 200);
        visuals.widgets.hovered.fg_stroke.color = egui::Color32::WHITE;
        visuals.widgets.active.fg_stroke.color = egui::Color32::WHITE;
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_panel(egui_ctx, state, game, trainer);

        if state.show_events {
            super::events::draw_events_panel(egui_ctx, game);
        }
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
