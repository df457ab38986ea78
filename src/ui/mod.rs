// UI module - egui panels drawn on top of the macroquad frame

mod events;
mod stats;
mod ui;

pub use ui::{STATS_PANEL_WIDTH, UIState, draw_ui, process_egui};
