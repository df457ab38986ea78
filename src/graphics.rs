use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::snapshot::{BirdView, GateView, Snapshot};
use macroquad::prelude::*;

const SKY: Color = Color::new(0.53, 0.81, 0.92, 1.0);
const PIPE: Color = Color::new(0.0, 0.6, 0.0, 1.0);
const PIPE_RIM: Color = Color::new(0.0, 0.45, 0.0, 1.0);
const GROUND: Color = Color::new(0.55, 0.35, 0.17, 1.0);

/// Maps world coordinates onto the window area left of the stats panel.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    scale: f32,
}

impl Viewport {
    /// Largest uniform scale that fits the world next to a panel of `reserved_width`.
    fn fit(params: &Params, reserved_width: f32) -> Self {
        let available_w = (screen_width() - reserved_width).max(1.0);
        let scale = (available_w / params.screen_width).min(screen_height() / params.screen_height);
        Self { scale }
    }
}

trait ToScreen {
    type Output;
    fn to_screen(&self, view: Viewport) -> Self::Output;
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, view: Viewport) -> f32 {
        self * view.scale
    }
}

impl ToScreen for (f32, f32) {
    type Output = Vec2;
    fn to_screen(&self, view: Viewport) -> Vec2 {
        vec2(self.0 * view.scale, self.1 * view.scale)
    }
}

/// Draws one frame of the game, scaled to the window area left of `reserved_width`.
pub fn draw_frame(snapshot: &Snapshot, params: &Params, reserved_width: f32) {
    let view = Viewport::fit(params, reserved_width);
    clear_background(DARKGRAY);

    let world = (params.screen_width, params.screen_height).to_screen(view);
    draw_rectangle(0.0, 0.0, world.x, world.y, SKY);

    // birds die once their top edge reaches the limit, so the ground starts below it
    let ground_y = params.ground_limit + params.bird_height;

    for gate in &snapshot.gates {
        draw_gate(gate, ground_y, view);
    }

    let ground = (0.0, ground_y).to_screen(view);
    draw_rectangle(0.0, ground.y, world.x, world.y - ground.y, GROUND);

    // dead birds first so the living ones stay on top
    for bird in snapshot.birds.iter().filter(|bird| !bird.alive) {
        draw_bird(bird, view);
    }
    for bird in snapshot.birds.iter().filter(|bird| bird.alive) {
        draw_bird(bird, view);
    }

    draw_hud(snapshot, world);
}

fn draw_gate(gate: &GateView, ground_y: f32, view: Viewport) {
    let x = gate.x.to_screen(view);
    let width = gate.width.to_screen(view);
    let gap_top = gate.gap_top.to_screen(view);
    let gap_bottom = gate.gap_bottom.to_screen(view);
    let ground = ground_y.to_screen(view);
    let rim = 4.0;

    draw_rectangle(x, 0.0, width, gap_top, PIPE);
    draw_rectangle(x - rim, gap_top - 2.0 * rim, width + 2.0 * rim, 2.0 * rim, PIPE_RIM);

    if ground > gap_bottom {
        draw_rectangle(x, gap_bottom, width, ground - gap_bottom, PIPE);
        draw_rectangle(x - rim, gap_bottom, width + 2.0 * rim, 2.0 * rim, PIPE_RIM);
    }
}

fn draw_bird(bird: &BirdView, view: Viewport) {
    let pos = (bird.x, bird.y).to_screen(view);
    let width = bird.width.to_screen(view);
    let height = bird.height.to_screen(view);
    let alpha = if bird.alive { 255 } else { 70 };
    let [r, g, b] = bird.color;

    draw_rectangle(pos.x, pos.y, width, height, Color::from_rgba(r, g, b, alpha));
    draw_rectangle_lines(
        pos.x,
        pos.y,
        width,
        height,
        1.0,
        Color::from_rgba(0, 0, 0, alpha),
    );

    if bird.alive {
        let label = bird.id.to_string();
        let font_size = 12.0;
        let size = measure_text(&label, None, font_size as u16, 1.0);
        draw_text(
            &label,
            pos.x + (width - size.width) / 2.0,
            pos.y + (height + size.height) / 2.0,
            font_size,
            BLACK,
        );
    }
}

fn draw_hud(snapshot: &Snapshot, world: Vec2) {
    let font_size = 24.0;
    let line = 26.0;
    let mut y = 30.0;

    let mut text = |content: &str| {
        draw_text(content, 10.0, y, font_size, BLACK);
        y += line;
    };

    text(&format!("Score: {}", snapshot.score));
    text(&format!(
        "Birds: {}/{}",
        snapshot.living_birds,
        snapshot.birds.len()
    ));
    text(&format!("Frame: {}", snapshot.frame_count));
    if let Some(gate) = &snapshot.next_gate {
        text(&format!("Next gate: x={:.0} gap={:.0}", gate.x, gate.gap_y));
    }

    if snapshot.game_over {
        let message = "GAME OVER";
        let font_size = 48.0;
        let size = measure_text(message, None, font_size as u16, 1.0);
        draw_text(
            message,
            (world.x - size.width) / 2.0,
            world.y / 2.0,
            font_size,
            RED,
        );
    }
}
