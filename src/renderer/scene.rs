//! Frame composition
//!
//! Turns a [`GameState`] into one triangle list, back to front:
//! background, road (grid + watermark), obstacles, player, particles.
//! Runs every frame in every phase; the paused and crashed screens show
//! the frozen road underneath their overlays.

use std::ops::Range;

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Obstacle, ObstacleKind, ParticleTint, Rect};

/// Halo size around cars
const CAR_GLOW: f32 = 20.0;
/// Halo size around pickups
const PICKUP_GLOW: f32 = 15.0;
const PICKUP_RADIUS: f32 = 15.0;
/// Halo size around car lights
const LIGHT_GLOW: f32 = 4.0;
const WATERMARK_HEIGHT: f32 = 40.0;
const BADGE_HEIGHT: f32 = 10.0;
const PICKUP_MARK_HEIGHT: f32 = 20.0;
const LANE_LINE_WIDTH: f32 = 2.0;

/// Draw order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Road,
    Obstacles,
    Player,
    Particles,
}

/// One frame's geometry with the vertex span of each layer
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub vertices: Vec<Vertex>,
    pub layers: Vec<(Layer, Range<usize>)>,
    open: Option<(Layer, usize)>,
}

impl DrawList {
    fn begin(&mut self, layer: Layer) {
        self.open = Some((layer, self.vertices.len()));
    }

    fn end(&mut self) {
        if let Some((layer, start)) = self.open.take() {
            self.layers.push((layer, start..self.vertices.len()));
        }
    }

    fn push(&mut self, vertices: impl IntoIterator<Item = Vertex>) {
        self.vertices.extend(vertices);
    }

    /// Vertex span of `layer`
    pub fn span(&self, layer: Layer) -> Option<Range<usize>> {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, r)| r.clone())
    }

    pub fn layer_vertices(&self, layer: Layer) -> &[Vertex] {
        self.span(layer)
            .map(|r| &self.vertices[r])
            .unwrap_or(&[])
    }
}

fn tint_color(tint: ParticleTint) -> [f32; 4] {
    match tint {
        ParticleTint::Player => colors::NEON_BLUE,
        ParticleTint::Pickup => colors::NEON_GREEN,
    }
}

/// Body color of an obstacle
pub fn obstacle_color(kind: ObstacleKind) -> [f32; 4] {
    match kind {
        ObstacleKind::Enemy => colors::NEON_PINK,
        ObstacleKind::Pickup => colors::NEON_GREEN,
    }
}

/// Build the whole frame
pub fn build_frame(state: &GameState, settings: &Settings) -> DrawList {
    let mut list = DrawList::default();
    let glow = settings.glow_layers();
    let segments = settings.quality.circle_segments();
    let offset = if settings.reduced_motion {
        0.0
    } else {
        state.road_offset
    };

    list.begin(Layer::Background);
    list.push(shapes::rect(
        0.0,
        0.0,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        colors::BACKGROUND,
    ));
    list.end();

    list.begin(Layer::Road);
    draw_road(&mut list, offset);
    list.end();

    list.begin(Layer::Obstacles);
    for obs in &state.obstacles {
        match obs.kind {
            ObstacleKind::Pickup => draw_pickup(&mut list, obs, glow, segments),
            ObstacleKind::Enemy => draw_car(
                &mut list,
                &obs.rect,
                obstacle_color(obs.kind),
                CarStyle::Oncoming,
                glow,
            ),
        }
    }
    list.end();

    // The explosion stands in for the car once crashed
    list.begin(Layer::Player);
    if state.phase != GamePhase::GameOver {
        draw_car(
            &mut list,
            &state.player.rect,
            colors::NEON_BLUE,
            CarStyle::Player,
            glow,
        );
    }
    list.end();

    list.begin(Layer::Particles);
    if settings.particles {
        for p in &state.particles {
            let color = with_alpha(tint_color(p.tint), p.life);
            list.push(shapes::rect(p.pos.x, p.pos.y, p.size, p.size, color));
        }
    }
    list.end();

    list
}

/// Lane separators, scrolling grid and the brand watermark
fn draw_road(list: &mut DrawList, offset: f32) {
    for i in 1..LANE_COUNT {
        let x = i as f32 * LANE_WIDTH;
        list.push(shapes::line(
            Vec2::new(x, 0.0),
            Vec2::new(x, CANVAS_HEIGHT),
            LANE_LINE_WIDTH,
            colors::ROAD_LINE,
        ));
    }

    // Fades out toward the bottom
    let mut y = offset - GRID_GAP;
    while y < CANVAS_HEIGHT {
        let alpha = 1.0 - y / CANVAS_HEIGHT;
        list.push(shapes::line(
            Vec2::new(0.0, y),
            Vec2::new(CANVAS_WIDTH, y),
            LANE_LINE_WIDTH,
            with_alpha(colors::ROAD_LINE, alpha),
        ));
        y += GRID_GAP;
    }

    // Three copies half a loop apart tile the scroll seamlessly
    let half = ROAD_LOOP / 2.0;
    let base = (offset + half) % ROAD_LOOP - half;
    for k in 0..3 {
        let center = Vec2::new(CANVAS_WIDTH / 2.0, base + k as f32 * half);
        list.push(shapes::text(BRAND_NAME, center, WATERMARK_HEIGHT, colors::WATERMARK));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarStyle {
    /// Headlights at the front and the hood badge
    Player,
    /// Lights at the rear
    Oncoming,
}

fn draw_car(list: &mut DrawList, body: &Rect, color: [f32; 4], style: CarStyle, glow: u32) {
    let Vec2 { x, y } = body.pos;
    let Vec2 { x: w, y: h } = body.size;

    list.push(shapes::glow_rect(body, CAR_GLOW, color, glow));
    list.push(shapes::rect(x, y, w, h, color));

    // Front and rear glass
    list.push(shapes::rect(x + 5.0, y + 20.0, w - 10.0, 20.0, colors::BLACK));
    list.push(shapes::rect(x + 5.0, y + 60.0, w - 10.0, 15.0, colors::BLACK));

    let light_y = match style {
        CarStyle::Player => y,
        CarStyle::Oncoming => y + 80.0,
    };
    for light in [
        Rect::new(x + 5.0, light_y, 10.0, 5.0),
        Rect::new(x + w - 15.0, light_y, 10.0, 5.0),
    ] {
        list.push(shapes::glow_rect(&light, LIGHT_GLOW, colors::WHITE, glow));
        list.push(shapes::rect(
            light.pos.x,
            light.pos.y,
            light.size.x,
            light.size.y,
            colors::WHITE,
        ));
    }

    if style == CarStyle::Player {
        let badge = Vec2::new(x + w / 2.0, y + 55.0 - BADGE_HEIGHT / 2.0);
        list.push(shapes::text(BRAND_BADGE, badge, BADGE_HEIGHT, colors::BLACK));
    }
}

fn draw_pickup(list: &mut DrawList, obs: &Obstacle, glow: u32, segments: u32) {
    let center = obs.rect.center();
    let color = obstacle_color(obs.kind);
    list.push(shapes::glow_circle(
        center,
        PICKUP_RADIUS,
        PICKUP_GLOW,
        color,
        glow,
        segments,
    ));
    list.push(shapes::circle(center, PICKUP_RADIUS, color, segments));
    list.push(shapes::text("$", center, PICKUP_MARK_HEIGHT, colors::BLACK));
}
