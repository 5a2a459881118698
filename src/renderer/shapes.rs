//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in logical canvas units
//! (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::glyphs::{GLYPH_ADVANCE, GLYPH_ROWS, lit_cells, text_columns};
use super::vertex::{Vertex, with_alpha};
use crate::sim::Rect;

/// Filled axis-aligned rectangle (two triangles)
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> [Vertex; 6] {
    let (x2, y2) = (x + w, y + h);
    [
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

/// Straight line of the given width as a quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Soft halo behind a rectangle: `layers` translucent rects growing out to
/// `blur` units. Drawn before the rect itself.
pub fn glow_rect(r: &Rect, blur: f32, color: [f32; 4], layers: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(layers as usize * 6);
    let alpha = 0.3 / layers.max(1) as f32;

    // Outermost first so inner layers stack on top
    for i in (1..=layers).rev() {
        let spread = blur * i as f32 / layers as f32;
        vertices.extend(rect(
            r.pos.x - spread,
            r.pos.y - spread,
            r.size.x + spread * 2.0,
            r.size.y + spread * 2.0,
            with_alpha(color, alpha),
        ));
    }

    vertices
}

/// Soft halo behind a circle
pub fn glow_circle(
    center: Vec2,
    radius: f32,
    blur: f32,
    color: [f32; 4],
    layers: u32,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((layers * segments * 3) as usize);
    let alpha = 0.3 / layers.max(1) as f32;

    for i in (1..=layers).rev() {
        let spread = blur * i as f32 / layers as f32;
        vertices.extend(circle(center, radius + spread, with_alpha(color, alpha), segments));
    }

    vertices
}

/// Bitmap text centered on `center`, `height` units tall
pub fn text(s: &str, center: Vec2, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let px = height / GLYPH_ROWS as f32;
    let width = text_columns(s) as f32 * px;
    let left = center.x - width / 2.0;
    let top = center.y - height / 2.0;

    let mut vertices = Vec::new();
    for (i, c) in s.chars().enumerate() {
        let origin_x = left + (i as u32 * GLYPH_ADVANCE) as f32 * px;
        for (col, row) in lit_cells(c) {
            vertices.extend(rect(
                origin_x + col as f32 * px,
                top + row as f32 * px,
                px,
                px,
                color,
            ));
        }
    }

    vertices
}
