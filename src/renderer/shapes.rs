//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in playfield pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;
use crate::{Rgba, with_alpha};

/// Two triangles covering `rect`
pub fn rect(out: &mut Vec<Vertex>, rect: &Rect, color: Rgba) {
    quad(
        out,
        [
            Vec2::new(rect.x, rect.y),
            Vec2::new(rect.right(), rect.y),
            Vec2::new(rect.right(), rect.bottom()),
            Vec2::new(rect.x, rect.bottom()),
        ],
        [color; 4],
    );
}

/// Rectangle fading from `top` to `bottom` color
pub fn gradient_rect(out: &mut Vec<Vertex>, rect: &Rect, top: Rgba, bottom: Rgba) {
    quad(
        out,
        [
            Vec2::new(rect.x, rect.y),
            Vec2::new(rect.right(), rect.y),
            Vec2::new(rect.right(), rect.bottom()),
            Vec2::new(rect.x, rect.bottom()),
        ],
        [top, top, bottom, bottom],
    );
}

/// Border of `thickness` drawn inside `rect`
pub fn rect_outline(out: &mut Vec<Vertex>, r: &Rect, thickness: f32, color: Rgba) {
    let t = thickness.min(r.width / 2.0).min(r.height / 2.0);
    rect(out, &Rect::new(r.x, r.y, r.width, t), color);
    rect(out, &Rect::new(r.x, r.bottom() - t, r.width, t), color);
    rect(out, &Rect::new(r.x, r.y + t, t, r.height - 2.0 * t), color);
    rect(out, &Rect::new(r.right() - t, r.y + t, t, r.height - 2.0 * t), color);
}

/// Soft halo: concentric rectangles growing outwards with falling alpha
pub fn glow_rect(out: &mut Vec<Vertex>, r: &Rect, spread: f32, color: Rgba) {
    const LAYERS: u32 = 3;
    for i in (1..=LAYERS).rev() {
        let grow = spread * i as f32 / LAYERS as f32;
        let alpha = color[3] * 0.25 / i as f32;
        rect(
            out,
            &Rect::new(r.x - grow, r.y - grow, r.width + 2.0 * grow, r.height + 2.0 * grow),
            with_alpha(color, alpha),
        );
    }
}

/// Line segment of the given width
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: Rgba) {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(out, [from + perp, to + perp, to - perp, from - perp], [color; 4]);
}

/// Generate vertices for a filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Rgba, segments: u32) {
    radial_circle(out, center, radius, color, color, segments);
}

/// Filled circle whose color fades from `inner` at the center to `outer`
/// at the rim
pub fn radial_circle(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    inner: Rgba,
    outer: Rgba,
    segments: u32,
) {
    let segments = segments.max(3);
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, inner));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            outer,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            outer,
        ));
    }
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Rgba,
    segments: u32,
) {
    let segments = segments.max(3);
    out.reserve((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = center + Vec2::from_angle(theta1) * inner_radius;
        let outer1 = center + Vec2::from_angle(theta1) * outer_radius;
        let inner2 = center + Vec2::from_angle(theta2) * inner_radius;
        let outer2 = center + Vec2::from_angle(theta2) * outer_radius;

        quad(out, [inner1, outer1, outer2, inner2], [color; 4]);
    }
}

/// Ribbon through `points` (oldest first), tapering and fading toward the
/// oldest end
pub fn trail(out: &mut Vec<Vertex>, points: &[Vec2], radius: f32, color: Rgba) {
    if points.len() < 2 {
        return;
    }

    out.reserve(points.len() * 6);
    let trail_len = points.len() as f32;

    for i in 0..points.len() - 1 {
        let p1 = points[i];
        let p2 = points[i + 1];

        // Oldest segment is faintest and thinnest
        let t1 = (i + 1) as f32 / trail_len;
        let t2 = (i + 2) as f32 / trail_len;

        let color1 = with_alpha(color, color[3] * t1 * 0.6);
        let color2 = with_alpha(color, color[3] * t2 * 0.6);

        let width1 = radius * t1;
        let width2 = radius * t2;

        // Direction from p1 to p2
        let dir = (p2 - p1).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x);

        quad(
            out,
            [p1 + perp * width1, p2 + perp * width2, p2 - perp * width2, p1 - perp * width1],
            [color1, color2, color2, color1],
        );
    }
}

/// Four corners in winding order, split into two triangles
fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [Rgba; 4]) {
    let v = |i: usize| Vertex::new(corners[i].x, corners[i].y, colors[i]);
    out.extend_from_slice(&[v(0), v(1), v(2), v(0), v(2), v(3)]);
}
