//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Append a filled axis-aligned rectangle (two triangles)
pub fn rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    out.push(Vertex::new(x, y, color));
    out.push(Vertex::new(x + w, y, color));
    out.push(Vertex::new(x, y + h, color));

    out.push(Vertex::new(x + w, y, color));
    out.push(Vertex::new(x + w, y + h, color));
    out.push(Vertex::new(x, y + h, color));
}

/// Append a rectangle centered on `center`, scaled per axis.
///
/// Used for the player's squash/stretch: the footprint widens by `scale_x`
/// and flattens by `scale_y` around its own center.
pub fn centered_rect(
    out: &mut Vec<Vertex>,
    center: Vec2,
    half_w: f32,
    half_h: f32,
    scale_x: f32,
    scale_y: f32,
    color: [f32; 4],
) {
    let hw = half_w * scale_x;
    let hh = half_h * scale_y;
    rect(out, center.x - hw, center.y - hh, hw * 2.0, hh * 2.0, color);
}

/// Append a downward-pointing triangle rotated about its center
pub fn spike_triangle(
    out: &mut Vec<Vertex>,
    center: Vec2,
    half_w: f32,
    half_h: f32,
    rotation: f32,
    color: [f32; 4],
) {
    let (sin, cos) = rotation.sin_cos();
    let rotate = |p: Vec2| Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos) + center;

    let top_left = rotate(Vec2::new(-half_w, -half_h));
    let top_right = rotate(Vec2::new(half_w, -half_h));
    let tip = rotate(Vec2::new(0.0, half_h));

    out.push(Vertex::new(top_left.x, top_left.y, color));
    out.push(Vertex::new(top_right.x, top_right.y, color));
    out.push(Vertex::new(tip.x, tip.y, color));
}

/// Append a filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Append a ring (hollow circle), used for power-up outlines
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = center + inner_radius * Vec2::new(theta1.cos(), theta1.sin());
        let outer1 = center + outer_radius * Vec2::new(theta1.cos(), theta1.sin());
        let inner2 = center + inner_radius * Vec2::new(theta2.cos(), theta2.sin());
        let outer2 = center + outer_radius * Vec2::new(theta2.cos(), theta2.sin());

        out.push(Vertex::new(inner1.x, inner1.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(inner2.x, inner2.y, color));

        out.push(Vertex::new(inner2.x, inner2.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(outer2.x, outer2.y, color));
    }
}
