//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in playfield coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Rotate a local-space point by `rotation` (screen convention, y down)
#[inline]
pub fn rotate(point: Vec2, rotation: f32) -> Vec2 {
    Vec2::from_angle(rotation).rotate(point)
}

/// Filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> [Vertex; 3] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
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

/// Segment count that keeps a circle of `radius` looking round
pub fn circle_segments(radius: f32) -> u32 {
    ((radius * 0.8) as u32).clamp(12, 48)
}

/// A line segment of the given width, as a quad
pub fn segment(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    let mut vertices = Vec::with_capacity(6);
    vertices.extend(triangle(a1, a2, b1, color));
    vertices.extend(triangle(b1, a2, b2, color));
    vertices
}

/// Closed outline through `points`
pub fn outline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len() * 6);
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        vertices.extend(segment(a, b, width, color));
    }
    vertices
}

/// Filled square centred on `center`, rotated by `rotation`
pub fn square(center: Vec2, size: f32, rotation: f32, color: [f32; 4]) -> Vec<Vertex> {
    let h = size / 2.0;
    let corners = [
        Vec2::new(-h, -h),
        Vec2::new(h, -h),
        Vec2::new(h, h),
        Vec2::new(-h, h),
    ]
    .map(|p| center + rotate(p, rotation));

    let mut vertices = Vec::with_capacity(6);
    vertices.extend(triangle(corners[0], corners[1], corners[2], color));
    vertices.extend(triangle(corners[0], corners[2], corners[3], color));
    vertices
}
