//! Shape generation for 2D primitives
//!
//! Every shape becomes a flat triangle list in screen coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for a filled axis-aligned ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Generate vertices for a filled rectangle
pub fn rect(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.right(), rect.bottom());
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a line segment of the given width
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_circle_vertex_count_and_extent() {
        let verts = circle(Vec2::new(10.0, 10.0), 5.0, RED, 16);
        assert_eq!(verts.len(), 48);
        for v in &verts {
            let p = Vec2::from(v.position);
            assert!(p.distance(Vec2::new(10.0, 10.0)) <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_ellipse_respects_radii() {
        let verts = ellipse(Vec2::ZERO, Vec2::new(30.0, 10.0), RED, 32);
        let max_x = verts.iter().map(|v| v.position[0].abs()).fold(0.0, f32::max);
        let max_y = verts.iter().map(|v| v.position[1].abs()).fold(0.0, f32::max);
        assert!((max_x - 30.0).abs() < 1e-3);
        assert!(max_y <= 10.0 + 1e-3);
    }

    #[test]
    fn test_rect_corners() {
        let verts = rect(&Rect::new(1.0, 2.0, 3.0, 4.0), RED);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| v.position[0] >= 1.0 && v.position[0] <= 4.0));
        assert!(verts.iter().all(|v| v.position[1] >= 2.0 && v.position[1] <= 6.0));
    }

    #[test]
    fn test_vertical_line_width() {
        let verts = line(Vec2::new(5.0, 0.0), Vec2::new(5.0, 10.0), 2.0, RED);
        assert_eq!(verts.len(), 6);
        for v in &verts {
            assert!((v.position[0] - 5.0).abs() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 1.0, RED).is_empty());
    }

    #[test]
    fn test_ring_count() {
        assert_eq!(ring(Vec2::ZERO, 5.0, 6.0, RED, 12).len(), 72);
    }
}
