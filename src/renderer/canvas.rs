//! CPU-side surface that tessellates draw calls into a vertex list

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use crate::color::Rgb;
use crate::sim::Rect;
use crate::surface::Surface;

/// Segments used for circles and ellipses
const CURVE_SEGMENTS: u32 = 24;

/// Collects screen-space triangles for one frame
#[derive(Debug, Clone)]
pub struct VertexCanvas {
    size: Vec2,
    vertices: Vec<Vertex>,
}

impl VertexCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            vertices: Vec::new(),
        }
    }

    /// Drop last frame's vertices, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

impl Surface for VertexCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.vertices
            .extend(shapes::rect(&rect, color.to_rgba(1.0)));
    }

    fn fill_ellipse(&mut self, bounds: Rect, color: Rgb) {
        let radii = Vec2::new(bounds.w / 2.0, bounds.h / 2.0);
        self.vertices.extend(shapes::ellipse(
            bounds.center(),
            radii,
            color.to_rgba(1.0),
            CURVE_SEGMENTS,
        ));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.vertices.extend(shapes::circle(
            center,
            radius,
            color.to_rgba(1.0),
            CURVE_SEGMENTS,
        ));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgb) {
        self.vertices.extend(shapes::ring(
            center,
            radius - width / 2.0,
            radius + width / 2.0,
            color.to_rgba(1.0),
            CURVE_SEGMENTS,
        ));
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgb) {
        self.vertices
            .extend(shapes::line(from, to, width, color.to_rgba(1.0)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_accumulate_and_clear() {
        let mut canvas = VertexCanvas::new(400.0, 600.0);
        assert_eq!(canvas.size(), Vec2::new(400.0, 600.0));

        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Rgb::new(0, 200, 0));
        assert_eq!(canvas.vertices().len(), 6);
        canvas.fill_ellipse(Rect::new(0.0, 0.0, 60.0, 40.0), Rgb::new(255, 255, 255));
        assert_eq!(canvas.vertices().len(), 6 + CURVE_SEGMENTS as usize * 3);

        canvas.clear();
        assert!(canvas.vertices().is_empty());
    }

    #[test]
    fn test_ellipse_inscribed_in_bounds() {
        let mut canvas = VertexCanvas::new(400.0, 600.0);
        let bounds = Rect::new(100.0, 50.0, 60.0, 40.0);
        canvas.fill_ellipse(bounds, Rgb::new(255, 255, 255));
        for v in canvas.vertices() {
            assert!(v.position[0] >= bounds.x - 1e-3 && v.position[0] <= bounds.right() + 1e-3);
            assert!(v.position[1] >= bounds.y - 1e-3 && v.position[1] <= bounds.bottom() + 1e-3);
        }
    }
}
