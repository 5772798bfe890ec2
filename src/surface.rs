//! Drawable surface abstraction
//!
//! Game code draws through this trait; the renderer decides how shapes become
//! pixels. Coordinates are screen space with a top-left origin.

use glam::Vec2;

use crate::color::Rgb;
use crate::sim::Rect;

pub trait Surface {
    /// Fixed surface size in screen units
    fn size(&self) -> Vec2;

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Ellipse inscribed in `bounds`
    fn fill_ellipse(&mut self, bounds: Rect, color: Rgb);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb);

    /// Circle outline of the given stroke width
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgb);

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgb);
}

/// Surface that records draw calls instead of rendering them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect(Rect, Rgb),
    Ellipse(Rect, Rgb),
    Circle { center: Vec2, radius: f32, color: Rgb },
    Ring { center: Vec2, radius: f32, width: f32, color: Rgb },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgb },
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn ellipses(&self) -> impl Iterator<Item = (&Rect, &Rgb)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Ellipse(r, color) => Some((r, color)),
            _ => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.commands.push(DrawCommand::Rect(rect, color));
    }

    fn fill_ellipse(&mut self, bounds: Rect, color: Rgb) {
        self.commands.push(DrawCommand::Ellipse(bounds, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgb) {
        self.commands.push(DrawCommand::Ring {
            center,
            radius,
            width,
            color,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgb) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}
