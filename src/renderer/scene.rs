//! Scene composition: what gets drawn each frame, in what order
//!
//! The background color itself is not drawn here; the GPU pass clears to
//! [`GameState::background_color`] before these shapes go on top.

use crate::color::palette;
use crate::sim::GameState;
use crate::surface::Surface;

/// Shield ring drawn just outside the bird
const SHIELD_RING_GAP: f32 = 4.0;
const SHIELD_RING_WIDTH: f32 = 3.0;

/// Draw weather, pipes, pickups and the bird, back to front
pub fn draw_scene<S: Surface>(state: &GameState, surface: &mut S) {
    if let Some(weather) = &state.weather {
        weather.draw(surface);
    }

    // Bottom pipes extend past the playfield; stop them at the surface edge
    let floor = surface.size().y;
    for pipe in &state.pipes {
        surface.fill_rect(pipe.top_rect(), palette::PIPE);
        let mut bottom = pipe.bottom_rect();
        bottom.h = (floor - bottom.y).max(0.0);
        surface.fill_rect(bottom, palette::PIPE);
    }

    for pickup in &state.pickups {
        surface.fill_circle(pickup.pos, pickup.radius, pickup.kind.color());
    }

    let bird = &state.bird;
    surface.fill_circle(bird.pos, bird.radius, palette::BIRD);
    if state.shielded() {
        surface.stroke_circle(
            bird.pos,
            bird.radius + SHIELD_RING_GAP,
            SHIELD_RING_WIDTH,
            palette::SHIELD_RING,
        );
    }
}
