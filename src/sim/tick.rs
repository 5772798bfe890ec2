//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one frame. All movement
//! constants are in pixels per tick at the fixed frame rate.

use super::collision::{circle_box_hits_any, circle_out_of_bounds, circles_overlap};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// How far below the target the autopilot lets the bird sink before flapping
const AUTOPILOT_SLACK: f32 = 20.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (space/click/tap)
    pub flap: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a new run after game over
    pub restart: bool,
    /// Jump to the next weather state (debug)
    pub skip_weather: bool,
    /// Demo mode - the autopilot flies the bird
    pub autopilot: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    if input.restart && state.phase == GamePhase::GameOver {
        state.restart();
    }

    // Weather keeps cycling behind the game over screen
    advance_weather(state, input.skip_weather);

    if state.phase != GamePhase::Playing {
        return;
    }

    // Bird movement
    let flap = input.flap || (input.autopilot && autopilot_should_flap(state));
    if flap {
        let strength = state.flap_velocity();
        state.bird.flap(strength);
        state.events.push(GameEvent::Flapped);
    }
    let gravity = state.gravity();
    state.bird.fall(gravity);

    // Spawning
    state.frame += 1;
    if state.frame % PIPE_SPAWN_INTERVAL == 0 {
        state.spawn_pipe();
    }
    if state.frame % PICKUP_SPAWN_INTERVAL == 0 {
        state.spawn_pickup();
    }

    scroll_pipes(state);
    scroll_pickups(state);

    // Collision
    if !state.shielded() && bird_collides(state) {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::Crashed { score: state.score });
        log::info!("Crashed at frame {} with score {}", state.frame, state.score);
    }

    tick_modifier(state);
}

fn advance_weather(state: &mut GameState, skip: bool) {
    let Some(weather) = state.weather.as_mut() else {
        return;
    };
    let changed = if skip {
        weather.skip_to_next();
        true
    } else {
        weather.update()
    };
    if changed {
        let now = weather.state();
        state.events.push(GameEvent::WeatherChanged(now));
    }
}

/// Move pipes left; pipes fully off screen are removed and scored
fn scroll_pipes(state: &mut GameState) {
    let points = state.points_per_pipe();
    let mut cleared = 0;
    state.pipes.retain_mut(|pipe| {
        pipe.x -= PIPE_SPEED;
        if pipe.right() > 0.0 {
            true
        } else {
            cleared += 1;
            false
        }
    });
    for _ in 0..cleared {
        state.score += points;
        state.events.push(GameEvent::PipeCleared { points });
    }
}

/// Move pickups left, dropping any off screen and collecting any touching
/// the bird. The last pickup collected this tick wins.
fn scroll_pickups(state: &mut GameState) {
    let bird = state.bird.clone();
    let mut collected = Vec::new();
    state.pickups.retain_mut(|pickup| {
        pickup.pos.x -= PIPE_SPEED;
        if circles_overlap(bird.pos, bird.radius, pickup.pos, pickup.radius) {
            collected.push(pickup.kind);
            return false;
        }
        pickup.pos.x + pickup.radius > 0.0
    });
    for kind in collected {
        log::debug!("Collected {}", kind.as_str());
        state.apply_modifier(kind);
        state.events.push(GameEvent::PickupCollected(kind));
    }
}

fn bird_collides(state: &GameState) -> bool {
    let bird = &state.bird;
    if circle_out_of_bounds(bird.pos.y, bird.radius, SCREEN_HEIGHT) {
        return true;
    }
    let rects: Vec<_> = state
        .pipes
        .iter()
        .flat_map(|p| [p.top_rect(), p.bottom_rect()])
        .collect();
    circle_box_hits_any(bird.pos, bird.radius, &rects)
}

fn tick_modifier(state: &mut GameState) {
    if let Some(modifier) = state.modifier.as_mut() {
        modifier.ticks_remaining = modifier.ticks_remaining.saturating_sub(1);
        if modifier.ticks_remaining == 0 {
            let kind = modifier.kind;
            state.modifier = None;
            state.events.push(GameEvent::ModifierExpired(kind));
            log::debug!("{} expired", kind.as_str());
        }
    }
}

/// Aim for the gap of the first pipe not yet passed (or mid-screen) and
/// flap when falling too far below it
pub fn autopilot_should_flap(state: &GameState) -> bool {
    let bird = &state.bird;
    let target = state
        .pipes
        .iter()
        .find(|p| p.right() > bird.pos.x - bird.radius)
        .map(|p| p.gap_y)
        .unwrap_or(SCREEN_HEIGHT / 2.0);
    bird.velocity >= 0.0 && bird.pos.y > target + AUTOPILOT_SLACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Features, Pickup, PickupKind, PipePair};
    use crate::sim::weather::WeatherState;
    use glam::Vec2;

    fn new_state() -> GameState {
        GameState::new(12345, Features::default()).unwrap()
    }

    /// Keep the bird parked mid-screen so long runs don't crash
    fn hover(state: &mut GameState) {
        state.bird.pos.y = SCREEN_HEIGHT / 2.0;
        state.bird.velocity = 0.0;
        state.pipes.clear();
    }

    #[test]
    fn test_gravity_pulls_bird_down() {
        let mut state = new_state();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.bird.velocity, 0.5);
        assert_eq!(state.bird.pos.y, 300.5);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_flap() {
        let mut state = new_state();
        let input = TickInput {
            flap: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.bird.velocity, -7.5);
        assert_eq!(state.bird.pos.y, 292.5);
        assert!(state.drain_events().contains(&GameEvent::Flapped));
    }

    #[test]
    fn test_bird_falls_to_game_over() {
        let mut state = new_state();
        let input = TickInput::default();
        for _ in 0..100 {
            tick(&mut state, &input);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Crashed { score: 0 }));

        // Frozen after the crash
        let y = state.bird.pos.y;
        tick(&mut state, &input);
        assert_eq!(state.bird.pos.y, y);
    }

    #[test]
    fn test_pipe_spawns_every_interval() {
        let mut state = new_state();
        let input = TickInput::default();
        for _ in 0..PIPE_SPAWN_INTERVAL - 1 {
            hover(&mut state);
            tick(&mut state, &input);
        }
        assert!(state.pipes.is_empty());
        state.bird.pos.y = SCREEN_HEIGHT / 2.0;
        state.bird.velocity = 0.0;
        tick(&mut state, &input);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes[0].x, SCREEN_WIDTH - PIPE_SPEED);
    }

    #[test]
    fn test_pickup_spawns_every_interval() {
        let mut state = new_state();
        let input = TickInput::default();
        for _ in 0..PICKUP_SPAWN_INTERVAL {
            hover(&mut state);
            tick(&mut state, &input);
        }
        assert_eq!(state.pickups.len(), 1);
        let kind = state.pickups[0].kind;
        assert!(kind == PickupKind::Shield || kind == PickupKind::DoublePoints);
        assert!(state.drain_events().contains(&GameEvent::PickupSpawned(kind)));
    }

    fn pipe_leaving(state: &mut GameState) {
        let id = state.next_entity_id();
        state.pipes.push(PipePair {
            id,
            x: -PIPE_WIDTH + 1.0,
            gap_y: 300.0,
            gap: PIPE_GAP,
            width: PIPE_WIDTH,
        });
    }

    #[test]
    fn test_pipe_leaving_scores() {
        let mut state = new_state();
        pipe_leaving(&mut state);
        tick(&mut state, &TickInput::default());
        assert!(state.pipes.is_empty());
        assert_eq!(state.score, 1);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::PipeCleared { points: 1 })
        );
    }

    #[test]
    fn test_double_and_no_points() {
        let mut state = new_state();
        state.apply_modifier(PickupKind::DoublePoints);
        pipe_leaving(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 2);

        state.apply_modifier(PickupKind::NoPoints);
        pipe_leaving(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_pipe_collision_ends_run() {
        let mut state = new_state();
        let id = state.next_entity_id();
        // Gap far below the bird: the top pipe covers it
        state.pipes.push(PipePair {
            id,
            x: 40.0,
            gap_y: 500.0,
            gap: PIPE_GAP,
            width: PIPE_WIDTH,
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_shield_ignores_collisions() {
        let mut state = new_state();
        state.apply_modifier(PickupKind::Shield);
        state.bird.pos.y = 590.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_collect_pickup() {
        let mut state = new_state();
        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            kind: PickupKind::GravityPlus,
            pos: Vec2::new(BIRD_X + PIPE_SPEED, 300.0),
            radius: PICKUP_RADIUS,
        });
        tick(&mut state, &TickInput::default());
        assert!(state.pickups.is_empty());
        assert_eq!(state.modifier_kind(), Some(PickupKind::GravityPlus));
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::PickupCollected(PickupKind::GravityPlus))
        );

        // Heavier gravity from the next tick on
        let v = state.bird.velocity;
        tick(&mut state, &TickInput::default());
        assert!((state.bird.velocity - v - GRAVITY_PLUS).abs() < 1e-6);
    }

    #[test]
    fn test_pickup_drops_off_screen() {
        let mut state = new_state();
        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            kind: PickupKind::Shield,
            pos: Vec2::new(-PICKUP_RADIUS + 1.0, 300.0),
            radius: PICKUP_RADIUS,
        });
        tick(&mut state, &TickInput::default());
        assert!(state.pickups.is_empty());
        assert_eq!(state.modifier, None);
    }

    #[test]
    fn test_modifier_expires() {
        let mut state = new_state();
        state.apply_modifier(PickupKind::JumpBoost);
        let input = TickInput::default();
        for _ in 0..MODIFIER_DURATION_TICKS - 1 {
            hover(&mut state);
            tick(&mut state, &input);
        }
        assert_eq!(state.modifier_kind(), Some(PickupKind::JumpBoost));
        hover(&mut state);
        tick(&mut state, &input);
        assert_eq!(state.modifier, None);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::ModifierExpired(PickupKind::JumpBoost))
        );
    }

    #[test]
    fn test_jump_boost_flap() {
        let mut state = new_state();
        state.apply_modifier(PickupKind::JumpBoost);
        let input = TickInput {
            flap: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.bird.velocity, FLAP_VELOCITY_BOOSTED + GRAVITY);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = new_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        let elapsed = state.weather.as_ref().map(|w| w.clock().elapsed_ticks());
        let y = state.bird.pos.y;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.bird.pos.y, y);
        assert_eq!(
            state.weather.as_ref().map(|w| w.clock().elapsed_ticks()),
            elapsed
        );

        // Unpause
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = new_state();
        state.bird.pos.y = 590.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_weather_runs_during_game_over() {
        let mut state = new_state();
        state.phase = GamePhase::GameOver;
        tick(&mut state, &TickInput::default());
        assert_eq!(
            state.weather.as_ref().map(|w| w.clock().elapsed_ticks()),
            Some(1)
        );
    }

    #[test]
    fn test_skip_weather() {
        let mut state = new_state();
        let input = TickInput {
            skip_weather: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(
            state.weather.as_ref().map(|w| w.state()),
            Some(WeatherState::Sunset)
        );
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::WeatherChanged(WeatherState::Sunset))
        );
    }

    #[test]
    fn test_weather_transition_event() {
        let mut state = GameState::new(8, Features::default()).unwrap();
        let input = TickInput::default();
        let duration = state
            .weather
            .as_ref()
            .map(|w| w.clock().duration_ticks())
            .unwrap_or_default();
        state.phase = GamePhase::GameOver;
        for _ in 0..duration {
            tick(&mut state, &input);
        }
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::WeatherChanged(WeatherState::Sunset)]
        );
    }

    #[test]
    fn test_autopilot_flaps_when_low() {
        let mut state = new_state();
        state.bird.pos.y = 400.0;
        state.bird.velocity = 1.0;
        assert!(autopilot_should_flap(&state));

        state.bird.velocity = -2.0;
        assert!(!autopilot_should_flap(&state));

        state.bird.pos.y = 250.0;
        state.bird.velocity = 1.0;
        assert!(!autopilot_should_flap(&state));
    }

    #[test]
    fn test_autopilot_targets_next_gap() {
        let mut state = new_state();
        let id = state.next_entity_id();
        state.pipes.push(PipePair {
            id,
            x: 200.0,
            gap_y: 150.0,
            gap: PIPE_GAP,
            width: PIPE_WIDTH,
        });
        state.bird.pos.y = 250.0;
        state.bird.velocity = 0.0;
        assert!(autopilot_should_flap(&state));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Features::default()).unwrap();
        let mut state2 = GameState::new(99999, Features::default()).unwrap();

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.pipes, state2.pipes);
        assert_eq!(state1.bird, state2.bird);
    }
}
