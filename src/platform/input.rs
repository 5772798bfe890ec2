//! Keyboard mapping
//!
//! Key names follow `KeyboardEvent.key` values.

/// Player intents produced by the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Flap,
    Restart,
    Pause,
    SkipWeather,
    ToggleAutopilot,
}

pub fn action_for_key(key: &str) -> Option<Action> {
    match key {
        " " | "ArrowUp" | "w" | "W" => Some(Action::Flap),
        "r" | "R" => Some(Action::Restart),
        "Escape" | "p" | "P" => Some(Action::Pause),
        "n" | "N" => Some(Action::SkipWeather),
        "i" | "I" => Some(Action::ToggleAutopilot),
        _ => None,
    }
}
