//! Fixed keyboard binding, keyed by `KeyboardEvent.code`

use super::Action;

/// Map a physical key code to its action
pub fn action_for_code(code: &str) -> Option<Action> {
    match code {
        "ArrowUp" | "KeyW" => Some(Action::Up),
        "ArrowDown" | "KeyS" => Some(Action::Down),
        "ArrowLeft" | "KeyA" => Some(Action::Left),
        "ArrowRight" | "KeyD" => Some(Action::Right),
        "Space" | "Enter" | "KeyZ" => Some(Action::A),
        "KeyX" | "Escape" | "Backspace" => Some(Action::B),
        "KeyP" => Some(Action::Start),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(action_for_code("KeyW"), Some(Action::Up));
        assert_eq!(action_for_code("ArrowRight"), Some(Action::Right));
        assert_eq!(action_for_code("Enter"), Some(Action::A));
        assert_eq!(action_for_code("Backspace"), Some(Action::B));
        assert_eq!(action_for_code("KeyP"), Some(Action::Start));
        assert_eq!(action_for_code("KeyQ"), None);
    }
}
