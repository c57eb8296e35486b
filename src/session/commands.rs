use crate::actor::ActorRole;
use crate::app::input::Key;
use crate::scene::UiAction;

/// Scene objects whose visibility can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneObject {
    Kicker,
    Keeper,
    Ball,
    Goal,
}

/// Everything the outside world can ask a session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleVisibility(SceneObject),
    /// Kicker strike plus a lone ball flight.
    Kick,
    StartSequence,
    PlayClip { actor: ActorRole, index: usize },
    Reset,
    RecenterCamera,
}

impl From<UiAction> for Command {
    fn from(action: UiAction) -> Self {
        match action {
            UiAction::StartSequence => Command::StartSequence,
            UiAction::Reset => Command::Reset,
        }
    }
}

/// Stock key bindings.
#[must_use]
pub fn default_key_map(key: Key) -> Option<Command> {
    let clip = |actor, index| Some(Command::PlayClip { actor, index });
    match key {
        Key::Key1 => Some(Command::ToggleVisibility(SceneObject::Kicker)),
        Key::Key2 => Some(Command::ToggleVisibility(SceneObject::Keeper)),
        Key::Key3 => Some(Command::ToggleVisibility(SceneObject::Ball)),
        Key::Key4 => Some(Command::ToggleVisibility(SceneObject::Goal)),
        Key::K => Some(Command::Kick),
        Key::Space | Key::Enter => Some(Command::StartSequence),
        Key::R => Some(Command::Reset),
        Key::C => Some(Command::RecenterCamera),
        Key::F1 => clip(ActorRole::Kicker, 0),
        Key::F2 => clip(ActorRole::Kicker, 1),
        Key::F3 => clip(ActorRole::Kicker, 2),
        Key::F4 => clip(ActorRole::Kicker, 3),
        Key::F5 => clip(ActorRole::Kicker, 4),
        Key::F6 => clip(ActorRole::Keeper, 0),
        Key::F7 => clip(ActorRole::Keeper, 1),
        Key::F8 => clip(ActorRole::Keeper, 2),
        Key::F9 => clip(ActorRole::Keeper, 3),
        Key::F10 => clip(ActorRole::Keeper, 4),
        Key::Escape => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_keys_split_between_actors() {
        assert_eq!(
            default_key_map(Key::F3),
            Some(Command::PlayClip {
                actor: ActorRole::Kicker,
                index: 2
            })
        );
        assert_eq!(
            default_key_map(Key::F6),
            Some(Command::PlayClip {
                actor: ActorRole::Keeper,
                index: 0
            })
        );
        assert_eq!(default_key_map(Key::Escape), None);
    }
}
