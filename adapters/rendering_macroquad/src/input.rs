use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use tablequest_core::ControlInput;

const WEAPON_KEYS: [KeyCode; 9] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
];

/// Keyboard state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FrameKeys {
    pub(crate) quit_requested: bool,
    pub(crate) control: ControlInput,
}

impl FrameKeys {
    pub(crate) fn poll() -> Self {
        Self::from_observations(is_key_down, is_key_pressed)
    }

    /// Maps held and freshly pressed keys to control intent.
    ///
    /// Movement and turning follow held keys; every other action fires on
    /// the frame its key goes down.
    pub(crate) fn from_observations(
        held: impl Fn(KeyCode) -> bool,
        pressed: impl Fn(KeyCode) -> bool,
    ) -> Self {
        let either = |observe: &dyn Fn(KeyCode) -> bool, a: KeyCode, b: KeyCode| {
            observe(a) || observe(b)
        };

        let control = ControlInput {
            forward: either(&held, KeyCode::W, KeyCode::Up),
            backward: either(&held, KeyCode::S, KeyCode::Down),
            turn_left: either(&held, KeyCode::A, KeyCode::Left),
            turn_right: either(&held, KeyCode::D, KeyCode::Right),
            fire: pressed(KeyCode::Space),
            interact: pressed(KeyCode::E),
            weapon_slot: WEAPON_KEYS.iter().position(|key| pressed(*key)).map(|slot| slot + 1),
            pause: either(&pressed, KeyCode::Escape, KeyCode::P),
            start: pressed(KeyCode::Enter),
        };

        Self {
            quit_requested: pressed(KeyCode::Q),
            control,
        }
    }
}
