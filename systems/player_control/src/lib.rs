#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating per-frame player intent into world commands.

use std::time::Duration;

use tablequest_core::{Command, ControlInput, SessionStatus, Vec2};

/// Configuration parameters required to construct the player control system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    move_speed: f32,
    turn_speed: f32,
    start_level: usize,
}

impl Config {
    /// Creates a configuration from speeds in tiles and radians per second
    /// and the zero-based level new games start on.
    #[must_use]
    pub const fn new(move_speed: f32, turn_speed: f32, start_level: usize) -> Self {
        Self {
            move_speed,
            turn_speed,
            start_level,
        }
    }

    /// Returns a copy of the configuration starting new games on `level`.
    #[must_use]
    pub const fn with_start_level(mut self, level: usize) -> Self {
        self.start_level = level;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(3.6, 0.72, 0)
    }
}

/// Player control system.
#[derive(Debug, Default)]
pub struct PlayerControl {
    config: Config,
}

impl PlayerControl {
    /// Creates a new player control system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Emits the commands requested by `input` for a frame lasting `dt`.
    ///
    /// Session commands are honoured in the statuses that accept them;
    /// movement, combat and interaction only while playing. Movement follows
    /// the facing after this frame's rotation.
    pub fn handle(
        &self,
        status: SessionStatus,
        input: &ControlInput,
        facing: f32,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        if input.start
            && matches!(
                status,
                SessionStatus::Menu | SessionStatus::GameOver | SessionStatus::Victory
            )
        {
            out.push(Command::StartGame {
                level: self.config.start_level,
            });
            return;
        }

        if input.pause && matches!(status, SessionStatus::Playing | SessionStatus::Paused) {
            out.push(Command::TogglePause);
            return;
        }

        if status != SessionStatus::Playing {
            return;
        }

        let seconds = dt.as_secs_f32();
        let turn = axis(input.turn_right, input.turn_left) * self.config.turn_speed * seconds;
        if turn != 0.0 {
            out.push(Command::RotatePlayer { radians: turn });
        }

        if input.interact {
            out.push(Command::OpenDoor);
        }

        let advance = axis(input.forward, input.backward) * self.config.move_speed * seconds;
        if advance != 0.0 {
            let heading = facing + turn;
            out.push(Command::MovePlayer {
                delta: Vec2::new(heading.cos(), heading.sin()) * advance,
            });
        }

        if let Some(slot) = input.weapon_slot {
            out.push(Command::SwitchWeapon { slot });
        }

        if input.fire {
            out.push(Command::FireWeapon);
        }
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        let control = PlayerControl::default();
        let input = ControlInput {
            forward: true,
            backward: true,
            turn_left: true,
            turn_right: true,
            ..ControlInput::default()
        };
        let mut out = Vec::new();

        control.handle(
            SessionStatus::Playing,
            &input,
            0.0,
            Duration::from_millis(16),
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn movement_follows_facing_scaled_by_frame_time() {
        let control = PlayerControl::new(Config::new(2.0, 1.0, 0));
        let input = ControlInput {
            backward: true,
            ..ControlInput::default()
        };
        let mut out = Vec::new();

        control.handle(
            SessionStatus::Playing,
            &input,
            std::f32::consts::FRAC_PI_2,
            Duration::from_millis(500),
            &mut out,
        );

        let [Command::MovePlayer { delta }] = out.as_slice() else {
            panic!("expected a single move, got {out:?}");
        };
        assert!((*delta - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn start_is_only_accepted_between_runs() {
        let control = PlayerControl::new(Config::default().with_start_level(2));
        let input = ControlInput {
            start: true,
            ..ControlInput::default()
        };

        for (status, expected) in [
            (SessionStatus::Menu, true),
            (SessionStatus::GameOver, true),
            (SessionStatus::Victory, true),
            (SessionStatus::Credits, false),
            (SessionStatus::Playing, false),
        ] {
            let mut out = Vec::new();
            control.handle(status, &input, 0.0, Duration::ZERO, &mut out);
            assert_eq!(
                out.contains(&Command::StartGame { level: 2 }),
                expected,
                "{status:?}"
            );
        }
    }

    #[test]
    fn gameplay_input_is_dropped_while_paused() {
        let control = PlayerControl::default();
        let input = ControlInput {
            forward: true,
            fire: true,
            interact: true,
            weapon_slot: Some(2),
            ..ControlInput::default()
        };
        let mut out = Vec::new();

        control.handle(
            SessionStatus::Paused,
            &input,
            0.0,
            Duration::from_millis(16),
            &mut out,
        );

        assert!(out.is_empty());
    }
}
