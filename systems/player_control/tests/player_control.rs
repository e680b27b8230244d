use std::time::Duration;

use tablequest_core::{Command, ControlInput, Event, SessionStatus, SoundCue, TileKind};
use tablequest_system_player_control::{Config, PlayerControl};
use tablequest_world::{self as world, query, LevelLayout, LevelPack, World};

fn corridor_world() -> World {
    let layout = LevelLayout::parse(
        "corridor",
        &["##########", "#S.....+.#", "##########"],
    )
    .expect("layout parses");
    World::new(LevelPack::new(vec![layout]), 11)
}

fn frame(
    world: &mut World,
    control: &PlayerControl,
    input: ControlInput,
    dt: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    control.handle(
        query::status(world),
        &input,
        query::player(world).pose.facing,
        dt,
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn start_then_walk_until_blocked_by_the_door() {
    let mut world = corridor_world();
    let control = PlayerControl::new(Config::default());
    let dt = Duration::from_millis(20);

    let _ = frame(
        &mut world,
        &control,
        ControlInput {
            start: true,
            ..ControlInput::default()
        },
        dt,
    );
    assert_eq!(query::status(&world), SessionStatus::Playing);

    let walk = ControlInput {
        forward: true,
        ..ControlInput::default()
    };
    let mut events = Vec::new();
    for _ in 0..50 {
        events.extend(frame(&mut world, &control, walk, dt));
    }

    let position = query::player(&world).pose.position;
    assert!((position.x - 5.1).abs() < 0.05, "walked to {position}");
    let steps = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::SoundTriggered {
                    cue: SoundCue::Step
                }
            )
        })
        .count();
    assert_eq!(steps, 3);

    for _ in 0..50 {
        let _ = frame(&mut world, &control, walk, dt);
    }
    let blocked = query::player(&world).pose.position;
    assert!(blocked.x < 6.75, "walked into the door at {blocked}");

    let _ = frame(
        &mut world,
        &control,
        ControlInput {
            interact: true,
            ..ControlInput::default()
        },
        dt,
    );
    assert_eq!(query::tile_view(&world).tile_at(7, 1), TileKind::Empty);
}

#[test]
fn long_frame_cannot_carry_the_player_through_a_locked_gate() {
    let layout =
        LevelLayout::parse("gate", &["##########", "#S.X.T...#", "##########"]).expect("parses");
    let mut world = World::new(LevelPack::new(vec![layout]), 5);
    let control = PlayerControl::default();

    let _ = frame(
        &mut world,
        &control,
        ControlInput {
            start: true,
            ..ControlInput::default()
        },
        Duration::from_millis(16),
    );
    let _ = frame(
        &mut world,
        &control,
        ControlInput {
            forward: true,
            ..ControlInput::default()
        },
        Duration::from_millis(900),
    );

    let position = query::player(&world).pose.position;
    assert!(position.x > 2.5, "barely moved: {position}");
    assert!(position.x < 3.0, "passed the gate: {position}");
    assert_eq!(query::tile_view(&world).tile_at(3, 1), TileKind::LockedGate);
    assert_eq!(query::player(&world).tables, 0);
}

#[test]
fn pause_toggles_through_the_control_system() {
    let mut world = corridor_world();
    let control = PlayerControl::default();
    let dt = Duration::from_millis(16);
    let press = |flag: fn(&mut ControlInput)| {
        let mut input = ControlInput::default();
        flag(&mut input);
        input
    };

    let _ = frame(&mut world, &control, press(|input| input.start = true), dt);
    let _ = frame(&mut world, &control, press(|input| input.pause = true), dt);
    assert_eq!(query::status(&world), SessionStatus::Paused);

    let before = query::player(&world).pose;
    let _ = frame(&mut world, &control, press(|input| input.forward = true), dt);
    assert_eq!(query::player(&world).pose, before);

    let _ = frame(&mut world, &control, press(|input| input.pause = true), dt);
    assert_eq!(query::status(&world), SessionStatus::Playing);
}
