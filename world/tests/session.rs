use std::time::Duration;

use tablequest_core::{
    Command, EnemyState, EntityId, Event, Screen, SessionStatus, TileKind, Vec2, WeaponId,
};
use tablequest_world::{apply, query, LevelLayout, LevelPack, Tuning, World};

fn pack(levels: &[&[&str]]) -> LevelPack {
    LevelPack::new(
        levels
            .iter()
            .enumerate()
            .map(|(index, rows)| {
                LevelLayout::parse(&format!("level {}", index + 1), rows).expect("layout parses")
            })
            .collect(),
    )
}

fn started(levels: &[&[&str]], tuning: Tuning) -> World {
    let mut world = World::with_tuning(pack(levels), tuning, 0x5eed);
    let _ = run(&mut world, Command::StartGame { level: 0 });
    assert_eq!(query::status(&world), SessionStatus::Playing);
    world
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn tick(world: &mut World, millis: u64) -> Vec<Event> {
    run(
        world,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
    )
}

fn move_by(world: &mut World, x: f32, y: f32) -> Vec<Event> {
    run(
        world,
        Command::MovePlayer {
            delta: Vec2::new(x, y),
        },
    )
}

fn only_enemy(world: &World) -> EntityId {
    let enemies = query::enemy_view(world).into_vec();
    assert_eq!(enemies.len(), 1);
    enemies[0].id
}

fn damage_events(events: &[Event]) -> Vec<(i32, i32)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyDamaged {
                damage, remaining, ..
            } => Some((*damage, *remaining)),
            _ => None,
        })
        .collect()
}

#[test]
fn melee_swing_damages_enemy_once_per_attack() {
    let mut world = started(&[&["#######", "#SLG..#", "#######"]], Tuning::default());

    let _ = move_by(&mut world, 1.0, 0.0);
    let _ = tick(&mut world, 16);
    assert_eq!(query::player(&world).weapon(), WeaponId::TableLeg);

    let boss = query::enemy_view(&world)
        .get(only_enemy(&world))
        .copied()
        .expect("boss present");
    let distance = boss.position.distance(query::player(&world).pose.position);
    assert!((distance - 1.0).abs() < 1e-5);

    let swing = run(&mut world, Command::FireWeapon);
    assert_eq!(damage_events(&swing), vec![(40, 460)]);

    let mut follow_up = Vec::new();
    for _ in 0..10 {
        follow_up.extend(tick(&mut world, 16));
        follow_up.extend(run(&mut world, Command::FireWeapon));
    }
    assert!(damage_events(&follow_up).is_empty());
    assert_eq!(
        query::enemy_view(&world).get(boss.id).map(|enemy| enemy.health),
        Some(460)
    );
}

#[test]
fn collecting_tables_unlocks_gates_and_opens_the_elevator() {
    let mut world = started(
        &[
            &["########", "#T..SXE#", "########"],
            &["#####", "#S..#", "#####"],
        ],
        Tuning::default(),
    );

    let early = tick(&mut world, 16);
    assert!(!early
        .iter()
        .any(|event| matches!(event, Event::GatesUnlocked { .. })));
    assert_eq!(query::tile_view(&world).tile_at(5, 1), TileKind::LockedGate);

    let _ = move_by(&mut world, -3.0, 0.0);
    let collected = tick(&mut world, 16);
    assert!(collected.contains(&Event::GatesUnlocked { count: 1 }));
    assert_eq!(query::tile_view(&world).tile_at(5, 1), TileKind::Empty);
    assert_eq!(query::player(&world).tables, 1);

    let _ = move_by(&mut world, 3.0, 0.0);
    let _ = move_by(&mut world, 0.5, 0.0);
    let _ = move_by(&mut world, 0.5, 0.0);
    let arrived = tick(&mut world, 16);
    assert_eq!(query::status(&world), SessionStatus::LevelTransition);
    assert!(arrived.contains(&Event::ScreenShown {
        screen: Screen::LevelComplete,
    }));

    let waiting = tick(&mut world, 1_000);
    assert!(waiting.is_empty());

    let next = tick(&mut world, 1_000);
    assert!(next.contains(&Event::LevelLoaded {
        level: 2,
        required_tables: 0,
    }));
    assert_eq!(query::status(&world), SessionStatus::Playing);
    assert_eq!(query::level_number(&world), 2);
}

#[test]
fn elevator_is_ignored_until_tables_are_collected() {
    let mut world = started(
        &[&["#######", "#T..SE#", "#######"], &["###", "#S#", "###"]],
        Tuning::default(),
    );

    for _ in 0..5 {
        let _ = tick(&mut world, 100);
    }

    assert_eq!(query::status(&world), SessionStatus::Playing);
    assert_eq!(query::level_number(&world), 1);
}

#[test]
fn final_elevator_ends_the_run_in_victory() {
    let mut world = started(&[&["####", "#SE#", "####"]], Tuning::default());

    let _ = tick(&mut world, 16);
    assert_eq!(query::status(&world), SessionStatus::LevelTransition);

    let events = tick(&mut world, 2_000);
    assert_eq!(query::status(&world), SessionStatus::Victory);
    assert!(events.contains(&Event::ScreenShown {
        screen: Screen::Victory,
    }));
}

#[test]
fn lethal_projectile_ends_the_run_and_freezes_the_player() {
    let mut tuning = Tuning::default();
    tuning.player.max_health = 3;
    let mut world = started(&[&["#######", "#S..G.#", "#######"]], tuning);
    let boss = only_enemy(&world);

    let _ = run(&mut world, Command::AlertEnemy { enemy: boss });
    let _ = tick(&mut world, 500);
    assert_eq!(
        query::enemy_view(&world).get(boss).map(|enemy| enemy.state),
        Some(EnemyState::Chase)
    );

    let target = query::player(&world).pose.position;
    let _ = run(&mut world, Command::EnemyAttack { enemy: boss, target });
    let events = tick(&mut world, 500);

    assert!(events.contains(&Event::PlayerDamaged {
        damage: 3,
        remaining: 0,
    }));
    assert_eq!(query::status(&world), SessionStatus::GameOver);

    let before = query::player(&world);
    let moved = move_by(&mut world, 0.5, 0.0);
    let later = tick(&mut world, 500);
    assert!(moved.is_empty());
    assert!(later.is_empty());
    assert_eq!(query::player(&world), before);
}

#[test]
fn boss_defeat_rolls_credits_regardless_of_weapon() {
    let mut world = started(&[&["#######", "#S.G..#", "#######"]], Tuning::default());
    let boss = only_enemy(&world);

    let mut killed = false;
    for _ in 0..40 {
        let _ = run(&mut world, Command::FireWeapon);
        let events = tick(&mut world, 250);
        if events.contains(&Event::EnemyKilled {
            enemy: boss,
            boss: true,
        }) {
            killed = true;
            break;
        }
    }

    assert!(killed);
    assert_eq!(query::status(&world), SessionStatus::Credits);
    assert_eq!(
        query::enemy_view(&world).get(boss).map(|enemy| enemy.state),
        Some(EnemyState::Dead)
    );
    assert_eq!(query::scene_entities(&world).len(), 1);

    let _ = tick(&mut world, 9_000);
    assert_eq!(query::status(&world), SessionStatus::Credits);
    let _ = tick(&mut world, 1_000);
    assert_eq!(query::status(&world), SessionStatus::Menu);
}

#[test]
fn table_leg_finishing_blow_on_the_boss_rolls_credits() {
    let mut world = started(&[&["#######", "#SLG..#", "#######"]], Tuning::default());
    let boss = only_enemy(&world);
    let _ = move_by(&mut world, 1.0, 0.0);
    let _ = tick(&mut world, 16);
    assert_eq!(query::player(&world).weapon(), WeaponId::TableLeg);

    let mut swings = 0;
    let mut final_blow = Vec::new();
    while query::status(&world) == SessionStatus::Playing && swings < 20 {
        final_blow = run(&mut world, Command::FireWeapon);
        swings += 1;
        let _ = tick(&mut world, 500);
    }

    assert_eq!(swings, 13);
    assert!(final_blow.contains(&Event::EnemyKilled {
        enemy: boss,
        boss: true,
    }));
    assert!(final_blow.contains(&Event::ScreenShown {
        screen: Screen::Credits,
    }));
    assert_eq!(query::status(&world), SessionStatus::Credits);
    assert_eq!(query::player(&world).ammo, 50);
}

#[test]
fn ranged_weapon_without_aim_keeps_its_ammo() {
    let mut tuning = Tuning::default();
    tuning.weapons.aim_distance = tuning.weapons.muzzle_offset;
    let mut world = started(&[&["#####", "#S..#", "#####"]], tuning);

    let events = run(&mut world, Command::FireWeapon);

    assert!(events.is_empty());
    assert_eq!(query::player(&world).ammo, 50);
    assert!(query::scene_entities(&world).is_empty());
}

#[test]
fn stale_credits_countdown_is_discarded_after_restart() {
    let mut world = started(&[&["######", "#SLG.#", "######"]], Tuning::default());
    let boss = only_enemy(&world);
    let _ = move_by(&mut world, 1.0, 0.0);
    let _ = tick(&mut world, 16);

    for _ in 0..13 {
        let _ = run(&mut world, Command::FireWeapon);
        let _ = tick(&mut world, 500);
    }
    assert_eq!(query::status(&world), SessionStatus::Credits);
    assert_eq!(
        query::enemy_view(&world).get(boss).map(|enemy| enemy.state),
        Some(EnemyState::Dead)
    );

    let _ = run(&mut world, Command::StartGame { level: 0 });
    assert_eq!(query::status(&world), SessionStatus::Playing);
    let _ = tick(&mut world, 10_000);
    assert_eq!(query::status(&world), SessionStatus::Playing);
}

#[test]
fn repeated_hits_during_pain_extend_a_single_recovery() {
    let mut tuning = Tuning::default();
    tuning.timers.pain_recovery = Duration::from_secs(1);
    let mut world = started(&[&["######", "#SLG.#", "######"]], tuning);
    let boss = only_enemy(&world);
    let _ = move_by(&mut world, 1.0, 0.0);
    let _ = tick(&mut world, 16);

    let mut events = run(&mut world, Command::FireWeapon);
    events.extend(tick(&mut world, 600));
    events.extend(run(&mut world, Command::FireWeapon));
    events.extend(tick(&mut world, 600));

    assert_eq!(damage_events(&events).len(), 2);
    assert_eq!(
        query::enemy_view(&world).get(boss).map(|enemy| enemy.state),
        Some(EnemyState::Pain)
    );

    events.extend(tick(&mut world, 500));
    let recoveries = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::EnemyStateChanged {
                    to: EnemyState::Chase,
                    ..
                }
            )
        })
        .count();
    assert_eq!(recoveries, 1);
}

#[test]
fn pause_suspends_the_clock() {
    let mut world = started(&[&["#####", "#S..#", "#####"]], Tuning::default());

    let paused = run(&mut world, Command::TogglePause);
    assert!(paused.contains(&Event::ScreenShown {
        screen: Screen::Paused,
    }));
    assert!(tick(&mut world, 100).is_empty());
    assert!(move_by(&mut world, 0.5, 0.0).is_empty());

    let _ = run(&mut world, Command::TogglePause);
    assert_eq!(query::status(&world), SessionStatus::Playing);
    assert!(tick(&mut world, 100).contains(&Event::TimeAdvanced {
        dt: Duration::from_millis(100),
    }));
}
