#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system deciding enemy behaviour from world snapshots.
//!
//! The world owns every enemy timer; this system only inspects snapshots on
//! each simulation tick and proposes alert, patrol, chase, sight and attack
//! commands for the world to validate.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tablequest_core::{Command, EnemySnapshot, EnemyState, EnemyView, Event, Vec2};

/// Configuration parameters required to construct the enemy AI system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    chase_stop_distance: f32,
    patrol_step: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration.
    ///
    /// Chasing enemies stop advancing within `chase_stop_distance` tiles of
    /// the player; idle patrol steps move at most `patrol_step` tiles per axis.
    #[must_use]
    pub const fn new(chase_stop_distance: f32, patrol_step: f32, rng_seed: u64) -> Self {
        Self {
            chase_stop_distance,
            patrol_step,
            rng_seed,
        }
    }

    /// Returns a copy of the configuration seeding patrol offsets with `seed`.
    #[must_use]
    pub const fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(1.5, 0.15, 0x7ab1_e0e5_d00d_f00d)
    }
}

/// Enemy AI system.
#[derive(Debug)]
pub struct EnemyAi {
    config: Config,
    rng: ChaCha8Rng,
}

impl EnemyAi {
    /// Creates a new enemy AI system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and snapshots to emit enemy commands.
    ///
    /// Nothing is emitted unless the events contain a `TimeAdvanced` entry;
    /// the latest such entry provides the frame duration used for movement.
    /// `has_line_of_sight` is called with the player position first.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        player: Vec2,
        enemies: &EnemyView,
        has_line_of_sight: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(Vec2, Vec2) -> bool,
    {
        let Some(dt) = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { dt } => Some(*dt),
            _ => None,
        }) else {
            return;
        };

        for enemy in enemies.iter() {
            match enemy.state {
                EnemyState::Idle => self.idle(enemy, player, &has_line_of_sight, out),
                EnemyState::Chase => self.chase(enemy, player, dt, &has_line_of_sight, out),
                EnemyState::Alert | EnemyState::Pain | EnemyState::Dead => {}
            }
        }
    }

    fn idle<F>(&mut self, enemy: &EnemySnapshot, player: Vec2, sight: &F, out: &mut Vec<Command>)
    where
        F: Fn(Vec2, Vec2) -> bool,
    {
        if enemy.patrol_ready {
            let step = self.config.patrol_step;
            let offset = Vec2::new(
                self.rng.gen_range(-step..=step),
                self.rng.gen_range(-step..=step),
            );
            out.push(Command::PatrolEnemy {
                enemy: enemy.id,
                offset,
            });
        }

        let distance = player.distance(enemy.position);
        if distance < enemy.tier.stats().detect_range && sight(player, enemy.position) {
            out.push(Command::AlertEnemy { enemy: enemy.id });
        }
    }

    fn chase<F>(
        &self,
        enemy: &EnemySnapshot,
        player: Vec2,
        dt: Duration,
        sight: &F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(Vec2, Vec2) -> bool,
    {
        let stats = enemy.tier.stats();
        let offset = player - enemy.position;
        let distance = offset.length();
        let visible = sight(player, enemy.position);

        if distance > self.config.chase_stop_distance {
            out.push(Command::StepEnemy {
                enemy: enemy.id,
                delta: offset / distance * stats.move_speed * dt.as_secs_f32(),
            });
        }

        out.push(Command::ReportEnemySight {
            enemy: enemy.id,
            visible,
        });

        if visible && distance < stats.attack_range && enemy.attack_ready {
            out.push(Command::EnemyAttack {
                enemy: enemy.id,
                target: player,
            });
        }
    }
}

impl Default for EnemyAi {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
