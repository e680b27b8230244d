#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Table Quest.
//!
//! The [`World`] owns the tile grid, every entity of the loaded level and the
//! player. It is mutated exclusively through [`apply`] and observed through
//! the functions in [`query`].

mod collision;
mod combat;
mod entity;
mod grid;
mod level;
mod player;
mod session;
mod tuning;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tablequest_core::{
    normalize_angle, tile_of, Command, EnemyState, EntityId, Event, PickupKind, ProjectileOwner,
    SessionStatus, SoundCue, TileKind, Vec2, ENEMY_PROJECTILE_COLOR, ENEMY_PROJECTILE_DAMAGE,
};

pub use collision::{attempt_move, line_of_sight};
pub use level::{LevelError, LevelLayout, LevelPack, Spawn};
pub use tuning::{PickupTuning, PlayerTuning, ProjectileTuning, TimerTuning, Tuning, WeaponTuning};

use entity::{Entity, EntityBody};
use grid::TileGrid;
use player::Player;
use session::PendingTransition;

/// Represents the authoritative Table Quest session.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    levels: LevelPack,
    level_index: usize,
    grid: TileGrid,
    entities: Vec<Entity>,
    next_entity_id: u32,
    player: Player,
    required_tables: u32,
    status: SessionStatus,
    pending: Option<PendingTransition>,
    last_dt: Duration,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a session over the provided levels using default tuning.
    ///
    /// The session starts in [`SessionStatus::Menu`] with no level loaded.
    #[must_use]
    pub fn new(levels: LevelPack, seed: u64) -> Self {
        Self::with_tuning(levels, Tuning::default(), seed)
    }

    /// Creates a session over the provided levels using custom tuning.
    #[must_use]
    pub fn with_tuning(levels: LevelPack, tuning: Tuning, seed: u64) -> Self {
        let player = Player::new(
            tuning.player.max_health,
            tuning.player.starting_ammo,
            tuning.timers.footstep_interval,
        );
        Self {
            tuning,
            levels,
            level_index: 0,
            grid: TileGrid::default(),
            entities: Vec::new(),
            next_entity_id: 0,
            player,
            required_tables: 0,
            status: SessionStatus::Menu,
            pending: None,
            last_dt: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn level_number(&self) -> u32 {
        u32::try_from(self.level_index + 1).unwrap_or(u32::MAX)
    }

    fn spawn(&mut self, position: Vec2, body: EntityBody) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.saturating_add(1);
        self.entities.push(Entity::new(id, position, body));
        id
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.last_dt = dt;
        self.advance_pending(dt, out_events);
        if self.status != SessionStatus::Playing {
            return;
        }

        out_events.push(Event::TimeAdvanced { dt });
        self.advance_player_timers(dt);
        self.advance_enemy_timers(dt, out_events);
        self.advance_projectiles(dt, out_events);
        if self.status != SessionStatus::Playing {
            return;
        }
        self.resolve_contacts(out_events);
        self.check_elevator(out_events);
    }

    fn advance_player_timers(&mut self, dt: Duration) {
        let player = &mut self.player;
        player.weapon_cooldown = player.weapon_cooldown.saturating_sub(dt);
        player.damage_flash = player.damage_flash.saturating_sub(dt);
        player.since_last_step = player.since_last_step.saturating_add(dt);
        player.recoil =
            (player.recoil - self.tuning.weapons.recoil_decay * dt.as_secs_f32()).max(0.0);
    }

    fn advance_enemy_timers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for entity in &mut self.entities {
            let id = entity.id;
            let Some(enemy) = entity.enemy_mut() else {
                continue;
            };
            enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(dt);
            match enemy.state {
                EnemyState::Idle => {
                    enemy.patrol_elapsed = enemy.patrol_elapsed.saturating_add(dt);
                }
                EnemyState::Alert => {
                    enemy.alert_remaining = enemy.alert_remaining.saturating_sub(dt);
                    if enemy.alert_remaining.is_zero() {
                        enemy.enter(id, EnemyState::Chase, out_events);
                    }
                }
                EnemyState::Pain => {
                    enemy.pain_remaining = enemy.pain_remaining.saturating_sub(dt);
                    if enemy.pain_remaining.is_zero() {
                        enemy.enter(id, EnemyState::Chase, out_events);
                    }
                }
                EnemyState::Chase | EnemyState::Dead => {}
            }
        }
    }

    /// Consumes pickups in contact with the player and runs the gate check
    /// whenever anything visible is within reach.
    fn resolve_contacts(&mut self, out_events: &mut Vec<Event>) {
        let position = self.player.pose.position;
        let radius = self.tuning.player.pickup_radius;
        let mut in_contact = false;
        let mut candidates = Vec::new();

        for entity in &mut self.entities {
            entity.distance = entity.position.distance(position);
            if !entity.is_visible() || entity.distance >= radius {
                continue;
            }
            in_contact = true;
            if let EntityBody::Pickup(kind) = entity.body {
                if entity.active {
                    candidates.push((entity.id, kind));
                }
            }
        }

        for (id, kind) in candidates {
            if !self.collect(kind, out_events) {
                continue;
            }
            if let Some(entity) = self.entities.iter_mut().find(|entity| entity.id == id) {
                entity.active = false;
            }
            out_events.push(Event::PickupCollected { entity: id, kind });
        }

        if in_contact {
            self.unlock_gates(out_events);
        }
    }

    fn collect(&mut self, kind: PickupKind, out_events: &mut Vec<Event>) -> bool {
        let rewards = &self.tuning.pickups;
        let player = &mut self.player;
        let cue = match kind {
            PickupKind::Table => {
                player.tables += 1;
                SoundCue::Collect
            }
            PickupKind::Ammo => {
                player.ammo = player.ammo.saturating_add(rewards.ammo_bundle);
                SoundCue::Collect
            }
            PickupKind::Health => {
                let max_health = self.tuning.player.max_health;
                if player.health >= max_health {
                    return false;
                }
                player.health = (player.health + rewards.health_kit).min(max_health);
                SoundCue::Collect
            }
            PickupKind::Money => {
                player.score = player.score.saturating_add(rewards.money_value);
                SoundCue::Money
            }
            PickupKind::GoldBar => {
                player.score = player.score.saturating_add(rewards.gold_bar_value);
                SoundCue::Money
            }
            PickupKind::Weapon(weapon) => {
                if player.owns(weapon) {
                    return false;
                }
                player.inventory.push(weapon);
                player.current_weapon = player.inventory.len() - 1;
                out_events.push(Event::WeaponUnlocked { weapon });
                SoundCue::Collect
            }
        };
        out_events.push(Event::SoundTriggered { cue });
        true
    }

    fn move_player(&mut self, delta: Vec2, out_events: &mut Vec<Event>) {
        let from = self.player.pose.position;
        let to = attempt_move(self.grid.view(), from, delta, self.tuning.player.clearance);

        if delta != Vec2::ZERO
            && self.player.since_last_step >= self.tuning.timers.footstep_interval
        {
            self.player.since_last_step = Duration::ZERO;
            out_events.push(Event::SoundTriggered {
                cue: SoundCue::Step,
            });
        }

        if to != from {
            self.player.pose.position = to;
            out_events.push(Event::PlayerMoved { from, to });
        }
    }

    fn open_door(&mut self, out_events: &mut Vec<Event>) {
        let ahead = self.player.pose.ahead(self.tuning.player.interact_reach);
        let (column, row) = tile_of(ahead);
        if self.grid.tile_at(column, row) != TileKind::Door {
            return;
        }
        if self.grid.set_tile(column, row, TileKind::Empty) {
            out_events.push(Event::DoorOpened { column, row });
            out_events.push(Event::SoundTriggered {
                cue: SoundCue::DoorOpen,
            });
        }
    }

    fn switch_weapon(&mut self, slot: usize, out_events: &mut Vec<Event>) {
        let Some(index) = slot.checked_sub(1) else {
            return;
        };
        let Some(&weapon) = self.player.inventory.get(index) else {
            return;
        };
        self.player.current_weapon = index;
        out_events.push(Event::WeaponSwitched { weapon });
        out_events.push(Event::SoundTriggered {
            cue: SoundCue::Collect,
        });
    }

    fn alert_enemy(&mut self, id: EntityId, out_events: &mut Vec<Event>) {
        let alert_hold = self.tuning.timers.alert_hold;
        let Some(enemy) = living_enemy_mut(&mut self.entities, id).and_then(Entity::enemy_mut)
        else {
            return;
        };
        if enemy.state != EnemyState::Idle {
            return;
        }
        enemy.alert_remaining = alert_hold;
        enemy.enter(id, EnemyState::Alert, out_events);
        let cue = if enemy.is_boss() {
            SoundCue::BossRoar
        } else {
            SoundCue::Alert
        };
        out_events.push(Event::SoundTriggered { cue });
    }

    fn patrol_enemy(&mut self, id: EntityId, offset: Vec2) {
        let patrol_interval = self.tuning.timers.patrol_interval;
        let tiles = self.grid.view();
        let Some(entity) = living_enemy_mut(&mut self.entities, id) else {
            return;
        };
        let destination = entity.position + offset;
        let Some(enemy) = entity.enemy_mut() else {
            return;
        };
        if enemy.state != EnemyState::Idle || enemy.patrol_elapsed < patrol_interval {
            return;
        }
        enemy.patrol_elapsed = Duration::ZERO;
        if !tiles.is_blocked_at(destination) {
            entity.position = destination;
        }
    }

    fn step_enemy(&mut self, id: EntityId, delta: Vec2) {
        let clearance = self.tuning.player.enemy_clearance;
        let tiles = self.grid.view();
        let Some(entity) = living_enemy_mut(&mut self.entities, id) else {
            return;
        };
        if entity.enemy().map(|enemy| enemy.state) != Some(EnemyState::Chase) {
            return;
        }
        entity.position = attempt_move(tiles, entity.position, delta, clearance);
    }

    fn report_enemy_sight(&mut self, id: EntityId, visible: bool, out_events: &mut Vec<Event>) {
        let lost_sight_hold = self.tuning.timers.lost_sight_hold;
        let dt = self.last_dt;
        let Some(enemy) = living_enemy_mut(&mut self.entities, id).and_then(Entity::enemy_mut)
        else {
            return;
        };
        if enemy.state != EnemyState::Chase {
            return;
        }
        if visible {
            enemy.lost_sight = Duration::ZERO;
            return;
        }
        enemy.lost_sight = enemy.lost_sight.saturating_add(dt);
        if enemy.lost_sight > lost_sight_hold {
            enemy.enter(id, EnemyState::Idle, out_events);
            enemy.lost_sight = Duration::ZERO;
        }
    }

    fn enemy_attack(&mut self, id: EntityId, target: Vec2, out_events: &mut Vec<Event>) {
        let Some(entity) = living_enemy_mut(&mut self.entities, id) else {
            return;
        };
        let origin = entity.position;
        let Some(enemy) = entity.enemy_mut() else {
            return;
        };
        if enemy.state != EnemyState::Chase || !enemy.attack_cooldown.is_zero() {
            return;
        }
        enemy.attack_cooldown = enemy.tier.stats().attack_cooldown;

        if self
            .spawn_projectile(
                origin,
                target,
                ProjectileOwner::Enemy,
                ENEMY_PROJECTILE_DAMAGE,
                ENEMY_PROJECTILE_COLOR,
                out_events,
            )
            .is_some()
        {
            out_events.push(Event::SoundTriggered {
                cue: SoundCue::Shoot,
            });
        }
    }
}

fn living_enemy_mut(entities: &mut [Entity], id: EntityId) -> Option<&mut Entity> {
    entities
        .iter_mut()
        .find(|entity| entity.id == id && entity.living_enemy().is_some())
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Player and enemy commands are ignored unless the session is playing.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame { level } => world.start_game(level, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::TogglePause => world.toggle_pause(out_events),
        command if world.status != SessionStatus::Playing => {
            log::trace!("ignoring {command:?} while {:?}", world.status);
        }
        Command::RotatePlayer { radians } => {
            let pose = &mut world.player.pose;
            pose.facing = normalize_angle(pose.facing + radians);
        }
        Command::MovePlayer { delta } => world.move_player(delta, out_events),
        Command::OpenDoor => world.open_door(out_events),
        Command::FireWeapon => world.fire_weapon(out_events),
        Command::SwitchWeapon { slot } => world.switch_weapon(slot, out_events),
        Command::AlertEnemy { enemy } => world.alert_enemy(enemy, out_events),
        Command::PatrolEnemy { enemy, offset } => world.patrol_enemy(enemy, offset),
        Command::StepEnemy { enemy, delta } => world.step_enemy(enemy, delta),
        Command::ReportEnemySight { enemy, visible } => {
            world.report_enemy_sight(enemy, visible, out_events);
        }
        Command::EnemyAttack { enemy, target } => world.enemy_attack(enemy, target, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tablequest_core::{
        EnemyView, PlayerSnapshot, SceneEntity, SessionStatus, TileKind, TileView, Vec2,
    };

    use super::{collision, Tuning, World};

    /// Current session status.
    #[must_use]
    pub fn status(world: &World) -> SessionStatus {
        world.status
    }

    /// One-based number of the loaded level.
    #[must_use]
    pub fn level_number(world: &World) -> u32 {
        world.level_number()
    }

    /// Read-only view of the level's tiles.
    #[must_use]
    pub fn tile_view(world: &World) -> TileView<'_> {
        world.grid.view()
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot(world.required_tables)
    }

    /// Captures every enemy of the level, dead ones included.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let patrol_interval = world.tuning.timers.patrol_interval;
        EnemyView::from_snapshots(
            world
                .entities
                .iter()
                .filter_map(|entity| entity.snapshot(patrol_interval))
                .collect(),
        )
    }

    /// Entities that should be drawn: active ones plus dead enemies.
    #[must_use]
    pub fn scene_entities(world: &World) -> Vec<SceneEntity> {
        world
            .entities
            .iter()
            .filter(|entity| entity.is_visible())
            .map(|entity| entity.scene_entity())
            .collect()
    }

    /// Reports whether the segment between two points is free of walls.
    #[must_use]
    pub fn has_line_of_sight(world: &World, from: Vec2, to: Vec2) -> bool {
        collision::line_of_sight(world.grid.view(), from, to)
    }

    /// Opacity of the damage flash overlay, fading from 0.5 to 0.
    #[must_use]
    pub fn damage_flash(world: &World) -> f32 {
        let total = world.tuning.timers.damage_flash.as_secs_f32();
        if total <= 0.0 {
            return 0.0;
        }
        0.5 * (world.player.damage_flash.as_secs_f32() / total).min(1.0)
    }

    /// Reports whether a closed door lies within reach ahead of the player.
    #[must_use]
    pub fn door_ahead(world: &World) -> bool {
        let ahead = world.player.pose.ahead(world.tuning.player.interact_reach);
        world.grid.view().tile_at_point(ahead) == TileKind::Door
    }

    /// Gameplay tuning used by the session.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }
}
