//! Session lifecycle: level loading, status changes and deferred transitions.

use std::time::Duration;

use tablequest_core::{EnemyTier, Event, PickupKind, Screen, SessionStatus, SoundCue, TileKind};

use rand::Rng;

use crate::{
    entity::{Enemy, EntityBody},
    grid::TileGrid,
    level::Spawn,
    player::Player,
    World,
};

/// Work scheduled to run once a countdown elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransitionAction {
    LoadLevel(usize),
    ReturnToMenu,
}

/// Countdown armed while the session sits in a given status.
///
/// The action only runs if the session is still in `armed_in` when the
/// countdown elapses; otherwise the transition is discarded.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PendingTransition {
    pub(crate) armed_in: SessionStatus,
    pub(crate) remaining: Duration,
    pub(crate) action: TransitionAction,
}

impl World {
    pub(crate) fn set_status(&mut self, status: SessionStatus, out_events: &mut Vec<Event>) {
        if self.status == status {
            return;
        }
        log::info!("session status {:?} -> {:?}", self.status, status);
        self.status = status;
        out_events.push(Event::SessionStatusChanged { status });
    }

    pub(crate) fn start_game(&mut self, level: usize, out_events: &mut Vec<Event>) {
        if level >= self.levels.len() {
            log::warn!(
                "ignoring start request for level {} of {}",
                level + 1,
                self.levels.len()
            );
            return;
        }

        self.pending = None;
        let player = &self.tuning.player;
        self.player = Player::new(
            player.max_health,
            player.starting_ammo,
            self.tuning.timers.footstep_interval,
        );
        if self.load_level(level, out_events) {
            out_events.push(Event::ScreensHidden);
            self.set_status(SessionStatus::Playing, out_events);
        }
    }

    pub(crate) fn toggle_pause(&mut self, out_events: &mut Vec<Event>) {
        match self.status {
            SessionStatus::Playing => {
                self.set_status(SessionStatus::Paused, out_events);
                out_events.push(Event::ScreenShown {
                    screen: Screen::Paused,
                });
            }
            SessionStatus::Paused => {
                out_events.push(Event::ScreensHidden);
                self.set_status(SessionStatus::Playing, out_events);
            }
            _ => {}
        }
    }

    /// Replaces the grid and entities with the level at `index`.
    ///
    /// Running past the final level ends the run in victory and returns
    /// `false`.
    pub(crate) fn load_level(&mut self, index: usize, out_events: &mut Vec<Event>) -> bool {
        let Some(layout) = self.levels.get(index).cloned() else {
            self.pending = None;
            self.set_status(SessionStatus::Victory, out_events);
            out_events.push(Event::ScreenShown {
                screen: Screen::Victory,
            });
            return false;
        };

        self.level_index = index;
        self.grid = TileGrid::new(layout.columns(), layout.rows(), layout.tiles().to_vec());
        self.entities.clear();
        self.next_entity_id = 0;
        for &(spawn, position) in layout.spawns() {
            let body = match spawn {
                Spawn::Table => EntityBody::Pickup(PickupKind::Table),
                Spawn::Ammo => EntityBody::Pickup(PickupKind::Ammo),
                Spawn::Health => EntityBody::Pickup(PickupKind::Health),
                Spawn::Money => EntityBody::Pickup(PickupKind::Money),
                Spawn::GoldBar => EntityBody::Pickup(PickupKind::GoldBar),
                Spawn::Weapon(weapon) => EntityBody::Pickup(PickupKind::Weapon(weapon)),
                Spawn::Boss => EntityBody::Enemy(Enemy::new(EnemyTier::Boss)),
                Spawn::Enemy => {
                    let roll = self.rng.gen_range(0..EnemyTier::REGULAR.len());
                    EntityBody::Enemy(Enemy::new(EnemyTier::REGULAR[roll]))
                }
            };
            let _ = self.spawn(position, body);
        }

        self.required_tables = layout.required_tables();
        self.player.tables = 0;
        self.player.pose = layout.player_start();
        self.player.weapon_cooldown = Duration::ZERO;
        self.player.recoil = 0.0;
        self.player.damage_flash = Duration::ZERO;

        let level = self.level_number();
        log::info!(
            "loaded level {} `{}` ({}x{}, {} entities, {} tables required)",
            level,
            layout.name(),
            layout.columns(),
            layout.rows(),
            self.entities.len(),
            self.required_tables
        );
        out_events.push(Event::LevelLoaded {
            level,
            required_tables: self.required_tables,
        });
        out_events.push(Event::MusicRequested { level });
        true
    }

    pub(crate) fn advance_pending(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(mut pending) = self.pending.take() else {
            return;
        };
        if pending.armed_in != self.status {
            log::debug!(
                "discarding {:?} armed in {:?}; session is {:?}",
                pending.action,
                pending.armed_in,
                self.status
            );
            return;
        }

        pending.remaining = pending.remaining.saturating_sub(dt);
        if !pending.remaining.is_zero() {
            self.pending = Some(pending);
            return;
        }

        match pending.action {
            TransitionAction::LoadLevel(index) => {
                if self.load_level(index, out_events) {
                    out_events.push(Event::ScreensHidden);
                    self.set_status(SessionStatus::Playing, out_events);
                }
            }
            TransitionAction::ReturnToMenu => {
                out_events.push(Event::ScreensHidden);
                self.set_status(SessionStatus::Menu, out_events);
            }
        }
    }

    pub(crate) fn unlock_gates(&mut self, out_events: &mut Vec<Event>) {
        if self.player.tables < self.required_tables {
            return;
        }
        let count = self.grid.clear_all(TileKind::LockedGate);
        if count > 0 {
            log::info!("unlocked {count} gate tiles");
            out_events.push(Event::GatesUnlocked { count });
            out_events.push(Event::SoundTriggered {
                cue: SoundCue::Elevator,
            });
        }
    }

    pub(crate) fn check_elevator(&mut self, out_events: &mut Vec<Event>) {
        if self.player.tables < self.required_tables {
            return;
        }
        let ahead = self
            .player
            .pose
            .ahead(self.tuning.player.elevator_reach);
        if self.grid.view().tile_at_point(ahead) != TileKind::Elevator {
            return;
        }

        out_events.push(Event::SoundTriggered {
            cue: SoundCue::Elevator,
        });
        self.set_status(SessionStatus::LevelTransition, out_events);
        out_events.push(Event::ScreenShown {
            screen: Screen::LevelComplete,
        });
        self.pending = Some(PendingTransition {
            armed_in: SessionStatus::LevelTransition,
            remaining: self.tuning.timers.level_transition,
            action: TransitionAction::LoadLevel(self.level_index + 1),
        });
    }

    pub(crate) fn enter_game_over(&mut self, out_events: &mut Vec<Event>) {
        self.pending = None;
        self.set_status(SessionStatus::GameOver, out_events);
        out_events.push(Event::ScreenShown {
            screen: Screen::GameOver,
        });
    }

    pub(crate) fn enter_credits(&mut self, out_events: &mut Vec<Event>) {
        self.set_status(SessionStatus::Credits, out_events);
        out_events.push(Event::ScreenShown {
            screen: Screen::Credits,
        });
        out_events.push(Event::SoundTriggered {
            cue: SoundCue::Fanfare,
        });
        self.pending = Some(PendingTransition {
            armed_in: SessionStatus::Credits,
            remaining: self.tuning.timers.credits,
            action: TransitionAction::ReturnToMenu,
        });
    }
}
