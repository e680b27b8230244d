//! Weapon firing, projectile flight and damage resolution.

use std::time::Duration;

use rand::Rng;
use tablequest_core::{
    normalize_angle, EnemyState, EntityId, Event, PaintColor, ProjectileOwner, ProjectilePalette,
    SessionStatus, SoundCue, Vec2, WeaponKind,
};

use crate::{
    entity::{EntityBody, Projectile},
    World,
};

#[derive(Clone, Copy, Debug)]
enum Impact {
    Wall,
    Player,
    Enemy(usize),
}

impl World {
    pub(crate) fn fire_weapon(&mut self, out_events: &mut Vec<Event>) {
        if !self.player.weapon_cooldown.is_zero() {
            return;
        }

        let weapon = self.player.weapon();
        let definition = weapon.definition();
        let pose = self.player.pose;
        let muzzle = pose.ahead(self.tuning.weapons.muzzle_offset);
        let aim = pose.ahead(self.tuning.weapons.aim_distance);
        if let WeaponKind::Ranged { .. } = definition.kind {
            if self.player.ammo < definition.ammo_cost {
                return;
            }
            if (aim - muzzle).normalize_or_zero() == Vec2::ZERO {
                log::warn!("{} has no aim direction; shot skipped", definition.name);
                return;
            }
        }

        self.player.ammo = self.player.ammo.saturating_sub(definition.ammo_cost);
        self.player.weapon_cooldown = definition.cooldown;
        out_events.push(Event::WeaponFired { weapon });
        log::debug!("fired {}", definition.name);

        match definition.kind {
            WeaponKind::Melee { range, arc } => {
                self.player.recoil = self.tuning.weapons.melee_recoil;
                out_events.push(Event::SoundTriggered { cue: SoundCue::Hit });
                if self.melee_sweep(definition.damage, range, arc, out_events) > 0 {
                    out_events.push(Event::SoundTriggered { cue: SoundCue::Hit });
                }
            }
            WeaponKind::Ranged { palette } => {
                self.player.recoil = self.tuning.weapons.ranged_recoil;
                out_events.push(Event::SoundTriggered {
                    cue: SoundCue::Shoot,
                });
                let color = match palette {
                    ProjectilePalette::Rainbow => {
                        PaintColor::from_hue(self.rng.gen_range(0.0..360.0))
                    }
                    ProjectilePalette::Solid(color) => color,
                };
                // The aim was checked before charging, so the spawn always succeeds.
                let _ = self.spawn_projectile(
                    muzzle,
                    aim,
                    ProjectileOwner::Player,
                    definition.damage,
                    color,
                    out_events,
                );
            }
        }
    }

    /// Damages every living enemy within `range` whose bearing lies inside
    /// the arc centred on the player's facing. Returns the number struck.
    fn melee_sweep(
        &mut self,
        damage: i32,
        range: f32,
        arc: f32,
        out_events: &mut Vec<Event>,
    ) -> usize {
        let pose = self.player.pose;
        let struck: Vec<usize> = self
            .entities
            .iter()
            .enumerate()
            .filter_map(|(index, entity)| {
                let _ = entity.living_enemy()?;
                let offset = entity.position - pose.position;
                if offset.length() > range {
                    return None;
                }
                let bearing = normalize_angle(offset.y.atan2(offset.x) - pose.facing);
                (bearing.abs() < arc / 2.0).then_some(index)
            })
            .collect();

        for &index in &struck {
            self.damage_enemy(index, damage, out_events);
        }
        struck.len()
    }

    pub(crate) fn spawn_projectile(
        &mut self,
        origin: Vec2,
        target: Vec2,
        owner: ProjectileOwner,
        damage: i32,
        color: PaintColor,
        out_events: &mut Vec<Event>,
    ) -> Option<EntityId> {
        let direction = (target - origin).normalize_or_zero();
        if direction == Vec2::ZERO {
            return None;
        }

        let projectile = Projectile {
            velocity: direction * self.tuning.projectiles.speed,
            owner,
            damage,
            color,
        };
        let id = self.spawn(origin, EntityBody::Projectile(projectile));
        out_events.push(Event::ProjectileSpawned {
            projectile: id,
            owner,
        });
        Some(id)
    }

    /// Moves projectiles in sub-steps no longer than the configured maximum,
    /// stopping each at the first wall or target it reaches.
    pub(crate) fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let max_substep = self.tuning.projectiles.max_substep.max(f32::EPSILON);
        let hit_radius = self.tuning.projectiles.hit_radius;

        for index in 0..self.entities.len() {
            let Some((mut position, projectile)) = self.entities.get(index).and_then(|entity| {
                match entity.body {
                    EntityBody::Projectile(projectile) if entity.active => {
                        Some((entity.position, projectile))
                    }
                    _ => None,
                }
            }) else {
                continue;
            };

            let travel = projectile.velocity * dt.as_secs_f32();
            let substeps = (travel.length() / max_substep).ceil().max(1.0) as u32;
            let step = travel / substeps as f32;
            let mut impact = None;

            for _ in 0..substeps {
                let next = position + step;
                if self.grid.view().is_blocked_at(next) {
                    impact = Some(Impact::Wall);
                    break;
                }
                match projectile.owner {
                    ProjectileOwner::Enemy => {
                        if self.player.pose.position.distance(next) < hit_radius {
                            impact = Some(Impact::Player);
                            break;
                        }
                    }
                    ProjectileOwner::Player => {
                        let target = self.entities.iter().position(|entity| {
                            entity.living_enemy().is_some()
                                && entity.position.distance(next) < hit_radius
                        });
                        if let Some(target) = target {
                            impact = Some(Impact::Enemy(target));
                            break;
                        }
                    }
                }
                position = next;
            }

            let Some(entity) = self.entities.get_mut(index) else {
                continue;
            };
            entity.position = position;
            let Some(impact) = impact else {
                continue;
            };
            entity.active = false;
            out_events.push(Event::ProjectileExpired {
                projectile: entity.id,
            });

            match impact {
                Impact::Wall => {}
                Impact::Player => self.damage_player(projectile.damage, out_events),
                Impact::Enemy(target) => {
                    out_events.push(Event::SoundTriggered { cue: SoundCue::Hit });
                    self.damage_enemy(target, projectile.damage, out_events);
                }
            }

            if self.status != SessionStatus::Playing {
                return;
            }
        }
    }

    /// Applies damage to the enemy stored at `index`, flinching or killing it.
    pub(crate) fn damage_enemy(&mut self, index: usize, damage: i32, out_events: &mut Vec<Event>) {
        let pain_recovery = self.tuning.timers.pain_recovery;
        let Some(entity) = self.entities.get_mut(index) else {
            return;
        };
        if entity.living_enemy().is_none() {
            return;
        }
        let id = entity.id;
        let Some(enemy) = entity.enemy_mut() else {
            return;
        };

        enemy.health -= damage;
        out_events.push(Event::EnemyDamaged {
            enemy: id,
            damage,
            remaining: enemy.health,
        });

        if enemy.health > 0 {
            enemy.pain_remaining = pain_recovery;
            enemy.enter(id, EnemyState::Pain, out_events);
            return;
        }

        let boss = enemy.is_boss();
        enemy.enter(id, EnemyState::Dead, out_events);
        entity.active = false;
        log::info!("enemy {} defeated (boss: {boss})", id.get());
        out_events.push(Event::SoundTriggered {
            cue: SoundCue::EnemyDeath,
        });
        out_events.push(Event::EnemyKilled { enemy: id, boss });
        if boss {
            self.enter_credits(out_events);
        }
    }

    pub(crate) fn damage_player(&mut self, damage: i32, out_events: &mut Vec<Event>) {
        if self.status != SessionStatus::Playing {
            return;
        }

        self.player.health = (self.player.health - damage).max(0);
        self.player.damage_flash = self.tuning.timers.damage_flash;
        out_events.push(Event::SoundTriggered { cue: SoundCue::Hit });
        out_events.push(Event::PlayerDamaged {
            damage,
            remaining: self.player.health,
        });

        if self.player.health == 0 {
            log::info!("player defeated on level {}", self.level_number());
            self.enter_game_over(out_events);
        }
    }
}
