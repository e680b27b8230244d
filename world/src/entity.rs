use std::time::Duration;

use tablequest_core::{
    EnemySnapshot, EnemyState, EnemyTier, EntityId, EntityVisual, Event, PaintColor, PickupKind,
    ProjectileOwner, SceneEntity, Vec2,
};

/// Object living inside a level.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) position: Vec2,
    pub(crate) active: bool,
    pub(crate) distance: f32,
    pub(crate) body: EntityBody,
}

/// Variant-specific payload of an entity.
#[derive(Clone, Debug)]
pub(crate) enum EntityBody {
    Pickup(PickupKind),
    Enemy(Enemy),
    Projectile(Projectile),
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) tier: EnemyTier,
    pub(crate) state: EnemyState,
    pub(crate) health: i32,
    pub(crate) alert_remaining: Duration,
    pub(crate) pain_remaining: Duration,
    pub(crate) lost_sight: Duration,
    pub(crate) patrol_elapsed: Duration,
    pub(crate) attack_cooldown: Duration,
}

impl Enemy {
    pub(crate) fn new(tier: EnemyTier) -> Self {
        Self {
            tier,
            state: EnemyState::Idle,
            health: tier.stats().max_health,
            alert_remaining: Duration::ZERO,
            pain_remaining: Duration::ZERO,
            lost_sight: Duration::ZERO,
            patrol_elapsed: Duration::ZERO,
            attack_cooldown: Duration::ZERO,
        }
    }

    pub(crate) fn is_boss(&self) -> bool {
        self.tier == EnemyTier::Boss
    }

    /// Moves the state machine to `to`, reporting the change.
    pub(crate) fn enter(&mut self, id: EntityId, to: EnemyState, out_events: &mut Vec<Event>) {
        if self.state == to {
            return;
        }
        if to == EnemyState::Chase {
            self.lost_sight = Duration::ZERO;
        }
        out_events.push(Event::EnemyStateChanged {
            enemy: id,
            from: self.state,
            to,
        });
        self.state = to;
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) velocity: Vec2,
    pub(crate) owner: ProjectileOwner,
    pub(crate) damage: i32,
    pub(crate) color: PaintColor,
}

impl Entity {
    pub(crate) fn new(id: EntityId, position: Vec2, body: EntityBody) -> Self {
        Self {
            id,
            position,
            active: true,
            distance: 0.0,
            body,
        }
    }

    pub(crate) fn enemy(&self) -> Option<&Enemy> {
        match &self.body {
            EntityBody::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub(crate) fn enemy_mut(&mut self) -> Option<&mut Enemy> {
        match &mut self.body {
            EntityBody::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Living enemies are the only valid damage targets.
    pub(crate) fn living_enemy(&self) -> Option<&Enemy> {
        self.enemy()
            .filter(|enemy| self.active && enemy.state != EnemyState::Dead)
    }

    /// Dead enemies stay visible after being deactivated.
    pub(crate) fn is_visible(&self) -> bool {
        self.active
            || self
                .enemy()
                .is_some_and(|enemy| enemy.state == EnemyState::Dead)
    }

    pub(crate) fn snapshot(&self, patrol_interval: Duration) -> Option<EnemySnapshot> {
        let enemy = self.enemy()?;
        Some(EnemySnapshot {
            id: self.id,
            position: self.position,
            tier: enemy.tier,
            state: enemy.state,
            health: enemy.health,
            patrol_ready: enemy.patrol_elapsed >= patrol_interval,
            attack_ready: enemy.attack_cooldown.is_zero(),
        })
    }

    pub(crate) fn scene_entity(&self) -> SceneEntity {
        let visual = match &self.body {
            EntityBody::Pickup(kind) => EntityVisual::Pickup(*kind),
            EntityBody::Enemy(enemy) => EntityVisual::Enemy {
                tier: enemy.tier,
                state: enemy.state,
            },
            EntityBody::Projectile(projectile) => EntityVisual::Projectile {
                owner: projectile.owner,
                color: projectile.color,
            },
        };
        SceneEntity {
            id: self.id,
            position: self.position,
            visual,
        }
    }
}
