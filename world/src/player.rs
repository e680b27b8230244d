use std::time::Duration;

use tablequest_core::{PlayerSnapshot, Pose, Vec2, WeaponId};

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) pose: Pose,
    pub(crate) health: i32,
    pub(crate) ammo: u32,
    pub(crate) tables: u32,
    pub(crate) score: u32,
    pub(crate) inventory: Vec<WeaponId>,
    pub(crate) current_weapon: usize,
    pub(crate) weapon_cooldown: Duration,
    pub(crate) recoil: f32,
    pub(crate) since_last_step: Duration,
    pub(crate) damage_flash: Duration,
}

impl Player {
    pub(crate) fn new(health: i32, ammo: u32, footstep_interval: Duration) -> Self {
        Self {
            pose: Pose::new(Vec2::ZERO, 0.0),
            health,
            ammo,
            tables: 0,
            score: 0,
            inventory: vec![WeaponId::Paintbrush],
            current_weapon: 0,
            weapon_cooldown: Duration::ZERO,
            recoil: 0.0,
            since_last_step: footstep_interval,
            damage_flash: Duration::ZERO,
        }
    }

    pub(crate) fn weapon(&self) -> WeaponId {
        debug_assert!(
            self.current_weapon < self.inventory.len(),
            "selected weapon index {} outside inventory of {}",
            self.current_weapon,
            self.inventory.len()
        );
        self.inventory
            .get(self.current_weapon)
            .copied()
            .unwrap_or(WeaponId::Paintbrush)
    }

    pub(crate) fn owns(&self, weapon: WeaponId) -> bool {
        self.inventory.contains(&weapon)
    }

    pub(crate) fn snapshot(&self, required_tables: u32) -> PlayerSnapshot {
        PlayerSnapshot {
            pose: self.pose,
            health: self.health,
            ammo: self.ammo,
            tables: self.tables,
            required_tables,
            score: self.score,
            inventory: self.inventory.clone(),
            current_weapon: self.current_weapon,
            recoil: self.recoil,
        }
    }
}
