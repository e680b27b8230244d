//! Gameplay tuning shared by the world's rules.

use std::time::Duration;

/// Aggregate of every gameplay tuning table used by the world.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Tuning {
    /// Player vitals and reach distances.
    pub player: PlayerTuning,
    /// Weapon firing geometry and recoil.
    pub weapons: WeaponTuning,
    /// Rewards granted by pickups.
    pub pickups: PickupTuning,
    /// Durations of deferred transitions and effects.
    pub timers: TimerTuning,
    /// Projectile physics.
    pub projectiles: ProjectileTuning,
}

/// Player vitals, clearances and reach distances.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerTuning {
    /// Health cap and the value restored on a new game.
    pub max_health: i32,
    /// Ammunition granted on a new game.
    pub starting_ammo: u32,
    /// Distance the player keeps from walls on each axis.
    pub clearance: f32,
    /// Distance enemies keep from walls on each axis.
    pub enemy_clearance: f32,
    /// Contact radius for pickups and the gate check.
    pub pickup_radius: f32,
    /// Distance ahead of the player inspected when opening doors.
    pub interact_reach: f32,
    /// Distance ahead of the player inspected for the elevator.
    pub elevator_reach: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            starting_ammo: 50,
            clearance: 0.3,
            enemy_clearance: 0.0,
            pickup_radius: 0.5,
            interact_reach: 1.0,
            elevator_reach: 0.5,
        }
    }
}

/// Firing geometry and weapon-view recoil.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponTuning {
    /// Distance ahead of the player where paint projectiles appear.
    pub muzzle_offset: f32,
    /// Distance along the facing of the point projectiles are aimed at.
    pub aim_distance: f32,
    /// Recoil applied after a ranged shot.
    pub ranged_recoil: f32,
    /// Recoil applied after a melee swing.
    pub melee_recoil: f32,
    /// Recoil recovered per second.
    pub recoil_decay: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            muzzle_offset: 0.2,
            aim_distance: 10.0,
            ranged_recoil: 20.0,
            melee_recoil: 30.0,
            recoil_decay: 120.0,
        }
    }
}

/// Rewards granted by each pickup kind.
#[derive(Clone, Debug, PartialEq)]
pub struct PickupTuning {
    /// Ammunition in an ammo bundle.
    pub ammo_bundle: u32,
    /// Health restored by a health kit.
    pub health_kit: i32,
    /// Score granted by a money stack.
    pub money_value: u32,
    /// Score granted by a gold bar.
    pub gold_bar_value: u32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            ammo_bundle: 10,
            health_kit: 25,
            money_value: 100,
            gold_bar_value: 500,
        }
    }
}

/// Durations of countdown-driven transitions and effects.
#[derive(Clone, Debug, PartialEq)]
pub struct TimerTuning {
    /// Time an enemy freezes after spotting the player.
    pub alert_hold: Duration,
    /// Minimum time between idle patrol steps.
    pub patrol_interval: Duration,
    /// Time without sight after which a chasing enemy gives up.
    pub lost_sight_hold: Duration,
    /// Time an enemy flinches after being hit.
    pub pain_recovery: Duration,
    /// Delay between reaching the elevator and the next level.
    pub level_transition: Duration,
    /// Duration of the credits before returning to the menu.
    pub credits: Duration,
    /// Minimum time between footstep cues.
    pub footstep_interval: Duration,
    /// Duration of the screen flash after the player is hit.
    pub damage_flash: Duration,
}

impl Default for TimerTuning {
    fn default() -> Self {
        Self {
            alert_hold: Duration::from_millis(500),
            patrol_interval: Duration::from_secs(1),
            lost_sight_hold: Duration::from_secs(2),
            pain_recovery: Duration::from_millis(200),
            level_transition: Duration::from_secs(2),
            credits: Duration::from_secs(10),
            footstep_interval: Duration::from_millis(400),
            damage_flash: Duration::from_millis(100),
        }
    }
}

/// Projectile motion and hit detection.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileTuning {
    /// Speed in tiles per second.
    pub speed: f32,
    /// Longest distance covered between two collision checks.
    pub max_substep: f32,
    /// Distance at which a projectile strikes its target.
    pub hit_radius: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 9.0,
            max_substep: 0.15,
            hit_radius: 0.3,
        }
    }
}
