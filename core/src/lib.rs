#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Table Quest engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! adapters to react to. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{
    f32::consts::{FRAC_PI_2, PI, TAU},
    time::Duration,
};

pub use glam::Vec2;

/// Title shown by adapters when the experience boots.
pub const GAME_TITLE: &str = "Sandy's Table Quest";

/// Damage dealt by a projectile fired by an enemy.
pub const ENEMY_PROJECTILE_DAMAGE: i32 = 3;

/// Colour of projectiles fired by enemies.
pub const ENEMY_PROJECTILE_COLOR: PaintColor = PaintColor::from_rgb(0xff, 0x44, 0x00);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the player and loads the requested level, entering play.
    StartGame {
        /// Zero-based index of the level to load.
        level: usize,
    },
    /// Advances the simulation clock by the provided wall-clock delta.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Rotates the player's facing by the provided angle.
    RotatePlayer {
        /// Signed rotation in radians; positive turns clockwise on screen.
        radians: f32,
    },
    /// Requests that the player translate by the provided world-space delta.
    MovePlayer {
        /// Desired displacement in tile units before collision resolution.
        delta: Vec2,
    },
    /// Attempts to open the door directly in front of the player.
    OpenDoor,
    /// Fires the currently equipped weapon.
    FireWeapon,
    /// Selects the weapon stored in the provided one-based inventory slot.
    SwitchWeapon {
        /// One-based inventory slot.
        slot: usize,
    },
    /// Toggles between playing and paused.
    TogglePause,
    /// Requests that an idle enemy become alerted to the player.
    AlertEnemy {
        /// Identifier of the enemy that spotted the player.
        enemy: EntityId,
    },
    /// Requests a small collision-checked patrol step for an idle enemy.
    PatrolEnemy {
        /// Identifier of the patrolling enemy.
        enemy: EntityId,
        /// Displacement applied when the destination is open.
        offset: Vec2,
    },
    /// Requests that a chasing enemy move toward the player.
    StepEnemy {
        /// Identifier of the chasing enemy.
        enemy: EntityId,
        /// Displacement before collision resolution.
        delta: Vec2,
    },
    /// Reports whether a chasing enemy currently sees the player.
    ReportEnemySight {
        /// Identifier of the chasing enemy.
        enemy: EntityId,
        /// Whether the line of sight between enemy and player is clear.
        visible: bool,
    },
    /// Requests that an enemy fire a projectile toward a target position.
    EnemyAttack {
        /// Identifier of the attacking enemy.
        enemy: EntityId,
        /// World-space point the projectile is aimed at.
        target: Vec2,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a level finished loading.
    LevelLoaded {
        /// One-based level number.
        level: u32,
        /// Number of tables that must be collected to unlock the exit.
        required_tables: u32,
    },
    /// Announces that the session entered a new status.
    SessionStatusChanged {
        /// Status that became active.
        status: SessionStatus,
    },
    /// Requests that adapters show a named overlay screen.
    ScreenShown {
        /// Overlay to display.
        screen: Screen,
    },
    /// Requests that adapters hide every overlay screen.
    ScreensHidden,
    /// Requests that a sound effect be played.
    SoundTriggered {
        /// Cue identifying the sound effect.
        cue: SoundCue,
    },
    /// Requests that the music for a level starts.
    MusicRequested {
        /// One-based level number.
        level: u32,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: Vec2,
        /// Position after collision resolution.
        to: Vec2,
    },
    /// Reports that the player took damage.
    PlayerDamaged {
        /// Damage applied.
        damage: i32,
        /// Health remaining after the hit.
        remaining: i32,
    },
    /// Confirms that a pickup was consumed by the player.
    PickupCollected {
        /// Identifier of the consumed pickup.
        entity: EntityId,
        /// Kind of pickup that was consumed.
        kind: PickupKind,
    },
    /// Confirms that a door tile was opened.
    DoorOpened {
        /// Column of the opened door.
        column: i32,
        /// Row of the opened door.
        row: i32,
    },
    /// Confirms that every locked gate in the level was cleared.
    GatesUnlocked {
        /// Number of gate tiles removed.
        count: usize,
    },
    /// Confirms that the player fired a weapon.
    WeaponFired {
        /// Weapon that was fired.
        weapon: WeaponId,
    },
    /// Confirms that the player selected a different weapon.
    WeaponSwitched {
        /// Weapon that became active.
        weapon: WeaponId,
    },
    /// Confirms that a weapon was added to the inventory.
    WeaponUnlocked {
        /// Weapon that was unlocked.
        weapon: WeaponId,
    },
    /// Confirms that a projectile entered the world.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        projectile: EntityId,
        /// Side that fired the projectile.
        owner: ProjectileOwner,
    },
    /// Confirms that a projectile left the world after hitting something.
    ProjectileExpired {
        /// Identifier of the expired projectile.
        projectile: EntityId,
    },
    /// Confirms that an enemy changed state.
    EnemyStateChanged {
        /// Identifier of the enemy.
        enemy: EntityId,
        /// State before the transition.
        from: EnemyState,
        /// State after the transition.
        to: EnemyState,
    },
    /// Reports that an enemy took damage.
    EnemyDamaged {
        /// Identifier of the enemy.
        enemy: EntityId,
        /// Damage applied.
        damage: i32,
        /// Health remaining after the hit.
        remaining: i32,
    },
    /// Reports that an enemy died.
    EnemyKilled {
        /// Identifier of the enemy.
        enemy: EntityId,
        /// Whether the enemy was the level boss.
        boss: bool,
    },
}

/// Lifecycle of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// No game is running; waiting for a start request.
    Menu,
    /// The player is in control and the simulation advances.
    Playing,
    /// The simulation is suspended by the player.
    Paused,
    /// The player reached the elevator; the next level loads shortly.
    LevelTransition,
    /// The player died.
    GameOver,
    /// The boss was defeated and the credits roll.
    Credits,
    /// The player cleared the final level.
    Victory,
}

/// Overlay screens the core asks adapters to present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Shown while the elevator carries the player to the next level.
    LevelComplete,
    /// Shown after the player dies.
    GameOver,
    /// Shown after the boss is defeated.
    Credits,
    /// Shown after the final level is cleared.
    Victory,
    /// Shown while the session is paused.
    Paused,
}

/// Named sound effects triggered by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A weapon or enemy fired a projectile.
    Shoot,
    /// Something was struck, or a melee weapon was swung.
    Hit,
    /// A pickup was consumed or a weapon was switched.
    Collect,
    /// A score pickup was consumed.
    Money,
    /// An enemy died.
    EnemyDeath,
    /// A regular enemy spotted the player.
    Alert,
    /// The boss spotted the player.
    BossRoar,
    /// A door opened.
    DoorOpen,
    /// Gates unlocked or the elevator departed.
    Elevator,
    /// The boss was defeated.
    Fanfare,
    /// The player took a step.
    Step,
}

impl SoundCue {
    /// Event name understood by the audio collaborator.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shoot => "shoot",
            Self::Hit => "hit",
            Self::Collect => "collect",
            Self::Money => "money",
            Self::EnemyDeath => "enemy_death",
            Self::Alert => "alert",
            Self::BossRoar => "boss_roar",
            Self::DoorOpen => "door_open",
            Self::Elevator => "elevator",
            Self::Fanfare => "fanfare",
            Self::Step => "step",
        }
    }
}

/// Material stored in a single grid tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Walkable floor.
    #[default]
    Empty,
    /// Brick wall (`#`).
    BrickWall,
    /// Wooden wall (`W`).
    WoodWall,
    /// Door that opens on interaction (`+`).
    Door,
    /// Gate cleared once enough tables are collected (`X`).
    LockedGate,
    /// Elevator that carries the player to the next level (`E`).
    Elevator,
    /// Dungeon stone wall (`B`).
    StoneWall,
    /// Concrete wall (`C`).
    ConcreteWall,
    /// Office panel wall (`O`).
    OfficeWall,
    /// Metal wall (`M`).
    MetalWall,
}

impl TileKind {
    /// Tile reported for coordinates outside the grid.
    pub const OUT_OF_BOUNDS: Self = Self::BrickWall;

    /// Decodes a level marker into its tile. Spawn markers and unknown
    /// characters decode to [`TileKind::Empty`].
    #[must_use]
    pub const fn from_marker(marker: char) -> Self {
        match marker {
            '#' => Self::BrickWall,
            'W' => Self::WoodWall,
            'E' => Self::Elevator,
            '+' => Self::Door,
            'X' => Self::LockedGate,
            'B' => Self::StoneWall,
            'C' => Self::ConcreteWall,
            'O' => Self::OfficeWall,
            'M' => Self::MetalWall,
            _ => Self::Empty,
        }
    }

    /// Reports whether the tile stops movement, sight and rays.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Name of the wall texture used for this tile, if it is drawn.
    #[must_use]
    pub const fn texture_name(self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::BrickWall => Some("wall"),
            Self::WoodWall => Some("wood"),
            Self::Door | Self::Elevator => Some("door"),
            Self::LockedGate => Some("gate"),
            Self::StoneWall => Some("stone"),
            Self::ConcreteWall => Some("concrete"),
            Self::OfficeWall => Some("office"),
            Self::MetalWall => Some("metal"),
        }
    }
}

/// Read-only view into the tile grid.
#[derive(Clone, Copy, Debug)]
pub struct TileView<'a> {
    tiles: &'a [TileKind],
    columns: u32,
    rows: u32,
}

impl<'a> TileView<'a> {
    /// Captures a new tile view backed by the provided row-major slice.
    #[must_use]
    pub fn new(tiles: &'a [TileKind], columns: u32, rows: u32) -> Self {
        Self {
            tiles,
            columns,
            rows,
        }
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, column: i32, row: i32) -> bool {
        self.index(column, row).is_some()
    }

    /// Returns the tile at the coordinate, or [`TileKind::OUT_OF_BOUNDS`]
    /// when the coordinate lies outside the grid.
    #[must_use]
    pub fn tile_at(&self, column: i32, row: i32) -> TileKind {
        self.index(column, row)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(TileKind::OUT_OF_BOUNDS)
    }

    /// Returns the tile containing the world-space point.
    #[must_use]
    pub fn tile_at_point(&self, point: Vec2) -> TileKind {
        let (column, row) = tile_of(point);
        self.tile_at(column, row)
    }

    /// Reports whether the tile containing the point blocks movement.
    #[must_use]
    pub fn is_blocked_at(&self, point: Vec2) -> bool {
        self.tile_at_point(point).is_blocking()
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}

/// Converts a world-space point to the coordinates of the tile containing it.
#[must_use]
pub fn tile_of(point: Vec2) -> (i32, i32) {
    (point.x.floor() as i32, point.y.floor() as i32)
}

/// Wraps an angle into the `(-PI, PI]` range.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut wrapped = angle % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Position and facing of a viewer in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Position in tile-fractional coordinates.
    pub position: Vec2,
    /// Facing angle in radians; zero looks toward increasing columns.
    pub facing: f32,
}

impl Pose {
    /// Creates a new pose.
    #[must_use]
    pub const fn new(position: Vec2, facing: f32) -> Self {
        Self { position, facing }
    }

    /// Unit vector pointing along the facing angle.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.facing.cos(), self.facing.sin())
    }

    /// Point located `distance` tiles ahead of the pose.
    #[must_use]
    pub fn ahead(&self, distance: f32) -> Vec2 {
        self.position + self.direction() * distance
    }
}

/// Unique identifier assigned to an entity within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// RGB colour of paint projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaintColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl PaintColor {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a fully saturated colour at half lightness for the hue in degrees.
    #[must_use]
    pub fn from_hue(hue_degrees: f32) -> Self {
        let hue = hue_degrees.rem_euclid(360.0) / 60.0;
        let secondary = 1.0 - (hue % 2.0 - 1.0).abs();
        let (red, green, blue) = match hue as u32 {
            0 => (1.0, secondary, 0.0),
            1 => (secondary, 1.0, 0.0),
            2 => (0.0, 1.0, secondary),
            3 => (0.0, secondary, 1.0),
            4 => (secondary, 0.0, 1.0),
            _ => (1.0, 0.0, secondary),
        };
        let to_byte = |channel: f32| (channel * 255.0).round() as u8;
        Self::from_rgb(to_byte(red), to_byte(green), to_byte(blue))
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Identifiers of the weapons the player can own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponId {
    /// Ranged paint flinger the player starts with.
    Paintbrush,
    /// Heavy melee weapon unlocked by a pickup.
    TableLeg,
}

impl WeaponId {
    /// Stable key used for sprite lookups.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Paintbrush => "paintbrush",
            Self::TableLeg => "tableLeg",
        }
    }

    /// Static definition describing the weapon.
    #[must_use]
    pub const fn definition(self) -> &'static WeaponDefinition {
        match self {
            Self::Paintbrush => &WEAPONS[0],
            Self::TableLeg => &WEAPONS[1],
        }
    }
}

/// How projectile colours are chosen for a ranged weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectilePalette {
    /// A random hue for every shot.
    Rainbow,
    /// The same colour for every shot.
    Solid(PaintColor),
}

/// Attack style of a weapon together with its style-specific parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WeaponKind {
    /// Fires a projectile.
    Ranged {
        /// Colour generator for fired projectiles.
        palette: ProjectilePalette,
    },
    /// Sweeps an arc in front of the player.
    Melee {
        /// Reach of the swing in tiles.
        range: f32,
        /// Full angular width of the swing in radians.
        arc: f32,
    },
}

/// Static description of a weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponDefinition {
    /// Name displayed by the HUD.
    pub name: &'static str,
    /// Attack style.
    pub kind: WeaponKind,
    /// Damage dealt per hit.
    pub damage: i32,
    /// Minimum time between attacks.
    pub cooldown: Duration,
    /// Ammunition consumed per attack.
    pub ammo_cost: u32,
}

const WEAPONS: [WeaponDefinition; 2] = [
    WeaponDefinition {
        name: "PAINTBRUSH",
        kind: WeaponKind::Ranged {
            palette: ProjectilePalette::Rainbow,
        },
        damage: 15,
        cooldown: Duration::from_millis(250),
        ammo_cost: 1,
    },
    WeaponDefinition {
        name: "TABLE LEG",
        kind: WeaponKind::Melee {
            range: 1.5,
            arc: FRAC_PI_2,
        },
        damage: 40,
        cooldown: Duration::from_millis(500),
        ammo_cost: 0,
    },
];

/// Items the player can pick up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    /// A table counting toward the level requirement.
    Table,
    /// A bundle of ammunition.
    Ammo,
    /// A health kit.
    Health,
    /// A stack of money worth score.
    Money,
    /// A gold bar worth more score.
    GoldBar,
    /// A weapon that joins the inventory.
    Weapon(WeaponId),
}

/// Strength tier of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyTier {
    /// Weakest regular enemy.
    Grunt,
    /// Intermediate regular enemy.
    Veteran,
    /// Strongest regular enemy.
    Elite,
    /// The level boss.
    Boss,
}

impl EnemyTier {
    /// Regular tiers in ascending strength.
    pub const REGULAR: [Self; 3] = [Self::Grunt, Self::Veteran, Self::Elite];

    /// Static statistics for the tier.
    #[must_use]
    pub const fn stats(self) -> &'static EnemyStats {
        &ENEMY_STATS[self as usize]
    }

    /// Suffix appended to enemy sprite keys.
    #[must_use]
    pub const fn sprite_suffix(self) -> &'static str {
        match self {
            Self::Grunt => "0",
            Self::Veteran => "1",
            Self::Elite => "2",
            Self::Boss => "boss",
        }
    }
}

/// Behavioural parameters for an enemy tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Distance within which a visible player is noticed.
    pub detect_range: f32,
    /// Distance within which the enemy fires.
    pub attack_range: f32,
    /// Chase speed in tiles per second.
    pub move_speed: f32,
    /// Minimum time between shots.
    pub attack_cooldown: Duration,
    /// Health the enemy spawns with.
    pub max_health: i32,
}

const ENEMY_STATS: [EnemyStats; 4] = [
    EnemyStats {
        detect_range: 8.0,
        attack_range: 5.0,
        move_speed: 1.2,
        attack_cooldown: Duration::from_millis(3_500),
        max_health: 25,
    },
    EnemyStats {
        detect_range: 10.0,
        attack_range: 6.0,
        move_speed: 1.8,
        attack_cooldown: Duration::from_millis(2_500),
        max_health: 35,
    },
    EnemyStats {
        detect_range: 12.0,
        attack_range: 8.0,
        move_speed: 2.4,
        attack_cooldown: Duration::from_millis(2_000),
        max_health: 50,
    },
    EnemyStats {
        detect_range: 20.0,
        attack_range: 15.0,
        move_speed: 1.5,
        attack_cooldown: Duration::from_millis(1_500),
        max_health: 500,
    },
];

/// States of the enemy finite state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// Waiting and patrolling in place.
    Idle,
    /// Briefly frozen after spotting the player.
    Alert,
    /// Pursuing and shooting at the player.
    Chase,
    /// Flinching after taking damage.
    Pain,
    /// Defeated; terminal.
    Dead,
}

impl EnemyState {
    /// Pose name used by enemy sprite keys.
    #[must_use]
    pub const fn sprite_pose(self) -> &'static str {
        match self {
            Self::Dead => "dead",
            Self::Pain => "pain",
            Self::Idle | Self::Alert | Self::Chase => "idle",
        }
    }
}

/// Side that fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileOwner {
    /// Fired by the player; hurts enemies.
    Player,
    /// Fired by an enemy; hurts the player.
    Enemy,
}

/// Per-frame player intent gathered by adapters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Move forward is held.
    pub forward: bool,
    /// Move backward is held.
    pub backward: bool,
    /// Turn left is held.
    pub turn_left: bool,
    /// Turn right is held.
    pub turn_right: bool,
    /// Fire was pressed on this frame.
    pub fire: bool,
    /// Interact was pressed on this frame.
    pub interact: bool,
    /// One-based weapon slot selected on this frame.
    pub weapon_slot: Option<usize>,
    /// Pause was pressed on this frame.
    pub pause: bool,
    /// Start was pressed on this frame.
    pub start: bool,
}

/// Immutable representation of a single enemy used by systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EntityId,
    /// Position in tile-fractional coordinates.
    pub position: Vec2,
    /// Strength tier.
    pub tier: EnemyTier,
    /// Current state.
    pub state: EnemyState,
    /// Remaining health.
    pub health: i32,
    /// Whether the idle patrol interval elapsed.
    pub patrol_ready: bool,
    /// Whether the attack cooldown elapsed.
    pub attack_ready: bool,
}

/// Read-only snapshot of every enemy in the level, dead ones included.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for the provided enemy.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player used by systems and adapters.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Position and facing.
    pub pose: Pose,
    /// Health in the range `0..=100`.
    pub health: i32,
    /// Ammunition available to ranged weapons.
    pub ammo: u32,
    /// Tables collected in the current level.
    pub tables: u32,
    /// Tables required to unlock the exit.
    pub required_tables: u32,
    /// Score accumulated from money pickups.
    pub score: u32,
    /// Owned weapons in unlock order.
    pub inventory: Vec<WeaponId>,
    /// Index of the equipped weapon inside `inventory`.
    pub current_weapon: usize,
    /// Remaining weapon recoil used for animating the weapon view.
    pub recoil: f32,
}

impl PlayerSnapshot {
    /// Currently equipped weapon.
    #[must_use]
    pub fn weapon(&self) -> WeaponId {
        self.inventory
            .get(self.current_weapon)
            .copied()
            .unwrap_or(WeaponId::Paintbrush)
    }
}

/// Appearance class of a drawable entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntityVisual {
    /// A pickup lying on the floor.
    Pickup(PickupKind),
    /// An enemy in the provided state.
    Enemy {
        /// Strength tier.
        tier: EnemyTier,
        /// Current state.
        state: EnemyState,
    },
    /// A paint projectile in flight.
    Projectile {
        /// Side that fired the projectile.
        owner: ProjectileOwner,
        /// Paint colour.
        color: PaintColor,
    },
}

/// Drawable entity captured for the sprite projector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEntity {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Position in tile-fractional coordinates.
    pub position: Vec2,
    /// Appearance class.
    pub visual: EntityVisual,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_view_reports_out_of_bounds_as_blocking() {
        let tiles = vec![TileKind::Empty; 4];
        let view = TileView::new(&tiles, 2, 2);

        assert_eq!(view.tile_at(1, 1), TileKind::Empty);
        for (column, row) in [(-1, 0), (0, -1), (2, 0), (0, 2), (i32::MIN, i32::MAX)] {
            assert!(view.tile_at(column, row).is_blocking());
            assert!(!view.contains(column, row));
        }
    }

    #[test]
    fn markers_decode_to_tiles() {
        assert_eq!(TileKind::from_marker('#'), TileKind::BrickWall);
        assert_eq!(TileKind::from_marker('X'), TileKind::LockedGate);
        assert_eq!(TileKind::from_marker('E'), TileKind::Elevator);
        assert_eq!(TileKind::from_marker('T'), TileKind::Empty);
        assert_eq!(TileKind::from_marker('.'), TileKind::Empty);
    }

    #[test]
    fn normalize_angle_wraps_into_half_open_range() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0 - TAU) + PI / 2.0).abs() < 1e-5);
        assert!(normalize_angle(0.25).abs() - 0.25 < 1e-6);
    }

    #[test]
    fn enemy_stats_are_indexed_by_tier() {
        assert_eq!(EnemyTier::Grunt.stats().max_health, 25);
        assert_eq!(EnemyTier::Elite.stats().detect_range, 12.0);
        assert_eq!(EnemyTier::Boss.stats().max_health, 500);
        assert_eq!(
            EnemyTier::Boss.stats().attack_cooldown,
            Duration::from_millis(1_500)
        );
    }

    #[test]
    fn weapon_table_describes_melee_and_ranged_weapons() {
        let table_leg = WeaponId::TableLeg.definition();
        assert_eq!(table_leg.ammo_cost, 0);
        assert!(matches!(table_leg.kind, WeaponKind::Melee { range, .. } if range == 1.5));

        let brush = WeaponId::Paintbrush.definition();
        assert_eq!(brush.name, "PAINTBRUSH");
        assert!(matches!(brush.kind, WeaponKind::Ranged { .. }));
    }

    #[test]
    fn hue_conversion_hits_primary_colours() {
        assert_eq!(PaintColor::from_hue(0.0), PaintColor::from_rgb(255, 0, 0));
        assert_eq!(PaintColor::from_hue(120.0), PaintColor::from_rgb(0, 255, 0));
        assert_eq!(PaintColor::from_hue(240.0), PaintColor::from_rgb(0, 0, 255));
    }
}
