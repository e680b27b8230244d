//! Level layouts parsed from character-coded row strings.

use serde::Deserialize;
use tablequest_core::{Pose, TileKind, Vec2, WeaponId};
use thiserror::Error;

/// Errors raised while reading level data.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level pack contained no levels.
    #[error("level pack does not contain any levels")]
    EmptyPack,
    /// A level had no rows or an empty first row.
    #[error("level `{name}` has no rows")]
    EmptyLayout {
        /// Name of the offending level.
        name: String,
    },
    /// A row was shorter or longer than the first row.
    #[error("level `{name}` row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Name of the offending level.
        name: String,
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// No `S` marker was present.
    #[error("level `{name}` has no player start marker `S`")]
    MissingPlayerStart {
        /// Name of the offending level.
        name: String,
    },
    /// A character did not decode to a tile or spawn.
    #[error("level `{name}` has unknown marker {marker:?} at column {column}, row {row}")]
    UnknownMarker {
        /// Name of the offending level.
        name: String,
        /// Character that failed to decode.
        marker: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
    /// The pack was not valid TOML.
    #[error("failed to parse level pack: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Entity placed by a spawn marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawn {
    /// `T`: a table counted toward the exit requirement.
    Table,
    /// `D`: a regular enemy with a tier rolled at load.
    Enemy,
    /// `G`: the boss.
    Boss,
    /// `A`: an ammo bundle.
    Ammo,
    /// `H`: a health kit.
    Health,
    /// `L`: a weapon pickup.
    Weapon(WeaponId),
    /// `$`: a money stack.
    Money,
    /// `*`: a gold bar.
    GoldBar,
}

impl Spawn {
    fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'T' => Some(Self::Table),
            'D' => Some(Self::Enemy),
            'G' => Some(Self::Boss),
            'A' => Some(Self::Ammo),
            'H' => Some(Self::Health),
            'L' => Some(Self::Weapon(WeaponId::TableLeg)),
            '$' => Some(Self::Money),
            '*' => Some(Self::GoldBar),
            _ => None,
        }
    }
}

/// Fully decoded level ready to be instantiated by the world.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelLayout {
    name: String,
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
    player_start: Pose,
    spawns: Vec<(Spawn, Vec2)>,
}

impl LevelLayout {
    /// Decodes a level from its row strings.
    ///
    /// Every row must be as wide as the first. Spawn markers leave an empty
    /// tile behind and place their entity at the tile centre. The player
    /// starts facing east.
    pub fn parse<S: AsRef<str>>(name: &str, rows: &[S]) -> Result<Self, LevelError> {
        let expected = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if expected == 0 {
            return Err(LevelError::EmptyLayout {
                name: name.to_owned(),
            });
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        let mut player_start = None;
        let mut spawns = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(LevelError::RaggedRow {
                    name: name.to_owned(),
                    row: row_index,
                    expected,
                    found,
                });
            }

            for (column_index, marker) in row.chars().enumerate() {
                let centre = Vec2::new(column_index as f32 + 0.5, row_index as f32 + 0.5);
                let tile = TileKind::from_marker(marker);
                if tile.is_blocking() {
                    tiles.push(tile);
                    continue;
                }

                tiles.push(TileKind::Empty);
                match marker {
                    '.' | ' ' => {}
                    'S' => player_start = Some(Pose::new(centre, 0.0)),
                    other => match Spawn::from_marker(other) {
                        Some(spawn) => spawns.push((spawn, centre)),
                        None => {
                            return Err(LevelError::UnknownMarker {
                                name: name.to_owned(),
                                marker: other,
                                column: column_index,
                                row: row_index,
                            })
                        }
                    },
                }
            }
        }

        let player_start = player_start.ok_or_else(|| LevelError::MissingPlayerStart {
            name: name.to_owned(),
        })?;

        Ok(Self {
            name: name.to_owned(),
            columns: u32::try_from(expected).unwrap_or(u32::MAX),
            rows: u32::try_from(rows.len()).unwrap_or(u32::MAX),
            tiles,
            player_start,
            spawns,
        })
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the level in tiles.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Height of the level in tiles.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Row-major tiles of the level.
    #[must_use]
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Pose the player starts the level in.
    #[must_use]
    pub const fn player_start(&self) -> Pose {
        self.player_start
    }

    /// Entities placed by spawn markers, in reading order.
    #[must_use]
    pub fn spawns(&self) -> &[(Spawn, Vec2)] {
        &self.spawns
    }

    /// Number of tables required to unlock the exit.
    #[must_use]
    pub fn required_tables(&self) -> u32 {
        let count = self
            .spawns
            .iter()
            .filter(|(spawn, _)| *spawn == Spawn::Table)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Deserialize)]
struct LevelPackFile {
    levels: Vec<LevelEntry>,
}

#[derive(Debug, Deserialize)]
struct LevelEntry {
    name: String,
    rows: Vec<String>,
}

/// Ordered collection of levels making up a campaign.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelPack {
    levels: Vec<LevelLayout>,
}

impl LevelPack {
    /// Creates a pack from already decoded levels.
    #[must_use]
    pub fn new(levels: Vec<LevelLayout>) -> Self {
        Self { levels }
    }

    /// Parses a TOML pack made of `[[levels]]` tables with `name` and `rows`.
    pub fn from_toml_str(source: &str) -> Result<Self, LevelError> {
        let file: LevelPackFile = toml::from_str(source)?;
        if file.levels.is_empty() {
            return Err(LevelError::EmptyPack);
        }

        let levels = file
            .levels
            .iter()
            .map(|entry| LevelLayout::parse(&entry.name, &entry.rows))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { levels })
    }

    /// Number of levels in the pack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the pack has no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at the zero-based index, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LevelLayout> {
        self.levels.get(index)
    }
}
