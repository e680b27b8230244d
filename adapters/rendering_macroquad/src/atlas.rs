use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use macroquad::texture::Image;
use tablequest_core::{EnemyState, EnemyTier, EntityVisual, PickupKind, WeaponId};
use tablequest_rendering::{sprite_key, Texture, TextureAtlas};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const TEXTURE_NAMES: [&str; 10] = [
    "wall", "wood", "door", "gate", "stone", "concrete", "office", "metal", "floor", "ceil",
];

/// Which lookup table a manifest entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AssetKind {
    Texture,
    Sprite,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AssetEntry {
    kind: AssetKind,
    name: String,
    path: PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    textures: HashMap<String, String>,
    #[serde(default)]
    sprites: HashMap<String, String>,
}

/// Returns the default manifest path relative to the repository root.
#[must_use]
pub fn default_manifest_path() -> PathBuf {
    PathBuf::from("assets/manifest.toml")
}

/// Loads every texture and sprite listed in the manifest at `path`.
///
/// Image paths are resolved relative to the manifest. Names the renderer
/// never asks for are rejected. Names the manifest omits, and images that
/// cannot be read, are reported and later drawn with fallbacks.
pub fn load_texture_atlas(path: impl AsRef<Path>) -> Result<TextureAtlas> {
    let manifest_path = path.as_ref();
    let contents = fs::read_to_string(manifest_path).with_context(|| {
        format!(
            "failed to read asset manifest at {}",
            manifest_path.display()
        )
    })?;
    let base = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let entries = parse_manifest(&contents, &base)?;
    build_atlas(entries, &mut decode_image)
}

fn decode_image(path: &Path) -> Result<Texture> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read image at {}", path.display()))?;
    let image = Image::from_file_with_format(&bytes, None);
    Texture::from_rgba_bytes(u32::from(image.width), u32::from(image.height), &image.bytes)
        .with_context(|| format!("malformed image at {}", path.display()))
}

fn build_atlas(
    entries: Vec<AssetEntry>,
    loader: &mut impl FnMut(&Path) -> Result<Texture>,
) -> Result<TextureAtlas> {
    let mut atlas = TextureAtlas::new();
    for AssetEntry { kind, name, path } in entries {
        let texture = match loader(&path) {
            Ok(texture) => texture,
            Err(error) => {
                log::warn!("skipping {kind:?} `{name}`: {error:#}");
                continue;
            }
        };
        match kind {
            AssetKind::Texture => atlas
                .insert_texture(name.as_str(), texture)
                .with_context(|| format!("texture `{name}` cannot be used for walls or floors"))?,
            AssetKind::Sprite => atlas.insert_sprite(name, texture),
        }
    }
    log::info!(
        "loaded {} textures and {} sprites",
        atlas.texture_count(),
        atlas.sprite_count()
    );
    Ok(atlas)
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<AssetEntry>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported asset manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let texture_names: Vec<String> = TEXTURE_NAMES
        .iter()
        .map(|name| (*name).to_owned())
        .collect();
    let mut entries = Vec::with_capacity(manifest.textures.len() + manifest.sprites.len());
    for (kind, table, known) in [
        (AssetKind::Texture, manifest.textures, texture_names),
        (AssetKind::Sprite, manifest.sprites, known_sprite_keys()),
    ] {
        for name in &known {
            if !table.contains_key(name) {
                log::warn!("asset manifest has no {kind:?} `{name}`; a fallback will be drawn");
            }
        }
        for (name, relative_path) in table {
            if !known.contains(&name) {
                bail!("unknown {kind:?} `{name}` in asset manifest");
            }
            entries.push(AssetEntry {
                kind,
                name,
                path: base_path.join(relative_path),
            });
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn known_sprite_keys() -> Vec<String> {
    let pickups = [
        PickupKind::Table,
        PickupKind::Ammo,
        PickupKind::Health,
        PickupKind::Money,
        PickupKind::GoldBar,
        PickupKind::Weapon(WeaponId::Paintbrush),
        PickupKind::Weapon(WeaponId::TableLeg),
    ]
    .into_iter()
    .map(EntityVisual::Pickup);
    let enemies = [
        EnemyTier::Grunt,
        EnemyTier::Veteran,
        EnemyTier::Elite,
        EnemyTier::Boss,
    ]
    .into_iter()
    .flat_map(|tier| {
        [EnemyState::Idle, EnemyState::Pain, EnemyState::Dead]
            .into_iter()
            .map(move |state| EntityVisual::Enemy { tier, state })
    });

    pickups
        .chain(enemies)
        .filter_map(|visual| sprite_key(&visual))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tablequest_rendering::{Color, TextureProvider};

    #[test]
    fn manifest_rejects_unknown_names() {
        let manifest = r#"
            version = 1

            [textures]
            wall = "textures/wall.png"
            lava = "textures/lava.png"
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "unknown texture names must be rejected");
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let manifest = r#"
            version = 2

            [sprites]
            table = "sprites/table.png"
        "#;

        assert!(parse_manifest(manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let manifest = r#"
            version = 1

            [textures]
            wall = "textures/wall.png"

            [sprites]
            enemy_pain_boss = "sprites/boss_pain.png"
            table = "sprites/table.png"
        "#;

        let parsed = parse_manifest(manifest, Path::new("root")).expect("manifest should parse");
        let expected = vec![
            AssetEntry {
                kind: AssetKind::Sprite,
                name: "enemy_pain_boss".to_owned(),
                path: PathBuf::from("root/sprites/boss_pain.png"),
            },
            AssetEntry {
                kind: AssetKind::Sprite,
                name: "table".to_owned(),
                path: PathBuf::from("root/sprites/table.png"),
            },
            AssetEntry {
                kind: AssetKind::Texture,
                name: "wall".to_owned(),
                path: PathBuf::from("root/textures/wall.png"),
            },
        ];
        assert_eq!(parsed, expected);
    }

    #[test]
    fn bundled_manifest_lists_every_known_name() {
        let manifest = include_str!("../../../assets/manifest.toml");

        let entries = parse_manifest(manifest, Path::new("assets")).expect("bundled manifest");

        assert_eq!(entries.len(), TEXTURE_NAMES.len() + known_sprite_keys().len());
    }

    #[test]
    fn every_drawable_visual_has_a_known_key() {
        let keys = known_sprite_keys();

        assert_eq!(keys.len(), 19);
        assert!(keys.iter().any(|key| key == "weaponPickup_paintbrush"));
        assert!(keys.iter().any(|key| key == "enemy_dead_2"));
    }

    #[test]
    fn atlas_loads_each_entry_once_into_its_table() {
        let entries = vec![
            AssetEntry {
                kind: AssetKind::Texture,
                name: "floor".to_owned(),
                path: PathBuf::from("floor.png"),
            },
            AssetEntry {
                kind: AssetKind::Sprite,
                name: "ammo".to_owned(),
                path: PathBuf::from("ammo.png"),
            },
        ];
        let loaded = RefCell::new(Vec::new());

        let atlas = build_atlas(entries, &mut |path| {
            loaded.borrow_mut().push(path.to_path_buf());
            Ok(Texture::solid(4, 4, Color::WHITE)?)
        })
        .expect("atlas should load using provided loader");

        assert_eq!(
            loaded.into_inner(),
            vec![PathBuf::from("floor.png"), PathBuf::from("ammo.png")]
        );
        assert!(atlas.texture("floor").is_some());
        assert!(atlas.sprite("ammo").is_some());
        assert!(atlas.texture("ammo").is_none());
    }

    #[test]
    fn unreadable_images_are_skipped() {
        let entries = vec![
            AssetEntry {
                kind: AssetKind::Sprite,
                name: "money".to_owned(),
                path: PathBuf::from("missing.png"),
            },
            AssetEntry {
                kind: AssetKind::Sprite,
                name: "table".to_owned(),
                path: PathBuf::from("table.png"),
            },
        ];

        let atlas = build_atlas(entries, &mut |path| {
            if path == Path::new("missing.png") {
                bail!("no such file");
            }
            Ok(Texture::solid(4, 4, Color::WHITE)?)
        })
        .expect("missing images are not fatal");

        assert!(atlas.sprite("money").is_none());
        assert!(atlas.sprite("table").is_some());
    }

    #[test]
    fn non_power_of_two_surfaces_fail_to_load() {
        let entries = vec![AssetEntry {
            kind: AssetKind::Texture,
            name: "wall".to_owned(),
            path: PathBuf::from("wall.png"),
        }];

        let result = build_atlas(entries, &mut |_| Ok(Texture::solid(3, 3, Color::WHITE)?));

        assert!(result.is_err());
    }
}
