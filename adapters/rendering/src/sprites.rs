//! Billboard projection for pickups, enemies and projectiles.

use std::cmp::Ordering;

use tablequest_core::{
    normalize_angle, EnemyState, EnemyTier, EntityVisual, PickupKind, Pose, SceneEntity,
};

use crate::{Color, RenderConfig};

/// Screen placement of a sprite that survived culling and occlusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteProjection {
    /// Entity being drawn.
    pub entity: SceneEntity,
    /// Distance from the viewer in tiles.
    pub distance: f32,
    /// Horizontal centre on screen in pixels.
    pub screen_x: f32,
    /// Side length of the square billboard in pixels.
    pub size: f32,
    /// Top edge of the billboard before any per-kind offset.
    pub top: f32,
}

/// Projects `entities` for a viewer at `pose`, ordered far to near.
///
/// Sprites closer than the near clip or outside the sprite tolerance are
/// culled. Occlusion tests the wall depth of the single column under the
/// sprite centre only.
#[must_use]
pub fn project_sprites(
    entities: &[SceneEntity],
    pose: Pose,
    config: &RenderConfig,
    depth: &[f32],
) -> Vec<SpriteProjection> {
    let Some(last_column) = depth.len().checked_sub(1) else {
        return Vec::new();
    };
    let width = depth.len() as f32;
    let height = config.height() as f32;

    let mut ordered: Vec<(f32, &SceneEntity)> = entities
        .iter()
        .map(|entity| (entity.position.distance(pose.position), entity))
        .collect();
    ordered.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    ordered
        .into_iter()
        .filter(|(distance, _)| *distance >= config.near_clip())
        .filter_map(|(distance, entity)| {
            let offset = entity.position - pose.position;
            let angle = normalize_angle(offset.y.atan2(offset.x) - pose.facing);
            if angle.abs() >= config.sprite_fov_tolerance() {
                return None;
            }

            let screen_x = (0.5 * (angle / (config.fov() / 2.0)) + 0.5) * width;
            let column = (screen_x.floor().max(0.0) as usize).min(last_column);
            if depth[column] <= distance {
                return None;
            }

            let size = height / distance;
            Some(SpriteProjection {
                entity: *entity,
                distance,
                screen_x,
                size,
                top: (height - size) / 2.0,
            })
        })
        .collect()
}

/// Sprite key for image-based visuals; projectiles are drawn procedurally.
#[must_use]
pub fn sprite_key(visual: &EntityVisual) -> Option<String> {
    match visual {
        EntityVisual::Pickup(kind) => Some(match kind {
            PickupKind::Table => "table".to_owned(),
            PickupKind::Ammo => "ammo".to_owned(),
            PickupKind::Health => "health".to_owned(),
            PickupKind::Money => "money".to_owned(),
            PickupKind::GoldBar => "goldBar".to_owned(),
            PickupKind::Weapon(weapon) => format!("weaponPickup_{}", weapon.key()),
        }),
        EntityVisual::Enemy { tier, state } => Some(format!(
            "enemy_{}_{}",
            state.sprite_pose(),
            tier.sprite_suffix()
        )),
        EntityVisual::Projectile { .. } => None,
    }
}

/// Flat colour of the billboard drawn when an entity's sprite is missing.
#[must_use]
pub fn placeholder_sprite_color(visual: &EntityVisual) -> Color {
    match visual {
        EntityVisual::Pickup(kind) => match kind {
            PickupKind::Table => Color::from_rgb_u8(0x8d, 0x6e, 0x63),
            PickupKind::Ammo => Color::from_rgb_u8(0xff, 0xc1, 0x07),
            PickupKind::Health => Color::from_rgb_u8(0xef, 0xef, 0xef),
            PickupKind::Money => Color::from_rgb_u8(0x4c, 0xaf, 0x50),
            PickupKind::GoldBar => Color::from_rgb_u8(0xff, 0xd7, 0x00),
            PickupKind::Weapon(_) => Color::from_rgb_u8(0x6d, 0x4c, 0x41),
        },
        EntityVisual::Enemy {
            state: EnemyState::Dead,
            ..
        } => Color::from_rgb_u8(0x40, 0x10, 0x10),
        EntityVisual::Enemy {
            state: EnemyState::Pain,
            ..
        } => Color::from_rgb_u8(0xff, 0x8a, 0x80),
        EntityVisual::Enemy { tier, .. } => match tier {
            EnemyTier::Grunt => Color::from_rgb_u8(0x1e, 0x88, 0xe5),
            EnemyTier::Veteran => Color::from_rgb_u8(0x3f, 0x51, 0xb5),
            EnemyTier::Elite => Color::from_rgb_u8(0x21, 0x21, 0x21),
            EnemyTier::Boss => Color::from_rgb_u8(0x8e, 0x24, 0xaa),
        },
        EntityVisual::Projectile { color, .. } => Color::from_paint(*color),
    }
}
