//! Grid traversal (DDA) ray casting against the tile map.

use glam::Vec2;
use tablequest_core::{TileKind, TileView};

/// Face of the grid cell a ray struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitSide {
    /// A face parallel to the Y axis, crossed while stepping along X.
    Vertical,
    /// A face parallel to the X axis, crossed while stepping along Y. Drawn darker.
    Horizontal,
}

/// Result of casting a single screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Euclidean distance from the origin to the hit point.
    pub distance: f32,
    /// Distance projected onto the view direction; used for wall height.
    pub corrected: f32,
    /// Tile that stopped the ray.
    pub tile: TileKind,
    /// Horizontal texture coordinate in `0.0..1.0`.
    pub texture_u: f32,
    /// Face that was struck.
    pub side: HitSide,
}

/// Casts a ray from `origin` at `angle` until it hits a blocking tile.
///
/// `facing` is the view direction used for the fisheye correction. Rays
/// travelling further than `max_depth` tiles miss and return `None`.
#[must_use]
pub fn cast_column(
    tiles: &TileView<'_>,
    origin: Vec2,
    angle: f32,
    facing: f32,
    max_depth: f32,
) -> Option<RayHit> {
    let direction = Vec2::new(angle.cos(), angle.sin());
    let mut column = origin.x.floor() as i32;
    let mut row = origin.y.floor() as i32;

    let (step_x, mut side_x, delta_x) = axis_setup(origin.x, column, direction.x);
    let (step_y, mut side_y, delta_y) = axis_setup(origin.y, row, direction.y);

    loop {
        let side = if side_x < side_y {
            side_x += delta_x;
            column += step_x;
            HitSide::Vertical
        } else {
            side_y += delta_y;
            row += step_y;
            HitSide::Horizontal
        };

        let distance = match side {
            HitSide::Vertical => {
                (column as f32 - origin.x + (1 - step_x) as f32 / 2.0) / direction.x
            }
            HitSide::Horizontal => {
                (row as f32 - origin.y + (1 - step_y) as f32 / 2.0) / direction.y
            }
        };
        if !distance.is_finite() || distance > max_depth {
            return None;
        }

        let tile = tiles.tile_at(column, row);
        if !tile.is_blocking() {
            continue;
        }

        let wall = match side {
            HitSide::Vertical => origin.y + distance * direction.y,
            HitSide::Horizontal => origin.x + distance * direction.x,
        };
        let mut texture_u = wall - wall.floor();
        let mirrored = match side {
            HitSide::Vertical => direction.x > 0.0,
            HitSide::Horizontal => direction.y < 0.0,
        };
        if mirrored {
            texture_u = 1.0 - texture_u;
        }

        return Some(RayHit {
            distance,
            corrected: distance * (angle - facing).cos(),
            tile,
            texture_u: texture_u.clamp(0.0, 1.0 - f32::EPSILON),
            side,
        });
    }
}

/// Step direction, distance to the first grid line and distance between
/// grid lines for one axis.
fn axis_setup(origin: f32, cell: i32, direction: f32) -> (i32, f32, f32) {
    if direction == 0.0 {
        return (0, f32::INFINITY, f32::INFINITY);
    }
    let delta = (1.0 / direction).abs();
    if direction < 0.0 {
        (-1, (origin - cell as f32) * delta, delta)
    } else {
        (1, (cell as f32 + 1.0 - origin) * delta, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn bordered_room(size: u32) -> Vec<TileKind> {
        let mut tiles = vec![TileKind::Empty; (size * size) as usize];
        for index in 0..size {
            for (column, row) in [(index, 0), (index, size - 1), (0, index), (size - 1, index)] {
                tiles[(row * size + column) as usize] = TileKind::BrickWall;
            }
        }
        tiles
    }

    #[test]
    fn axis_aligned_rays_reach_walls_of_an_empty_room() {
        let tiles = bordered_room(9);
        let view = TileView::new(&tiles, 9, 9);
        let origin = Vec2::new(4.5, 4.5);

        for (angle, side) in [
            (0.0, HitSide::Vertical),
            (FRAC_PI_2, HitSide::Horizontal),
            (PI, HitSide::Vertical),
            (-FRAC_PI_2, HitSide::Horizontal),
        ] {
            let hit =
                cast_column(&view, origin, angle, angle, 50.0).expect("walls surround origin");
            assert!((hit.distance - 3.5).abs() < 1e-4, "{angle}: {hit:?}");
            assert!((hit.corrected - hit.distance).abs() < 1e-4);
            assert_eq!(hit.tile, TileKind::BrickWall);
            assert_eq!(hit.side, side);
        }
    }

    #[test]
    fn oblique_rays_are_fisheye_corrected() {
        let tiles = bordered_room(9);
        let view = TileView::new(&tiles, 9, 9);

        let hit = cast_column(&view, Vec2::new(4.5, 4.5), FRAC_PI_4, 0.0, 50.0)
            .expect("walls surround origin");

        assert!((hit.distance - 3.5 * 2f32.sqrt()).abs() < 1e-3);
        assert!((hit.corrected - 3.5).abs() < 1e-3);
    }

    #[test]
    fn texture_coordinate_follows_the_hit_point() {
        let tiles = bordered_room(9);
        let view = TileView::new(&tiles, 9, 9);

        let west = cast_column(&view, Vec2::new(4.5, 4.25), PI, PI, 50.0).expect("wall hit");
        let east = cast_column(&view, Vec2::new(4.5, 4.25), 0.0, 0.0, 50.0).expect("wall hit");

        assert!((west.texture_u - 0.25).abs() < 1e-4);
        assert!((east.texture_u - 0.75).abs() < 1e-4);
    }

    #[test]
    fn rays_beyond_max_depth_miss() {
        let tiles = bordered_room(9);
        let view = TileView::new(&tiles, 9, 9);

        assert!(cast_column(&view, Vec2::new(4.5, 4.5), 0.0, 0.0, 2.0).is_none());
    }

    #[test]
    fn rays_leaving_the_map_stop_at_the_boundary() {
        let tiles = vec![TileKind::Empty; 9];
        let view = TileView::new(&tiles, 3, 3);

        let hit = cast_column(&view, Vec2::new(1.5, 1.5), 0.0, 0.0, 50.0).expect("boundary");

        assert_eq!(hit.tile, TileKind::OUT_OF_BOUNDS);
        assert!((hit.distance - 1.5).abs() < 1e-4);
    }
}
