//! Axis-separated movement against the tile grid and sampled line of sight.

use tablequest_core::{tile_of, TileView, Vec2};

const SIGHT_SAMPLES_PER_TILE: f32 = 4.0;

/// Longest distance covered by one collision sub-step, in tiles.
const MAX_MOVE_STEP: f32 = 0.15;

/// Resolves a move from `position` by `delta`, one axis at a time.
///
/// The delta is split into sub-steps of at most 0.15 tile, so a
/// long frame cannot carry a body across a wall tile. Within each sub-step
/// the row axis is resolved first, then the column axis against the updated
/// row. Each axis checks a point `clearance` tiles past its destination in
/// the direction of travel; a blocked axis is dropped for the rest of the
/// move, which lets diagonal moves slide along walls.
#[must_use]
pub fn attempt_move(tiles: TileView<'_>, position: Vec2, delta: Vec2, clearance: f32) -> Vec2 {
    let steps = (delta.length() / MAX_MOVE_STEP).ceil().max(1.0) as u32;
    let (mut slide_x, mut slide_y) = (delta.x != 0.0, delta.y != 0.0);
    let mut resolved = position;

    for index in 1..=steps {
        let target = position + delta * (index as f32 / steps as f32);

        if slide_y {
            let edge = target.y + clearance.copysign(delta.y);
            if tiles.is_blocked_at(Vec2::new(resolved.x, edge)) {
                slide_y = false;
            } else {
                resolved.y = target.y;
            }
        }

        if slide_x {
            let edge = target.x + clearance.copysign(delta.x);
            if tiles.is_blocked_at(Vec2::new(edge, resolved.y)) {
                slide_x = false;
            } else {
                resolved.x = target.x;
            }
        }

        if !slide_x && !slide_y {
            break;
        }
    }

    resolved
}

/// Reports whether the straight segment between two points crosses no
/// blocking tile, sampling four points per tile of distance.
///
/// The end point itself is not sampled.
#[must_use]
pub fn line_of_sight(tiles: TileView<'_>, from: Vec2, to: Vec2) -> bool {
    let offset = to - from;
    let samples = (offset.length() * SIGHT_SAMPLES_PER_TILE).ceil() as u32;
    if samples == 0 {
        return true;
    }

    let step = offset / samples as f32;
    (0..samples).all(|index| {
        let (column, row) = tile_of(from + step * index as f32);
        !tiles.tile_at(column, row).is_blocking()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablequest_core::TileKind;

    fn room(rows: &[&str]) -> (Vec<TileKind>, u32, u32) {
        let columns = rows[0].len() as u32;
        let tiles = rows
            .iter()
            .flat_map(|row| row.chars().map(TileKind::from_marker))
            .collect();
        (tiles, columns, rows.len() as u32)
    }

    #[test]
    fn move_into_wall_slides_along_open_axis() {
        let (tiles, columns, rows) = room(&["#####", "#...#", "#...#", "#####"]);
        let view = TileView::new(&tiles, columns, rows);
        let start = Vec2::new(3.6, 1.5);

        let resolved = attempt_move(view, start, Vec2::new(0.2, 0.2), 0.3);

        assert_eq!(resolved.x, start.x);
        assert!((resolved.y - 1.7).abs() < 1e-6);
    }

    #[test]
    fn open_moves_apply_both_axes() {
        let (tiles, columns, rows) = room(&["#####", "#...#", "#...#", "#####"]);
        let view = TileView::new(&tiles, columns, rows);

        let resolved = attempt_move(view, Vec2::new(2.0, 1.5), Vec2::new(0.1, 0.1), 0.3);

        assert!((resolved - Vec2::new(2.1, 1.6)).length() < 1e-6);
    }

    #[test]
    fn clearance_keeps_distance_from_walls() {
        let (tiles, columns, rows) = room(&["###", "#.#", "###"]);
        let view = TileView::new(&tiles, columns, rows);

        let resolved = attempt_move(view, Vec2::new(1.5, 1.5), Vec2::new(0.25, 0.0), 0.3);

        assert!(resolved.x > 1.5);
        assert!(resolved.x + 0.3 < 2.0);
        assert_eq!(resolved.y, 1.5);
    }

    #[test]
    fn long_moves_stop_at_the_first_wall() {
        let (tiles, columns, rows) = room(&["#########", "#..#....#", "#########"]);
        let view = TileView::new(&tiles, columns, rows);

        let resolved = attempt_move(view, Vec2::new(1.5, 1.5), Vec2::new(3.2, 0.0), 0.3);

        assert!(resolved.x < 3.0 - 0.3 + 1e-4, "crossed the wall: {resolved}");
        assert!(resolved.x > 2.5);
        assert_eq!(resolved.y, 1.5);
    }

    #[test]
    fn sight_is_blocked_by_walls_between_points() {
        let (tiles, columns, rows) = room(&["#######", "#..#..#", "#.....#", "#######"]);
        let view = TileView::new(&tiles, columns, rows);

        assert!(!line_of_sight(view, Vec2::new(1.5, 1.5), Vec2::new(5.5, 1.5)));
        assert!(line_of_sight(view, Vec2::new(1.5, 2.5), Vec2::new(5.5, 2.5)));
        assert!(line_of_sight(view, Vec2::new(1.5, 2.5), Vec2::new(1.5, 2.5)));
    }
}
