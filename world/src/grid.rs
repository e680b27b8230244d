use tablequest_core::{TileKind, TileView};

/// Row-major tile grid of the loaded level.
#[derive(Clone, Debug, Default)]
pub(crate) struct TileGrid {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Creates a grid from row-major tiles. Missing tiles are filled with
    /// walls and surplus tiles are dropped.
    #[must_use]
    pub(crate) fn new(columns: u32, rows: u32, mut tiles: Vec<TileKind>) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        tiles.resize(capacity, TileKind::OUT_OF_BOUNDS);
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Read-only view used by systems and renderers.
    #[must_use]
    pub(crate) fn view(&self) -> TileView<'_> {
        TileView::new(&self.tiles, self.columns, self.rows)
    }

    /// Returns the tile at the coordinate; out of range reads as a wall.
    #[must_use]
    pub(crate) fn tile_at(&self, column: i32, row: i32) -> TileKind {
        self.view().tile_at(column, row)
    }

    /// Replaces the tile at the coordinate. Returns whether a tile changed.
    pub(crate) fn set_tile(&mut self, column: i32, row: i32, tile: TileKind) -> bool {
        let Some(index) = self.index(column, row) else {
            return false;
        };
        match self.tiles.get_mut(index) {
            Some(slot) if *slot != tile => {
                *slot = tile;
                true
            }
            _ => false,
        }
    }

    /// Clears every tile of the given kind, returning how many were replaced.
    pub(crate) fn clear_all(&mut self, kind: TileKind) -> usize {
        let mut cleared = 0;
        for slot in self.tiles.iter_mut().filter(|slot| **slot == kind) {
            *slot = TileKind::Empty;
            cleared += 1;
        }
        cleared
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_tile_ignores_out_of_range_coordinates() {
        let mut grid = TileGrid::new(2, 2, vec![TileKind::Door; 4]);

        assert!(!grid.set_tile(2, 0, TileKind::Empty));
        assert!(!grid.set_tile(-1, 1, TileKind::Empty));
        assert!(grid.set_tile(1, 1, TileKind::Empty));
        assert_eq!(grid.tile_at(1, 1), TileKind::Empty);
        assert_eq!(grid.tile_at(5, 5), TileKind::OUT_OF_BOUNDS);
    }

    #[test]
    fn clear_all_removes_every_matching_tile() {
        let tiles = vec![
            TileKind::LockedGate,
            TileKind::BrickWall,
            TileKind::LockedGate,
            TileKind::Empty,
        ];
        let mut grid = TileGrid::new(2, 2, tiles);

        assert_eq!(grid.clear_all(TileKind::LockedGate), 2);
        assert_eq!(grid.tile_at(0, 0), TileKind::Empty);
        assert_eq!(grid.tile_at(1, 0), TileKind::BrickWall);
        assert_eq!(grid.clear_all(TileKind::LockedGate), 0);
    }
}
