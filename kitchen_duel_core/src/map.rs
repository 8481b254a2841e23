use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::{
    Position, Team,
    tile::{Tile, TileKind},
};

/// A dense 2D grid stored row-major in a flat vector.
///
/// Used for tile layouts and for the per-team occupancy index. Cells are
/// addressed by `(x, y)` with `x < width` and `y < height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a grid with the given dimensions, every cell set to `T::default()`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Self
    where
        T: Default + Clone,
    {
        let size = width.checked_mul(height).expect("Grid size overflow");
        Grid {
            width,
            height,
            cells: vec![T::default(); size],
        }
    }

    /// Creates a grid whose cells are produced by `f(x, y)`.
    ///
    /// # Arguments
    ///
    /// * `width`, `height`: Grid dimensions.
    /// * `f`: Called once per cell, bottom row first.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn from_generator<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let size = width.checked_mul(height).expect("Grid size overflow");
        let mut cells = Vec::with_capacity(size);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Grid {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows; row 0 is the bottom of the kitchen.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Converts (x, y) coordinates to a flat vector index.
    #[inline]
    fn coords_to_index(&self, x: usize, y: usize) -> Option<usize> {
        if self.is_valid(x, y) {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Returns `true` if `(x, y)` addresses a cell of this grid.
    #[inline]
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Like [`Grid::is_valid`] but accepts signed coordinates; negatives are out of bounds.
    #[inline]
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && self.is_valid(x as usize, y as usize)
    }

    /// Borrows the cell at `(x, y)`.
    ///
    /// # Arguments
    ///
    /// * `x`: Column, counted from the left.
    /// * `y`: Row, counted from the bottom.
    ///
    /// Returns `None` when the coordinates fall outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        let index = self.coords_to_index(x, y)?;
        self.cells.get(index)
    }

    /// Mutable counterpart of [`Grid::get`]; `None` outside the grid.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        let index = self.coords_to_index(x, y)?;
        self.cells.get_mut(index)
    }

    /// Iterates cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Yields every coordinate column by column: all of `x = 0` bottom to top, then `x = 1`, ...
    ///
    /// This is the scan order used for every "first tile found" fallback.
    pub fn column_major_positions(&self) -> impl Iterator<Item = Position> + use<T> {
        let (width, height) = (self.width, self.height);
        (0..width).flat_map(move |x| (0..height).map(move |y| Position { x, y }))
    }

    /// Builds a grid of the same shape by mapping every cell.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: Position) -> &Self::Output {
        match self.coords_to_index(index.x, index.y) {
            Some(idx) => &self.cells[idx],
            None => panic!(
                "Grid index ({}, {}) out of bounds for grid size ({}, {})",
                index.x, index.y, self.width, self.height
            ),
        }
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        let (width, height) = (self.width, self.height);
        match self.coords_to_index(index.x, index.y) {
            Some(idx) => &mut self.cells[idx],
            None => panic!(
                "Grid index ({}, {}) out of bounds for grid size ({}, {})",
                index.x, index.y, width, height
            ),
        }
    }
}

/// Orthogonal neighbours probed before falling back to a full scan.
const ADJACENT: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// One team's kitchen: a fixed-size grid of stateful tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenMap {
    team: Team,
    tiles: Grid<Tile>,
}

impl KitchenMap {
    /// Instantiates fresh tiles (with their initial payload) for every kind in the layout.
    pub fn from_layout(team: Team, layout: &Grid<TileKind>) -> Self {
        KitchenMap {
            team,
            tiles: layout.map(|kind| Tile::new(*kind)),
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        self.tiles.contains(x, y)
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tiles.get(x, y)
    }

    pub(crate) fn tile_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(x, y)
    }

    fn flag(&self, x: isize, y: isize, f: impl Fn(&Tile) -> bool) -> bool {
        self.in_bounds(x, y) && f(&self.tiles[Position::new(x as usize, y as usize)])
    }

    pub fn is_walkable(&self, x: isize, y: isize) -> bool {
        self.flag(x, y, Tile::is_walkable)
    }

    pub fn is_placeable(&self, x: isize, y: isize) -> bool {
        self.flag(x, y, Tile::is_placeable)
    }

    pub fn is_interactable(&self, x: isize, y: isize) -> bool {
        self.flag(x, y, Tile::is_interactable)
    }

    pub fn is_kind(&self, x: isize, y: isize, kind: TileKind) -> bool {
        self.flag(x, y, |tile| tile.kind() == kind)
    }

    /// Finds a tile of `kind` next to `(x, y)`, otherwise the first one in column-major order.
    pub fn nearest_of_kind(&self, x: usize, y: usize, kind: TileKind) -> Option<Position> {
        let adjacent = ADJACENT.iter().find_map(|&(dx, dy)| {
            let (nx, ny) = (x as isize + dx, y as isize + dy);
            self.is_kind(nx, ny, kind)
                .then(|| Position::new(nx as usize, ny as usize))
        });
        adjacent.or_else(|| {
            self.tiles
                .column_major_positions()
                .find(|pos| self.tiles[*pos].kind() == kind)
        })
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut Grid<Tile> {
        &mut self.tiles
    }
}
