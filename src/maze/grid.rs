//! Maze grid representation
//!
//! A maze is a spanning tree over a `width × height` grid. Every visited cell
//! except the start stores the side its parent lies on, so following those
//! codes from any cell always walks back to the start.

use serde::{Deserialize, Serialize};

use crate::error::MazeError;

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another cell
    pub fn manhattan(&self, other: Cell) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// One of the four sides of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    /// Stable index (Top, Bottom, Left, Right)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::Top => 0,
            Direction::Bottom => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Not (yet) part of the tree
    #[default]
    Wall,
    /// Root of the spanning tree
    Start,
    /// Entered from the neighbour on this side
    Entered(Direction),
}

/// `width × height` grid of cell states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl MazeGrid {
    /// Grid filled with walls
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellState::Wall; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        assert!(
            cell.x < self.width && cell.y < self.height,
            "cell {cell:?} outside {}x{} grid",
            self.width,
            self.height
        );
        cell.y * self.width + cell.x
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> CellState {
        self.cells[self.index(cell)]
    }

    #[inline]
    pub fn set(&mut self, cell: Cell, state: CellState) {
        let idx = self.index(cell);
        self.cells[idx] = state;
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &state)| (Cell::new(i % self.width, i / self.width), state))
    }

    /// The neighbour of `cell` on `side`, if it is inside the grid
    pub fn step(&self, cell: Cell, side: Direction) -> Option<Cell> {
        match side {
            Direction::Top if cell.y > 0 => Some(Cell::new(cell.x, cell.y - 1)),
            Direction::Bottom if cell.y + 1 < self.height => Some(Cell::new(cell.x, cell.y + 1)),
            Direction::Left if cell.x > 0 => Some(Cell::new(cell.x - 1, cell.y)),
            Direction::Right if cell.x + 1 < self.width => Some(Cell::new(cell.x + 1, cell.y)),
            _ => None,
        }
    }

    /// In-bounds neighbours of `cell`, each tagged with the side that points
    /// from the neighbour back to `cell`.
    ///
    /// Order is left, right, above, below.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Cell, Direction)> + '_ {
        [
            Direction::Left,
            Direction::Right,
            Direction::Top,
            Direction::Bottom,
        ]
        .into_iter()
        .filter_map(move |side| self.step(cell, side).map(|n| (n, side.opposite())))
    }

    /// Parent of `cell` in the spanning tree (None for the start and walls)
    pub fn parent(&self, cell: Cell) -> Option<Cell> {
        match self.get(cell) {
            CellState::Entered(side) => self.step(cell, side),
            _ => None,
        }
    }

    /// True when `a` and `b` are joined by a spanning-tree edge
    pub fn is_connected(&self, a: Cell, b: Cell) -> bool {
        self.parent(a) == Some(b) || self.parent(b) == Some(a)
    }
}

/// Ordered cells from start to finish, each pair joined by a tree edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazePath {
    cells: Vec<Cell>,
}

impl MazePath {
    pub(crate) fn from_cells(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn finish(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Check that consecutive cells are adjacent and joined by a tree edge
    pub fn validate(&self, grid: &MazeGrid) -> Result<(), MazeError> {
        for (index, pair) in self.cells.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            if a.manhattan(b) != 1 || !grid.is_connected(a, b) {
                return Err(MazeError::BrokenPath { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_report_back_direction() {
        let grid = MazeGrid::new(3, 3);
        let center = Cell::new(1, 1);
        let neighbors: Vec<_> = grid.neighbors(center).collect();
        assert_eq!(
            neighbors,
            vec![
                (Cell::new(0, 1), Direction::Right),
                (Cell::new(2, 1), Direction::Left),
                (Cell::new(1, 0), Direction::Bottom),
                (Cell::new(1, 2), Direction::Top),
            ]
        );

        // Each neighbour steps back to the centre using its tag
        for (n, back) in neighbors {
            assert_eq!(grid.step(n, back), Some(center));
        }
    }

    #[test]
    fn test_corner_has_two_neighbors() {
        let grid = MazeGrid::new(2, 2);
        assert_eq!(grid.neighbors(Cell::new(0, 0)).count(), 2);
        assert_eq!(grid.neighbors(Cell::new(1, 1)).count(), 2);
    }

    #[test]
    fn test_path_validation() {
        let mut grid = MazeGrid::new(2, 2);
        grid.set(Cell::new(0, 0), CellState::Start);
        grid.set(Cell::new(1, 0), CellState::Entered(Direction::Left));
        grid.set(Cell::new(1, 1), CellState::Entered(Direction::Top));
        grid.set(Cell::new(0, 1), CellState::Entered(Direction::Right));

        let path = MazePath::from_cells(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
        ]);
        assert!(path.validate(&grid).is_ok());

        // (0,0) and (0,1) are adjacent but not joined by an edge
        let shortcut = MazePath::from_cells(vec![Cell::new(0, 0), Cell::new(0, 1)]);
        assert!(matches!(
            shortcut.validate(&grid),
            Err(MazeError::BrokenPath { index: 0 })
        ));
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_access_panics() {
        let grid = MazeGrid::new(2, 2);
        grid.get(Cell::new(2, 0));
    }
}
