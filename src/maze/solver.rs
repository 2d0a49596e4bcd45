//! Spanning-tree path tracing
//!
//! Walks down the tree from the start, following only edges whose child cell
//! points back at the current cell. Since the maze is a tree there is at most
//! one path to any cell, so the first time the finish is popped the parent
//! links describe the whole route.

use std::collections::VecDeque;

use super::grid::{Cell, CellState, MazeGrid, MazePath};

/// Trace the path from `start` to `finish`
///
/// Returns `None` when the finish is not reachable through the tree (it was
/// never visited during generation, or the grid is malformed).
pub fn solve(grid: &MazeGrid, start: Cell, finish: Cell) -> Option<MazePath> {
    let width = grid.width();
    let height = grid.height();
    let slot = |cell: Cell| cell.y * width + cell.x;

    let mut seen = vec![false; width * height];
    let mut parent: Vec<Option<Cell>> = vec![None; width * height];
    let mut stack = VecDeque::from([start]);
    seen[slot(start)] = true;

    let mut found = false;
    while let Some(current) = stack.pop_back() {
        if current == finish {
            found = true;
            break;
        }

        for (next, back) in grid.neighbors(current) {
            if !seen[slot(next)] && grid.get(next) == CellState::Entered(back) {
                seen[slot(next)] = true;
                parent[slot(next)] = Some(current);
                stack.push_front(next);
            }
        }
    }

    if !found {
        return None;
    }

    let mut cells = vec![finish];
    let mut cursor = finish;
    while let Some(prev) = parent[slot(cursor)] {
        cells.push(prev);
        cursor = prev;
    }
    cells.reverse();

    Some(MazePath::from_cells(cells))
}
