//! Randomized frontier-expansion maze generator
//!
//! Grows a spanning tree from a random start cell. Each step pulls a cell from
//! the back third of the frontier stack (so corridors run long, but not as
//! strictly as a pure depth-first walk) and attaches at most two of its unseen
//! neighbours.

use rand::Rng;
use rand::seq::SliceRandom;

use super::grid::{Cell, CellState, MazeGrid};
use crate::error::MazeError;

/// Children attached per expansion step
const MAX_BRANCHES: usize = 2;

/// Output of one generation attempt
#[derive(Debug, Clone)]
pub struct GeneratedMaze {
    pub grid: MazeGrid,
    pub start: Cell,
    pub finish: Cell,
}

/// Generate a `width × height` maze
///
/// The finish is picked at random and is distinct from the start; nothing is
/// promised about the distance between them.
pub fn generate<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    rng: &mut R,
) -> Result<GeneratedMaze, MazeError> {
    if width < 2 || height < 2 {
        return Err(MazeError::InvalidDimensions { width, height });
    }

    let mut grid = MazeGrid::new(width, height);
    let mut seen = vec![false; width * height];
    let mut frontier: Vec<Cell> = Vec::with_capacity(width * height);

    let start = random_cell(width, height, rng);
    seen[start.y * width + start.x] = true;
    grid.set(start, CellState::Start);
    frontier.push(start);

    // Only the start is seen so far, so this terminates quickly
    let finish = loop {
        let candidate = random_cell(width, height, rng);
        if !seen[candidate.y * width + candidate.x] {
            break candidate;
        }
    };

    let mut neighbors = Vec::with_capacity(4);
    while !frontier.is_empty() {
        let len = frontier.len();
        let biased = len as f64 * (2.0 / 3.0) + rng.random::<f64>() * len as f64 / 3.0;
        let index = (biased.floor() as usize).min(len - 1);
        let current = frontier.remove(index);

        neighbors.clear();
        neighbors.extend(grid.neighbors(current));
        neighbors.shuffle(rng);

        let mut attached = 0;
        for &(next, back) in &neighbors {
            if attached == MAX_BRANCHES {
                break;
            }
            let slot = &mut seen[next.y * width + next.x];
            if !*slot {
                *slot = true;
                grid.set(next, CellState::Entered(back));
                frontier.push(next);
                attached += 1;
            }
        }
    }

    Ok(GeneratedMaze {
        grid,
        start,
        finish,
    })
}

fn random_cell<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Cell {
    Cell::new(rng.random_range(0..width), rng.random_range(0..height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    /// Walk parent links from every visited cell; each must reach the start
    /// without revisiting a cell.
    fn assert_spanning_tree(maze: &GeneratedMaze) {
        let grid = &maze.grid;
        let total = grid.width() * grid.height();

        let starts: Vec<_> = grid
            .cells()
            .filter(|(_, s)| *s == CellState::Start)
            .map(|(c, _)| c)
            .collect();
        assert_eq!(starts, vec![maze.start]);

        for (cell, state) in grid.cells() {
            if state == CellState::Wall {
                continue;
            }

            let mut visited = HashSet::new();
            let mut current = cell;
            while current != maze.start {
                assert!(visited.insert(current), "cycle through {current:?}");
                assert!(visited.len() <= total);
                let parent = grid.parent(current).expect("non-start cell has a parent");
                assert_eq!(parent.manhattan(current), 1);
                current = parent;
            }
        }
    }

    #[test]
    fn test_rejects_small_dimensions() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(matches!(
            generate(1, 5, &mut rng).unwrap_err(),
            MazeError::InvalidDimensions {
                width: 1,
                height: 5
            }
        ));
        assert!(generate(5, 0, &mut rng).is_err());
    }

    #[test]
    fn test_generates_spanning_tree() {
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = generate(7, 5, &mut rng).unwrap();
            assert_ne!(maze.start, maze.finish);
            assert_spanning_tree(&maze);
        }
    }

    #[test]
    fn test_minimum_size_maze() {
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = generate(2, 2, &mut rng).unwrap();
            assert_ne!(maze.start, maze.finish);
            assert_spanning_tree(&maze);
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = generate(9, 9, &mut Pcg32::seed_from_u64(42)).unwrap();
        let b = generate(9, 9, &mut Pcg32::seed_from_u64(42)).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.start, b.start);
        assert_eq!(a.finish, b.finish);
    }
}
