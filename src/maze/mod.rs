//! Maze generation and solving
//!
//! Square mazes are produced by rejection sampling: generate, trace the path
//! from start to finish, and retry until the path is at least twice the maze
//! size long. The retry loop is capped so pathological inputs fail loudly.

pub mod generator;
pub mod grid;
pub mod solver;

use std::task::Poll;

use rand::Rng;

pub use generator::{GeneratedMaze, generate};
pub use grid::{Cell, CellState, Direction, MazeGrid, MazePath};
pub use solver::solve;

use crate::error::MazeError;

/// A generated maze together with its verified solution
#[derive(Debug, Clone)]
pub struct SolvedMaze {
    pub grid: MazeGrid,
    pub start: Cell,
    pub finish: Cell,
    pub path: MazePath,
}

impl SolvedMaze {
    /// Side length of the (square) maze
    pub fn size(&self) -> usize {
        self.grid.width()
    }
}

/// Shortest acceptable solution for a maze of the given size
#[inline]
pub fn min_path_length(size: usize) -> usize {
    2 * size
}

/// Resumable generate-and-solve loop
///
/// Each call to [`MazeBuildTask::advance`] runs a bounded number of attempts,
/// so a host can spread a long search across several frames.
#[derive(Debug, Clone)]
pub struct MazeBuildTask {
    size: usize,
    max_attempts: u32,
    attempts: u32,
}

impl MazeBuildTask {
    pub fn new(size: usize, max_attempts: u32) -> Result<Self, MazeError> {
        if size < 2 {
            return Err(MazeError::InvalidDimensions {
                width: size,
                height: size,
            });
        }
        Ok(Self {
            size,
            max_attempts,
            attempts: 0,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run up to `budget` attempts
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        budget: u32,
        rng: &mut R,
    ) -> Poll<Result<SolvedMaze, MazeError>> {
        let min_length = min_path_length(self.size);

        for _ in 0..budget {
            if self.attempts >= self.max_attempts {
                break;
            }
            self.attempts += 1;

            let maze = match generate(self.size, self.size, rng) {
                Ok(maze) => maze,
                Err(e) => return Poll::Ready(Err(e)),
            };

            match solve(&maze.grid, maze.start, maze.finish) {
                Some(path) if path.len() >= min_length => {
                    log::debug!(
                        "Maze {}x{} solved after {} attempt(s), path length {}",
                        self.size,
                        self.size,
                        self.attempts,
                        path.len()
                    );
                    return Poll::Ready(Ok(SolvedMaze {
                        grid: maze.grid,
                        start: maze.start,
                        finish: maze.finish,
                        path,
                    }));
                }
                Some(path) => {
                    log::trace!("Attempt {}: path too short ({})", self.attempts, path.len())
                }
                None => log::trace!("Attempt {}: finish unreachable", self.attempts),
            }
        }

        if self.attempts >= self.max_attempts {
            log::warn!(
                "Giving up on {}x{} maze after {} attempts",
                self.size,
                self.size,
                self.attempts
            );
            return Poll::Ready(Err(MazeError::UnsolvableAfterRetries {
                size: self.size,
                attempts: self.attempts,
                min_length,
            }));
        }

        Poll::Pending
    }
}

/// Generate a maze whose solution is at least [`min_path_length`] long
pub fn build_solvable<R: Rng + ?Sized>(
    size: usize,
    max_attempts: u32,
    rng: &mut R,
) -> Result<SolvedMaze, MazeError> {
    let mut task = MazeBuildTask::new(size, max_attempts)?;
    loop {
        if let Poll::Ready(result) = task.advance(max_attempts.max(1), rng) {
            return result;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_build_five_by_five() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let maze = build_solvable(5, 10_000, &mut rng).unwrap();

        assert!(maze.path.len() >= 10);
        assert_eq!(maze.path.start(), Some(maze.start));
        assert_eq!(maze.path.finish(), Some(maze.finish));
        maze.path.validate(&maze.grid).unwrap();
    }

    #[test]
    fn test_zero_attempts_fails() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(matches!(
            build_solvable(5, 0, &mut rng).unwrap_err(),
            MazeError::UnsolvableAfterRetries {
                size: 5,
                attempts: 0,
                min_length: 10
            }
        ));
    }

    #[test]
    fn test_two_by_two_never_long_enough() {
        // The start always takes both of its neighbours as children, so no
        // path from it can cover all four cells.
        let mut rng = Pcg32::seed_from_u64(11);
        assert!(matches!(
            build_solvable(2, 500, &mut rng),
            Err(MazeError::UnsolvableAfterRetries { attempts: 500, .. })
        ));
    }

    #[test]
    fn test_invalid_size() {
        assert!(MazeBuildTask::new(1, 10).is_err());
    }

    #[test]
    fn test_task_respects_budget() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut task = MazeBuildTask::new(9, 10_000).unwrap();

        let mut polls = 0;
        let result = loop {
            polls += 1;
            let before = task.attempts();
            match task.advance(1, &mut rng) {
                Poll::Ready(result) => break result,
                Poll::Pending => assert_eq!(task.attempts(), before + 1),
            }
        };

        let maze = result.unwrap();
        assert_eq!(polls, task.attempts());
        assert!(maze.path.len() >= min_path_length(9));
    }

    proptest! {
        #[test]
        fn prop_built_mazes_are_valid(seed in any::<u64>(), size in 3usize..9) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = build_solvable(size, 100_000, &mut rng).unwrap();
            prop_assert!(maze.path.len() >= min_path_length(size));
            prop_assert_ne!(maze.start, maze.finish);
            prop_assert!(maze.path.validate(&maze.grid).is_ok());
        }
    }
}
