//! Maze chamber geometry
//!
//! Every maze cell becomes a square chamber. Each side is built from two
//! wall segments with a door between them. Neighbouring chambers share a
//! side, so the later chamber disables its own copy.

use glam::Vec2;

use super::body::Body;
use crate::maze::Direction;

/// Distance between neighbouring chamber centers
pub const CHAMBER_SIZE: f32 = 340.0;
/// Wall thickness
pub const WALL_THICKNESS: f32 = 30.0;
/// Door width
pub const DOOR_WIDTH: f32 = 120.0;

/// Length of each wall segment beside a door, for horizontal sides
const TOP_WALL_LENGTH: f32 = (CHAMBER_SIZE - WALL_THICKNESS - DOOR_WIDTH) / 2.0;
/// Vertical sides also cover the corners
const SIDE_WALL_LENGTH: f32 = (CHAMBER_SIZE + WALL_THICKNESS - DOOR_WIDTH) / 2.0;

/// Indices of one chamber's bodies in the shared obstacle list
#[derive(Debug, Clone)]
pub struct Chamber {
    pub center: Vec2,
    walls: [[usize; 2]; 4],
    doors: [usize; 4],
}

impl Chamber {
    /// Append the chamber's 12 bodies to `obstacles`
    pub fn build(center: Vec2, obstacles: &mut Vec<Body>) -> Self {
        let half = CHAMBER_SIZE / 2.0;
        let mut push = |pos: Vec2, size: Vec2| {
            obstacles.push(Body::rect(center + pos, size));
            obstacles.len() - 1
        };

        let mut walls = [[0; 2]; 4];
        let mut doors = [0; 4];

        for side in Direction::ALL {
            let i = side.index();
            match side {
                Direction::Top | Direction::Bottom => {
                    let y = if side == Direction::Top { -half } else { half };
                    let offset = (DOOR_WIDTH + TOP_WALL_LENGTH) / 2.0;
                    let wall = Vec2::new(TOP_WALL_LENGTH, WALL_THICKNESS);
                    walls[i] = [
                        push(Vec2::new(-offset, y), wall),
                        push(Vec2::new(offset, y), wall),
                    ];
                    doors[i] = push(Vec2::new(0.0, y), Vec2::new(DOOR_WIDTH, WALL_THICKNESS));
                }
                Direction::Left | Direction::Right => {
                    let x = if side == Direction::Left { -half } else { half };
                    let offset = (DOOR_WIDTH + SIDE_WALL_LENGTH) / 2.0;
                    let wall = Vec2::new(WALL_THICKNESS, SIDE_WALL_LENGTH);
                    walls[i] = [
                        push(Vec2::new(x, -offset), wall),
                        push(Vec2::new(x, offset), wall),
                    ];
                    doors[i] = push(Vec2::new(x, 0.0), Vec2::new(WALL_THICKNESS, DOOR_WIDTH));
                }
            }
        }

        Self {
            center,
            walls,
            doors,
        }
    }

    /// Obstacle index of the door on `side`
    pub fn door(&self, side: Direction) -> usize {
        self.doors[side.index()]
    }

    /// Obstacle indices of the two wall segments on `side`
    pub fn walls(&self, side: Direction) -> [usize; 2] {
        self.walls[side.index()]
    }

    /// Show or hide a whole side (walls and door)
    pub fn set_side(&self, obstacles: &mut [Body], side: Direction, enabled: bool) {
        for idx in self.walls(side) {
            obstacles[idx].set_enabled(enabled);
        }
        obstacles[self.door(side)].set_enabled(enabled);
    }

    /// Open (hide) or close the door on `side`
    pub fn set_door(&self, obstacles: &mut [Body], side: Direction, open: bool) {
        obstacles[self.door(side)].set_enabled(!open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Boundary;
    use crate::sim::body::Spatial;

    #[test]
    fn test_chamber_geometry() {
        let mut obstacles = Vec::new();
        let chamber = Chamber::build(Vec2::ZERO, &mut obstacles);
        assert_eq!(obstacles.len(), 12);

        let [left, right] = chamber.walls(Direction::Top);
        assert_eq!(obstacles[left].pos, Vec2::new(-107.5, -170.0));
        assert_eq!(obstacles[right].pos, Vec2::new(107.5, -170.0));
        assert_eq!(obstacles[left].size(), Vec2::new(95.0, 30.0));

        let [upper, lower] = chamber.walls(Direction::Right);
        assert_eq!(obstacles[upper].pos, Vec2::new(170.0, -122.5));
        assert_eq!(obstacles[lower].pos, Vec2::new(170.0, 122.5));
        assert_eq!(obstacles[upper].size(), Vec2::new(30.0, 125.0));

        let door = &obstacles[chamber.door(Direction::Left)];
        assert_eq!(door.pos, Vec2::new(-170.0, 0.0));
        assert_eq!(door.size(), Vec2::new(30.0, 120.0));
    }

    #[test]
    fn test_sides_close_the_chamber() {
        let mut obstacles = Vec::new();
        Chamber::build(Vec2::new(340.0, 0.0), &mut obstacles);

        // Outer bounds span the chamber plus half a wall on each side
        let bounds = Boundary::union_of(obstacles.iter().map(|b| b.boundary()));
        assert_eq!(bounds, Boundary::new(155.0, 525.0, -185.0, 185.0));

        // Top side is continuous: wall, door, wall
        let mut spans: Vec<Boundary> = obstacles
            .iter()
            .map(|b| b.boundary())
            .filter(|b| b.bottom == -155.0)
            .collect();
        spans.sort_by(|a, b| a.left.total_cmp(&b.left));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].right, pair[1].left);
        }
    }

    #[test]
    fn test_side_and_door_toggles() {
        let mut obstacles = Vec::new();
        let chamber = Chamber::build(Vec2::ZERO, &mut obstacles);

        chamber.set_door(&mut obstacles, Direction::Bottom, true);
        assert!(!obstacles[chamber.door(Direction::Bottom)].is_active());
        assert!(obstacles[chamber.walls(Direction::Bottom)[0]].is_active());

        chamber.set_side(&mut obstacles, Direction::Left, false);
        assert_eq!(obstacles.iter().filter(|b| !b.is_active()).count(), 4);
    }
}
