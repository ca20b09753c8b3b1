use std::fmt;
use std::str::FromStr;

use crate::error::GameError;
use crate::grid::Position;

/// The four possible move directions.
///
/// The discriminants are the numeric codes hosts use to talk to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// All four directions, in code order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Index of this direction in [`Direction::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Cells of lane `index` on a `size`x`size` grid, target-most first.
    ///
    /// A lane is a column for vertical moves and a row for horizontal ones.
    /// Reading the returned positions in order walks the lane against the
    /// direction of travel, so the first entry is where tiles pile up.
    pub fn lane(self, size: usize, index: usize) -> Vec<Position> {
        (0..size)
            .map(|step| {
                let far = size - 1 - step;
                match self {
                    Direction::Up => Position::new(step, index),
                    Direction::Down => Position::new(far, index),
                    Direction::Left => Position::new(index, step),
                    Direction::Right => Position::new(index, far),
                }
            })
            .collect()
    }
}

impl TryFrom<u8> for Direction {
    type Error = GameError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            _ => Err(GameError::InvalidDirection(code)),
        }
    }
}

impl FromStr for Direction {
    type Err = GameError;

    /// Accepts direction names and WASD keys, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Direction::Up),
            "down" | "s" => Ok(Direction::Down),
            "left" | "a" => Ok(Direction::Left),
            "right" | "d" => Ok(Direction::Right),
            _ => Err(GameError::UnknownDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_code() {
        assert_eq!(Direction::try_from(0), Ok(Direction::Up));
        assert_eq!(Direction::try_from(1), Ok(Direction::Down));
        assert_eq!(Direction::try_from(2), Ok(Direction::Left));
        assert_eq!(Direction::try_from(3), Ok(Direction::Right));
        assert_eq!(Direction::try_from(4), Err(GameError::InvalidDirection(4)));
        assert_eq!(
            Direction::try_from(255),
            Err(GameError::InvalidDirection(255))
        );
    }

    #[test]
    fn test_all_matches_index() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("s".parse::<Direction>(), Ok(Direction::Down));
        assert_eq!(" left ".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!("right".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!("D".parse::<Direction>(), Ok(Direction::Right));
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(GameError::UnknownDirection(_))
        ));
    }

    #[test]
    fn test_lane_orders_target_first() {
        let p = Position::new;
        assert_eq!(Direction::Up.lane(3, 1), vec![p(0, 1), p(1, 1), p(2, 1)]);
        assert_eq!(Direction::Down.lane(3, 1), vec![p(2, 1), p(1, 1), p(0, 1)]);
        assert_eq!(Direction::Left.lane(3, 2), vec![p(2, 0), p(2, 1), p(2, 2)]);
        assert_eq!(Direction::Right.lane(3, 2), vec![p(2, 2), p(2, 1), p(2, 0)]);
    }
}
