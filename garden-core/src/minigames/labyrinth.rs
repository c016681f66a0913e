//! Grid maze: walk the rabbit to the carrot.

use super::{Action, Rejection, Round, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Open,
    Wall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Turkish label used by the direction game.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "Yukarı",
            Direction::Down => "Aşağı",
            Direction::Left => "Sol",
            Direction::Right => "Sağ",
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "up" | "u" | "yukarı" => Some(Direction::Up),
            "down" | "d" | "aşağı" => Some(Direction::Down),
            "left" | "l" | "sol" => Some(Direction::Left),
            "right" | "r" | "sağ" => Some(Direction::Right),
            _ => None,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze has no cells")]
    Empty,

    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("{which} {pos:?} is outside the grid")]
    OutOfBounds { which: &'static str, pos: Position },

    #[error("{which} {pos:?} is a wall")]
    Blocked { which: &'static str, pos: Position },
}

/// A rectangular grid of cells with a start and a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    grid: Vec<Vec<Cell>>,
    start: Position,
    goal: Position,
}

impl Maze {
    pub fn new(grid: Vec<Vec<Cell>>, start: Position, goal: Position) -> Result<Self, MazeError> {
        let width = grid.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(MazeError::Empty);
        }
        if let Some((row, cells)) = grid.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(MazeError::Ragged {
                row,
                len: cells.len(),
                expected: width,
            });
        }
        let maze = Self { grid, start, goal };
        for (which, pos) in [("start", start), ("goal", goal)] {
            match maze.cell(pos) {
                None => return Err(MazeError::OutOfBounds { which, pos }),
                Some(Cell::Wall) => return Err(MazeError::Blocked { which, pos }),
                Some(Cell::Open) => {}
            }
        }
        Ok(maze)
    }

    /// Build from rows of 0 (open) and 1 (wall).
    pub fn from_bits(rows: &[&[u8]], start: Position, goal: Position) -> Result<Self, MazeError> {
        let grid = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&b| if b == 0 { Cell::Open } else { Cell::Wall })
                    .collect()
            })
            .collect();
        Self::new(grid, start, goal)
    }

    /// The built-in 5x5 maze.
    pub fn classic() -> Self {
        use Cell::{Open as O, Wall as W};
        Self {
            grid: vec![
                vec![O, O, W, O, O],
                vec![W, O, O, O, W],
                vec![O, O, W, O, O],
                vec![O, W, W, W, O],
                vec![O, O, O, O, O],
            ],
            start: Position::new(0, 0),
            goal: Position::new(4, 4),
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.grid[0].len()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// `None` outside the grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.grid.get(pos.row)?.get(pos.col).copied()
    }

    fn step(&self, from: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        let row = from.row.checked_add_signed(dr)?;
        let col = from.col.checked_add_signed(dc)?;
        (row < self.rows() && col < self.cols()).then_some(Position::new(row, col))
    }
}

#[derive(Debug, Clone)]
pub struct LabyrinthRound {
    maze: Maze,
    player: Position,
}

impl LabyrinthRound {
    pub fn new(maze: Maze) -> Self {
        let player = maze.start();
        Self { maze, player }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> Position {
        self.player
    }
}

impl Round for LabyrinthRound {
    fn evaluate(&mut self, action: &Action) -> Verdict {
        let Action::Move(dir) = action else {
            return Verdict::Rejected(Rejection::WrongGame);
        };
        if self.player == self.maze.goal() {
            return Verdict::Rejected(Rejection::AlreadyDone);
        }
        let Some(next) = self.maze.step(self.player, *dir) else {
            return Verdict::Rejected(Rejection::OffGrid);
        };
        if self.maze.cell(next) == Some(Cell::Wall) {
            return Verdict::Rejected(Rejection::Wall);
        }
        self.player = next;

        if next == self.maze.goal() {
            Verdict::Win
        } else {
            Verdict::Continue
        }
    }

    fn host_message(&self) -> String {
        "Tavşanı havuca götür!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    fn small() -> LabyrinthRound {
        let maze = Maze::from_bits(
            &[&[0, 0, 1], &[0, 1, 0], &[0, 0, 0]],
            Position::new(0, 0),
            Position::new(2, 2),
        )
        .unwrap();
        LabyrinthRound::new(maze)
    }

    #[test]
    fn test_down_down_right_right_wins() {
        let mut round = small();
        assert_eq!(round.evaluate(&Action::Move(Down)), Verdict::Continue);
        assert_eq!(round.evaluate(&Action::Move(Down)), Verdict::Continue);
        assert_eq!(round.evaluate(&Action::Move(Right)), Verdict::Continue);
        assert_eq!(round.evaluate(&Action::Move(Right)), Verdict::Win);
        assert_eq!(round.player(), Position::new(2, 2));
    }

    #[test]
    fn test_wall_blocks() {
        let mut round = small();
        assert_eq!(round.evaluate(&Action::Move(Right)), Verdict::Continue);
        assert_eq!(
            round.evaluate(&Action::Move(Right)),
            Verdict::Rejected(Rejection::Wall)
        );
        assert_eq!(round.player(), Position::new(0, 1));
    }

    #[test]
    fn test_edges_block() {
        let mut round = small();
        assert_eq!(
            round.evaluate(&Action::Move(Up)),
            Verdict::Rejected(Rejection::OffGrid)
        );
        assert_eq!(
            round.evaluate(&Action::Move(Left)),
            Verdict::Rejected(Rejection::OffGrid)
        );
        assert_eq!(round.player(), Position::new(0, 0));
    }

    #[test]
    fn test_player_never_on_wall_or_off_grid() {
        let mut round = LabyrinthRound::new(Maze::classic());
        let script = [Right, Right, Down, Down, Down, Right, Up, Left, Left, Down, Down, Right, Right, Right, Right];
        for dir in script.iter().cycle().take(200) {
            round.evaluate(&Action::Move(*dir));
            let p = round.player();
            assert!(p.row < 5 && p.col < 5);
            assert_eq!(round.maze().cell(p), Some(Cell::Open));
        }
    }

    #[test]
    fn test_classic_is_solvable() {
        let mut round = LabyrinthRound::new(Maze::classic());
        let path = [Right, Down, Right, Right, Down, Right, Down, Down];
        let verdicts: Vec<Verdict> = path.iter().map(|d| round.evaluate(&Action::Move(*d))).collect();
        assert_eq!(verdicts.last(), Some(&Verdict::Win));
        assert!(verdicts.iter().all(|v| !matches!(v, Verdict::Rejected(_))));
    }

    #[test]
    fn test_maze_validation() {
        assert_eq!(
            Maze::from_bits(&[], Position::new(0, 0), Position::new(0, 0)),
            Err(MazeError::Empty)
        );
        assert!(matches!(
            Maze::from_bits(&[&[0, 0], &[0]], Position::new(0, 0), Position::new(0, 1)),
            Err(MazeError::Ragged { row: 1, .. })
        ));
        assert!(matches!(
            Maze::from_bits(&[&[0, 1]], Position::new(0, 0), Position::new(0, 1)),
            Err(MazeError::Blocked { which: "goal", .. })
        ));
        assert!(matches!(
            Maze::from_bits(&[&[0, 0]], Position::new(3, 0), Position::new(0, 1)),
            Err(MazeError::OutOfBounds { which: "start", .. })
        ));
    }

    #[test]
    fn test_direction_words() {
        assert_eq!(Direction::from_word("Sağ"), Some(Right));
        assert_eq!(Direction::from_word("down"), Some(Down));
        assert_eq!(Direction::from_word("sideways"), None);
    }
}
