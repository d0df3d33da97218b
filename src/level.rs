use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::grid::{Grid, Position, Tile};

/// The built-in level.
pub const EXAMPLE_LEVEL: [&str; 11] = [
    "    #####          ",
    "    #   #          ",
    "    #o  #          ",
    "  ###  o##         ",
    "  #  o o #         ",
    "### # ## #   ######",
    "#   # ## #####  ..#",
    "# o  o          ..#",
    "##### ### #@##  ..#",
    "    #     #########",
    "    #######        ",
];

/// Error type for level loading.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Empty level")]
    Empty,
    #[error("No player found in level")]
    MissingPlayer,
    #[error("Multiple players found at {first} and {second}")]
    DuplicatePlayer { first: Position, second: Position },
}

/// A parsed level: the starting grid, player position and goal set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub player: Position,
    pub grid: Grid,
    pub goals: BTreeSet<Position>,
}

impl Level {
    /// Parse a level from rows of text.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - `o` = Crate
    /// - `.` = Goal
    /// - `@` = Player (stored as an empty cell)
    /// - anything else = Empty
    ///
    /// Rows may differ in length. Cells past the end of a short row are not
    /// part of the level: nothing can move into them.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        let row_lens: Vec<usize> = rows.iter().map(|row| row.as_ref().chars().count()).collect();
        if row_lens.iter().all(|&len| len == 0) {
            return Err(LevelError::Empty);
        }

        let mut grid = Grid::with_row_lens(row_lens);
        let mut goals = BTreeSet::new();
        let mut player = None;

        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                let pos = Position(x, y);
                match ch {
                    '#' => grid.set(pos, Tile::Wall),
                    'o' => grid.set(pos, Tile::Crate),
                    '.' => {
                        grid.set(pos, Tile::Goal);
                        goals.insert(pos);
                    }
                    '@' => {
                        if let Some(first) = player {
                            return Err(LevelError::DuplicatePlayer { first, second: pos });
                        }
                        player = Some(pos);
                    }
                    _ => {}
                }
            }
        }

        let player = player.ok_or(LevelError::MissingPlayer)?;

        debug!(
            "Loaded {}x{} level: player at {}, {} goals, {} crates",
            grid.width(),
            grid.height(),
            player,
            goals.len(),
            grid.count(Tile::Crate)
        );

        Ok(Level {
            player,
            grid,
            goals,
        })
    }

    /// Parse a level from a block of text, one row per line.
    pub fn from_text(text: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text.lines().collect();
        Self::from_rows(&rows)
    }

    /// Parse a level from a text file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_text(&contents)
    }
}
