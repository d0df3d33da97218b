//! Sokoban puzzle engine.
//!
//! [`Level`] parses a text level into a grid, player start and goal set;
//! [`Game`] applies moves and pushes to it and tracks completion.

mod game;
mod grid;
mod level;

pub use game::{
    CompletionPolicy, Direction, Game, GameConfig, MoveOutcome, MoveResult, ParseMoveError,
    Snapshot, parse_moves,
};
pub use grid::{Grid, Position, Tile};
pub use level::{EXAMPLE_LEVEL, Level, LevelError};
