use std::collections::BTreeSet;
use std::fmt;

use arrayvec::ArrayVec;
use log::{debug, info, trace};
use thiserror::Error;

use crate::grid::{Grid, Position, Tile};
use crate::level::{Level, LevelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
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

    /// Unit step as `(dx, dy)`; y grows downwards.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Left | Direction::Right => (self.sign(), 0),
            Direction::Up | Direction::Down => (0, self.sign()),
        }
    }

    fn sign(self) -> isize {
        match self {
            Direction::Left | Direction::Up => -1,
            Direction::Right | Direction::Down => 1,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Parse a single LURD character. Case is ignored: uppercase letters
    /// conventionally mark pushes but describe the same direction.
    pub fn from_char(ch: char) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| dir.to_char() == ch.to_ascii_lowercase())
    }

    /// Lowercase LURD letter.
    pub fn to_char(self) -> char {
        self.name().as_bytes()[0] as char
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid move '{ch}' at index {index}")]
pub struct ParseMoveError {
    pub ch: char,
    pub index: usize,
}

/// Parse a move sequence in LURD notation. Whitespace is skipped.
pub fn parse_moves(text: &str) -> Result<Vec<Direction>, ParseMoveError> {
    text.chars()
        .enumerate()
        .filter(|(_, ch)| !ch.is_whitespace())
        .map(|(index, ch)| Direction::from_char(ch).ok_or(ParseMoveError { ch, index }))
        .collect()
}

/// How the completed flag reacts once the puzzle has been solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Completion is sticky: disturbing a solved board keeps it complete.
    #[default]
    Latched,
    /// Completion is re-evaluated after every move.
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameConfig {
    /// Reject all moves once the puzzle is complete.
    pub lock_on_completion: bool,
    pub completion: CompletionPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player stepped onto an empty or goal cell.
    Walked,
    /// The player pushed a crate and followed it.
    Pushed,
    /// Wall, blocked crate, or grid edge. Nothing changed.
    Blocked,
    /// The puzzle is complete and the engine is configured to stop accepting moves.
    Locked,
}

impl MoveOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, MoveOutcome::Walked | MoveOutcome::Pushed)
    }
}

/// A move resolved against the current board, before it is applied.
#[derive(Debug, Clone, Copy)]
enum Step {
    Walk(Position),
    Push { target: Position, dest: Position },
    Blocked,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub outcome: MoveOutcome,
    pub completed: bool,
}

/// Owned copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub player: Position,
    pub grid: Grid,
    pub goals: BTreeSet<Position>,
    pub completed: bool,
    pub moves: usize,
    pub pushes: usize,
}

impl Snapshot {
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        self.grid.get(pos)
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        self.goals.contains(&pos)
    }

    pub fn crate_positions(&self) -> Vec<Position> {
        self.grid
            .iter()
            .filter(|&(_, tile)| tile == Tile::Crate)
            .map(|(pos, _)| pos)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    grid: Grid,
    player: Position,
    goals: BTreeSet<Position>,
    completed: bool,
    moves: usize,
    pushes: usize,
    config: GameConfig,
}

impl Game {
    pub fn new(level: Level, config: GameConfig) -> Self {
        Game {
            grid: level.grid,
            player: level.player,
            goals: level.goals,
            completed: false,
            moves: 0,
            pushes: 0,
            config,
        }
    }

    /// Load a level from text rows and start a game on it.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], config: GameConfig) -> Result<Self, LevelError> {
        Ok(Self::new(Level::from_rows(rows)?, config))
    }

    pub fn player_pos(&self) -> Position {
        self.player
    }

    pub fn get_tile(&self, pos: Position) -> Option<Tile> {
        self.grid.get(pos)
    }

    pub fn goals(&self) -> &BTreeSet<Position> {
        &self.goals
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Number of accepted moves, pushes included.
    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn pushes(&self) -> usize {
        self.pushes
    }

    pub fn crate_count(&self) -> usize {
        self.grid.count(Tile::Crate)
    }

    /// Check if every goal holds a crate (win condition).
    pub fn is_solved(&self) -> bool {
        self.goals
            .iter()
            .all(|&pos| self.grid.get(pos) == Some(Tile::Crate))
    }

    fn is_passable(&self, pos: Position) -> bool {
        self.grid.get(pos).is_some_and(Tile::is_passable)
    }

    /// Work out what a move in `dir` would do without applying it.
    fn plan(&self, dir: Direction) -> Step {
        if self.config.lock_on_completion && self.completed {
            return Step::Locked;
        }
        let Some(target) = self.grid.neighbor(self.player, dir) else {
            return Step::Blocked;
        };
        match self.grid.get(target) {
            Some(Tile::Empty | Tile::Goal) => Step::Walk(target),
            Some(Tile::Crate) => match self.grid.neighbor(target, dir) {
                Some(dest) if self.is_passable(dest) => Step::Push { target, dest },
                _ => Step::Blocked,
            },
            Some(Tile::Wall) | None => Step::Blocked,
        }
    }

    /// Directions in which a move would currently be accepted.
    pub fn legal_moves(&self) -> ArrayVec<Direction, 4> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| matches!(self.plan(dir), Step::Walk(_) | Step::Push { .. }))
            .collect()
    }

    /// Attempt to move the player one cell, pushing a crate if one is in the way.
    ///
    /// Illegal moves are not errors: they leave the game untouched and report
    /// `Blocked`. The completed flag is refreshed after every attempt.
    pub fn make_move(&mut self, dir: Direction) -> MoveResult {
        let outcome = match self.plan(dir) {
            Step::Walk(target) => {
                trace!("Player {} -> {}", self.player, target);
                self.player = target;
                self.moves += 1;
                MoveOutcome::Walked
            }
            Step::Push { target, dest } => {
                trace!("Push {} crate {} -> {}", dir, target, dest);
                self.grid.set(dest, Tile::Crate);
                self.grid.set(target, Tile::Empty);
                self.player = target;
                self.moves += 1;
                self.pushes += 1;
                MoveOutcome::Pushed
            }
            Step::Blocked => {
                debug!("Move {} from {} blocked", dir, self.player);
                MoveOutcome::Blocked
            }
            Step::Locked => {
                debug!("Move {} ignored: level already complete", dir);
                MoveOutcome::Locked
            }
        };

        self.update_completion();

        MoveResult {
            outcome,
            completed: self.completed,
        }
    }

    fn update_completion(&mut self) {
        let solved = self.is_solved();
        if solved && !self.completed {
            info!(
                "Level complete after {} moves, {} pushes",
                self.moves, self.pushes
            );
        }
        self.completed = match self.config.completion {
            CompletionPolicy::Latched => self.completed || solved,
            CompletionPolicy::Live => solved,
        };
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.player,
            grid: self.grid.clone(),
            goals: self.goals.clone(),
            completed: self.completed,
            moves: self.moves,
            pushes: self.pushes,
        }
    }
}
