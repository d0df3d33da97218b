use clap::Parser;
use log::LevelFilter;
use sokoban::{
    CompletionPolicy, Direction, EXAMPLE_LEVEL, Game, GameConfig, Level, MoveOutcome, Position,
    Snapshot, Tile, parse_moves,
};

fn glyph(tile: Tile) -> char {
    match tile {
        Tile::Wall => '#',
        Tile::Crate => 'o',
        Tile::Goal => '.',
        Tile::Empty => ' ',
    }
}

/// Draw a snapshot as text. Goals are drawn under empty cells, so a goal
/// vacated by a crate still shows up.
fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for (y, row) in snapshot.grid.rows().enumerate() {
        let mut line = String::new();
        for (x, &tile) in row.iter().enumerate() {
            let pos = Position(x, y);
            let ch = if pos == snapshot.player {
                '@'
            } else if tile == Tile::Empty && snapshot.is_goal(pos) {
                '.'
            } else {
                glyph(tile)
            };
            line.push(ch);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    if snapshot.completed {
        out.push_str("Level complete!\n");
    }
    out
}

fn play(game: &mut Game, moves: &[Direction], print_steps: bool) {
    let total = moves.len();
    for (i, &dir) in moves.iter().enumerate() {
        let result = game.make_move(dir);
        if print_steps {
            let verb = match result.outcome {
                MoveOutcome::Walked => "Move",
                MoveOutcome::Pushed => "Push",
                MoveOutcome::Blocked => "Blocked",
                MoveOutcome::Locked => "Locked",
            };
            println!(
                "{} {} ({}/{}):\n{}",
                verb,
                dir,
                i + 1,
                total,
                render(&game.snapshot())
            );
        }
    }
}

/// One-line summary. `complete` is the engine's completed flag, which stays
/// set under latched completion; `solved` is the live board state.
fn summary(snapshot: &Snapshot) -> String {
    let solved = snapshot
        .goals
        .iter()
        .all(|&pos| snapshot.tile(pos) == Some(Tile::Crate));
    format!(
        "moves: {:<5}  pushes: {:<5}  complete: {}  solved: {}",
        snapshot.moves,
        snapshot.pushes,
        if snapshot.completed { 'Y' } else { 'N' },
        if solved { 'Y' } else { 'N' }
    )
}

#[derive(Parser)]
#[command(name = "sokoban")]
#[command(about = "Play a Sokoban level from the command line", long_about = None)]
struct Args {
    /// Path to a level file (uses the built-in level when omitted)
    #[arg(value_name = "FILE")]
    level_file: Option<String>,

    /// Moves to play in LURD notation
    #[arg(short, long, default_value = "")]
    moves: String,

    /// Print the board after every move
    #[arg(short, long)]
    print_steps: bool,

    /// Reject moves once the level is complete
    #[arg(long, default_value = "false")]
    lock_on_completion: bool,

    /// Re-evaluate completion after every move instead of latching it
    #[arg(long, default_value = "false")]
    live_completion: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            lock_on_completion: self.lock_on_completion,
            completion: if self.live_completion {
                CompletionPolicy::Live
            } else {
                CompletionPolicy::Latched
            },
        }
    }
}

fn main() {
    let args = Args::parse();

    let default_filter = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(default_filter)
        .parse_default_env()
        .init();

    let level = match &args.level_file {
        Some(path) => Level::from_file(path),
        None => Level::from_rows(&EXAMPLE_LEVEL),
    };
    let level = match level {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error loading level: {}", e);
            std::process::exit(1);
        }
    };

    let moves = match parse_moves(&args.moves) {
        Ok(moves) => moves,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut game = Game::new(level, args.game_config());

    println!("Starting position:\n{}", render(&game.snapshot()));
    play(&mut game, &moves, args.print_steps);

    let snapshot = game.snapshot();
    if !args.print_steps && !moves.is_empty() {
        println!("Final position:\n{}", render(&snapshot));
    }
    println!("{}", summary(&snapshot));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_example() {
        let game = Game::from_rows(&EXAMPLE_LEVEL, GameConfig::default()).unwrap();
        let expected: String = EXAMPLE_LEVEL
            .iter()
            .map(|row| format!("{}\n", row.trim_end()))
            .collect();
        assert_eq!(render(&game.snapshot()), expected);
    }

    #[test]
    fn test_render_vacated_goal() {
        let mut game = Game::from_rows(&["######", "#@o. #", "######"], GameConfig::default())
            .unwrap();
        play(&mut game, &parse_moves("RR").unwrap(), false);
        assert_eq!(
            render(&game.snapshot()),
            "######\n#  @o#\n######\nLevel complete!\n"
        );
    }

    #[test]
    fn test_summary_after_leaving_goal() {
        let mut game = Game::from_rows(&["######", "#@o. #", "######"], GameConfig::default())
            .unwrap();
        play(&mut game, &parse_moves("R").unwrap(), false);
        assert_eq!(
            summary(&game.snapshot()),
            "moves: 1      pushes: 1      complete: Y  solved: Y"
        );

        play(&mut game, &parse_moves("R").unwrap(), false);
        let snapshot = game.snapshot();
        assert!(render(&snapshot).ends_with("Level complete!\n"));
        assert_eq!(
            summary(&snapshot),
            "moves: 2      pushes: 2      complete: Y  solved: N"
        );
    }

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from(["sokoban"]);
        let game = Game::from_rows(&EXAMPLE_LEVEL, args.game_config()).unwrap();
        assert_eq!(game.config(), GameConfig::default());

        let args = Args::parse_from(["sokoban", "--live-completion", "--lock-on-completion"]);
        let game = Game::from_rows(&EXAMPLE_LEVEL, args.game_config()).unwrap();
        assert_eq!(
            game.config(),
            GameConfig {
                lock_on_completion: true,
                completion: CompletionPolicy::Live,
            }
        );

        let args = Args::parse_from(["sokoban", "level.txt", "-m", "lurd", "-vv"]);
        assert_eq!(args.level_file.as_deref(), Some("level.txt"));
        assert_eq!(args.moves, "lurd");
        assert_eq!(args.verbose, 2);
        assert!(!args.game_config().lock_on_completion);
    }
}
