//! gametree - adversarial game-tree search from the command line
//!
//! Searches explicit trees given in parenthesised notation, searches Connect
//! Four positions, and plays Connect Four against a search agent.

mod config;
mod play;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{log_level, Algorithm, SearchArgs};
use gametree_agents::{
    alphabeta_search, deepen_with_limits, dfs_maximizing_with_limit, minimax_search, Agent,
    DeepeningCallback, MinimaxAgent, RandomAgent, SearchResult,
};
use gametree_core::connect_four::{heuristic, positions};
use gametree_core::{
    static_heuristic, Board, ConnectFourState, GameState, Score, Scoring, TreeNode, TreeState,
    DEFAULT_DEPTH_LIMIT,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gametree")]
#[command(version, about = "Minimax, alpha-beta and progressive deepening search", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search an explicit tree, e.g. "(A (B 3 5) (C 6 9))"
    Tree {
        /// Tree in parenthesised notation
        notation: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Connect Four commands
    #[command(subcommand)]
    Connect4(Connect4Command),
}

#[derive(Subcommand)]
enum Connect4Command {
    /// Search a Connect Four position
    Search {
        /// Read the board from a file (six lines of seven cells, top row first)
        #[arg(long, conflicts_with = "position")]
        board: Option<PathBuf>,

        /// Use a built-in position
        #[arg(long, value_enum, default_value_t = Position::Start)]
        position: Position,

        /// Prefer faster wins when scoring finished games
        #[arg(long)]
        faster: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Play against the engine
    Play {
        /// Engine search depth
        #[arg(short, long, default_value_t = CONNECT_FOUR_DEPTH)]
        depth: u32,

        /// Engine time per move in milliseconds (overrides depth)
        #[arg(long)]
        move_time: Option<u64>,

        /// Let the human move first
        #[arg(long)]
        human_first: bool,

        #[arg(long, value_enum, default_value_t = Opponent::Minimax)]
        opponent: Opponent,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Position {
    Start,
    NearlyOver,
    UhOh,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Opponent {
    Minimax,
    Random,
}

/// Default search depth for Connect Four.
const CONNECT_FOUR_DEPTH: u32 = 4;

/// Runs the chosen algorithm to `depth` plies, printing deepening progress as
/// it goes.
fn run_search<S, H>(state: &S, heuristic: &H, args: &SearchArgs, depth: u32) -> Option<SearchResult<S>>
where
    S: GameState,
    H: Fn(&S::Snapshot, bool) -> Score,
{
    let maximizing = args.maximizing();
    match args.algorithm {
        Algorithm::Dfs => dfs_maximizing_with_limit(state, depth),
        Algorithm::Minimax => Some(minimax_search(state, heuristic, depth, maximizing)),
        Algorithm::Alphabeta => Some(alphabeta_search(state, heuristic, depth, maximizing)),
        Algorithm::Deepen => {
            if !maximizing {
                warn!("progressive deepening always searches for the maximizer; ignoring --minimizing");
            }
            let callback: DeepeningCallback = Box::new(report::print_progress);
            let anytime = deepen_with_limits(state, heuristic, &args.limits(depth), Some(callback));
            report::print_anytime(&anytime);
            anytime.into_value()
        }
    }
}

fn tree_command(notation: &str, search: &SearchArgs) -> Result<()> {
    let tree = TreeNode::parse(notation).context("failed to parse tree")?;
    info!("searching tree with {} leaves, height {}", tree.leaf_count(), tree.height());

    let root = TreeState::new(&tree);
    let depth = search.depth_or(DEFAULT_DEPTH_LIMIT);
    match run_search(&root, &static_heuristic, search, depth) {
        Some(result) => report::print_path(&result),
        None => println!("No terminal state within depth {depth}"),
    }
    Ok(())
}

fn load_board(board: Option<PathBuf>, position: Position) -> Result<Board> {
    let text = match board {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read board from {}", path.display()))?,
        None => match position {
            Position::Start => return Ok(Board::new()),
            Position::NearlyOver => positions::NEARLY_OVER.to_string(),
            Position::UhOh => positions::UH_OH.to_string(),
        },
    };
    Board::parse(&text).context("failed to parse board")
}

fn connect4_command(command: Connect4Command) -> Result<()> {
    match command {
        Connect4Command::Search {
            board,
            position,
            faster,
            search,
        } => {
            let scoring = if faster { Scoring::Faster } else { Scoring::Plain };
            let state = ConnectFourState::new(load_board(board, position)?, scoring);
            report::display_board(&mut std::io::stdout(), &state.board)?;

            let depth = search.depth_or(CONNECT_FOUR_DEPTH);
            match run_search(&state, &heuristic, &search, depth) {
                Some(result) => report::print_connect_four(&result)?,
                None => println!("No terminal state within depth {depth}"),
            }
            Ok(())
        }
        Connect4Command::Play {
            depth,
            move_time,
            human_first,
            opponent,
        } => {
            let mut engine: Box<dyn Agent<ConnectFourState>> = match (opponent, move_time) {
                (Opponent::Random, _) => Box::new(RandomAgent::new()),
                (Opponent::Minimax, Some(ms)) => Box::new(MinimaxAgent::with_time_limit(heuristic, ms)),
                (Opponent::Minimax, None) => Box::new(MinimaxAgent::new(heuristic, depth)),
            };
            play::play_interactive(engine.as_mut(), human_first, Scoring::Faster)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Tree { notation, search } => tree_command(&notation, &search),
        Commands::Connect4(command) => connect4_command(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect4_search_args(args: &[&str]) -> SearchArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Connect4(Connect4Command::Search { search, .. }) => search,
            _ => panic!("expected connect4 search"),
        }
    }

    #[test]
    fn test_connect_four_search_default_depth_finishes() {
        let search = connect4_search_args(&["gametree", "connect4", "search"]);
        assert_eq!(search.depth, None);
        let depth = search.depth_or(CONNECT_FOUR_DEPTH);
        assert_eq!(depth, CONNECT_FOUR_DEPTH);

        let state = ConnectFourState::starting(Scoring::Plain);
        let result = run_search(&state, &heuristic, &search, depth).unwrap();
        assert_eq!(result.depth(), CONNECT_FOUR_DEPTH as usize);
    }

    #[test]
    fn test_explicit_depth_wins() {
        let search = connect4_search_args(&["gametree", "connect4", "search", "-d", "6"]);
        assert_eq!(search.depth_or(CONNECT_FOUR_DEPTH), 6);
    }
}
