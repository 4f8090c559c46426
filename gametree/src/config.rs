use clap::{Args, ValueEnum};
use gametree_agents::DeepeningLimits;

/// Which search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Score every root-to-terminal path and keep the best
    Dfs,
    /// Plain minimax
    Minimax,
    /// Minimax with alpha-beta pruning
    Alphabeta,
    /// Progressive deepening over alpha-beta
    Deepen,
}

/// Search options shared by the subcommands.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(short, long, value_enum, default_value_t = Algorithm::Alphabeta)]
    pub algorithm: Algorithm,

    /// Depth limit in plies [default: 256 for trees, 4 for Connect Four]
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Stop deepening after this many milliseconds (checked between iterations)
    #[arg(long)]
    pub move_time: Option<u64>,

    /// Search from the minimizer's point of view
    #[arg(long)]
    pub minimizing: bool,
}

impl SearchArgs {
    pub fn maximizing(&self) -> bool {
        !self.minimizing
    }

    /// The depth limit, or `default` when none was given.
    pub fn depth_or(&self, default: u32) -> u32 {
        self.depth.unwrap_or(default)
    }

    /// Limits for progressive deepening, deepening to `max_depth`.
    pub fn limits(&self, max_depth: u32) -> DeepeningLimits {
        DeepeningLimits {
            max_depth,
            move_time: self.move_time.map(std::time::Duration::from_millis),
            stop_on_terminal: false,
        }
    }
}

/// Maps `-v` occurrences to a log level; `RUST_LOG` takes precedence.
pub fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_limits_from_args() {
        let args = SearchArgs {
            algorithm: Algorithm::Deepen,
            depth: Some(4),
            move_time: Some(250),
            minimizing: false,
        };
        let limits = args.limits(args.depth_or(9));
        assert_eq!(limits.max_depth, 4);
        assert_eq!(limits.move_time, Some(Duration::from_millis(250)));
        assert!(args.maximizing());
    }

    #[test]
    fn test_depth_falls_back_to_default() {
        let args = SearchArgs {
            algorithm: Algorithm::Alphabeta,
            depth: None,
            move_time: None,
            minimizing: false,
        };
        assert_eq!(args.depth_or(4), 4);
        assert_eq!(args.limits(args.depth_or(4)).max_depth, 4);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), log::LevelFilter::Warn);
        assert_eq!(log_level(2), log::LevelFilter::Debug);
        assert_eq!(log_level(9), log::LevelFilter::Trace);
    }
}
