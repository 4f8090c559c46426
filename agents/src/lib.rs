pub mod arena;
pub mod deepening;
pub mod minimax;
pub mod random;
pub mod search;

use gametree_core::GameState;

/// Core trait for game-playing agents
pub trait Agent<S: GameState> {
    /// Choose the state to move to, or `None` if there is no move
    fn choose(&mut self, state: &S) -> Option<S>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use arena::{play_match, MatchOutcome};
pub use deepening::*;
pub use minimax::MinimaxAgent;
pub use random::RandomAgent;
pub use search::*;
