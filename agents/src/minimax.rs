use crate::{
    deepening::{deepen_with_limits, DeepeningLimits},
    Agent,
};
use gametree_core::{GameState, Score};

/// Plays the first move of the best line found by progressive deepening.
///
/// The agent is always the maximizer of the position it is asked about, so
/// the game's terminal scores and heuristic must be relative to the player
/// to move.
pub struct MinimaxAgent<H> {
    name: String,
    limits: DeepeningLimits,
    heuristic: H,
}

impl<H> MinimaxAgent<H> {
    pub fn new(heuristic: H, depth: u32) -> Self {
        MinimaxAgent {
            name: format!("Minimax(depth={})", depth),
            limits: DeepeningLimits::depth(depth),
            heuristic,
        }
    }

    pub fn with_time_limit(heuristic: H, time_ms: u64) -> Self {
        MinimaxAgent {
            name: format!("Minimax(time={}ms)", time_ms),
            limits: DeepeningLimits::move_time(time_ms).with_stop_on_terminal(true),
            heuristic,
        }
    }

    pub fn with_limits(heuristic: H, limits: DeepeningLimits) -> Self {
        MinimaxAgent {
            name: format!("Minimax(depth<={})", limits.max_depth),
            limits,
            heuristic,
        }
    }
}

impl<S, H> Agent<S> for MinimaxAgent<H>
where
    S: GameState,
    H: Fn(&S::Snapshot, bool) -> Score,
{
    fn choose(&mut self, state: &S) -> Option<S> {
        let anytime = deepen_with_limits(state, &self.heuristic, &self.limits, None);
        let mut result = anytime.into_value()?;
        if result.path.len() < 2 {
            return None;
        }
        Some(result.path.swap_remove(1))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
