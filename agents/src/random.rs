use crate::Agent;
use gametree_core::GameState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Moves to a uniformly random successor.
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng: StdRng::from_entropy(),
        }
    }

    /// A reproducible agent for tests and benchmarks.
    pub fn seeded(seed: u64) -> Self {
        RandomAgent {
            name: format!("Random(seed={})", seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> Agent<S> for RandomAgent {
    fn choose(&mut self, state: &S) -> Option<S> {
        if state.is_terminal() {
            return None;
        }
        state.successors().choose(&mut self.rng).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
