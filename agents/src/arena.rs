use crate::Agent;
use gametree_core::GameState;
use log::debug;

/// How a match between two agents ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A terminal state was reached.
    Finished,
    /// The agent to move returned no move.
    Resigned { agent: usize },
    /// The ply limit ran out first.
    PlyLimit,
}

/// Alternates two agents from `root`, the first agent moving first.
///
/// Returns every visited state, `root` included, and how the match ended.
pub fn play_match<S: GameState>(
    root: &S,
    first: &mut dyn Agent<S>,
    second: &mut dyn Agent<S>,
    max_plies: usize,
) -> (Vec<S>, MatchOutcome) {
    let mut agents: [&mut dyn Agent<S>; 2] = [first, second];
    let mut states = vec![root.clone()];
    let mut turn = 0;

    for ply in 0..max_plies {
        let current = &states[states.len() - 1];
        if current.is_terminal() {
            return (states, MatchOutcome::Finished);
        }
        match agents[turn].choose(current) {
            Some(next) => {
                debug!("ply {}: {} moved", ply + 1, agents[turn].name());
                states.push(next);
            }
            None => return (states, MatchOutcome::Resigned { agent: turn }),
        }
        turn = 1 - turn;
    }

    let outcome = if states[states.len() - 1].is_terminal() {
        MatchOutcome::Finished
    } else {
        MatchOutcome::PlyLimit
    };
    (states, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MinimaxAgent, RandomAgent};
    use gametree_core::connect_four::heuristic;
    use gametree_core::{ConnectFourState, Player, Scoring};

    #[test]
    fn test_minimax_beats_random_at_connect_four() {
        let root = ConnectFourState::starting(Scoring::Faster);
        let mut minimax = MinimaxAgent::new(heuristic, 3);
        let mut random = RandomAgent::seeded(3);

        let (states, outcome) = play_match(&root, &mut minimax, &mut random, 42);

        assert_eq!(outcome, MatchOutcome::Finished);
        let last = &states[states.len() - 1];
        assert_eq!(last.board.winner(), Some(Player::X));
    }

    #[test]
    fn test_ply_limit() {
        let root = ConnectFourState::starting(Scoring::Plain);
        let mut a = RandomAgent::seeded(1);
        let mut b = RandomAgent::seeded(2);

        let (states, outcome) = play_match(&root, &mut a, &mut b, 3);
        assert_eq!(states.len(), 4);
        assert_eq!(outcome, MatchOutcome::PlyLimit);
    }
}
