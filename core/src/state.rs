/// Scores and the game state abstraction shared by every search.

/// A position's value from the maximizer's point of view.
pub type Score = i32;

/// Scores with at least this magnitude are reserved for real endgame outcomes.
/// Heuristic estimates must stay strictly below it.
pub const TERMINAL_THRESHOLD: Score = 1000;

/// Lower extreme used as the initial alpha bound.
pub const NEG_INFINITY: Score = Score::MIN;

/// Upper extreme used as the initial beta bound.
pub const INFINITY: Score = Score::MAX;

/// Depth limit used by entry points that the caller leaves "unbounded".
/// Finite so that recursion depth stays bounded on deep or cyclic graphs.
pub const DEFAULT_DEPTH_LIMIT: u32 = 256;

/// Returns true if the score can only have come from a real endgame.
pub const fn is_terminal_score(score: Score) -> bool {
    score >= TERMINAL_THRESHOLD || score <= -TERMINAL_THRESHOLD
}

/// A snapshot of a two-player game behind a uniform interface.
///
/// Implementations must be pure: none of the methods may change the wrapped
/// snapshot, and successors are recomputed on every call.
pub trait GameState: Clone {
    /// The game-specific board or position type.
    type Snapshot;

    /// Returns the wrapped snapshot, e.g. for heuristic evaluation.
    fn snapshot(&self) -> &Self::Snapshot;

    /// Returns true if no further moves can be made.
    fn is_terminal(&self) -> bool;

    /// Generates the states reachable in one move, in a stable order.
    /// Must be empty for terminal states.
    fn successors(&self) -> Vec<Self>;

    /// Scores a terminal state. `maximizing` tells whether the player to move
    /// is the maximizer. The magnitude must be at least
    /// [`TERMINAL_THRESHOLD`] for decisive outcomes.
    ///
    /// Also called for non-terminal states that have no successors.
    fn terminal_score(&self, maximizing: bool) -> Score;
}

/// Heuristic that estimates every non-terminal position as even.
pub fn always_zero<T: ?Sized>(_snapshot: &T, _maximizing: bool) -> Score {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_score_detection() {
        assert!(is_terminal_score(1000));
        assert!(is_terminal_score(-1000));
        assert!(is_terminal_score(1042));
        assert!(!is_terminal_score(999));
        assert!(!is_terminal_score(-999));
        assert!(!is_terminal_score(0));
    }

    #[test]
    fn test_always_zero() {
        assert_eq!(always_zero(&42u8, true), 0);
        assert_eq!(always_zero("board", false), 0);
    }
}
