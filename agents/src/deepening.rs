use crate::search::{alphabeta_search, SearchResult};
use gametree_core::{is_terminal_score, GameState, Score, DEFAULT_DEPTH_LIMIT};
use log::debug;
use std::time::{Duration, Instant};

/// Best result found so far by progressive deepening.
///
/// Every completed iteration replaces the held value outright. The value can
/// be read at any time, including before the first iteration finishes.
#[derive(Debug, Clone)]
pub struct AnytimeValue<S> {
    value: Option<SearchResult<S>>,
    iterations: u32,
    total_evaluations: u64,
}

impl<S> Default for AnytimeValue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> AnytimeValue<S> {
    pub fn new() -> Self {
        Self {
            value: None,
            iterations: 0,
            total_evaluations: 0,
        }
    }

    /// Replaces the held result.
    pub fn set_value(&mut self, result: SearchResult<S>) {
        self.total_evaluations += result.evaluations;
        self.iterations += 1;
        self.value = Some(result);
    }

    pub fn value(&self) -> Option<&SearchResult<S>> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<SearchResult<S>> {
        self.value
    }

    /// Number of results stored so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Evaluations summed over every stored result. Repeated work across
    /// iterations is counted each time.
    pub fn total_evaluations(&self) -> u64 {
        self.total_evaluations
    }
}

/// Alpha-beta searches at depth 1, 2, 3, ... yielded one iteration at a time.
///
/// Dropping the iterator between items is the only way to interrupt the
/// search; a single iteration always runs to completion.
pub struct ProgressiveDeepening<'a, S, H: ?Sized> {
    state: &'a S,
    heuristic: &'a H,
    depth: u32,
    max_depth: u32,
}

impl<'a, S, H> ProgressiveDeepening<'a, S, H>
where
    S: GameState,
    H: Fn(&S::Snapshot, bool) -> Score + ?Sized,
{
    pub fn new(state: &'a S, heuristic: &'a H, max_depth: u32) -> Self {
        Self {
            state,
            heuristic,
            depth: 0,
            max_depth,
        }
    }

    /// Depth of the last completed iteration.
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl<S, H> Iterator for ProgressiveDeepening<'_, S, H>
where
    S: GameState,
    H: Fn(&S::Snapshot, bool) -> Score + ?Sized,
{
    type Item = (u32, SearchResult<S>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.depth >= self.max_depth {
            return None;
        }
        self.depth += 1;
        let result = alphabeta_search(self.state, self.heuristic, self.depth, true);
        Some((self.depth, result))
    }
}

/// When progressive deepening should stop.
#[derive(Debug, Clone)]
pub struct DeepeningLimits {
    pub max_depth: u32,
    /// Checked between iterations only; the running iteration always finishes.
    pub move_time: Option<Duration>,
    /// Stop once an iteration proves a win or loss.
    pub stop_on_terminal: bool,
}

impl Default for DeepeningLimits {
    fn default() -> Self {
        Self::depth(DEFAULT_DEPTH_LIMIT)
    }
}

impl DeepeningLimits {
    pub fn depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            move_time: None,
            stop_on_terminal: false,
        }
    }

    pub fn move_time(millis: u64) -> Self {
        Self {
            max_depth: DEFAULT_DEPTH_LIMIT,
            move_time: Some(Duration::from_millis(millis)),
            stop_on_terminal: false,
        }
    }

    pub fn with_stop_on_terminal(mut self, stop: bool) -> Self {
        self.stop_on_terminal = stop;
        self
    }
}

/// Report sent after each completed iteration.
#[derive(Debug, Clone)]
pub struct DeepeningProgress {
    pub depth: u32,
    pub score: Score,
    pub evaluations: u64,
    pub total_evaluations: u64,
    pub elapsed: Duration,
}

pub type DeepeningCallback<'a> = Box<dyn FnMut(&DeepeningProgress) + 'a>;

/// Runs alpha-beta at depths `1..=depth_limit`, each from a fresh window,
/// and returns the last result in an [`AnytimeValue`].
///
/// Every iteration searches for the maximizer; `_maximizing` is accepted
/// for signature parity with the other searches and otherwise ignored.
/// Shallow work is repeated at every depth; nothing is cached between
/// iterations.
pub fn progressive_deepening<S, H>(state: &S, heuristic: &H, depth_limit: u32, _maximizing: bool) -> AnytimeValue<S>
where
    S: GameState,
    H: Fn(&S::Snapshot, bool) -> Score + ?Sized,
{
    deepen_with_limits(state, heuristic, &DeepeningLimits::depth(depth_limit), None)
}

/// Progressive deepening bounded by depth and, optionally, wall-clock time.
/// Iterations search for the maximizer.
pub fn deepen_with_limits<S, H>(
    state: &S,
    heuristic: &H,
    limits: &DeepeningLimits,
    mut callback: Option<DeepeningCallback<'_>>,
) -> AnytimeValue<S>
where
    S: GameState,
    H: Fn(&S::Snapshot, bool) -> Score + ?Sized,
{
    let start = Instant::now();
    let mut anytime = AnytimeValue::new();

    for (depth, result) in ProgressiveDeepening::new(state, heuristic, limits.max_depth) {
        let score = result.score;
        let evaluations = result.evaluations;
        anytime.set_value(result);

        let progress = DeepeningProgress {
            depth,
            score,
            evaluations,
            total_evaluations: anytime.total_evaluations(),
            elapsed: start.elapsed(),
        };
        debug!(
            "depth {} score {} evaluations {} (total {}) in {:?}",
            depth, score, evaluations, progress.total_evaluations, progress.elapsed
        );
        if let Some(ref mut callback) = callback {
            callback(&progress);
        }

        if limits.stop_on_terminal && is_terminal_score(score) {
            debug!("stopping at depth {depth}: outcome is decided");
            break;
        }
        if let Some(move_time) = limits.move_time {
            if progress.elapsed >= move_time {
                debug!("stopping at depth {depth}: time budget spent");
                break;
            }
        }
    }

    anytime
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::minimax_endgame_search;
    use gametree_core::{always_zero, static_heuristic, TreeNode, TreeState};
    use std::cell::RefCell;

    #[test]
    fn test_anytime_value_replaces() {
        let tree = TreeNode::parse("(A B:1 C:2)").unwrap();
        let root = TreeState::new(&tree);
        let mut anytime = AnytimeValue::new();
        assert!(anytime.value().is_none());

        anytime.set_value(SearchResult {
            path: vec![root],
            score: 1,
            evaluations: 3,
        });
        anytime.set_value(SearchResult {
            path: vec![root],
            score: -4,
            evaluations: 5,
        });

        assert_eq!(anytime.value().unwrap().score, -4);
        assert_eq!(anytime.iterations(), 2);
        assert_eq!(anytime.total_evaluations(), 8);
    }

    #[test]
    fn test_deepening_runs_every_depth() {
        let tree = TreeNode::uniform(2, &[3, 5, 6, 9, 1, 2, 0, -1]).unwrap();
        let root = TreeState::new(&tree);
        let anytime = progressive_deepening(&root, &always_zero, 3, true);

        assert_eq!(anytime.iterations(), 3);
        let result = anytime.value().unwrap();
        assert_eq!(result.score, minimax_endgame_search(&root, true).score);
        // Depth 1: 2 heuristic leaves; depth 2: 3 after a cutoff; depth 3: 5.
        assert_eq!(anytime.total_evaluations(), 2 + 3 + 5);
    }

    #[test]
    fn test_every_iteration_maximizes() {
        let tree = TreeNode::parse("(A L:1 R:9)").unwrap();
        let root = TreeState::new(&tree);

        let anytime = progressive_deepening(&root, &always_zero, 1, false);
        let result = anytime.value().unwrap();
        assert_eq!(result.score, 9);
        assert_eq!(result.leaf_state().to_string(), "R");

        let deeper = progressive_deepening(&root, &always_zero, 4, false);
        assert_eq!(deeper.value().unwrap().score, 9);
        assert_eq!(deeper.iterations(), 4);
    }

    #[test]
    fn test_zero_depth_limit_leaves_value_unset() {
        let tree = TreeNode::parse("(A B:1 C:2)").unwrap();
        let root = TreeState::new(&tree);
        let anytime = progressive_deepening(&root, &always_zero, 0, true);
        assert!(anytime.value().is_none());
        assert_eq!(anytime.iterations(), 0);
    }

    #[test]
    fn test_iterator_can_be_stopped_between_iterations() {
        let tree = TreeNode::uniform(2, &[3, 5, 6, 9, 1, 2, 0, -1]).unwrap();
        let root = TreeState::new(&tree);
        let mut deepening = ProgressiveDeepening::new(&root, &static_heuristic, 10);

        let (depth, first) = deepening.next().unwrap();
        assert_eq!(depth, 1);
        assert_eq!(first.depth(), 1);
        assert_eq!(deepening.depth(), 1);

        // Three iterations reach every leaf; later depths change nothing.
        let rest: Vec<_> = deepening.collect();
        assert_eq!(rest.len(), 9);
        assert!(rest.iter().skip(1).all(|(_, r)| r.score == 5));
    }

    #[test]
    fn test_stop_on_terminal() {
        let tree = TreeNode::parse("(A (B X:-1000 Y:5) C:1000)").unwrap();
        let root = TreeState::new(&tree);
        let limits = DeepeningLimits::depth(5).with_stop_on_terminal(true);
        let anytime = deepen_with_limits(&root, &always_zero, &limits, None);

        assert_eq!(anytime.iterations(), 1);
        assert_eq!(anytime.value().unwrap().score, 1000);
    }

    #[test]
    fn test_zero_move_time_stops_after_first_iteration() {
        let tree = TreeNode::uniform(2, &[3, 5, 6, 9, 1, 2, 0, -1]).unwrap();
        let root = TreeState::new(&tree);
        let limits = DeepeningLimits {
            max_depth: 3,
            move_time: Some(Duration::ZERO),
            stop_on_terminal: false,
        };
        let anytime = deepen_with_limits(&root, &always_zero, &limits, None);
        assert_eq!(anytime.iterations(), 1);
    }

    #[test]
    fn test_callback_sees_each_iteration() {
        let tree = TreeNode::uniform(2, &[3, 5, 6, 9, 1, 2, 0, -1]).unwrap();
        let root = TreeState::new(&tree);
        let seen = RefCell::new(Vec::new());
        let callback: DeepeningCallback = Box::new(|p: &DeepeningProgress| {
            seen.borrow_mut().push((p.depth, p.total_evaluations));
        });

        let anytime = deepen_with_limits(&root, &always_zero, &DeepeningLimits::depth(3), Some(callback));

        assert_eq!(*seen.borrow(), vec![(1, 2), (2, 5), (3, 10)]);
        assert_eq!(anytime.total_evaluations(), 10);
    }
}
