use gametree_core::{always_zero, GameState, Score, DEFAULT_DEPTH_LIMIT, INFINITY, NEG_INFINITY};
use log::trace;

/// Outcome of a search: the chosen line of play, its backed-up score and
/// how many static evaluations it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<S> {
    /// States from the searched root to the evaluated leaf, both inclusive.
    pub path: Vec<S>,
    pub score: Score,
    /// Terminal or heuristic evaluations performed.
    pub evaluations: u64,
}

impl<S: Clone> SearchResult<S> {
    fn leaf(state: &S, score: Score) -> Self {
        Self {
            path: vec![state.clone()],
            score,
            evaluations: 1,
        }
    }

    /// Prepends `state` to the chosen child line.
    fn extend(state: &S, child: SearchResult<S>, evaluations: u64) -> Self {
        let mut path = Vec::with_capacity(child.path.len() + 1);
        path.push(state.clone());
        path.extend(child.path);
        Self {
            path,
            score: child.score,
            evaluations,
        }
    }
}

impl<S> SearchResult<S> {
    pub fn root(&self) -> &S {
        &self.path[0]
    }

    /// The evaluated state at the end of the line.
    pub fn leaf_state(&self) -> &S {
        &self.path[self.path.len() - 1]
    }

    /// The state after the first move, if the root was not a leaf.
    pub fn next_state(&self) -> Option<&S> {
        self.path.get(1)
    }

    /// Number of plies on the chosen line.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }
}

// Strict comparison keeps the first of equally scored children.
#[inline]
fn improves(score: Score, best: Score, maximizing: bool) -> bool {
    if maximizing {
        score > best
    } else {
        score < best
    }
}

fn expand<S: GameState>(state: &S, depth_limit: u32, path: &mut Vec<S>, all_paths: &mut Vec<Vec<S>>) {
    path.push(state.clone());
    if state.is_terminal() {
        all_paths.push(path.clone());
    } else if depth_limit > 0 {
        let children = state.successors();
        if children.is_empty() {
            all_paths.push(path.clone());
        }
        for child in &children {
            expand(child, depth_limit - 1, path, all_paths);
        }
    }
    path.pop();
}

/// Enumerates every root-to-terminal path and returns the one whose leaf
/// scores highest for the maximizer. Ties go to the path generated first.
///
/// One evaluation is counted per terminal path. Returns `None` only if no
/// terminal state lies within [`DEFAULT_DEPTH_LIMIT`] plies.
pub fn dfs_maximizing<S: GameState>(state: &S) -> Option<SearchResult<S>> {
    dfs_maximizing_with_limit(state, DEFAULT_DEPTH_LIMIT)
}

/// Like [`dfs_maximizing`], discarding paths longer than `depth_limit` plies.
pub fn dfs_maximizing_with_limit<S: GameState>(state: &S, depth_limit: u32) -> Option<SearchResult<S>> {
    let mut all_paths = Vec::new();
    expand(state, depth_limit, &mut Vec::new(), &mut all_paths);

    let evaluations = all_paths.len() as u64;
    let mut best: Option<(Score, Vec<S>)> = None;
    for path in all_paths {
        let score = path[path.len() - 1].terminal_score(true);
        if best.as_ref().map_or(true, |(b, _)| improves(score, *b, true)) {
            best = Some((score, path));
        }
    }

    best.map(|(score, path)| SearchResult {
        path,
        score,
        evaluations,
    })
}

/// Minimax over terminal scores only, searching to the end of the game.
pub fn minimax_endgame_search<S: GameState>(state: &S, maximizing: bool) -> SearchResult<S> {
    minimax_search(
        state,
        &always_zero::<S::Snapshot>,
        DEFAULT_DEPTH_LIMIT,
        maximizing,
    )
}

/// Depth-limited minimax.
///
/// Terminal states are scored with [`GameState::terminal_score`]; states at
/// the depth limit are estimated with `heuristic`. The heuristic must stay
/// strictly below [`gametree_core::TERMINAL_THRESHOLD`] in magnitude, or
/// estimates become indistinguishable from real outcomes. This is not checked.
pub fn minimax_search<S, H>(state: &S, heuristic: &H, depth_limit: u32, maximizing: bool) -> SearchResult<S>
where
    S: GameState,
    H: Fn(&S::Snapshot, bool) -> Score + ?Sized,
{
    if state.is_terminal() {
        return SearchResult::leaf(state, state.terminal_score(maximizing));
    }
    if depth_limit == 0 {
        return SearchResult::leaf(state, heuristic(state.snapshot(), maximizing));
    }

    let mut evaluations = 0;
    let mut best: Option<SearchResult<S>> = None;
    for child in state.successors() {
        let result = minimax_search(&child, heuristic, depth_limit - 1, !maximizing);
        evaluations += result.evaluations;
        if best
            .as_ref()
            .map_or(true, |b| improves(result.score, b.score, maximizing))
        {
            best = Some(result);
        }
    }

    match best {
        Some(child) => SearchResult::extend(state, child, evaluations),
        // No moves left: the state is terminal in all but name.
        None => SearchResult::leaf(state, state.terminal_score(maximizing)),
    }
}

/// Minimax with alpha-beta pruning inside the window `(alpha, beta)`.
///
/// Returns the same score as [`minimax_search`] when started with
/// [`NEG_INFINITY`] and [`INFINITY`]; the path may differ between equally
/// scored siblings. Children after a cutoff are neither searched nor counted.
pub fn minimax_search_alphabeta<S, H>(
    state: &S,
    mut alpha: Score,
    mut beta: Score,
    heuristic: &H,
    depth_limit: u32,
    maximizing: bool,
) -> SearchResult<S>
where
    S: GameState,
    H: Fn(&S::Snapshot, bool) -> Score + ?Sized,
{
    if state.is_terminal() {
        return SearchResult::leaf(state, state.terminal_score(maximizing));
    }
    if depth_limit == 0 {
        return SearchResult::leaf(state, heuristic(state.snapshot(), maximizing));
    }

    let children = state.successors();
    let mut evaluations = 0;
    let mut best: Option<SearchResult<S>> = None;

    for (visited, child) in children.iter().enumerate() {
        let result =
            minimax_search_alphabeta(child, alpha, beta, heuristic, depth_limit - 1, !maximizing);
        evaluations += result.evaluations;
        let score = result.score;

        if best
            .as_ref()
            .map_or(true, |b| improves(score, b.score, maximizing))
        {
            best = Some(result);
        }

        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }

        if alpha >= beta {
            trace!(
                "cutoff after {} of {} successors (alpha={}, beta={})",
                visited + 1,
                children.len(),
                alpha,
                beta
            );
            break;
        }
    }

    match best {
        Some(child) => SearchResult::extend(state, child, evaluations),
        None => SearchResult::leaf(state, state.terminal_score(maximizing)),
    }
}

/// Alpha-beta search starting from the full window.
pub fn alphabeta_search<S, H>(state: &S, heuristic: &H, depth_limit: u32, maximizing: bool) -> SearchResult<S>
where
    S: GameState,
    H: Fn(&S::Snapshot, bool) -> Score + ?Sized,
{
    minimax_search_alphabeta(state, NEG_INFINITY, INFINITY, heuristic, depth_limit, maximizing)
}
