/// Explicit game trees with static leaf scores.
/// Handy for checking search algorithms against hand-computed answers.
use crate::state::{GameState, Score};
use std::fmt;

/// A node of an explicit game tree.
///
/// Leaves carry their score from the maximizer's point of view. Internal
/// nodes may carry a static estimate for depth-limited searches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeNode {
    pub label: String,
    pub value: Option<Score>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Creates a leaf with a fixed score.
    pub fn leaf(label: impl Into<String>, score: Score) -> Self {
        Self {
            label: label.into(),
            value: Some(score),
            children: Vec::new(),
        }
    }

    /// Creates an internal node without a static estimate.
    pub fn internal(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            value: None,
            children,
        }
    }

    /// Sets the static estimate of an internal node.
    pub fn with_estimate(mut self, estimate: Score) -> Self {
        self.value = Some(estimate);
        self
    }

    /// Builds a complete tree of the given branching factor whose leaves,
    /// read left to right, carry `scores`. Depth is derived from the number
    /// of scores, which must be a power of `branching`.
    ///
    /// Nodes are labelled by their position, e.g. `r`, `r1`, `r10`.
    pub fn uniform(branching: usize, scores: &[Score]) -> Option<Self> {
        if branching < 2 || scores.is_empty() {
            return None;
        }
        let mut width = 1;
        while width < scores.len() {
            width *= branching;
        }
        if width != scores.len() {
            return None;
        }
        Some(Self::build_uniform(String::from("r"), branching, scores))
    }

    fn build_uniform(label: String, branching: usize, scores: &[Score]) -> Self {
        if scores.len() == 1 {
            return Self::leaf(label, scores[0]);
        }
        let chunk = scores.len() / branching;
        let children = scores
            .chunks(chunk)
            .enumerate()
            .map(|(i, part)| Self::build_uniform(format!("{label}{i}"), branching, part))
            .collect();
        Self::internal(label, children)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(TreeNode::leaf_count).sum()
        }
    }

    /// Number of plies on the longest root-to-leaf path.
    pub fn height(&self) -> u32 {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Finds the first node with the given label in depth-first order.
    pub fn find(&self, label: &str) -> Option<&TreeNode> {
        if self.label == label {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(label))
    }

    /// A readable name: the label, or the score for unnamed leaves.
    pub fn name(&self) -> String {
        match (self.label.is_empty(), self.value) {
            (false, _) => self.label.clone(),
            (true, Some(v)) => v.to_string(),
            (true, None) => String::from("?"),
        }
    }
}

/// A position in an explicit tree, borrowed from its owner.
#[derive(Clone, Copy, Debug)]
pub struct TreeState<'a> {
    node: &'a TreeNode,
}

impl<'a> TreeState<'a> {
    pub fn new(node: &'a TreeNode) -> Self {
        Self { node }
    }

    pub fn node(&self) -> &'a TreeNode {
        self.node
    }
}

impl PartialEq for TreeState<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node)
    }
}

impl Eq for TreeState<'_> {}

impl fmt::Display for TreeState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node.name())
    }
}

impl<'a> GameState for TreeState<'a> {
    type Snapshot = TreeNode;

    fn snapshot(&self) -> &TreeNode {
        self.node
    }

    fn is_terminal(&self) -> bool {
        self.node.is_leaf()
    }

    fn successors(&self) -> Vec<Self> {
        self.node.children.iter().map(TreeState::new).collect()
    }

    // Leaf scores are already from the maximizer's point of view.
    fn terminal_score(&self, _maximizing: bool) -> Score {
        self.node.value.unwrap_or(0)
    }
}

/// Heuristic that reads an internal node's static estimate, or 0 if it has none.
pub fn static_heuristic(node: &TreeNode, _maximizing: bool) -> Score {
    node.value.unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::internal(
            "A",
            vec![
                TreeNode::internal("B", vec![TreeNode::leaf("D", 3), TreeNode::leaf("E", 5)]),
                TreeNode::leaf("C", 7),
            ],
        )
    }

    #[test]
    fn test_uniform_tree_shape() {
        let tree = TreeNode::uniform(2, &[3, 5, 6, 9, 1, 2, 0, -1]).unwrap();
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.leaf_count(), 8);
        assert_eq!(tree.find("r111").unwrap().value, Some(-1));
        assert_eq!(tree.find("r000").unwrap().value, Some(3));
    }

    #[test]
    fn test_uniform_rejects_bad_sizes() {
        assert!(TreeNode::uniform(2, &[1, 2, 3]).is_none());
        assert!(TreeNode::uniform(1, &[1]).is_none());
        assert!(TreeNode::uniform(3, &[]).is_none());
    }

    #[test]
    fn test_tree_state_interface() {
        let tree = sample();
        let root = TreeState::new(&tree);
        assert!(!root.is_terminal());

        let children = root.successors();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].snapshot().label, "B");
        assert!(children[1].is_terminal());
        assert_eq!(children[1].terminal_score(true), 7);
        assert_eq!(children[1].terminal_score(false), 7);
        assert!(children[1].successors().is_empty());
    }

    #[test]
    fn test_static_heuristic() {
        let node = TreeNode::internal("X", vec![TreeNode::leaf("Y", 1)]).with_estimate(4);
        assert_eq!(static_heuristic(&node, true), 4);
        assert_eq!(static_heuristic(&sample(), false), 0);
    }

    #[test]
    fn test_state_identity() {
        let tree = sample();
        let a = TreeState::new(&tree);
        let b = TreeState::new(&tree);
        assert_eq!(a, b);
        assert_ne!(a, a.successors()[0]);
        assert_eq!(a.to_string(), "A");
    }
}
