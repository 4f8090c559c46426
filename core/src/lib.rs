pub mod connect_four;
pub mod notation;
pub mod state;
pub mod tree;

pub use connect_four::{Board, BoardError, ConnectFourState, Player, Scoring};
pub use notation::TreeError;
pub use state::*;
pub use tree::{static_heuristic, TreeNode, TreeState};
