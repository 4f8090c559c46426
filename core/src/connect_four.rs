/// Connect Four rules, scoring and a text notation for boards.
use crate::state::{GameState, Score, TERMINAL_THRESHOLD};
use std::fmt;
use thiserror::Error;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Chain length that wins the game.
pub const WINNING_LENGTH: usize = 4;

/// Heuristic weight of a chain by its length: `len * [_, 10, 25, 50][len]`.
/// Winning chains only occur on finished boards and weigh nothing here.
const CHAIN_WEIGHTS: [Score; WINNING_LENGTH + 1] = [0, 10, 50, 150, 0];

/// One of the two players. X always moves first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Returns the other player.
    pub const fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' | 'x' => Some(Player::X),
            'O' | 'o' => Some(Player::O),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Errors from parsing boards or making illegal moves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected {expected} rows, got {got}")]
    RowCount { expected: usize, got: usize },
    #[error("row {row} has {got} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("invalid cell '{character}' at row {row}, column {col}")]
    InvalidCell { character: char, row: usize, col: usize },
    #[error("piece at row {row}, column {col} is not supported from below")]
    FloatingPiece { row: usize, col: usize },
    #[error("invalid piece counts: X={x}, O={o} (X moves first)")]
    PieceCounts { x: usize, o: usize },
    #[error("column {0} is full")]
    ColumnFull(usize),
    #[error("column {0} is out of range")]
    ColumnOutOfRange(usize),
}

/// A maximal run of one player's pieces along a line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chain {
    pub player: Player,
    /// Cells as `(row, col)`, row 0 at the bottom.
    pub cells: Vec<(usize, usize)>,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Line directions as (row step, column step).
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// A Connect Four position. Immutable: moves produce new boards.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    /// Row 0 is the bottom row.
    cells: [[Option<Player>; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board.
    pub const fn new() -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
        }
    }

    /// Returns the piece at `(row, col)`, row 0 at the bottom.
    pub fn piece_at(&self, row: usize, col: usize) -> Option<Player> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn count_pieces(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    fn count_player(&self, player: Player) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c == Some(player))
            .count()
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Player {
        if self.count_pieces() % 2 == 0 {
            Player::X
        } else {
            Player::O
        }
    }

    pub fn is_full(&self) -> bool {
        self.count_pieces() == ROWS * COLS
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        self.column_height(col) >= ROWS
    }

    fn column_height(&self, col: usize) -> usize {
        (0..ROWS)
            .take_while(|&row| self.cells[row][col].is_some())
            .count()
    }

    /// Drops a piece for the current player into `col`.
    pub fn add_piece(&self, col: usize) -> Result<Self, BoardError> {
        if col >= COLS {
            return Err(BoardError::ColumnOutOfRange(col));
        }
        let row = self.column_height(col);
        if row >= ROWS {
            return Err(BoardError::ColumnFull(col));
        }
        let mut next = self.clone();
        next.cells[row][col] = Some(self.current_player());
        Ok(next)
    }

    /// Returns the column in which `next` differs from this board by one piece.
    pub fn played_column(&self, next: &Board) -> Option<usize> {
        (0..COLS).find(|&col| self.column_height(col) + 1 == next.column_height(col))
    }

    fn step(row: usize, col: usize, (dr, dc): (isize, isize)) -> Option<(usize, usize)> {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < ROWS && c < COLS).then_some((r, c))
    }

    /// Returns every chain on the board, optionally for one player only.
    ///
    /// Runs of two or more pieces are reported once per direction; pieces
    /// that belong to no such run are reported as chains of length one.
    pub fn get_all_chains(&self, player: Option<Player>) -> Vec<Chain> {
        let mut chains = Vec::new();
        let mut in_run = [[false; COLS]; ROWS];

        for &dir in &DIRECTIONS {
            for row in 0..ROWS {
                for col in 0..COLS {
                    let Some(p) = self.cells[row][col] else {
                        continue;
                    };
                    let back = (-dir.0, -dir.1);
                    if let Some((r, c)) = Self::step(row, col, back) {
                        if self.cells[r][c] == Some(p) {
                            continue;
                        }
                    }
                    let mut cells = vec![(row, col)];
                    let mut cur = (row, col);
                    while let Some((r, c)) = Self::step(cur.0, cur.1, dir) {
                        if self.cells[r][c] != Some(p) {
                            break;
                        }
                        cells.push((r, c));
                        cur = (r, c);
                    }
                    if cells.len() >= 2 {
                        for &(r, c) in &cells {
                            in_run[r][c] = true;
                        }
                        chains.push(Chain { player: p, cells });
                    }
                }
            }
        }

        for row in 0..ROWS {
            for col in 0..COLS {
                if let Some(p) = self.cells[row][col] {
                    if !in_run[row][col] {
                        chains.push(Chain {
                            player: p,
                            cells: vec![(row, col)],
                        });
                    }
                }
            }
        }

        if let Some(only) = player {
            chains.retain(|c| c.player == only);
        }
        chains
    }

    /// Returns the player with a chain of at least four, if any.
    pub fn winner(&self) -> Option<Player> {
        self.get_all_chains(None)
            .into_iter()
            .find(|c| c.len() >= WINNING_LENGTH)
            .map(|c| c.player)
    }

    /// Parses a board from six lines of seven cells, top row first.
    /// `.` is empty, `X` and `O` are pieces. Blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if rows.len() != ROWS {
            return Err(BoardError::RowCount {
                expected: ROWS,
                got: rows.len(),
            });
        }

        let mut board = Board::new();
        for (i, line) in rows.iter().enumerate() {
            let row = ROWS - 1 - i;
            let width = line.chars().count();
            if width != COLS {
                return Err(BoardError::RowWidth {
                    row,
                    expected: COLS,
                    got: width,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                board.cells[row][col] = match ch {
                    '.' => None,
                    _ => Some(Player::from_char(ch).ok_or(BoardError::InvalidCell {
                        character: ch,
                        row,
                        col,
                    })?),
                };
            }
        }

        for row in 1..ROWS {
            for col in 0..COLS {
                if board.cells[row][col].is_some() && board.cells[row - 1][col].is_none() {
                    return Err(BoardError::FloatingPiece { row, col });
                }
            }
        }

        let x = board.count_player(Player::X);
        let o = board.count_player(Player::O);
        if x != o && x != o + 1 {
            return Err(BoardError::PieceCounts { x, o });
        }

        Ok(board)
    }
}

impl std::str::FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::parse(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let c = self.cells[row][col].map_or('.', Player::to_char);
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Returns true if someone has connected four or the board is full.
pub fn is_game_over(board: &Board) -> bool {
    board.winner().is_some() || board.is_full()
}

/// Boards reachable in one move, by column from left to right.
/// Empty once the game is over.
pub fn next_boards(board: &Board) -> Vec<Board> {
    if is_game_over(board) {
        return Vec::new();
    }
    (0..COLS).filter_map(|col| board.add_piece(col).ok()).collect()
}

/// Scores a finished game: +1000 if the maximizer won, -1000 if the
/// minimizer won, 0 for a tie. `maximizing` tells whether the player to
/// move is the maximizer.
pub fn endgame_score(board: &Board, maximizing: bool) -> Score {
    match board.winner() {
        None => 0,
        Some(winner) => {
            let to_move_won = winner == board.current_player();
            if to_move_won == maximizing {
                TERMINAL_THRESHOLD
            } else {
                -TERMINAL_THRESHOLD
            }
        }
    }
}

/// Like [`endgame_score`], but wins that leave more empty cells score higher
/// in magnitude, so sooner wins are preferred and later losses delayed.
pub fn endgame_score_faster(board: &Board, maximizing: bool) -> Score {
    let base = endgame_score(board, maximizing);
    let empty = (ROWS * COLS - board.count_pieces()) as Score;
    base.signum() * (base.abs() + empty)
}

/// Estimates a non-terminal board by weighting each player's chains.
/// Always strictly within (-1000, 1000).
pub fn heuristic(board: &Board, maximizing: bool) -> Score {
    let to_move = board.current_player();
    let value: Score = board
        .get_all_chains(None)
        .iter()
        .map(|c| {
            let weight = CHAIN_WEIGHTS[c.len().min(WINNING_LENGTH)];
            if c.player == to_move {
                weight
            } else {
                -weight
            }
        })
        .sum();
    let value = value.clamp(-(TERMINAL_THRESHOLD - 1), TERMINAL_THRESHOLD - 1);
    if maximizing {
        value
    } else {
        -value
    }
}

/// Which endgame scoring function a [`ConnectFourState`] uses.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Scoring {
    #[default]
    Plain,
    Faster,
}

/// A Connect Four board behind the [`GameState`] interface.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectFourState {
    pub board: Board,
    pub scoring: Scoring,
}

impl ConnectFourState {
    pub fn new(board: Board, scoring: Scoring) -> Self {
        Self { board, scoring }
    }

    /// The empty starting board.
    pub fn starting(scoring: Scoring) -> Self {
        Self::new(Board::new(), scoring)
    }
}

impl GameState for ConnectFourState {
    type Snapshot = Board;

    fn snapshot(&self) -> &Board {
        &self.board
    }

    fn is_terminal(&self) -> bool {
        is_game_over(&self.board)
    }

    fn successors(&self) -> Vec<Self> {
        next_boards(&self.board)
            .into_iter()
            .map(|board| Self::new(board, self.scoring))
            .collect()
    }

    fn terminal_score(&self, maximizing: bool) -> Score {
        match self.scoring {
            Scoring::Plain => endgame_score(&self.board, maximizing),
            Scoring::Faster => endgame_score_faster(&self.board, maximizing),
        }
    }
}

/// Sample positions used by the command-line driver and tests.
pub mod positions {
    /// X to move; X wins immediately in column 0.
    pub const NEARLY_OVER: &str = "\
.......
.......
.......
.......
..OO...
.XXXO..";

    /// O to move; O must block column 0 or lose.
    pub const UH_OH: &str = "\
.......
.......
.......
X......
X......
XO.O...";
}
