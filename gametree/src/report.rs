use crossterm::{
    queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
};
use gametree_agents::{AnytimeValue, DeepeningProgress, SearchResult};
use gametree_core::connect_four::{COLS, ROWS};
use gametree_core::{is_terminal_score, Board, ConnectFourState, Player};
use std::fmt::Display;
use std::io::{self, Write};

pub fn display_board(out: &mut impl Write, board: &Board) -> io::Result<()> {
    queue!(out, Print("\n "))?;
    for col in 0..COLS {
        queue!(out, Print(format!("{col} ")))?;
    }
    queue!(out, Print("\n"))?;

    for row in (0..ROWS).rev() {
        queue!(out, Print("|"))?;
        for col in 0..COLS {
            match board.piece_at(row, col) {
                Some(player) => {
                    let color = match player {
                        Player::X => TermColor::Red,
                        Player::O => TermColor::Yellow,
                    };
                    queue!(
                        out,
                        SetForegroundColor(color),
                        Print(player.to_char()),
                        ResetColor,
                        Print("|")
                    )?;
                }
                None => queue!(out, Print(".|"))?,
            }
        }
        queue!(out, Print("\n"))?;
    }
    queue!(out, Print(format!("{} to move\n", board.current_player())))?;
    out.flush()
}

fn describe_score(score: i32) -> &'static str {
    if !is_terminal_score(score) {
        "estimate"
    } else if score > 0 {
        "maximizer wins"
    } else {
        "minimizer wins"
    }
}

pub fn print_summary<S>(result: &SearchResult<S>) {
    println!(
        "Score: {} ({})",
        result.score,
        describe_score(result.score)
    );
    println!("Depth: {}", result.depth());
    println!("Evaluations: {}", result.evaluations);
}

/// Prints a line of play as `A -> B -> C`.
pub fn print_path<S: Display>(result: &SearchResult<S>) {
    let path: Vec<String> = result.path.iter().map(|s| s.to_string()).collect();
    println!("Path: {}", path.join(" -> "));
    print_summary(result);
}

/// Prints a Connect Four line as the columns played, then the final board.
pub fn print_connect_four(result: &SearchResult<ConnectFourState>) -> io::Result<()> {
    let columns: Vec<String> = result
        .path
        .windows(2)
        .map(|pair| match pair[0].board.played_column(&pair[1].board) {
            Some(col) => col.to_string(),
            None => String::from("?"),
        })
        .collect();
    println!("Columns: {}", columns.join(" "));
    print_summary(result);
    display_board(&mut io::stdout(), &result.leaf_state().board)
}

pub fn print_progress(progress: &DeepeningProgress) {
    println!(
        "info depth {} score {} evaluations {} total {} time {}ms",
        progress.depth,
        progress.score,
        progress.evaluations,
        progress.total_evaluations,
        progress.elapsed.as_millis()
    );
}

pub fn print_anytime<S>(anytime: &AnytimeValue<S>) {
    println!(
        "Iterations: {} (total evaluations {})",
        anytime.iterations(),
        anytime.total_evaluations()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_rendering_contains_pieces() {
        let board = Board::new().add_piece(3).unwrap();
        let mut out = Vec::new();
        display_board(&mut out, &board).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('X'));
        assert!(text.contains("O to move"));
        assert_eq!(text.matches('|').count(), ROWS * (COLS + 1));
    }

    #[test]
    fn test_describe_score() {
        assert_eq!(describe_score(12), "estimate");
        assert_eq!(describe_score(1030), "maximizer wins");
        assert_eq!(describe_score(-1000), "minimizer wins");
    }
}
