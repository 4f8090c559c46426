use crate::report::display_board;
use anyhow::Result;
use gametree_agents::Agent;
use gametree_core::connect_four::COLS;
use gametree_core::{ConnectFourState, GameState, Scoring};
use log::info;
use std::io::{self, BufRead, Write};

/// Parses a column number typed by the player.
fn parse_column(input: &str) -> Option<usize> {
    input.parse::<usize>().ok().filter(|&col| col < COLS)
}

fn announce_result(state: &ConnectFourState) {
    match state.board.winner() {
        Some(player) => println!("{player} wins!"),
        None => println!("Draw!"),
    }
}

/// Plays Connect Four between a human on stdin and an engine agent.
pub fn play_interactive(engine: &mut dyn Agent<ConnectFourState>, human_first: bool, scoring: Scoring) -> Result<()> {
    let mut state = ConnectFourState::starting(scoring);
    let mut history: Vec<ConnectFourState> = Vec::new();
    let mut stdout = io::stdout();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Connect Four - playing against {}", engine.name());
    println!("Enter a column (0-{}) to drop a piece", COLS - 1);
    println!("Commands: 'quit', 'undo', 'new', 'help'");

    let mut human_turn = human_first;
    loop {
        display_board(&mut stdout, &state.board)?;

        if state.is_terminal() {
            announce_result(&state);
            break;
        }

        if !human_turn {
            println!("Engine thinking...");
            match engine.choose(&state) {
                Some(next) => {
                    if let Some(col) = state.board.played_column(&next.board) {
                        println!("Engine plays: {col}");
                    }
                    history.push(state);
                    state = next;
                    human_turn = true;
                }
                None => {
                    println!("Engine has no move");
                    break;
                }
            }
            continue;
        }

        print!("Your move: ");
        stdout.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        match input {
            "quit" => break,
            "help" => {
                println!("Enter a column number between 0 and {}", COLS - 1);
                println!("Commands: quit, undo, new, help");
            }
            "new" => {
                state = ConnectFourState::starting(scoring);
                history.clear();
                human_turn = human_first;
                println!("New game started!");
            }
            "undo" => {
                // Take back the engine's reply and the human move before it.
                if history.len() >= 2 {
                    history.pop();
                    if let Some(previous) = history.pop() {
                        state = previous;
                    }
                    println!("Undid last move");
                } else {
                    println!("Nothing to undo");
                }
            }
            _ => match parse_column(input).map(|col| state.board.add_piece(col)) {
                Some(Ok(board)) => {
                    info!("human played {input}");
                    let next = ConnectFourState::new(board, scoring);
                    history.push(state);
                    state = next;
                    human_turn = false;
                }
                Some(Err(e)) => println!("Illegal move: {e}"),
                None => println!("Invalid input. Try a column between 0 and {}", COLS - 1),
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("0"), Some(0));
        assert_eq!(parse_column("6"), Some(6));
        assert_eq!(parse_column("7"), None);
        assert_eq!(parse_column("x"), None);
        assert_eq!(parse_column("-1"), None);
    }
}
