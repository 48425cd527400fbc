//! Console front end for the arbiter engine.
//!
//! Reads commands from stdin and drives a [`Game`] strictly through its
//! public boundary: moves go in via coordinate pairs, the board comes
//! out via `snapshot()`, and redraws happen only when the engine's
//! render hook has marked the board dirty.
//!
//! Commands: a move in coordinate notation (`e2e4`), `board`, `fen`,
//! `load <fen>`, `new`, `quit`.

use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use arbiter_core::Move;
use arbiter_engine::{BoardSnapshot, Game, GameState};

fn main() {
    let needs_redraw = Rc::new(Cell::new(true));
    let mut game = new_game(&needs_redraw);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("arbiter-cli - enter moves like e2e4, or 'board', 'fen', 'load <fen>', 'new', 'quit'");

    loop {
        redraw_if_dirty(&game, &needs_redraw);
        print!("{} > ", game.position().side_to_move);
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
        let input = line.trim();

        match input {
            "" => {}
            "quit" => break,
            "board" => needs_redraw.set(true),
            "fen" => println!("{}", game.to_fen()),
            "new" => {
                game = new_game(&needs_redraw);
                println!("New game. White to move.");
            }
            _ => {
                if let Some(fen) = input.strip_prefix("load ") {
                    match Game::from_fen(fen.trim()) {
                        Ok(loaded) => {
                            game = loaded;
                            attach_hook(&mut game, &needs_redraw);
                            needs_redraw.set(true);
                            println!("Position loaded. State: {}", game.state());
                        }
                        Err(e) => eprintln!("Cannot load position: {}", e),
                    }
                } else if let Some(m) = Move::from_coords(input) {
                    play(&mut game, m);
                } else {
                    eprintln!("Unrecognized command: {}", input);
                }
            }
        }
    }
}

fn new_game(needs_redraw: &Rc<Cell<bool>>) -> Game {
    let mut game = Game::new();
    attach_hook(&mut game, needs_redraw);
    needs_redraw.set(true);
    game
}

fn attach_hook(game: &mut Game, needs_redraw: &Rc<Cell<bool>>) {
    let flag = Rc::clone(needs_redraw);
    game.set_render_hook(move || flag.set(true));
}

fn play(game: &mut Game, m: Move) {
    match game.apply_move(m) {
        Ok(state) => {
            println!("{} played.", m);
            match state {
                GameState::Normal => {}
                GameState::Check => println!("Check!"),
                GameState::Checkmate => println!("Checkmate! {} wins.", winner(game)),
                GameState::Stalemate => println!("Stalemate! Game is a draw."),
            }
        }
        Err(e) => eprintln!("Rejected: {}", e),
    }
}

fn winner(game: &Game) -> &'static str {
    // The side to move is the one that got mated.
    match game.position().side_to_move {
        arbiter_core::Color::White => "Black",
        arbiter_core::Color::Black => "White",
    }
}

fn redraw_if_dirty(game: &Game, needs_redraw: &Cell<bool>) {
    if needs_redraw.replace(false) {
        print_board(&game.snapshot());
    }
}

fn print_board(grid: &BoardSnapshot) {
    for (row, rank) in grid.iter().enumerate() {
        print!("{} ", 8 - row);
        for square in rank {
            match square {
                Some(piece) => print!(" {}", piece.kind.to_fen_char(piece.color)),
                None => print!(" ."),
            }
        }
        println!();
    }
    println!("   a b c d e f g h");
}
