use std::fmt;

use anyhow::Result;
use log::{debug, info};
use rand::Rng;

use crate::minimax::{self, Outcome};
use crate::tic_tac_toe::{Board, Move, Player};

pub(crate) const FAREWELL: &str = "Bye";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Symbol {
    X,
    O,
}

impl Symbol {
    pub(crate) fn other(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    pub(crate) fn as_char(self) -> char {
        match self {
            Symbol::X => 'X',
            Symbol::O => 'O',
        }
    }

    /// Case-insensitive, surrounding whitespace ignored.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "X" => Some(Symbol::X),
            "O" => Some(Symbol::O),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// What the game needs from the terminal.
pub(crate) trait Console {
    fn clear(&mut self) -> Result<()>;

    fn show(&mut self, text: &str) -> Result<()>;

    /// Reads one line of input. `None` means the input is exhausted.
    fn prompt(&mut self, message: &str) -> Result<Option<String>>;

    /// Called after the computer has moved.
    fn pause(&mut self);
}

/// One game of human against computer, from symbol choice to the result.
pub(crate) struct Session<C, R> {
    console: C,
    rng: R,
    board: Board,
}

impl<C: Console, R: Rng> Session<C, R> {
    pub(crate) fn new(console: C, rng: R) -> Self {
        Self {
            console,
            rng,
            board: Board::new(),
        }
    }

    /// Plays until someone wins or the board fills up. Returns `Ok(None)`
    /// if the input ends before that.
    pub(crate) fn run(&mut self) -> Result<Option<Outcome>> {
        let outcome = self.play()?;
        if outcome.is_none() {
            self.console.show(FAREWELL)?;
        }
        Ok(outcome)
    }

    fn play(&mut self) -> Result<Option<Outcome>> {
        self.console.clear()?;
        let Some(human) = self.choose_symbol()? else {
            return Ok(None);
        };
        let computer = human.other();

        self.console.clear()?;
        let Some(mut computer_first) = self.choose_first()? else {
            return Ok(None);
        };
        info!("human plays {}, computer plays {}", human, computer);

        while !self.finished() {
            if computer_first {
                self.computer_turn(human, computer)?;
                computer_first = false;
            }
            if !self.human_turn(human, computer)? {
                return Ok(None);
            }
            self.computer_turn(human, computer)?;
        }

        let outcome = minimax::evaluate(&self.board);
        self.console.clear()?;
        let (header, verdict) = match outcome {
            Outcome::HumanWin => (Some(format!("Human turn [{}]", human)), "YOU WIN!"),
            Outcome::ComputerWin => (Some(format!("Computer turn [{}]", computer)), "YOU LOSE!"),
            Outcome::Draw => (None, "DRAW!"),
        };
        if let Some(header) = header {
            self.console.show(&header)?;
        }
        self.console.show(&self.board.render(human, computer))?;
        self.console.show(verdict)?;
        info!("game over: {:?}", outcome);
        Ok(Some(outcome))
    }

    fn finished(&self) -> bool {
        self.board.empty_cells().is_empty() || self.board.is_game_over()
    }

    fn choose_symbol(&mut self) -> Result<Option<Symbol>> {
        loop {
            self.console.show("")?;
            let Some(line) = self.console.prompt("Choose X or O\nChosen: ")? else {
                return Ok(None);
            };
            if let Some(symbol) = Symbol::parse(&line) {
                return Ok(Some(symbol));
            }
        }
    }

    /// `Some(true)` when the computer opens the game.
    fn choose_first(&mut self) -> Result<Option<bool>> {
        loop {
            let Some(line) = self.console.prompt("First to start?[y/n]: ")? else {
                return Ok(None);
            };
            match line.trim().to_ascii_uppercase().as_str() {
                "Y" => return Ok(Some(false)),
                "N" => return Ok(Some(true)),
                _ => {}
            }
        }
    }

    /// Returns `false` if the input ended before a legal move was entered.
    fn human_turn(&mut self, human: Symbol, computer: Symbol) -> Result<bool> {
        if self.finished() {
            return Ok(true);
        }

        self.console.clear()?;
        self.console.show(&format!("Human turn [{}]", human))?;
        self.console.show(&self.board.render(human, computer))?;
        loop {
            let Some(line) = self.console.prompt("Use numpad (1..9): ")? else {
                return Ok(false);
            };
            let Some(mv) = line.trim().parse::<u32>().ok().and_then(Move::from_numpad) else {
                self.console.show("Bad choice")?;
                continue;
            };
            if self.board.apply_move(mv, Player::Human) {
                debug!("human played {}", mv);
                return Ok(true);
            }
            self.console.show("Bad move")?;
        }
    }

    fn computer_turn(&mut self, human: Symbol, computer: Symbol) -> Result<()> {
        if self.finished() {
            return Ok(());
        }

        self.console.clear()?;
        self.console.show(&format!("Computer turn [{}]", computer))?;
        self.console.show(&self.board.render(human, computer))?;

        if let Some(mv) = minimax::choose_move(&mut self.board, &mut self.rng) {
            let placed = self.board.apply_move(mv, Player::Computer);
            debug_assert!(placed, "computer picked taken cell {}", mv);
            debug!("computer played {}", mv);
        }
        self.console.pause();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    /// Replays canned input and records everything shown.
    #[derive(Default)]
    struct Script {
        input: VecDeque<String>,
        output: Vec<String>,
        clears: usize,
        pauses: usize,
    }

    impl Script {
        fn new(lines: &[&str]) -> Self {
            Self {
                input: lines.iter().map(|l| l.to_string()).collect(),
                ..Default::default()
            }
        }

        fn shown(&self, text: &str) -> usize {
            self.output.iter().filter(|line| *line == text).count()
        }
    }

    impl Console for &mut Script {
        fn clear(&mut self) -> Result<()> {
            self.clears += 1;
            Ok(())
        }

        fn show(&mut self, text: &str) -> Result<()> {
            self.output.push(text.to_string());
            Ok(())
        }

        fn prompt(&mut self, message: &str) -> Result<Option<String>> {
            self.output.push(message.to_string());
            Ok(self.input.pop_front())
        }

        fn pause(&mut self) {
            self.pauses += 1;
        }
    }

    fn run(script: &mut Script) -> Option<Outcome> {
        Session::new(script, StdRng::seed_from_u64(3)).run().unwrap()
    }

    #[test]
    fn test_symbol_parse() {
        assert_eq!(Symbol::parse("x"), Some(Symbol::X));
        assert_eq!(Symbol::parse(" O\n"), Some(Symbol::O));
        assert_eq!(Symbol::parse("y"), None);
        assert_eq!(Symbol::parse(""), None);
        assert_eq!(Symbol::X.other(), Symbol::O);
        assert_eq!(Symbol::O.to_string(), "O");
    }

    #[test]
    fn test_eof_at_symbol_prompt() {
        let mut script = Script::new(&[]);
        assert_eq!(run(&mut script), None);
        assert_eq!(script.output.last().map(String::as_str), Some("Bye"));
    }

    #[test]
    fn test_eof_at_first_prompt() {
        // Unknown answers re-prompt without a message.
        let mut script = Script::new(&["q", "x", "maybe"]);
        assert_eq!(run(&mut script), None);
        assert_eq!(script.shown("Bad choice"), 0);
        assert_eq!(script.shown("Choose X or O\nChosen: "), 2);
        assert_eq!(script.shown("First to start?[y/n]: "), 2);
        assert_eq!(script.output.last().map(String::as_str), Some("Bye"));
    }

    #[test]
    fn test_bad_input_reprompts() {
        // Human opens in the corner, then tries garbage, a line that was not
        // UTF-8, an occupied cell and an out-of-range key before the input
        // runs out.
        let mut script = Script::new(&[
            "o", "maybe", "Y", "1", "abc", "\u{FFFD}\n", "1", "0", "10",
        ]);
        assert_eq!(run(&mut script), None);
        assert_eq!(script.shown("Bad choice"), 4);
        assert_eq!(script.shown("Bad move"), 1);
        assert_eq!(script.shown("Human turn [O]"), 2);
        assert_eq!(script.shown("Computer turn [X]"), 1);
        assert_eq!(script.pauses, 1);
        assert_eq!(script.output.last().map(String::as_str), Some("Bye"));
    }

    #[test]
    fn test_human_loses_to_perfect_play() {
        // The computer answers the corner with the centre, blocks the top
        // row and then forks the human.
        let mut script = Script::new(&["x", "y", "1", "3", "9", "7"]);
        assert_eq!(run(&mut script), Some(Outcome::ComputerWin));
        assert_eq!(script.output.last().map(String::as_str), Some("YOU LOSE!"));
        assert!(script.shown("Computer turn [O]") >= 2);
        assert_eq!(script.shown("YOU WIN!"), 0);
    }

    #[test]
    fn test_computer_opens() {
        let mut script = Script::new(&["X", "n"]);
        assert_eq!(run(&mut script), None);
        assert_eq!(script.shown("Computer turn [O]"), 1);
        assert_eq!(script.shown("Human turn [X]"), 1);
        assert_eq!(script.pauses, 1);
    }

    #[test]
    fn test_full_games_never_lost() {
        // The human walks the numpad keys in order, skipping taken cells.
        for seed in 0..10 {
            for first in ["y", "n"] {
                let mut lines = vec!["x", first];
                lines.extend(["1", "2", "3", "4", "5", "6", "7", "8", "9"].repeat(5));
                let mut script = Script::new(&lines);
                let outcome = Session::new(&mut script, StdRng::seed_from_u64(seed))
                    .run()
                    .unwrap();
                let outcome = outcome.expect("game should finish");
                assert_ne!(outcome, Outcome::HumanWin);
                assert!(script.clears > 0);
            }
        }
    }
}
