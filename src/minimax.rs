use log::{debug, trace};
use rand::Rng;

use crate::tic_tac_toe::{Board, Move, Player};

/// Value of a position under perfect play, ordered from the computer's
/// point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Outcome {
    HumanWin,
    Draw,
    ComputerWin,
}

impl Outcome {
    pub(crate) fn score(self) -> i8 {
        match self {
            Outcome::HumanWin => -1,
            Outcome::Draw => 0,
            Outcome::ComputerWin => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchResult {
    /// `None` at a leaf: there is only a score to report.
    pub(crate) best: Option<Move>,
    pub(crate) score: Outcome,
}

impl SearchResult {
    fn leaf(board: &Board) -> Self {
        Self {
            best: None,
            score: evaluate(board),
        }
    }
}

/// The computer's win is checked first, so a board where both sides hold a
/// line counts as a computer win.
pub(crate) fn evaluate(board: &Board) -> Outcome {
    if board.wins(Player::Computer) {
        Outcome::ComputerWin
    } else if board.wins(Player::Human) {
        Outcome::HumanWin
    } else {
        Outcome::Draw
    }
}

/// Exhaustive search for `player`'s best move. The computer maximizes and
/// the human minimizes; on equal scores the earliest cell in row-major order
/// is kept.
///
/// Candidate moves are played on `board` and undone before the next one is
/// tried, so the board is unchanged when this returns.
pub(crate) fn minimax(board: &mut Board, depth: usize, player: Player) -> SearchResult {
    if depth == 0 || board.is_game_over() {
        return SearchResult::leaf(board);
    }

    let mut best: Option<SearchResult> = None;
    for mv in board.empty_cells() {
        let placed = board.apply_move(mv, player);
        debug_assert!(placed, "empty cell {} rejected", mv);
        let score = minimax(board, depth - 1, player.opponent()).score;
        board.clear(mv);

        let improves = match best {
            None => true,
            Some(current) => match player {
                Player::Computer => score > current.score,
                Player::Human => score < current.score,
            },
        };
        if improves {
            best = Some(SearchResult {
                best: Some(mv),
                score,
            });
        }
    }

    best.unwrap_or_else(|| SearchResult::leaf(board))
}

/// Picks the computer's next move, or `None` once the game has ended.
///
/// On an empty board the opening is random: row and column are drawn
/// independently. Every later move comes from a full-depth search.
pub(crate) fn choose_move<R: Rng>(board: &mut Board, rng: &mut R) -> Option<Move> {
    let depth = board.empty_cells().len();
    if depth == 0 || board.is_game_over() {
        return None;
    }

    if depth == 9 {
        let mv = Move::new(rng.gen_range(0..3), rng.gen_range(0..3));
        debug!("random opening at {}", mv);
        return Some(mv);
    }

    let result = minimax(board, depth, Player::Computer);
    debug!(
        "searched {} plies: best {:?}, score {}",
        depth,
        result.best,
        result.score.score()
    );
    trace!("position searched: {:?}", board);
    result.best
}
