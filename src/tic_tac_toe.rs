use std::fmt;

use crate::game::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Player {
    Human,
    Computer,
}

impl Player {
    pub(crate) fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Computer,
            Player::Computer => Player::Human,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Spot {
    #[default]
    Empty,
    Filled(Player),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Move {
    pub(crate) row: usize,
    pub(crate) col: usize,
}

impl Move {
    pub(crate) fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Numpad layout: 1-3 is the top row, 7-9 the bottom one.
    pub(crate) fn from_numpad(key: u32) -> Option<Self> {
        match key {
            1..=9 => {
                let index = (key - 1) as usize;
                Some(Self::new(index / 3, index % 3))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)], // row 1
    [(1, 0), (1, 1), (1, 2)], // row 2
    [(2, 0), (2, 1), (2, 2)], // row 3
    [(0, 0), (1, 0), (2, 0)], // column 1
    [(0, 1), (1, 1), (2, 1)], // column 2
    [(0, 2), (1, 2), (2, 2)], // column 3
    [(0, 0), (1, 1), (2, 2)], // diagonal
    [(2, 0), (1, 1), (0, 2)], // anti-diagonal
];

const SEPARATOR: &str = "---------------";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Board {
    spots: [[Spot; 3]; 3],
}

impl Board {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_spots(spots: [[Spot; 3]; 3]) -> Self {
        Self { spots }
    }

    pub(crate) fn spot(&self, mv: Move) -> Option<Spot> {
        self.spots.get(mv.row)?.get(mv.col).copied()
    }

    /// Every empty cell, in row-major order.
    pub(crate) fn empty_cells(&self) -> Vec<Move> {
        let mut cells = Vec::new();
        for (row, spots) in self.spots.iter().enumerate() {
            for (col, spot) in spots.iter().enumerate() {
                if *spot == Spot::Empty {
                    cells.push(Move::new(row, col));
                }
            }
        }
        cells
    }

    pub(crate) fn is_valid_move(&self, mv: Move) -> bool {
        self.spot(mv) == Some(Spot::Empty)
    }

    /// Places `player` at `mv`. Returns `false` and leaves the board alone
    /// when the cell is out of range or taken.
    pub(crate) fn apply_move(&mut self, mv: Move, player: Player) -> bool {
        if !self.is_valid_move(mv) {
            return false;
        }
        self.spots[mv.row][mv.col] = Spot::Filled(player);
        true
    }

    pub(crate) fn clear(&mut self, mv: Move) {
        if let Some(spot) = self.spots.get_mut(mv.row).and_then(|r| r.get_mut(mv.col)) {
            *spot = Spot::Empty;
        }
    }

    pub(crate) fn wins(&self, player: Player) -> bool {
        LINES.iter().any(|line| {
            line.iter()
                .all(|&(row, col)| self.spots[row][col] == Spot::Filled(player))
        })
    }

    /// True when either side has completed a line. A full board without a
    /// winner is not reported here; check `empty_cells` for the draw.
    pub(crate) fn is_game_over(&self) -> bool {
        self.wins(Player::Human) || self.wins(Player::Computer)
    }

    pub(crate) fn render(&self, human: Symbol, computer: Symbol) -> String {
        let mut out = format!("\n{}\n", SEPARATOR);
        for row in &self.spots {
            for spot in row {
                let symbol = match spot {
                    Spot::Empty => ' ',
                    Spot::Filled(Player::Human) => human.as_char(),
                    Spot::Filled(Player::Computer) => computer.as_char(),
                };
                out.push_str(&format!("| {} |", symbol));
            }
            out.push('\n');
            out.push_str(SEPARATOR);
            out.push('\n');
        }
        out
    }
}
