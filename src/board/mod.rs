//! 10x12 mailbox board in the mover's frame.
//!
//! The side to move always owns the upper-case pieces; every move returns the
//! board rotated 180 degrees with cases swapped, so the search never has to
//! branch on colour. Kings can be captured: there is no legality filter beyond
//! what pseudo-legal generation gives, and castling through check is punished
//! by letting the opponent "capture" the king on the squares it passed.

pub mod game;
pub mod pst;

use std::fmt;

use thiserror::Error;

pub use game::Game;
pub use pst::{MATE_LOWER, MATE_UPPER};

pub const A1: usize = 91;
pub const H1: usize = 98;
pub const A8: usize = 21;
pub const H8: usize = 28;

const N: isize = -10;
const E: isize = 1;
const S: isize = 10;
const W: isize = -1;

const PAWN_DIRS: [isize; 4] = [N, N + N, N + W, N + E];
const KNIGHT_DIRS: [isize; 8] = [N + N + E, E + N + E, E + S + E, S + S + E, S + S + W, W + S + W, W + N + W, N + N + W];
const BISHOP_DIRS: [isize; 4] = [N + E, S + E, S + W, N + W];
const ROOK_DIRS: [isize; 4] = [N, E, S, W];
const ROYAL_DIRS: [isize; 8] = [N, E, S, W, N + E, S + E, S + W, N + W];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("FEN must have at least 4 fields, got {0}")]
    FenFields(usize),
    #[error("bad FEN placement: {0}")]
    FenPlacement(String),
    #[error("bad side to move: {0}")]
    FenColor(String),
    #[error("bad square: {0}")]
    Square(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub const ALL: [Piece; 6] = [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King];
    pub const PROMOTIONS: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

    /// Case-insensitive.
    pub fn from_byte(b: u8) -> Option<Piece> {
        match b.to_ascii_uppercase() {
            b'P' => Some(Piece::Pawn),
            b'N' => Some(Piece::Knight),
            b'B' => Some(Piece::Bishop),
            b'R' => Some(Piece::Rook),
            b'Q' => Some(Piece::Queen),
            b'K' => Some(Piece::King),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Piece::Pawn => b'P',
            Piece::Knight => b'N',
            Piece::Bishop => b'B',
            Piece::Rook => b'R',
            Piece::Queen => b'Q',
            Piece::King => b'K',
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    fn directions(self) -> &'static [isize] {
        match self {
            Piece::Pawn => &PAWN_DIRS,
            Piece::Knight => &KNIGHT_DIRS,
            Piece::Bishop => &BISHOP_DIRS,
            Piece::Rook => &ROOK_DIRS,
            Piece::Queen | Piece::King => &ROYAL_DIRS,
        }
    }
}

/// A move in the mover's frame. Squares are mailbox indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u8,
    pub to: u8,
    pub promotion: Option<Piece>,
}

impl Move {
    pub fn new(from: usize, to: usize, promotion: Option<Piece>) -> Self {
        Self { from: from as u8, to: to as u8, promotion }
    }
}

/// Parses `e2` style coordinates into a white-frame mailbox index.
pub fn parse_square(s: &str) -> Result<usize, BoardError> {
    let b = s.as_bytes();
    if b.len() != 2 || !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
        return Err(BoardError::Square(s.to_string()));
    }
    let file = (b[0] - b'a') as usize;
    let rank = (b[1] - b'1') as usize;
    Ok(A1 + file - 10 * rank)
}

pub fn render_square(sq: usize) -> String {
    let rank = (A1 + 9 - sq) / 10;
    let file = (sq - 1) % 10;
    format!("{}{}", (b'a' + file as u8) as char, rank + 1)
}

/// Coordinates in UCI are always from white's side; black-to-move boards are rotated.
pub fn parse_uci_move(s: &str, white_to_move: bool) -> Result<Move, BoardError> {
    if s.len() < 4 || s.len() > 5 || !s.is_ascii() {
        return Err(BoardError::IllegalMove(s.to_string()));
    }
    let mut from = parse_square(&s[0..2])?;
    let mut to = parse_square(&s[2..4])?;
    let promotion = match s.as_bytes().get(4) {
        Some(&c) => match Piece::from_byte(c) {
            Some(p) if Piece::PROMOTIONS.contains(&p) => Some(p),
            _ => return Err(BoardError::IllegalMove(s.to_string())),
        },
        None => None,
    };
    if !white_to_move {
        from = 119 - from;
        to = 119 - to;
    }
    Ok(Move::new(from, to, promotion))
}

pub fn render_uci_move(m: Move, white_to_move: bool) -> String {
    let (mut from, mut to) = (m.from as usize, m.to as usize);
    if !white_to_move {
        from = 119 - from;
        to = 119 - to;
    }
    let mut out = format!("{}{}", render_square(from), render_square(to));
    if let Some(p) = m.promotion {
        out.push(p.to_byte().to_ascii_lowercase() as char);
    }
    out
}

const INITIAL_RANKS: [&[u8; 8]; 8] = [
    b"rnbqkbnr", b"pppppppp", b"........", b"........",
    b"........", b"........", b"PPPPPPPP", b"RNBQKBNR",
];

/// Castling rights as (a-file rook, h-file rook) in the owner's own frame.
pub type Castling = (bool, bool);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [u8; 120],
    score: i32,
    wc: Castling,
    bc: Castling,
    ep: usize,
    kp: usize,
}

impl Board {
    pub fn initial() -> Self {
        let mut cells = [b' '; 120];
        for (r, rank) in INITIAL_RANKS.iter().enumerate() {
            cells[A8 + r * 10..A8 + r * 10 + 8].copy_from_slice(&rank[..]);
        }
        Self::from_cells(cells, (true, true), (true, true), 0)
    }

    fn from_cells(cells: [u8; 120], wc: Castling, bc: Castling, ep: usize) -> Self {
        let mut score = 0;
        for (i, &c) in cells.iter().enumerate() {
            if let Some(p) = Piece::from_byte(c) {
                if c.is_ascii_uppercase() {
                    score += pst::square_value(p, i);
                } else {
                    score -= pst::square_value(p, 119 - i);
                }
            }
        }
        Self { cells, score, wc, bc, ep, kp: 0 }
    }

    /// Parses a FEN string. Clocks are accepted and ignored; the returned board
    /// is in the frame of the side to move.
    pub fn from_fen(fen: &str) -> Result<(Self, bool), BoardError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(BoardError::FenFields(fields.len()));
        }
        let mut cells = [b' '; 120];
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(BoardError::FenPlacement(fields[0].to_string()));
        }
        for (r, rank) in ranks.iter().enumerate() {
            let mut file = 0usize;
            for c in rank.bytes() {
                if let Some(n) = (c as char).to_digit(10) {
                    for _ in 0..n {
                        if file >= 8 { return Err(BoardError::FenPlacement(fields[0].to_string())); }
                        cells[A8 + r * 10 + file] = b'.';
                        file += 1;
                    }
                } else if Piece::from_byte(c).is_some() && file < 8 {
                    cells[A8 + r * 10 + file] = c;
                    file += 1;
                } else {
                    return Err(BoardError::FenPlacement(fields[0].to_string()));
                }
            }
            if file != 8 {
                return Err(BoardError::FenPlacement(fields[0].to_string()));
            }
        }
        let white = match fields[1] {
            "w" => true,
            "b" => false,
            other => return Err(BoardError::FenColor(other.to_string())),
        };
        let castling = fields[2];
        let wc = (castling.contains('Q'), castling.contains('K'));
        let bc = (castling.contains('k'), castling.contains('q'));
        let ep = if fields[3] == "-" { 0 } else { parse_square(fields[3])? };
        let board = Self::from_cells(cells, wc, bc, ep);
        Ok(if white { (board, true) } else { (board.rotate(false), false) })
    }

    /// Static evaluation from the mover's perspective.
    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn at(&self, sq: usize) -> u8 {
        self.cells[sq]
    }

    /// Flips the board to the opponent's frame. A null move also forgets the
    /// en-passant and king-passant squares, since they only live for one ply.
    pub fn rotate(&self, null_move: bool) -> Self {
        let mut cells = [b' '; 120];
        for (i, c) in cells.iter_mut().enumerate() {
            *c = swap_case(self.cells[119 - i]);
        }
        let flip = |sq: usize| if sq != 0 && !null_move { 119 - sq } else { 0 };
        Self { cells, score: -self.score, wc: self.bc, bc: self.wc, ep: flip(self.ep), kp: flip(self.kp) }
    }

    pub fn gen_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (i, &p) in self.cells.iter().enumerate() {
            if !p.is_ascii_uppercase() { continue; }
            let Some(piece) = Piece::from_byte(p) else { continue };
            for &d in piece.directions() {
                let mut j = i as isize + d;
                loop {
                    let ju = j as usize;
                    let q = self.cells[ju];
                    if q == b' ' || q.is_ascii_uppercase() { break; }
                    if piece == Piece::Pawn {
                        if (d == N || d == N + N) && q != b'.' { break; }
                        if d == N + N && (i < A1 - 10 || self.cells[i - 10] != b'.') { break; }
                        if (d == N + W || d == N + E) && q == b'.' && ju != self.ep && !self.near_king_passant(ju) { break; }
                        if (A8..=H8).contains(&ju) {
                            for prom in Piece::PROMOTIONS {
                                moves.push(Move::new(i, ju, Some(prom)));
                            }
                            break;
                        }
                    }
                    moves.push(Move::new(i, ju, None));
                    if matches!(piece, Piece::Pawn | Piece::Knight | Piece::King) || q.is_ascii_lowercase() { break; }
                    // Castling is generated as a rook slide that reaches the king.
                    if i == A1 && self.cells[ju + 1] == b'K' && self.wc.0 {
                        moves.push(Move::new(ju + 1, ju - 1, None));
                    }
                    if i == H1 && self.cells[ju - 1] == b'K' && self.wc.1 {
                        moves.push(Move::new(ju - 1, ju + 1, None));
                    }
                    j += d;
                }
            }
        }
        moves
    }

    fn near_king_passant(&self, sq: usize) -> bool {
        self.kp != 0 && sq.abs_diff(self.kp) < 2
    }

    /// Applies `m` and returns the resulting board in the opponent's frame.
    pub fn make_move(&self, m: Move) -> Self {
        let (i, j) = (m.from as usize, m.to as usize);
        let p = self.cells[i];
        let mut cells = self.cells;
        let (mut wc, mut bc) = (self.wc, self.bc);
        let (mut ep, mut kp) = (0, 0);
        let score = self.score + self.value(m);
        cells[j] = cells[i];
        cells[i] = b'.';
        if i == A1 { wc.0 = false; }
        if i == H1 { wc.1 = false; }
        if j == A8 { bc.1 = false; }
        if j == H8 { bc.0 = false; }
        if p == b'K' {
            wc = (false, false);
            if i.abs_diff(j) == 2 {
                kp = (i + j) / 2;
                cells[if j < i { A1 } else { H1 }] = b'.';
                cells[kp] = b'R';
            }
        }
        if p == b'P' {
            if (A8..=H8).contains(&j) {
                cells[j] = m.promotion.unwrap_or(Piece::Queen).to_byte();
            }
            if j + 20 == i {
                ep = i - 10;
            }
            if j == self.ep {
                cells[j + 10] = b'.';
            }
        }
        Self { cells, score, wc, bc, ep, kp }.rotate(false)
    }

    /// Change in static score caused by `m`; captures and promotions dominate.
    pub fn value(&self, m: Move) -> i32 {
        let (i, j) = (m.from as usize, m.to as usize);
        let Some(p) = Piece::from_byte(self.cells[i]) else { return 0 };
        let q = self.cells[j];
        let mut score = pst::square_value(p, j) - pst::square_value(p, i);
        if q.is_ascii_lowercase() {
            if let Some(captured) = Piece::from_byte(q) {
                score += pst::square_value(captured, 119 - j);
            }
        }
        if self.near_king_passant(j) {
            score += pst::square_value(Piece::King, 119 - j);
        }
        if p == Piece::King && i.abs_diff(j) == 2 {
            score += pst::square_value(Piece::Rook, (i + j) / 2);
            score -= pst::square_value(Piece::Rook, if j < i { A1 } else { H1 });
        }
        if p == Piece::Pawn {
            if (A8..=H8).contains(&j) {
                let prom = m.promotion.unwrap_or(Piece::Queen);
                score += pst::square_value(prom, j) - pst::square_value(Piece::Pawn, j);
            }
            if j == self.ep {
                score += pst::square_value(Piece::Pawn, 119 - (j + 10));
            }
        }
        score
    }

    /// True when the mover still has a knight, bishop, rook or queen.
    pub fn has_officers(&self) -> bool {
        self.cells.iter().any(|c| matches!(c, b'N' | b'B' | b'R' | b'Q'))
    }
}

fn swap_case(c: u8) -> u8 {
    if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else {
        c.to_ascii_uppercase()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..8 {
            let row = A8 + rank * 10;
            let line: String = self.cells[row..row + 8].iter().map(|&c| c as char).collect();
            writeln!(f, "{} {}", 8 - rank, line)?;
        }
        write!(f, "  abcdefgh")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(score={}, ep={}, kp={}, wc={:?}, bc={:?})\n{}", self.score, self.ep, self.kp, self.wc, self.bc, self)
    }
}

impl crate::search::Position for Board {
    type Move = Move;

    fn score(&self) -> i32 {
        self.score
    }

    fn rotate(&self, null_move: bool) -> Self {
        Board::rotate(self, null_move)
    }

    fn make_move(&self, m: Move) -> Self {
        Board::make_move(self, m)
    }

    fn gen_moves(&self) -> Vec<Move> {
        Board::gen_moves(self)
    }

    fn value(&self, m: Move) -> i32 {
        Board::value(self, m)
    }

    fn has_null_move_material(&self) -> bool {
        self.has_officers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn initial_position_has_twenty_moves() {
        assert_eq!(Board::initial().gen_moves().len(), 20);
    }

    #[test]
    fn rotate_twice_is_identity() {
        let b = Board::initial().make_move(parse_uci_move("e2e4", true).unwrap());
        assert_eq!(b.rotate(false).rotate(false), b);
    }

    #[test]
    fn score_is_incremental() {
        let mut b = Board::initial();
        let mut white = true;
        for mv in ["e2e4", "d7d5", "e4d5", "d8d5", "b1c3"] {
            let m = parse_uci_move(mv, white).unwrap();
            assert!(b.gen_moves().contains(&m), "{mv} not generated");
            b = b.make_move(m);
            white = !white;
        }
        // Recomputing from scratch must agree with the incremental score.
        let fresh = Board::from_cells(b.cells, b.wc, b.bc, b.ep);
        assert_eq!(fresh.score(), b.score());
    }

    #[test]
    fn square_roundtrip() {
        assert_eq!(parse_square("a1").unwrap(), A1);
        assert_eq!(parse_square("h8").unwrap(), H8);
        assert_eq!(render_square(parse_square("e4").unwrap()), "e4");
        assert!(parse_square("i9").is_err());
    }

    #[test]
    fn black_moves_render_in_white_coordinates() {
        let m = parse_uci_move("e7e5", false).unwrap();
        assert_eq!(render_uci_move(m, false), "e7e5");
        let after_e4 = Board::initial().make_move(parse_uci_move("e2e4", true).unwrap());
        assert!(after_e4.gen_moves().contains(&m));
    }

    #[test]
    fn promotion_suffix() {
        let m = parse_uci_move("a7a8n", true).unwrap();
        assert_eq!(m.promotion, Some(Piece::Knight));
        assert_eq!(render_uci_move(m, true), "a7a8n");
        assert!(parse_uci_move("a7a8k", true).is_err());
    }

    #[test]
    fn fen_startpos_matches_initial() {
        let (b, white) = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert!(white);
        assert_eq!(b, Board::initial());
    }

    #[test]
    fn fen_errors() {
        assert_eq!(Board::from_fen("8/8 w"), Err(BoardError::FenFields(2)));
        assert!(matches!(Board::from_fen("8/8/8/8/8/8/8/9 w - -"), Err(BoardError::FenPlacement(_))));
        assert!(matches!(Board::from_fen("8/8/8/8/8/8/8/8 x - -"), Err(BoardError::FenColor(_))));
    }

    #[test]
    fn castling_generated_when_path_is_clear() {
        let (b, _) = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = b.gen_moves();
        assert!(moves.contains(&parse_uci_move("e1g1", true).unwrap()));
        assert!(moves.contains(&parse_uci_move("e1c1", true).unwrap()));
        let castled = b.make_move(parse_uci_move("e1g1", true).unwrap()).rotate(false);
        assert_eq!(castled.at(parse_square("f1").unwrap()), b'R');
        assert_eq!(castled.at(parse_square("g1").unwrap()), b'K');
    }

    #[test]
    fn en_passant_capture_removes_pawn() {
        let (b, white) = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert!(white);
        let m = parse_uci_move("e5d6", true).unwrap();
        assert!(b.gen_moves().contains(&m));
        assert!(b.value(m) > pst::PAWN / 2);
        let after = b.make_move(m).rotate(false);
        assert_eq!(after.at(parse_square("d5").unwrap()), b'.');
    }

    #[test]
    fn officers_are_detected_for_mover_only() {
        let (b, _) = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(!b.has_officers());
        let (b, _) = Board::from_fen("3qk3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(!b.has_officers());
        assert!(b.rotate(true).has_officers());
    }
}
