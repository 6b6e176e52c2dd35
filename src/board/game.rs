use super::{parse_uci_move, render_uci_move, Board, BoardError, Move};

/// The positions visited so far, oldest first. The last board is the one to move from.
#[derive(Clone, Debug)]
pub struct Game {
    history: Vec<Board>,
    white_first: bool,
}

impl Game {
    pub fn startpos() -> Self {
        Self { history: vec![Board::initial()], white_first: true }
    }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let (board, white) = Board::from_fen(fen)?;
        Ok(Self { history: vec![board], white_first: white })
    }

    pub fn board(&self) -> &Board {
        // history is never empty: every constructor seeds it
        &self.history[self.history.len() - 1]
    }

    pub fn positions(&self) -> &[Board] {
        &self.history
    }

    pub fn plies(&self) -> usize {
        self.history.len() - 1
    }

    pub fn white_to_move(&self) -> bool {
        self.white_first == (self.plies() % 2 == 0)
    }

    /// Plays a move given in UCI coordinates. Only pseudo-legal moves are accepted.
    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<Move, BoardError> {
        let m = parse_uci_move(mv_uci, self.white_to_move())?;
        if !self.board().gen_moves().contains(&m) {
            return Err(BoardError::IllegalMove(mv_uci.to_string()));
        }
        let next = self.board().make_move(m);
        self.history.push(next);
        Ok(m)
    }

    pub fn render(&self, m: Move) -> String {
        render_uci_move(m, self.white_to_move())
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, BoardError> {
        let mut game = Self::startpos();
        game.play_all(moves)?;
        Ok(game)
    }

    pub fn play_all(&mut self, moves: &[String]) -> Result<(), BoardError> {
        for m in moves {
            self.make_move_uci(m)?;
        }
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::startpos()
    }
}
