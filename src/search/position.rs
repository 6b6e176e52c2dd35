use std::fmt::Debug;
use std::hash::Hash;

/// What the search needs from a game position.
///
/// Positions are always seen from the side to move (negamax convention):
/// `make_move` returns the child already rotated to the opponent, so scores
/// flip sign on every ply. Equality and hashing must identify a position
/// exactly, since positions key the transposition table.
pub trait Position: Clone + Eq + Hash {
    type Move: Copy + Eq + Hash + Debug;

    /// Static evaluation for the side to move.
    fn score(&self) -> i32;

    /// The same position seen by the opponent. With `null_move` set the turn is
    /// passed without moving, so transient state (en passant and the like) is dropped.
    fn rotate(&self, null_move: bool) -> Self;

    /// Applies `m` and returns the result from the opponent's perspective.
    fn make_move(&self, m: Self::Move) -> Self;

    /// Candidate moves in no particular order.
    fn gen_moves(&self) -> Vec<Self::Move>;

    /// Intrinsic worth of `m`, used for ordering, quiescence and futility pruning.
    fn value(&self, m: Self::Move) -> i32;

    /// Whether null-move pruning is safe, i.e. the mover has a piece other than
    /// pawns and the king. Zugzwang is too likely without one.
    fn has_null_move_material(&self) -> bool;
}
