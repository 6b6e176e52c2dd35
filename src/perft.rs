use crate::board::Board;

/// Counts leaf nodes of the pseudo-legal move tree. Moves that leave the king
/// en prise are included, so counts match legal perft only while no check can
/// arise (depth 3 from the start position and below).
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let moves = board.gen_moves();
    if depth == 1 { return moves.len() as u64; }
    moves.into_iter().map(|m| perft(&board.make_move(m), depth - 1)).sum()
}
