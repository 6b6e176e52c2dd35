// King-capture chess engine: MTD-bi search core, mailbox board and UCI front-end
pub mod board;
pub mod perft;
pub mod search;
pub mod uci;

pub use board::{Board, Game, Move, MATE_LOWER, MATE_UPPER};
pub use search::{Position, Search, SearchInfo, SearchParams, Searcher};
