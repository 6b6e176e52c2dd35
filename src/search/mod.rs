//! MTD-bi search over any [`Position`].
//!
//! [`Searcher::bound`] is a fail-soft zero-window probe; [`Searcher::search`]
//! wraps it in iterative deepening with a binary search over the root score
//! and hands back each probe as it finishes.

pub mod params;
pub mod position;
pub mod searcher;
pub mod tt;

pub use params::{ParamError, SearchParams};
pub use position::Position;
pub use searcher::{Search, SearchInfo, Searcher};
