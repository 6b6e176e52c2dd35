use std::collections::HashSet;

use log::{debug, trace};

use super::params::SearchParams;
use super::position::Position;
use super::tt::{Entry, Key, Tt};
use crate::board::{MATE_LOWER, MATE_UPPER};

/// One finished zero-window probe at the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchInfo<M> {
    pub depth: i32,
    pub gamma: i32,
    pub score: i32,
    /// Best root move known after this probe.
    pub best_move: Option<M>,
}

impl<M> SearchInfo<M> {
    /// The probe proved `score` is a lower bound, i.e. the root failed high.
    pub fn failed_high(&self) -> bool {
        self.score >= self.gamma
    }
}

pub struct Searcher<P: Position> {
    tt: Tt<P>,
    history: HashSet<P>,
    nodes: u64,
    params: SearchParams,
}

impl<P: Position> Default for Searcher<P> {
    fn default() -> Self {
        Self::new(SearchParams::default())
    }
}

impl<P: Position> Searcher<P> {
    pub fn new(params: SearchParams) -> Self {
        let mut s = Self { tt: Tt::new(), history: HashSet::new(), nodes: 0, params };
        s.tt.set_capacity_entries(params.hash_entries);
        s
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SearchParams) {
        self.params = params;
        self.tt.set_capacity_entries(params.hash_entries);
    }

    pub fn set_tt_capacity_mb(&mut self, mb: usize) {
        self.tt.set_capacity_mb(mb);
        self.params.hash_entries = self.tt.capacity();
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn tt(&self) -> &Tt<P> {
        &self.tt
    }

    /// Replaces the set of earlier positions treated as repetitions.
    pub fn set_history<I: IntoIterator<Item = P>>(&mut self, history: I) {
        self.history = history.into_iter().collect();
    }

    pub fn best_move(&self, pos: &P) -> Option<P::Move> {
        self.tt.best_move(pos)
    }

    /// Follows best moves from `root` until a position repeats or nothing is known.
    pub fn pv(&self, root: &P, max_len: usize) -> Vec<P::Move> {
        let mut seen = HashSet::new();
        let mut pos = root.clone();
        let mut line = Vec::new();
        while line.len() < max_len && seen.insert(pos.clone()) {
            let Some(m) = self.tt.best_move(&pos) else { break };
            line.push(m);
            pos = pos.make_move(m);
        }
        line
    }

    /// Fail-soft zero-window probe. For the true score `s` of `pos`:
    /// if `s < gamma` the result `r` satisfies `s <= r < gamma`,
    /// otherwise `gamma <= r <= s`.
    ///
    /// Depth 0 is quiescence search; negative depths behave the same.
    pub fn bound(&mut self, pos: &P, gamma: i32, depth: i32, can_null: bool) -> i32 {
        self.nodes += 1;
        let depth = depth.max(0);

        // Kings can be captured, so this is the only terminal test and
        // everything below must cope with mated or stalemated positions.
        if pos.score() <= -MATE_LOWER {
            return -MATE_UPPER;
        }

        let key = Key::new(pos.clone(), depth, can_null);
        let entry = self.tt.get(&key);
        if entry.lower >= gamma {
            return entry.lower;
        }
        if entry.upper < gamma {
            return entry.upper;
        }

        // The root is in history but is no draw, hence the can_null guard.
        // Quiescence skips the test so futility pruning stays sound.
        if can_null && depth > 0 && self.history.contains(pos) {
            return 0;
        }

        let best = self.search_moves(pos, gamma, depth, can_null);

        // Failing low at -MATE_UPPER means every move loses the king: either
        // mate or stalemate, told apart by whether the opponent could take
        // the king right now. Too costly to ask in quiescence.
        let best = if depth > 0 && best == -MATE_UPPER {
            let flipped = pos.rotate(true);
            let in_check = self.bound(&flipped, MATE_UPPER, 0, true) == MATE_UPPER;
            if in_check { -MATE_LOWER } else { 0 }
        } else {
            best
        };

        let stored = if best >= gamma { Entry { lower: best, upper: entry.upper } } else { Entry { lower: entry.lower, upper: best } };
        self.tt.put(key, stored);
        best
    }

    /// Tries candidates in order, stopping at the first fail-high.
    fn search_moves(&mut self, pos: &P, gamma: i32, depth: i32, can_null: bool) -> i32 {
        let mut best = -MATE_UPPER;

        // Null move, only with a piece besides pawns and king to dodge zugzwang.
        if depth > 2 && can_null && pos.has_null_move_material() {
            best = best.max(-self.bound(&pos.rotate(true), 1 - gamma, depth - 3, true));
            if best >= gamma {
                return best;
            }
        }

        // In quiescence the mover may simply stop capturing.
        if depth == 0 {
            best = best.max(pos.score());
            if best >= gamma {
                return best;
            }
        }

        // Internal iterative deepening when there is no hash move yet.
        let mut killer = self.tt.best_move(pos);
        if killer.is_none() && depth > 2 {
            self.bound(pos, gamma, depth - 3, false);
            killer = self.tt.best_move(pos);
        }

        let val_lower = if depth == 0 { self.params.qs } else { -MATE_LOWER };

        // The killer has to pass the same value filter as the rest, otherwise
        // quiescence would become unstable. It is searched again below, where
        // the table answers straight away.
        if let Some(k) = killer {
            if pos.value(k) >= val_lower {
                best = best.max(-self.bound(&pos.make_move(k), 1 - gamma, depth - 1, true));
                if best >= gamma {
                    self.tt.set_best_move(pos.clone(), k);
                    return best;
                }
            }
        }

        let mut moves: Vec<(i32, P::Move)> = pos.gen_moves().into_iter().map(|m| (pos.value(m), m)).collect();
        moves.sort_by(|a, b| b.0.cmp(&a.0));
        for (val, m) in moves {
            if val < val_lower {
                break;
            }
            // Futility: the opponent can stand pat below gamma after this move,
            // and later moves are worth even less. A king capture still counts as mate.
            if depth <= 1 && pos.score() + val < gamma {
                let score = if val < MATE_LOWER { pos.score() + val } else { MATE_UPPER };
                best = best.max(score);
                if best >= gamma {
                    self.tt.set_best_move(pos.clone(), m);
                }
                return best;
            }
            best = best.max(-self.bound(&pos.make_move(m), 1 - gamma, depth - 1, true));
            if best >= gamma {
                self.tt.set_best_move(pos.clone(), m);
                return best;
            }
        }
        best
    }

    /// Starts an iterative-deepening MTD-bi search from the last position of
    /// `history`. The table, node count and repetition set are reset.
    ///
    /// Nothing happens until the returned iterator is advanced; each `next`
    /// runs a single probe. Drop it to stop.
    pub fn search(&mut self, history: &[P]) -> Search<'_, P> {
        self.nodes = 0;
        self.history = history.iter().cloned().collect();
        self.tt.clear();
        let max_depth = self.params.max_depth;
        Search {
            root: history.last().cloned(),
            searcher: self,
            depth: 1,
            max_depth,
            gamma: 0,
            lower: -MATE_LOWER,
            upper: MATE_LOWER,
        }
    }
}

/// Lazy sequence of root probes with strictly growing depth.
pub struct Search<'a, P: Position> {
    searcher: &'a mut Searcher<P>,
    root: Option<P>,
    depth: i32,
    max_depth: i32,
    gamma: i32,
    lower: i32,
    upper: i32,
}

impl<'a, P: Position> Search<'a, P> {
    /// Stops after `depth` instead of the configured maximum.
    pub fn max_depth(mut self, depth: i32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn nodes(&self) -> u64 {
        self.searcher.nodes
    }

    /// Current `(lower, upper)` window on the root score at the current depth.
    pub fn window(&self) -> (i32, i32) {
        (self.lower, self.upper)
    }

    pub fn pv(&self, max_len: usize) -> Vec<P::Move> {
        match &self.root {
            Some(root) => self.searcher.pv(root, max_len),
            None => Vec::new(),
        }
    }
}

impl<'a, P: Position> Iterator for Search<'a, P> {
    type Item = SearchInfo<P::Move>;

    fn next(&mut self) -> Option<Self::Item> {
        let root = self.root.as_ref()?;
        if self.depth > self.max_depth {
            return None;
        }
        let roughness = self.searcher.params.eval_roughness;
        // Exact convergence is not worth the extra probes.
        while self.lower >= self.upper - roughness {
            debug!("depth {} done: score in [{}, {}], {} nodes", self.depth, self.lower, self.upper, self.searcher.nodes);
            self.depth += 1;
            self.lower = -MATE_LOWER;
            self.upper = MATE_LOWER;
            if self.depth > self.max_depth {
                return None;
            }
        }

        let score = self.searcher.bound(root, self.gamma, self.depth, false);
        if score >= self.gamma {
            self.lower = score;
        } else {
            self.upper = score;
        }
        let info = SearchInfo { depth: self.depth, gamma: self.gamma, score, best_move: self.searcher.best_move(root) };
        trace!("probe depth {} gamma {} -> {}", info.depth, info.gamma, score);
        self.gamma = (self.lower + self.upper + 1).div_euclid(2);
        Some(info)
    }
}
