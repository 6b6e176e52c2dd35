use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::board::{Board, BoardError, Game};
use crate::search::params::TUNABLES;
use crate::search::{SearchParams, Searcher};

const MAX_HASH_MB: i64 = 16_384;

/// Limits parsed from a `go` command. Anything unset is unlimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GoLimits {
    pub depth: Option<i32>,
    pub movetime: Option<Duration>,
    pub nodes: Option<u64>,
}

impl GoLimits {
    pub fn parse(args: &str) -> Self {
        let mut limits = Self::default();
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            match tok {
                "depth" => limits.depth = tokens.next().and_then(|s| s.parse().ok()),
                "movetime" => limits.movetime = tokens.next().and_then(|s| s.parse().ok()).map(Duration::from_millis),
                "nodes" => limits.nodes = tokens.next().and_then(|s| s.parse().ok()),
                _ => {}
            }
        }
        limits
    }

    fn is_empty(&self) -> bool {
        self.depth.is_none() && self.movetime.is_none() && self.nodes.is_none()
    }
}

pub struct UciEngine {
    game: Game,
    searcher: Searcher<Board>,
    default_movetime: Duration,
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new(SearchParams::default(), Duration::from_millis(1000))
    }
}

impl UciEngine {
    /// `default_movetime` applies to a `go` without depth, movetime or nodes.
    pub fn new(params: SearchParams, default_movetime: Duration) -> Self {
        Self { game: Game::startpos(), searcher: Searcher::new(params), default_movetime }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn params(&self) -> &SearchParams {
        self.searcher.params()
    }

    fn cmd_uci(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "id name Panterfish {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "id author Panterfish Team")?;
        let p = self.searcher.params();
        for (name, min, max) in TUNABLES {
            let default = if name == "QS" { p.qs } else { p.eval_roughness };
            writeln!(out, "option name {name} type spin default {default} min {min} max {max}")?;
        }
        writeln!(out, "option name Hash type spin default 0 min 0 max {MAX_HASH_MB}")?;
        writeln!(out, "uciok")
    }

    fn cmd_position(&mut self, args: &str) -> Result<(), BoardError> {
        // 'position startpos [moves ...]' or 'position fen <fen> [moves ...]'
        let (setup, moves) = match args.split_once("moves") {
            Some((setup, moves)) => (setup.trim(), moves.split_whitespace().map(str::to_string).collect()),
            None => (args.trim(), Vec::new()),
        };
        let mut game = if let Some(fen) = setup.strip_prefix("fen") {
            Game::from_fen(fen.trim())?
        } else {
            Game::startpos()
        };
        game.play_all(&moves)?;
        self.game = game;
        Ok(())
    }

    fn cmd_setoption(&mut self, args: &str, out: &mut impl Write) -> io::Result<()> {
        let rest = args.trim().strip_prefix("name").unwrap_or(args).trim();
        let (name, value) = match rest.split_once("value") {
            Some((n, v)) => (n.trim(), v.trim()),
            None => (rest, ""),
        };
        let Ok(value) = value.parse::<i64>() else {
            warn!("setoption {name}: bad value {value:?}");
            return writeln!(out, "info string bad value for {name}");
        };
        if name.eq_ignore_ascii_case("Hash") {
            if !(0..=MAX_HASH_MB).contains(&value) {
                return writeln!(out, "info string Hash must be within 0..={MAX_HASH_MB}");
            }
            self.searcher.set_tt_capacity_mb(value as usize);
            debug!("hash capacity now {:?} entries", self.searcher.params().hash_entries);
            return Ok(());
        }
        let mut params = *self.searcher.params();
        match params.set_option(name, value) {
            Ok(()) => {
                self.searcher.set_params(params);
                Ok(())
            }
            Err(e) => {
                warn!("setoption rejected: {e}");
                writeln!(out, "info string {e}")
            }
        }
    }

    fn cmd_go(&mut self, args: &str, out: &mut impl Write) -> io::Result<()> {
        let limits = GoLimits::parse(args);
        let movetime = if limits.is_empty() { Some(self.default_movetime) } else { limits.movetime };
        let start = Instant::now();
        let white = self.game.white_to_move();

        let mut search = self.searcher.search(self.game.positions());
        if let Some(d) = limits.depth {
            search = search.max_depth(d);
        }
        let mut best = None;
        while let Some(info) = search.next() {
            if info.best_move.is_some() {
                best = info.best_move;
            }
            if info.failed_high() {
                let mut side = white;
                let pv: Vec<String> = search.pv(32).into_iter().map(|m| {
                    let s = crate::board::render_uci_move(m, side);
                    side = !side;
                    s
                }).collect();
                writeln!(out, "info depth {} score cp {} nodes {} time {} pv {}",
                    info.depth, info.score, search.nodes(), start.elapsed().as_millis(), pv.join(" "))?;
            }
            if movetime.is_some_and(|t| start.elapsed() >= t) { break; }
            if limits.nodes.is_some_and(|n| search.nodes() >= n) { break; }
        }
        info!("search finished: {} nodes in {:?}", search.nodes(), start.elapsed());
        drop(search);

        match best {
            Some(m) => writeln!(out, "bestmove {}", self.game.render(m)),
            None => writeln!(out, "bestmove 0000"),
        }
    }

    /// Handles one protocol line. Returns `false` once `quit` is seen.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "" => {}
            "uci" => self.cmd_uci(out)?,
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => self.game = Game::startpos(),
            "position" => {
                if let Err(e) = self.cmd_position(rest) {
                    warn!("position rejected: {e}");
                    writeln!(out, "info string {e}")?;
                }
            }
            "setoption" => self.cmd_setoption(rest, out)?,
            "go" => self.cmd_go(rest, out)?,
            // Searches run synchronously; there is never anything to stop.
            "stop" => {}
            "d" => writeln!(out, "{}", self.game.board())?,
            "quit" => return Ok(false),
            other => warn!("unknown command: {other}"),
        }
        out.flush()?;
        Ok(true)
    }

    pub fn run_loop(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        for line in stdin.lock().lines() {
            let line = line?;
            if !self.handle_line(&line, &mut stdout.lock())? {
                break;
            }
        }
        Ok(())
    }
}
