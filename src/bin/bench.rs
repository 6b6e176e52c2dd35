use anyhow::Result;
use clap::Parser;
use panterfish::board::Game;
use panterfish::search::{SearchParams, Searcher};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "panterfish-bench", version, about = "Fixed-depth search benchmark")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// Search depth
    #[arg(long, default_value_t = 6)]
    depth: i32,

    /// Quiescence threshold
    #[arg(long, default_value_t = 35)]
    qs: i64,

    /// Root window tolerance
    #[arg(long, default_value_t = 15)]
    eval_roughness: i64,

    /// Transposition table size in MB (0 = unbounded)
    #[arg(long, default_value_t = 0)]
    hash_mb: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let game = if args.fen == "startpos" { Game::startpos() } else { Game::from_fen(&args.fen)? };

    let mut params = SearchParams::default();
    params.set_option("QS", args.qs)?;
    params.set_option("EVAL_ROUGHNESS", args.eval_roughness)?;
    let mut s = Searcher::new(params);
    s.set_tt_capacity_mb(args.hash_mb);

    let t0 = Instant::now();
    let mut search = s.search(game.positions()).max_depth(args.depth);
    let mut last = None;
    let mut probes = 0u32;
    while let Some(info) = search.next() {
        probes += 1;
        if info.best_move.is_some() { last = Some(info); }
    }
    let nodes = search.nodes();
    drop(search);
    let dt = t0.elapsed();
    let nps = if dt.as_secs_f64() > 0.0 { nodes as f64 / dt.as_secs_f64() } else { 0.0 };
    let (bestmove, score) = match last {
        Some(info) => (info.best_move.map(|m| game.render(m)).unwrap_or_default(), info.score),
        None => ("(none)".to_string(), 0),
    };
    println!("bestmove={} score_cp={} probes={} nodes={} tt={} elapsed={:.3}s nps={:.1}",
        bestmove, score, probes, nodes, s.tt().len(), dt.as_secs_f64(), nps);
    Ok(())
}
