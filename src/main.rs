use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use panterfish::search::SearchParams;
use panterfish::uci::UciEngine;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Panterfish UCI engine", long_about = None)]
struct Args {
    /// JSON file with search parameters (qs, eval_roughness, max_depth, hash_entries)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Think time in milliseconds when `go` carries no limit
    #[arg(long, default_value_t = 1000)]
    movetime: u64,

    /// Quiescence threshold override
    #[arg(long)]
    qs: Option<i64>,

    /// Root window tolerance override
    #[arg(long)]
    eval_roughness: Option<i64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => SearchParams::from_json_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => SearchParams::default(),
    };
    if let Some(qs) = args.qs {
        params.set_option("QS", qs)?;
    }
    if let Some(r) = args.eval_roughness {
        params.set_option("EVAL_ROUGHNESS", r)?;
    }
    info!("starting with {:?}", params);

    let mut engine = UciEngine::new(params, Duration::from_millis(args.movetime));
    engine.run_loop()?;
    Ok(())
}
