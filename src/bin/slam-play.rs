// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use slam::core::Move;
use slam::{apply_move, initial_state, GameState};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Plays a sequence of moves and prints what each one did.
#[derive(Debug, StructOpt)]
struct Options {
    /// FEN representation of the starting position. Defaults to the standard start.
    #[structopt(long)]
    fen: Option<String>,

    /// Moves to play, e.g. `e2e4` or `e7-e5`.
    #[structopt(name = "MOVES")]
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::WARN)
        .with_env_filter(EnvFilter::from_env("SLAM_LOG"))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Options::from_args();
    let mut state = match args.fen {
        Some(ref fen) => GameState::from_fen(fen)?,
        None => initial_state(),
    };

    for token in &args.moves {
        let mov: Move = token
            .parse()
            .with_context(|| format!("bad move {:?}", token))?;
        let exec = apply_move(&state, mov).with_context(|| format!("cannot play {}", mov))?;
        println!("{:<10} {}", mov.to_string(), serde_json::to_string(&exec.events)?);
        state = exec.state;
    }

    println!("===========================");
    print!("{}", state);
    Ok(())
}
