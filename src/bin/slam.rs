// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;

use slam::protocol;
use slam::service::GameService;
use slam::store::MemoryStore;
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Plays slam chess over a line-oriented protocol on stdin and stdout. Games live in memory for the lifetime of the
/// process.
#[derive(Debug, StructOpt)]
struct Options {
    /// Pretty-print JSON responses.
    #[structopt(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_env_filter(EnvFilter::from_env("SLAM_LOG"))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Options::from_args();
    let service = GameService::new(MemoryStore::new());
    let stdin = io::stdin();
    let stdout = io::stdout();
    protocol::run(&service, stdin.lock(), stdout.lock(), args.pretty)?;
    Ok(())
}
