use clap::Parser;
use forge::config::WorkerArgs;
use forge::stages::worker;
use forge::{error, logging};

fn main() -> anyhow::Result<()> {
    let args = WorkerArgs::parse();
    logging::init();

    logging::stage_span(worker::NAME).in_scope(|| error::finish(worker::run(&args)))
}
