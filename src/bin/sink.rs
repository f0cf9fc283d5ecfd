use clap::Parser;
use forge::config::TransferArgs;
use forge::stages::sink;
use forge::{error, logging};
use tracing::Instrument;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = TransferArgs::parse();
    logging::init();

    let span = logging::stage_span(sink::NAME);
    let result = sink::run(&args).instrument(span.clone()).await;
    span.in_scope(|| error::finish(result))
}
