use clap::Parser;
use forge::config::TransferArgs;
use forge::stages::source;
use forge::{error, logging};
use tracing::Instrument;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = TransferArgs::parse();
    logging::init();

    let span = logging::stage_span(source::NAME);
    let result = source::run(&args).instrument(span.clone()).await;
    span.in_scope(|| error::finish(result))
}
