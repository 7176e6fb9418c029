use anyhow::Result;
use clap::Parser;
use propdeck::args::PropdeckArgs;
use propdeck::{init_tracing, Propdeck};

#[tokio::main]
async fn main() -> Result<()> {
    let args = PropdeckArgs::parse();
    init_tracing(args.debug);

    Propdeck::new(&args).run(args).await
}
