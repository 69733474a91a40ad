//! CLI entry point for the cell state distribution estimator

use clap::Parser;
use risq::io::cli::{Cli, Runner, init_tracing};

fn main() -> risq::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runner = Runner::new(cli);
    let mut out = std::io::stdout().lock();
    runner.run(&mut out)
}
