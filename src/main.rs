use clap::Parser;
use gcodeforge::cli::Cli;
use gcodeforge::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.log_format)?;

    cli.run()
}
