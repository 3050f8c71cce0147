use clap::Parser;
use tracing::debug;

use roverdb::cli::command::Cli;
use roverdb::cli::output::{self, OutputConfig};
use roverdb::cli::{self, Context};

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let ctx = match Context::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };
    ctx.config.init_logging();

    if let Err(e) = cli::execute(cli.command, &ctx) {
        debug!(error = ?e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
