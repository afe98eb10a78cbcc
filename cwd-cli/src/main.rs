//! CWD CLI - build waterdrop layouts from water delivery scenario exports.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "cwd-cli",
    version,
    about = "California water delivery scenario toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: cwd_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cwd_cmd::run(cli.command)
}
