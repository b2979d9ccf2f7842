use anyhow::Result;
use clap::Parser;
use options::Options;
mod options;
mod subcommand;

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse();
    options.subcommand.run()
}
