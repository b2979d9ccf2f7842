use crate::subcommand::Subcommand;
use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(
    version,
    about = "Deploy and exercise a SatForge OP_20 token against an in-memory substrate"
)]
pub struct Options {
    #[command(subcommand)]
    pub subcommand: Subcommand,
}
