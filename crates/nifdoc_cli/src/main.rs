#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "nifdoc", about = "NetImmerse/Gamebryo .nif inspection and rewriting tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print header versions, counts, and the block type histogram.
	Info(cmd::info::Args),
	/// List every block with its type, name, size, and links.
	Blocks(cmd::blocks::Args),
	/// Prune, sort, and refit a file.
	Optimize(cmd::optimize::Args),
	/// Re-target a file to another game's layout.
	Convert(cmd::convert::Args),
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> nifdoc::nif::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Blocks(args) => cmd::blocks::run(args),
		Commands::Optimize(args) => cmd::optimize::run(args),
		Commands::Convert(args) => cmd::convert::run(args),
	}
}
