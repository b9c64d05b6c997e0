#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "onestore", about = "MS-ONESTORE .one / .onetoc2 inspection and validation")]
struct Cli {
	/// Raise log verbosity (-v debug, -vv trace).
	#[arg(short, long, global = true, action = ArgAction::Count)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print header fields, profile, and transaction log summary.
	Info(cmd::info::Args),
	/// Dump decoded file nodes.
	Nodes(cmd::nodes::Args),
	/// Decode the whole file and report structural violations.
	Check(cmd::check::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(command: Commands) -> onestore::store::Result<()> {
	match command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Nodes(args) => cmd::nodes::run(args),
		Commands::Check(args) => cmd::check::run(args),
	}
}

fn init_tracing(verbose: u8) {
	let default = match verbose {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};
	let filter = if verbose > 0 {
		EnvFilter::new(default)
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
	};
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(true).init();
}
