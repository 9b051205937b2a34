//! Trellis command line front end.
//!
//! Loads binding manifests the way a plugin loader would, locks the resulting
//! registry, and answers resolution queries against it.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
#[cfg(test)]
mod tests;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "trellis", version)]
#[command(about = "Inspect binding manifests and allocation policies")]
struct Args {
	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Resolve one contract under a profile set
	Resolve(commands::resolve::ResolveArgs),
	/// Report every contract that is ambiguous under a profile set
	Check(commands::check::CheckArgs),
	/// Print the allocation sizes a capacity policy picks
	Capacity(commands::capacity::CapacityArgs),
}

fn main() -> anyhow::Result<ExitCode> {
	let args = Args::parse();
	setup_tracing(args.verbose);

	let outcome = match args.command {
		Command::Resolve(cmd) => commands::resolve::run(&cmd),
		Command::Check(cmd) => commands::check::run(&cmd),
		Command::Capacity(cmd) => commands::capacity::run(&cmd),
	}?;
	Ok(outcome.into())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("TRELLIS_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("trellis=debug,trellis_registry=debug,trellis_cache=debug")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
