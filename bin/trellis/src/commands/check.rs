use clap::Args;

use super::{ManifestArgs, Outcome};

#[derive(Args, Debug)]
pub struct CheckArgs {
	#[command(flatten)]
	pub source: ManifestArgs,
}

pub fn run(args: &CheckArgs) -> anyhow::Result<Outcome> {
	let loaded = args.source.load()?;
	let ambiguities = loaded.registry.ambiguities(loaded.active);

	if ambiguities.is_empty() {
		println!(
			"{} contracts, no ambiguous bindings under {}",
			loaded.registry.bindings().len(),
			loaded.active
		);
		return Ok(Outcome::Success);
	}

	for ambiguity in &ambiguities {
		println!(
			"{}: {} and {} are both valid under {}",
			ambiguity.contract,
			ambiguity.first.implementation(),
			ambiguity.second.implementation(),
			ambiguity.profiles
		);
	}
	Ok(Outcome::Failure)
}
