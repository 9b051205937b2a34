use clap::Args;
use trellis_registry::{LocateError, ServiceLocator};

use super::{ManifestArgs, Outcome};

#[derive(Args, Debug)]
pub struct ResolveArgs {
	#[command(flatten)]
	pub source: ManifestArgs,

	/// Contract name to resolve
	pub contract: String,
}

pub fn run(args: &ResolveArgs) -> anyhow::Result<Outcome> {
	let loaded = args.source.load()?;
	let locator = ServiceLocator::new(&loaded.registry, loaded.active)?;

	match locator.locate_binding(&args.contract) {
		Ok(binding) => {
			println!(
				"{} -> {} (requires {})",
				binding.contract(),
				binding.implementation(),
				binding.profiles()
			);
			Ok(Outcome::Success)
		}
		Err(err @ LocateError::Ambiguous { .. }) => {
			eprintln!("{err}");
			for binding in loaded.registry.bindings_for(&args.contract) {
				if binding.is_valid_for(loaded.active) {
					eprintln!("  candidate {} (requires {})", binding.implementation(), binding.profiles());
				}
			}
			Ok(Outcome::Failure)
		}
		Err(err) => {
			eprintln!("{err}");
			Ok(Outcome::Failure)
		}
	}
}
