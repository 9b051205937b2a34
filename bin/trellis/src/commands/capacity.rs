use clap::Args;
use trellis_primitives::CapacityPolicy;

use super::Outcome;

#[derive(Args, Debug)]
pub struct CapacityArgs {
	/// Policy name: fixed, five-percent, default, reasonably-small. All when omitted
	#[arg(short, long)]
	pub policy: Option<CapacityPolicy>,

	/// Requested lengths in bytes
	#[arg(required = true)]
	pub lengths: Vec<usize>,
}

pub fn run(args: &CapacityArgs) -> anyhow::Result<Outcome> {
	let policies = match args.policy {
		Some(policy) => vec![policy],
		None => CapacityPolicy::ALL.to_vec(),
	};

	for policy in policies {
		for &len in &args.lengths {
			println!("{policy:>16} {len:>12} -> {}", policy.allocation_size(len));
		}
	}
	Ok(Outcome::Success)
}
