pub mod capacity;
pub mod check;
pub mod resolve;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use trellis_registry::{BindingManifest, BindingRegistry, ProfileSet, RegistryLifecycle};

/// What a command found, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Success,
	/// The query ran but its answer is a failure: unbound, ambiguous, or conflicting.
	Failure,
}

impl From<Outcome> for ExitCode {
	fn from(outcome: Outcome) -> Self {
		match outcome {
			Outcome::Success => ExitCode::SUCCESS,
			Outcome::Failure => ExitCode::FAILURE,
		}
	}
}

/// Manifest and profile selection shared by registry commands.
#[derive(Args, Debug)]
pub struct ManifestArgs {
	/// Binding manifest (TOML)
	#[arg(short, long, value_name = "PATH")]
	pub manifest: PathBuf,

	/// Active profile; repeatable. Defaults to the manifest's `active` list
	#[arg(short, long = "profile", value_name = "NAME")]
	pub profiles: Vec<String>,

	/// Raw profile mask, or-ed with any named profiles
	#[arg(long, value_name = "BITS")]
	pub mask: Option<u32>,
}

/// A locked registry built from one manifest.
pub struct Loaded {
	pub registry: BindingRegistry<String>,
	pub active: ProfileSet,
}

impl ManifestArgs {
	pub fn load(&self) -> anyhow::Result<Loaded> {
		let manifest = BindingManifest::load(&self.manifest)?;
		let lifecycle = RegistryLifecycle::new();
		let mut registry = lifecycle.registry();
		let count = manifest
			.register_into(&mut registry)
			.with_context(|| format!("registering bindings from {}", self.manifest.display()))?;
		lifecycle.lock();
		tracing::debug!(bindings = count, contracts = registry.bindings().len(), "manifest registered");

		let named = if self.profiles.is_empty() {
			manifest.active_profiles()?
		} else {
			manifest.profile_set(self.profiles.iter().map(String::as_str))?
		};
		let active = named | ProfileSet::from_mask(self.mask.unwrap_or(0));

		Ok(Loaded { registry, active })
	}
}
