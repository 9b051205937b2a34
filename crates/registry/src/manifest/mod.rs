//! TOML binding manifests.
//!
//! A manifest is how a plugin declares what it binds during the registration window:
//!
//! ```toml
//! active = ["interactive"]
//!
//! [profiles]
//! remote-dev = 8      # bit index of a plugin-defined profile
//!
//! [[binding]]
//! contract = "Clipboard"
//! implementation = "SystemClipboard"
//!
//! [[binding]]
//! contract = "Clipboard"
//! implementation = "MemoryClipboard"
//! profiles = ["headless"]
//!
//! [[binding]]
//! contract = "Terminal"
//! implementation = "PipeTerminal"
//! profiles = 9         # raw mask
//! ```
//!
//! Profile names resolve against the manifest's own `[profiles]` table first, then
//! against the named flags of [`ProfileSet`] in kebab case.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::{Binding, BindingRegistry, ProfileSet, RegistryError};

/// Errors raised while loading or applying a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
	#[error("failed to read manifest {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid manifest: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("unknown profile {name:?}")]
	UnknownProfile { name: String },
	#[error("profile {name:?} uses bit {bit}, but profile sets only have 32 bits")]
	BitOutOfRange { name: String, bit: u8 },
	#[error(transparent)]
	Registry(#[from] RegistryError),
}

/// Profiles a manifest binding requires.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProfileSpec {
	/// Raw bitmask.
	Mask(u32),
	/// Profile names, combined with bitwise or.
	Names(Vec<String>),
}

impl Default for ProfileSpec {
	fn default() -> Self {
		Self::Mask(0)
	}
}

/// One `[[binding]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingEntry {
	pub contract: String,
	pub implementation: String,
	#[serde(default)]
	pub profiles: ProfileSpec,
}

/// Parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingManifest {
	/// Plugin-defined profile names mapped to bit indices.
	#[serde(default)]
	pub profiles: BTreeMap<String, u8>,
	/// Profiles active when the manifest is used on its own.
	#[serde(default)]
	pub active: Vec<String>,
	#[serde(default, rename = "binding")]
	pub bindings: Vec<BindingEntry>,
}

impl FromStr for BindingManifest {
	type Err = ManifestError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(toml::from_str(s)?)
	}
}

impl BindingManifest {
	/// Reads and parses the manifest at `path`.
	pub fn load(path: &Path) -> Result<Self, ManifestError> {
		let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let manifest: Self = content.parse()?;
		tracing::debug!(
			path = %path.display(),
			bindings = manifest.bindings.len(),
			"binding manifest loaded"
		);
		Ok(manifest)
	}

	/// Resolves one profile name.
	pub fn profile(&self, name: &str) -> Result<ProfileSet, ManifestError> {
		if let Some(&bit) = self.profiles.get(name) {
			if u32::from(bit) >= u32::BITS {
				return Err(ManifestError::BitOutOfRange {
					name: name.to_string(),
					bit,
				});
			}
			return Ok(ProfileSet::from_mask(1 << bit));
		}
		ProfileSet::named(name).ok_or_else(|| ManifestError::UnknownProfile {
			name: name.to_string(),
		})
	}

	/// Resolves and combines several profile names.
	pub fn profile_set<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> Result<ProfileSet, ManifestError> {
		names
			.into_iter()
			.try_fold(ProfileSet::ANY, |set, name| -> Result<_, ManifestError> {
				Ok(set | self.profile(name)?)
			})
	}

	/// Profiles listed under `active`.
	pub fn active_profiles(&self) -> Result<ProfileSet, ManifestError> {
		self.profile_set(self.active.iter().map(String::as_str))
	}

	/// Resolves a binding's profile requirement.
	pub fn required_profiles(&self, spec: &ProfileSpec) -> Result<ProfileSet, ManifestError> {
		match spec {
			ProfileSpec::Mask(mask) => Ok(ProfileSet::from_mask(*mask)),
			ProfileSpec::Names(names) => self.profile_set(names.iter().map(String::as_str)),
		}
	}

	/// Registers every binding, building implementations with `make`.
	///
	/// All profile names are checked before anything is registered, so an unknown
	/// profile leaves `registry` untouched. Returns the number of bindings added.
	pub fn register_with<T>(
		&self,
		registry: &mut BindingRegistry<T>,
		mut make: impl FnMut(&BindingEntry) -> T,
	) -> Result<usize, ManifestError> {
		let resolved = self
			.bindings
			.iter()
			.map(|entry| -> Result<_, ManifestError> {
				Ok((entry, self.required_profiles(&entry.profiles)?))
			})
			.collect::<Result<Vec<_>, _>>()?;

		for (entry, profiles) in &resolved {
			registry.add_binding(Binding::scoped(entry.contract.as_str(), *profiles, make(entry)))?;
		}
		Ok(resolved.len())
	}

	/// Registers every binding with its implementation name as the payload.
	pub fn register_into(&self, registry: &mut BindingRegistry<String>) -> Result<usize, ManifestError> {
		self.register_with(registry, |entry| entry.implementation.clone())
	}
}
