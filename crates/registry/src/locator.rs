//! Injector-facing service lookup.
//!
//! A [`ServiceLocator`] pairs a locked registry with the active profile set and turns
//! resolution outcomes into diagnostics an injector can report. Ambiguity is an
//! ordinary error value here, never a panic.

use crate::resolve::Resolution;
use crate::{Binding, BindingRegistry, ProfileSet};

/// Why a contract could not be served.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
	/// The registry's registration window is still open.
	#[error("registry generation {generation} is still accepting registrations")]
	NotLocked { generation: u64 },
	/// No binding for the contract is valid under the active profiles.
	#[error("no service binding for {contract} under profiles {profiles}")]
	Unbound { contract: String, profiles: ProfileSet },
	/// More than one binding is valid under the active profiles.
	#[error("ambiguous service binding for {contract} under profiles {profiles}: {candidates} candidates are valid")]
	Ambiguous {
		contract: String,
		profiles: ProfileSet,
		candidates: usize,
	},
}

/// Resolves contracts against a locked registry for one active profile set.
#[derive(Debug)]
pub struct ServiceLocator<'r, T> {
	registry: &'r BindingRegistry<T>,
	active: ProfileSet,
}

impl<T> Clone for ServiceLocator<'_, T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for ServiceLocator<'_, T> {}

impl<'r, T> ServiceLocator<'r, T> {
	/// Creates a locator over `registry`.
	///
	/// # Errors
	///
	/// [`LocateError::NotLocked`] while the registry can still change under readers.
	pub fn new(registry: &'r BindingRegistry<T>, active: ProfileSet) -> Result<Self, LocateError> {
		if !registry.is_locked() {
			return Err(LocateError::NotLocked {
				generation: registry.phase().generation(),
			});
		}
		Ok(Self { registry, active })
	}

	pub fn active(&self) -> ProfileSet {
		self.active
	}

	/// Returns a locator over the same registry with different active profiles.
	pub fn with_profiles(self, active: ProfileSet) -> Self {
		Self { active, ..self }
	}

	/// Returns the implementation bound to `contract`.
	pub fn locate(&self, contract: &str) -> Result<&'r T, LocateError> {
		self.locate_binding(contract).map(Binding::implementation)
	}

	/// Returns the binding that serves `contract`.
	pub fn locate_binding(&self, contract: &str) -> Result<&'r Binding<T>, LocateError> {
		match self.registry.resolve(contract, self.active) {
			Resolution::Unique(binding) => Ok(binding),
			Resolution::Missing => Err(LocateError::Unbound {
				contract: contract.to_string(),
				profiles: self.active,
			}),
			Resolution::Ambiguous { .. } => {
				let candidates = self
					.registry
					.bindings_for(contract)
					.iter()
					.filter(|binding| binding.is_valid_for(self.active))
					.count();
				tracing::warn!(
					contract,
					profiles = %self.active,
					candidates,
					"ambiguous service binding"
				);
				Err(LocateError::Ambiguous {
					contract: contract.to_string(),
					profiles: self.active,
					candidates,
				})
			}
		}
	}
}
