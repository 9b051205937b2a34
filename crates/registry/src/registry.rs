//! Contract binding storage.
//!
//! # Role
//!
//! Holds candidate bindings grouped by contract name while the registration window
//! is open, then serves resolution queries. Mutation takes `&mut self`, so callers
//! serialize registration; once locked, shared references can be handed to any
//! number of reader threads.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::resolve::{self, Ambiguity, Resolution};
use crate::{Binding, PhaseToken, ProfileSet, RegistryError};

/// Contract name to bindings in registration order.
pub type BindingMap<T> = IndexMap<Box<str>, Vec<Binding<T>>, FxBuildHasher>;

/// Candidate bindings for named contracts, gated by a generation's phase token.
#[derive(Debug)]
pub struct BindingRegistry<T> {
	bindings: BindingMap<T>,
	phase: PhaseToken,
}

impl<T> BindingRegistry<T> {
	/// Creates an empty registry observing `phase`.
	pub fn new(phase: PhaseToken) -> Self {
		Self {
			bindings: BindingMap::default(),
			phase,
		}
	}

	pub fn phase(&self) -> &PhaseToken {
		&self.phase
	}

	pub fn is_locked(&self) -> bool {
		self.phase.is_locked()
	}

	/// Appends `binding` to its contract's candidates.
	///
	/// # Errors
	///
	/// [`RegistryError::Locked`] once the phase token is locked. The registry is
	/// left unchanged.
	pub fn add_binding(&mut self, binding: Binding<T>) -> Result<(), RegistryError> {
		if self.phase.is_locked() {
			tracing::error!(
				contract = binding.contract(),
				generation = self.phase.generation(),
				"binding offered after registry lock"
			);
			return Err(RegistryError::Locked {
				contract: binding.contract().to_string(),
				generation: self.phase.generation(),
			});
		}

		tracing::debug!(
			contract = binding.contract(),
			profiles = %binding.profiles(),
			"binding registered"
		);
		match self.bindings.get_mut(binding.contract()) {
			Some(candidates) => candidates.push(binding),
			None => {
				let contract = Box::from(binding.contract());
				self.bindings.insert(contract, vec![binding]);
			}
		}
		Ok(())
	}

	/// Drops every binding.
	///
	/// Not gated by the phase token; the container decides when a reload may clear.
	pub fn clear(&mut self) {
		tracing::debug!(
			generation = self.phase.generation(),
			contracts = self.bindings.len(),
			"registry cleared"
		);
		self.bindings.clear();
	}

	/// Read-only view of all bindings.
	pub fn bindings(&self) -> &BindingMap<T> {
		&self.bindings
	}

	/// Candidates for `contract`, empty if none were registered.
	pub fn bindings_for(&self, contract: &str) -> &[Binding<T>] {
		self.bindings.get(contract).map(Vec::as_slice).unwrap_or_default()
	}

	/// Contract names in first-registration order.
	pub fn contracts(&self) -> impl Iterator<Item = &str> {
		self.bindings.keys().map(|contract| &**contract)
	}

	/// Total number of bindings across all contracts.
	pub fn len(&self) -> usize {
		self.bindings.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	/// See [`resolve::is_valid`].
	pub fn is_valid(binding: &Binding<T>, active: ProfileSet) -> bool {
		resolve::is_valid(binding, active)
	}

	/// See [`resolve::find_valid`].
	pub fn find_valid(bindings: &[Binding<T>], active: ProfileSet) -> Option<&Binding<T>> {
		resolve::find_valid(bindings, active)
	}

	/// Resolves `contract` under `active` profiles.
	pub fn resolve(&self, contract: &str, active: ProfileSet) -> Resolution<'_, T> {
		let resolution = resolve::resolve_in(self.bindings_for(contract), active);
		if resolution.is_ambiguous() {
			tracing::debug!(contract, profiles = %active, "ambiguous binding override");
		}
		resolution
	}

	/// Every contract that is ambiguous under `active` profiles.
	pub fn ambiguities(&self, active: ProfileSet) -> Vec<Ambiguity<'_, T>> {
		self.bindings
			.iter()
			.filter_map(|(contract, candidates)| match resolve::resolve_in(candidates, active) {
				Resolution::Ambiguous { first, second } => Some(Ambiguity {
					contract: &**contract,
					profiles: active,
					first,
					second,
				}),
				Resolution::Unique(_) | Resolution::Missing => None,
			})
			.collect()
	}
}
