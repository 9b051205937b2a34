//! Profile-scoped resolution rules.
//!
//! # Contract
//!
//! A binding is valid under an active profile set when it requires no profile, or
//! every profile it requires is active. A candidate list resolves only when exactly
//! one binding is valid. A second valid binding makes the list ambiguous and the
//! first is discarded with it: there is no priority between bindings, and picking
//! by registration order would hide a packaging mistake.

use crate::{Binding, ProfileSet};

/// Whether `binding` may serve while `active` profiles are in effect.
pub fn is_valid<T>(binding: &Binding<T>, active: ProfileSet) -> bool {
	binding.is_valid_for(active)
}

/// Returns the single valid binding in `bindings`, or `None` if there are zero or
/// several.
pub fn find_valid<T>(bindings: &[Binding<T>], active: ProfileSet) -> Option<&Binding<T>> {
	resolve_in(bindings, active).unique()
}

/// Resolves a candidate list, keeping enough detail for diagnostics.
pub fn resolve_in<T>(bindings: &[Binding<T>], active: ProfileSet) -> Resolution<'_, T> {
	let mut valid = bindings.iter().filter(|binding| is_valid(binding, active));
	match (valid.next(), valid.next()) {
		(None, _) => Resolution::Missing,
		(Some(only), None) => Resolution::Unique(only),
		(Some(first), Some(second)) => Resolution::Ambiguous { first, second },
	}
}

/// Outcome of resolving one contract.
#[derive(Debug)]
pub enum Resolution<'a, T> {
	/// Exactly one binding is valid.
	Unique(&'a Binding<T>),
	/// No binding is valid, or the contract has none.
	Missing,
	/// At least two bindings are valid; the first two found are reported.
	Ambiguous {
		first: &'a Binding<T>,
		second: &'a Binding<T>,
	},
}

impl<T> Clone for Resolution<'_, T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Resolution<'_, T> {}

impl<'a, T> Resolution<'a, T> {
	pub fn unique(self) -> Option<&'a Binding<T>> {
		match self {
			Self::Unique(binding) => Some(binding),
			Self::Missing | Self::Ambiguous { .. } => None,
		}
	}

	pub fn is_ambiguous(&self) -> bool {
		matches!(self, Self::Ambiguous { .. })
	}
}

/// A contract with more than one valid binding under some profile set.
#[derive(Debug)]
pub struct Ambiguity<'a, T> {
	pub contract: &'a str,
	pub profiles: ProfileSet,
	pub first: &'a Binding<T>,
	pub second: &'a Binding<T>,
}

#[cfg(test)]
mod tests;
