use crate::ProfileSet;

/// One candidate implementation of a named contract.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding<T> {
	contract: Box<str>,
	profiles: ProfileSet,
	implementation: T,
}

impl<T> Binding<T> {
	/// Creates a binding valid under any profile.
	pub fn new(contract: impl Into<Box<str>>, implementation: T) -> Self {
		Self::scoped(contract, ProfileSet::ANY, implementation)
	}

	/// Creates a binding valid only while every profile in `profiles` is active.
	pub fn scoped(contract: impl Into<Box<str>>, profiles: ProfileSet, implementation: T) -> Self {
		Self {
			contract: contract.into(),
			profiles,
			implementation,
		}
	}

	pub fn contract(&self) -> &str {
		&self.contract
	}

	/// Profiles that must all be active; empty means unrestricted.
	pub fn profiles(&self) -> ProfileSet {
		self.profiles
	}

	pub fn implementation(&self) -> &T {
		&self.implementation
	}

	pub fn into_implementation(self) -> T {
		self.implementation
	}

	/// Whether this binding may serve while `active` profiles are in effect.
	pub fn is_valid_for(&self, active: ProfileSet) -> bool {
		active.satisfies(self.profiles)
	}
}
