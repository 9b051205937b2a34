//! Registration/query phase control.
//!
//! # Role
//!
//! A [`RegistryLifecycle`] owns the phase flag of one container generation. It hands
//! out [`PhaseToken`]s that registries consult before accepting a binding. Only the
//! lifecycle can lock, and locking is one-way: a reset builds the next generation
//! with a fresh flag instead of reopening the current one.
//!
//! # Invariants
//!
//! - The flag moves `unlocked -> locked` at most once per generation.
//! - Tokens of earlier generations are unaffected by later ones.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::BindingRegistry;

/// Read side of a generation's phase flag.
#[derive(Debug, Clone)]
pub struct PhaseToken {
	generation: u64,
	locked: Arc<AtomicBool>,
}

impl PhaseToken {
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether the registration window of this generation has closed.
	pub fn is_locked(&self) -> bool {
		self.locked.load(Ordering::Acquire)
	}

	/// Whether both tokens observe the same flag.
	pub fn shares_phase(&self, other: &PhaseToken) -> bool {
		Arc::ptr_eq(&self.locked, &other.locked)
	}
}

/// Owner of a container generation's phase flag.
#[derive(Debug)]
pub struct RegistryLifecycle {
	token: PhaseToken,
}

impl Default for RegistryLifecycle {
	fn default() -> Self {
		Self::new()
	}
}

impl RegistryLifecycle {
	/// Starts generation 1 in the registration phase.
	pub fn new() -> Self {
		Self::with_generation(1)
	}

	fn with_generation(generation: u64) -> Self {
		Self {
			token: PhaseToken {
				generation,
				locked: Arc::new(AtomicBool::new(false)),
			},
		}
	}

	/// Returns a token sharing this generation's flag.
	pub fn token(&self) -> PhaseToken {
		self.token.clone()
	}

	pub const fn generation(&self) -> u64 {
		self.token.generation
	}

	pub fn is_locked(&self) -> bool {
		self.token.is_locked()
	}

	/// Closes the registration window.
	///
	/// Returns `true` if this call performed the transition and `false` if the
	/// generation was already locked.
	pub fn lock(&self) -> bool {
		let transitioned = !self.token.locked.swap(true, Ordering::AcqRel);
		if transitioned {
			tracing::info!(generation = self.generation(), "registry lifecycle locked");
		}
		transitioned
	}

	/// Starts the next generation with a fresh, unlocked flag.
	///
	/// Registries of the current generation keep their token and stay as they are.
	pub fn next_generation(&self) -> Self {
		let next = self.generation().wrapping_add(1);
		tracing::info!(previous = self.generation(), generation = next, "registry lifecycle reset");
		Self::with_generation(next)
	}

	/// Creates an empty registry bound to this generation.
	pub fn registry<T>(&self) -> BindingRegistry<T> {
		BindingRegistry::new(self.token())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_unlocked() {
		let lifecycle = RegistryLifecycle::new();
		assert_eq!(lifecycle.generation(), 1);
		assert!(!lifecycle.is_locked());
		assert!(!lifecycle.token().is_locked());
	}

	#[test]
	fn lock_is_one_way_and_reports_first_transition() {
		let lifecycle = RegistryLifecycle::new();
		let token = lifecycle.token();
		assert!(lifecycle.lock());
		assert!(!lifecycle.lock());
		assert!(token.is_locked());
		assert!(lifecycle.is_locked());
	}

	#[test]
	fn tokens_share_the_flag() {
		let lifecycle = RegistryLifecycle::new();
		let a = lifecycle.token();
		let b = lifecycle.token();
		assert!(a.shares_phase(&b));
		lifecycle.lock();
		assert!(a.is_locked() && b.is_locked());
	}

	#[test]
	fn next_generation_is_fresh_and_independent() {
		let first = RegistryLifecycle::new();
		let old_token = first.token();
		first.lock();

		let second = first.next_generation();
		assert_eq!(second.generation(), 2);
		assert!(!second.is_locked());
		assert!(!second.token().shares_phase(&old_token));
		assert!(old_token.is_locked());

		second.lock();
		assert!(first.is_locked());
	}

	#[test]
	fn lock_is_visible_across_threads() {
		let lifecycle = RegistryLifecycle::new();
		let token = lifecycle.token();
		let reader = std::thread::spawn(move || {
			while !token.is_locked() {
				std::hint::spin_loop();
			}
			token.generation()
		});
		lifecycle.lock();
		assert_eq!(reader.join().unwrap(), 1);
	}
}
