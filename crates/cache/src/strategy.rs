//! Key equality strategies.
//!
//! A [`WeakKeyedCache`](crate::WeakKeyedCache) never hashes or compares a stored key
//! directly: the hash of a key is computed once, at insertion, through the cache's
//! strategy, and equality is only ever tested against keys that are still alive.

use std::fmt;
use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

/// Hashing and equality used to match probe keys against stored keys.
///
/// Implementations must be consistent: keys that compare equal must hash equally.
pub trait KeyStrategy<K: ?Sized> {
	/// Hash of `key`. Called on insertion and on every probe.
	fn hash_key(&self, key: &K) -> u64;

	/// Whether a live stored key and a probe key denote the same entry.
	fn keys_equal(&self, stored: &K, probe: &K) -> bool;
}

/// Uses the key type's own [`Hash`] and [`Eq`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalKeys;

impl<K: Hash + Eq + ?Sized> KeyStrategy<K> for NaturalKeys {
	fn hash_key(&self, key: &K) -> u64 {
		FxBuildHasher.hash_one(key)
	}

	fn keys_equal(&self, stored: &K, probe: &K) -> bool {
		stored == probe
	}
}

/// Compares keys by allocation address.
///
/// Two keys match only when they are the same object. The address of a stored key
/// cannot be reused while the cache still holds its weak reference, so a new object
/// never aliases a reclaimed one.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityKeys;

impl<K: ?Sized> KeyStrategy<K> for IdentityKeys {
	fn hash_key(&self, key: &K) -> u64 {
		FxBuildHasher.hash_one(std::ptr::from_ref(key).cast::<()>() as usize)
	}

	fn keys_equal(&self, stored: &K, probe: &K) -> bool {
		std::ptr::addr_eq(stored, probe)
	}
}

/// A strategy built from a hash function and an equality function.
#[derive(Clone, Copy)]
pub struct FnKeys<H, E> {
	hash: H,
	eq: E,
}

impl<H, E> FnKeys<H, E> {
	pub fn new(hash: H, eq: E) -> Self {
		Self { hash, eq }
	}
}

impl<H, E> fmt::Debug for FnKeys<H, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FnKeys").finish_non_exhaustive()
	}
}

impl<K, H, E> KeyStrategy<K> for FnKeys<H, E>
where
	K: ?Sized,
	H: Fn(&K) -> u64,
	E: Fn(&K, &K) -> bool,
{
	fn hash_key(&self, key: &K) -> u64 {
		(self.hash)(key)
	}

	fn keys_equal(&self, stored: &K, probe: &K) -> bool {
		(self.eq)(stored, probe)
	}
}
