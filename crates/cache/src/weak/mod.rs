//! Weak-keyed cache.
//!
//! # Mental Model
//!
//! Entries live in buckets addressed by the key hash captured at insertion. A slot
//! holds [`Weak`] handles to every equal key instance it was stored under, plus the
//! value itself, so the cache pins values but never keys. A slot with no strongly
//! owned key left is dead: lookups treat it as a miss and it is removed the next
//! time its bucket is touched.
//!
//! # Invariants
//!
//! - A value is never dropped while its key still has a strong owner, unless it is
//!   replaced, removed, or the cache is cleared.
//! - Dead slots are purged lazily. Each operation sweeps the bucket it touches, and a
//!   full sweep runs once the operations since the previous full sweep reach the
//!   stored slot count (floored by [`CacheConfig::sweep_floor`]). Dead slots therefore
//!   never outnumber live ones by more than a constant factor.
//! - Stored keys are never rehashed; only live keys are compared.
//! - No key or value destructor runs while the cache lock is held. Reclaimed slots
//!   and upgraded key handles are parked in a graveyard that outlives the guard,
//!   so a destructor may call back into the same cache.

use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::CacheError;
use crate::strategy::{KeyStrategy, NaturalKeys};

/// Tuning knobs for [`WeakKeyedCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
	/// Minimum number of operations between two full sweeps.
	pub sweep_floor: usize,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self { sweep_floor: 64 }
	}
}

struct Slot<K: ?Sized, V> {
	/// Equal key instances the value was stored under. Never empty.
	keys: Vec<Weak<K>>,
	value: V,
}

impl<K: ?Sized, V> Slot<K, V> {
	fn new(key: Weak<K>, value: V) -> Self {
		Self { keys: vec![key], value }
	}

	fn is_live(&self) -> bool {
		self.keys.iter().any(|key| key.strong_count() > 0)
	}

	/// Any strongly owned key of this slot.
	fn live_key(&self) -> Option<Arc<K>> {
		self.keys.iter().find_map(Weak::upgrade)
	}

	/// Adds `key` as another owner of this slot, forgetting reclaimed ones.
	fn adopt(&mut self, key: Weak<K>) {
		self.keys.retain(|held| held.strong_count() > 0);
		if !self.keys.iter().any(|held| Weak::ptr_eq(held, &key)) {
			self.keys.push(key);
		}
	}
}

/// Slots and key handles released while the lock is held.
///
/// Must be declared before the lock guard so it drops after it.
struct Graveyard<K: ?Sized, V> {
	slots: Vec<Slot<K, V>>,
	keys: Vec<Arc<K>>,
}

impl<K: ?Sized, V> Graveyard<K, V> {
	fn new() -> Self {
		Self {
			slots: Vec::new(),
			keys: Vec::new(),
		}
	}
}

struct Inner<K: ?Sized, V> {
	buckets: FxHashMap<u64, Vec<Slot<K, V>>>,
	/// Stored slots, dead ones included.
	stored: usize,
	ops_since_sweep: usize,
}

impl<K: ?Sized, V> Inner<K, V> {
	fn new() -> Self {
		Self {
			buckets: FxHashMap::default(),
			stored: 0,
			ops_since_sweep: 0,
		}
	}

	fn tick(&mut self, floor: usize, graveyard: &mut Graveyard<K, V>) {
		self.ops_since_sweep += 1;
		if self.ops_since_sweep >= self.stored.max(floor) {
			let purged = self.sweep(graveyard);
			if purged > 0 {
				tracing::debug!(purged, remaining = self.stored, "swept reclaimed cache keys");
			}
		}
	}

	fn sweep(&mut self, graveyard: &mut Graveyard<K, V>) -> usize {
		let before = graveyard.slots.len();
		self.buckets.retain(|_, bucket| {
			graveyard.slots.extend(bucket.extract_if(.., |slot| !slot.is_live()));
			!bucket.is_empty()
		});
		let purged = graveyard.slots.len() - before;
		self.stored -= purged;
		self.ops_since_sweep = 0;
		purged
	}

	/// Purges dead slots from one bucket and returns it if anything survives.
	fn live_bucket(&mut self, hash: u64, graveyard: &mut Graveyard<K, V>) -> Option<&mut Vec<Slot<K, V>>> {
		let (purged, empty) = {
			let bucket = self.buckets.get_mut(&hash)?;
			let before = graveyard.slots.len();
			graveyard.slots.extend(bucket.extract_if(.., |slot| !slot.is_live()));
			(graveyard.slots.len() - before, bucket.is_empty())
		};
		self.stored -= purged;
		if empty {
			self.buckets.remove(&hash);
			return None;
		}
		self.buckets.get_mut(&hash)
	}

	fn push(&mut self, hash: u64, slot: Slot<K, V>) {
		self.buckets.entry(hash).or_default().push(slot);
		self.stored += 1;
	}
}

/// Index of the live slot whose key matches `probe`.
///
/// Upgraded keys go to `graveyard` since an upgrade may end up as the last strong handle.
fn position<K, V, S>(bucket: &[Slot<K, V>], strategy: &S, probe: &K, graveyard: &mut Graveyard<K, V>) -> Option<usize>
where
	K: ?Sized,
	S: KeyStrategy<K>,
{
	bucket.iter().position(|slot| {
		let Some(stored) = slot.live_key() else {
			return false;
		};
		let equal = strategy.keys_equal(&stored, probe);
		graveyard.keys.push(stored);
		equal
	})
}

/// A thread-safe map whose keys may be reclaimed while they are cached.
///
/// Probes take `&K`, so any strong handle (or plain borrow) of an equal key can be
/// used for lookup. Insertion takes the key's [`Arc`] and stores only a [`Weak`].
pub struct WeakKeyedCache<K: ?Sized, V, S = NaturalKeys> {
	inner: Mutex<Inner<K, V>>,
	strategy: S,
	config: CacheConfig,
}

impl<K: Hash + Eq + ?Sized, V> WeakKeyedCache<K, V, NaturalKeys> {
	/// Creates an empty cache comparing keys by their own `Hash`/`Eq`.
	pub fn new() -> Self {
		Self::with_strategy(NaturalKeys)
	}
}

impl<K: Hash + Eq + ?Sized, V> Default for WeakKeyedCache<K, V, NaturalKeys> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V, S> WeakKeyedCache<K, V, S>
where
	K: ?Sized,
	S: KeyStrategy<K>,
{
	/// Creates an empty cache using `strategy` for key hashing and equality.
	pub fn with_strategy(strategy: S) -> Self {
		Self::with_config(strategy, CacheConfig::default())
	}

	pub fn with_config(strategy: S, config: CacheConfig) -> Self {
		Self {
			inner: Mutex::new(Inner::new()),
			strategy,
			config,
		}
	}

	/// Returns the strategy this cache was built with.
	pub fn strategy(&self) -> &S {
		&self.strategy
	}

	/// Returns the value cached for `key`, if its entry is still alive.
	pub fn get(&self, key: &K) -> Option<V>
	where
		V: Clone,
	{
		let hash = self.strategy.hash_key(key);
		let mut graveyard = Graveyard::new();
		let mut inner = self.inner.lock();
		inner.tick(self.config.sweep_floor, &mut graveyard);
		let bucket = inner.live_bucket(hash, &mut graveyard)?;
		let idx = position(bucket, &self.strategy, key, &mut graveyard)?;
		Some(bucket[idx].value.clone())
	}

	/// Whether a live entry exists for `key`.
	pub fn contains_key(&self, key: &K) -> bool {
		let hash = self.strategy.hash_key(key);
		let mut graveyard = Graveyard::new();
		let mut inner = self.inner.lock();
		inner.tick(self.config.sweep_floor, &mut graveyard);
		inner
			.live_bucket(hash, &mut graveyard)
			.is_some_and(|bucket| position(bucket, &self.strategy, key, &mut graveyard).is_some())
	}

	/// Associates `value` with `key`, returning the previous value of an equal live key.
	///
	/// When an equal key is already cached, the incoming instance joins the stored one:
	/// the entry stays alive while either of them is strongly owned.
	pub fn put(&self, key: &Arc<K>, value: V) -> Option<V> {
		self.insert(Arc::downgrade(key), key, value)
	}

	/// Like [`put`](Self::put), but for a caller that only holds a weak handle.
	///
	/// Fails with [`CacheError::ReclaimedKey`] if the key is already gone.
	pub fn put_weak(&self, key: &Weak<K>, value: V) -> Result<Option<V>, CacheError> {
		let strong = key.upgrade().ok_or(CacheError::ReclaimedKey)?;
		Ok(self.insert(Weak::clone(key), &*strong, value))
	}

	fn insert(&self, weak: Weak<K>, key: &K, value: V) -> Option<V> {
		let hash = self.strategy.hash_key(key);
		let mut graveyard = Graveyard::new();
		let mut inner = self.inner.lock();
		inner.tick(self.config.sweep_floor, &mut graveyard);
		if let Some(bucket) = inner.live_bucket(hash, &mut graveyard)
			&& let Some(idx) = position(bucket, &self.strategy, key, &mut graveyard)
		{
			let slot = &mut bucket[idx];
			slot.adopt(weak);
			return Some(std::mem::replace(&mut slot.value, value));
		}
		inner.push(hash, Slot::new(weak, value));
		None
	}

	/// Returns the cached value for `key`, computing and caching it on a miss.
	///
	/// `init` runs without the cache lock held. If another thread cached a value for an
	/// equal key in the meantime, that value wins and is returned.
	pub fn get_or_insert_with<F>(&self, key: &Arc<K>, init: F) -> V
	where
		V: Clone,
		F: FnOnce() -> V,
	{
		let probe: &K = key;
		if let Some(value) = self.get(probe) {
			return value;
		}
		let value = init();
		let hash = self.strategy.hash_key(probe);
		let mut graveyard = Graveyard::new();
		let mut inner = self.inner.lock();
		if let Some(bucket) = inner.live_bucket(hash, &mut graveyard)
			&& let Some(idx) = position(bucket, &self.strategy, probe, &mut graveyard)
		{
			let slot = &mut bucket[idx];
			slot.adopt(Arc::downgrade(key));
			return slot.value.clone();
		}
		inner.push(hash, Slot::new(Arc::downgrade(key), value.clone()));
		value
	}

	/// Removes the entry for `key` and returns its value.
	pub fn remove(&self, key: &K) -> Option<V> {
		let hash = self.strategy.hash_key(key);
		let mut graveyard = Graveyard::new();
		let mut inner = self.inner.lock();
		inner.tick(self.config.sweep_floor, &mut graveyard);
		let bucket = inner.live_bucket(hash, &mut graveyard)?;
		let idx = position(bucket, &self.strategy, key, &mut graveyard)?;
		let slot = bucket.swap_remove(idx);
		if bucket.is_empty() {
			inner.buckets.remove(&hash);
		}
		inner.stored -= 1;
		Some(slot.value)
	}

	/// Number of live entries. Runs a full sweep.
	pub fn len(&self) -> usize {
		let mut graveyard = Graveyard::new();
		let mut inner = self.inner.lock();
		inner.sweep(&mut graveyard);
		inner.stored
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drops every entry.
	pub fn clear(&self) {
		let buckets = {
			let mut inner = self.inner.lock();
			inner.stored = 0;
			inner.ops_since_sweep = 0;
			std::mem::take(&mut inner.buckets)
		};
		drop(buckets);
	}

	/// Removes every entry whose key has been reclaimed and returns how many were removed.
	pub fn purge(&self) -> usize {
		let mut graveyard = Graveyard::new();
		let purged = self.inner.lock().sweep(&mut graveyard);
		drop(graveyard);
		purged
	}

	/// Snapshot of all live entries with strong handles to their keys.
	pub fn entries(&self) -> Vec<(Arc<K>, V)>
	where
		V: Clone,
	{
		let inner = self.inner.lock();
		inner
			.buckets
			.values()
			.flatten()
			.filter_map(|slot| Some((slot.live_key()?, slot.value.clone())))
			.collect()
	}

	/// Slots currently stored, including dead ones not yet purged.
	#[cfg(test)]
	pub(crate) fn stored_slots(&self) -> usize {
		self.inner.lock().stored
	}
}

impl<K: ?Sized, V, S> fmt::Debug for WeakKeyedCache<K, V, S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner = self.inner.lock();
		f.debug_struct("WeakKeyedCache")
			.field("stored", &inner.stored)
			.field("buckets", &inner.buckets.len())
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}
