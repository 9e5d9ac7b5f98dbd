use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::builder::CacheBuilder;
use crate::error::Error;
use crate::guard::Guard;
use crate::store::{Insertion, Store};

/// Thread-safe, capacity-bounded cache with least-recently-used eviction.
///
/// The cache can be shared across threads via `Arc<Cache>`. All methods are
/// synchronous and take a single exclusive lock for the duration of the call,
/// so operations are linearizable with respect to each other.
///
/// # Eviction
///
/// Entries are kept in a recency list. Every successful [`get`](Self::get),
/// [`get_ref`](Self::get_ref) and [`insert`](Self::insert) moves the entry to
/// the front. Inserting a *new* key into a full cache first evicts the entry
/// at the back, so the cache never holds more than `capacity` entries.
/// Updating an existing key never evicts.
///
/// [`peek`](Self::peek) and [`contains`](Self::contains) leave recency
/// untouched.
///
/// # Allocation
///
/// Nodes live in a single arena. Slots freed by eviction or removal are kept
/// in a free list and reused by later inserts, so a cache under constant
/// churn stops allocating once it is full. Slot reuse can be switched off
/// with [`CacheBuilder::pooling`] without changing behaviour.
///
/// # Example
///
/// ```
/// use lru_store::Cache;
///
/// let cache = Cache::new(2);
/// cache.insert("Alice", 1);
/// cache.insert("Bob", 2);
///
/// // Reading Alice makes Bob the least recently used entry
/// assert_eq!(cache.get("Alice"), Some(1));
///
/// cache.insert("Charlie", 3);
/// assert_eq!(cache.get("Bob"), None);
/// assert_eq!(cache.len(), 2);
/// ```
pub struct Cache<K, V, S = RandomState> {
	store: Mutex<Store<K, V, S>>,
	/// Copy of the store's capacity so `capacity()` and eviction traces do
	/// not take the lock. Both are fixed at construction.
	capacity: usize,
}

impl<K, V> Cache<K, V>
where
	K: Hash + Eq + Clone,
{
	/// Create a cache holding at most `capacity` entries.
	///
	/// # Panics
	///
	/// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) when the
	/// capacity comes from untrusted configuration.
	pub fn new(capacity: usize) -> Self {
		Self::with_hasher(capacity, RandomState::new())
	}

	/// Create a cache, reporting a zero capacity as an error.
	pub fn try_new(capacity: usize) -> Result<Self, Error> {
		CacheBuilder::new(capacity).try_build()
	}

	/// Start configuring a cache with the given capacity.
	pub fn builder(capacity: usize) -> CacheBuilder {
		CacheBuilder::new(capacity)
	}
}

impl<K, V, S> Cache<K, V, S>
where
	K: Hash + Eq + Clone,
	S: BuildHasher,
{
	/// Create a cache that hashes keys with `hasher`.
	///
	/// # Panics
	///
	/// Panics if `capacity` is zero.
	pub fn with_hasher(capacity: usize, hasher: S) -> Self {
		assert!(capacity > 0, "capacity must be greater than zero");
		Self::from_parts(capacity, hasher, true)
	}

	/// Internal constructor; `capacity` has already been validated.
	pub(crate) fn from_parts(capacity: usize, hasher: S, pooling: bool) -> Self {
		debug!(capacity, pooling, "created lru cache");
		Self {
			store: Mutex::new(Store::new(capacity, hasher, pooling)),
			capacity,
		}
	}

	/// Retrieve a cloned value and mark the entry most recently used.
	///
	/// Returns `None` on a miss, which leaves the cache untouched. The clone
	/// is safe to hold across `.await` points.
	///
	/// # Runtime Complexity
	///
	/// O(1) expected, plus the cost of cloning the value. Wrap expensive
	/// values in `Arc` to make the clone cheap.
	pub fn get<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
		V: Clone,
	{
		self.store.lock().get(key).cloned()
	}

	/// Retrieve a value via guard and mark the entry most recently used.
	///
	/// # Warning
	///
	/// The guard holds the cache lock. Do NOT hold it across `.await` points
	/// or call back into this cache while it is alive.
	pub fn get_ref<Q>(&self, key: &Q) -> Option<Guard<'_, V>>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let store = self.store.lock();
		MutexGuard::try_map(store, |store| store.get_mut(key)).ok().map(Guard::new)
	}

	/// Retrieve a cloned value without changing its recency.
	pub fn peek<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
		V: Clone,
	{
		self.store.lock().peek(key).cloned()
	}

	/// Check if a key is cached without changing its recency.
	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.store.lock().contains(key)
	}

	/// Insert a key-value pair and mark it most recently used.
	///
	/// Returns the previous value if the key existed. When a new key is
	/// inserted into a full cache, the least recently used entry is evicted
	/// and dropped after the lock has been released.
	///
	/// # Runtime Complexity
	///
	/// O(1) expected. At most one entry is evicted per call.
	pub fn insert(&self, key: K, value: V) -> Option<V> {
		let outcome = self.store.lock().insert(key, value);
		match outcome {
			Insertion::Inserted(evicted) => {
				if evicted.is_some() {
					self.trace_eviction();
				}
				None
			}
			Insertion::Updated(_, previous) => Some(previous),
		}
	}

	/// Insert a key-value pair, returning the entry the call displaced.
	///
	/// For a new key this is the evicted least recently used entry, if the
	/// cache was full. For an existing key it is the given key together with
	/// the replaced value.
	///
	/// # Example
	///
	/// ```
	/// use lru_store::Cache;
	///
	/// let cache = Cache::new(1);
	/// assert_eq!(cache.push(1, "one"), None);
	/// assert_eq!(cache.push(1, "uno"), Some((1, "one")));
	/// assert_eq!(cache.push(2, "two"), Some((1, "uno")));
	/// ```
	pub fn push(&self, key: K, value: V) -> Option<(K, V)> {
		let outcome = self.store.lock().insert(key, value);
		match outcome {
			Insertion::Inserted(evicted) => {
				let evicted = evicted?;
				self.trace_eviction();
				Some(evicted.into_parts())
			}
			Insertion::Updated(key, previous) => Some((key, previous)),
		}
	}

	/// Remove a key from the cache, returning its value.
	pub fn remove<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let entry = self.store.lock().remove(key)?;
		Some(entry.into_parts().1)
	}

	/// Remove and return the least recently used entry.
	pub fn pop_lru(&self) -> Option<(K, V)> {
		let entry = self.store.lock().evict()?;
		Some(entry.into_parts())
	}

	/// Snapshot of the cached keys, from most to least recently used.
	pub fn keys(&self) -> Vec<K> {
		self.store.lock().keys().cloned().collect()
	}

	/// Number of cached entries.
	pub fn len(&self) -> usize {
		self.store.lock().len()
	}

	/// Check if the cache is empty.
	pub fn is_empty(&self) -> bool {
		self.store.lock().is_empty()
	}

	/// Maximum number of entries.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Clear all entries.
	///
	/// Cleared keys and values are dropped after the lock has been released.
	///
	/// # Runtime Complexity
	///
	/// O(n) where n is the number of cached entries.
	pub fn clear(&self) {
		let drained = self.store.lock().clear();
		let dropped = drained.len();
		drop(drained);
		if dropped > 0 {
			trace!(dropped, "cleared lru cache");
		}
	}

	fn trace_eviction(&self) {
		trace!(capacity = self.capacity, "evicted least recently used entry");
	}
}

impl<K, V, S> std::fmt::Debug for Cache<K, V, S>
where
	K: Hash + Eq + Clone,
	S: BuildHasher,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let store = self.store.lock();
		f.debug_struct("Cache")
			.field("len", &store.len())
			.field("capacity", &self.capacity)
			.field("pooling", &store.pooling())
			.finish()
	}
}
