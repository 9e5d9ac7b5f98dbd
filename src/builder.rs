use std::hash::{BuildHasher, Hash};

use ahash::RandomState;

use crate::cache::Cache;
use crate::error::Error;

/// Builder for configuring a Cache.
///
/// # Example
///
/// ```
/// use lru_store::{Cache, CacheBuilder};
///
/// let cache: Cache<u64, String> = CacheBuilder::new(512)
///     .pooling(false)
///     .build();
/// assert_eq!(cache.capacity(), 512);
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder<S = RandomState> {
	capacity: usize,
	pooling: bool,
	hasher: S,
}

impl CacheBuilder {
	/// Create a new builder for a cache holding at most `capacity` entries.
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			pooling: true,
			hasher: RandomState::new(),
		}
	}
}

impl<S> CacheBuilder<S> {
	/// Enable or disable reuse of retired arena slots.
	///
	/// With pooling off, a slot freed by eviction or removal is compacted out
	/// of the arena and every insert of a new key appends a fresh slot. The
	/// cache behaves identically either way.
	///
	/// Default: enabled
	pub fn pooling(mut self, enabled: bool) -> Self {
		self.pooling = enabled;
		self
	}

	/// Hash keys with a custom hasher.
	///
	/// Default: `ahash::RandomState`
	pub fn hasher<H>(self, hasher: H) -> CacheBuilder<H> {
		CacheBuilder {
			capacity: self.capacity,
			pooling: self.pooling,
			hasher,
		}
	}

	/// Build the cache with the configured settings.
	///
	/// # Panics
	///
	/// Panics if the capacity is zero.
	pub fn build<K, V>(self) -> Cache<K, V, S>
	where
		K: Hash + Eq + Clone,
		S: BuildHasher,
	{
		assert!(self.capacity > 0, "capacity must be greater than zero");
		Cache::from_parts(self.capacity, self.hasher, self.pooling)
	}

	/// Build the cache, reporting a zero capacity as an error.
	pub fn try_build<K, V>(self) -> Result<Cache<K, V, S>, Error>
	where
		K: Hash + Eq + Clone,
		S: BuildHasher,
	{
		if self.capacity == 0 {
			return Err(Error::ZeroCapacity);
		}
		Ok(Cache::from_parts(self.capacity, self.hasher, self.pooling))
	}
}

impl Default for CacheBuilder {
	/// Create a builder with default settings and room for 1024 entries.
	fn default() -> Self {
		Self::new(1024)
	}
}
