//! Unsynchronized LRU store.
//!
//! A `Store` composes the key index, the arena-backed recency list and the
//! slot pool. It is not thread-safe on its own; [`Cache`](crate::Cache) wraps
//! it in a single mutex.
//!
//! # Invariants
//!
//! - `index.len() == list.len() <= capacity`
//! - every handle in the index addresses a live node holding that key
//! - with pooling enabled the arena never holds more than `capacity` slots
//!
//! A key is hashed before either the index or the list is changed, so a
//! panicking `Hash` impl leaves both halves paired. Compaction rehashes a key
//! that is already indexed and assumes that hash does not panic.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

use hashbrown::HashMap;

use crate::entry::{Entry, Node, NodeHandle};
use crate::list::RecencyList;
use crate::pool::SlotPool;

/// Upper bound on the index and arena space reserved up front.
///
/// Capacity is only a size hint; very large caches grow on demand instead of
/// allocating everything at construction.
const MAX_PREALLOCATE: usize = 1 << 16;

/// Outcome of [`Store::insert`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Insertion<K, V> {
	/// The key was new. Carries the entry evicted to make room, if any.
	Inserted(Option<Entry<K, V>>),
	/// The key was present. Carries the caller's key and the replaced value.
	Updated(K, V),
}

/// Contents removed by [`Store::clear`].
///
/// Dropping it runs the destructors of every cleared key and value.
pub(crate) struct Drained<K, V> {
	len: usize,
	_keys: Vec<K>,
	_nodes: Vec<Node<K, V>>,
}

impl<K, V> Drained<K, V> {
	/// Number of entries that were live.
	pub fn len(&self) -> usize {
		self.len
	}
}

pub(crate) struct Store<K, V, S> {
	/// Key to arena handle
	index: HashMap<K, NodeHandle, S>,
	/// Recency order, most recent first
	list: RecencyList<K, V>,
	/// Retired slots ready for reuse
	pool: SlotPool,
	capacity: usize,
}

impl<K, V, S> Store<K, V, S>
where
	K: Hash + Eq + Clone,
	S: BuildHasher,
{
	/// Create a store holding at most `capacity` entries.
	pub fn new(capacity: usize, hasher: S, pooling: bool) -> Self {
		debug_assert!(capacity > 0);
		let reserve = capacity.min(MAX_PREALLOCATE);
		Self {
			index: HashMap::with_capacity_and_hasher(reserve, hasher),
			list: RecencyList::with_capacity(reserve),
			pool: SlotPool::new(pooling),
			capacity,
		}
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.list.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}

	pub fn pooling(&self) -> bool {
		self.pool.is_enabled()
	}

	/// Look up a value and mark it most recently used.
	pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let handle = *self.index.get(key)?;
		self.list.move_to_front(handle);
		self.list.entry(handle).map(|entry| &entry.value)
	}

	/// Mutable variant of [`get`](Self::get). Also promotes the entry.
	pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let handle = *self.index.get(key)?;
		self.list.move_to_front(handle);
		self.list.entry_mut(handle).map(|entry| &mut entry.value)
	}

	/// Look up a value without touching recency.
	pub fn peek<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let handle = *self.index.get(key)?;
		self.list.entry(handle).map(|entry| &entry.value)
	}

	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.index.contains_key(key)
	}

	/// Insert or update `key`, marking it most recently used.
	///
	/// Updating an existing key never evicts. A new key evicts the least
	/// recently used entry first when the store is full, so the list never
	/// holds more than `capacity` entries.
	pub fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
		if let Some(&handle) = self.index.get(&key)
			&& let Some(entry) = self.list.entry_mut(handle)
		{
			let previous = entry.replace_value(value);
			self.list.move_to_front(handle);
			return Insertion::Updated(key, previous);
		}

		let evicted = if self.list.len() >= self.capacity {
			self.evict()
		} else {
			None
		};

		// Index first so a panic while hashing leaves the list untouched
		let handle = self.pool.peek().unwrap_or_else(|| NodeHandle::new(self.list.slots()));
		self.index.insert(key.clone(), handle);
		let slot = self.pool.acquire();
		let linked = self.list.push_front(Entry::new(key, value), slot);
		debug_assert_eq!(linked, handle);
		Insertion::Inserted(evicted)
	}

	/// Remove an entry regardless of its position.
	pub fn remove<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let handle = self.index.remove(key)?;
		let entry = self.list.unlink(handle);
		self.retire(handle);
		entry
	}

	/// Remove the least recently used entry.
	///
	/// Returns `None` and changes nothing when the store is empty.
	pub fn evict(&mut self) -> Option<Entry<K, V>> {
		let handle = self.list.back()?;
		if let Some(entry) = self.list.entry(handle) {
			self.index.remove(&entry.key);
		}
		let entry = self.list.unlink(handle)?;
		self.retire(handle);
		Some(entry)
	}

	/// Keys from most to least recently used.
	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.list.iter().map(|entry| &entry.key)
	}

	/// Take every entry out of the store.
	///
	/// Nothing is dropped here; the caller drops the returned [`Drained`].
	pub fn clear(&mut self) -> Drained<K, V> {
		self.pool.clear();
		Drained {
			len: self.list.len(),
			_keys: self.index.drain().map(|(key, _)| key).collect(),
			_nodes: self.list.take(),
		}
	}

	/// Hand an unlinked slot to the pool, or compact it away when pooling is
	/// off.
	fn retire(&mut self, handle: NodeHandle) {
		if self.pool.release(handle) {
			return;
		}
		if let Some(moved) = self.list.compact(handle)
			&& let Some(slot) = self.index.get_mut(moved)
		{
			*slot = handle;
		}
	}

	#[cfg(test)]
	pub fn slots(&self) -> usize {
		self.list.slots()
	}

	#[cfg(test)]
	pub fn assert_consistent(&self) {
		self.list.assert_consistent();
		assert_eq!(self.index.len(), self.list.len());
		assert!(self.list.len() <= self.capacity);
		for (key, &handle) in &self.index {
			let entry = self.list.entry(handle).expect("index points at a retired slot");
			assert!(entry.key == *key, "index points at another key's node");
		}
		if self.pool.is_enabled() {
			assert!(self.list.slots() <= self.capacity);
			assert_eq!(self.list.slots(), self.list.len() + self.pool.len());
		} else {
			assert_eq!(self.list.slots(), self.list.len());
		}
	}
}
