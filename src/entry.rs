/// Handle addressing a node slot in the recency arena.
///
/// Handles are plain indices. They stay valid for as long as the slot is live
/// and are only recycled through the pool once the slot has been retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeHandle(usize);

impl NodeHandle {
	/// Sentinel used for missing links.
	pub const NIL: NodeHandle = NodeHandle(usize::MAX);

	pub fn new(index: usize) -> Self {
		debug_assert!(index != usize::MAX, "arena index out of range");
		Self(index)
	}

	#[inline]
	pub fn index(self) -> usize {
		self.0
	}

	#[inline]
	pub fn is_nil(self) -> bool {
		self == Self::NIL
	}
}

/// A cached key-value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
	pub key: K,
	pub value: V,
}

impl<K, V> Entry<K, V> {
	pub fn new(key: K, value: V) -> Self {
		Self {
			key,
			value,
		}
	}

	/// Replace the value, returning the previous one.
	pub fn replace_value(&mut self, value: V) -> V {
		std::mem::replace(&mut self.value, value)
	}

	pub fn into_parts(self) -> (K, V) {
		(self.key, self.value)
	}
}

/// A slot in the recency arena.
///
/// A live node owns its entry. A retired node has `entry == None` and is
/// unlinked; it carries nothing over into its next use.
pub(crate) struct Node<K, V> {
	pub entry: Option<Entry<K, V>>,
	/// Neighbour closer to the front (more recently used)
	pub prev: NodeHandle,
	/// Neighbour closer to the back (less recently used)
	pub next: NodeHandle,
}

impl<K, V> Node<K, V> {
	pub fn live(entry: Entry<K, V>) -> Self {
		Self {
			entry: Some(entry),
			prev: NodeHandle::NIL,
			next: NodeHandle::NIL,
		}
	}

	#[inline]
	pub fn is_live(&self) -> bool {
		self.entry.is_some()
	}

	/// Take the entry out and clear both links.
	pub fn retire(&mut self) -> Option<Entry<K, V>> {
		self.prev = NodeHandle::NIL;
		self.next = NodeHandle::NIL;
		self.entry.take()
	}
}
