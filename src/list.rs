//! Arena-backed recency sequence.
//!
//! Nodes live in a single `Vec` and link to each other by [`NodeHandle`]
//! instead of pointers. The front of the list is the most recently used entry,
//! the back is the least recently used one. Splicing a node to the front and
//! removing the back node are both O(1) relinks.
//!
//! The list does not decide where slots come from. Callers pass in a vacant
//! slot taken from the recycling pool, or `None` to append a fresh one.

use crate::entry::{Entry, Node, NodeHandle};

pub(crate) struct RecencyList<K, V> {
	nodes: Vec<Node<K, V>>,
	/// Most recently used
	head: NodeHandle,
	/// Least recently used
	tail: NodeHandle,
	/// Number of live nodes
	len: usize,
}

impl<K, V> RecencyList<K, V> {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			nodes: Vec::with_capacity(capacity),
			head: NodeHandle::NIL,
			tail: NodeHandle::NIL,
			len: 0,
		}
	}

	/// Number of live entries.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of slots in the arena, live or retired.
	pub fn slots(&self) -> usize {
		self.nodes.len()
	}

	pub fn entry(&self, handle: NodeHandle) -> Option<&Entry<K, V>> {
		self.nodes.get(handle.index())?.entry.as_ref()
	}

	pub fn entry_mut(&mut self, handle: NodeHandle) -> Option<&mut Entry<K, V>> {
		self.nodes.get_mut(handle.index())?.entry.as_mut()
	}

	/// Handle of the least recently used node.
	pub fn back(&self) -> Option<NodeHandle> {
		(!self.tail.is_nil()).then_some(self.tail)
	}

	/// Store `entry` in a slot and link it at the front.
	///
	/// `slot` must be a retired slot of this arena. With `None` a new slot is
	/// appended.
	pub fn push_front(&mut self, entry: Entry<K, V>, slot: Option<NodeHandle>) -> NodeHandle {
		let handle = match slot {
			Some(handle) => {
				let node = &mut self.nodes[handle.index()];
				debug_assert!(!node.is_live(), "recycled slot is still live");
				node.entry = Some(entry);
				handle
			}
			None => {
				let handle = NodeHandle::new(self.nodes.len());
				self.nodes.push(Node::live(entry));
				handle
			}
		};
		self.link_front(handle);
		self.len += 1;
		handle
	}

	/// Splice a live node to the front.
	pub fn move_to_front(&mut self, handle: NodeHandle) {
		if self.head == handle {
			return;
		}
		self.detach(handle);
		self.link_front(handle);
	}

	/// Unlink a live node and take its entry. The slot is left retired.
	pub fn unlink(&mut self, handle: NodeHandle) -> Option<Entry<K, V>> {
		if !self.nodes.get(handle.index())?.is_live() {
			return None;
		}
		self.detach(handle);
		self.len -= 1;
		self.nodes[handle.index()].retire()
	}

	/// Remove a retired slot from the arena by moving the last slot into it.
	///
	/// Returns the key of the live entry that now sits at `hole`, whose
	/// handle changed from the old last index to `hole`.
	pub fn compact(&mut self, hole: NodeHandle) -> Option<&K> {
		let index = hole.index();
		debug_assert!(!self.nodes[index].is_live(), "compacting a live slot");
		let last = self.nodes.len() - 1;
		self.nodes.swap_remove(index);
		if index == last || !self.nodes[index].is_live() {
			return None;
		}

		let (prev, next) = {
			let node = &self.nodes[index];
			(node.prev, node.next)
		};
		if prev.is_nil() {
			self.head = hole;
		} else {
			self.nodes[prev.index()].next = hole;
		}
		if next.is_nil() {
			self.tail = hole;
		} else {
			self.nodes[next.index()].prev = hole;
		}

		self.nodes[index].entry.as_ref().map(|entry| &entry.key)
	}

	/// Iterate live entries from most to least recently used.
	pub fn iter(&self) -> Iter<'_, K, V> {
		Iter {
			list: self,
			cursor: self.head,
			remaining: self.len,
		}
	}

	/// Empty the list and hand back the arena with every entry still in it.
	pub fn take(&mut self) -> Vec<Node<K, V>> {
		self.head = NodeHandle::NIL;
		self.tail = NodeHandle::NIL;
		self.len = 0;
		std::mem::take(&mut self.nodes)
	}

	fn link_front(&mut self, handle: NodeHandle) {
		let old_head = self.head;
		{
			let node = &mut self.nodes[handle.index()];
			node.prev = NodeHandle::NIL;
			node.next = old_head;
		}
		if old_head.is_nil() {
			self.tail = handle;
		} else {
			self.nodes[old_head.index()].prev = handle;
		}
		self.head = handle;
	}

	fn detach(&mut self, handle: NodeHandle) {
		let (prev, next) = {
			let node = &self.nodes[handle.index()];
			(node.prev, node.next)
		};
		if prev.is_nil() {
			self.head = next;
		} else {
			self.nodes[prev.index()].next = next;
		}
		if next.is_nil() {
			self.tail = prev;
		} else {
			self.nodes[next.index()].prev = prev;
		}
		let node = &mut self.nodes[handle.index()];
		node.prev = NodeHandle::NIL;
		node.next = NodeHandle::NIL;
	}

	/// Walk the list in both directions and check it against `len`.
	#[cfg(test)]
	pub fn assert_consistent(&self) {
		let mut count = 0;
		let mut prev = NodeHandle::NIL;
		let mut cursor = self.head;
		while !cursor.is_nil() {
			let node = &self.nodes[cursor.index()];
			assert!(node.is_live(), "retired node reachable from head");
			assert_eq!(node.prev, prev, "broken back link at {cursor:?}");
			prev = cursor;
			cursor = node.next;
			count += 1;
			assert!(count <= self.len, "cycle in recency list");
		}
		assert_eq!(prev, self.tail, "tail does not terminate the list");
		assert_eq!(count, self.len);
		let live = self.nodes.iter().filter(|node| node.is_live()).count();
		assert_eq!(live, self.len);
	}
}

/// Iterator over live entries, front to back.
pub(crate) struct Iter<'a, K, V> {
	list: &'a RecencyList<K, V>,
	cursor: NodeHandle,
	remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
	type Item = &'a Entry<K, V>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.cursor.is_nil() {
			return None;
		}
		let node = &self.list.nodes[self.cursor.index()];
		self.cursor = node.next;
		self.remaining = self.remaining.saturating_sub(1);
		node.entry.as_ref()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
