use crate::entry::NodeHandle;

/// Free list of retired arena slots.
///
/// Reusing a slot avoids growing the arena on every insert under churn. The
/// pool only ever hands out slots whose entry has been taken, so reuse cannot
/// surface stale keys or values.
///
/// A disabled pool refuses every slot and the caller compacts the arena
/// instead. Both modes produce the same observable cache behaviour.
pub(crate) struct SlotPool {
	free: Vec<NodeHandle>,
	enabled: bool,
}

impl SlotPool {
	pub fn new(enabled: bool) -> Self {
		Self {
			free: Vec::new(),
			enabled,
		}
	}

	#[inline]
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Take a retired slot, if one is available.
	#[inline]
	pub fn acquire(&mut self) -> Option<NodeHandle> {
		self.free.pop()
	}

	/// The slot the next [`acquire`](Self::acquire) will return.
	#[inline]
	pub fn peek(&self) -> Option<NodeHandle> {
		self.free.last().copied()
	}

	/// Hand a retired slot back.
	///
	/// Returns `false` if the pool is disabled and the slot was not kept.
	#[inline]
	pub fn release(&mut self, handle: NodeHandle) -> bool {
		if self.enabled {
			self.free.push(handle);
		}
		self.enabled
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.free.len()
	}

	pub fn clear(&mut self) {
		self.free.clear();
	}
}
