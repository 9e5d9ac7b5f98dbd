use lru_store::{Cache, CacheBuilder};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
	Insert(u8, u32),
	Get(u8),
	Peek(u8),
	Remove(u8),
	PopLru,
}

fn op_strategy() -> impl Strategy<Value = Op> {
	prop_oneof![
		4 => (0u8..24, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
		3 => (0u8..24).prop_map(Op::Get),
		1 => (0u8..24).prop_map(Op::Peek),
		1 => (0u8..24).prop_map(Op::Remove),
		1 => Just(Op::PopLru),
	]
}

/// Straightforward LRU: a vector ordered from most to least recently used.
struct Model {
	entries: Vec<(u8, u32)>,
	capacity: usize,
}

impl Model {
	fn new(capacity: usize) -> Self {
		Self {
			entries: Vec::new(),
			capacity,
		}
	}

	fn position(&self, key: u8) -> Option<usize> {
		self.entries.iter().position(|(k, _)| *k == key)
	}

	fn get(&mut self, key: u8) -> Option<u32> {
		let pos = self.position(key)?;
		let entry = self.entries.remove(pos);
		self.entries.insert(0, entry);
		Some(entry.1)
	}

	fn peek(&self, key: u8) -> Option<u32> {
		self.position(key).map(|pos| self.entries[pos].1)
	}

	fn push(&mut self, key: u8, value: u32) -> Option<(u8, u32)> {
		if let Some(pos) = self.position(key) {
			let (_, previous) = self.entries.remove(pos);
			self.entries.insert(0, (key, value));
			return Some((key, previous));
		}
		let evicted = if self.entries.len() >= self.capacity { self.entries.pop() } else { None };
		self.entries.insert(0, (key, value));
		evicted
	}

	fn remove(&mut self, key: u8) -> Option<u32> {
		self.position(key).map(|pos| self.entries.remove(pos).1)
	}

	fn pop_lru(&mut self) -> Option<(u8, u32)> {
		self.entries.pop()
	}

	fn keys(&self) -> Vec<u8> {
		self.entries.iter().map(|(k, _)| *k).collect()
	}
}

fn check_against_model(cache: &Cache<u8, u32>, capacity: usize, ops: &[Op]) -> Result<(), TestCaseError> {
	let mut model = Model::new(capacity);

	for op in ops {
		match *op {
			Op::Insert(k, v) => prop_assert_eq!(cache.push(k, v), model.push(k, v)),
			Op::Get(k) => prop_assert_eq!(cache.get(&k), model.get(k)),
			Op::Peek(k) => prop_assert_eq!(cache.peek(&k), model.peek(k)),
			Op::Remove(k) => prop_assert_eq!(cache.remove(&k), model.remove(k)),
			Op::PopLru => prop_assert_eq!(cache.pop_lru(), model.pop_lru()),
		}
		prop_assert_eq!(cache.keys(), model.keys());
		prop_assert!(cache.len() <= capacity);
	}

	Ok(())
}

proptest! {
	#[test]
	fn test_matches_reference_model(capacity in 1usize..8, ops in prop::collection::vec(op_strategy(), 1..200)) {
		let cache = Cache::new(capacity);
		check_against_model(&cache, capacity, &ops)?;
	}

	#[test]
	fn test_matches_reference_model_without_pooling(capacity in 1usize..8, ops in prop::collection::vec(op_strategy(), 1..200)) {
		let cache = CacheBuilder::new(capacity).pooling(false).build();
		check_against_model(&cache, capacity, &ops)?;
	}

	#[test]
	fn test_capacity_invariant(capacity in 1usize..32, keys in prop::collection::vec(0u16..200, 1..400)) {
		let cache = Cache::new(capacity);

		for key in &keys {
			cache.insert(*key, *key);
			prop_assert!(cache.len() <= capacity);
		}

		let distinct = keys.iter().collect::<std::collections::HashSet<_>>().len();
		prop_assert_eq!(cache.len(), distinct.min(capacity));
	}

	#[test]
	fn test_update_keeps_len(key in 0u64..100, values in prop::collection::vec(any::<i64>(), 2..20)) {
		let cache = Cache::new(1);

		for value in &values {
			cache.insert(key, *value);
			prop_assert_eq!(cache.len(), 1);
		}

		prop_assert_eq!(cache.get(&key), values.last().copied());
	}

	#[test]
	fn test_miss_is_idempotent(present in prop::collection::vec(0u32..50, 1..20), probe in 50u32..100) {
		let cache = Cache::new(8);
		for key in &present {
			cache.insert(*key, ());
		}
		let before = cache.keys();

		prop_assert_eq!(cache.get(&probe), None);
		prop_assert_eq!(cache.keys(), before);
	}

	#[test]
	fn test_clear_empties_cache(keys in prop::collection::vec(0u32..100, 1..50)) {
		let cache = Cache::new(16);
		for key in &keys {
			cache.insert(*key, *key);
		}

		cache.clear();

		prop_assert_eq!(cache.len(), 0);
		prop_assert!(cache.is_empty());
		prop_assert!(cache.keys().is_empty());
	}
}

#[test]
fn test_no_panics_on_empty_operations() {
	let cache: Cache<u64, u64> = Cache::new(4);

	assert!(cache.get(&1).is_none());
	assert!(cache.peek(&1).is_none());
	assert!(cache.remove(&1).is_none());
	assert!(cache.pop_lru().is_none());
	assert!(!cache.contains(&1));
	assert_eq!(cache.len(), 0);

	cache.clear();
}
