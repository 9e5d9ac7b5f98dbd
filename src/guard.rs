use std::ops::Deref;

use parking_lot::MappedMutexGuard;

/// RAII guard for a borrowed cache value. Holds the cache lock.
///
/// Every other operation on the same cache blocks until the guard is dropped,
/// so keep it short-lived and never call back into the cache while holding
/// one.
///
/// **Intentionally `!Send`** to prevent holding it across `.await` points.
/// For async contexts, use [`Cache::get`](crate::Cache::get) instead.
///
/// # Example
///
/// ```
/// use lru_store::Cache;
///
/// let cache = Cache::new(8);
/// cache.insert("greeting", String::from("hello"));
///
/// let len = {
///     let guard = cache.get_ref("greeting").expect("just inserted");
///     guard.len()
/// }; // lock released here
/// assert_eq!(len, 5);
/// ```
///
/// Sending a guard to another thread does not compile:
///
/// ```compile_fail
/// use lru_store::Cache;
///
/// fn assert_send<T: Send>(_: T) {}
///
/// let cache = Cache::new(1);
/// cache.insert(1, 1);
/// assert_send(cache.get_ref(&1));
/// ```
pub struct Guard<'a, V> {
	inner: MappedMutexGuard<'a, V>,
}

impl<'a, V> Guard<'a, V> {
	pub(crate) fn new(inner: MappedMutexGuard<'a, V>) -> Self {
		Self {
			inner,
		}
	}
}

impl<V> Deref for Guard<'_, V> {
	type Target = V;

	fn deref(&self) -> &V {
		&self.inner
	}
}

impl<V: std::fmt::Debug> std::fmt::Debug for Guard<'_, V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		(**self).fmt(f)
	}
}

impl<V: std::fmt::Display> std::fmt::Display for Guard<'_, V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		(**self).fmt(f)
	}
}

impl<V: PartialEq> PartialEq<V> for Guard<'_, V> {
	fn eq(&self, other: &V) -> bool {
		**self == *other
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Cache;

	#[test]
	fn test_guard_is_sync() {
		fn assert_sync<T: Sync>() {}
		assert_sync::<Guard<'static, i32>>();
	}

	#[test]
	fn test_guard_derefs_to_value() {
		let cache = Cache::new(2);
		cache.insert(1u32, vec![1, 2, 3]);

		let guard = cache.get_ref(&1).expect("key 1 is live");
		assert_eq!(guard.len(), 3);
		assert_eq!(guard, vec![1, 2, 3]);
		assert_eq!(format!("{guard:?}"), "[1, 2, 3]");
	}

	#[test]
	fn test_guard_releases_lock_on_drop() {
		let cache = Cache::new(2);
		cache.insert("a", 1);

		drop(cache.get_ref("a"));
		assert_eq!(cache.get("a"), Some(1));
	}
}
