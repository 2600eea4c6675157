//! Ordered-map adapter over the red-black tree engine.

use std::fmt;

use crate::compare::{Comparator, NaturalOrder};
use crate::iter::{Iter, RawIter};
use crate::RedBlackTree;

/// A key/value map sorted by a comparator.
///
/// A thin pass-through over [`RedBlackTree`]: every operation forwards to
/// the engine, so the complexity and invariant guarantees are the engine's.
/// Use this type when you want a collection-flavored API surface; reach for
/// [`RedBlackTree`] directly when you need the conditional-insert or raw
/// cursor primitives.
///
/// # Example
///
/// ```
/// use rowantree::TreeMap;
///
/// let mut map = TreeMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
///
/// assert_eq!(map.get(&"a"), Some(&1));
/// assert_eq!(map.keys(), vec!["a", "b"]);
/// assert_eq!(map.floor(&"bb"), Some((&"b", &2)));
/// ```
pub struct TreeMap<K, V, C = NaturalOrder> {
	tree: RedBlackTree<K, V, C>,
}

impl<K: Ord, V> TreeMap<K, V, NaturalOrder> {
	/// Creates an empty map ordered by the keys' `Ord` implementation.
	pub fn new() -> Self {
		TreeMap {
			tree: RedBlackTree::new(),
		}
	}
}

impl<K: Ord, V> Default for TreeMap<K, V, NaturalOrder> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
	/// Creates an empty map ordered by `cmp`.
	pub fn with_comparator(cmp: C) -> Self {
		TreeMap {
			tree: RedBlackTree::with_comparator(cmp),
		}
	}

	/// Inserts a key/value pair, returning the previous value if the key was
	/// already present.
	pub fn insert(&mut self, key: K, value: V) -> Option<V> {
		self.tree.insert(key, value)
	}

	/// Returns a reference to the value stored under `key`.
	pub fn get(&self, key: &K) -> Option<&V> {
		self.tree.get(key)
	}

	/// Returns a mutable reference to the value stored under `key`.
	pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
		self.tree.get_mut(key)
	}

	/// Returns `true` if the map contains `key`.
	pub fn contains_key(&self, key: &K) -> bool {
		self.tree.contains_key(key)
	}

	/// Removes `key` from the map, returning its value if it was present.
	pub fn remove(&mut self, key: &K) -> Option<V> {
		self.tree.remove(key)
	}

	/// Returns `true` if the map holds no entries.
	pub fn is_empty(&self) -> bool {
		self.tree.is_empty()
	}

	/// Returns the number of entries in the map.
	pub fn len(&self) -> usize {
		self.tree.len()
	}

	/// Removes every entry.
	pub fn clear(&mut self) {
		self.tree.clear()
	}

	/// All keys in ascending order, as a fresh `Vec`.
	pub fn keys(&self) -> Vec<K>
	where
		K: Clone,
	{
		self.tree.keys()
	}

	/// All values in ascending key order, as a fresh `Vec`.
	pub fn values(&self) -> Vec<V>
	where
		V: Clone,
	{
		self.tree.values()
	}

	/// All values in descending key order, as a fresh `Vec`.
	pub fn values_rev(&self) -> Vec<V>
	where
		V: Clone,
	{
		self.tree.values_rev()
	}

	/// The entry with the smallest key, or `None` on an empty map.
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		self.tree.first_key_value()
	}

	/// The entry with the largest key, or `None` on an empty map.
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		self.tree.last_key_value()
	}

	/// The entry with the largest key less than or equal to `key`.
	///
	/// Misses either because the map is empty or because every key is
	/// greater than `key`.
	pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
		self.tree.floor(key)
	}

	/// The entry with the smallest key greater than or equal to `key`.
	pub fn ceiling(&self, key: &K) -> Option<(&K, &V)> {
		self.tree.ceiling(key)
	}

	/// A double-ended iterator over the entries in ascending key order.
	pub fn iter(&self) -> Iter<'_, K, V, C> {
		self.tree.iter()
	}

	/// A raw bidirectional cursor over the entries.
	pub fn raw_iter(&self) -> RawIter<'_, K, V, C> {
		self.tree.raw_iter()
	}
}

impl<'t, K, V, C: Comparator<K>> IntoIterator for &'t TreeMap<K, V, C> {
	type Item = (&'t K, &'t V);
	type IntoIter = Iter<'t, K, V, C>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<K, V, C> fmt::Debug for TreeMap<K, V, C>
where
	K: fmt::Debug,
	V: fmt::Debug,
	C: Comparator<K>,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}
