//! Ordered-set adapter over the red-black tree engine.

use std::fmt;

use crate::compare::{Comparator, NaturalOrder};
use crate::iter::Iter;
use crate::RedBlackTree;

/// A set of distinct items sorted by a comparator.
///
/// Stores items as tree keys with unit values, so membership is exactly key
/// occupancy in the engine and every operation keeps the engine's
/// logarithmic bounds.
///
/// # Example
///
/// ```
/// use rowantree::TreeSet;
///
/// let mut set = TreeSet::new();
/// set.insert(3);
/// set.insert(1);
/// set.insert(3); // already present
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(&1));
/// assert_eq!(set.values(), vec![1, 3]);
/// ```
pub struct TreeSet<T, C = NaturalOrder> {
	tree: RedBlackTree<T, (), C>,
}

impl<T: Ord> TreeSet<T, NaturalOrder> {
	/// Creates an empty set ordered by the items' `Ord` implementation.
	pub fn new() -> Self {
		TreeSet {
			tree: RedBlackTree::new(),
		}
	}
}

impl<T: Ord> Default for TreeSet<T, NaturalOrder> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T, C: Comparator<T>> TreeSet<T, C> {
	/// Creates an empty set ordered by `cmp`.
	pub fn with_comparator(cmp: C) -> Self {
		TreeSet {
			tree: RedBlackTree::with_comparator(cmp),
		}
	}

	/// Adds `item` to the set. Returns `true` if it was not already present.
	pub fn insert(&mut self, item: T) -> bool {
		self.tree.insert(item, ()).is_none()
	}

	/// Conditionally adds `item`: it goes in if absent, or if present and
	/// `keep(existing, candidate)` holds, in which case the stored item is
	/// replaced. Returns `true` if the item was stored.
	///
	/// Useful when items that compare equal carry distinguishable payloads
	/// and the newest should win.
	pub fn insert_if<F>(&mut self, item: T, keep: F) -> bool
	where
		F: FnOnce(&T, &T) -> bool,
	{
		self.tree.insert_if(item, (), keep)
	}

	/// Removes `item` from the set. Returns `true` if it was present.
	pub fn remove(&mut self, item: &T) -> bool {
		self.tree.remove(item).is_some()
	}

	/// Returns `true` if `item` is in the set.
	pub fn contains(&self, item: &T) -> bool {
		self.tree.contains_key(item)
	}

	/// Returns `true` if every item of `items` is in the set. Trivially true
	/// for an empty slice: any set is a superset of the empty set.
	pub fn contains_all(&self, items: &[T]) -> bool {
		items.iter().all(|item| self.contains(item))
	}

	/// Returns `true` if the set holds no items.
	pub fn is_empty(&self) -> bool {
		self.tree.is_empty()
	}

	/// Returns the number of items in the set.
	pub fn len(&self) -> usize {
		self.tree.len()
	}

	/// Removes every item.
	pub fn clear(&mut self) {
		self.tree.clear()
	}

	/// All items in ascending order, as a fresh `Vec`.
	pub fn values(&self) -> Vec<T>
	where
		T: Clone,
	{
		self.tree.keys()
	}

	/// All items in descending order, as a fresh `Vec`.
	pub fn values_rev(&self) -> Vec<T>
	where
		T: Clone,
	{
		self.tree.keys_rev()
	}

	/// The smallest item, or `None` on an empty set.
	pub fn first(&self) -> Option<&T> {
		self.tree.first_key_value().map(|(k, _)| k)
	}

	/// The largest item, or `None` on an empty set.
	pub fn last(&self) -> Option<&T> {
		self.tree.last_key_value().map(|(k, _)| k)
	}

	/// A double-ended iterator over the items in ascending order.
	pub fn iter(&self) -> SetIter<'_, T, C> {
		SetIter {
			inner: self.tree.iter(),
		}
	}
}

/// A double-ended iterator over a set's items in ascending order.
pub struct SetIter<'t, T, C> {
	inner: Iter<'t, T, (), C>,
}

impl<'t, T, C: Comparator<T>> Iterator for SetIter<'t, T, C> {
	type Item = &'t T;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|(item, _)| item)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<T, C: Comparator<T>> DoubleEndedIterator for SetIter<'_, T, C> {
	fn next_back(&mut self) -> Option<Self::Item> {
		self.inner.next_back().map(|(item, _)| item)
	}
}

impl<T, C: Comparator<T>> ExactSizeIterator for SetIter<'_, T, C> {}

impl<'t, T, C: Comparator<T>> IntoIterator for &'t TreeSet<T, C> {
	type Item = &'t T;
	type IntoIter = SetIter<'t, T, C>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<T, C> fmt::Debug for TreeSet<T, C>
where
	T: fmt::Debug,
	C: Comparator<T>,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}
