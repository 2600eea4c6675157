//! Comparator seam for the tree.
//!
//! Every ordering decision in the tree goes through a [`Comparator`] supplied
//! at construction. The tree never calls `Ord`/`PartialOrd` on keys directly,
//! so callers can impose any total order they need: reversed, by a projected
//! field, case-folded, and so on.
//!
//! A comparator must be a consistent strict total order over the keys it will
//! see. Supplying an inconsistent comparator (one that is not transitive, or
//! that answers differently for the same pair over time) does not produce an
//! error, it silently breaks the search-tree invariants.

use std::cmp::Ordering;

/// A three-way total order over `K`.
///
/// Implemented by [`NaturalOrder`] (delegates to `Ord`), by [`Reversed`],
/// and by any `Fn(&K, &K) -> Ordering` closure:
///
/// ```
/// use rowantree::RedBlackTree;
/// use std::cmp::Ordering;
///
/// // Order i32 keys by absolute value.
/// let mut tree = RedBlackTree::with_comparator(|a: &i32, b: &i32| a.abs().cmp(&b.abs()));
/// tree.insert(-5, "minus five");
/// tree.insert(2, "two");
/// assert_eq!(tree.first_key_value(), Some((&2, &"two")));
/// assert_eq!(tree.get(&5), Some(&"minus five")); // 5 and -5 compare equal
/// ```
pub trait Comparator<K: ?Sized> {
	/// Compares `a` against `b`, returning `Less`, `Equal`, or `Greater`.
	fn cmp(&self, a: &K, b: &K) -> Ordering;
}

impl<K: ?Sized, F> Comparator<K> for F
where
	F: Fn(&K, &K) -> Ordering,
{
	fn cmp(&self, a: &K, b: &K) -> Ordering {
		self(a, b)
	}
}

/// The `Ord`-derived order. This is the default comparator, covering all key
/// types with an intrinsic ordering (integers, floats via wrappers, strings,
/// times, tuples of those, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
	fn cmp(&self, a: &K, b: &K) -> Ordering {
		a.cmp(b)
	}
}

/// Inverts another comparator, turning an ascending tree into a descending
/// one without touching the key type.
///
/// ```
/// use rowantree::{NaturalOrder, RedBlackTree, Reversed};
///
/// let mut tree = RedBlackTree::with_comparator(Reversed(NaturalOrder));
/// tree.insert(1, "a");
/// tree.insert(3, "c");
/// tree.insert(2, "b");
/// assert_eq!(tree.keys(), vec![3, 2, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed<C = NaturalOrder>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reversed<C> {
	fn cmp(&self, a: &K, b: &K) -> Ordering {
		self.0.cmp(a, b).reverse()
	}
}
