//! # Rowantree: An Ordered-Container Engine
//!
//! This crate provides a self-balancing binary search tree storing key/value
//! pairs sorted by a caller-supplied total order, with logarithmic insertion,
//! lookup, and deletion, floor/ceiling queries, and a bidirectional cursor.
//! It underlies the [`TreeMap`] and [`TreeSet`] adapters in this crate.
//!
//! ## Design Overview
//!
//! The balancing discipline is the classic red-black one: every node carries
//! a one-bit color, the root is always Black, a Red node never has a Red
//! child, and every path from a node down to an absent-child position passes
//! through the same number of Black nodes. Insertion and deletion restore
//! these invariants with a bounded number of recolorings and rotations, which
//! keeps the height (and therefore every operation) logarithmic in the number
//! of entries.
//!
//! ### Key Concepts
//!
//! **Arena-backed nodes**: Nodes live in a slot vector owned by the tree and
//! are addressed by stable indices. Parent, left, and right links are
//! `Option<NodeId>`, so the parent back-reference needed for rotations and
//! cursor navigation costs nothing in ownership terms: a rotation is a
//! handful of index reassignments, and there is no reference-counted cycle to
//! break on drop. Removed slots go on a free list and are reused by later
//! insertions.
//!
//! **Injected comparator**: The order relation is a [`Comparator`] value
//! supplied at construction. It is the sole source of ordering truth; the
//! tree never consults `Ord` on keys directly. [`Tree`] is the alias that
//! plugs in [`NaturalOrder`] for keys that are `Ord`.
//!
//! **Absent children are conceptual Black leaves**: A missing child is
//! represented by `None`, never by a materialized sentinel node. The fixup
//! procedures treat `None` as Black.
//!
//! ### Tree Structure
//!
//! ```text
//!                  ┌──────────────────┐
//!                  │  RedBlackTree    │
//!                  │  slots: Vec<...> │  <- all nodes, addressed by NodeId
//!                  │  root:  NodeId   │
//!                  │  cmp:   C        │
//!                  └────────┬─────────┘
//!                           │
//!                           ▼
//!                      ┌─────────┐
//!                      │  4 (B)  │
//!                      └──┬───┬──┘
//!                  ┌──────┘   └──────┐
//!                  ▼                 ▼
//!             ┌─────────┐       ┌─────────┐
//!             │  2 (B)  │       │  6 (R)  │
//!             └──┬───┬──┘       └──┬───┬──┘
//!                ▼   ▼             ▼   ▼
//!              1(R)  3(R)        5(B)  7(B)
//! ```
//!
//! ## Basic Usage
//!
//! ```
//! use rowantree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! tree.insert(2, "two");
//! tree.insert(1, "one");
//! tree.insert(3, "three");
//!
//! assert_eq!(tree.get(&2), Some(&"two"));
//! assert_eq!(tree.keys(), vec![1, 2, 3]);
//!
//! tree.remove(&2);
//! assert_eq!(tree.get(&2), None);
//! ```
//!
//! ## Thread Safety
//!
//! The tree is a plain single-owner value: every operation is a direct,
//! synchronous computation with no interior mutability and no locking.
//! Callers needing shared access wrap it in their own synchronization.
//! Cursors borrow the tree for their lifetime, so the borrow checker rules
//! out structural mutation while one is live.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

pub mod compare;
pub mod iter;
pub mod map;
pub mod set;

#[cfg(test)]
mod util;

pub use compare::{Comparator, NaturalOrder, Reversed};
pub use iter::{Iter, RawIter};
pub use map::TreeMap;
pub use set::TreeSet;

// ---------------------------------------------------------------------------
// Public Type Aliases
// ---------------------------------------------------------------------------

/// A red-black tree ordered by the keys' own `Ord` implementation.
///
/// This is the recommended type for most use cases. To impose a different
/// order (reversed, by a projection, ...), use [`RedBlackTree`] directly with
/// [`RedBlackTree::with_comparator`].
pub type Tree<K, V> = RedBlackTree<K, V, NaturalOrder>;

// ---------------------------------------------------------------------------
// Node Storage
// ---------------------------------------------------------------------------

/// Index of a node in the tree's slot vector. Stable for the lifetime of the
/// node: rotations rewire links but never move a node between slots.
pub(crate) type NodeId = usize;

/// Node color for the red-black balancing discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
	Red,
	Black,
}

/// A single key/value entry plus its links into the tree.
///
/// `parent` is a non-owning back-reference used by rotations and by cursor
/// navigation. A node with `parent == None` is the root.
#[derive(Debug)]
struct Node<K, V> {
	key: K,
	value: V,
	color: Color,
	parent: Option<NodeId>,
	left: Option<NodeId>,
	right: Option<NodeId>,
}

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// An ordered key/value container backed by an arena-allocated red-black
/// tree.
///
/// # Type Parameters
///
/// - `K`: The key type. No trait bounds; ordering comes from `C`.
/// - `V`: The value type.
/// - `C`: The [`Comparator`] supplying the total order over `K`. Defaults to
///   [`NaturalOrder`].
///
/// # Invariants
///
/// After every public operation completes:
///
/// 1. Binary-search-tree property under the supplied comparator.
/// 2. Red-black coloring: Black root, no Red-Red parent/child edge, uniform
///    black-height on every root-to-absent-child path.
/// 3. Key uniqueness: inserting an existing key overwrites its value in
///    place, structure unchanged.
/// 4. `len()` equals the number of nodes reachable from the root.
///
/// [`assert_invariants`](Self::assert_invariants) validates all four (plus
/// arena bookkeeping) and is used pervasively by this crate's tests.
pub struct RedBlackTree<K, V, C = NaturalOrder> {
	/// Node storage. `None` slots are vacant and tracked in `free`.
	slots: Vec<Option<Node<K, V>>>,
	/// Vacant slot indices, reused LIFO by insertions.
	free: Vec<NodeId>,
	/// The root node, owning the whole graph transitively through `slots`.
	root: Option<NodeId>,
	/// Number of live entries. Kept in lockstep with the node graph.
	len: usize,
	/// The injected order relation. Sole source of ordering truth.
	cmp: C,
}

impl<K: Ord, V> RedBlackTree<K, V, NaturalOrder> {
	/// Creates an empty tree ordered by the keys' `Ord` implementation.
	///
	/// Does not allocate until the first insertion.
	///
	/// # Example
	///
	/// ```
	/// use rowantree::Tree;
	///
	/// let tree: Tree<i32, &str> = Tree::new();
	/// assert!(tree.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::with_comparator(NaturalOrder)
	}
}

impl<K: Ord, V> Default for RedBlackTree<K, V, NaturalOrder> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V, C: Comparator<K>> RedBlackTree<K, V, C> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates an empty tree ordered by `cmp`.
	///
	/// The comparator must be a consistent strict total order over every key
	/// the tree will hold; an inconsistent comparator silently breaks the
	/// search invariants rather than producing an error.
	///
	/// # Example
	///
	/// ```
	/// use rowantree::RedBlackTree;
	///
	/// let mut tree = RedBlackTree::with_comparator(|a: &u32, b: &u32| b.cmp(a));
	/// tree.insert(1, "one");
	/// tree.insert(2, "two");
	/// assert_eq!(tree.keys(), vec![2, 1]); // descending
	/// ```
	pub fn with_comparator(cmp: C) -> Self {
		RedBlackTree {
			slots: Vec::new(),
			free: Vec::new(),
			root: None,
			len: 0,
			cmp,
		}
	}

	// -----------------------------------------------------------------------
	// Size Queries
	// -----------------------------------------------------------------------

	/// Returns the number of entries in the tree. O(1).
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the tree holds no entries. O(1).
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	// -----------------------------------------------------------------------
	// Slot Accessors
	// -----------------------------------------------------------------------

	fn node(&self, id: NodeId) -> &Node<K, V> {
		self.slots[id].as_ref().expect("live NodeId points at an occupied slot")
	}

	fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
		self.slots[id].as_mut().expect("live NodeId points at an occupied slot")
	}

	/// Places `node` in a vacant slot (or a fresh one) and returns its id.
	fn alloc(&mut self, node: Node<K, V>) -> NodeId {
		match self.free.pop() {
			Some(id) => {
				self.slots[id] = Some(node);
				id
			}
			None => {
				self.slots.push(Some(node));
				self.slots.len() - 1
			}
		}
	}

	/// Vacates a slot, returning the node it held.
	fn release(&mut self, id: NodeId) -> Node<K, V> {
		let node = self.slots[id].take().expect("released NodeId points at an occupied slot");
		self.free.push(id);
		node
	}

	/// `None` children count as Black leaves for balancing purposes.
	fn is_red(&self, id: Option<NodeId>) -> bool {
		matches!(id, Some(id) if self.node(id).color == Color::Red)
	}

	pub(crate) fn key_value(&self, id: NodeId) -> (&K, &V) {
		let node = self.node(id);
		(&node.key, &node.value)
	}

	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Walks from the root to the node holding `key`, if any. Never mutates
	/// the tree (no splaying or other self-adjustment).
	fn find(&self, key: &K) -> Option<NodeId> {
		let mut cur = self.root;
		while let Some(id) = cur {
			cur = match self.cmp.cmp(key, &self.node(id).key) {
				Ordering::Equal => return Some(id),
				Ordering::Less => self.node(id).left,
				Ordering::Greater => self.node(id).right,
			};
		}
		None
	}

	/// Returns a reference to the value stored under `key`.
	///
	/// # Example
	///
	/// ```
	/// use rowantree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.insert(1, "one");
	///
	/// assert_eq!(tree.get(&1), Some(&"one"));
	/// assert_eq!(tree.get(&2), None);
	/// ```
	pub fn get(&self, key: &K) -> Option<&V> {
		self.find(key).map(|id| &self.node(id).value)
	}

	/// Returns the stored key and value for `key`. Useful when keys that
	/// compare equal are distinguishable (e.g. carry a payload the comparator
	/// ignores).
	pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
		self.find(key).map(|id| self.key_value(id))
	}

	/// Returns a mutable reference to the value stored under `key`.
	pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
		self.find(key).map(|id| &mut self.node_mut(id).value)
	}

	/// Returns `true` if the tree contains `key`.
	pub fn contains_key(&self, key: &K) -> bool {
		self.find(key).is_some()
	}

	// -----------------------------------------------------------------------
	// Extremes and Neighbor Queries
	// -----------------------------------------------------------------------

	/// Returns the entry with the smallest key, or `None` on an empty tree.
	/// O(height).
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		self.first_node().map(|id| self.key_value(id))
	}

	/// Returns the entry with the largest key, or `None` on an empty tree.
	/// O(height).
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		self.last_node().map(|id| self.key_value(id))
	}

	/// Returns the entry with the largest key that compares less than or
	/// equal to `key`.
	///
	/// Misses either because the tree is empty or because every key is
	/// greater than `key`.
	///
	/// # Example
	///
	/// ```
	/// use rowantree::Tree;
	///
	/// let mut tree = Tree::new();
	/// for k in [1, 3, 5] {
	/// 	tree.insert(k, ());
	/// }
	///
	/// assert_eq!(tree.floor(&4), Some((&3, &())));
	/// assert_eq!(tree.floor(&3), Some((&3, &())));
	/// assert_eq!(tree.floor(&0), None);
	/// ```
	pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
		let mut cur = self.root;
		let mut best = None;
		while let Some(id) = cur {
			cur = match self.cmp.cmp(key, &self.node(id).key) {
				Ordering::Equal => return Some(self.key_value(id)),
				Ordering::Less => self.node(id).left,
				Ordering::Greater => {
					best = Some(id);
					self.node(id).right
				}
			};
		}
		best.map(|id| self.key_value(id))
	}

	/// Returns the entry with the smallest key that compares greater than or
	/// equal to `key`. Symmetric to [`floor`](Self::floor).
	pub fn ceiling(&self, key: &K) -> Option<(&K, &V)> {
		let mut cur = self.root;
		let mut best = None;
		while let Some(id) = cur {
			cur = match self.cmp.cmp(key, &self.node(id).key) {
				Ordering::Equal => return Some(self.key_value(id)),
				Ordering::Greater => self.node(id).right,
				Ordering::Less => {
					best = Some(id);
					self.node(id).left
				}
			};
		}
		best.map(|id| self.key_value(id))
	}

	// -----------------------------------------------------------------------
	// Node Navigation (used by cursors)
	// -----------------------------------------------------------------------

	pub(crate) fn first_node(&self) -> Option<NodeId> {
		self.root.map(|id| self.min_in(id))
	}

	pub(crate) fn last_node(&self) -> Option<NodeId> {
		self.root.map(|id| self.max_in(id))
	}

	/// Leftmost node of the subtree rooted at `id`.
	fn min_in(&self, mut id: NodeId) -> NodeId {
		while let Some(left) = self.node(id).left {
			id = left;
		}
		id
	}

	/// Rightmost node of the subtree rooted at `id`.
	fn max_in(&self, mut id: NodeId) -> NodeId {
		while let Some(right) = self.node(id).right {
			id = right;
		}
		id
	}

	/// In-order successor of `id`: the leftmost node of the right subtree if
	/// one exists, else the nearest ancestor whose left subtree holds `id`.
	/// O(1) amortized over a full traversal, O(log n) worst case per step.
	pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
		if let Some(right) = self.node(id).right {
			return Some(self.min_in(right));
		}
		let mut cur = id;
		while let Some(parent) = self.node(cur).parent {
			if self.node(parent).left == Some(cur) {
				return Some(parent);
			}
			cur = parent;
		}
		None
	}

	/// In-order predecessor of `id`. Mirror of [`successor`](Self::successor).
	pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
		if let Some(left) = self.node(id).left {
			return Some(self.max_in(left));
		}
		let mut cur = id;
		while let Some(parent) = self.node(cur).parent {
			if self.node(parent).right == Some(cur) {
				return Some(parent);
			}
			cur = parent;
		}
		None
	}

	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Inserts `key`/`value` into the tree.
	///
	/// If a key comparing equal already exists, its value is replaced in
	/// place (structure untouched) and the old value is returned. Otherwise
	/// the entry is added as a Red node at its search position and the
	/// insert-fixup restores the coloring invariants.
	///
	/// # Example
	///
	/// ```
	/// use rowantree::Tree;
	///
	/// let mut tree = Tree::new();
	///
	/// assert_eq!(tree.insert(1, "one"), None);        // new key
	/// assert_eq!(tree.insert(1, "uno"), Some("one")); // overwrite
	/// assert_eq!(tree.len(), 1);
	/// ```
	pub fn insert(&mut self, key: K, value: V) -> Option<V> {
		let mut cur = match self.root {
			Some(id) => id,
			None => {
				let id = self.alloc(Node {
					key,
					value,
					color: Color::Black,
					parent: None,
					left: None,
					right: None,
				});
				self.root = Some(id);
				self.len = 1;
				return None;
			}
		};

		// Walk to the BST-correct position, overwriting on an equal key.
		loop {
			match self.cmp.cmp(&key, &self.node(cur).key) {
				Ordering::Equal => {
					return Some(mem::replace(&mut self.node_mut(cur).value, value));
				}
				Ordering::Less => match self.node(cur).left {
					Some(left) => cur = left,
					None => {
						let id = self.alloc_red_child(key, value, cur);
						self.node_mut(cur).left = Some(id);
						self.insert_fixup(id);
						return None;
					}
				},
				Ordering::Greater => match self.node(cur).right {
					Some(right) => cur = right,
					None => {
						let id = self.alloc_red_child(key, value, cur);
						self.node_mut(cur).right = Some(id);
						self.insert_fixup(id);
						return None;
					}
				},
			}
		}
	}

	/// Conditional insert: the entry goes in if either no key comparing equal
	/// exists, or one does and `keep(existing_key, new_key)` holds, in which
	/// case both the stored key and value are replaced. When `keep` denies
	/// the insert, the call is a no-op.
	///
	/// Returns `true` if the entry was stored.
	///
	/// This supports "insert only if newer" policies in callers whose keys
	/// carry a payload the comparator ignores, without duplicating any tree
	/// logic.
	pub fn insert_if<F>(&mut self, key: K, value: V, keep: F) -> bool
	where
		F: FnOnce(&K, &K) -> bool,
	{
		match self.find(&key) {
			Some(id) => {
				if keep(&self.node(id).key, &key) {
					let node = self.node_mut(id);
					node.key = key;
					node.value = value;
					true
				} else {
					false
				}
			}
			None => {
				self.insert(key, value);
				true
			}
		}
	}

	fn alloc_red_child(&mut self, key: K, value: V, parent: NodeId) -> NodeId {
		self.len += 1;
		self.alloc(Node {
			key,
			value,
			color: Color::Red,
			parent: Some(parent),
			left: None,
			right: None,
		})
	}

	/// Restores the red-black invariants after inserting the Red node `x`.
	///
	/// While `x`'s parent is Red, cases on the uncle:
	/// - Red uncle: recolor parent and uncle Black, grandparent Red, and
	///   continue from the grandparent.
	/// - Black/absent uncle, `x` inner child: rotate the parent to make `x`
	///   the outer child, falling into the next case.
	/// - Black/absent uncle, `x` outer child: recolor parent Black and
	///   grandparent Red, rotate the grandparent toward the uncle.
	///
	/// The loop may leave the root Red; it is forced Black at the end.
	fn insert_fixup(&mut self, mut x: NodeId) {
		while let Some(parent) = self.node(x).parent {
			if self.node(parent).color == Color::Black {
				break;
			}
			// A Red parent is never the root, so the grandparent exists.
			let grand = self.node(parent).parent.expect("red parent has a parent");
			if self.node(grand).left == Some(parent) {
				let uncle = self.node(grand).right;
				if self.is_red(uncle) {
					self.node_mut(parent).color = Color::Black;
					self.node_mut(uncle.expect("red uncle exists")).color = Color::Black;
					self.node_mut(grand).color = Color::Red;
					x = grand;
				} else {
					if self.node(parent).right == Some(x) {
						x = parent;
						self.rotate_left(x);
					}
					let parent = self.node(x).parent.expect("rotated child has a parent");
					let grand = self.node(parent).parent.expect("red parent has a parent");
					self.node_mut(parent).color = Color::Black;
					self.node_mut(grand).color = Color::Red;
					self.rotate_right(grand);
				}
			} else {
				let uncle = self.node(grand).left;
				if self.is_red(uncle) {
					self.node_mut(parent).color = Color::Black;
					self.node_mut(uncle.expect("red uncle exists")).color = Color::Black;
					self.node_mut(grand).color = Color::Red;
					x = grand;
				} else {
					if self.node(parent).left == Some(x) {
						x = parent;
						self.rotate_right(x);
					}
					let parent = self.node(x).parent.expect("rotated child has a parent");
					let grand = self.node(parent).parent.expect("red parent has a parent");
					self.node_mut(parent).color = Color::Black;
					self.node_mut(grand).color = Color::Red;
					self.rotate_left(grand);
				}
			}
		}
		if let Some(root) = self.root {
			self.node_mut(root).color = Color::Black;
		}
	}

	// -----------------------------------------------------------------------
	// Removal
	// -----------------------------------------------------------------------

	/// Removes `key` from the tree, returning its value if it was present.
	/// Removing an absent key is a no-op.
	///
	/// # Example
	///
	/// ```
	/// use rowantree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.insert(1, "one");
	///
	/// assert_eq!(tree.remove(&1), Some("one"));
	/// assert_eq!(tree.remove(&1), None); // already gone
	/// ```
	pub fn remove(&mut self, key: &K) -> Option<V> {
		self.remove_entry(key).map(|(_, v)| v)
	}

	/// Removes `key` from the tree, returning the stored key and value.
	pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
		let id = self.find(key)?;
		Some(self.remove_node(id))
	}

	/// Unlinks the node at `id` and rebalances.
	///
	/// A node with two children swaps payloads with its in-order successor
	/// (leftmost of the right subtree), which has at most one child, and the
	/// successor slot is spliced out instead. If the spliced-out node was
	/// Black, the black-height along its former path is short by one and the
	/// delete-fixup repairs it; a Red removal needs no fixup.
	fn remove_node(&mut self, id: NodeId) -> (K, V) {
		let target = match (self.node(id).left, self.node(id).right) {
			(Some(_), Some(right)) => {
				let succ = self.min_in(right);
				self.swap_payload(id, succ);
				succ
			}
			_ => id,
		};

		// `target` has at most one child; splice it out.
		let child = self.node(target).left.or(self.node(target).right);
		let parent = self.node(target).parent;
		let removed_color = self.node(target).color;

		if let Some(c) = child {
			self.node_mut(c).parent = parent;
		}
		match parent {
			Some(p) => {
				if self.node(p).left == Some(target) {
					self.node_mut(p).left = child;
				} else {
					self.node_mut(p).right = child;
				}
			}
			None => self.root = child,
		}

		if removed_color == Color::Black {
			self.remove_fixup(child, parent);
		}

		self.len -= 1;
		let node = self.release(target);
		(node.key, node.value)
	}

	/// Swaps the key/value payloads of two distinct slots, leaving colors and
	/// links untouched.
	fn swap_payload(&mut self, a: NodeId, b: NodeId) {
		debug_assert_ne!(a, b);
		let (lo, hi) = if a < b { (a, b) } else { (b, a) };
		let (head, tail) = self.slots.split_at_mut(hi);
		let x = head[lo].as_mut().expect("live NodeId points at an occupied slot");
		let y = tail[0].as_mut().expect("live NodeId points at an occupied slot");
		mem::swap(&mut x.key, &mut y.key);
		mem::swap(&mut x.value, &mut y.value);
	}

	/// Restores black-height after a Black node was spliced out.
	///
	/// `x` is the child that took the removed node's place (possibly absent)
	/// and `parent` its parent. The loop runs while `x` is a non-root Black
	/// position, casing on the sibling `s`:
	/// - `s` Red: recolor `s` Black and the parent Red, rotate the parent
	///   toward `x`, and recompute the sibling.
	/// - `s` Black with two Black children: recolor `s` Red and move the
	///   deficit up to the parent.
	/// - `s` Black, near child Red, far child Black: recolor the near child
	///   Black and `s` Red, rotate `s` away from `x`, recompute the sibling,
	///   and fall into the last case.
	/// - `s` Black with a Red far child: `s` takes the parent's color, the
	///   parent and far child go Black, rotate the parent toward `x`, done.
	fn remove_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
		while x != self.root && !self.is_red(x) {
			let p = match parent {
				Some(p) => p,
				None => break,
			};
			if self.node(p).left == x {
				let mut s = self.node(p).right.expect("black-height implies a sibling");
				if self.node(s).color == Color::Red {
					self.node_mut(s).color = Color::Black;
					self.node_mut(p).color = Color::Red;
					self.rotate_left(p);
					s = self.node(p).right.expect("black-height implies a sibling");
				}
				if !self.is_red(self.node(s).left) && !self.is_red(self.node(s).right) {
					self.node_mut(s).color = Color::Red;
					x = Some(p);
					parent = self.node(p).parent;
				} else {
					if !self.is_red(self.node(s).right) {
						let near = self.node(s).left.expect("near child is red");
						self.node_mut(near).color = Color::Black;
						self.node_mut(s).color = Color::Red;
						self.rotate_right(s);
						s = self.node(p).right.expect("black-height implies a sibling");
					}
					self.node_mut(s).color = self.node(p).color;
					self.node_mut(p).color = Color::Black;
					let far = self.node(s).right.expect("far child is red");
					self.node_mut(far).color = Color::Black;
					self.rotate_left(p);
					x = self.root;
					break;
				}
			} else {
				let mut s = self.node(p).left.expect("black-height implies a sibling");
				if self.node(s).color == Color::Red {
					self.node_mut(s).color = Color::Black;
					self.node_mut(p).color = Color::Red;
					self.rotate_right(p);
					s = self.node(p).left.expect("black-height implies a sibling");
				}
				if !self.is_red(self.node(s).left) && !self.is_red(self.node(s).right) {
					self.node_mut(s).color = Color::Red;
					x = Some(p);
					parent = self.node(p).parent;
				} else {
					if !self.is_red(self.node(s).left) {
						let near = self.node(s).right.expect("near child is red");
						self.node_mut(near).color = Color::Black;
						self.node_mut(s).color = Color::Red;
						self.rotate_left(s);
						s = self.node(p).left.expect("black-height implies a sibling");
					}
					self.node_mut(s).color = self.node(p).color;
					self.node_mut(p).color = Color::Black;
					let far = self.node(s).left.expect("far child is red");
					self.node_mut(far).color = Color::Black;
					self.rotate_right(p);
					x = self.root;
					break;
				}
			}
		}
		if let Some(id) = x {
			self.node_mut(id).color = Color::Black;
		}
	}

	/// Discards every entry, resetting the tree to empty. All slots and the
	/// free list are released wholesale.
	pub fn clear(&mut self) {
		self.slots.clear();
		self.free.clear();
		self.root = None;
		self.len = 0;
	}

	// -----------------------------------------------------------------------
	// Rotations
	// -----------------------------------------------------------------------
	//
	// The only structural mutators besides node creation and splicing. Each
	// preserves the BST property by construction and is invoked solely by the
	// two fixup procedures.

	/// Rotates left around `x`, promoting its right child.
	///
	/// ```text
	///     x                y
	///    / \              / \
	///   a   y    ─►      x   c
	///      / \          / \
	///     b   c        a   b
	/// ```
	fn rotate_left(&mut self, x: NodeId) {
		let y = self.node(x).right.expect("left rotation requires a right child");
		let y_left = self.node(y).left;

		self.node_mut(x).right = y_left;
		if let Some(b) = y_left {
			self.node_mut(b).parent = Some(x);
		}

		let x_parent = self.node(x).parent;
		self.node_mut(y).parent = x_parent;
		match x_parent {
			None => self.root = Some(y),
			Some(p) => {
				if self.node(p).left == Some(x) {
					self.node_mut(p).left = Some(y);
				} else {
					self.node_mut(p).right = Some(y);
				}
			}
		}

		self.node_mut(y).left = Some(x);
		self.node_mut(x).parent = Some(y);
	}

	/// Rotates right around `x`, promoting its left child. Mirror of
	/// [`rotate_left`](Self::rotate_left).
	fn rotate_right(&mut self, x: NodeId) {
		let y = self.node(x).left.expect("right rotation requires a left child");
		let y_right = self.node(y).right;

		self.node_mut(x).left = y_right;
		if let Some(b) = y_right {
			self.node_mut(b).parent = Some(x);
		}

		let x_parent = self.node(x).parent;
		self.node_mut(y).parent = x_parent;
		match x_parent {
			None => self.root = Some(y),
			Some(p) => {
				if self.node(p).left == Some(x) {
					self.node_mut(p).left = Some(y);
				} else {
					self.node_mut(p).right = Some(y);
				}
			}
		}

		self.node_mut(y).right = Some(x);
		self.node_mut(x).parent = Some(y);
	}

	// -----------------------------------------------------------------------
	// Cursors and Materialized Sequences
	// -----------------------------------------------------------------------

	/// Returns a raw bidirectional cursor over the tree, initially at the
	/// before-first position. See [`RawIter`] for the stepping contract.
	pub fn raw_iter(&self) -> RawIter<'_, K, V, C> {
		RawIter::new(self)
	}

	/// Returns a double-ended iterator over the entries in ascending key
	/// order.
	///
	/// # Example
	///
	/// ```
	/// use rowantree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.insert(2, "b");
	/// tree.insert(1, "a");
	///
	/// let entries: Vec<_> = tree.iter().collect();
	/// assert_eq!(entries, vec![(&1, &"a"), (&2, &"b")]);
	/// ```
	pub fn iter(&self) -> Iter<'_, K, V, C> {
		Iter::new(self)
	}

	/// Returns all keys in ascending order as a fresh `Vec`, detached from
	/// the tree: later mutation does not affect an already-produced sequence.
	pub fn keys(&self) -> Vec<K>
	where
		K: Clone,
	{
		self.iter().map(|(k, _)| k.clone()).collect()
	}

	/// Returns all keys in descending order as a fresh `Vec`.
	pub fn keys_rev(&self) -> Vec<K>
	where
		K: Clone,
	{
		self.iter().rev().map(|(k, _)| k.clone()).collect()
	}

	/// Returns all values in ascending key order as a fresh `Vec`.
	pub fn values(&self) -> Vec<V>
	where
		V: Clone,
	{
		self.iter().map(|(_, v)| v.clone()).collect()
	}

	/// Returns all values in descending key order as a fresh `Vec`.
	pub fn values_rev(&self) -> Vec<V>
	where
		V: Clone,
	{
		self.iter().rev().map(|(_, v)| v.clone()).collect()
	}

	// -----------------------------------------------------------------------
	// Invariant Validation (test support)
	// -----------------------------------------------------------------------

	/// Validates every structural invariant of the tree, panicking on the
	/// first violation:
	///
	/// 1. The root is Black and has no parent link.
	/// 2. BST ordering under the comparator throughout.
	/// 3. No Red node has a Red child.
	/// 4. Uniform black-height across all paths.
	/// 5. Parent back-links agree with child links.
	/// 6. `len()` matches the reachable node count, and arena slot accounting
	///    balances (live + free == total).
	pub fn assert_invariants(&self) {
		if let Some(root) = self.root {
			assert_eq!(self.node(root).color, Color::Black, "root must be black");
			assert_eq!(self.node(root).parent, None, "root must not have a parent");
		}

		let mut count = 0;
		self.check_subtree(self.root, None, None, &mut count);

		assert_eq!(count, self.len, "len {} != reachable node count {}", self.len, count);
		assert_eq!(
			self.len + self.free.len(),
			self.slots.len(),
			"arena accounting: {} live + {} free != {} slots",
			self.len,
			self.free.len(),
			self.slots.len()
		);
	}

	/// Recursive checker: validates the subtree at `id` against the open
	/// interval (`lower`, `upper`) and returns its black-height. An absent
	/// child counts as a single Black leaf.
	fn check_subtree(
		&self,
		id: Option<NodeId>,
		lower: Option<&K>,
		upper: Option<&K>,
		count: &mut usize,
	) -> usize {
		let id = match id {
			Some(id) => id,
			None => return 1,
		};
		let node = self.node(id);
		*count += 1;

		if let Some(lo) = lower {
			assert_eq!(
				self.cmp.cmp(&node.key, lo),
				Ordering::Greater,
				"BST violation: key not greater than left bound"
			);
		}
		if let Some(hi) = upper {
			assert_eq!(
				self.cmp.cmp(&node.key, hi),
				Ordering::Less,
				"BST violation: key not less than right bound"
			);
		}

		if node.color == Color::Red {
			assert!(
				!self.is_red(node.left) && !self.is_red(node.right),
				"red node has a red child"
			);
		}

		if let Some(left) = node.left {
			assert_eq!(self.node(left).parent, Some(id), "left child's parent link is wrong");
		}
		if let Some(right) = node.right {
			assert_eq!(self.node(right).parent, Some(id), "right child's parent link is wrong");
		}

		let left_height = self.check_subtree(node.left, lower, Some(&node.key), count);
		let right_height = self.check_subtree(node.right, Some(&node.key), upper, count);
		assert_eq!(left_height, right_height, "black-height mismatch between siblings");

		left_height + usize::from(node.color == Color::Black)
	}
}

impl<K, V, C> fmt::Debug for RedBlackTree<K, V, C>
where
	K: fmt::Debug,
	V: fmt::Debug,
	C: Comparator<K>,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// -----------------------------------------------------------------------
	// Basic Tree Operation Tests
	// -----------------------------------------------------------------------

	#[test]
	fn basic_insert_and_get() {
		let mut tree: Tree<i32, &str> = Tree::new();

		assert_eq!(tree.insert(1, "one"), None);
		assert_eq!(tree.insert(2, "two"), None);
		assert_eq!(tree.insert(3, "three"), None);

		tree.assert_invariants();

		assert_eq!(tree.get(&1), Some(&"one"));
		assert_eq!(tree.get(&2), Some(&"two"));
		assert_eq!(tree.get(&3), Some(&"three"));
		assert_eq!(tree.get(&4), None);
	}

	#[test]
	fn insert_overwrites_in_place() {
		let mut tree: Tree<i32, &str> = Tree::new();

		assert_eq!(tree.insert(1, "one"), None);
		assert_eq!(tree.insert(1, "uno"), Some("one"));
		assert_eq!(tree.get(&1), Some(&"uno"));
		assert_eq!(tree.len(), 1);

		tree.assert_invariants();
	}

	#[test]
	fn remove_returns_value() {
		let mut tree: Tree<i32, &str> = Tree::new();

		tree.insert(1, "one");
		tree.insert(2, "two");

		tree.assert_invariants();

		assert_eq!(tree.remove(&1), Some("one"));
		assert_eq!(tree.get(&1), None);
		assert_eq!(tree.get(&2), Some(&"two"));

		tree.assert_invariants();
	}

	#[test]
	fn remove_absent_key_is_a_noop() {
		let mut tree: Tree<i32, i32> = Tree::new();
		tree.insert(1, 10);

		assert_eq!(tree.remove(&2), None);
		assert_eq!(tree.len(), 1);
		tree.assert_invariants();
	}

	#[test]
	fn len_and_is_empty() {
		let mut tree: Tree<i32, i32> = Tree::new();

		assert!(tree.is_empty());
		assert_eq!(tree.len(), 0);

		tree.insert(1, 10);
		assert!(!tree.is_empty());
		assert_eq!(tree.len(), 1);

		tree.insert(2, 20);
		assert_eq!(tree.len(), 2);

		tree.remove(&1);
		assert_eq!(tree.len(), 1);

		tree.assert_invariants();
	}

	#[test]
	fn clear_resets_everything() {
		let mut tree: Tree<i32, i32> = Tree::new();
		for i in 0..100 {
			tree.insert(i, i);
		}

		tree.clear();

		assert!(tree.is_empty());
		assert_eq!(tree.first_key_value(), None);
		tree.assert_invariants();

		// The tree is fully usable after a clear.
		tree.insert(7, 70);
		assert_eq!(tree.get(&7), Some(&70));
		tree.assert_invariants();
	}

	#[test]
	fn get_mut_updates_value() {
		let mut tree: Tree<i32, i32> = Tree::new();
		tree.insert(1, 10);

		*tree.get_mut(&1).unwrap() = 11;
		assert_eq!(tree.get(&1), Some(&11));
		assert_eq!(tree.get_mut(&2), None);
	}

	// -----------------------------------------------------------------------
	// Extremes, Floor, Ceiling
	// -----------------------------------------------------------------------

	#[test]
	fn first_and_last_on_empty() {
		let tree: Tree<i32, i32> = Tree::new();
		assert_eq!(tree.first_key_value(), None);
		assert_eq!(tree.last_key_value(), None);
	}

	#[test]
	fn first_and_last() {
		let mut tree: Tree<i32, &str> = Tree::new();
		for (k, v) in [(1, "a"), (5, "e"), (6, "f"), (7, "g"), (3, "c"), (4, "d"), (2, "b")] {
			tree.insert(k, v);
		}
		tree.insert(1, "x"); // overwrite the minimum's value

		assert_eq!(tree.first_key_value(), Some((&1, &"x")));
		assert_eq!(tree.last_key_value(), Some((&7, &"g")));
	}

	#[test]
	fn floor_and_ceiling_edges() {
		let mut tree: Tree<i32, &str> = Tree::new();

		assert_eq!(tree.floor(&0), None);
		assert_eq!(tree.ceiling(&0), None);

		for (k, v) in [(5, "e"), (6, "f"), (7, "g"), (3, "c"), (4, "d"), (1, "a"), (2, "b")] {
			tree.insert(k, v);
		}

		assert_eq!(tree.floor(&4), Some((&4, &"d")));
		assert_eq!(tree.floor(&0), None);
		assert_eq!(tree.ceiling(&4), Some((&4, &"d")));
		assert_eq!(tree.ceiling(&8), None);
	}

	#[test]
	fn floor_and_ceiling_between_keys() {
		let mut tree: Tree<i32, ()> = Tree::new();
		for k in [10, 20, 30] {
			tree.insert(k, ());
		}

		assert_eq!(tree.floor(&25).map(|(k, _)| *k), Some(20));
		assert_eq!(tree.ceiling(&25).map(|(k, _)| *k), Some(30));
		assert_eq!(tree.floor(&35).map(|(k, _)| *k), Some(30));
		assert_eq!(tree.ceiling(&5).map(|(k, _)| *k), Some(10));
	}

	// -----------------------------------------------------------------------
	// Conditional Insert
	// -----------------------------------------------------------------------

	#[test]
	fn insert_if_on_absent_key_inserts() {
		let mut tree: Tree<i32, &str> = Tree::new();
		assert!(tree.insert_if(1, "one", |_, _| false));
		assert_eq!(tree.get(&1), Some(&"one"));
	}

	#[test]
	fn insert_if_denied_is_a_noop() {
		let mut tree: Tree<i32, &str> = Tree::new();
		tree.insert(1, "one");

		assert!(!tree.insert_if(1, "uno", |_, _| false));
		assert_eq!(tree.get(&1), Some(&"one"));
		assert_eq!(tree.len(), 1);
		tree.assert_invariants();
	}

	#[test]
	fn insert_if_replaces_key_and_value() {
		// Keys compare by the first tuple field only; the second field is a
		// revision the comparator ignores.
		let by_id = |a: &(u32, u32), b: &(u32, u32)| a.0.cmp(&b.0);
		let mut tree = RedBlackTree::with_comparator(by_id);
		tree.insert((7, 1), "old");

		let stored = tree.insert_if((7, 2), "new", |existing, candidate| existing.1 < candidate.1);
		assert!(stored);
		assert_eq!(tree.get_key_value(&(7, 0)), Some((&(7, 2), &"new")));

		let stored = tree.insert_if((7, 1), "stale", |existing, candidate| existing.1 < candidate.1);
		assert!(!stored);
		assert_eq!(tree.get_key_value(&(7, 0)), Some((&(7, 2), &"new")));
	}

	// -----------------------------------------------------------------------
	// Materialized Sequences
	// -----------------------------------------------------------------------

	#[test]
	fn keys_and_values_in_order() {
		let mut tree: Tree<i32, &str> = Tree::new();
		for (k, v) in [(5, "e"), (6, "f"), (7, "g"), (3, "c"), (4, "d"), (1, "x"), (2, "b")] {
			tree.insert(k, v);
		}
		tree.insert(1, "a"); // overwrite

		assert_eq!(tree.keys(), vec![1, 2, 3, 4, 5, 6, 7]);
		assert_eq!(tree.values(), vec!["a", "b", "c", "d", "e", "f", "g"]);
		assert_eq!(tree.keys_rev(), vec![7, 6, 5, 4, 3, 2, 1]);
		assert_eq!(tree.values_rev(), vec!["g", "f", "e", "d", "c", "b", "a"]);
	}

	#[test]
	fn materialized_sequences_are_detached() {
		let mut tree: Tree<i32, i32> = Tree::new();
		for i in 0..5 {
			tree.insert(i, i);
		}

		let keys = tree.keys();
		tree.remove(&0);
		tree.insert(9, 9);

		// The earlier snapshot is unaffected by later mutation.
		assert_eq!(keys, vec![0, 1, 2, 3, 4]);
		assert_eq!(tree.keys(), vec![1, 2, 3, 4, 9]);
	}

	// -----------------------------------------------------------------------
	// Custom Comparators
	// -----------------------------------------------------------------------

	#[test]
	fn comparator_is_the_only_ordering_source() {
		// Reverse numeric order; Ord on i32 would disagree everywhere.
		let mut tree = RedBlackTree::with_comparator(Reversed::<NaturalOrder>::default());
		for i in 1..=5 {
			tree.insert(i, ());
		}

		tree.assert_invariants();
		assert_eq!(tree.keys(), vec![5, 4, 3, 2, 1]);
		assert_eq!(tree.first_key_value(), Some((&5, &())));
		assert_eq!(tree.last_key_value(), Some((&1, &())));
		// Under the reversed order, "floor of 3" is the largest-ranked key at
		// or below 3's rank, which is 3 itself; every key ranks above 6.
		assert_eq!(tree.floor(&3).map(|(k, _)| *k), Some(3));
		assert_eq!(tree.floor(&6).map(|(k, _)| *k), None);
		assert_eq!(tree.ceiling(&6).map(|(k, _)| *k), Some(5));
	}

	// -----------------------------------------------------------------------
	// Arena Behavior
	// -----------------------------------------------------------------------

	#[test]
	fn removed_slots_are_reused() {
		let mut tree: Tree<i32, i32> = Tree::new();
		for i in 0..8 {
			tree.insert(i, i);
		}
		let slots_before = tree.slots.len();

		for i in 0..4 {
			tree.remove(&i);
		}
		for i in 10..14 {
			tree.insert(i, i);
		}

		// Reinsertions fill freed slots instead of growing the arena.
		assert_eq!(tree.slots.len(), slots_before);
		tree.assert_invariants();
	}

	// -----------------------------------------------------------------------
	// Fixture-Pinned Shapes
	// -----------------------------------------------------------------------
	//
	// These tests build trees with exact colors via the JSON shape loader and
	// verify that specific fixup branches produce valid structure.

	#[test]
	fn sample_tree_loads_and_validates() {
		let tree = util::sample_tree(
			r#"{
				"key": "b", "value": 2, "color": "black",
				"left": { "key": "a", "value": 1, "color": "red" },
				"right": { "key": "c", "value": 3, "color": "red" }
			}"#,
		);
		tree.assert_invariants();
		assert_eq!(tree.len(), 3);
		assert_eq!(tree.keys(), vec!["a", "b", "c"]);
	}

	#[test]
	fn delete_with_red_sibling_rebalances() {
		// Removing "a" leaves a deficit whose sibling subtree is Red; the
		// fixup must rotate the parent and terminate with valid coloring.
		let mut tree = util::sample_tree(
			r#"{
				"key": "b", "value": 2, "color": "black",
				"left": { "key": "a", "value": 1, "color": "black" },
				"right": {
					"key": "d", "value": 4, "color": "red",
					"left": { "key": "c", "value": 3, "color": "black" },
					"right": { "key": "e", "value": 5, "color": "black" }
				}
			}"#,
		);
		tree.assert_invariants();

		assert_eq!(tree.remove(&"a".to_string()), Some(1));
		tree.assert_invariants();
		assert_eq!(tree.keys(), vec!["b", "c", "d", "e"]);
	}

	#[test]
	fn delete_with_black_sibling_recolors_up() {
		// Both children of the root are Black leaves; removing one pushes the
		// deficit to the root, which absorbs it.
		let mut tree = util::sample_tree(
			r#"{
				"key": "b", "value": 2, "color": "black",
				"left": { "key": "a", "value": 1, "color": "black" },
				"right": { "key": "c", "value": 3, "color": "black" }
			}"#,
		);
		tree.assert_invariants();

		assert_eq!(tree.remove(&"a".to_string()), Some(1));
		tree.assert_invariants();
		assert_eq!(tree.keys(), vec!["b", "c"]);
	}

	#[test]
	fn delete_two_child_node_uses_successor() {
		let mut tree = util::sample_tree(
			r#"{
				"key": "d", "value": 4, "color": "black",
				"left": {
					"key": "b", "value": 2, "color": "black",
					"left": { "key": "a", "value": 1, "color": "red" },
					"right": { "key": "c", "value": 3, "color": "red" }
				},
				"right": {
					"key": "f", "value": 6, "color": "black",
					"left": { "key": "e", "value": 5, "color": "red" },
					"right": { "key": "g", "value": 7, "color": "red" }
				}
			}"#,
		);
		tree.assert_invariants();

		// The root has two children; its in-order successor "e" takes its
		// place and the spliced-out slot rebalances.
		assert_eq!(tree.remove(&"d".to_string()), Some(4));
		tree.assert_invariants();
		assert_eq!(tree.keys(), vec!["a", "b", "c", "e", "f", "g"]);
		assert_eq!(tree.get(&"d".to_string()), None);
	}

	#[test]
	fn shape_of_reports_colors() {
		let mut tree: Tree<String, u64> = Tree::new();
		tree.insert("b".to_string(), 2);
		tree.insert("a".to_string(), 1);
		tree.insert("c".to_string(), 3);

		let shape = util::shape_of(&tree).expect("non-empty tree has a shape");
		assert_eq!(shape.key, "b");
		assert_eq!(shape.color, util::ShapeColor::Black);
		assert_eq!(shape.left.as_ref().map(|n| n.key.as_str()), Some("a"));
		assert_eq!(shape.right.as_ref().map(|n| n.key.as_str()), Some("c"));
	}

	// -----------------------------------------------------------------------
	// Debug Formatting
	// -----------------------------------------------------------------------

	#[test]
	fn debug_renders_as_ordered_map() {
		let mut tree: Tree<i32, &str> = Tree::new();
		tree.insert(2, "b");
		tree.insert(1, "a");

		assert_eq!(format!("{:?}", tree), r#"{1: "a", 2: "b"}"#);
	}
}
