//! Test utilities for building trees from JSON shape descriptions.
//!
//! A shape pins down exactly which node holds which key and color, so tests
//! can start a mutation from a known structure and drive a specific fixup
//! branch, instead of hoping a sequence of inserts happens to produce it.
//! [`shape_of`] goes the other way, extracting the current structure for
//! assertions.
//!
//! Shapes use `String` keys and `u64` values throughout, which is plenty for
//! structural tests.

use serde::Deserialize;

use crate::{Color, Node, NodeId, Tree};

/// Node color as spelled in fixtures.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeColor {
	Red,
	Black,
}

/// One node of a tree shape: key, value, color, and optional children.
#[derive(Deserialize, Debug, PartialEq)]
pub struct ShapeNode {
	pub key: String,
	pub value: u64,
	pub color: ShapeColor,
	#[serde(default)]
	pub left: Option<Box<ShapeNode>>,
	#[serde(default)]
	pub right: Option<Box<ShapeNode>>,
}

impl From<ShapeColor> for Color {
	fn from(color: ShapeColor) -> Color {
		match color {
			ShapeColor::Red => Color::Red,
			ShapeColor::Black => Color::Black,
		}
	}
}

impl From<Color> for ShapeColor {
	fn from(color: Color) -> ShapeColor {
		match color {
			Color::Red => ShapeColor::Red,
			Color::Black => ShapeColor::Black,
		}
	}
}

fn build(tree: &mut Tree<String, u64>, shape: ShapeNode, parent: Option<NodeId>) -> NodeId {
	let id = tree.alloc(Node {
		key: shape.key,
		value: shape.value,
		color: shape.color.into(),
		parent,
		left: None,
		right: None,
	});
	if let Some(left) = shape.left {
		let child = build(tree, *left, Some(id));
		tree.node_mut(id).left = Some(child);
	}
	if let Some(right) = shape.right {
		let child = build(tree, *right, Some(id));
		tree.node_mut(id).right = Some(child);
	}
	id
}

/// Builds a tree directly from a JSON shape, bypassing `insert`.
///
/// The shape is taken at face value; fixtures are expected to describe
/// well-formed red-black trees, and `assert_invariants` in the consuming
/// test will catch one that does not.
pub fn sample_tree(json: &str) -> Tree<String, u64> {
	let shape: ShapeNode = serde_json::from_str(json).expect("fixture must be valid JSON");
	let mut tree = Tree::new();
	let root = build(&mut tree, shape, None);
	tree.root = Some(root);
	tree.len = tree.slots.len();
	tree
}

fn extract(tree: &Tree<String, u64>, id: NodeId) -> ShapeNode {
	let node = tree.node(id);
	ShapeNode {
		key: node.key.clone(),
		value: node.value,
		color: node.color.into(),
		left: node.left.map(|child| Box::new(extract(tree, child))),
		right: node.right.map(|child| Box::new(extract(tree, child))),
	}
}

/// Extracts the tree's current shape, or `None` if it is empty.
pub fn shape_of(tree: &Tree<String, u64>) -> Option<ShapeNode> {
	tree.root.map(|id| extract(tree, id))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_a_shape() {
		let json = r#"{
			"key": "m", "value": 13, "color": "black",
			"left": { "key": "a", "value": 1, "color": "red" }
		}"#;

		let tree = sample_tree(json);
		let shape = shape_of(&tree).expect("tree is non-empty");

		assert_eq!(shape.key, "m");
		assert_eq!(shape.value, 13);
		assert_eq!(shape.color, ShapeColor::Black);
		let left = shape.left.as_deref().expect("left child present");
		assert_eq!(left.key, "a");
		assert_eq!(left.color, ShapeColor::Red);
		assert!(shape.right.is_none());
	}

	#[test]
	fn built_tree_is_fully_linked() {
		let tree = sample_tree(
			r#"{
				"key": "b", "value": 2, "color": "black",
				"left": { "key": "a", "value": 1, "color": "red" },
				"right": { "key": "c", "value": 3, "color": "red" }
			}"#,
		);

		tree.assert_invariants();
		assert_eq!(tree.len(), 3);
		assert_eq!(tree.get(&"a".to_string()), Some(&1));
		assert_eq!(tree.get(&"c".to_string()), Some(&3));
	}
}
