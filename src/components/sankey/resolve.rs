//! Name-addressed dataset to index-addressed graph.

use std::collections::HashMap;

use log::warn;

use super::lookup::Lookup;
use crate::data::{BudgetData, BudgetNode};

/// Index used when a link names a node that does not exist.
pub const MISSING_NODE_INDEX: usize = 0;

/// A link whose endpoints are positions in [`ResolvedGraph::nodes`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLink {
	pub source: usize,
	pub target: usize,
	pub value: f64,
	pub source_name: String,
	pub target_name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedGraph {
	pub nodes: Vec<BudgetNode>,
	pub links: Vec<ResolvedLink>,
	/// Number of endpoints that fell back to [`MISSING_NODE_INDEX`].
	pub unresolved: usize,
}

/// First-seen name to position mapping.
pub struct NameIndex<'a> {
	positions: HashMap<&'a str, usize>,
}

impl<'a> NameIndex<'a> {
	pub fn new(nodes: &'a [BudgetNode]) -> Self {
		let mut positions = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			positions.entry(node.name.as_str()).or_insert(i);
		}
		Self { positions }
	}

	pub fn lookup(&self, name: &str) -> Lookup<usize> {
		Lookup::from_option(self.positions.get(name).copied(), MISSING_NODE_INDEX)
	}
}

/// Replace link endpoints by node positions, keeping the names for display.
///
/// Unknown names never fail the whole graph: they are routed to
/// [`MISSING_NODE_INDEX`] and reported with a warning.
pub fn resolve(data: &BudgetData) -> ResolvedGraph {
	let index = NameIndex::new(&data.nodes);
	let mut unresolved = 0;

	let links = data
		.links
		.iter()
		.map(|link| {
			let (source, target) = (index.lookup(&link.source), index.lookup(&link.target));
			let sides = [("source", &link.source, source), ("target", &link.target, target)];
			for (side, name, hit) in sides {
				if !hit.is_found() {
					unresolved += 1;
					warn!(
						"link {:?} -> {:?}: unknown {side} node {name:?}, routed to index {MISSING_NODE_INDEX}",
						link.source, link.target
					);
				}
			}
			ResolvedLink {
				source: source.value(),
				target: target.value(),
				value: link.value,
				source_name: link.source.clone(),
				target_name: link.target.clone(),
			}
		})
		.collect();

	ResolvedGraph {
		nodes: data.nodes.clone(),
		links,
		unresolved,
	}
}

impl ResolvedGraph {
	/// Sum of link values leaving each node, indexed like `nodes`.
	pub fn outflows(&self) -> Vec<f64> {
		let mut sums = vec![0.0; self.nodes.len()];
		for link in &self.links {
			if let Some(sum) = sums.get_mut(link.source) {
				*sum += link.value;
			}
		}
		sums
	}

	/// Sum of link values entering each node, indexed like `nodes`.
	pub fn inflows(&self) -> Vec<f64> {
		let mut sums = vec![0.0; self.nodes.len()];
		for link in &self.links {
			if let Some(sum) = sums.get_mut(link.target) {
				*sum += link.value;
			}
		}
		sums
	}

	/// Aggregate value of every node: the larger of its inflow and outflow.
	pub fn node_values(&self) -> Vec<f64> {
		self.inflows()
			.into_iter()
			.zip(self.outflows())
			.map(|(i, o)| i.max(o))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::{BudgetLink, Category, budget_2024};

	fn small() -> BudgetData {
		BudgetData {
			nodes: vec![
				BudgetNode::new("A", Category::Resource),
				BudgetNode::new("B", Category::Intermediate),
				BudgetNode::new("C", Category::Expense),
			],
			links: vec![
				BudgetLink::new("A", "B", 10.0),
				BudgetLink::new("B", "C", 10.0),
				BudgetLink::new("Ghost", "C", 5.0),
			],
		}
	}

	#[test]
	fn known_names_resolve_to_their_position() {
		let graph = resolve(budget_2024());
		assert_eq!(graph.unresolved, 0);
		for link in &graph.links {
			assert_eq!(graph.nodes[link.source].name, link.source_name);
			assert_eq!(graph.nodes[link.target].name, link.target_name);
		}
	}

	#[test]
	fn dangling_name_falls_back_to_first_node() {
		let graph = resolve(&small());
		let ghost = &graph.links[2];
		assert_eq!(ghost.source, MISSING_NODE_INDEX);
		assert_eq!(ghost.target, 2);
		assert_eq!(ghost.source_name, "Ghost");
		assert_eq!(graph.unresolved, 1);
	}

	#[test]
	fn duplicate_names_keep_first_position() {
		let nodes = vec![
			BudgetNode::new("X", Category::Resource),
			BudgetNode::new("X", Category::Expense),
		];
		let index = NameIndex::new(&nodes);
		assert_eq!(index.lookup("X"), Lookup::Found(0));
		assert_eq!(index.lookup("Y"), Lookup::Fallback(MISSING_NODE_INDEX));
	}

	#[test]
	fn duplicate_links_are_additive() {
		let data = BudgetData {
			nodes: vec![
				BudgetNode::new("A", Category::Resource),
				BudgetNode::new("B", Category::Intermediate),
			],
			links: vec![BudgetLink::new("A", "B", 2.0), BudgetLink::new("A", "B", 3.0)],
		};
		let graph = resolve(&data);
		assert_eq!(graph.node_values(), vec![5.0, 5.0]);
	}

	#[test]
	fn aggregate_is_max_of_in_and_out() {
		let graph = resolve(&BudgetData {
			links: small().links[..2].to_vec(),
			..small()
		});
		assert_eq!(graph.node_values(), vec![10.0, 10.0, 10.0]);
		let lopsided = resolve(&BudgetData {
			nodes: small().nodes,
			links: vec![BudgetLink::new("A", "B", 10.0), BudgetLink::new("B", "C", 4.0)],
		});
		assert_eq!(lopsided.node_values()[1], 10.0);
	}

	#[test]
	fn links_into_an_empty_node_list_do_not_panic() {
		let graph = resolve(&BudgetData {
			nodes: Vec::new(),
			links: vec![BudgetLink::new("A", "B", 1.0)],
		});
		assert_eq!(graph.unresolved, 2);
		assert!(graph.node_values().is_empty());
	}
}
