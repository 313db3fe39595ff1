//! Label-predicate filtering over a canonical graph.

use std::collections::HashSet;

use crate::model::{Edge, Graph, Node};

/// Substring predicates typed into the node and edge label inputs.
/// An empty predicate matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterQuery {
	pub node_label: String,
	pub edge_label: String,
}

impl FilterQuery {
	pub fn new(node_label: impl Into<String>, edge_label: impl Into<String>) -> Self {
		Self {
			node_label: node_label.into(),
			edge_label: edge_label.into(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.node_label.is_empty() && self.edge_label.is_empty()
	}

	fn keeps_node(&self, node: &Node) -> bool {
		self.node_label.is_empty() || node.label.contains(self.node_label.as_str())
	}

	fn keeps_edge_label(&self, edge: &Edge) -> bool {
		self.edge_label.is_empty() || edge.label.contains(self.edge_label.as_str())
	}
}

/// Projects `graph` onto the nodes and edges matching `query`.
///
/// Nodes are kept by case-sensitive substring match on their label. An edge
/// survives when its label matches and both endpoints survived, so removing
/// a node removes every incident edge. Order is preserved. Callers should
/// always pass the canonical graph, never a previous result.
pub fn filter(graph: &Graph, query: &FilterQuery) -> Graph {
	if query.is_empty() {
		return graph.clone();
	}

	let nodes: Vec<Node> = graph
		.nodes
		.iter()
		.filter(|n| query.keeps_node(n))
		.cloned()
		.collect();
	let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

	let edges = graph
		.edges
		.iter()
		.filter(|e| query.keeps_edge_label(e))
		.filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
		.cloned()
		.collect();

	Graph { nodes, edges }
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::model::{DependencyRecord, Entity, HierarchyRecord, build};

	fn auth_billing() -> Graph {
		build(
			&[
				Entity::new(1, "Auth"),
				Entity::new(2, "AuthClient"),
				Entity::new(3, "Billing"),
			],
			&[],
			&[DependencyRecord::new(2, 1, "calls")],
			&[],
			&[],
		)
		.unwrap()
		.graph
	}

	fn node_ids(graph: &Graph) -> Vec<&str> {
		graph.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn node_predicate_keeps_edge_between_survivors() {
		let filtered = filter(&auth_billing(), &FilterQuery::new("Auth", ""));

		assert_eq!(node_ids(&filtered), ["1", "2"]);
		assert_eq!(filtered.edges.len(), 1);
		assert_eq!(filtered.edges[0].source, "2");
		assert_eq!(filtered.edges[0].target, "1");
	}

	#[test]
	fn node_predicate_cascades_to_edges() {
		let filtered = filter(&auth_billing(), &FilterQuery::new("Billing", ""));

		assert_eq!(node_ids(&filtered), ["3"]);
		assert!(filtered.edges.is_empty());
	}

	#[test]
	fn match_is_case_sensitive() {
		let filtered = filter(&auth_billing(), &FilterQuery::new("auth", ""));
		assert!(filtered.is_empty());
	}

	#[test]
	fn edge_predicate_keeps_all_nodes() {
		let graph = build(
			&[Entity::new(1, "a"), Entity::new(2, "b")],
			&[],
			&[DependencyRecord::new(1, 2, "calls")],
			&[HierarchyRecord::new(1, 2, "contains")],
			&[],
		)
		.unwrap()
		.graph;

		let filtered = filter(&graph, &FilterQuery::new("", "contain"));
		assert_eq!(filtered.nodes, graph.nodes);
		assert_eq!(filtered.edges.len(), 1);
		assert_eq!(filtered.edges[0].label, "contains");
	}

	#[test]
	fn both_predicates_must_hold() {
		let filtered = filter(&auth_billing(), &FilterQuery::new("Auth", "imports"));
		assert_eq!(node_ids(&filtered), ["1", "2"]);
		assert!(filtered.edges.is_empty());
	}

	#[test]
	fn refiltering_the_canonical_graph_recovers_nodes() {
		let canonical = auth_billing();
		let narrow = filter(&canonical, &FilterQuery::new("Billing", ""));
		let wide = filter(&canonical, &FilterQuery::default());

		assert_eq!(narrow.nodes.len(), 1);
		assert_eq!(wide, canonical);
	}

	fn arb_graph() -> impl Strategy<Value = Graph> {
		(
			prop::collection::vec("[ab]{0,3}", 0..8),
			prop::collection::vec((0i64..10, 0i64..10, "[xy]{0,2}"), 0..16),
		)
			.prop_map(|(labels, links)| {
				let containers: Vec<Entity> = labels
					.into_iter()
					.enumerate()
					.map(|(i, label)| Entity::new(i as i64, label))
					.collect();
				let dependencies: Vec<DependencyRecord> = links
					.into_iter()
					.map(|(s, t, label)| DependencyRecord::new(s, t, label))
					.collect();
				build(&containers, &[], &dependencies, &[], &[])
					.unwrap()
					.graph
			})
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(128))]

		#[test]
		fn prop_filtered_graph_is_consistent(
			graph in arb_graph(),
			node in "[ab]{0,2}",
			edge in "[xy]{0,2}",
		) {
			prop_assert!(graph.is_consistent());
			let filtered = filter(&graph, &FilterQuery::new(node, edge));
			prop_assert!(filtered.is_consistent());
		}

		#[test]
		fn prop_filter_is_idempotent(
			graph in arb_graph(),
			node in "[ab]{0,2}",
			edge in "[xy]{0,2}",
		) {
			let query = FilterQuery::new(node, edge);
			let once = filter(&graph, &query);
			let twice = filter(&once, &query);
			prop_assert_eq!(once, twice);
		}

		#[test]
		fn prop_empty_query_is_identity(graph in arb_graph()) {
			prop_assert_eq!(filter(&graph, &FilterQuery::default()), graph);
		}

		#[test]
		fn prop_excluded_nodes_have_no_edges(graph in arb_graph(), node in "[ab]{1,2}") {
			let filtered = filter(&graph, &FilterQuery::new(node.clone(), ""));
			for excluded in graph.nodes.iter().filter(|n| !n.label.contains(node.as_str())) {
				prop_assert!(filtered.node(&excluded.id).is_none());
				prop_assert!(filtered
					.edges
					.iter()
					.all(|e| e.source != excluded.id && e.target != excluded.id));
			}
		}

		#[test]
		fn prop_stricter_predicate_keeps_a_subset(
			graph in arb_graph(),
			base in "[ab]{0,1}",
			suffix in "[ab]{1,2}",
		) {
			let loose = filter(&graph, &FilterQuery::new(base.clone(), ""));
			let strict = filter(&graph, &FilterQuery::new(format!("{base}{suffix}"), ""));
			let everything = filter(&graph, &FilterQuery::default());
			for n in &strict.nodes {
				prop_assert!(loose.node(&n.id).is_some());
			}
			for n in &loose.nodes {
				prop_assert!(everything.node(&n.id).is_some());
			}
		}
	}
}
