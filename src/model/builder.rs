use std::collections::HashMap;

use log::{debug, warn};

use super::types::{
	DependencyRecord, Edge, Entity, EntityId, Graph, HierarchyRecord, MembershipRecord, Node,
	Relationship, SourceData,
};
use crate::error::{GraphError, RecordKind};

/// What the builder had to discard to keep the graph consistent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
	/// Relationships with an endpoint that matches no entity.
	pub dropped_edges: usize,
	/// Entities whose id was already taken by an earlier record.
	pub duplicate_nodes: usize,
}

/// A freshly built canonical graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Build {
	pub graph: Graph,
	pub report: BuildReport,
}

impl SourceData {
	/// Every relationship with its index inside its own family, in
	/// dependency, hierarchy, membership order.
	pub fn relationships(&self) -> impl Iterator<Item = (usize, Relationship<'_>)> {
		relationships(
			&self.dependency_edges,
			&self.hierarchy_edges,
			&self.membership_edges,
		)
	}

	/// Builds the canonical graph for this payload.
	pub fn build(&self) -> Result<Build, GraphError> {
		build(
			&self.containers,
			&self.units,
			&self.dependency_edges,
			&self.hierarchy_edges,
			&self.membership_edges,
		)
	}
}

fn relationships<'a>(
	dependency_edges: &'a [DependencyRecord],
	hierarchy_edges: &'a [HierarchyRecord],
	membership_edges: &'a [MembershipRecord],
) -> impl Iterator<Item = (usize, Relationship<'a>)> {
	let dependency = dependency_edges
		.iter()
		.map(Relationship::Dependency)
		.enumerate();
	let hierarchy = hierarchy_edges
		.iter()
		.map(Relationship::Hierarchy)
		.enumerate();
	let membership = membership_edges
		.iter()
		.map(Relationship::Membership)
		.enumerate();
	dependency.chain(hierarchy).chain(membership)
}

fn malformed(record: RecordKind, index: usize, field: &'static str) -> GraphError {
	GraphError::MalformedInput {
		record,
		index,
		field,
	}
}

fn identity(entity: &Entity, record: RecordKind, index: usize) -> Result<(EntityId, &str), GraphError> {
	let id = entity.id.ok_or_else(|| malformed(record, index, "id"))?;
	let name = entity
		.name
		.as_deref()
		.ok_or_else(|| malformed(record, index, "name"))?;
	Ok((id, name))
}

/// Converts raw entity and relationship records into a canonical [`Graph`].
///
/// Containers are processed before units; an id seen twice keeps its first
/// position and takes the later label. Relationships are mapped through
/// their kind's role table and dropped when an endpoint names no entity.
/// Fails only when a record is missing an identity field.
pub fn build(
	containers: &[Entity],
	units: &[Entity],
	dependency_edges: &[DependencyRecord],
	hierarchy_edges: &[HierarchyRecord],
	membership_edges: &[MembershipRecord],
) -> Result<Build, GraphError> {
	let mut report = BuildReport::default();
	let mut nodes: Vec<Node> = Vec::with_capacity(containers.len() + units.len());
	let mut slots: HashMap<String, usize> = HashMap::with_capacity(nodes.capacity());

	let entities = containers
		.iter()
		.enumerate()
		.map(|(i, e)| (RecordKind::Container, i, e))
		.chain(units.iter().enumerate().map(|(i, e)| (RecordKind::Unit, i, e)));

	for (record, index, entity) in entities {
		let (id, name) = identity(entity, record, index)?;
		let id = id.to_string();
		match slots.get(&id) {
			Some(&slot) => {
				report.duplicate_nodes += 1;
				nodes[slot].label = name.to_owned();
			}
			None => {
				slots.insert(id.clone(), nodes.len());
				nodes.push(Node {
					id,
					label: name.to_owned(),
				});
			}
		}
	}

	let mut edges = Vec::with_capacity(
		dependency_edges.len() + hierarchy_edges.len() + membership_edges.len(),
	);
	let stream = relationships(dependency_edges, hierarchy_edges, membership_edges);

	for (ordinal, (index, relationship)) in stream.enumerate() {
		let kind = relationship.kind();
		let (source_role, target_role) = kind.roles();
		let record = kind.record_kind();

		let source = relationship
			.source()
			.ok_or_else(|| malformed(record, index, source_role))?
			.to_string();
		let target = relationship
			.target()
			.ok_or_else(|| malformed(record, index, target_role))?
			.to_string();
		let label = relationship
			.label()
			.ok_or_else(|| malformed(record, index, "label"))?;

		if !slots.contains_key(&source) || !slots.contains_key(&target) {
			report.dropped_edges += 1;
			continue;
		}

		edges.push(Edge {
			id: format!("{kind}:{source}->{target}#{ordinal}"),
			source,
			target,
			label: label.to_owned(),
			kind,
		});
	}

	if report.dropped_edges > 0 || report.duplicate_nodes > 0 {
		warn!(
			"graph build dropped {} dangling edge(s), merged {} duplicate node id(s)",
			report.dropped_edges, report.duplicate_nodes
		);
	}
	debug!("built graph: {} nodes, {} edges", nodes.len(), edges.len());

	Ok(Build {
		graph: Graph { nodes, edges },
		report,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{EdgeKind, EntityRef};

	fn entities(items: &[(i64, &str)]) -> Vec<Entity> {
		items.iter().map(|&(id, name)| Entity::new(id, name)).collect()
	}

	#[test]
	fn containers_and_units_become_nodes_in_arrival_order() {
		let built = build(
			&entities(&[(1, "Core"), (2, "Web")]),
			&entities(&[(10, "auth.rs")]),
			&[],
			&[],
			&[],
		)
		.unwrap();

		let ids: Vec<_> = built.graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["1", "2", "10"]);
		assert_eq!(built.graph.nodes[2].label, "auth.rs");
		assert!(built.graph.edges.is_empty());
		assert_eq!(built.report, BuildReport::default());
	}

	#[test]
	fn each_kind_maps_its_roles_to_source_and_target() {
		let built = build(
			&entities(&[(1, "a"), (2, "b")]),
			&entities(&[(3, "c")]),
			&[DependencyRecord::new(1, 2, "uses")],
			&[HierarchyRecord::new(2, 3, "contains")],
			&[MembershipRecord::new(1, 3, "owns")],
		)
		.unwrap();

		let edges: Vec<_> = built
			.graph
			.edges
			.iter()
			.map(|e| (e.kind, e.source.as_str(), e.target.as_str(), e.label.as_str()))
			.collect();
		assert_eq!(
			edges,
			[
				(EdgeKind::Dependency, "1", "2", "uses"),
				(EdgeKind::Hierarchy, "2", "3", "contains"),
				(EdgeKind::Membership, "1", "3", "owns"),
			]
		);
	}

	#[test]
	fn edge_ids_are_unique_for_parallel_edges() {
		let built = build(
			&entities(&[(1, "a"), (2, "b")]),
			&[],
			&[
				DependencyRecord::new(1, 2, "x"),
				DependencyRecord::new(1, 2, "x"),
			],
			&[],
			&[],
		)
		.unwrap();

		let edges = &built.graph.edges;
		assert_eq!(edges.len(), 2);
		assert_ne!(edges[0].id, edges[1].id);
		assert_eq!(edges[0].id, "dependency:1->2#0");
	}

	#[test]
	fn dangling_edge_is_dropped_and_counted() {
		let built = build(
			&entities(&[(5, "Core")]),
			&[],
			&[DependencyRecord::new(5, 99, "x")],
			&[],
			&[],
		)
		.unwrap();

		assert_eq!(built.graph.nodes.len(), 1);
		assert_eq!(built.graph.nodes[0].id, "5");
		assert!(built.graph.edges.is_empty());
		assert_eq!(built.report.dropped_edges, 1);
		assert!(built.graph.is_consistent());
	}

	#[test]
	fn duplicate_id_keeps_position_and_takes_later_label() {
		let built = build(
			&entities(&[(1, "container"), (2, "other")]),
			&entities(&[(1, "unit")]),
			&[],
			&[],
			&[],
		)
		.unwrap();

		assert_eq!(built.graph.nodes.len(), 2);
		assert_eq!(built.graph.nodes[0].id, "1");
		assert_eq!(built.graph.nodes[0].label, "unit");
		assert_eq!(built.report.duplicate_nodes, 1);
	}

	#[test]
	fn entity_without_id_is_malformed() {
		let err = build(
			&[Entity::new(1, "ok"), Entity {
				id: None,
				name: Some("nameless".into()),
			}],
			&[],
			&[],
			&[],
			&[],
		)
		.unwrap_err();

		assert_eq!(err, GraphError::MalformedInput {
			record: RecordKind::Container,
			index: 1,
			field: "id",
		});
	}

	#[test]
	fn relationship_missing_endpoint_reports_role_name() {
		let record = MembershipRecord {
			parent: Some(EntityRef {
				id: Some(EntityId(1)),
			}),
			member: None,
			label: Some("m".into()),
		};
		let err = build(&entities(&[(1, "a")]), &[], &[], &[], &[record]).unwrap_err();

		assert_eq!(err, GraphError::MalformedInput {
			record: RecordKind::Membership,
			index: 0,
			field: "member",
		});
	}

	#[test]
	fn relationship_missing_label_is_malformed_even_when_dangling() {
		let record = DependencyRecord {
			label: None,
			..DependencyRecord::new(1, 99, "")
		};
		let err = build(&entities(&[(1, "a")]), &[], &[record], &[], &[]).unwrap_err();

		assert!(matches!(err, GraphError::MalformedInput { field: "label", .. }));
	}

	#[test]
	fn source_data_builds_the_same_graph() {
		let source = SourceData {
			containers: entities(&[(1, "a")]),
			units: entities(&[(2, "b")]),
			hierarchy_edges: vec![HierarchyRecord::new(1, 2, "has")],
			..SourceData::default()
		};

		let built = source.build().unwrap();
		assert_eq!(built.graph.nodes.len(), 2);
		assert_eq!(built.graph.edges.len(), 1);
		assert_eq!(source.relationships().count(), 1);
	}
}
