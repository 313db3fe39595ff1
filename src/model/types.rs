use std::collections::HashSet;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::RecordKind;

/// Numeric entity identifier. Accepts JSON numbers and numeric strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl<'de> Deserialize<'de> for EntityId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Wire {
			Number(i64),
			Text(String),
		}

		match Wire::deserialize(deserializer)? {
			Wire::Number(id) => Ok(EntityId(id)),
			Wire::Text(text) => text
				.trim()
				.parse()
				.map(EntityId)
				.map_err(|_| D::Error::custom(format!("non-numeric entity id `{text}`"))),
		}
	}
}

/// A container or unit as delivered by the data source.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Entity {
	pub id: Option<EntityId>,
	pub name: Option<String>,
}

impl Entity {
	pub fn new(id: i64, name: impl Into<String>) -> Self {
		Self {
			id: Some(EntityId(id)),
			name: Some(name.into()),
		}
	}
}

/// Reference to an entity from inside a relationship record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EntityRef {
	pub id: Option<EntityId>,
}

impl EntityRef {
	fn to(id: i64) -> Option<Self> {
		Some(Self {
			id: Some(EntityId(id)),
		})
	}
}

fn endpoint(side: &Option<EntityRef>) -> Option<EntityId> {
	side.as_ref().and_then(|r| r.id)
}

/// `dependant` depends upon `dependedUpon`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
	pub dependant: Option<EntityRef>,
	pub depended_upon: Option<EntityRef>,
	pub label: Option<String>,
}

impl DependencyRecord {
	pub fn new(dependant: i64, depended_upon: i64, label: impl Into<String>) -> Self {
		Self {
			dependant: EntityRef::to(dependant),
			depended_upon: EntityRef::to(depended_upon),
			label: Some(label.into()),
		}
	}
}

/// `parent` contains `children`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct HierarchyRecord {
	pub parent: Option<EntityRef>,
	pub children: Option<EntityRef>,
	pub label: Option<String>,
}

impl HierarchyRecord {
	pub fn new(parent: i64, child: i64, label: impl Into<String>) -> Self {
		Self {
			parent: EntityRef::to(parent),
			children: EntityRef::to(child),
			label: Some(label.into()),
		}
	}
}

/// `member` belongs to `parent`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MembershipRecord {
	pub parent: Option<EntityRef>,
	pub member: Option<EntityRef>,
	pub label: Option<String>,
}

impl MembershipRecord {
	pub fn new(parent: i64, member: i64, label: impl Into<String>) -> Self {
		Self {
			parent: EntityRef::to(parent),
			member: EntityRef::to(member),
			label: Some(label.into()),
		}
	}
}

/// Discriminates the three relationship families once they are edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
	Dependency,
	Hierarchy,
	Membership,
}

impl EdgeKind {
	/// Wire role names mapped to `(source, target)`.
	pub const fn roles(self) -> (&'static str, &'static str) {
		match self {
			EdgeKind::Dependency => ("dependant", "dependedUpon"),
			EdgeKind::Hierarchy => ("parent", "children"),
			EdgeKind::Membership => ("parent", "member"),
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			EdgeKind::Dependency => "dependency",
			EdgeKind::Hierarchy => "hierarchy",
			EdgeKind::Membership => "membership",
		}
	}

	pub const fn record_kind(self) -> RecordKind {
		match self {
			EdgeKind::Dependency => RecordKind::Dependency,
			EdgeKind::Hierarchy => RecordKind::Hierarchy,
			EdgeKind::Membership => RecordKind::Membership,
		}
	}
}

impl fmt::Display for EdgeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A relationship record of any family, viewed through its role table.
#[derive(Clone, Copy, Debug)]
pub enum Relationship<'a> {
	Dependency(&'a DependencyRecord),
	Hierarchy(&'a HierarchyRecord),
	Membership(&'a MembershipRecord),
}

impl<'a> Relationship<'a> {
	pub fn kind(&self) -> EdgeKind {
		match self {
			Relationship::Dependency(_) => EdgeKind::Dependency,
			Relationship::Hierarchy(_) => EdgeKind::Hierarchy,
			Relationship::Membership(_) => EdgeKind::Membership,
		}
	}

	pub fn source(&self) -> Option<EntityId> {
		match self {
			Relationship::Dependency(r) => endpoint(&r.dependant),
			Relationship::Hierarchy(r) => endpoint(&r.parent),
			Relationship::Membership(r) => endpoint(&r.parent),
		}
	}

	pub fn target(&self) -> Option<EntityId> {
		match self {
			Relationship::Dependency(r) => endpoint(&r.depended_upon),
			Relationship::Hierarchy(r) => endpoint(&r.children),
			Relationship::Membership(r) => endpoint(&r.member),
		}
	}

	pub fn label(&self) -> Option<&'a str> {
		match *self {
			Relationship::Dependency(r) => r.label.as_deref(),
			Relationship::Hierarchy(r) => r.label.as_deref(),
			Relationship::Membership(r) => r.label.as_deref(),
		}
	}
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Everything one query returns. Absent or null sequences are empty.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceData {
	#[serde(rename = "allContainers", default, deserialize_with = "null_as_empty")]
	pub containers: Vec<Entity>,
	#[serde(rename = "allUnits", default, deserialize_with = "null_as_empty")]
	pub units: Vec<Entity>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub dependency_edges: Vec<DependencyRecord>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub hierarchy_edges: Vec<HierarchyRecord>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub membership_edges: Vec<MembershipRecord>,
}

/// Canonical graph vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
	pub id: String,
	pub label: String,
}

/// Canonical graph edge. `source` and `target` are node ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub label: String,
	pub kind: EdgeKind,
}

/// Nodes in arrival order plus the edges between them.
///
/// Node ids are unique and every edge endpoint names a node of the same
/// graph. Graphs are values: filtering produces a new graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl Graph {
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Unique node ids with every edge endpoint resolving to one of them.
	pub fn is_consistent(&self) -> bool {
		let mut ids = HashSet::with_capacity(self.nodes.len());
		if !self.nodes.iter().all(|n| ids.insert(n.id.as_str())) {
			return false;
		}
		self.edges
			.iter()
			.all(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
	}
}
