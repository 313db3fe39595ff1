//! Canonical graph model and the builder that derives it from source records.

mod builder;
mod types;

pub use builder::{Build, BuildReport, build};
pub use types::{
	DependencyRecord, Edge, EdgeKind, Entity, EntityId, EntityRef, Graph, HierarchyRecord,
	MembershipRecord, Node, Relationship, SourceData,
};
