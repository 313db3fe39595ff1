//! Crate-wide error type.

use std::fmt;

use thiserror::Error;

/// Which kind of source record a [`GraphError::MalformedInput`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
	/// An entry of `allContainers`.
	Container,
	/// An entry of `allUnits`.
	Unit,
	/// An entry of `dependencyEdges`.
	Dependency,
	/// An entry of `hierarchyEdges`.
	Hierarchy,
	/// An entry of `membershipEdges`.
	Membership,
}

impl fmt::Display for RecordKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			RecordKind::Container => "container",
			RecordKind::Unit => "unit",
			RecordKind::Dependency => "dependency",
			RecordKind::Hierarchy => "hierarchy",
			RecordKind::Membership => "membership",
		})
	}
}

/// Errors raised while loading, building, or laying out a dependency graph.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
	/// The data-fetch collaborator failed. Shown to the user verbatim.
	#[error("{0}")]
	Fetch(String),

	/// A source record lacks one of its identity fields.
	#[error("malformed {record} record #{index}: missing `{field}`")]
	MalformedInput {
		/// Record family the bad record came from.
		record: RecordKind,
		/// Position of the record within its family.
		index: usize,
		/// Wire name of the missing field.
		field: &'static str,
	},

	/// A layout identifier outside the supported set.
	#[error("unsupported layout `{0}`")]
	UnsupportedLayout(String),

	/// A bad value in the viewer configuration.
	#[error("invalid configuration value for `{key}`: {value}")]
	Config {
		/// Query-string key.
		key: String,
		/// Offending value.
		value: String,
	},
}

impl GraphError {
	/// Shorthand for [`GraphError::Fetch`].
	pub fn fetch(message: impl Into<String>) -> Self {
		GraphError::Fetch(message.into())
	}
}
