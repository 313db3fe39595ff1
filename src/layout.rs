//! Layout selection: maps a layout identifier to the configuration handed to
//! the renderer.

use std::fmt;
use std::str::FromStr;

use crate::error::GraphError;

/// The closed set of layouts the viewer offers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutId {
	Grid,
	#[default]
	Circle,
	Concentric,
	Breadthfirst,
	Cose,
}

impl LayoutId {
	/// Selection order for the layout control.
	pub const ALL: [LayoutId; 5] = [
		LayoutId::Grid,
		LayoutId::Circle,
		LayoutId::Concentric,
		LayoutId::Breadthfirst,
		LayoutId::Cose,
	];

	pub const fn as_str(self) -> &'static str {
		match self {
			LayoutId::Grid => "grid",
			LayoutId::Circle => "circle",
			LayoutId::Concentric => "concentric",
			LayoutId::Breadthfirst => "breadthfirst",
			LayoutId::Cose => "cose",
		}
	}

	pub const fn display_name(self) -> &'static str {
		match self {
			LayoutId::Grid => "Grid",
			LayoutId::Circle => "Circle",
			LayoutId::Concentric => "Concentric",
			LayoutId::Breadthfirst => "Breadth First",
			LayoutId::Cose => "Cose",
		}
	}
}

impl fmt::Display for LayoutId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LayoutId {
	type Err = GraphError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		LayoutId::ALL
			.into_iter()
			.find(|id| id.as_str() == s)
			.ok_or_else(|| GraphError::UnsupportedLayout(s.to_owned()))
	}
}

/// Force-directed simulation constants for `cose`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
	pub charge: f32,
	pub spring: f32,
	pub max_force: f32,
	pub node_speed: f32,
	pub damping: f32,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			charge: 150.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
		}
	}
}

/// Per-algorithm parameters, world units.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutParams {
	Grid {
		spacing: f64,
	},
	Circle {
		min_radius: f64,
		/// Arc length reserved per node.
		spacing: f64,
	},
	/// Rings by descending degree, highest in the centre.
	Concentric {
		level_spacing: f64,
		min_node_spacing: f64,
	},
	/// Rows by distance from the root nodes.
	Breadthfirst {
		directed: bool,
		level_spacing: f64,
		sibling_spacing: f64,
	},
	Cose(ForceParams),
}

/// A resolved layout: which algorithm, with which parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub id: LayoutId,
	pub params: LayoutParams,
}

impl LayoutConfig {
	/// Default parameters for `id`.
	pub fn for_id(id: LayoutId) -> Self {
		let params = match id {
			LayoutId::Grid => LayoutParams::Grid { spacing: 80.0 },
			LayoutId::Circle => LayoutParams::Circle {
				min_radius: 100.0,
				spacing: 60.0,
			},
			LayoutId::Concentric => LayoutParams::Concentric {
				level_spacing: 90.0,
				min_node_spacing: 50.0,
			},
			LayoutId::Breadthfirst => LayoutParams::Breadthfirst {
				directed: false,
				level_spacing: 100.0,
				sibling_spacing: 70.0,
			},
			LayoutId::Cose => LayoutParams::Cose(ForceParams::default()),
		};
		Self { id, params }
	}

	/// Whether the renderer keeps simulating after the initial placement.
	pub fn animates(&self) -> bool {
		matches!(self.params, LayoutParams::Cose(_))
	}
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self::for_id(LayoutId::default())
	}
}

/// Resolves a layout identifier. Fails with
/// [`GraphError::UnsupportedLayout`] outside the supported set.
pub fn resolve(layout_id: &str) -> Result<LayoutConfig, GraphError> {
	Ok(LayoutConfig::for_id(layout_id.parse()?))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn resolves_cose() {
		let config = resolve("cose").unwrap();
		assert_eq!(config.id, LayoutId::Cose);
		assert_eq!(config.params, LayoutParams::Cose(ForceParams::default()));
		assert!(config.animates());
	}

	#[test]
	fn rejects_radial() {
		assert_eq!(
			resolve("radial"),
			Err(GraphError::UnsupportedLayout("radial".into()))
		);
	}

	#[test]
	fn identifiers_are_case_sensitive() {
		assert!(resolve("Grid").is_err());
		assert!(resolve("").is_err());
	}

	#[test]
	fn every_identifier_round_trips() {
		for id in LayoutId::ALL {
			let config = resolve(id.as_str()).unwrap();
			assert_eq!(config.id, id);
			assert_eq!(config.animates(), id == LayoutId::Cose);
		}
	}

	#[test]
	fn default_is_circle() {
		assert_eq!(LayoutConfig::default().id, LayoutId::Circle);
		assert_eq!(LayoutId::Breadthfirst.display_name(), "Breadth First");
	}
}
