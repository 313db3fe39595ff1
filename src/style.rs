//! Style rules handed to the renderer alongside the elements.

/// Node appearance, sizes in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub fill: &'static str,
	pub size: f64,
	pub label_color: &'static str,
	pub font_size: f64,
	pub outline_color: &'static str,
	pub outline_width: f64,
	pub border_color: Option<&'static str>,
	pub border_width: f64,
	pub border_opacity: f64,
}

/// Edge appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub width: f64,
	pub line_color: &'static str,
	pub arrow_color: &'static str,
	pub arrow_size: f64,
}

/// Complete stylesheet for one render.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRules {
	pub background: &'static str,
	pub node: NodeStyle,
	/// Applied to the hovered node.
	pub selected: NodeStyle,
	pub edge: EdgeStyle,
}

impl Default for StyleRules {
	fn default() -> Self {
		Self {
			background: "#ffffff",
			node: NodeStyle {
				fill: "#4a56a6",
				size: 30.0,
				label_color: "white",
				font_size: 20.0,
				outline_color: "#4a56a6",
				outline_width: 2.0,
				border_color: None,
				border_width: 0.0,
				border_opacity: 0.0,
			},
			selected: NodeStyle {
				fill: "#77828C",
				size: 25.0,
				label_color: "white",
				font_size: 20.0,
				outline_color: "#77828C",
				outline_width: 8.0,
				border_color: Some("#AAD8FF"),
				border_width: 6.0,
				border_opacity: 0.5,
			},
			edge: EdgeStyle {
				width: 3.0,
				line_color: "#AAD8FF",
				arrow_color: "#6774cb",
				arrow_size: 10.0,
			},
		}
	}
}

impl StyleRules {
	/// Node radius used for edge clipping and hit testing.
	pub fn node_radius(&self) -> f64 {
		self.node.size / 2.0
	}
}
