use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::placement;
use crate::layout::{ForceParams, LayoutConfig, LayoutParams};
use crate::model::Graph;
use crate::style::StyleRules;

/// Extra world-space slack around a node for hit testing.
pub const HIT_SLACK: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// One rendered surface: positioned elements plus interaction state.
pub struct CanvasState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub style: StyleRules,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	/// Only the force-directed layout keeps moving after placement.
	pub animation_running: bool,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

fn simulation(params: ForceParams) -> SimulationParameters {
	SimulationParameters {
		force_charge: params.charge,
		force_spring: params.spring,
		force_max: params.max_force,
		node_speed: params.node_speed,
		damping_factor: params.damping,
	}
}

impl CanvasState {
	pub fn new(
		data: &Graph,
		style: &StyleRules,
		layout: &LayoutConfig,
		width: f64,
		height: f64,
	) -> Self {
		let params = match layout.params {
			LayoutParams::Cose(params) => params,
			_ => ForceParams::default(),
		};
		let mut graph = ForceGraph::new(simulation(params));
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		let positions = placement::place(data, layout);
		for (node, &(x, y)) in data.nodes.iter().zip(&positions) {
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		for edge in &data.edges {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		Self {
			graph,
			style: style.clone(),
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: layout.animates(),
		}
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let hit_radius = self.style.node_radius() + HIT_SLACK;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		if self.animation_running {
			self.graph.update(dt);
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::{LayoutId, resolve};
	use crate::model::{DependencyRecord, Entity, build};

	fn graph() -> Graph {
		build(
			&[Entity::new(1, "a"), Entity::new(2, "b"), Entity::new(3, "c")],
			&[],
			&[DependencyRecord::new(1, 2, "x"), DependencyRecord::new(2, 3, "y")],
			&[],
			&[],
		)
		.unwrap()
		.graph
	}

	#[test]
	fn only_cose_animates() {
		for id in LayoutId::ALL {
			let state = CanvasState::new(
				&graph(),
				&StyleRules::default(),
				&LayoutConfig::for_id(id),
				800.0,
				600.0,
			);
			assert_eq!(state.animation_running, id == LayoutId::Cose);
			assert_eq!(state.edge_count(), 2);
		}
	}

	#[test]
	fn static_layouts_do_not_move_on_tick() {
		let mut state = CanvasState::new(
			&graph(),
			&StyleRules::default(),
			&resolve("grid").unwrap(),
			800.0,
			600.0,
		);
		let before: Vec<(f32, f32)> = {
			let mut v = Vec::new();
			state.graph.visit_nodes(|n| v.push((n.x(), n.y())));
			v
		};
		state.tick(0.016);
		let mut after = Vec::new();
		state.graph.visit_nodes(|n| after.push((n.x(), n.y())));
		assert_eq!(before, after);
	}

	#[test]
	fn hovering_collects_neighbours() {
		let mut state = CanvasState::new(
			&graph(),
			&StyleRules::default(),
			&LayoutConfig::default(),
			800.0,
			600.0,
		);
		let mut middle = None;
		state.graph.visit_nodes(|n| {
			if n.data.user_data.id == "2" {
				middle = Some(n.index());
			}
		});
		state.set_hover(middle);
		assert_eq!(state.hover.neighbors.len(), 2);
		assert!(state.has_active_highlight());

		state.set_hover(None);
		assert!(state.hover.prev_node.is_some());
	}

	#[test]
	fn hit_test_finds_node_under_cursor() {
		let state = CanvasState::new(
			&graph(),
			&StyleRules::default(),
			&LayoutConfig::for_id(LayoutId::Grid),
			800.0,
			600.0,
		);
		let mut first = None;
		state.graph.visit_nodes(|n| {
			if first.is_none() {
				first = Some((n.index(), n.x() as f64, n.y() as f64));
			}
		});
		let (idx, x, y) = first.unwrap();
		let (sx, sy) = (x + state.transform.x, y + state.transform.y);
		assert_eq!(state.node_at_position(sx, sy), Some(idx));
		assert_eq!(state.node_at_position(-5000.0, -5000.0), None);
	}
}
