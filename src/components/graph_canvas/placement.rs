//! Initial node positions for each layout, centred on the world origin.

use std::collections::{HashMap, VecDeque};
use std::f64::consts::TAU;

use crate::layout::{LayoutConfig, LayoutParams};
use crate::model::Graph;

/// Circle used to seed the force simulation.
const SEED_RADIUS: f64 = 100.0;

/// Positions for `graph.nodes`, index-aligned.
pub fn place(graph: &Graph, layout: &LayoutConfig) -> Vec<(f64, f64)> {
	let n = graph.nodes.len();
	match layout.params {
		LayoutParams::Grid { spacing } => grid(n, spacing),
		LayoutParams::Circle {
			min_radius,
			spacing,
		} => circle(n, (n as f64 * spacing / TAU).max(min_radius)),
		LayoutParams::Concentric {
			level_spacing,
			min_node_spacing,
		} => concentric(graph, level_spacing, min_node_spacing),
		LayoutParams::Breadthfirst {
			directed,
			level_spacing,
			sibling_spacing,
		} => breadthfirst(graph, directed, level_spacing, sibling_spacing),
		LayoutParams::Cose(_) => circle(n, SEED_RADIUS),
	}
}

fn centred(i: usize, count: usize, spacing: f64) -> f64 {
	(i as f64 - (count.max(1) - 1) as f64 / 2.0) * spacing
}

fn grid(n: usize, spacing: f64) -> Vec<(f64, f64)> {
	let cols = (n as f64).sqrt().ceil().max(1.0) as usize;
	let rows = n.div_ceil(cols);
	(0..n)
		.map(|i| (centred(i % cols, cols, spacing), centred(i / cols, rows, spacing)))
		.collect()
}

fn ring(count: usize, radius: f64) -> impl Iterator<Item = (f64, f64)> {
	(0..count).map(move |i| {
		let angle = i as f64 * TAU / count as f64;
		(radius * angle.cos(), radius * angle.sin())
	})
}

fn circle(n: usize, radius: f64) -> Vec<(f64, f64)> {
	if n == 1 {
		return vec![(0.0, 0.0)];
	}
	ring(n, radius).collect()
}

fn index_of(graph: &Graph) -> HashMap<&str, usize> {
	graph
		.nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect()
}

fn concentric(graph: &Graph, level_spacing: f64, min_node_spacing: f64) -> Vec<(f64, f64)> {
	let index = index_of(graph);
	let mut degree = vec![0usize; graph.nodes.len()];
	for edge in &graph.edges {
		degree[index[edge.source.as_str()]] += 1;
		degree[index[edge.target.as_str()]] += 1;
	}

	let mut levels: Vec<usize> = degree.clone();
	levels.sort_unstable_by(|a, b| b.cmp(a));
	levels.dedup();

	let mut positions = vec![(0.0, 0.0); graph.nodes.len()];
	let mut radius = 0.0;
	for (k, level) in levels.into_iter().enumerate() {
		let members: Vec<usize> = (0..degree.len()).filter(|&i| degree[i] == level).collect();
		let needed = members.len() as f64 * min_node_spacing / TAU;
		radius = match (k, members.len()) {
			(0, 1) => 0.0,
			(0, _) => needed,
			_ => (radius + level_spacing).max(needed),
		};
		for (&member, pos) in members.iter().zip(ring(members.len(), radius)) {
			positions[member] = pos;
		}
	}
	positions
}

fn breadthfirst(
	graph: &Graph,
	directed: bool,
	level_spacing: f64,
	sibling_spacing: f64,
) -> Vec<(f64, f64)> {
	let n = graph.nodes.len();
	let index = index_of(graph);
	let mut next: Vec<Vec<usize>> = vec![Vec::new(); n];
	let mut incoming = vec![0usize; n];
	for edge in &graph.edges {
		let (s, t) = (index[edge.source.as_str()], index[edge.target.as_str()]);
		next[s].push(t);
		incoming[t] += 1;
		if !directed {
			next[t].push(s);
		}
	}

	let roots = (0..n)
		.filter(|&i| incoming[i] == 0)
		.chain(0..n);
	let mut depth: Vec<Option<usize>> = vec![None; n];
	let mut queue = VecDeque::new();
	for root in roots {
		if depth[root].is_some() {
			continue;
		}
		depth[root] = Some(0);
		queue.push_back(root);
		while let Some(current) = queue.pop_front() {
			let d = depth[current].unwrap_or_default();
			for &target in &next[current] {
				if depth[target].is_none() {
					depth[target] = Some(d + 1);
					queue.push_back(target);
				}
			}
		}
	}

	let depth: Vec<usize> = depth.into_iter().map(Option::unwrap_or_default).collect();
	let levels = depth.iter().max().map_or(0, |d| d + 1);
	let mut rows: Vec<Vec<usize>> = vec![Vec::new(); levels];
	for (i, &d) in depth.iter().enumerate() {
		rows[d].push(i);
	}

	let mut positions = vec![(0.0, 0.0); n];
	for (d, row) in rows.iter().enumerate() {
		for (k, &member) in row.iter().enumerate() {
			positions[member] = (
				centred(k, row.len(), sibling_spacing),
				centred(d, levels, level_spacing),
			);
		}
	}
	positions
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::LayoutId;
	use crate::model::{DependencyRecord, Entity, HierarchyRecord, build};

	fn chain() -> Graph {
		build(
			&[Entity::new(1, "root"), Entity::new(2, "mid"), Entity::new(3, "leaf")],
			&[Entity::new(4, "loner")],
			&[DependencyRecord::new(2, 3, "uses")],
			&[HierarchyRecord::new(1, 2, "has")],
			&[],
		)
		.unwrap()
		.graph
	}

	fn at(layout: LayoutId) -> Vec<(f64, f64)> {
		place(&chain(), &LayoutConfig::for_id(layout))
	}

	#[test]
	fn every_layout_places_every_node() {
		for id in LayoutId::ALL {
			assert_eq!(at(id).len(), 4, "{id}");
			assert!(place(&Graph::default(), &LayoutConfig::for_id(id)).is_empty());
		}
	}

	#[test]
	fn grid_positions_are_distinct() {
		let positions = at(LayoutId::Grid);
		for (i, a) in positions.iter().enumerate() {
			for b in &positions[i + 1..] {
				assert_ne!(a, b);
			}
		}
	}

	#[test]
	fn single_node_sits_at_the_origin() {
		let graph = build(&[Entity::new(1, "only")], &[], &[], &[], &[])
			.unwrap()
			.graph;
		assert_eq!(place(&graph, &LayoutConfig::for_id(LayoutId::Circle)), [(0.0, 0.0)]);
	}

	#[test]
	fn breadthfirst_puts_roots_above_descendants() {
		let positions = at(LayoutId::Breadthfirst);
		let (root, mid, leaf) = (positions[0].1, positions[1].1, positions[2].1);
		assert!(root < mid);
		assert!(mid < leaf);
	}

	#[test]
	fn concentric_centres_the_busiest_node() {
		let positions = at(LayoutId::Concentric);
		assert_eq!(positions[1], (0.0, 0.0));
		let distance = |(x, y): (f64, f64)| (x * x + y * y).sqrt();
		assert!(distance(positions[3]) > distance(positions[0]));
	}
}
