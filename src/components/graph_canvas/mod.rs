//! Canvas renderer for dependency graphs.
//!
//! [`CanvasRenderer`] is the [`Renderer`] the coordinator drives; each render
//! installs a fresh [`CanvasState`] into a shared [`CanvasHost`] that the
//! [`GraphCanvas`] component draws every animation frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

mod component;
mod placement;
mod render;
mod state;

pub use component::GraphCanvas;
pub use state::CanvasState;

use crate::coordinator::Renderer;
use crate::layout::LayoutConfig;
use crate::model::Graph;
use crate::style::StyleRules;

const DEFAULT_VIEWPORT: (f64, f64) = (800.0, 600.0);

/// Shared slot between the renderer and the canvas component.
#[derive(Clone)]
pub struct CanvasHost {
	slot: Rc<RefCell<Option<CanvasState>>>,
	viewport: Rc<Cell<(f64, f64)>>,
}

impl Default for CanvasHost {
	fn default() -> Self {
		Self {
			slot: Rc::default(),
			viewport: Rc::new(Cell::new(DEFAULT_VIEWPORT)),
		}
	}
}

impl CanvasHost {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_occupied(&self) -> bool {
		self.slot.borrow().is_some()
	}

	fn set_viewport(&self, width: f64, height: f64) {
		self.viewport.set((width, height));
		if let Some(state) = self.slot.borrow_mut().as_mut() {
			state.resize(width, height);
		}
	}
}

/// Renders into a [`CanvasHost`].
pub struct CanvasRenderer {
	host: CanvasHost,
}

impl CanvasRenderer {
	pub fn new(host: CanvasHost) -> Self {
		Self { host }
	}
}

/// Live surface in the host. Dropping it empties the slot.
pub struct CanvasSession {
	slot: Rc<RefCell<Option<CanvasState>>>,
}

impl Drop for CanvasSession {
	fn drop(&mut self) {
		self.slot.borrow_mut().take();
	}
}

impl Renderer for CanvasRenderer {
	type Session = CanvasSession;

	fn render(&mut self, graph: &Graph, style: &StyleRules, layout: &LayoutConfig) -> CanvasSession {
		let (width, height) = self.host.viewport.get();
		let state = CanvasState::new(graph, style, layout, width, height);
		*self.host.slot.borrow_mut() = Some(state);
		CanvasSession {
			slot: self.host.slot.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::coordinator::RenderCoordinator;
	use crate::model::{DependencyRecord, Entity, SourceData};

	#[test]
	fn coordinator_swaps_canvas_state() {
		let host = CanvasHost::new();
		let mut coordinator = RenderCoordinator::new(CanvasRenderer::new(host.clone()));
		assert!(!host.is_occupied());

		let ticket = coordinator.submit_query();
		coordinator.receive(
			ticket,
			Ok(SourceData {
				containers: vec![Entity::new(1, "a"), Entity::new(2, "b")],
				dependency_edges: vec![DependencyRecord::new(1, 2, "x")],
				..SourceData::default()
			}),
		);
		assert!(host.is_occupied());
		assert_eq!(host.slot.borrow().as_ref().map(CanvasState::edge_count), Some(1));

		coordinator.select_layout("cose").unwrap();
		let running = host.slot.borrow().as_ref().map(|s| s.animation_running);
		assert_eq!(running, Some(true));
	}

	#[test]
	fn dropping_the_session_clears_the_slot() {
		let host = CanvasHost::new();
		let mut renderer = CanvasRenderer::new(host.clone());
		let session = renderer.render(
			&Graph::default(),
			&StyleRules::default(),
			&LayoutConfig::default(),
		);
		assert!(host.is_occupied());
		drop(session);
		assert!(!host.is_occupied());
	}

	#[test]
	fn viewport_reaches_the_next_render() {
		let host = CanvasHost::new();
		host.set_viewport(1024.0, 700.0);
		let mut renderer = CanvasRenderer::new(host.clone());
		let _session = renderer.render(
			&Graph::default(),
			&StyleRules::default(),
			&LayoutConfig::default(),
		);
		let width = host.slot.borrow().as_ref().map(|s| s.width);
		assert_eq!(width, Some(1024.0));
	}
}
