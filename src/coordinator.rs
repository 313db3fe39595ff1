//! Orchestrates data arrival, filtering, and layout changes into renders.
//!
//! The coordinator is a small state machine:
//!
//! ```text
//! Idle --submit--> Loading --data--> Ready --filter/layout--> Ready
//!                     |
//!                     +--fetch failed--> Error
//! ```
//!
//! Submitting a query from any phase returns to `Loading`. Only the result
//! for the most recent ticket is applied.

use log::{debug, error, info};

use crate::error::GraphError;
use crate::filter::{FilterQuery, filter};
use crate::layout::{LayoutConfig, resolve};
use crate::model::{BuildReport, Graph, SourceData};
use crate::style::StyleRules;

/// The drawing collaborator.
///
/// `render` receives the elements, style, and layout and runs the layout.
/// The returned session owns whatever the render allocated; dropping it
/// tears the surface down.
pub trait Renderer {
	/// Handle to one rendered surface.
	type Session;

	/// Draws `graph` with `style`, positioned by `layout`.
	fn render(&mut self, graph: &Graph, style: &StyleRules, layout: &LayoutConfig) -> Self::Session;
}

/// Where the coordinator is in the current data cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
	#[default]
	Idle,
	Loading,
	Ready,
	Error,
}

/// Identifies one submitted query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// Outcome of handing a fetch result to [`RenderCoordinator::receive`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
	Applied,
	/// A newer query was submitted; the result was discarded.
	Stale,
}

/// Snapshot for the page's loading and error slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
	pub phase: Phase,
	pub error: Option<String>,
	pub nodes: usize,
	pub edges: usize,
	pub dropped_edges: usize,
}

impl Status {
	pub fn is_loading(&self) -> bool {
		self.phase == Phase::Loading
	}
}

/// Owns the canonical graph, the current filter and layout, and the live
/// renderer session.
pub struct RenderCoordinator<R: Renderer> {
	renderer: R,
	session: Option<R::Session>,
	phase: Phase,
	generation: u64,
	canonical: Option<Graph>,
	displayed: Option<Graph>,
	filter: FilterQuery,
	layout: LayoutConfig,
	style: StyleRules,
	error: Option<GraphError>,
	report: BuildReport,
}

impl<R: Renderer> RenderCoordinator<R> {
	pub fn new(renderer: R) -> Self {
		Self {
			renderer,
			session: None,
			phase: Phase::Idle,
			generation: 0,
			canonical: None,
			displayed: None,
			filter: FilterQuery::default(),
			layout: LayoutConfig::default(),
			style: StyleRules::default(),
			error: None,
			report: BuildReport::default(),
		}
	}

	pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
		self.layout = layout;
		self
	}

	pub fn with_style(mut self, style: StyleRules) -> Self {
		self.style = style;
		self
	}

	/// Starts a new data cycle. Any in-flight query is superseded.
	pub fn submit_query(&mut self) -> QueryTicket {
		self.generation += 1;
		self.phase = Phase::Loading;
		debug!("query #{} submitted", self.generation);
		QueryTicket(self.generation)
	}

	/// Applies a fetch result if `ticket` is still the latest submission.
	///
	/// A fetch failure leaves the last render in place. A malformed payload
	/// keeps the previous canonical graph when there is one.
	pub fn receive(&mut self, ticket: QueryTicket, result: Result<SourceData, GraphError>) -> Delivery {
		if ticket.0 != self.generation || self.phase != Phase::Loading {
			info!(
				"ignoring stale result for query #{} (latest #{})",
				ticket.0, self.generation
			);
			return Delivery::Stale;
		}

		match result.and_then(|source| source.build()) {
			Ok(build) => {
				debug!("query #{} ready", ticket.0);
				self.canonical = Some(build.graph);
				self.report = build.report;
				self.error = None;
				self.phase = Phase::Ready;
				self.refilter();
			}
			Err(err @ GraphError::MalformedInput { .. }) if self.canonical.is_some() => {
				error!("graph build failed, keeping previous graph: {err}");
				self.error = Some(err);
				self.phase = Phase::Ready;
			}
			Err(err) => {
				error!("query #{} failed: {err}", ticket.0);
				self.error = Some(err);
				self.phase = Phase::Error;
			}
		}
		Delivery::Applied
	}

	/// Replaces the filter. Re-derives from the canonical graph when ready,
	/// otherwise the filter waits for the next data arrival.
	pub fn set_filter(&mut self, query: FilterQuery) {
		self.filter = query;
		if self.phase == Phase::Ready {
			self.refilter();
		}
	}

	/// Replaces the layout and re-renders the displayed graph when ready.
	pub fn set_layout(&mut self, layout: LayoutConfig) {
		self.layout = layout;
		if self.phase == Phase::Ready {
			self.present();
		}
	}

	/// Resolves `layout_id` and applies it.
	pub fn select_layout(&mut self, layout_id: &str) -> Result<(), GraphError> {
		let layout = resolve(layout_id)?;
		self.set_layout(layout);
		Ok(())
	}

	fn refilter(&mut self) {
		if let Some(canonical) = &self.canonical {
			self.displayed = Some(filter(canonical, &self.filter));
			self.present();
		}
	}

	fn present(&mut self) {
		let Some(graph) = &self.displayed else {
			return;
		};
		drop(self.session.take());
		debug!(
			"rendering {} nodes, {} edges with {} layout",
			graph.nodes.len(),
			graph.edges.len(),
			self.layout.id
		);
		self.session = Some(self.renderer.render(graph, &self.style, &self.layout));
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn canonical(&self) -> Option<&Graph> {
		self.canonical.as_ref()
	}

	pub fn displayed(&self) -> Option<&Graph> {
		self.displayed.as_ref()
	}

	pub fn filter(&self) -> &FilterQuery {
		&self.filter
	}

	pub fn layout(&self) -> &LayoutConfig {
		&self.layout
	}

	pub fn error(&self) -> Option<&GraphError> {
		self.error.as_ref()
	}

	pub fn report(&self) -> BuildReport {
		self.report
	}

	pub fn renderer(&self) -> &R {
		&self.renderer
	}

	pub fn status(&self) -> Status {
		let (nodes, edges) = self
			.displayed
			.as_ref()
			.map_or((0, 0), |g| (g.nodes.len(), g.edges.len()));
		Status {
			phase: self.phase,
			error: self.error.as_ref().map(ToString::to_string),
			nodes,
			edges,
			dropped_edges: self.report.dropped_edges,
		}
	}
}
