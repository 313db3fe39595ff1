//! Dependency graph viewer: builds a canonical graph from container, unit,
//! and relationship records, filters it by label, and renders it on a canvas
//! with a selectable layout.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{LevelFilter, info};

// Modules
mod components;
mod pages;

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod layout;
pub mod model;
pub mod style;

pub use components::graph_canvas::{CanvasHost, CanvasRenderer, CanvasSession};
pub use config::ViewerConfig;
pub use coordinator::{Delivery, Phase, QueryTicket, RenderCoordinator, Renderer, Status};
pub use error::GraphError;
pub use filter::{FilterQuery, filter};
pub use layout::{LayoutConfig, LayoutId, resolve};
pub use model::{Build, BuildReport, Graph, SourceData, build};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Configuration problems found at startup, shown on the page.
#[derive(Clone, Debug, Default)]
pub struct ConfigNotices(pub Vec<String>);

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(level: LevelFilter) {
	if let Some(level) = level.to_level() {
		let _ = console_log::init_with_level(level);
	}
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the graph page and handles 404's
#[component]
pub fn App(
	#[prop(optional)] config: ViewerConfig,
	#[prop(optional)] notices: ConfigNotices,
) -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(config);
	provide_context(notices);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Dependency Graph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
