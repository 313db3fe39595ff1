use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{Event, MouseEvent};

use crate::components::graph_canvas::{CanvasHost, CanvasRenderer, GraphCanvas};
use crate::config::ViewerConfig;
use crate::coordinator::{RenderCoordinator, Status};
use crate::fetch::{DependencyQuery, GraphQlClient};
use crate::filter::FilterQuery;
use crate::layout::{LayoutConfig, LayoutId};
use crate::ConfigNotices;

type SharedCoordinator = Rc<RefCell<RenderCoordinator<CanvasRenderer>>>;

/// Submits a query and applies its result when it arrives. A later call
/// supersedes any earlier one still in flight.
fn load(
	coordinator: SharedCoordinator,
	status: RwSignal<Status>,
	client: GraphQlClient,
	query: DependencyQuery,
) {
	let ticket = coordinator.borrow_mut().submit_query();
	status.set(coordinator.borrow().status());

	spawn_local(async move {
		let result = client.fetch(&query).await;
		let mut coordinator = coordinator.borrow_mut();
		coordinator.receive(ticket, result);
		status.set(coordinator.status());
	});
}

fn input_value(input: NodeRef<leptos::html::Input>) -> String {
	input.get().map(|el| el.value()).unwrap_or_default()
}

/// Dependency graph page: label filters, layout picker, and the canvas.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<ViewerConfig>().unwrap_or_default();
	let notices = use_context::<ConfigNotices>().unwrap_or_default();

	let host = CanvasHost::new();
	let coordinator: SharedCoordinator = Rc::new(RefCell::new(
		RenderCoordinator::new(CanvasRenderer::new(host.clone()))
			.with_layout(LayoutConfig::for_id(config.layout)),
	));
	let status = RwSignal::new(Status::default());
	let layout = RwSignal::new(config.layout);
	let node_input = NodeRef::<leptos::html::Input>::new();
	let edge_input = NodeRef::<leptos::html::Input>::new();

	let client = GraphQlClient::new(&config.endpoint);
	let query = config.query();
	log::info!(
		"loading project {} version {} from {}",
		query.project_id,
		query.version_id,
		client.endpoint()
	);
	load(coordinator.clone(), status, client.clone(), query.clone());

	let coordinator_reload = coordinator.clone();
	let on_reload = move |_: MouseEvent| {
		load(
			coordinator_reload.clone(),
			status,
			client.clone(),
			query.clone(),
		);
	};

	let coordinator_filter = coordinator.clone();
	let on_filter = move |_: MouseEvent| {
		let query = FilterQuery::new(input_value(node_input), input_value(edge_input));
		let mut coordinator = coordinator_filter.borrow_mut();
		coordinator.set_filter(query);
		status.set(coordinator.status());
	};

	let coordinator_layout = coordinator;
	let on_layout = move |ev: Event| {
		let selected = event_target_value(&ev);
		let mut coordinator = coordinator_layout.borrow_mut();
		match coordinator.select_layout(&selected) {
			Ok(()) => layout.set(coordinator.layout().id),
			// the select only offers supported layouts
			Err(err) => log::error!("{err}"),
		}
		status.set(coordinator.status());
	};

	let notice = (!notices.0.is_empty()).then(|| notices.0.join("; "));

	view! {
		<h1>"Dependency Graph"</h1>
		<div class="controls">
			<label>"Node label"</label>
			<input type="text" node_ref=node_input />
			<br />
			<br />
			<label>"Edge label"</label>
			<input type="text" node_ref=edge_input />
			<br />
			<br />
			<button on:click=on_filter>"Filter"</button>
			<button on:click=on_reload>"Reload"</button>
			<br />
			<br />
			<label>"Layout"</label>
			<select on:change=on_layout>
				{LayoutId::ALL
					.into_iter()
					.map(|id| {
						view! {
							<option value=id.as_str() selected=move || layout.get() == id>
								{id.display_name()}
							</option>
						}
					})
					.collect_view()}
			</select>
			{notice.map(|text| view! { <p class="error">"Configuration: " {text}</p> })}
			<Show when=move || status.with(Status::is_loading)>
				<p>"Loading..."</p>
			</Show>
			{move || {
				status
					.with(|s| s.error.clone())
					.map(|message| view! { <p class="error">"Error: " {message}</p> })
			}}
			<p class="summary">
				{move || {
					status
						.with(|s| {
							format!(
								"{} nodes, {} edges ({} dangling dropped)",
								s.nodes,
								s.edges,
								s.dropped_edges,
							)
						})
				}}
			</p>
			<GraphCanvas host=host />
		</div>
	}
}
