use dependency_graph_viewer::{App, ConfigNotices, ViewerConfig, init_logging};
use leptos::prelude::*;

fn main() {
	let (config, problems) = ViewerConfig::from_location();
	init_logging(config.log_level);
	for problem in &problems {
		log::warn!("{problem}");
	}
	let notices = ConfigNotices(problems.iter().map(ToString::to_string).collect());

	mount_to_body(move || view! { <App config=config.clone() notices=notices.clone() /> })
}
