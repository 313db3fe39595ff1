//! Viewer configuration: defaults, overridable from the page query string.

use log::LevelFilter;

use crate::error::GraphError;
use crate::fetch::DependencyQuery;
use crate::layout::LayoutId;

pub const DEFAULT_ENDPOINT: &str = "/graphql";
pub const DEFAULT_PROJECT_ID: i64 = 287;
pub const DEFAULT_VERSION_ID: &str = "2e718ebd3f968a675dfbc36bb4a126e13186eddf";

/// Everything the page needs to start up.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
	pub endpoint: String,
	pub project_id: i64,
	pub version_id: String,
	pub layout: LayoutId,
	pub log_level: LevelFilter,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.into(),
			project_id: DEFAULT_PROJECT_ID,
			version_id: DEFAULT_VERSION_ID.into(),
			layout: LayoutId::default(),
			log_level: LevelFilter::Debug,
		}
	}
}

impl ViewerConfig {
	/// Applies `?project=&version=&layout=&endpoint=&log=` overrides.
	///
	/// Unknown keys are ignored. Bad values leave the default in place and
	/// are returned alongside the config so the page can show them.
	pub fn from_query_string(query: &str) -> (Self, Vec<GraphError>) {
		let mut config = Self::default();
		let mut problems = Vec::new();
		let query = query.strip_prefix('?').unwrap_or(query);

		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			let invalid = || GraphError::Config {
				key: key.to_string(),
				value: value.to_string(),
			};
			match key.as_ref() {
				"endpoint" if !value.is_empty() => config.endpoint = value.to_string(),
				"project" => match value.parse() {
					Ok(id) => config.project_id = id,
					Err(_) => problems.push(invalid()),
				},
				"version" if !value.is_empty() => config.version_id = value.to_string(),
				"layout" => match value.parse() {
					Ok(layout) => config.layout = layout,
					Err(err) => problems.push(err),
				},
				"log" => match value.parse() {
					Ok(level) => config.log_level = level,
					Err(_) => problems.push(invalid()),
				},
				"endpoint" | "version" => problems.push(invalid()),
				_ => {}
			}
		}

		(config, problems)
	}

	/// Reads overrides from the current page URL.
	pub fn from_location() -> (Self, Vec<GraphError>) {
		let search = web_sys::window()
			.and_then(|w| w.location().search().ok())
			.unwrap_or_default();
		Self::from_query_string(&search)
	}

	pub fn query(&self) -> DependencyQuery {
		DependencyQuery {
			project_id: self.project_id,
			version_id: self.version_id.clone(),
		}
	}
}
