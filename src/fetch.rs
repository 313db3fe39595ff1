//! GraphQL client for the dependency-graph endpoint.
//!
//! Uses the browser `fetch` API; decoding is plain `serde_json` so it can be
//! exercised off the browser.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::model::SourceData;

/// The dependency-graph query sent to the endpoint.
pub const GET_DEPENDENCIES: &str = r#"query GetDependencies($projectId: Int!, $versionId: String!) {
  projectById(id: $projectId) {
    dependencyGraph(versionId: $versionId) {
      allContainers { id name }
      allUnits { id name }
      dependencyEdges { dependant { id } dependedUpon { id } label }
      hierarchyEdges { parent { id } children { id } label }
      membershipEdges { parent { id } member { id } label }
    }
  }
}"#;

/// Which project version to load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyQuery {
	pub project_id: i64,
	pub version_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Request<'a> {
	operation_name: &'static str,
	query: &'static str,
	variables: &'a DependencyQuery,
}

#[derive(Deserialize)]
struct Response {
	data: Option<ResponseData>,
	errors: Option<Vec<ErrorMessage>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
	project_by_id: Option<Project>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Project {
	dependency_graph: Option<SourceData>,
}

#[derive(Deserialize)]
struct ErrorMessage {
	message: String,
}

/// JSON body for `query`.
pub fn request_body(query: &DependencyQuery) -> Result<String, GraphError> {
	serde_json::to_string(&Request {
		operation_name: "GetDependencies",
		query: GET_DEPENDENCIES,
		variables: query,
	})
	.map_err(|e| GraphError::fetch(format!("encode error: {e}")))
}

/// Extracts the graph payload from a GraphQL response body.
///
/// Reported `errors` win over any partial `data`.
pub fn decode_response(query: &DependencyQuery, body: &str) -> Result<SourceData, GraphError> {
	let response: Response = serde_json::from_str(body)
		.map_err(|e| GraphError::fetch(format!("deserialize error: {e}")))?;

	if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
		let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
		return Err(GraphError::fetch(messages.join("; ")));
	}

	response
		.data
		.and_then(|data| data.project_by_id)
		.and_then(|project| project.dependency_graph)
		.ok_or_else(|| {
			GraphError::fetch(format!(
				"project {} has no dependency graph for version {}",
				query.project_id, query.version_id
			))
		})
}

/// Posts [`GET_DEPENDENCIES`] to a GraphQL endpoint.
#[derive(Clone, Debug)]
pub struct GraphQlClient {
	endpoint: String,
}

impl GraphQlClient {
	pub fn new(endpoint: &str) -> Self {
		Self {
			endpoint: endpoint.to_string(),
		}
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Fetches and decodes one dependency graph. No retries.
	pub async fn fetch(&self, query: &DependencyQuery) -> Result<SourceData, GraphError> {
		use wasm_bindgen::{JsCast, JsValue};
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{RequestInit, RequestMode};

		let body = request_body(query)?;

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_mode(RequestMode::Cors);
		opts.set_body(&JsValue::from_str(&body));

		let request = web_sys::Request::new_with_str_and_init(&self.endpoint, &opts)
			.map_err(|e| GraphError::fetch(format!("request error: {e:?}")))?;
		request
			.headers()
			.set("Content-Type", "application/json")
			.map_err(|e| GraphError::fetch(format!("request error: {e:?}")))?;

		let window = web_sys::window().ok_or_else(|| GraphError::fetch("no window"))?;
		let resp_value = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| GraphError::fetch(format!("fetch error: {e:?}")))?;
		let resp: web_sys::Response = resp_value
			.dyn_into()
			.map_err(|_| GraphError::fetch("response is not a Response"))?;

		if !resp.ok() {
			return Err(GraphError::fetch(format!("HTTP {}", resp.status())));
		}

		let text = JsFuture::from(
			resp.text()
				.map_err(|e| GraphError::fetch(format!("body error: {e:?}")))?,
		)
		.await
		.map_err(|e| GraphError::fetch(format!("body error: {e:?}")))?;
		let text = text
			.as_string()
			.ok_or_else(|| GraphError::fetch("response body is not text"))?;

		decode_response(query, &text)
	}
}
