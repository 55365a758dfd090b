//! Text-generation service boundary and its Gemini implementation.

use std::future::Future;

use log::{error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AssistantConfig;

#[derive(Debug, Error)]
pub enum AssistantError {
	#[error("assistant credential is not configured")]
	MissingCredential,
	#[error("text service returned HTTP {0}")]
	Http(u16),
	#[error("transport failure: {0}")]
	Transport(String),
	#[error("malformed response: {0}")]
	Malformed(String),
}

/// One stateless generation call: the system context is re-sent every time.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
	pub model: String,
	pub user_text: String,
	pub system_context: String,
	pub temperature: f32,
}

pub trait TextService {
	/// Generate a reply. `Ok("")` means the service answered with no text.
	fn generate(&self, request: &GenerationRequest) -> impl Future<Output = Result<String, AssistantError>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
	contents: [Content<'a>; 1],
	system_instruction: SystemInstruction<'a>,
	generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
	role: &'static str,
	parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
	parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
	text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
	temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
	content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
	#[serde(default)]
	parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
	text: Option<String>,
}

/// JSON body of a `generateContent` call.
pub fn request_body(request: &GenerationRequest) -> Result<String, AssistantError> {
	let body = GenerateContentBody {
		contents: [Content {
			role: "user",
			parts: [Part {
				text: &request.user_text,
			}],
		}],
		system_instruction: SystemInstruction {
			parts: [Part {
				text: &request.system_context,
			}],
		},
		generation_config: GenerationConfig {
			temperature: request.temperature,
		},
	};
	serde_json::to_string(&body).map_err(|e| AssistantError::Malformed(e.to_string()))
}

/// Concatenated text parts of the first candidate.
pub fn response_text(body: &str) -> Result<String, AssistantError> {
	let response: GenerateContentResponse =
		serde_json::from_str(body).map_err(|e| AssistantError::Malformed(e.to_string()))?;
	Ok(response
		.candidates
		.into_iter()
		.next()
		.and_then(|c| c.content)
		.map(|content| {
			content
				.parts
				.into_iter()
				.filter_map(|p| p.text)
				.collect::<String>()
		})
		.unwrap_or_default())
}

/// Google Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
	api_key: Option<String>,
	endpoint: String,
}

impl GeminiClient {
	pub fn new(config: &AssistantConfig) -> Self {
		Self {
			api_key: config.api_key.clone(),
			endpoint: config.endpoint.trim_end_matches('/').to_string(),
		}
	}

	pub fn is_configured(&self) -> bool {
		self.api_key.is_some()
	}

	fn url(&self, model: &str) -> String {
		format!("{}/models/{model}:generateContent", self.endpoint)
	}

	#[cfg(target_arch = "wasm32")]
	async fn post(&self, url: &str, api_key: &str, body: &str) -> Result<String, AssistantError> {
		use wasm_bindgen::{JsCast, JsValue};
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Request, RequestInit, RequestMode, Response};

		let transport = |e: JsValue| AssistantError::Transport(format!("{e:?}"));

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_mode(RequestMode::Cors);
		opts.set_body(&JsValue::from_str(body));

		let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
		let headers = request.headers();
		headers.set("Content-Type", "application/json").map_err(transport)?;
		headers.set("x-goog-api-key", api_key).map_err(transport)?;

		let window = web_sys::window().ok_or_else(|| AssistantError::Transport("no window".into()))?;
		let resp: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(transport)?
			.dyn_into()
			.map_err(|_| AssistantError::Transport("response is not a Response".into()))?;

		if !resp.ok() {
			return Err(AssistantError::Http(resp.status()));
		}

		let text = JsFuture::from(resp.text().map_err(transport)?)
			.await
			.map_err(transport)?;
		text.as_string()
			.ok_or_else(|| AssistantError::Malformed("response body is not text".into()))
	}

	#[cfg(not(target_arch = "wasm32"))]
	async fn post(&self, _url: &str, _api_key: &str, _body: &str) -> Result<String, AssistantError> {
		Err(AssistantError::Transport(
			"HTTP transport is only available in the browser build".into(),
		))
	}
}

impl TextService for GeminiClient {
	async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
		let api_key = self.api_key.as_deref().ok_or(AssistantError::MissingCredential)?;
		let body = request_body(request)?;

		info!("assistant request to {} ({} chars)", request.model, request.user_text.len());
		let raw = self
			.post(&self.url(&request.model), api_key, &body)
			.await
			.inspect_err(|e| error!("assistant request failed: {e}"))?;
		response_text(&raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request() -> GenerationRequest {
		GenerationRequest {
			model: "gemini-2.5-flash".into(),
			user_text: "Combien coûte la charge de la dette ?".into(),
			system_context: "contexte".into(),
			temperature: 0.3,
		}
	}

	#[test]
	fn body_carries_text_context_and_temperature() {
		let body: serde_json::Value = serde_json::from_str(&request_body(&request()).unwrap()).unwrap();
		assert_eq!(
			body["contents"][0]["parts"][0]["text"],
			"Combien coûte la charge de la dette ?"
		);
		assert_eq!(body["contents"][0]["role"], "user");
		assert_eq!(body["systemInstruction"]["parts"][0]["text"], "contexte");
		let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
		assert!((temperature - 0.3).abs() < 1e-6);
	}

	#[test]
	fn response_parts_are_joined() {
		let raw = r#"{"candidates":[{"content":{"parts":[{"text":"**56 "},{"text":"Md€**"}],"role":"model"}}]}"#;
		assert_eq!(response_text(raw).unwrap(), "**56 Md€**");
	}

	#[test]
	fn response_without_candidates_is_empty() {
		assert_eq!(response_text(r#"{"candidates":[]}"#).unwrap(), "");
		assert_eq!(response_text("{}").unwrap(), "");
	}

	#[test]
	fn garbage_response_is_malformed() {
		assert!(matches!(response_text("<html>"), Err(AssistantError::Malformed(_))));
	}

	#[test]
	fn missing_key_fails_before_any_request() {
		let client = GeminiClient::new(&AssistantConfig::default());
		assert!(!client.is_configured());
		let result = pollster::block_on(client.generate(&request()));
		assert!(matches!(result, Err(AssistantError::MissingCredential)));
	}

	#[test]
	fn url_targets_the_model() {
		let client = GeminiClient::new(&AssistantConfig {
			endpoint: "https://example.test/v1beta/".into(),
			..AssistantConfig::default()
		});
		assert_eq!(
			client.url("gemini-2.5-flash"),
			"https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
		);
	}
}
