//! Application settings, provided to components through Leptos context.

use std::fmt;

use crate::components::sankey::LayoutConfig;
use crate::export::PageGeometry;

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
	pub assistant: AssistantConfig,
	pub export: ExportConfig,
	pub layout: LayoutConfig,
}

impl AppConfig {
	/// Settings baked in at build time. The assistant credential is the only external input.
	pub fn from_build_env() -> Self {
		Self {
			assistant: AssistantConfig {
				api_key: option_env!("API_KEY")
					.filter(|key| !key.trim().is_empty())
					.map(str::to_string),
				..AssistantConfig::default()
			},
			..Self::default()
		}
	}
}

#[derive(Clone, PartialEq)]
pub struct AssistantConfig {
	pub api_key: Option<String>,
	pub model: String,
	pub endpoint: String,
	pub temperature: f32,
}

impl AssistantConfig {
	pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";
	pub const DEFAULT_ENDPOINT: &'static str = "https://generativelanguage.googleapis.com/v1beta";
	pub const DEFAULT_TEMPERATURE: f32 = 0.3;

	pub fn is_configured(&self) -> bool {
		self.api_key.is_some()
	}
}

impl Default for AssistantConfig {
	fn default() -> Self {
		Self {
			api_key: None,
			model: Self::DEFAULT_MODEL.to_string(),
			endpoint: Self::DEFAULT_ENDPOINT.to_string(),
			temperature: Self::DEFAULT_TEMPERATURE,
		}
	}
}

impl fmt::Debug for AssistantConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AssistantConfig")
			.field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
			.field("model", &self.model)
			.field("endpoint", &self.endpoint)
			.field("temperature", &self.temperature)
			.finish()
	}
}

/// Print geometry of the exported diagram and the document it lands in.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportConfig {
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
	pub page: PageGeometry,
	pub title: String,
	pub filename: String,
}

impl Default for ExportConfig {
	fn default() -> Self {
		Self {
			width: 1600.0,
			height: 900.0,
			pixel_ratio: 2.0,
			page: PageGeometry::A3_LANDSCAPE,
			title: "Budget de l'État 2024 - Flux Financiers Complets".to_string(),
			filename: "eco-budget-france-2024-complet.pdf".to_string(),
		}
	}
}
