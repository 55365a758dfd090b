//! Conversational assistant over the budget dataset.

mod context;
mod markup;
mod service;
mod transcript;

pub use context::{Assistant, system_context};
pub use markup::render_markup;
pub use service::{AssistantError, GeminiClient, GenerationRequest, TextService, request_body, response_text};
pub use transcript::{
	ChatMessage, ChatPhase, ChatSession, EMPTY_REPLY, FAILURE_REPLY, MISSING_KEY_REPLY, Role,
	TurnRejected, WELCOME_ID,
};
