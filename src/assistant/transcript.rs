//! Append-only chat transcript with a single in-flight request.

use chrono::{DateTime, Utc};

use super::service::AssistantError;

pub const WELCOME_ID: &str = "welcome";

const WELCOME: &str = "Bonjour ! Je suis votre assistant budgétaire. Posez-moi des questions sur les recettes ou les dépenses de l'État pour 2024. Par exemple : \"Combien coûte la charge de la dette ?\" ou \"D'où vient l'argent ?\"";
pub const EMPTY_REPLY: &str = "Désolé, je n'ai pas pu générer de réponse.";
pub const MISSING_KEY_REPLY: &str =
	"Désolé, je ne peux pas accéder aux données budgétaires pour le moment. Vérifiez votre clé API.";
pub const FAILURE_REPLY: &str = "Une erreur est survenue lors de la communication avec l'IA.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
	User,
	Model,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
	pub id: String,
	pub role: Role,
	pub text: String,
	pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ChatPhase {
	#[default]
	Idle,
	AwaitingResponse,
}

/// Why a submission was not turned into a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRejected {
	Empty,
	Busy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatSession {
	messages: Vec<ChatMessage>,
	phase: ChatPhase,
	next_id: u64,
}

impl Default for ChatSession {
	fn default() -> Self {
		Self::new()
	}
}

impl ChatSession {
	pub fn new() -> Self {
		Self {
			messages: vec![ChatMessage {
				id: WELCOME_ID.to_string(),
				role: Role::Model,
				text: WELCOME.to_string(),
				timestamp: Utc::now(),
			}],
			phase: ChatPhase::Idle,
			next_id: 1,
		}
	}

	pub fn messages(&self) -> &[ChatMessage] {
		&self.messages
	}

	pub fn phase(&self) -> ChatPhase {
		self.phase
	}

	pub fn is_awaiting(&self) -> bool {
		self.phase == ChatPhase::AwaitingResponse
	}

	fn push(&mut self, role: Role, text: String) {
		let id = format!("msg-{}", self.next_id);
		self.next_id += 1;
		self.messages.push(ChatMessage {
			id,
			role,
			text,
			timestamp: Utc::now(),
		});
	}

	/// Record the user's message and enter the awaiting phase.
	///
	/// Returns the trimmed text to send. Blank input and input while a request is
	/// outstanding leave the session untouched.
	pub fn begin_turn(&mut self, input: &str) -> Result<String, TurnRejected> {
		let text = input.trim();
		if text.is_empty() {
			return Err(TurnRejected::Empty);
		}
		if self.is_awaiting() {
			return Err(TurnRejected::Busy);
		}
		self.push(Role::User, text.to_string());
		self.phase = ChatPhase::AwaitingResponse;
		Ok(text.to_string())
	}

	/// Append the reply, or an apology standing in for it, and return to idle.
	pub fn complete_turn(&mut self, reply: Result<String, AssistantError>) {
		let text = match reply {
			Ok(text) if text.trim().is_empty() => EMPTY_REPLY.to_string(),
			Ok(text) => text,
			Err(AssistantError::MissingCredential) => MISSING_KEY_REPLY.to_string(),
			Err(_) => FAILURE_REPLY.to_string(),
		};
		self.push(Role::Model, text);
		self.phase = ChatPhase::Idle;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_session_holds_the_welcome_message() {
		let session = ChatSession::new();
		assert_eq!(session.messages().len(), 1);
		assert_eq!(session.messages()[0].id, WELCOME_ID);
		assert_eq!(session.messages()[0].role, Role::Model);
		assert_eq!(session.phase(), ChatPhase::Idle);
	}

	#[test]
	fn turns_append_in_submission_order() {
		let mut session = ChatSession::new();
		let replies = [
			Ok("première".to_string()),
			Err(AssistantError::Http(503)),
			Ok(String::new()),
			Err(AssistantError::MissingCredential),
		];
		let count = replies.len();
		for (i, reply) in replies.into_iter().enumerate() {
			let sent = session.begin_turn(&format!("  question {i} ")).unwrap();
			assert_eq!(sent, format!("question {i}"));
			session.complete_turn(reply);
		}

		let messages = session.messages();
		assert_eq!(messages.len(), 1 + 2 * count);
		for i in 0..count {
			let user = &messages[1 + 2 * i];
			assert_eq!(user.role, Role::User);
			assert_eq!(user.text, format!("question {i}"));
			assert_eq!(messages[2 + 2 * i].role, Role::Model);
		}
		let replies: Vec<&str> = messages[1..].iter().skip(1).step_by(2).map(|m| m.text.as_str()).collect();
		assert_eq!(replies, ["première", FAILURE_REPLY, EMPTY_REPLY, MISSING_KEY_REPLY]);
	}

	#[test]
	fn ids_are_unique() {
		let mut session = ChatSession::new();
		for _ in 0..3 {
			session.begin_turn("q").unwrap();
			session.complete_turn(Ok("r".into()));
		}
		let mut ids: Vec<&str> = session.messages().iter().map(|m| m.id.as_str()).collect();
		ids.sort_unstable();
		ids.dedup();
		assert_eq!(ids.len(), 7);
	}

	#[test]
	fn blank_input_is_ignored() {
		let mut session = ChatSession::new();
		assert_eq!(session.begin_turn("   \n"), Err(TurnRejected::Empty));
		assert_eq!(session.messages().len(), 1);
		assert!(!session.is_awaiting());
	}

	#[test]
	fn second_send_while_awaiting_is_rejected() {
		let mut session = ChatSession::new();
		session.begin_turn("première question").unwrap();
		assert!(session.is_awaiting());
		assert_eq!(session.begin_turn("deuxième"), Err(TurnRejected::Busy));
		assert_eq!(session.messages().len(), 2);

		session.complete_turn(Ok("réponse".into()));
		assert!(!session.is_awaiting());
		assert!(session.begin_turn("deuxième").is_ok());
	}
}
