use super::service::{AssistantError, GenerationRequest, TextService};
use crate::config::AssistantConfig;
use crate::data::{BudgetData, budget_summary};

const RULES: &str = "Règles:
1. Réponds de manière précise aux questions sur les montants.
2. Si on te demande \"Pourquoi la dette est élevée ?\", explique le contexte du déficit structurel et de la montée des taux.
3. Sois concis et pédagogique.
4. Formate tes réponses en Markdown.";

/// Fixed instruction sent with every request: persona, raw dataset, summary and answering rules.
pub fn system_context(data: &BudgetData) -> String {
	// plain strings and finite floats always serialize
	let dataset = serde_json::to_string(data).unwrap_or_default();
	format!(
		"Tu es un expert en finances publiques françaises. Tu dois analyser le Budget de l'État 2024.
Voici les données brutes du graphe Sankey (en Milliards d'Euros):
{dataset}

Résumé contextuel: {summary}

{RULES}",
		summary = budget_summary(data),
	)
}

/// A text service bound to one dataset. Each question is sent on its own with the full context.
#[derive(Clone)]
pub struct Assistant<S> {
	service: S,
	model: String,
	temperature: f32,
	context: String,
}

impl<S: TextService> Assistant<S> {
	pub fn new(service: S, config: &AssistantConfig, data: &BudgetData) -> Self {
		Self {
			service,
			model: config.model.clone(),
			temperature: config.temperature,
			context: system_context(data),
		}
	}

	pub fn request(&self, question: &str) -> GenerationRequest {
		GenerationRequest {
			model: self.model.clone(),
			user_text: question.to_string(),
			system_context: self.context.clone(),
			temperature: self.temperature,
		}
	}

	pub async fn ask(&self, question: &str) -> Result<String, AssistantError> {
		self.service.generate(&self.request(question)).await
	}
}
