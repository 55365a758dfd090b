use leptos::ev::SubmitEvent;
use leptos::html::Div;
use leptos::prelude::*;
use log::debug;

use crate::assistant::{Assistant, ChatMessage, ChatSession, Role, TextService, render_markup};

fn message_view(message: ChatMessage) -> impl IntoView {
	let (row, bubble, avatar) = match message.role {
		Role::User => ("chat-row chat-row-user", "chat-bubble chat-bubble-user", "👤"),
		Role::Model => ("chat-row", "chat-bubble chat-bubble-model", "🤖"),
	};
	let body = match message.role {
		Role::User => view! { <div>{message.text}</div> }.into_any(),
		Role::Model => view! { <div inner_html=render_markup(&message.text)></div> }.into_any(),
	};
	view! {
		<div class=row data-id=message.id>
			<div class="chat-avatar">{avatar}</div>
			<div class=bubble>{body}</div>
		</div>
	}
}

/// Transcript, input box and the single in-flight request to the assistant.
#[component]
pub fn ChatPanel<S>(assistant: Assistant<S>, configured: bool) -> impl IntoView
where
	S: TextService + Clone + 'static,
{
	let session = RwSignal::new(ChatSession::new());
	let input = RwSignal::new(String::new());
	let end_ref = NodeRef::<Div>::new();

	Effect::new(move |_| {
		session.track();
		if let Some(end) = end_ref.get() {
			end.scroll_into_view();
		}
	});

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let mut turn = None;
		session.update(|s| turn = s.begin_turn(&input.get_untracked()).ok());
		let Some(question) = turn else {
			return;
		};
		input.set(String::new());
		debug!("assistant turn started");

		let assistant = assistant.clone();
		wasm_bindgen_futures::spawn_local(async move {
			let reply = assistant.ask(&question).await;
			session.update(|s| s.complete_turn(reply));
		});
	};

	let awaiting = move || session.with(ChatSession::is_awaiting);
	let badge = if configured { "Gemini 2.5" } else { "Clé API absente" };

	view! {
		<section class="chat-panel">
			<header class="chat-header">
				<h2>"✨ Assistant Éco-Budget"</h2>
				<span class="chat-badge" class:chat-badge-off=!configured>{badge}</span>
			</header>

			<div class="chat-messages">
				<For
					each=move || session.with(|s| s.messages().to_vec())
					key=|message| message.id.clone()
					children=message_view
				/>
				<Show when=awaiting>
					<div class="chat-row">
						<div class="chat-avatar">"🤖"</div>
						<div class="chat-bubble chat-bubble-model chat-loading">"…"</div>
					</div>
				</Show>
				<div node_ref=end_ref></div>
			</div>

			<form class="chat-input" on:submit=on_submit>
				<input
					type="text"
					placeholder="Posez une question sur le budget..."
					prop:value=move || input.get()
					on:input=move |ev| input.set(event_target_value(&ev))
					disabled=awaiting
				/>
				<button
					type="submit"
					disabled=move || awaiting() || input.with(|text| text.trim().is_empty())
				>
					"Envoyer"
				</button>
			</form>
			<p class="chat-disclaimer">
				"L'IA peut faire des erreurs. Vérifiez les informations importantes."
			</p>
		</section>
	}
}
