use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Page introuvable"</h1>
			<a href="/">"Retour au budget"</a>
		</div>
	}
}
