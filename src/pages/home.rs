use std::rc::Rc;

use chrono::Local;
use leptos::prelude::*;
use log::debug;

use crate::assistant::{Assistant, GeminiClient};
use crate::components::chat::ChatPanel;
use crate::components::sankey::{DiagramHandle, Palette, SankeyChart};
use crate::config::AppConfig;
use crate::data::budget_2024;
use crate::export::{BrowserDownload, ExportOrchestrator};

/// Headline figure shown above the diagram.
struct Kpi {
	label: &'static str,
	value: &'static str,
	note: &'static str,
	tone: &'static str,
}

static KPIS: [Kpi; 3] = [
	Kpi {
		label: "Recettes Fiscales Nettes",
		value: "~318 Md€",
		note: "Principalement TVA & Impôts",
		tone: "kpi kpi-revenue",
	},
	Kpi {
		label: "Déficit Budgétaire",
		value: "~144 Md€",
		note: "Besoin de financement",
		tone: "kpi kpi-deficit",
	},
	Kpi {
		label: "Charge de la Dette",
		value: "~56 Md€",
		note: "En forte augmentation",
		tone: "kpi kpi-debt",
	},
];

/// Budget page: diagram with export, assistant alongside.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();

	let data = Signal::derive(|| budget_2024().clone());
	let diagram = DiagramHandle::new(Palette::budget_2024(), config.layout.clone());

	let assistant = Assistant::new(
		GeminiClient::new(&config.assistant),
		&config.assistant,
		budget_2024(),
	);
	let configured = config.assistant.is_configured();

	let orchestrator = Rc::new(ExportOrchestrator::new(config.export.clone()));
	let exporting = RwSignal::new(false);

	let diagram_export = diagram.clone();
	let on_export = move |_| {
		if exporting.get_untracked() || orchestrator.is_busy() {
			return;
		}
		exporting.set(true);
		let (orchestrator, diagram) = (orchestrator.clone(), diagram_export.clone());
		wasm_bindgen_futures::spawn_local(async move {
			let outcome = orchestrator
				.run(&diagram, &BrowserDownload, Local::now().date_naive())
				.await;
			debug!("export finished: {outcome:?}");
			exporting.set(false);
		});
	};

	view! {
		<div class="page">
			<Show when=move || exporting.get()>
				<div class="export-overlay">
					<div class="spinner"></div>
					<p class="export-overlay-title">"Génération du PDF haute définition..."</p>
					<p class="export-overlay-note">
						"Veuillez patienter, redimensionnement du graphique en cours."
					</p>
				</div>
			</Show>

			<nav class="navbar">
				<div class="brand">
					<div class="flag">
						<span class="flag-blue"></span>
						<span class="flag-white"></span>
						<span class="flag-red"></span>
					</div>
					<div>
						<h1>"RÉPUBLIQUE FRANÇAISE"</h1>
						<p class="brand-subtitle">"Budget de l'État 2024"</p>
					</div>
				</div>
				<div class="nav-actions">
					<a
						href="https://www.budget.gouv.fr/budget-etat/budget-2024"
						target="_blank"
						rel="noreferrer"
					>
						"Documentation Officielle"
					</a>
					<button class="export-button" disabled=move || exporting.get() on:click=on_export>
						{move || if exporting.get() { "Export..." } else { "Exporter PDF" }}
					</button>
				</div>
			</nav>

			<main class="content">
				<section class="visualization">
					<h2>"Architecture Budgétaire"</h2>
					<p class="lead">
						"Visualisez les flux financiers de l'origine des recettes jusqu'au détail précis des dépenses. Les données sont issues du Projet de Loi de Finances (PLF) 2024."
					</p>
					<div class="kpis">
						{KPIS
							.iter()
							.map(|kpi| {
								view! {
									<div class=kpi.tone>
										<p class="kpi-label">{kpi.label}</p>
										<p class="kpi-value">{kpi.value}</p>
										<p class="kpi-note">{kpi.note}</p>
									</div>
								}
							})
							.collect_view()}
					</div>
					<div class="chart-container">
						<SankeyChart data=data diagram=diagram />
					</div>
				</section>

				<aside class="analysis">
					<ChatPanel assistant=assistant configured=configured />
					<div class="did-you-know">
						<h3>"Le saviez-vous ?"</h3>
						<p>
							"Le premier poste de dépenses de l'État reste l'Enseignement scolaire. Cependant, la charge de la dette (les intérêts payés sur la dette passée) est devenue l'un des postes majeurs, dépassant désormais la mission Défense."
						</p>
					</div>
				</aside>
			</main>
		</div>
	}
}
