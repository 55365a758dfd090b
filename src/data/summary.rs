use super::types::{BudgetData, Category};

/// Total flowing into the central (intermediate) node, or 0 when there is none.
pub fn central_inflow(data: &BudgetData) -> f64 {
	let Some(central) = data.nodes.iter().find(|n| n.category == Category::Intermediate) else {
		return 0.0;
	};
	data.links
		.iter()
		.filter(|l| l.target == central.name)
		.map(|l| l.value)
		.sum()
}

/// Narrative summary handed to the assistant alongside the raw dataset.
pub fn budget_summary(data: &BudgetData) -> String {
	let total = central_inflow(data);
	format!(
		"Le Budget de l'État Français pour 2024 représente environ {total} milliards d'euros.

Le flux démarre par une segmentation socio-économique (Ménages modestes vs Aisés, PME vs Grandes Entreprises).
Ces segments alimentent les catégories d'acteurs (Ménages, Entreprises), qui paient les **Impôts** (TVA, IR, IS).
Ces ressources financent le Budget Général, qui est réparti par **Missions**, puis **Nature**, et enfin **Détaillé**.

Points clés :
- La contribution des Grandes Entreprises et des Hauts Revenus est déterminante pour l'IR et l'IS.
- La TVA pèse sur tous les types de ménages.
- Le Déficit (marchés financiers) reste une source majeure (~144 Md€)."
	)
}
