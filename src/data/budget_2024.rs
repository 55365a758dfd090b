//! Simplified 2024 State budget (Projet de Loi de Finances), in billions of euros.

use std::sync::LazyLock;

use super::types::{BudgetData, BudgetLink, BudgetNode, Category};

use Category::*;

const NODES: &[(&str, Category)] = &[
	// segmentation
	("Ménages - Revenus Modestes", ActorSegmentation),
	("Ménages - Classes Moyennes", ActorSegmentation),
	("Ménages - Hauts Revenus", ActorSegmentation),
	("TPE & PME", ActorSegmentation),
	("Grandes Entreprises & ETI", ActorSegmentation),
	("Investisseurs Institutionnels", ActorSegmentation),
	("Bailleurs & Actionnaires", ActorSegmentation),
	// origins
	("Ménages & Particuliers", ResourceOrigin),
	("Entreprises", ResourceOrigin),
	("Marchés Financiers", ResourceOrigin),
	("Divers & Europe", ResourceOrigin),
	// tax types
	("TVA", Resource),
	("Impôt sur le Revenu", Resource),
	("Impôt sur les Sociétés", Resource),
	("TICPE (Carburants)", Resource),
	("Autres Recettes Fiscales", Resource),
	("Recettes Non Fiscales", Resource),
	("Déficit / Emprunt", Resource),
	// central
	("Budget Général de l'État", Intermediate),
	// missions
	("Enseignement Scolaire", Expense),
	("Défense", Expense),
	("Charge de la Dette", Expense),
	("Recherche & Ens. Sup.", Expense),
	("Solidarité & Insertion", Expense),
	("Sécurité", Expense),
	("Justice", Expense),
	("Écologie & Transport", Expense),
	("Collectivités Terr.", Expense),
	("Travail & Emploi", Expense),
	("Autres Missions", Expense),
	// economic nature
	("Dépenses de Personnel", ExpenseNature),
	("Interventions & Transferts", ExpenseNature),
	("Fonctionnement & Invest.", ExpenseNature),
	("Intérêts Financiers", ExpenseNature),
	// detail
	("Salaires & Traitements", ExpenseDetail),
	("Aides aux Ménages", ExpenseDetail),
	("Aides aux Entreprises", ExpenseDetail),
	("Dotations Collectivités", ExpenseDetail),
	("Contribution UE", ExpenseDetail),
	("Armement & Équipement", ExpenseDetail),
	("Infra. & Immobilier", ExpenseDetail),
	("Fonctionnement Services", ExpenseDetail),
	("Intérêts de la Dette", ExpenseDetail),
];

const LINKS: &[(&str, &str, f64)] = &[
	// segmentation -> origins
	("Ménages - Revenus Modestes", "Ménages & Particuliers", 45.0),
	("Ménages - Classes Moyennes", "Ménages & Particuliers", 58.0),
	("Ménages - Hauts Revenus", "Ménages & Particuliers", 70.0),
	("TPE & PME", "Entreprises", 55.0),
	("Grandes Entreprises & ETI", "Entreprises", 90.0),
	("Investisseurs Institutionnels", "Marchés Financiers", 144.0),
	("Bailleurs & Actionnaires", "Divers & Europe", 18.0),
	// origins -> tax types
	("Ménages & Particuliers", "Impôt sur le Revenu", 88.0),
	("Ménages & Particuliers", "TVA", 65.0),
	("Ménages & Particuliers", "TICPE (Carburants)", 10.0),
	("Ménages & Particuliers", "Autres Recettes Fiscales", 10.0),
	("Entreprises", "Impôt sur les Sociétés", 72.0),
	("Entreprises", "TVA", 35.0),
	("Entreprises", "TICPE (Carburants)", 6.0),
	("Entreprises", "Autres Recettes Fiscales", 28.0),
	("Entreprises", "Impôt sur le Revenu", 4.0),
	("Marchés Financiers", "Déficit / Emprunt", 144.0),
	("Divers & Europe", "Recettes Non Fiscales", 18.0),
	// tax types -> central budget
	("TVA", "Budget Général de l'État", 100.0),
	("Impôt sur le Revenu", "Budget Général de l'État", 92.0),
	("Impôt sur les Sociétés", "Budget Général de l'État", 72.0),
	("TICPE (Carburants)", "Budget Général de l'État", 16.0),
	("Autres Recettes Fiscales", "Budget Général de l'État", 38.0),
	("Recettes Non Fiscales", "Budget Général de l'État", 18.0),
	("Déficit / Emprunt", "Budget Général de l'État", 144.0),
	// central budget -> missions
	("Budget Général de l'État", "Enseignement Scolaire", 64.0),
	("Budget Général de l'État", "Charge de la Dette", 56.0),
	("Budget Général de l'État", "Défense", 47.0),
	("Budget Général de l'État", "Recherche & Ens. Sup.", 31.0),
	("Budget Général de l'État", "Solidarité & Insertion", 30.0),
	("Budget Général de l'État", "Écologie & Transport", 25.0),
	("Budget Général de l'État", "Sécurité", 17.0),
	("Budget Général de l'État", "Travail & Emploi", 18.0),
	("Budget Général de l'État", "Justice", 10.0),
	("Budget Général de l'État", "Collectivités Terr.", 4.5),
	("Budget Général de l'État", "Autres Missions", 177.5),
	// missions -> nature
	("Enseignement Scolaire", "Dépenses de Personnel", 60.0),
	("Enseignement Scolaire", "Fonctionnement & Invest.", 4.0),
	("Défense", "Dépenses de Personnel", 21.0),
	("Défense", "Fonctionnement & Invest.", 26.0),
	("Charge de la Dette", "Intérêts Financiers", 56.0),
	("Recherche & Ens. Sup.", "Dépenses de Personnel", 18.0),
	("Recherche & Ens. Sup.", "Interventions & Transferts", 8.0),
	("Recherche & Ens. Sup.", "Fonctionnement & Invest.", 5.0),
	("Solidarité & Insertion", "Interventions & Transferts", 28.0),
	("Solidarité & Insertion", "Dépenses de Personnel", 2.0),
	("Sécurité", "Dépenses de Personnel", 14.5),
	("Sécurité", "Fonctionnement & Invest.", 2.5),
	("Justice", "Dépenses de Personnel", 6.5),
	("Justice", "Fonctionnement & Invest.", 3.5),
	("Écologie & Transport", "Interventions & Transferts", 10.0),
	("Écologie & Transport", "Fonctionnement & Invest.", 15.0),
	("Travail & Emploi", "Interventions & Transferts", 16.0),
	("Travail & Emploi", "Dépenses de Personnel", 2.0),
	("Collectivités Terr.", "Interventions & Transferts", 4.5),
	("Autres Missions", "Interventions & Transferts", 80.0),
	("Autres Missions", "Dépenses de Personnel", 30.0),
	("Autres Missions", "Fonctionnement & Invest.", 67.5),
	// nature -> detail
	("Dépenses de Personnel", "Salaires & Traitements", 154.0),
	("Interventions & Transferts", "Aides aux Ménages", 40.0),
	("Interventions & Transferts", "Aides aux Entreprises", 35.0),
	("Interventions & Transferts", "Dotations Collectivités", 45.0),
	("Interventions & Transferts", "Contribution UE", 26.5),
	("Fonctionnement & Invest.", "Armement & Équipement", 20.0),
	("Fonctionnement & Invest.", "Infra. & Immobilier", 30.0),
	("Fonctionnement & Invest.", "Fonctionnement Services", 73.5),
	("Intérêts Financiers", "Intérêts de la Dette", 56.0),
];

static BUDGET_2024: LazyLock<BudgetData> = LazyLock::new(|| BudgetData {
	nodes: NODES
		.iter()
		.map(|&(name, category)| BudgetNode::new(name, category))
		.collect(),
	links: LINKS
		.iter()
		.map(|&(source, target, value)| BudgetLink::new(source, target, value))
		.collect(),
});

/// The immutable 2024 dataset, built on first access.
pub fn budget_2024() -> &'static BudgetData {
	&BUDGET_2024
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn every_link_references_a_known_node() {
		let data = budget_2024();
		let names: HashSet<&str> = data.nodes.iter().map(|n| n.name.as_str()).collect();
		for link in &data.links {
			assert!(names.contains(link.source.as_str()), "{}", link.source);
			assert!(names.contains(link.target.as_str()), "{}", link.target);
		}
	}

	#[test]
	fn node_names_are_unique() {
		let data = budget_2024();
		let names: HashSet<&str> = data.nodes.iter().map(|n| n.name.as_str()).collect();
		assert_eq!(names.len(), data.nodes.len());
	}

	#[test]
	fn every_category_is_populated() {
		let data = budget_2024();
		for category in Category::ALL {
			assert!(data.nodes.iter().any(|n| n.category == category), "{category:?}");
		}
	}

	#[test]
	fn central_budget_roughly_balances() {
		let data = budget_2024();
		let central = "Budget Général de l'État";
		let inflow: f64 = data.links.iter().filter(|l| l.target == central).map(|l| l.value).sum();
		let outflow: f64 = data.links.iter().filter(|l| l.source == central).map(|l| l.value).sum();
		assert_eq!(inflow, 480.0);
		assert_eq!(outflow, 480.0);
	}
}
