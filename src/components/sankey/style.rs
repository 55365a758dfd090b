//! Per-column label placement, value sub-labels, node fill colors.

use std::collections::HashMap;

use super::layout::NodeGeometry;
use super::lookup::Lookup;
use crate::data::Category;

/// Color of any node missing from the palette.
pub const FALLBACK_COLOR: &str = "#cbd5e1";

/// Nodes are never drawn shorter than this, so tiny flows stay hoverable.
pub const MIN_NODE_HEIGHT: f64 = 4.0;

/// Nodes whose column only shows a value label when they are tall enough use this threshold.
pub const VALUE_LABEL_MIN_HEIGHT: f64 = 20.0;

/// Distance from the node centre line to the value label baseline, before the column shift.
pub const VALUE_LABEL_GAP: f64 = 12.0;

pub const LABEL_COLOR: &str = "#334155";
pub const VALUE_LABEL_COLOR: &str = "#64748b";

const BUDGET_2024_COLORS: &[(&str, &str)] = &[
	// segmentation
	("Ménages - Revenus Modestes", "#fdba74"),
	("Ménages - Classes Moyennes", "#fb923c"),
	("Ménages - Hauts Revenus", "#ea580c"),
	("TPE & PME", "#93c5fd"),
	("Grandes Entreprises & ETI", "#3b82f6"),
	("Investisseurs Institutionnels", "#fda4af"),
	("Bailleurs & Actionnaires", "#cbd5e1"),
	// origins
	("Ménages & Particuliers", "#c2410c"),
	("Entreprises", "#1d4ed8"),
	("Marchés Financiers", "#881337"),
	("Divers & Europe", "#64748b"),
	// resources
	("TVA", "#059669"),
	("Impôt sur le Revenu", "#10b981"),
	("Impôt sur les Sociétés", "#34d399"),
	("TICPE (Carburants)", "#06b6d4"),
	("Autres Recettes Fiscales", "#2dd4bf"),
	("Recettes Non Fiscales", "#99f6e4"),
	("Déficit / Emprunt", "#e11d48"),
	// center
	("Budget Général de l'État", "#1e293b"),
	// missions
	("Enseignement Scolaire", "#4f46e5"),
	("Recherche & Ens. Sup.", "#6366f1"),
	("Défense", "#d97706"),
	("Sécurité", "#f59e0b"),
	("Justice", "#fbbf24"),
	("Solidarité & Insertion", "#db2777"),
	("Travail & Emploi", "#ec4899"),
	("Écologie & Transport", "#0ea5e9"),
	("Collectivités Terr.", "#0284c7"),
	("Autres Missions", "#64748b"),
	("Charge de la Dette", "#9f1239"),
	// nature
	("Dépenses de Personnel", "#475569"),
	("Intérêts Financiers", "#9f1239"),
	("Interventions & Transferts", "#64748b"),
	("Fonctionnement & Invest.", "#334155"),
	// details
	("Salaires & Traitements", "#4338ca"),
	("Aides aux Ménages", "#be185d"),
	("Aides aux Entreprises", "#be185d"),
	("Dotations Collectivités", "#0369a1"),
	("Contribution UE", "#1d4ed8"),
	("Armement & Équipement", "#b45309"),
	("Infra. & Immobilier", "#0f766e"),
	("Fonctionnement Services", "#15803d"),
	("Intérêts de la Dette", "#881337"),
];

/// Read-only name to color table, passed explicitly to whoever draws nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	colors: HashMap<String, String>,
	fallback: String,
}

impl Palette {
	pub fn new<I, N, C>(entries: I, fallback: impl Into<String>) -> Self
	where
		I: IntoIterator<Item = (N, C)>,
		N: Into<String>,
		C: Into<String>,
	{
		Self {
			colors: entries
				.into_iter()
				.map(|(n, c)| (n.into(), c.into()))
				.collect(),
			fallback: fallback.into(),
		}
	}

	/// Palette of the 2024 dataset.
	pub fn budget_2024() -> Self {
		Self::new(BUDGET_2024_COLORS.iter().copied(), FALLBACK_COLOR)
	}

	pub fn lookup(&self, name: &str) -> Lookup<&str> {
		Lookup::from_option(self.colors.get(name).map(String::as_str), self.fallback.as_str())
	}

	pub fn fallback(&self) -> &str {
		&self.fallback
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::budget_2024()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
	Start,
	Middle,
	End,
}

impl TextAnchor {
	/// Matching `CanvasRenderingContext2D.textAlign` keyword.
	pub fn canvas_align(self) -> &'static str {
		match self {
			TextAnchor::Start => "start",
			TextAnchor::Middle => "center",
			TextAnchor::End => "end",
		}
	}
}

/// Where a column's label sits relative to its node.
#[derive(Clone, Copy, Debug, PartialEq)]
enum LabelSide {
	Left(f64),
	Center,
	Right(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ColumnRule {
	side: LabelSide,
	dy: f64,
	value_dy: f64,
	value_always: bool,
}

fn column_rule(category: Category) -> ColumnRule {
	use Category::*;
	use LabelSide::*;

	let (side, dy, value_dy, value_always) = match category {
		ActorSegmentation => (Left(8.0), 4.0, 4.0, true),
		ResourceOrigin => (Center, -6.0, 0.0, true),
		Resource => (Center, -6.0, 0.0, true),
		ExpenseDetail => (Right(8.0), 4.0, 4.0, true),
		ExpenseNature => (Center, -6.0, 0.0, true),
		Intermediate => (Center, 4.0, 4.0, false),
		Expense => (Right(6.0), 4.0, 4.0, false),
	};
	ColumnRule {
		side,
		dy,
		value_dy,
		value_always,
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
	pub text: String,
	pub x: f64,
	pub y: f64,
	pub anchor: TextAnchor,
	pub font_size: f64,
	pub font_weight: u16,
	pub color: &'static str,
}

impl TextLabel {
	pub fn font(&self) -> String {
		format!("{} {}px sans-serif", self.font_weight, self.font_size)
	}
}

/// Everything needed to draw one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub fill: String,
	/// Rectangle with the height floor applied.
	pub rect: NodeGeometry,
	pub label: TextLabel,
	pub value_label: Option<TextLabel>,
}

/// Height a node is drawn with.
pub fn rendered_height(height: f64) -> f64 {
	height.max(MIN_NODE_HEIGHT)
}

/// Apply the column policy to a node the layout has already placed.
///
/// Label positions use the computed height, not the floored one, so labels of
/// near-empty nodes stay centred on the flow they describe.
pub fn style_node(
	name: &str,
	category: Category,
	value: f64,
	geometry: &NodeGeometry,
	palette: &Palette,
) -> NodeStyle {
	let rule = column_rule(category);
	let central = category == Category::Intermediate;

	let (x, anchor) = match rule.side {
		LabelSide::Left(gap) => (geometry.x - gap, TextAnchor::End),
		LabelSide::Center => (geometry.x + geometry.width / 2.0, TextAnchor::Middle),
		LabelSide::Right(gap) => (geometry.x + geometry.width + gap, TextAnchor::Start),
	};
	let centre = geometry.center_y();
	let y = centre + rule.dy;

	let label = TextLabel {
		text: name.to_string(),
		x,
		y,
		anchor,
		font_size: if central { 14.0 } else { 11.0 },
		font_weight: if central { 700 } else { 500 },
		color: LABEL_COLOR,
	};

	let show_value = rule.value_always || geometry.height > VALUE_LABEL_MIN_HEIGHT;
	let value_label = show_value.then(|| TextLabel {
		text: format!("{}", value.round()),
		x,
		y: centre + VALUE_LABEL_GAP + rule.value_dy,
		anchor,
		font_size: 9.0,
		font_weight: 400,
		color: VALUE_LABEL_COLOR,
	});

	NodeStyle {
		fill: palette.lookup(name).value().to_string(),
		rect: NodeGeometry {
			height: rendered_height(geometry.height),
			..*geometry
		},
		label,
		value_label,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::budget_2024;

	fn geom(height: f64) -> NodeGeometry {
		NodeGeometry {
			x: 100.0,
			y: 50.0,
			width: 10.0,
			height,
		}
	}

	#[test]
	fn every_dataset_node_has_its_own_color() {
		let palette = Palette::budget_2024();
		for node in &budget_2024().nodes {
			assert!(palette.lookup(&node.name).is_found(), "{}", node.name);
		}
	}

	#[test]
	fn unknown_name_gets_the_fallback() {
		let palette = Palette::budget_2024();
		assert_eq!(palette.lookup("Inconnu"), Lookup::Fallback(FALLBACK_COLOR));
	}

	#[test]
	fn substituted_palette_is_honoured() {
		let palette = Palette::new([("TVA", "#000000")], "#ffffff");
		let style = style_node("TVA", Category::Resource, 1.0, &geom(30.0), &palette);
		assert_eq!(style.fill, "#000000");
		let other = style_node("IR", Category::Resource, 1.0, &geom(30.0), &palette);
		assert_eq!(other.fill, "#ffffff");
	}

	#[test]
	fn height_floor_applies_only_below_minimum() {
		for h in [0.0, 1.5, 3.999, 4.0, 4.5, 120.0] {
			let style = style_node("TVA", Category::Resource, 1.0, &geom(h), &Palette::default());
			assert_eq!(style.rect.height, h.max(4.0));
			assert_eq!(style.rect.y, 50.0);
		}
	}

	#[test]
	fn label_placement_table() {
		let g = geom(40.0);
		let center = 70.0;
		let cases = [
			(Category::ActorSegmentation, 92.0, TextAnchor::End, 4.0),
			(Category::ResourceOrigin, 105.0, TextAnchor::Middle, -6.0),
			(Category::Resource, 105.0, TextAnchor::Middle, -6.0),
			(Category::ExpenseDetail, 118.0, TextAnchor::Start, 4.0),
			(Category::ExpenseNature, 105.0, TextAnchor::Middle, -6.0),
			(Category::Intermediate, 105.0, TextAnchor::Middle, 4.0),
			(Category::Expense, 116.0, TextAnchor::Start, 4.0),
		];
		for (category, x, anchor, dy) in cases {
			let style = style_node("n", category, 1.0, &g, &Palette::default());
			assert_eq!(style.label.x, x, "{category:?}");
			assert_eq!(style.label.anchor, anchor, "{category:?}");
			assert_eq!(style.label.y, center + dy, "{category:?}");
		}
	}

	#[test]
	fn value_label_rules() {
		let always = [
			Category::ActorSegmentation,
			Category::ResourceOrigin,
			Category::Resource,
			Category::ExpenseDetail,
			Category::ExpenseNature,
		];
		for category in always {
			let style = style_node("n", category, 1.0, &geom(2.0), &Palette::default());
			assert!(style.value_label.is_some(), "{category:?}");
		}
		for category in [Category::Intermediate, Category::Expense] {
			let short = style_node("n", category, 1.0, &geom(20.0), &Palette::default());
			assert!(short.value_label.is_none(), "{category:?}");
			let tall = style_node("n", category, 1.0, &geom(20.5), &Palette::default());
			assert!(tall.value_label.is_some(), "{category:?}");
		}
	}

	#[test]
	fn value_label_sits_below_primary_and_is_rounded() {
		let style = style_node("n", Category::Expense, 177.5, &geom(60.0), &Palette::default());
		let value = style.value_label.unwrap();
		assert_eq!(value.text, "178");
		assert_eq!(value.y, style.label.y + 12.0);
		assert_eq!(value.x, style.label.x);
	}

	#[test]
	fn value_label_offsets_from_node_centre() {
		// geom centre is 50 + 40 / 2
		let centre = 70.0;
		let cases = [
			(Category::ActorSegmentation, 16.0),
			(Category::ResourceOrigin, 12.0),
			(Category::Resource, 12.0),
			(Category::Intermediate, 16.0),
			(Category::Expense, 16.0),
			(Category::ExpenseNature, 12.0),
			(Category::ExpenseDetail, 16.0),
		];
		for (category, below) in cases {
			let style = style_node("n", category, 1.0, &geom(40.0), &Palette::default());
			let value = style.value_label.unwrap();
			assert_eq!(value.y, centre + below, "{category:?}");
			assert!(value.y > style.label.y, "{category:?}");
		}
	}

	#[test]
	fn central_node_is_emphasised() {
		let style = style_node("Budget", Category::Intermediate, 1.0, &geom(40.0), &Palette::default());
		assert_eq!(style.label.font(), "700 14px sans-serif");
		let other = style_node("TVA", Category::Resource, 1.0, &geom(40.0), &Palette::default());
		assert_eq!(other.label.font(), "500 11px sans-serif");
	}
}
