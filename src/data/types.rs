use serde::{Deserialize, Serialize};

/// Conceptual column a node belongs to, ordered from revenue origin to spending detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	ActorSegmentation,
	ResourceOrigin,
	Resource,
	Intermediate,
	Expense,
	ExpenseNature,
	ExpenseDetail,
}

impl Category {
	/// Every category in column order.
	pub const ALL: [Category; 7] = [
		Category::ActorSegmentation,
		Category::ResourceOrigin,
		Category::Resource,
		Category::Intermediate,
		Category::Expense,
		Category::ExpenseNature,
		Category::ExpenseDetail,
	];

	/// Nominal column of the category, before empty columns are compressed away.
	pub fn column(self) -> usize {
		match self {
			Category::ActorSegmentation => 0,
			Category::ResourceOrigin => 1,
			Category::Resource => 2,
			Category::Intermediate => 3,
			Category::Expense => 4,
			Category::ExpenseNature => 5,
			Category::ExpenseDetail => 6,
		}
	}
}

/// A named stage of the flow. The name is the primary key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetNode {
	pub name: String,
	pub category: Category,
}

impl BudgetNode {
	pub fn new(name: impl Into<String>, category: Category) -> Self {
		Self {
			name: name.into(),
			category,
		}
	}
}

/// A directed monetary flow, in billions of euros.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetLink {
	pub source: String,
	pub target: String,
	pub value: f64,
}

impl BudgetLink {
	pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			value,
		}
	}
}

/// Name-addressed flow graph, also the authoring format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetData {
	pub nodes: Vec<BudgetNode>,
	pub links: Vec<BudgetLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn category_serializes_as_snake_case() {
		let node = BudgetNode::new("TVA", Category::ExpenseNature);
		let json = serde_json::to_string(&node).unwrap();
		assert_eq!(json, r#"{"name":"TVA","category":"expense_nature"}"#);
	}

	#[test]
	fn authoring_format_parses() {
		let raw = r#"{
			"nodes": [{"name": "A", "category": "resource"}, {"name": "B", "category": "intermediate"}],
			"links": [{"source": "A", "target": "B", "value": 10}]
		}"#;
		let data: BudgetData = serde_json::from_str(raw).unwrap();
		assert_eq!(data.nodes[1].category, Category::Intermediate);
		assert_eq!(data.links[0].value, 10.0);
	}

	#[test]
	fn columns_follow_category_order() {
		let columns: Vec<usize> = Category::ALL.iter().map(|c| c.column()).collect();
		assert_eq!(columns, (0..7).collect::<Vec<_>>());
	}
}
