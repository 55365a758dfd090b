//! The budget dataset: node/link types, the 2024 literal and its narrative summary.

mod budget_2024;
mod summary;
mod types;

pub use budget_2024::budget_2024;
pub use summary::{budget_summary, central_inflow};
pub use types::{BudgetData, BudgetLink, BudgetNode, Category};
