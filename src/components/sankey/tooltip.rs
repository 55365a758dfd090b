/// Unit appended to every amount shown in the diagram.
pub const AMOUNT_UNIT: &str = "Md€";

/// What the pointer is over, as handed to the tooltip formatter.
///
/// A link carries both endpoint names, a node carries neither.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverPayload {
	pub name: Option<String>,
	pub source: Option<String>,
	pub target: Option<String>,
	pub value: f64,
}

impl HoverPayload {
	pub fn node(name: impl Into<String>, value: f64) -> Self {
		Self {
			name: Some(name.into()),
			value,
			..Self::default()
		}
	}

	pub fn link(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
		Self {
			source: Some(source.into()),
			target: Some(target.into()),
			value,
			..Self::default()
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Tooltip {
	Link {
		source: String,
		target: String,
		amount: String,
	},
	Node {
		name: String,
		amount: String,
	},
}

pub fn format_amount(value: f64) -> String {
	format!("{value:.1} {AMOUNT_UNIT}")
}

/// Build the tooltip for a hovered element.
pub fn tooltip_for(payload: &HoverPayload) -> Tooltip {
	let amount = format_amount(payload.value);
	match (&payload.source, &payload.target) {
		(Some(source), Some(target)) => Tooltip::Link {
			source: source.clone(),
			target: target.clone(),
			amount,
		},
		_ => Tooltip::Node {
			name: payload.name.clone().unwrap_or_default(),
			amount,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn link_payload_formats_flow() {
		let tip = tooltip_for(&HoverPayload::link("TVA", "Budget Général de l'État", 100.0));
		assert_eq!(
			tip,
			Tooltip::Link {
				source: "TVA".into(),
				target: "Budget Général de l'État".into(),
				amount: "100.0 Md€".into(),
			}
		);
	}

	#[test]
	fn node_payload_formats_total() {
		let tip = tooltip_for(&HoverPayload::node("Justice", 10.0));
		assert_eq!(
			tip,
			Tooltip::Node {
				name: "Justice".into(),
				amount: "10.0 Md€".into(),
			}
		);
	}

	#[test]
	fn one_endpoint_is_not_a_link() {
		let payload = HoverPayload {
			name: Some("Défense".into()),
			source: Some("Budget".into()),
			value: 47.25,
			..HoverPayload::default()
		};
		assert!(matches!(tooltip_for(&payload), Tooltip::Node { .. }));
	}

	#[test]
	fn amounts_round_to_one_decimal() {
		assert_eq!(format_amount(4.46), "4.5 Md€");
		assert_eq!(format_amount(177.5), "177.5 Md€");
	}
}
