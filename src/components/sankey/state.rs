use super::layout::{LayoutConfig, SankeyLayout};
use super::resolve::ResolvedGraph;
use super::style::{NodeStyle, Palette, style_node};
use super::tooltip::HoverPayload;

/// Links are easier to hover than their drawn width when they are thin.
pub const LINK_HIT_SLOP: f64 = 2.0;

pub const LINK_ALPHA: f64 = 0.35;

/// Discrete zoom factor of the diagram, always within `[MIN, MAX]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom(f64);

impl Zoom {
	pub const MIN: f64 = 0.5;
	pub const MAX: f64 = 3.0;
	pub const STEP: f64 = 0.25;
	pub const DEFAULT: f64 = 1.0;

	pub fn value(self) -> f64 {
		self.0
	}

	pub fn zoom_in(self) -> Self {
		Self((self.0 + Self::STEP).min(Self::MAX))
	}

	pub fn zoom_out(self) -> Self {
		Self((self.0 - Self::STEP).max(Self::MIN))
	}

	pub fn reset(self) -> Self {
		Self::default()
	}

	pub fn can_zoom_in(self) -> bool {
		self.0 < Self::MAX
	}

	pub fn can_zoom_out(self) -> bool {
		self.0 > Self::MIN
	}

	pub fn percent(self) -> u32 {
		(self.0 * 100.0).round() as u32
	}
}

impl Default for Zoom {
	fn default() -> Self {
		Self(Self::DEFAULT)
	}
}

/// Element under the pointer. `Link` indexes [`SankeyLayout::links`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
	Node(usize),
	Link(usize),
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub target: Option<Hit>,
	pub highlight_t: f64,
	pub prev_target: Option<Hit>,
	delay_t: f64,
}

/// Laid-out diagram plus everything the renderer and pointer handlers share.
pub struct SankeyState {
	pub graph: ResolvedGraph,
	pub layout: SankeyLayout,
	pub styles: Vec<NodeStyle>,
	pub link_colors: Vec<String>,
	pub palette: Palette,
	pub config: LayoutConfig,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
}

impl SankeyState {
	pub fn new(graph: ResolvedGraph, palette: Palette, config: LayoutConfig) -> Self {
		Self {
			graph,
			layout: SankeyLayout::default(),
			styles: Vec::new(),
			link_colors: Vec::new(),
			palette,
			config,
			hover: HoverState::default(),
			width: 0.0,
			height: 0.0,
			pixel_ratio: 1.0,
		}
	}

	pub fn set_graph(&mut self, graph: ResolvedGraph) {
		if self.graph == graph {
			return;
		}
		self.graph = graph;
		self.hover = HoverState::default();
		self.relayout();
	}

	pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
		self.width = width;
		self.height = height;
		self.pixel_ratio = pixel_ratio;
		self.relayout();
	}

	fn relayout(&mut self) {
		self.layout = SankeyLayout::compute(&self.graph, self.width, self.height, &self.config);
		self.styles = self
			.layout
			.nodes
			.iter()
			.zip(&self.graph.nodes)
			.map(|(laid, node)| {
				style_node(&node.name, node.category, laid.value, &laid.geometry, &self.palette)
			})
			.collect();
		self.link_colors = self
			.layout
			.links
			.iter()
			.map(|band| {
				self.graph
					.nodes
					.get(band.source)
					.map_or(self.palette.fallback(), |node| self.palette.lookup(&node.name).value())
					.to_string()
			})
			.collect();
	}

	/// Element at diagram coordinates, nodes taking precedence over links.
	pub fn hit_at(&self, x: f64, y: f64) -> Option<Hit> {
		let node = self.styles.iter().position(|style| {
			let r = style.rect;
			x >= r.x && x <= r.x + r.width && y >= r.y && y <= r.y + r.height
		});
		if let Some(idx) = node {
			return Some(Hit::Node(idx));
		}

		self.layout
			.links
			.iter()
			.enumerate()
			.filter_map(|(i, band)| {
				let centre = band.path.y_at(x)?;
				let reach = (band.width / 2.0).max(LINK_HIT_SLOP);
				((y - centre).abs() <= reach).then_some((i, band.width))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| Hit::Link(i))
	}

	pub fn payload(&self, hit: Hit) -> Option<HoverPayload> {
		match hit {
			Hit::Node(idx) => {
				let node = self.graph.nodes.get(idx)?;
				let laid = self.layout.nodes.get(idx)?;
				Some(HoverPayload::node(node.name.clone(), laid.value))
			}
			Hit::Link(idx) => {
				let band = self.layout.links.get(idx)?;
				let link = self.graph.links.get(band.link)?;
				Some(HoverPayload::link(
					link.source_name.clone(),
					link.target_name.clone(),
					link.value,
				))
			}
		}
	}

	pub fn set_hover(&mut self, target: Option<Hit>) {
		if self.hover.target == target {
			return;
		}
		let was_hovering = self.hover.target.is_some();

		// keep the previous element for the fade-out
		if was_hovering && target.is_none() {
			self.hover.prev_target = self.hover.target.take();
		} else {
			self.hover.prev_target = None;
		}
		if target.is_some() && !was_hovering {
			self.hover.delay_t = 0.0;
		}
		self.hover.target = target;
	}

	fn touches(hit: Option<Hit>, band_idx: usize, source: usize, target: usize) -> bool {
		match hit {
			Some(Hit::Node(n)) => n == source || n == target,
			Some(Hit::Link(l)) => l == band_idx,
			None => false,
		}
	}

	pub fn is_link_highlighted(&self, band_idx: usize) -> bool {
		let Some(band) = self.layout.links.get(band_idx) else {
			return false;
		};
		Self::touches(self.hover.target, band_idx, band.source, band.target)
			|| Self::touches(self.hover.prev_target, band_idx, band.source, band.target)
	}

	pub fn is_node_highlighted(&self, idx: usize) -> bool {
		let linked = |hit: Option<Hit>| match hit {
			Some(Hit::Node(n)) => n == idx,
			Some(Hit::Link(l)) => self
				.layout
				.links
				.get(l)
				.is_some_and(|band| band.source == idx || band.target == idx),
			None => false,
		};
		linked(self.hover.target) || linked(self.hover.prev_target)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.target.is_some() || self.hover.prev_target.is_some()
	}

	pub fn tick(&mut self, dt: f64) {
		let (target, delay, speed) = if self.hover.target.is_some() {
			(1.0, 0.08, 6.0)
		} else {
			(0.0, 0.0, 4.0)
		};

		if self.hover.target.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_target = None;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::sankey::resolve::resolve;
	use crate::data::{BudgetData, BudgetLink, BudgetNode, Category, budget_2024};

	fn chain_state() -> SankeyState {
		let graph = resolve(&BudgetData {
			nodes: vec![
				BudgetNode::new("A", Category::Resource),
				BudgetNode::new("B", Category::Intermediate),
				BudgetNode::new("C", Category::Expense),
			],
			links: vec![BudgetLink::new("A", "B", 10.0), BudgetLink::new("B", "C", 10.0)],
		});
		let mut state = SankeyState::new(graph, Palette::default(), LayoutConfig::default());
		state.resize(1600.0, 900.0, 1.0);
		state
	}

	#[test]
	fn zoom_stays_in_bounds_under_any_sequence() {
		let mut zoom = Zoom::default();
		let ops = "iiiiiiiiiiiiooooooooooooooorioioiiiiroooooooiiiiiiiiiiiiiiii";
		for op in ops.chars() {
			let before = zoom.value();
			zoom = match op {
				'i' => zoom.zoom_in(),
				'o' => zoom.zoom_out(),
				_ => zoom.reset(),
			};
			assert!((Zoom::MIN..=Zoom::MAX).contains(&zoom.value()));
			let moved = (zoom.value() - before).abs();
			assert!(moved == 0.0 || moved == Zoom::STEP || op == 'r');
			if op == 'r' {
				assert_eq!(zoom.value(), 1.0);
			}
		}
	}

	#[test]
	fn zoom_limits_disable_controls() {
		let mut zoom = Zoom::default();
		for _ in 0..8 {
			zoom = zoom.zoom_in();
		}
		assert_eq!(zoom.value(), 3.0);
		assert!(!zoom.can_zoom_in());
		assert_eq!(zoom.percent(), 300);
		for _ in 0..20 {
			zoom = zoom.zoom_out();
		}
		assert_eq!(zoom.value(), 0.5);
		assert!(!zoom.can_zoom_out());
		assert_eq!(zoom.percent(), 50);
	}

	#[test]
	fn pointer_over_node_hits_node() {
		let state = chain_state();
		let r = state.styles[1].rect;
		let hit = state.hit_at(r.x + 1.0, r.y + r.height / 2.0);
		assert_eq!(hit, Some(Hit::Node(1)));
		assert_eq!(
			state.payload(Hit::Node(1)),
			Some(HoverPayload::node("B", 10.0))
		);
	}

	#[test]
	fn pointer_between_columns_hits_link() {
		let state = chain_state();
		let path = state.layout.links[0].path;
		let x = (path.x0 + path.x1) / 2.0;
		let hit = state.hit_at(x, path.y_at(x).unwrap());
		assert_eq!(hit, Some(Hit::Link(0)));
		assert_eq!(
			state.payload(Hit::Link(0)),
			Some(HoverPayload::link("A", "B", 10.0))
		);
	}

	#[test]
	fn pointer_in_margin_hits_nothing() {
		let state = chain_state();
		assert_eq!(state.hit_at(5.0, 5.0), None);
	}

	#[test]
	fn hovering_a_node_highlights_its_links() {
		let mut state = SankeyState::new(resolve(budget_2024()), Palette::default(), LayoutConfig::default());
		state.resize(1600.0, 900.0, 2.0);
		let central = state
			.graph
			.nodes
			.iter()
			.position(|n| n.category == Category::Intermediate)
			.unwrap();
		state.set_hover(Some(Hit::Node(central)));
		let highlighted = (0..state.layout.links.len())
			.filter(|&i| state.is_link_highlighted(i))
			.count();
		assert_eq!(highlighted, 7 + 11);
		assert!(state.is_node_highlighted(central));
	}

	#[test]
	fn hover_fades_out_then_clears() {
		let mut state = chain_state();
		state.set_hover(Some(Hit::Link(0)));
		for _ in 0..60 {
			state.tick(0.016);
		}
		assert!(state.hover.highlight_t > 0.9);
		assert!(state.is_node_highlighted(0) && state.is_node_highlighted(1));
		assert!(!state.is_node_highlighted(2));

		state.set_hover(None);
		assert!(state.has_active_highlight());
		for _ in 0..120 {
			state.tick(0.016);
		}
		assert!(!state.has_active_highlight());
		assert_eq!(state.hover.highlight_t, 0.0);
	}

	#[test]
	fn link_color_follows_source_node() {
		let state = chain_state();
		let palette = Palette::default();
		assert_eq!(state.link_colors[0], palette.lookup("A").value());
	}

	#[test]
	fn unchanged_graph_keeps_layout() {
		let mut state = chain_state();
		let before = state.layout.clone();
		state.set_graph(state.graph.clone());
		assert_eq!(state.layout, before);
	}
}
