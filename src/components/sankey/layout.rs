//! Multi-column flow layout: columns by category, heights by value, iterative vertical relaxation.

use std::cmp::Ordering;

use log::debug;

use super::resolve::ResolvedGraph;
use crate::data::Category;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
	pub left: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
	pub margin: Margin,
	pub node_width: f64,
	pub node_padding: f64,
	pub curvature: f64,
	pub iterations: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			margin: Margin {
				top: 20.0,
				right: 200.0,
				bottom: 20.0,
				left: 220.0,
			},
			node_width: 10.0,
			node_padding: 24.0,
			curvature: 0.4,
			iterations: 64,
		}
	}
}

/// Node rectangle in diagram coordinates, before any rendering floor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeGeometry {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl NodeGeometry {
	pub fn center_y(&self) -> f64 {
		self.y + self.height / 2.0
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeBox {
	pub column: usize,
	pub value: f64,
	pub geometry: NodeGeometry,
}

/// Cubic band between two nodes; `(x0, y0)` and `(x1, y1)` are the centre line ends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinkPath {
	pub x0: f64,
	pub y0: f64,
	pub x1: f64,
	pub y1: f64,
	pub cx0: f64,
	pub cx1: f64,
}

impl LinkPath {
	pub fn point_at(&self, t: f64) -> (f64, f64) {
		let u = 1.0 - t;
		let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
		(
			a * self.x0 + b * self.cx0 + c * self.cx1 + d * self.x1,
			a * self.y0 + b * self.y0 + c * self.y1 + d * self.y1,
		)
	}

	/// Centre-line y at horizontal position `x`, if `x` lies within the band's span.
	pub fn y_at(&self, x: f64) -> Option<f64> {
		const SAMPLES: usize = 32;
		if x < self.x0.min(self.x1) || x > self.x0.max(self.x1) {
			return None;
		}
		let mut prev = self.point_at(0.0);
		for i in 1..=SAMPLES {
			let next = self.point_at(i as f64 / SAMPLES as f64);
			let (lo, hi) = (prev.0.min(next.0), prev.0.max(next.0));
			if x >= lo && x <= hi {
				let span = next.0 - prev.0;
				if span.abs() < f64::EPSILON {
					return Some(prev.1);
				}
				return Some(prev.1 + (next.1 - prev.1) * (x - prev.0) / span);
			}
			prev = next;
		}
		None
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkBand {
	/// Position in [`ResolvedGraph::links`].
	pub link: usize,
	pub source: usize,
	pub target: usize,
	pub width: f64,
	pub path: LinkPath,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SankeyLayout {
	pub nodes: Vec<NodeBox>,
	pub links: Vec<LinkBand>,
	pub columns: usize,
}

impl SankeyLayout {
	/// Lay out `graph` inside a `width` × `height` area, margins included.
	pub fn compute(graph: &ResolvedGraph, width: f64, height: f64, config: &LayoutConfig) -> Self {
		let count = graph.nodes.len();
		if count == 0 {
			return Self::default();
		}
		let inner_w = (width - config.margin.left - config.margin.right).max(config.node_width);
		let inner_h = (height - config.margin.top - config.margin.bottom).max(0.0);

		let columns = compressed_columns(graph);
		let column_count = columns.iter().copied().max().map_or(0, |c| c + 1);
		let values = graph.node_values();

		// valid links only; the resolver may leave indices past an empty node list
		let edges: Vec<(usize, usize, usize, f64)> = graph
			.links
			.iter()
			.enumerate()
			.filter(|(_, l)| l.source < count && l.target < count)
			.map(|(i, l)| (i, l.source, l.target, l.value.max(0.0)))
			.collect();

		let mut by_column: Vec<Vec<usize>> = vec![Vec::new(); column_count];
		for (i, &c) in columns.iter().enumerate() {
			by_column[c].push(i);
		}

		// shrink the gaps when the fullest column cannot fit them
		let fullest = by_column.iter().map(Vec::len).max().unwrap_or(0);
		let padding = if fullest > 1 {
			config.node_padding.min(inner_h / (fullest - 1) as f64)
		} else {
			config.node_padding
		};

		let ky = by_column
			.iter()
			.filter_map(|members| {
				let total: f64 = members.iter().map(|&i| values[i]).sum();
				(total > 0.0).then(|| {
					let gaps = (members.len().saturating_sub(1)) as f64 * padding;
					(inner_h - gaps).max(0.0) / total
				})
			})
			.fold(f64::INFINITY, f64::min);
		let ky = if ky.is_finite() { ky } else { 0.0 };

		let step = if column_count > 1 {
			(inner_w - config.node_width) / (column_count - 1) as f64
		} else {
			0.0
		};

		let mut geometry: Vec<NodeGeometry> = (0..count)
			.map(|i| NodeGeometry {
				x: columns[i] as f64 * step,
				y: 0.0,
				width: config.node_width,
				height: values[i] * ky,
			})
			.collect();

		for members in &by_column {
			let mut y = 0.0;
			for &i in members {
				geometry[i].y = y;
				y += geometry[i].height + padding;
			}
		}
		resolve_all_collisions(&mut geometry, &by_column, inner_h, padding);

		let mut alpha = 1.0;
		for _ in 0..config.iterations {
			alpha *= 0.99;
			relax(&mut geometry, &by_column, &edges, alpha, Direction::RightToLeft);
			resolve_all_collisions(&mut geometry, &by_column, inner_h, padding);
			relax(&mut geometry, &by_column, &edges, alpha, Direction::LeftToRight);
			resolve_all_collisions(&mut geometry, &by_column, inner_h, padding);
		}

		for g in &mut geometry {
			g.x += config.margin.left;
			g.y += config.margin.top;
		}

		let links = link_bands(&geometry, &edges, ky, config.curvature);
		debug!(
			"sankey layout: {count} nodes, {} links, {column_count} columns, ky={ky:.3}",
			links.len()
		);

		Self {
			nodes: (0..count)
				.map(|i| NodeBox {
					column: columns[i],
					value: values[i],
					geometry: geometry[i],
				})
				.collect(),
			links,
			columns: column_count,
		}
	}
}

/// Rank of each node's category among the categories present in the graph.
fn compressed_columns(graph: &ResolvedGraph) -> Vec<usize> {
	let mut present = [false; Category::ALL.len()];
	for node in &graph.nodes {
		present[node.category.column()] = true;
	}
	let mut rank = [0; Category::ALL.len()];
	let mut next = 0;
	for (c, used) in present.iter().enumerate() {
		rank[c] = next;
		if *used {
			next += 1;
		}
	}
	graph.nodes.iter().map(|n| rank[n.category.column()]).collect()
}

#[derive(Clone, Copy)]
enum Direction {
	LeftToRight,
	RightToLeft,
}

/// Pull each node toward the value-weighted centre of its neighbours on one side.
fn relax(
	geometry: &mut [NodeGeometry],
	by_column: &[Vec<usize>],
	edges: &[(usize, usize, usize, f64)],
	alpha: f64,
	direction: Direction,
) {
	let order: Vec<&Vec<usize>> = match direction {
		Direction::LeftToRight => by_column.iter().collect(),
		Direction::RightToLeft => by_column.iter().rev().collect(),
	};
	for members in order {
		for &node in members {
			let (mut weighted, mut total) = (0.0, 0.0);
			for &(_, source, target, value) in edges {
				let other = match direction {
					Direction::LeftToRight if target == node => source,
					Direction::RightToLeft if source == node => target,
					_ => continue,
				};
				if other == node {
					continue;
				}
				weighted += geometry[other].center_y() * value;
				total += value;
			}
			if total > 0.0 {
				let shift = (weighted / total - geometry[node].center_y()) * alpha;
				geometry[node].y += shift;
			}
		}
	}
}

fn resolve_all_collisions(
	geometry: &mut [NodeGeometry],
	by_column: &[Vec<usize>],
	inner_h: f64,
	padding: f64,
) {
	for members in by_column {
		resolve_collisions(geometry, members, inner_h, padding);
	}
}

/// Push overlapping nodes of one column apart, then back inside `[0, inner_h]`.
fn resolve_collisions(geometry: &mut [NodeGeometry], members: &[usize], inner_h: f64, padding: f64) {
	if members.is_empty() {
		return;
	}
	let mut sorted = members.to_vec();
	sorted.sort_by(|&a, &b| geometry[a].y.partial_cmp(&geometry[b].y).unwrap_or(Ordering::Equal));

	let mut y0 = 0.0;
	for &i in &sorted {
		let dy = y0 - geometry[i].y;
		if dy > 0.0 {
			geometry[i].y += dy;
		}
		y0 = geometry[i].y + geometry[i].height + padding;
	}

	let overflow = y0 - padding - inner_h;
	if overflow > 0.0 {
		let last = sorted[sorted.len() - 1];
		geometry[last].y -= overflow;
		let mut y0 = geometry[last].y;
		for &i in sorted.iter().rev().skip(1) {
			let dy = geometry[i].y + geometry[i].height + padding - y0;
			if dy > 0.0 {
				geometry[i].y -= dy;
			}
			y0 = geometry[i].y;
		}
	}
}

/// Stack bands at each end: outgoing by target position, incoming by source position.
fn link_bands(
	geometry: &[NodeGeometry],
	edges: &[(usize, usize, usize, f64)],
	ky: f64,
	curvature: f64,
) -> Vec<LinkBand> {
	let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); geometry.len()];
	let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); geometry.len()];
	for (e, &(_, source, target, _)) in edges.iter().enumerate() {
		outgoing[source].push(e);
		incoming[target].push(e);
	}

	let by_y = |node_of: &dyn Fn(usize) -> usize, list: &mut Vec<usize>| {
		list.sort_by(|&a, &b| {
			geometry[node_of(a)]
				.y
				.partial_cmp(&geometry[node_of(b)].y)
				.unwrap_or(Ordering::Equal)
		});
	};

	let mut source_offset = vec![0.0; edges.len()];
	let mut target_offset = vec![0.0; edges.len()];
	for list in &mut outgoing {
		by_y(&|e| edges[e].2, list);
		let mut offset = 0.0;
		for &e in list.iter() {
			source_offset[e] = offset;
			offset += edges[e].3 * ky;
		}
	}
	for list in &mut incoming {
		by_y(&|e| edges[e].1, list);
		let mut offset = 0.0;
		for &e in list.iter() {
			target_offset[e] = offset;
			offset += edges[e].3 * ky;
		}
	}

	edges
		.iter()
		.enumerate()
		.map(|(e, &(link, source, target, value))| {
			let width = value * ky;
			let (s, t) = (&geometry[source], &geometry[target]);
			let (x0, x1) = (s.x + s.width, t.x);
			let lerp = |k: f64| x0 + (x1 - x0) * k;
			LinkBand {
				link,
				source,
				target,
				width,
				path: LinkPath {
					x0,
					y0: s.y + source_offset[e] + width / 2.0,
					x1,
					y1: t.y + target_offset[e] + width / 2.0,
					cx0: lerp(curvature),
					cx1: lerp(1.0 - curvature),
				},
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::sankey::resolve::resolve;
	use crate::data::{BudgetData, BudgetLink, BudgetNode, budget_2024};

	const W: f64 = 1600.0;
	const H: f64 = 900.0;

	fn chain() -> ResolvedGraph {
		resolve(&BudgetData {
			nodes: vec![
				BudgetNode::new("A", Category::Resource),
				BudgetNode::new("B", Category::Intermediate),
				BudgetNode::new("C", Category::Expense),
			],
			links: vec![BudgetLink::new("A", "B", 10.0), BudgetLink::new("B", "C", 10.0)],
		})
	}

	#[test]
	fn empty_graph_has_empty_layout() {
		let layout = SankeyLayout::compute(&ResolvedGraph::default(), W, H, &LayoutConfig::default());
		assert!(layout.nodes.is_empty());
		assert_eq!(layout.columns, 0);
	}

	#[test]
	fn absent_categories_are_compressed() {
		let layout = SankeyLayout::compute(&chain(), W, H, &LayoutConfig::default());
		let columns: Vec<usize> = layout.nodes.iter().map(|n| n.column).collect();
		assert_eq!(columns, vec![0, 1, 2]);
		assert_eq!(layout.columns, 3);
		assert_eq!(layout.nodes[0].geometry.x, 220.0);
		assert_eq!(layout.nodes[2].geometry.x + 10.0, W - 200.0);
	}

	#[test]
	fn single_chain_fills_the_available_height() {
		let config = LayoutConfig::default();
		let layout = SankeyLayout::compute(&chain(), W, H, &config);
		for node in &layout.nodes {
			assert!((node.geometry.height - (H - 40.0)).abs() < 1e-9);
			assert!((node.geometry.y - 20.0).abs() < 1e-9);
		}
		let band = &layout.links[0];
		assert!((band.width - (H - 40.0)).abs() < 1e-9);
		assert_eq!(band.path.cx0, band.path.x0 + (band.path.x1 - band.path.x0) * 0.4);
	}

	#[test]
	fn full_dataset_stays_inside_the_drawing_area() {
		let config = LayoutConfig::default();
		let graph = resolve(budget_2024());
		let layout = SankeyLayout::compute(&graph, W, H, &config);
		assert_eq!(layout.columns, 7);
		assert_eq!(layout.links.len(), graph.links.len());
		for node in &layout.nodes {
			let g = node.geometry;
			assert!(g.y >= config.margin.top - 1e-6, "{g:?}");
			assert!(g.y + g.height <= H - config.margin.bottom + 1e-6, "{g:?}");
		}
	}

	#[test]
	fn nodes_in_a_column_do_not_overlap() {
		let graph = resolve(budget_2024());
		let layout = SankeyLayout::compute(&graph, W, H, &LayoutConfig::default());
		for column in 0..layout.columns {
			let mut boxes: Vec<NodeGeometry> = layout
				.nodes
				.iter()
				.filter(|n| n.column == column)
				.map(|n| n.geometry)
				.collect();
			boxes.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
			for pair in boxes.windows(2) {
				assert!(pair[0].y + pair[0].height <= pair[1].y + 1e-6);
			}
		}
	}

	#[test]
	fn bands_stack_within_their_source_node() {
		let graph = resolve(budget_2024());
		let layout = SankeyLayout::compute(&graph, W, H, &LayoutConfig::default());
		for band in &layout.links {
			let source = layout.nodes[band.source].geometry;
			let top = band.path.y0 - band.width / 2.0;
			assert!(top >= source.y - 1e-6);
			assert!(top + band.width <= source.y + source.height + 1e-6);
		}
	}

	#[test]
	fn zero_value_nodes_get_zero_height() {
		let graph = resolve(&BudgetData {
			nodes: vec![
				BudgetNode::new("A", Category::Resource),
				BudgetNode::new("B", Category::Intermediate),
				BudgetNode::new("Z", Category::Resource),
			],
			links: vec![BudgetLink::new("A", "B", 5.0), BudgetLink::new("Z", "B", 0.0)],
		});
		let layout = SankeyLayout::compute(&graph, W, H, &LayoutConfig::default());
		assert_eq!(layout.nodes[2].geometry.height, 0.0);
	}

	#[test]
	fn out_of_range_links_are_skipped() {
		let mut graph = chain();
		graph.links[0].target = 99;
		let layout = SankeyLayout::compute(&graph, W, H, &LayoutConfig::default());
		assert_eq!(layout.links.len(), 1);
		assert_eq!(layout.links[0].link, 1);
	}

	#[test]
	fn band_centre_line_is_found_inside_its_span() {
		let path = LinkPath {
			x0: 0.0,
			y0: 0.0,
			x1: 100.0,
			y1: 100.0,
			cx0: 40.0,
			cx1: 60.0,
		};
		assert!((path.y_at(50.0).unwrap() - 50.0).abs() < 1.0);
		assert_eq!(path.y_at(-1.0), None);
		assert_eq!(path.y_at(0.0), Some(0.0));
	}

	#[test]
	fn short_area_keeps_every_node_inside() {
		let config = LayoutConfig::default();
		let graph = resolve(budget_2024());
		let height = 250.0;
		let layout = SankeyLayout::compute(&graph, 800.0, height, &config);
		for node in &layout.nodes {
			let g = node.geometry;
			assert!(g.y >= config.margin.top - 1e-6, "{g:?}");
			assert!(g.y + g.height <= height - config.margin.bottom + 1e-6, "{g:?}");
		}
	}
}
