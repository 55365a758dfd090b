use web_sys::CanvasRenderingContext2d;

use super::state::{LINK_ALPHA, SankeyState};
use super::style::TextLabel;

const BACKGROUND: &str = "#ffffff";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// `#rrggbb` plus alpha as a CSS `rgba()` color; anything else is returned as is.
fn with_alpha(hex: &str, alpha: f64) -> String {
	let digits = hex.trim_start_matches('#');
	let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2).unwrap_or(""), 16).ok();
	match (digits.len(), channel(0), channel(2), channel(4)) {
		(6, Some(r), Some(g), Some(b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
		_ => hex.to_string(),
	}
}

pub fn render(state: &SankeyState, ctx: &CanvasRenderingContext2d) {
	let ratio = state.pixel_ratio;
	let _ = ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);
}

fn draw_links(state: &SankeyState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	for (i, band) in state.layout.links.iter().enumerate() {
		let alpha = match (has_highlight, state.is_link_highlighted(i)) {
			(true, true) => LINK_ALPHA + 0.35 * t,
			(true, false) => LINK_ALPHA - 0.25 * t,
			(false, _) => LINK_ALPHA,
		};
		let p = band.path;
		ctx.set_stroke_style_str(&with_alpha(&state.link_colors[i], alpha));
		ctx.set_line_width(band.width.max(1.0));
		ctx.begin_path();
		ctx.move_to(p.x0, p.y0);
		ctx.bezier_curve_to(p.cx0, p.y0, p.cx1, p.y1, p.x1, p.y1);
		ctx.stroke();
	}
}

fn draw_nodes(state: &SankeyState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	for (i, style) in state.styles.iter().enumerate() {
		let dimmed = has_highlight && !state.is_node_highlighted(i);
		ctx.set_global_alpha(if dimmed { 1.0 - 0.6 * t } else { 1.0 });
		let r = style.rect;
		ctx.set_fill_style_str(&style.fill);
		ctx.fill_rect(r.x, r.y, r.width, r.height);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_labels(state: &SankeyState, ctx: &CanvasRenderingContext2d) {
	ctx.set_shadow_color("white");
	ctx.set_shadow_offset_y(1.0);
	ctx.set_shadow_blur(2.0);
	for style in &state.styles {
		draw_text(ctx, &style.label);
		if let Some(value) = &style.value_label {
			draw_text(ctx, value);
		}
	}
	ctx.set_shadow_color("transparent");
	ctx.set_shadow_offset_y(0.0);
	ctx.set_shadow_blur(0.0);
}

fn draw_text(ctx: &CanvasRenderingContext2d, label: &TextLabel) {
	ctx.set_font(&label.font());
	ctx.set_text_align(label.anchor.canvas_align());
	ctx.set_fill_style_str(label.color);
	let _ = ctx.fill_text(&label.text, label.x, label.y);
}
