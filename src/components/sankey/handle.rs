use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::layout::LayoutConfig;
use super::render;
use super::resolve::ResolvedGraph;
use super::state::SankeyState;
use super::style::Palette;
use super::tooltip::HoverPayload;
use crate::export::SurfaceSize;

/// Viewport sizes offered while an export holds the surface wait here; the latest one wins.
#[derive(Debug, Default)]
struct ViewportLatch {
	held: bool,
	pending: Option<SurfaceSize>,
}

impl ViewportLatch {
	/// The size to apply now, if the surface is not held.
	fn offer(&mut self, size: SurfaceSize) -> Option<SurfaceSize> {
		if self.held {
			self.pending = Some(size);
			return None;
		}
		Some(size)
	}

	fn hold(&mut self) {
		self.held = true;
	}

	/// Release the hold, handing back the last size offered during it.
	fn release(&mut self) -> Option<SurfaceSize> {
		self.held = false;
		self.pending.take()
	}
}

/// Shared access to the mounted diagram: the chart draws through it, the exporter resizes and
/// rasterizes through it.
#[derive(Clone)]
pub struct DiagramHandle {
	state: Rc<RefCell<SankeyState>>,
	canvas: NodeRef<Canvas>,
	viewport: Rc<RefCell<ViewportLatch>>,
}

impl DiagramHandle {
	pub fn new(palette: Palette, config: LayoutConfig) -> Self {
		Self {
			state: Rc::new(RefCell::new(SankeyState::new(
				ResolvedGraph::default(),
				palette,
				config,
			))),
			canvas: NodeRef::new(),
			viewport: Rc::new(RefCell::new(ViewportLatch::default())),
		}
	}

	pub fn node_ref(&self) -> NodeRef<Canvas> {
		self.canvas
	}

	pub fn canvas(&self) -> Option<HtmlCanvasElement> {
		self.canvas.get_untracked().map(Into::into)
	}

	pub fn context(&self) -> Option<CanvasRenderingContext2d> {
		self.canvas()?
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
	}

	pub fn set_graph(&self, graph: ResolvedGraph) {
		self.state.borrow_mut().set_graph(graph);
	}

	pub fn snapshot(&self) -> SurfaceSize {
		let state = self.state.borrow();
		SurfaceSize {
			width: state.width,
			height: state.height,
			pixel_ratio: state.pixel_ratio,
		}
	}

	/// Resize both the canvas element and the layout it draws.
	pub fn apply(&self, size: SurfaceSize) {
		if let Some(canvas) = self.canvas() {
			canvas.set_width((size.width * size.pixel_ratio).round() as u32);
			canvas.set_height((size.height * size.pixel_ratio).round() as u32);
			let style = web_sys::HtmlElement::style(&canvas);
			let _ = style.set_property("width", &format!("{}px", size.width));
			let _ = style.set_property("height", &format!("{}px", size.height));
		}
		self.state
			.borrow_mut()
			.resize(size.width, size.height, size.pixel_ratio);
	}

	/// Resize to the on-screen viewport, deferred while an export holds the surface.
	pub fn fit_viewport(&self, size: SurfaceSize) {
		let ready = self.viewport.borrow_mut().offer(size);
		if let Some(size) = ready {
			self.apply(size);
		}
	}

	/// Stop or resume viewport-driven resizes. Resuming applies the latest deferred size.
	pub fn hold_viewport(&self, held: bool) {
		if held {
			self.viewport.borrow_mut().hold();
			return;
		}
		let deferred = self.viewport.borrow_mut().release();
		if let Some(size) = deferred {
			self.apply(size);
			self.render_now();
		}
	}

	/// Advance hover easing by `dt` seconds and draw.
	pub fn frame(&self, ctx: &CanvasRenderingContext2d, dt: f64) {
		let mut state = self.state.borrow_mut();
		state.tick(dt);
		render::render(&state, ctx);
	}

	/// Draw the current layout immediately, outside the animation loop.
	pub fn render_now(&self) -> bool {
		let Some(ctx) = self.context() else {
			return false;
		};
		render::render(&self.state.borrow(), &ctx);
		true
	}

	pub fn hover_at(&self, x: f64, y: f64) -> Option<HoverPayload> {
		let mut state = self.state.borrow_mut();
		let hit = state.hit_at(x, y);
		state.set_hover(hit);
		hit.and_then(|hit| state.payload(hit))
	}

	pub fn clear_hover(&self) {
		self.state.borrow_mut().set_hover(None);
	}
}
