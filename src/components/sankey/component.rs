use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

use super::handle::DiagramHandle;
use super::resolve::resolve;
use super::state::Zoom;
use super::tooltip::{Tooltip, tooltip_for};
use crate::data::BudgetData;
use crate::export::SurfaceSize;

const FRAME_DT: f64 = 0.016;
const FALLBACK_VIEWPORT: (f64, f64) = (1200.0, 720.0);

/// Tooltip content with the pointer position it follows.
#[derive(Clone, Debug, PartialEq)]
struct TooltipView {
	tooltip: Tooltip,
	x: f64,
	y: f64,
}

fn tooltip_view(tip: TooltipView) -> AnyView {
	let style = format!("position: fixed; left: {}px; top: {}px;", tip.x + 14.0, tip.y + 14.0);
	match tip.tooltip {
		Tooltip::Link {
			source,
			target,
			amount,
		} => view! {
			<div class="sankey-tooltip" style=style>
				<div class="tooltip-endpoint">{source}</div>
				<div class="tooltip-arrow">"↓"</div>
				<div class="tooltip-endpoint">{target}</div>
				<p class="tooltip-amount">{amount}</p>
			</div>
		}
		.into_any(),
		Tooltip::Node { name, amount } => view! {
			<div class="sankey-tooltip" style=style>
				<p class="tooltip-title">{name}</p>
				<div class="tooltip-total">
					<span>"Montant total:"</span>
					<span class="tooltip-amount">{amount}</span>
				</div>
			</div>
		}
		.into_any(),
	}
}

#[component]
pub fn SankeyChart(
	#[prop(into)] data: Signal<BudgetData>,
	diagram: DiagramHandle,
) -> impl IntoView {
	let canvas_ref = diagram.node_ref();
	let zoom = RwSignal::new(Zoom::default());
	let tooltip = RwSignal::new(None::<TooltipView>);
	let viewport = RwSignal::new(0_u32);
	let resolved = Memo::new(move |_| data.with(resolve));

	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	// mount once: animation loop and viewport tracking
	let diagram_init = diagram.clone();
	Effect::new(move |_| {
		if canvas_ref.get().is_none() || animate.borrow().is_some() {
			return;
		}
		let (Some(window), Some(ctx)) = (web_sys::window(), diagram_init.context()) else {
			return;
		};

		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			viewport.update(|v| *v = v.wrapping_add(1));
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (diagram_anim, animate_inner) = (diagram_init.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			diagram_anim.frame(&ctx, FRAME_DT);
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// recompute on dataset, zoom or viewport change
	let diagram_layout = diagram.clone();
	Effect::new(move |_| {
		let graph = resolved.get();
		let factor = zoom.get().value();
		viewport.track();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Option<Window> = web_sys::window();

		let (base_w, base_h) = canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
			.filter(|&(w, h)| w > 0.0 && h > 0.0)
			.unwrap_or(FALLBACK_VIEWPORT);
		let pixel_ratio = window.map(|w| w.device_pixel_ratio()).unwrap_or(1.0);

		debug!("sankey relayout at {base_w}x{base_h}, zoom {factor}");
		diagram_layout.set_graph(graph);
		diagram_layout.fit_viewport(SurfaceSize {
			width: base_w * factor,
			height: base_h * factor,
			pixel_ratio,
		});
	});

	let diagram_mm = diagram.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		let next = diagram_mm.hover_at(x, y).map(|payload| TooltipView {
			tooltip: tooltip_for(&payload),
			x: ev.client_x() as f64,
			y: ev.client_y() as f64,
		});
		tooltip.set(next);
	};

	let diagram_ml = diagram.clone();
	let on_mouseleave = move |_: MouseEvent| {
		diagram_ml.clear_hover();
		tooltip.set(None);
	};

	view! {
		<div class="sankey-frame">
			<div class="sankey-zoom">
				<button
					title="Zoom arrière"
					disabled=move || !zoom.get().can_zoom_out()
					on:click=move |_| zoom.update(|z| *z = z.zoom_out())
				>
					"−"
				</button>
				<span class="sankey-zoom-level">{move || format!("{}%", zoom.get().percent())}</span>
				<button
					title="Zoom avant"
					disabled=move || !zoom.get().can_zoom_in()
					on:click=move |_| zoom.update(|z| *z = z.zoom_in())
				>
					"+"
				</button>
				<button title="Réinitialiser le zoom" on:click=move |_| zoom.update(|z| *z = z.reset())>
					"⟲"
				</button>
			</div>
			<div class="sankey-scroll" style="width: 100%; height: 100%; overflow: auto;">
				<canvas
					node_ref=canvas_ref
					class="sankey-canvas"
					on:mousemove=on_mousemove
					on:mouseleave=on_mouseleave
					style="display: block; cursor: pointer;"
				/>
			</div>
			{move || tooltip.get().map(tooltip_view)}
		</div>
	}
}
