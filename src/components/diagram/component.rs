use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::animator::{CircuitAnimator, DiagramSource};
use super::render::{self, Viewport};
use super::scheduler::RafScheduler;
use super::state::DiagramState;

struct Surface {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(
		dim(window.inner_width(), 800.0),
		dim(window.inner_height(), 600.0),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Draws the diagram and plays the circuit animation whenever
/// `config.enabled` is set on `state`.
#[component]
pub fn DiagramCanvas(
	state: RwSignal<DiagramState>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let scheduler = RafScheduler::new();
	let source = DiagramSource::new(
		move || state.with_untracked(|s| s.shapes().to_vec()),
		move || state.with_untracked(|s| s.connections().to_vec()),
		move || state.with_untracked(|s| s.config().clone()),
	);
	let animator = Rc::new(RefCell::new(CircuitAnimator::new(
		source,
		scheduler.clone(),
	)));
	let surface: Rc<RefCell<Option<Surface>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let redraw = {
		let (animator, surface) = (animator.clone(), surface.clone());
		Rc::new(move || {
			let surface = surface.borrow();
			let Some(s) = surface.as_ref() else {
				return;
			};
			let animator = animator.borrow();
			let view = Viewport {
				width: s.width,
				height: s.height,
				rotation: animator.rotation(),
			};
			state.with_untracked(|st| render::render(st, animator.payload(), &view, &s.ctx));
		})
	};

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		// tracks every edit so idle diagrams redraw too
		let enabled = state.with(|s| s.config().enabled);

		if surface.borrow().is_none() {
			let canvas: HtmlCanvasElement = canvas.into();
			let Some(window) = web_sys::window() else {
				return;
			};
			let (w, h) = if fullscreen {
				window_size(&window)
			} else {
				(
					width.unwrap_or_else(|| {
						canvas
							.parent_element()
							.map(|p| p.client_width() as f64)
							.unwrap_or(800.0)
					}),
					height.unwrap_or_else(|| {
						canvas
							.parent_element()
							.map(|p| p.client_height() as f64)
							.unwrap_or(600.0)
					}),
				)
			};
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			let Some(ctx) = context_2d(&canvas) else {
				error!("canvas has no 2d context");
				return;
			};
			*surface.borrow_mut() = Some(Surface {
				ctx,
				width: w,
				height: h,
			});
			debug!("diagram canvas mounted at {w}x{h}");

			let (animator_cb, redraw_cb) = (animator.clone(), redraw.clone());
			scheduler.set_callback(Closure::new(move |now: f64| {
				animator_cb.borrow_mut().tick(now);
				redraw_cb();
			}));

			if fullscreen {
				let (surface_resize, redraw_resize) = (surface.clone(), redraw.clone());
				*resize_cb.borrow_mut() = Some(Closure::new(move || {
					let Some(win) = web_sys::window() else {
						return;
					};
					let (nw, nh) = window_size(&win);
					canvas.set_width(nw as u32);
					canvas.set_height(nh as u32);
					if let Some(ref mut s) = *surface_resize.borrow_mut() {
						s.width = nw;
						s.height = nh;
					}
					redraw_resize();
				}));
				if let Some(ref cb) = *resize_cb.borrow() {
					let _ = window
						.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
		}

		animator.borrow_mut().observe_enabled(enabled);
		redraw();
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="diagram-canvas"
			style="display: block;"
		/>
	}
}
