use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::CanvasState;
use super::types::GraphData;
use crate::graph::{EventHandler, EventKind, Item};

type SharedState = Rc<RefCell<Option<CanvasState>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas that runs and draws a graph session for `data`.
#[component]
pub fn ForceGraphCanvas(
	/// Graph to lay out; a new value starts a new session.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Fill the window and follow its size.
	#[prop(default = false)]
	fullscreen: bool,
	/// Canvas width; defaults to the parent element's.
	#[prop(default = None)]
	width: Option<f64>,
	/// Canvas height; defaults to the parent element's.
	#[prop(default = None)]
	height: Option<f64>,
	/// Receives pointer events on vertices and the freeze notification once the layout settles.
	#[prop(optional)]
	on_event: Option<EventHandler>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
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

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas has no 2d context");
			return;
		};
		let mut session = match data.get().session(w, h) {
			Ok(session) => session,
			Err(err) => {
				error!("cannot build the graph: {err}");
				return;
			}
		};
		session.graph_mut().set_event_handler(on_event.clone());
		*state_init.borrow_mut() = Some(CanvasState::new(session));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(window)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let pressed = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(canvas) = pressed.borrow_mut().as_mut() {
			match canvas.vertex_at(x, y) {
				Some(vertex) => canvas.begin_drag(vertex, x, y),
				None => canvas.begin_pan(x, y),
			}
		}
	};

	let moved = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(canvas) = moved.borrow_mut().as_mut() {
			if canvas.drag.vertex.is_some() {
				canvas.drag_to(x, y);
			} else {
				let hovered = canvas.vertex_at(x, y);
				canvas.set_hover(hovered);
				canvas.pan_to(x, y);
			}
		}
	};

	let released = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(canvas) = released.borrow_mut().as_mut() {
			canvas.release();
		}
	};

	let double_clicked = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(canvas) = double_clicked.borrow().as_ref() {
			if let Some(vertex) = canvas.vertex_at(x, y) {
				canvas
					.session
					.graph()
					.notify(Item::Vertex(vertex), EventKind::DoubleClick);
			}
		}
	};

	let left = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(canvas) = left.borrow_mut().as_mut() {
			canvas.release();
			canvas.set_hover(None);
		}
	};

	let wheeled = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(canvas) = wheeled.borrow_mut().as_mut() {
			canvas.zoom_at(x, y, if ev.delta_y() > 0.0 { 0.9 } else { 1.1 });
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:dblclick=on_dblclick
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
