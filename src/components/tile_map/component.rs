use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use crate::context::AppContext;

#[derive(Default)]
struct DragState {
	active: bool,
	last_x: f64,
	last_y: f64,
	travel: f64,
}

// Drags shorter than this still count as a click.
const CLICK_SLOP: f64 = 4.0;

/// The map panel: a fullscreen canvas drawing slippy tiles plus the pin and
/// line overlays held by the shared [`MapHandle`](super::MapHandle).
#[component]
pub fn TileMapCanvas() -> impl IntoView {
	let app = expect_context::<StoredValue<AppContext, LocalStorage>>().get_value();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let drag: Rc<RefCell<DragState>> = Rc::new(RefCell::new(DragState::default()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (animate_init, resize_cb_init) = (animate.clone(), resize_cb.clone());

	let app_init = app.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = (
			window.inner_width().unwrap().as_f64().unwrap(),
			window.inner_height().unwrap().as_f64().unwrap(),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		app_init.map.with(|m| m.resize(w, h));

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let (app_resize, canvas_resize) = (app_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let win: Window = web_sys::window().unwrap();
			let (nw, nh) = (
				win.inner_width().unwrap().as_f64().unwrap(),
				win.inner_height().unwrap().as_f64().unwrap(),
			);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			app_resize.map.with(|m| m.resize(nw, nh));
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (app_anim, animate_inner) = (app_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			app_anim.map.with(|m| render::render(m, &ctx));
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let canvas_pos = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let drag_md = drag.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let (x, y) = canvas_pos(&ev);
		*drag_md.borrow_mut() = DragState {
			active: true,
			last_x: x,
			last_y: y,
			travel: 0.0,
		};
	};

	let (app_mm, drag_mm) = (app.clone(), drag.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let mut drag = drag_mm.borrow_mut();
		if !drag.active {
			return;
		}
		let (x, y) = canvas_pos(&ev);
		let (dx, dy) = (x - drag.last_x, y - drag.last_y);
		drag.last_x = x;
		drag.last_y = y;
		drag.travel += dx.abs() + dy.abs();
		app_mm.map.with(|m| m.pan_by(dx, dy));
	};

	let (app_mu, drag_mu) = (app.clone(), drag.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let was_click = {
			let mut drag = drag_mu.borrow_mut();
			let was_click = drag.active && drag.travel < CLICK_SLOP;
			drag.active = false;
			was_click
		};
		if was_click {
			let (x, y) = canvas_pos(&ev);
			app_mu.map.with(|m| {
				if let Some(pin) = m.pin_at(x, y) {
					m.toggle_popup(pin);
				}
			});
		}
	};

	let drag_ml = drag.clone();
	let on_mouseleave = move |_: MouseEvent| {
		drag_ml.borrow_mut().active = false;
	};

	let app_cm = app.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		let (x, y) = canvas_pos(&ev);
		let country = app_cm.map.with(|m| {
			m.pin_at(x, y).map(|pin| m.pins()[pin].country.clone())
		});
		if let Some(country) = country {
			app_cm.open_pin_menu(ev.page_x() as f64, ev.page_y() as f64, &country);
		}
	};

	let app_wh = app.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		app_wh.map.with(|m| {
			if ev.delta_y() > 0.0 {
				m.zoom_out();
			} else {
				m.zoom_in();
			}
		});
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:contextmenu=on_contextmenu
			on:wheel=on_wheel
		/>
	}
}
