use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::render;
use crate::context::AppContext;

/// The detail-view panel: a fullscreen canvas animating the diagram held by
/// the shared [`DiagramHandle`](super::DiagramHandle).
#[component]
pub fn DetailGraphCanvas() -> impl IntoView {
	let app = expect_context::<StoredValue<AppContext, LocalStorage>>().get_value();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (animate_init, resize_cb_init) = (animate.clone(), resize_cb.clone());

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
		app.diagram.with(|d| {
			d.resize(w, h);
			d.reseed(js_sys::Date::now() as u64);
		});

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let (app_resize, canvas_resize) = (app.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let win: Window = web_sys::window().unwrap();
			let (nw, nh) = (
				win.inner_width().unwrap().as_f64().unwrap(),
				win.inner_height().unwrap().as_f64().unwrap(),
			);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			app_resize.diagram.with(|d| d.resize(nw, nh));
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (app_anim, animate_inner) = (app.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			app_anim.diagram.with(|d| {
				if d.running {
					d.tick(0.016);
				}
				render::render(d, &ctx);
			});
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

	view! { <canvas node_ref=canvas_ref class="diagram-canvas" /> }
}
