//! Transient context menu listing the node ids behind a right-clicked pin.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use crate::context::AppContext;

/// Renders the single open menu (if any) at the pointer's page coordinates.
/// Any click elsewhere in the document dismisses it; picking an entry opens
/// the detail view for that node id.
#[component]
pub fn ContextMenu() -> impl IntoView {
	let app = expect_context::<StoredValue<AppContext, LocalStorage>>().get_value();
	let menu = app.menu;
	// The view closure below must be threadsafe; the Rc-holding context goes
	// into local storage and is only touched from event handlers.
	let app = StoredValue::new_local(app);
	let dismiss: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	{
		let dismiss_init = dismiss.clone();
		Effect::new(move |_| {
			*dismiss_init.borrow_mut() = Some(Closure::new(move || {
				menu.set(None);
			}));
			if let Some(ref cb) = *dismiss_init.borrow() {
				let document = web_sys::window().unwrap().document().unwrap();
				let _ =
					document.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
			}
		});
	}

	view! {
		{move || {
			menu.get().map(|state| {
				let entries = state
					.node_ids
					.iter()
					.map(|id| {
						let id = id.clone();
						let label = format!("ID: {id}");
						view! {
							<div
								class="context-menu-entry"
								on:click=move |_| app.with_value(|app| app.select_node(&id))
							>
								{label}
							</div>
						}
					})
					.collect_view();
				view! {
					<div
						class="context-menu"
						style:left=format!("{}px", state.x)
						style:top=format!("{}px", state.y)
					>
						{entries}
					</div>
				}
			})
		}}
	}
}
