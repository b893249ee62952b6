use leptos::prelude::*;

use crate::components::context_menu::ContextMenu;
use crate::components::detail_graph::DetailGraphCanvas;
use crate::components::legend::Legend;
use crate::components::sidebar::Sidebar;
use crate::components::tile_map::TileMapCanvas;
use crate::components::toolbar::Toolbar;
use crate::context::{ActivePanel, AppContext};

/// The atlas page: map and diagram panels toggled by visibility, with the
/// sidebar, toolbar, legend, back button and context menu layered on top.
#[component]
pub fn Home() -> impl IntoView {
	let app = AppContext::new();
	// Context values must be threadsafe; the Rc-holding context rides in a
	// local StoredValue and consumers clone it back out.
	provide_context(StoredValue::new_local(app.clone()));

	let panel = app.panel;
	let display_when = move |wanted: ActivePanel| {
		if panel.get() == wanted { "block" } else { "none" }
	};

	// The ErrorBoundary children closure must be threadsafe; hold the
	// Rc-holding context in a local StoredValue, as in the context menu.
	let back = StoredValue::new_local(app.clone());

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="atlas-page">
				<div class="map-panel" style:display=move || display_when(ActivePanel::Map)>
					<TileMapCanvas />
				</div>
				<div class="diagram-panel" style:display=move || display_when(ActivePanel::Diagram)>
					<DetailGraphCanvas />
				</div>

				<Sidebar />
				<Toolbar />

				<div style:display=move || display_when(ActivePanel::Diagram)>
					<Legend />
					<button class="back-button" on:click=move |_| back.with_value(|app| app.close_detail())>
						"Back to map"
					</button>
				</div>

				<ContextMenu />
			</div>
		</ErrorBoundary>
	}
}
