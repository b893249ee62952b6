//! Map zoom and fit controls.

use leptos::prelude::*;

use crate::context::AppContext;

#[component]
pub fn Toolbar() -> impl IntoView {
	let app = expect_context::<StoredValue<AppContext, LocalStorage>>().get_value();
	let (zoom_in, zoom_out, fit) = (app.clone(), app.clone(), app);

	view! {
		<div class="toolbar">
			<button class="btn-increase-zoom" on:click=move |_| zoom_in.zoom_in()>
				"+"
			</button>
			<button class="btn-decrease-zoom" on:click=move |_| zoom_out.zoom_out()>
				"-"
			</button>
			<button class="btn-fit-graph" on:click=move |_| fit.fit_pins()>
				"Fit"
			</button>
		</div>
	}
}
