//! Collapsible sidebar with the JSON input box.

use leptos::prelude::*;
use web_sys::HtmlTextAreaElement;

use crate::context::AppContext;

const PLACEHOLDER: &str = r#"{"nodes": [{"id": "a", "country": "Germany"}], "edges": [{"source": "a", "target": "a"}]}"#;

#[component]
pub fn Sidebar() -> impl IntoView {
	let app = expect_context::<StoredValue<AppContext, LocalStorage>>().get_value();
	let collapsed = RwSignal::new(false);
	let input_ref = NodeRef::<leptos::html::Textarea>::new();

	let on_submit = move |_| {
		let Some(textarea) = input_ref.get() else {
			return;
		};
		let textarea: HtmlTextAreaElement = textarea.into();
		app.submit_json(&textarea.value());
	};

	view! {
		<button class="btn-open-sidebar" on:click=move |_| collapsed.set(false)>
			"Edit graph"
		</button>
		<aside class="sidebar" class:collapsed=move || collapsed.get()>
			<button class="btn-close-sidebar" on:click=move |_| collapsed.set(true)>
				"Close"
			</button>
			<h2>"Country graph"</h2>
			<p>"Paste a JSON document with nodes and edges, then render it."</p>
			<textarea node_ref=input_ref placeholder=PLACEHOLDER></textarea>
			<button class="btn-submit-json" on:click=on_submit>
				"Render"
			</button>
		</aside>
	}
}
