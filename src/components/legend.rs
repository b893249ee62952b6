//! Country color legend for the detail diagram.

use leptos::prelude::*;

use crate::model::{COUNTRY_COLORS, DEFAULT_COLOR};

#[component]
pub fn Legend() -> impl IntoView {
	let rows = COUNTRY_COLORS
		.iter()
		.map(|&(country, color)| view! {
			<div class="legend-row">
				<span class="legend-swatch" style:background-color=color></span>
				{country}
			</div>
		})
		.collect_view();

	view! {
		<div class="legend">
			{rows}
			<div class="legend-row">
				<span class="legend-swatch" style:background-color=DEFAULT_COLOR></span>
				"Other"
			</div>
		</div>
	}
}
