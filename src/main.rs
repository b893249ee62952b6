//! Binary entrypoint mounting the client-side app.

use country_graph_atlas::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
