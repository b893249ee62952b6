//! Canvas drawing for the detail diagram: black arrowed edges and
//! country-colored ellipses.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{DiagramState, NODE_RADIUS};

pub fn render(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#fafafa");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let arrow_size = 10.0;
	ctx.set_stroke_style_str("black");
	ctx.set_fill_style_str("black");
	ctx.set_line_width(2.0);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	});
}

fn draw_nodes(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	state.graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		ctx.begin_path();
		let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.data.user_data.color);
		ctx.fill();
		if node.data.user_data.selected {
			ctx.set_stroke_style_str("#1a1a1a");
			ctx.set_line_width(3.0);
		} else {
			ctx.set_stroke_style_str("#555");
			ctx.set_line_width(1.0);
		}
		ctx.stroke();

		ctx.set_fill_style_str("#1a1a1a");
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(&node.data.user_data.id, x + NODE_RADIUS + 4.0, y + 4.0);
	});
}
