//! Canvas drawing for the tile map: base tiles, edge lines, pins, the open
//! popup and the attribution notice.

use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::scale::{self, TILE_SIZE};
use super::state::MapState;

const TILE_URL: &str = "https://tile.openstreetmap.org";
const ATTRIBUTION: &str = "© OpenStreetMap contributors";
const PIN_RADIUS: f64 = 7.0;

// Drop cached tiles from other zoom levels once the cache gets this large.
const TILE_CACHE_LIMIT: usize = 512;

pub fn render(state: &mut MapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#d4dadc");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	draw_tiles(state, ctx);
	draw_lines(state, ctx);
	draw_pins(state, ctx);
	draw_popup(state, ctx);
	draw_attribution(state, ctx);
}

fn draw_tiles(state: &mut MapState, ctx: &CanvasRenderingContext2d) {
	let zoom = state.zoom;
	let tiles_per_side = 1i64 << zoom;
	let (cx, cy) = scale::project(state.center.lat, state.center.lon, zoom);
	let (left, top) = (cx - state.width / 2.0, cy - state.height / 2.0);

	let x0 = (left / TILE_SIZE).floor() as i64;
	let x1 = ((left + state.width) / TILE_SIZE).floor() as i64;
	let y0 = (top / TILE_SIZE).floor() as i64;
	let y1 = ((top + state.height) / TILE_SIZE).floor() as i64;

	for tx in x0..=x1 {
		// Longitude wraps; latitude does not.
		let wrapped_x = tx.rem_euclid(tiles_per_side) as u32;
		for ty in y0..=y1 {
			if ty < 0 || ty >= tiles_per_side {
				continue;
			}
			let img = ensure_tile(state, zoom, wrapped_x, ty as u32);
			if img.complete() && img.natural_width() > 0 {
				let _ = ctx.draw_image_with_html_image_element(
					&img,
					tx as f64 * TILE_SIZE - left,
					ty as f64 * TILE_SIZE - top,
				);
			}
		}
	}
}

/// Look up a tile image, kicking off its download on first sight. The
/// animation loop picks completed tiles up on a later frame; a failed tile
/// just never completes and is never drawn.
fn ensure_tile(state: &mut MapState, z: u8, x: u32, y: u32) -> HtmlImageElement {
	if state.tiles.len() >= TILE_CACHE_LIMIT && !state.tiles.contains_key(&(z, x, y)) {
		state.tiles.retain(|key, _| key.0 == z);
	}
	state
		.tiles
		.entry((z, x, y))
		.or_insert_with(|| {
			let img = HtmlImageElement::new().unwrap();
			img.set_cross_origin(Some("anonymous"));
			img.set_src(&format!("{TILE_URL}/{z}/{x}/{y}.png"));
			img
		})
		.clone()
}

fn draw_lines(state: &MapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str("red");
	ctx.set_line_width(2.0);
	for &(a, b) in state.lines() {
		let (x1, y1) = state.to_screen(a);
		let (x2, y2) = state.to_screen(b);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_pins(state: &MapState, ctx: &CanvasRenderingContext2d) {
	for pin in state.pins() {
		let (x, y) = state.to_screen(pin.pos);
		ctx.begin_path();
		let _ = ctx.arc(x, y, PIN_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str("#2b6cb0");
		ctx.fill();
		ctx.set_stroke_style_str("white");
		ctx.set_line_width(2.0);
		ctx.stroke();
	}
}

fn draw_popup(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let Some(pin) = state.open_popup().and_then(|i| state.pins().get(i)) else {
		return;
	};
	let (x, y) = state.to_screen(pin.pos);

	let mut lines = vec![pin.country.clone()];
	lines.extend(pin.ids.iter().map(|id| format!("ID: {id}")));

	ctx.set_font("12px sans-serif");
	let mut box_w: f64 = 60.0;
	for line in &lines {
		if let Ok(metrics) = ctx.measure_text(line) {
			box_w = box_w.max(metrics.width() + 20.0);
		}
	}
	let line_h = 16.0;
	let box_h = lines.len() as f64 * line_h + 14.0;
	let (bx, by) = (x - box_w / 2.0, y - PIN_RADIUS - 8.0 - box_h);

	ctx.set_fill_style_str("white");
	ctx.set_stroke_style_str("#ccc");
	ctx.set_line_width(1.0);
	ctx.fill_rect(bx, by, box_w, box_h);
	ctx.stroke_rect(bx, by, box_w, box_h);

	ctx.set_fill_style_str("#222");
	for (i, line) in lines.iter().enumerate() {
		if i == 0 {
			ctx.set_font("bold 12px sans-serif");
		} else {
			ctx.set_font("12px sans-serif");
		}
		let _ = ctx.fill_text(line, bx + 10.0, by + 14.0 + i as f64 * line_h);
	}
}

fn draw_attribution(state: &MapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_font("11px sans-serif");
	let width = ctx
		.measure_text(ATTRIBUTION)
		.map(|m| m.width())
		.unwrap_or(160.0);
	let (x, y) = (state.width - width - 10.0, state.height - 6.0);
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.75)");
	ctx.fill_rect(x - 4.0, y - 12.0, width + 8.0, 16.0);
	ctx.set_fill_style_str("#333");
	let _ = ctx.fill_text(ATTRIBUTION, x, y);
}
