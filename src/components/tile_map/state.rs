//! Map view state: center/zoom, pins, lines, popup and the tile cache.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use web_sys::HtmlImageElement;

use super::scale::{self, MAX_ZOOM, MIN_ZOOM};
use crate::model::LatLng;

/// Initial view matching the original page: roughly London, zoomed out to
/// the whole world.
pub const DEFAULT_CENTER: LatLng = LatLng {
	lat: 51.505,
	lon: -0.09,
};
pub const DEFAULT_ZOOM: u8 = 2;

/// Screen-space hit radius for pin clicks.
pub const PIN_HIT_RADIUS: f64 = 12.0;

const FIT_PADDING: f64 = 40.0;

/// A running min/max box over extended coordinates. Invalid (fit is a no-op)
/// until at least one point has been extended into it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatLngBounds {
	min_lat: f64,
	max_lat: f64,
	min_lon: f64,
	max_lon: f64,
	valid: bool,
}

impl LatLngBounds {
	pub fn extend(&mut self, p: LatLng) {
		if self.valid {
			self.min_lat = self.min_lat.min(p.lat);
			self.max_lat = self.max_lat.max(p.lat);
			self.min_lon = self.min_lon.min(p.lon);
			self.max_lon = self.max_lon.max(p.lon);
		} else {
			*self = Self {
				min_lat: p.lat,
				max_lat: p.lat,
				min_lon: p.lon,
				max_lon: p.lon,
				valid: true,
			};
		}
	}

	pub fn is_valid(&self) -> bool {
		self.valid
	}

	pub fn center(&self) -> LatLng {
		LatLng {
			lat: (self.min_lat + self.max_lat) / 2.0,
			lon: (self.min_lon + self.max_lon) / 2.0,
		}
	}

	pub fn corners(&self) -> (LatLng, LatLng) {
		(
			LatLng {
				lat: self.min_lat,
				lon: self.min_lon,
			},
			LatLng {
				lat: self.max_lat,
				lon: self.max_lon,
			},
		)
	}
}

/// One placed marker. Several node ids sharing a country merge into one pin;
/// the popup lists them all.
#[derive(Clone, Debug, PartialEq)]
pub struct Pin {
	pub pos: LatLng,
	pub country: String,
	pub ids: Vec<String>,
}

pub struct MapState {
	pub center: LatLng,
	pub zoom: u8,
	pub width: f64,
	pub height: f64,
	pins: Vec<Pin>,
	lines: Vec<(LatLng, LatLng)>,
	open_popup: Option<usize>,
	pub(super) tiles: HashMap<(u8, u32, u32), HtmlImageElement>,
}

impl MapState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			center: DEFAULT_CENTER,
			zoom: DEFAULT_ZOOM,
			width,
			height,
			pins: Vec::new(),
			lines: Vec::new(),
			open_popup: None,
			tiles: HashMap::new(),
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn set_view(&mut self, center: LatLng, zoom: u8) {
		self.center = center;
		self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
	}

	pub fn zoom_in(&mut self) {
		self.zoom = (self.zoom + 1).min(MAX_ZOOM);
	}

	pub fn zoom_out(&mut self) {
		self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
	}

	/// Shift the view by a screen-space drag delta: the map content follows
	/// the cursor, so the center moves the opposite way.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		let (wx, wy) = scale::project(self.center.lat, self.center.lon, self.zoom);
		let (lat, lon) = scale::unproject(wx - dx, wy - dy, self.zoom);
		self.center = LatLng { lat, lon };
	}

	/// Screen position of a coordinate relative to the canvas origin.
	pub fn to_screen(&self, p: LatLng) -> (f64, f64) {
		let (wx, wy) = scale::project(p.lat, p.lon, self.zoom);
		let (cx, cy) = scale::project(self.center.lat, self.center.lon, self.zoom);
		(self.width / 2.0 + wx - cx, self.height / 2.0 + wy - cy)
	}

	/// Remove every pin and line and close any popup. Cached tiles survive.
	pub fn clear_overlays(&mut self) {
		self.pins.clear();
		self.lines.clear();
		self.open_popup = None;
	}

	/// Place a pin, or merge into the existing pin for the same country by
	/// appending the node ids to its popup.
	pub fn add_pin(&mut self, pos: LatLng, country: &str, ids: &[String]) {
		if let Some(pin) = self.pins.iter_mut().find(|p| p.country == country) {
			pin.ids.extend(ids.iter().cloned());
		} else {
			self.pins.push(Pin {
				pos,
				country: country.to_string(),
				ids: ids.to_vec(),
			});
		}
	}

	pub fn add_line(&mut self, a: LatLng, b: LatLng) {
		self.lines.push((a, b));
	}

	pub fn pins(&self) -> &[Pin] {
		&self.pins
	}

	pub fn lines(&self) -> &[(LatLng, LatLng)] {
		&self.lines
	}

	pub fn open_popup(&self) -> Option<usize> {
		self.open_popup
	}

	pub fn toggle_popup(&mut self, pin: usize) {
		self.open_popup = if self.open_popup == Some(pin) {
			None
		} else {
			Some(pin)
		};
	}

	/// Bounds over every currently placed pin.
	pub fn pin_bounds(&self) -> LatLngBounds {
		let mut bounds = LatLngBounds::default();
		for pin in &self.pins {
			bounds.extend(pin.pos);
		}
		bounds
	}

	/// Recenter on `bounds` at the highest zoom level where the whole box
	/// fits the canvas with some padding. No-op on an invalid box.
	pub fn fit_bounds(&mut self, bounds: &LatLngBounds) {
		if !bounds.is_valid() {
			return;
		}
		let (avail_w, avail_h) = (
			(self.width - FIT_PADDING).max(1.0),
			(self.height - FIT_PADDING).max(1.0),
		);
		let (min, max) = bounds.corners();
		let mut fitted = MIN_ZOOM;
		for zoom in (MIN_ZOOM..=MAX_ZOOM).rev() {
			let (x0, y0) = scale::project(max.lat, min.lon, zoom);
			let (x1, y1) = scale::project(min.lat, max.lon, zoom);
			if (x1 - x0) <= avail_w && (y1 - y0) <= avail_h {
				fitted = zoom;
				break;
			}
		}
		self.set_view(bounds.center(), fitted);
	}

	/// Topmost pin within [`PIN_HIT_RADIUS`] of a canvas position.
	pub fn pin_at(&self, x: f64, y: f64) -> Option<usize> {
		let mut found = None;
		for (i, pin) in self.pins.iter().enumerate() {
			let (px, py) = self.to_screen(pin.pos);
			let (dx, dy) = (px - x, py - y);
			if (dx * dx + dy * dy).sqrt() < PIN_HIT_RADIUS {
				found = Some(i);
			}
		}
		found
	}
}

/// The single live map state, shared by the canvas component, the toolbar
/// and the render pipeline. Created once per page by the application context.
#[derive(Clone)]
pub struct MapHandle(Rc<RefCell<MapState>>);

impl MapHandle {
	pub fn new() -> Self {
		Self(Rc::new(RefCell::new(MapState::new(800.0, 600.0))))
	}

	pub fn with<R>(&self, f: impl FnOnce(&mut MapState) -> R) -> R {
		f(&mut self.0.borrow_mut())
	}
}

impl Default for MapHandle {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn latlng(lat: f64, lon: f64) -> LatLng {
		LatLng { lat, lon }
	}

	#[test]
	fn bounds_start_invalid_and_grow() {
		let mut bounds = LatLngBounds::default();
		assert!(!bounds.is_valid());
		bounds.extend(latlng(10.0, 20.0));
		assert!(bounds.is_valid());
		assert_eq!(bounds.center(), latlng(10.0, 20.0));
		bounds.extend(latlng(-10.0, 40.0));
		assert_eq!(bounds.center(), latlng(0.0, 30.0));
	}

	#[test]
	fn pins_merge_by_country() {
		let mut map = MapState::new(800.0, 600.0);
		map.add_pin(latlng(51.0, 10.0), "Germany", &["a".into()]);
		map.add_pin(latlng(51.0, 10.0), "Germany", &["b".into()]);
		map.add_pin(latlng(46.0, 2.0), "France", &["c".into()]);
		assert_eq!(map.pins().len(), 2);
		assert_eq!(map.pins()[0].ids, vec!["a", "b"]);
	}

	#[test]
	fn clear_overlays_removes_pins_lines_and_popup() {
		let mut map = MapState::new(800.0, 600.0);
		map.add_pin(latlng(51.0, 10.0), "Germany", &["a".into()]);
		map.add_line(latlng(51.0, 10.0), latlng(46.0, 2.0));
		map.toggle_popup(0);
		map.clear_overlays();
		assert!(map.pins().is_empty());
		assert!(map.lines().is_empty());
		assert_eq!(map.open_popup(), None);
		assert!(!map.pin_bounds().is_valid());
	}

	#[test]
	fn fit_bounds_ignores_an_invalid_box() {
		let mut map = MapState::new(800.0, 600.0);
		let before = (map.center, map.zoom);
		map.fit_bounds(&LatLngBounds::default());
		assert_eq!((map.center, map.zoom), before);
	}

	#[test]
	fn fit_bounds_picks_the_highest_zoom_that_fits() {
		let mut map = MapState::new(800.0, 600.0);
		let mut bounds = LatLngBounds::default();
		bounds.extend(latlng(51.0, 10.0));
		bounds.extend(latlng(46.0, 2.0));
		map.fit_bounds(&bounds);
		assert_eq!(map.center, bounds.center());
		// The fitted span must actually fit, and one level deeper must not.
		let (min, max) = bounds.corners();
		let (x0, _) = scale::project(max.lat, min.lon, map.zoom);
		let (x1, _) = scale::project(min.lat, max.lon, map.zoom);
		assert!(x1 - x0 <= map.width - 40.0);
		let (nx0, ny0) = scale::project(max.lat, min.lon, map.zoom + 1);
		let (nx1, ny1) = scale::project(min.lat, max.lon, map.zoom + 1);
		assert!(nx1 - nx0 > map.width - 40.0 || ny1 - ny0 > map.height - 40.0);
	}

	#[test]
	fn zoom_clamps_to_the_tile_range() {
		let mut map = MapState::new(800.0, 600.0);
		map.set_view(DEFAULT_CENTER, 0);
		map.zoom_out();
		assert_eq!(map.zoom, 0);
		map.set_view(DEFAULT_CENTER, 19);
		map.zoom_in();
		assert_eq!(map.zoom, 19);
	}

	#[test]
	fn pan_moves_the_center_opposite_the_drag() {
		let mut map = MapState::new(800.0, 600.0);
		map.set_view(latlng(0.0, 0.0), 4);
		map.pan_by(100.0, 0.0);
		// Dragging content to the right reveals territory to the west.
		assert!(map.center.lon < 0.0);
		assert!((map.center.lat).abs() < 1e-9);
	}

	#[test]
	fn pin_hit_testing_respects_the_radius() {
		let mut map = MapState::new(800.0, 600.0);
		map.set_view(latlng(0.0, 0.0), 4);
		map.add_pin(latlng(0.0, 0.0), "Germany", &["a".into()]);
		assert_eq!(map.pin_at(400.0, 300.0), Some(0));
		assert_eq!(map.pin_at(405.0, 305.0), Some(0));
		assert_eq!(map.pin_at(450.0, 300.0), None);
	}

	#[test]
	fn popup_toggles_per_pin() {
		let mut map = MapState::new(800.0, 600.0);
		map.add_pin(latlng(0.0, 0.0), "Germany", &["a".into()]);
		map.toggle_popup(0);
		assert_eq!(map.open_popup(), Some(0));
		map.toggle_popup(0);
		assert_eq!(map.open_popup(), None);
	}
}
