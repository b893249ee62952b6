//! Web Mercator math shared by the map state and renderer.

use std::f64::consts::PI;

/// Side length of one slippy tile in CSS pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude beyond which the Mercator projection blows up.
pub const MAX_LAT: f64 = 85.05112878;

pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 19;

/// Pixel side length of the whole world at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
	TILE_SIZE * (1u64 << zoom) as f64
}

/// Project a coordinate to world pixels at `zoom`. Latitude is clamped to
/// the Mercator-representable range.
pub fn project(lat: f64, lon: f64, zoom: u8) -> (f64, f64) {
	let size = world_size(zoom);
	let lat = lat.clamp(-MAX_LAT, MAX_LAT);
	let x = (lon + 180.0) / 360.0 * size;
	let lat_rad = lat.to_radians();
	let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * size;
	(x, y)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64, zoom: u8) -> (f64, f64) {
	let size = world_size(zoom);
	let lon = x / size * 360.0 - 180.0;
	let n = PI * (1.0 - 2.0 * y / size);
	let lat = n.sinh().atan().to_degrees();
	(lat, lon)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn origin_projects_to_world_center() {
		let (x, y) = project(0.0, 0.0, 1);
		assert!((x - 256.0).abs() < 1e-9);
		assert!((y - 256.0).abs() < 1e-9);
	}

	#[test]
	fn project_unproject_round_trips() {
		for &(lat, lon) in &[(51.505, -0.09), (-33.86, 151.2), (64.1, -21.9)] {
			let (x, y) = project(lat, lon, 10);
			let (lat2, lon2) = unproject(x, y, 10);
			assert!((lat - lat2).abs() < 1e-9, "lat {lat} vs {lat2}");
			assert!((lon - lon2).abs() < 1e-9, "lon {lon} vs {lon2}");
		}
	}

	#[test]
	fn polar_latitudes_clamp_instead_of_diverging() {
		let (_, y) = project(90.0, 0.0, 0);
		let (_, y_max) = project(MAX_LAT, 0.0, 0);
		assert_eq!(y, y_max);
		assert!(y.is_finite());
	}

	#[test]
	fn world_doubles_per_zoom_level() {
		assert_eq!(world_size(0), 256.0);
		assert_eq!(world_size(3), 2048.0);
	}
}
