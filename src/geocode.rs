//! Country-name geocoding against the public Nominatim search endpoint.

use std::cell::RefCell;
use std::collections::HashMap;

use gloo_net::http::Request;
use serde::Deserialize;
use thiserror::Error;

use crate::model::LatLng;

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Failures of a single lookup. An empty result set is not an error.
#[derive(Error, Debug)]
pub enum GeocodeError {
	#[error("geocode request failed: {0}")]
	Http(#[from] gloo_net::Error),

	#[error("unparsable coordinate {value:?} in geocode response")]
	BadCoordinate { value: String },
}

/// Nominatim serializes coordinates as JSON strings.
#[derive(Debug, Deserialize)]
struct SearchRow {
	lat: String,
	lon: String,
}

/// Stateless lookup-by-country-name gateway with a per-client result cache,
/// so repeated countries within and across renders hit the network once.
/// Negative results are cached too.
#[derive(Default)]
pub struct GeocodeClient {
	cache: RefCell<HashMap<String, Option<LatLng>>>,
}

impl GeocodeClient {
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolve a country name to the first matching coordinate pair, or
	/// `None` when the service knows no such country.
	pub async fn lookup(&self, country: &str) -> Result<Option<LatLng>, GeocodeError> {
		if let Some(cached) = self.cache.borrow().get(country) {
			return Ok(*cached);
		}

		let rows: Vec<SearchRow> = Request::get(SEARCH_URL)
			.query([("country", country), ("format", "json")])
			.send()
			.await?
			.json()
			.await?;

		let result = first_latlng(&rows)?;
		self.cache
			.borrow_mut()
			.insert(country.to_string(), result);
		Ok(result)
	}
}

fn first_latlng(rows: &[SearchRow]) -> Result<Option<LatLng>, GeocodeError> {
	let Some(row) = rows.first() else {
		return Ok(None);
	};
	let lat = parse_coordinate(&row.lat)?;
	let lon = parse_coordinate(&row.lon)?;
	Ok(Some(LatLng { lat, lon }))
}

fn parse_coordinate(value: &str) -> Result<f64, GeocodeError> {
	value.parse().map_err(|_| GeocodeError::BadCoordinate {
		value: value.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_row_wins() {
		let rows: Vec<SearchRow> = serde_json::from_str(
			r#"[{"lat":"51.1657","lon":"10.4515","display_name":"Deutschland"},
			    {"lat":"0.0","lon":"0.0"}]"#,
		)
		.unwrap();
		let hit = first_latlng(&rows).unwrap().unwrap();
		assert_eq!(hit.lat, 51.1657);
		assert_eq!(hit.lon, 10.4515);
	}

	#[test]
	fn empty_response_is_a_miss_not_an_error() {
		let rows: Vec<SearchRow> = serde_json::from_str("[]").unwrap();
		assert_eq!(first_latlng(&rows).unwrap(), None);
	}

	#[test]
	fn garbage_coordinates_are_an_error() {
		let rows = vec![SearchRow {
			lat: "fifty-one".into(),
			lon: "10.4".into(),
		}];
		let err = first_latlng(&rows).unwrap_err();
		assert!(matches!(err, GeocodeError::BadCoordinate { value } if value == "fifty-one"));
	}
}
