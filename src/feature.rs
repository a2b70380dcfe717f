// Copyright 2023 Viktor Reusch
//
// This file is part of gpx_geojson_convert.
//
// gpx_geojson_convert is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// gpx_geojson_convert is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with gpx_geojson_convert. If not, see <https://www.gnu.org/licenses/>.

//! The subset of [GeoJSON](https://www.rfc-editor.org/rfc/rfc7946) written by
//! this crate: a single _Feature_ with _LineString_ geometry.

use serde::{Deserialize, Serialize};

use crate::track::Point;

/// Use double precision for coordinate values.
pub type CoordValue = f64;

/// A GeoJSON _Feature_.
///
/// Serializes as `{"type": "Feature", "properties": ..., "geometry": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub properties: Properties,
    pub geometry: Geometry,
}

/// Properties derived from the first track of a document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub name: String,
    pub description: String,
}

/// Geometry of a [`Feature`]. Only _LineString_ is ever produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<Coordinate> },
}

/// A GeoJSON position: `[longitude, latitude]` or
/// `[longitude, latitude, elevation]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<CoordValue>", try_from = "Vec<CoordValue>")]
pub struct Coordinate {
    pub longitude: CoordValue,
    pub latitude: CoordValue,
    pub elevation: Option<CoordValue>,
}

impl Geometry {
    /// Positions of the line in order.
    pub fn coordinates(&self) -> &[Coordinate] {
        match self {
            Geometry::LineString { coordinates } => coordinates,
        }
    }
}

impl From<&Point> for Coordinate {
    fn from(point: &Point) -> Self {
        Self {
            longitude: point.longitude,
            latitude: point.latitude,
            elevation: point.elevation,
        }
    }
}

impl From<Coordinate> for Vec<CoordValue> {
    fn from(coord: Coordinate) -> Self {
        let mut position = vec![coord.longitude, coord.latitude];
        position.extend(coord.elevation);
        position
    }
}

impl TryFrom<Vec<CoordValue>> for Coordinate {
    type Error = String;

    fn try_from(position: Vec<CoordValue>) -> Result<Self, Self::Error> {
        match position[..] {
            [longitude, latitude] => Ok(Self {
                longitude,
                latitude,
                elevation: None,
            }),
            [longitude, latitude, elevation] => Ok(Self {
                longitude,
                latitude,
                elevation: Some(elevation),
            }),
            _ => Err(format!(
                "position must have 2 or 3 elements, found {}",
                position.len()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn coordinate_length_follows_elevation() {
        let with = Coordinate::from(&Point::new(8.5, 47.3, Some(408.0)));
        let without = Coordinate::from(&Point::new(8.5, 47.3, None));

        assert_eq!(json!([8.5, 47.3, 408.0]), serde_json::to_value(with).unwrap());
        assert_eq!(json!([8.5, 47.3]), serde_json::to_value(without).unwrap());
    }

    #[test]
    fn zero_elevation_is_kept() {
        let coord = Coordinate::from(&Point::new(0.0, 0.0, Some(0.0)));
        assert_eq!(json!([0.0, 0.0, 0.0]), serde_json::to_value(coord).unwrap());
    }

    #[test]
    fn bad_position_length_is_rejected() {
        assert!(serde_json::from_value::<Coordinate>(json!([1.0])).is_err());
        assert!(serde_json::from_value::<Coordinate>(json!([1.0, 2.0, 3.0, 4.0])).is_err());
    }

    #[test]
    fn feature_shape() {
        let feature = Feature {
            properties: Properties {
                name: "Loop".to_string(),
                description: String::new(),
            },
            geometry: Geometry::LineString {
                coordinates: vec![Coordinate::from(&Point::new(1.0, 2.0, None))],
            },
        };

        assert_eq!(
            json!({
                "type": "Feature",
                "properties": {"name": "Loop", "description": ""},
                "geometry": {"type": "LineString", "coordinates": [[1.0, 2.0]]}
            }),
            serde_json::to_value(&feature).unwrap()
        );
    }

    #[test]
    fn feature_is_read_back() {
        let value = json!({
            "type": "Feature",
            "properties": {"name": "Loop", "description": "", "location": "Bern"},
            "geometry": {"type": "LineString", "coordinates": [[1.0, 2.0, 3.0]]}
        });

        let feature: Feature = serde_json::from_value(value).unwrap();
        assert_eq!("Loop", feature.properties.name);
        assert_eq!(
            &[Coordinate {
                longitude: 1.0,
                latitude: 2.0,
                elevation: Some(3.0)
            }],
            feature.geometry.coordinates()
        );
    }
}
