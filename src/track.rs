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

//! Parser-independent model of recorded tracks.
//!
//! The converter only ever looks at these types. A parsed [`gpx::Gpx`] is
//! turned into a [`TrackDocument`] with [`From`], discarding everything the
//! conversion has no use for (waypoints, routes, timestamps, links, ...).

use gpx::{Gpx, TrackSegment, Waypoint};

/// Ordered tracks of one input file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackDocument {
    pub tracks: Vec<Track>,
}

/// A recorded path, made of one or more segments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    pub description: Option<String>,
    pub segments: Vec<Segment>,
}

/// Continuous run of points. Order defines the path geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Segment {
    pub points: Vec<Point>,
}

/// A single position fix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
    /// `None` means no elevation was recorded, which is not the same as zero.
    pub elevation: Option<f64>,
}

impl Point {
    /// Create a point from its coordinates.
    pub fn new(longitude: f64, latitude: f64, elevation: Option<f64>) -> Self {
        Self {
            longitude,
            latitude,
            elevation,
        }
    }
}

impl TrackDocument {
    /// Iterate over all points of all tracks and segments in document order.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.tracks
            .iter()
            .flat_map(|track| track.segments.iter())
            .flat_map(|segment| segment.points.iter())
    }
}

impl From<Gpx> for TrackDocument {
    fn from(gpx: Gpx) -> Self {
        let tracks = gpx
            .tracks
            .into_iter()
            .map(|track| Track {
                name: track.name,
                description: track.description,
                segments: track.segments.into_iter().map(Segment::from).collect(),
            })
            .collect();

        Self { tracks }
    }
}

impl From<TrackSegment> for Segment {
    fn from(segment: TrackSegment) -> Self {
        Self {
            points: segment.points.iter().map(Point::from).collect(),
        }
    }
}

impl From<&Waypoint> for Point {
    fn from(waypoint: &Waypoint) -> Self {
        let point = waypoint.point();
        Self::new(point.x(), point.y(), waypoint.elevation)
    }
}
