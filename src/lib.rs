// Copyright 2021, 2022, 2023 Viktor Reusch
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

//! Library for converting from [GPX](https://www.topografix.com/gpx.asp) to
//! [GeoJSON](https://geojson.org/).
//!
//! It reads in GPX tracks and converts them to a single GeoJSON _Feature_
//! with _LineString_ geometry. All tracks and segments of a file are joined
//! into one line.
//!
//! See [`convert`] for information on how to use this library. Directories are
//! handled by [`batch`], and existing output can be amended with [`patch`].

pub mod batch;
pub mod feature;
pub mod patch;
pub mod track;

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use gpx::errors::GpxError;
use thiserror::Error;
use tracing::debug;

pub use feature::{Coordinate, Feature, Geometry, Properties};
pub use track::{Point, Segment, Track, TrackDocument};

/// Error returned from the functions of this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// GPX reading failed.
    #[error("reading GPX failed: {0}")]
    Gpx(#[from] GpxError),
    /// The document does not contain a single track point.
    #[error("no coordinates found")]
    NoCoordinates,
    /// GeoJSON reading or writing failed.
    #[error("processing GeoJSON failed: {0}")]
    Json(#[from] serde_json::Error),
    /// A GeoJSON document to be patched has no `properties` object.
    #[error("GeoJSON document has no properties object")]
    MissingProperties,
    /// Accessing a file or directory failed.
    #[error("{}: {source}", .path.display())]
    File { path: PathBuf, source: io::Error },
    /// Writing to the output failed.
    #[error("writing output failed: {0}")]
    Io(#[from] io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be parsed as GPX.
    Parse,
    /// The input was parsed but yields no geometry.
    Conversion,
    /// A file could not be opened, read, written or created.
    Io,
    /// A GeoJSON document is malformed.
    Format,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Gpx(_) => ErrorKind::Parse,
            Error::NoCoordinates => ErrorKind::Conversion,
            Error::Json(_) | Error::MissingProperties => ErrorKind::Format,
            Error::File { .. } | Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Attach `path` to an I/O error.
    pub(crate) fn file(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::File { path, source }
    }
}

/// Read a GPX file and write a GeoJSON file.
///
/// A complete GPX file is read from `source`. The converted _Feature_ is
/// written to `sink` as pretty-printed JSON followed by a newline.
/// `default_name` becomes the feature name unless the first track has a
/// non-empty name of its own.
///
/// Nothing is written to `sink` if reading or converting fails.
///
/// # Example
/// ```
/// # use gpx_geojson_convert::convert;
/// #
/// let source = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1" creator="doc">
///     <trk><name>Morning Run</name><trkseg>
///         <trkpt lat="37.4" lon="-122.1"><ele>10</ele></trkpt>
///         <trkpt lat="37.5" lon="-122.2"></trkpt>
///     </trkseg></trk>
/// </gpx>
/// "#;
/// let mut sink = vec![];
///
/// convert(source.as_bytes(), &mut sink, "track").expect("conversion failed");
///
/// let json = String::from_utf8(sink).expect("GeoJSON data is not valid UTF-8");
/// assert!(json.contains(r#""type": "LineString""#));
/// assert!(json.contains("-122.1"));
/// assert!(json.contains("Morning Run"));
/// ```
pub fn convert(source: impl Read, mut sink: impl Write, default_name: &str) -> Result<(), Error> {
    let document = TrackDocument::from(gpx::read(source)?);
    let feature = convert_document(&document, default_name)?;

    serde_json::to_writer_pretty(&mut sink, &feature)?;
    writeln!(&mut sink)?;
    sink.flush()?;

    Ok(())
}

/// Convert a parsed `document` to a GeoJSON _Feature_.
///
/// The points of all tracks and segments are concatenated into a single
/// _LineString_. Name and description are taken from the first track, where
/// a missing or empty name falls back to `default_name` and a missing
/// description to an empty string.
pub fn convert_document(document: &TrackDocument, default_name: &str) -> Result<Feature, Error> {
    let coordinates: Vec<Coordinate> = document.points().map(Coordinate::from).collect();
    if coordinates.is_empty() {
        return Err(Error::NoCoordinates);
    }
    debug!(points = coordinates.len(), "flattened track points");

    let first = document.tracks.first();
    let name = first
        .and_then(|t| t.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default_name.to_string());
    let description = first
        .and_then(|t| t.description.clone())
        .unwrap_or_default();

    Ok(Feature {
        properties: Properties { name, description },
        geometry: Geometry::LineString { coordinates },
    })
}

/// Convert the GPX file at `input` to a GeoJSON file at `output`.
///
/// The feature name defaults to the file stem of `input`. The conversion
/// happens completely in memory before `output` is created, so a failed
/// conversion leaves no output file behind.
pub fn convert_file(input: &Path, output: &Path) -> Result<(), Error> {
    let source = fs::read(input).map_err(Error::file(input))?;
    let mut sink = vec![];
    convert(source.as_slice(), &mut sink, &default_name(input))?;
    debug!(input = %input.display(), output = %output.display(), "writing GeoJSON");

    let mut file = BufWriter::new(File::create(output).map_err(Error::file(output))?);
    file.write_all(&sink)
        .and_then(|()| file.flush())
        .map_err(Error::file(output))
}

/// Feature name used for a file without a named track: its stem.
pub fn default_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
