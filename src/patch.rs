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

//! In-place editing of properties in written GeoJSON files.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::Error;

/// Property key set by [`add_location`].
pub const LOCATION_KEY: &str = "location";

/// Set `properties[key]` of the GeoJSON file at `path` to `value`.
///
/// An existing value for `key` is replaced. The rest of the document is kept
/// as is and not validated, except that it must have a top-level
/// `properties` object. The file is only rewritten if the document could be
/// read and patched.
pub fn set_property(path: &Path, key: &str, value: impl Into<Value>) -> Result<(), Error> {
    let text = fs::read_to_string(path).map_err(Error::file(path))?;
    let mut document: Value = serde_json::from_str(&text)?;

    let properties = document
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or(Error::MissingProperties)?;
    properties.insert(key.to_string(), value.into());
    debug!(path = %path.display(), key, "setting property");

    let mut patched = serde_json::to_string_pretty(&document)?;
    patched.push('\n');
    fs::write(path, patched).map_err(Error::file(path))
}

/// Set the `location` property of the GeoJSON file at `path`.
pub fn add_location(path: &Path, location: &str) -> Result<(), Error> {
    set_property(path, LOCATION_KEY, location)
}
