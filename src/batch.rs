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

//! Conversion of every GPX file in a directory.
//!
//! Files are converted one after another with [`convert_file`]. A file that
//! fails to convert is recorded in the [`BatchReport`] and does not stop the
//! remaining files.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{convert_file, Error};

/// Default extension of files picked up from the input directory.
pub const GPX_EXTENSION: &str = "gpx";
/// Default extension of files written to the output directory.
pub const GEOJSON_EXTENSION: &str = "geojson";

/// Settings for a [`Batch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOptions {
    /// Extension of input files, matched case-insensitively.
    pub input_extension: String,
    /// Extension given to output files.
    pub output_extension: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            input_extension: GPX_EXTENSION.to_string(),
            output_extension: GEOJSON_EXTENSION.to_string(),
        }
    }
}

/// Result of converting one file of a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<(), Error>,
}

/// Summary of a finished [`Batch`].
///
/// Displays as `"N/M converted"`.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of files attempted.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of files converted successfully.
    pub fn converted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Outcomes of the files that failed to convert.
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} converted", self.converted(), self.total())
    }
}

/// A directory of GPX files scheduled for conversion.
#[derive(Debug)]
pub struct Batch {
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    output_extension: String,
}

impl Batch {
    /// Prepare the conversion of `input_dir` into `output_dir`.
    ///
    /// Only the top level of `input_dir` is searched. Once it has been read,
    /// `output_dir` is created if it does not exist yet.
    pub fn scan(input_dir: &Path, output_dir: &Path, options: &BatchOptions) -> Result<Self, Error> {
        let inputs = find_inputs(input_dir, &options.input_extension)?;
        fs::create_dir_all(output_dir).map_err(Error::file(output_dir))?;
        debug!(dir = %input_dir.display(), count = inputs.len(), "found input files");

        Ok(Self {
            inputs,
            output_dir: output_dir.to_path_buf(),
            output_extension: options.output_extension.clone(),
        })
    }

    /// Files that [`Batch::run`] will convert.
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    /// Convert all inputs in order.
    ///
    /// `on_file` is called after each file with its outcome.
    pub fn run(self, mut on_file: impl FnMut(&FileOutcome)) -> BatchReport {
        let mut report = BatchReport::default();
        for input in self.inputs {
            let output = output_path(&input, &self.output_dir, &self.output_extension);
            let result = convert_file(&input, &output);
            let outcome = FileOutcome {
                input,
                output,
                result,
            };
            on_file(&outcome);
            report.outcomes.push(outcome);
        }
        report
    }
}

/// Convert every GPX file of `input_dir` into `output_dir`.
pub fn convert_directory(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<BatchReport, Error> {
    Ok(Batch::scan(input_dir, output_dir, options)?.run(|_| {}))
}

/// List the regular files in `dir` whose extension equals `extension`,
/// ignoring ASCII case. The result is sorted by path.
pub fn find_inputs(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
    let mut inputs = vec![];
    for entry in fs::read_dir(dir).map_err(Error::file(dir))? {
        let entry = entry.map_err(Error::file(dir))?;
        let path = entry.path();
        let is_file = match entry.file_type() {
            Ok(t) => t.is_file() || (t.is_symlink() && path.is_file()),
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable entry");
                continue;
            }
        };
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if is_file && matches {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Path in `output_dir` for converting `input`: its stem with `extension`.
pub fn output_path(input: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension);
    output_dir.join(name)
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::ErrorKind;

    fn gpx(lat: f64) -> String {
        format!(
            r#"<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1" creator="t">
            <trk><trkseg><trkpt lat="{lat}" lon="8.5"></trkpt></trkseg></trk></gpx>"#
        )
    }

    #[test]
    fn three_of_four_converted() {
        let input = TempDir::new("batch-in").unwrap();
        let output = TempDir::new("batch-out").unwrap();
        fs::write(input.path().join("a.gpx"), gpx(1.0)).unwrap();
        fs::write(input.path().join("b.GPX"), gpx(2.0)).unwrap();
        fs::write(input.path().join("c.gpx"), gpx(3.0)).unwrap();
        fs::write(input.path().join("d.gpx"), "broken").unwrap();
        fs::write(input.path().join("notes.txt"), "not a track").unwrap();

        let report = convert_directory(input.path(), output.path(), &BatchOptions::default())
            .unwrap();

        assert_eq!("3/4 converted", report.to_string());
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(1, failures.len());
        assert_eq!(input.path().join("d.gpx"), failures[0].input);
        assert_eq!(
            Some(ErrorKind::Parse),
            failures[0].result.as_ref().err().map(Error::kind)
        );

        let mut written: Vec<_> = fs::read_dir(output.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        written.sort();
        assert_eq!(vec!["a.geojson", "b.geojson", "c.geojson"], written);
    }

    #[test]
    fn output_dir_is_created() {
        let input = TempDir::new("batch-in").unwrap();
        let output = TempDir::new("batch-out").unwrap();
        let nested = output.path().join("nested").join("dir");
        fs::write(input.path().join("a.gpx"), gpx(1.0)).unwrap();

        let report = convert_directory(input.path(), &nested, &BatchOptions::default()).unwrap();

        assert_eq!(1, report.converted());
        assert!(nested.join("a.geojson").is_file());
    }

    #[test]
    fn outcomes_are_reported_in_order() {
        let input = TempDir::new("batch-in").unwrap();
        let output = TempDir::new("batch-out").unwrap();
        for name in ["b.gpx", "a.gpx", "c.gpx"] {
            fs::write(input.path().join(name), gpx(1.0)).unwrap();
        }

        let batch = Batch::scan(input.path(), output.path(), &BatchOptions::default()).unwrap();
        assert_eq!(3, batch.inputs().len());

        let mut seen = vec![];
        let report = batch.run(|outcome| seen.push(outcome.output.clone()));
        assert_eq!(
            vec![
                output.path().join("a.geojson"),
                output.path().join("b.geojson"),
                output.path().join("c.geojson")
            ],
            seen
        );
        assert_eq!(3, report.total());
    }

    #[test]
    fn subdirectories_are_not_searched() {
        let input = TempDir::new("batch-in").unwrap();
        let sub = input.path().join("inner.gpx");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.gpx"), gpx(1.0)).unwrap();

        assert!(find_inputs(input.path(), GPX_EXTENSION).unwrap().is_empty());
    }

    #[test]
    fn missing_input_dir_fails() {
        let output = TempDir::new("batch-out").unwrap();
        let missing = output.path().join("missing");

        let err = Batch::scan(&missing, output.path(), &BatchOptions::default()).unwrap_err();
        assert_eq!(ErrorKind::Io, err.kind());
    }

    #[test]
    fn failed_scan_creates_no_output_dir() {
        let root = TempDir::new("batch").unwrap();
        let missing = root.path().join("missing");
        let out = root.path().join("out");

        assert!(Batch::scan(&missing, &out, &BatchOptions::default()).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn output_path_replaces_extension() {
        assert_eq!(
            PathBuf::from("/out/ride.geojson"),
            output_path(Path::new("/in/ride.GPX"), Path::new("/out"), "geojson")
        );
        assert_eq!(
            PathBuf::from("/out/day.1.geojson"),
            output_path(Path::new("/in/day.1.gpx"), Path::new("/out"), "geojson")
        );
    }
}
