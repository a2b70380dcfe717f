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

//! This is a very simple command-line interface for the GPX-to-GeoJSON
//! converter.

use std::{io, path::Path, path::PathBuf, process::ExitCode};

use clap::{error::ErrorKind, ArgAction, Parser};
use gpx_geojson_convert::{
    batch::{Batch, BatchOptions},
    convert_file,
    patch::add_location,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
  # Convert single file
  gpx_to_geojson track.gpx track.geojson

  # Convert all GPX files in a directory
  gpx_to_geojson ./gpx-files ./geojson-output

  # Add location to existing GeoJSON
  gpx_to_geojson --add-location track.geojson \"Yosemite, CA\"";

/// GPX to GeoJSON converter.
///
/// Converts a GPX file, or every GPX file of a directory, to a GeoJSON
/// Feature with LineString geometry.
#[derive(Parser, Debug)]
#[command(version, about, arg_required_else_help = true, after_help = EXAMPLES)]
struct Cli {
    /// Set the `location` property of an existing GeoJSON file.
    #[arg(
        long,
        num_args = 2,
        value_names = ["GEOJSON", "LOCATION"],
        conflicts_with_all = ["input", "output"]
    )]
    add_location: Option<Vec<String>>,

    /// GPX file or directory containing GPX files.
    #[arg(required_unless_present = "add_location")]
    input: Option<PathBuf>,

    /// GeoJSON file, or directory for converting a directory.
    #[arg(required_unless_present = "add_location")]
    output: Option<PathBuf>,

    /// Print more diagnostics to STDERR (repeat for even more).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Outcome of a command, mapped onto the process exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Success,
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::FAILURE,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return usage_status(err.kind()).into();
        }
    };

    init_logging(cli.verbose);
    run(cli).into()
}

/// Help and version requests succeed, every other argument error fails.
fn usage_status(kind: ErrorKind) -> Status {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Status::Success,
        _ => Status::Failure,
    }
}

/// `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Status {
    debug!(?cli, "parsed arguments");

    if let Some([geojson, location]) = cli.add_location.as_deref() {
        return update_location(Path::new(geojson), location);
    }

    let (Some(input), Some(output)) = (cli.input, cli.output) else {
        eprintln!("Error: expected an input and an output path");
        return Status::Failure;
    };

    if input.is_dir() {
        convert_dir(&input, &output)
    } else if input.is_file() {
        convert_single(&input, &output)
    } else {
        eprintln!("Error: '{}' is not a valid file or directory", input.display());
        Status::Failure
    }
}

/// Failing single-file conversions exit with a failure code.
fn convert_single(input: &Path, output: &Path) -> Status {
    match convert_file(input, output) {
        Ok(()) => {
            println!("✓ Converted: {} → {}", input.display(), output.display());
            Status::Success
        }
        Err(err) => {
            println!("✗ Error converting {}: {err}", input.display());
            Status::Failure
        }
    }
}

/// Failures of individual files do not change the exit code.
fn convert_dir(input: &Path, output: &Path) -> Status {
    let batch = match Batch::scan(input, output, &BatchOptions::default()) {
        Ok(batch) => batch,
        Err(err) => {
            eprintln!("Error: {err}");
            return Status::Failure;
        }
    };

    if batch.inputs().is_empty() {
        println!("No GPX files found in {}", input.display());
        return Status::Success;
    }
    println!("Found {} GPX files to convert...\n", batch.inputs().len());

    let report = batch.run(|outcome| match &outcome.result {
        Ok(()) => println!(
            "✓ Converted: {} → {}",
            outcome.input.display(),
            outcome.output.display()
        ),
        Err(err) => println!("✗ Error converting {}: {err}", outcome.input.display()),
    });

    println!("\n{report}");
    Status::Success
}

fn update_location(path: &Path, location: &str) -> Status {
    match add_location(path, location) {
        Ok(()) => {
            println!("✓ Added location '{location}' to {}", path.display());
            Status::Success
        }
        Err(err) => {
            println!("✗ Error updating {}: {err}", path.display());
            Status::Failure
        }
    }
}
