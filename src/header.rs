//! Header location inside kLa export preambles.
//!
//! kLa exports start with a metadata preamble of varying length. The
//! tabular data begins after a header line starting with a marker token
//! (normally `Time`) and a units line directly below it.

use crate::encoding::TextEncoding;
use crate::error::Result;
use crate::models::HeaderLocation;
use std::path::Path;
use tracing::{debug, info, warn};

/// Find the header and units lines in a file
///
/// Returns `data_start = header_index + 2` so that skipping `data_start`
/// lines drops the preamble, the header and the units line. When no line
/// starts with `marker` the location is `(0, None, None)`.
pub fn locate_header(
    file_path: &Path,
    marker: &str,
    encoding: TextEncoding,
) -> Result<HeaderLocation> {
    info!("Finding data start in file: {}", file_path.display());
    let text = encoding.read_to_string(file_path)?;
    let location = locate_header_in_text(&text, marker);

    if location.header.is_none() {
        warn!(
            "Header with '{}' was not found in {}",
            marker,
            file_path.display()
        );
    }
    Ok(location)
}

/// Same contract as [`locate_header`] for already-decoded text
pub fn locate_header_in_text(text: &str, marker: &str) -> HeaderLocation {
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        if line.starts_with(marker) {
            let units = lines
                .next()
                .map(|(_, units)| units.trim().to_string())
                .unwrap_or_default();
            debug!("Data starts at line {}", index + 2);
            return HeaderLocation {
                data_start: index + 2,
                header: Some(line.trim().to_string()),
                units: Some(units),
            };
        }
    }

    HeaderLocation::not_found()
}
