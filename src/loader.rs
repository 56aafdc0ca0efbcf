//! File-level loading of the offline, online and kLa datasets.

use crate::config::{DataLoaderConfig, resolve_path};
use crate::constants::online;
use crate::error::{CultureError, Result};
use crate::header::locate_header;
use crate::models::{DatasetKind, KlaFrame, NumericConversion};
use crate::normalize::{self, preprocess_kla};
use crate::table::{TableFormat, read_table, read_table_after, split_header};
use polars::prelude::DataFrame;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loads the three datasets using paths resolved against a project root
#[derive(Debug, Clone)]
pub struct DataLoader {
    settings: DataLoaderConfig,
    root: PathBuf,
}

impl DataLoader {
    pub fn new(settings: &DataLoaderConfig, root: &Path) -> Self {
        Self {
            settings: settings.clone(),
            root: root.to_path_buf(),
        }
    }

    pub fn offline_path(&self) -> PathBuf {
        resolve_path(&self.root, &self.settings.offline_file)
    }

    pub fn online_path(&self) -> PathBuf {
        resolve_path(&self.root, &self.settings.online_file)
    }

    pub fn kla_dir(&self) -> PathBuf {
        resolve_path(&self.root, &self.settings.kla_dir)
    }

    /// Read the offline and online tables, in that order
    pub fn load_data(&self) -> Result<(DataFrame, DataFrame)> {
        let format = self.settings.table_format()?;

        let offline_path = self.offline_path();
        info!("Loading offline data from {}", offline_path.display());
        let offline = read_table(&offline_path, &format)?;
        debug!("Offline data shape: {:?}", offline.shape());

        let online_path = self.online_path();
        info!("Loading online data from {}", online_path.display());
        let online = read_table(&online_path, &format)?;
        debug!("Online data shape: {:?}", online.shape());

        Ok((offline, online))
    }

    /// Derive the `time` column from the raw online `Zeit` column
    pub fn process_online_time_column(&self, online_data: &mut DataFrame) -> Result<()> {
        info!("Processing online time column");
        let unparsed = normalize::derive_time_of_day_column(
            online_data,
            online::RAW_TIME,
            online::TIME,
            DatasetKind::Online,
        )?;
        if unparsed > 0 {
            warn!(
                "{} online timestamps could not be parsed and were set to null",
                unparsed
            );
        }
        Ok(())
    }

    pub fn convert_columns_to_numeric(
        &self,
        frame: &mut DataFrame,
        columns: &[String],
        dataset: DatasetKind,
    ) -> Result<NumericConversion> {
        normalize::convert_columns_to_numeric(frame, columns, dataset)
    }

    /// Load and preprocess one kLa export
    pub fn load_kla_data(&self, file_path: &Path) -> Result<KlaFrame> {
        info!("Loading kLa data from {}", file_path.display());
        let encoding = self.settings.kla_encoding;
        let marker = self.settings.kla_marker.as_str();

        let location = locate_header(file_path, marker, encoding)?;
        let Some(header) = location.header else {
            return Err(CultureError::HeaderNotFound {
                path: file_path.to_path_buf(),
                marker: marker.to_string(),
            });
        };

        let format = TableFormat::kla(encoding);
        let columns = split_header(&header, format.delimiter);
        let units = kla_units(&header, location.units.as_deref().unwrap_or(""), format.delimiter);
        debug!("kLa columns: {:?}, units: {:?}", columns, units);

        let frame = read_table_after(file_path, location.data_start, &columns, &format)?;
        preprocess_kla(frame, units)
    }

    /// kLa files in the configured directory, sorted by name
    pub fn discover_kla_files(&self) -> Result<Vec<PathBuf>> {
        let kla_dir = self.kla_dir();
        if !kla_dir.is_dir() {
            warn!("kLa directory {} does not exist", kla_dir.display());
            return Ok(Vec::new());
        }

        let pattern = kla_dir.join(&self.settings.kla_pattern);
        let pattern = pattern.to_string_lossy();
        let entries = glob::glob(&pattern).map_err(|e| {
            CultureError::configuration(format!("invalid kla_pattern '{}': {}", pattern, e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable kLa entry: {}", e),
            }
        }
        files.sort();

        info!("Found {} kLa files in {}", files.len(), kla_dir.display());
        Ok(files)
    }
}

/// Pair header names with the units written below them
///
/// Both lines are split positionally; columns without a unit are left out.
pub fn kla_units(header: &str, units: &str, delimiter: u8) -> BTreeMap<String, String> {
    let delimiter = delimiter as char;
    header
        .split(delimiter)
        .zip(units.split(delimiter))
        .map(|(name, unit)| (name.trim(), unit.trim()))
        .filter(|(name, unit)| !name.is_empty() && !unit.is_empty())
        .map(|(name, unit)| (name.to_string(), unit.to_string()))
        .collect()
}
