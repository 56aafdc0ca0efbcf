//! PNG rendering of the culture and kLa charts.
//!
//! Output files are named `{kind}_{YYYYMMDD_HHMMSS}.png` inside the
//! configured plot directory, so repeated runs add files instead of
//! replacing them.

pub mod chart;
pub mod culture;
pub mod kla;
pub mod series;
pub mod theme;

use crate::config::{PlotterConfig, resolve_path};
use crate::constants::{FILENAME_TIMESTAMP_FORMAT, KLA_REPORT_PREFIX, MAIN_REPORT_KIND};
use crate::error::{CultureError, Result};
use crate::models::{KlaFrame, ProcessedCulture};
use chrono::{Local, NaiveDateTime};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Renders charts into the plot directory
#[derive(Debug, Clone)]
pub struct Plotter {
    settings: PlotterConfig,
    plot_dir: PathBuf,
}

impl Plotter {
    /// Resolve the plot directory against `root` and create it
    pub fn new(settings: &PlotterConfig, root: &Path) -> Result<Self> {
        let plot_dir = resolve_path(root, &settings.plot_dir);
        std::fs::create_dir_all(&plot_dir)?;
        Ok(Self {
            settings: settings.clone(),
            plot_dir,
        })
    }

    pub fn plot_dir(&self) -> &Path {
        &self.plot_dir
    }

    /// Output path for a chart kind rendered at `at`
    pub fn report_path(&self, kind: &str, at: NaiveDateTime) -> PathBuf {
        self.plot_dir.join(format!(
            "{}_{}.png",
            kind,
            at.format(FILENAME_TIMESTAMP_FORMAT)
        ))
    }

    /// Render the four-panel culture chart
    pub fn plot_culture(&self, culture: &ProcessedCulture) -> Result<PathBuf> {
        info!("Generating main culture simulation plots.");
        let now = Local::now();
        let path = self.report_path(MAIN_REPORT_KIND, now.naive_local());

        let panels = culture::culture_panels(culture)?;
        let footer = self
            .settings
            .footer
            .as_ref()
            .map(|text| format!("{}, {}", text, now.format("%d/%m/%Y")));
        let size = self.settings.pixel_size(self.settings.figsize_main);
        let palette = self.settings.style.palette();

        let root = BitMapBackend::new(&path, size).into_drawing_area();
        culture::draw_culture(root, &panels, &palette, footer.as_deref())
            .map_err(|e| rendering_failed(&path, e))?;

        info!("Main culture simulation plot saved to {}", path.display());
        Ok(path)
    }

    /// Render the chart of one kLa export
    pub fn plot_kla(&self, kla_frame: &KlaFrame, file_name: &str) -> Result<PathBuf> {
        info!("Generating kLa data plots for {}.", file_name);
        let kind = format!("{}_{}", KLA_REPORT_PREFIX, kla_label(file_name));
        let path = self.report_path(&kind, Local::now().naive_local());

        let panel = kla::kla_panel(kla_frame)?;
        let size = self.settings.pixel_size(self.settings.figsize_kla);
        let palette = self.settings.style.palette();

        let root = BitMapBackend::new(&path, size).into_drawing_area();
        kla::draw_kla(root, &panel, &kla::kla_title(file_name), &palette)
            .map_err(|e| rendering_failed(&path, e))?;

        info!("kLa data plot saved to {}", path.display());
        Ok(path)
    }
}

/// Label embedded in kLa chart names
///
/// `Daten(klA)400rpm 3L.txt` gives `400rpm 3L`; names without `)` give `unknown`.
pub fn kla_label(file_name: &str) -> String {
    let stem = file_name.replace(".txt", "");
    match stem.split(')').nth(1) {
        Some(label) => label.trim().to_string(),
        None => "unknown".to_string(),
    }
}

fn rendering_failed(path: &Path, e: anyhow::Error) -> CultureError {
    error!("Error generating plot {}: {:#}", path.display(), e);
    CultureError::Rendering {
        path: path.to_path_buf(),
        reason: format!("{:#}", e),
    }
}
