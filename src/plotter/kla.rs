//! The kLa measurement chart.

use super::chart::{Axis, Line, Panel, TITLE_FONT_SIZE, draw_panel, font};
use super::series::{axis_range, channel_values, kla_minutes, paired_points};
use super::theme::Palette;
use crate::constants::kla;
use crate::error::Result;
use crate::models::KlaFrame;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Single-axis panel of every kLa channel present in the table
pub fn kla_panel(kla_frame: &KlaFrame) -> Result<Panel> {
    let minutes = kla_minutes(&kla_frame.frame)?;

    let mut lines = Vec::new();
    for (name, (r, g, b)) in kla::PLOT_CHANNELS {
        if let Some(values) = channel_values(&kla_frame.frame, name)? {
            lines.push(Line::new(
                *name,
                RGBColor(*r, *g, *b),
                paired_points(&minutes, &values, None),
            ));
        }
    }

    let x_range = axis_range(minutes.iter().flatten().copied());
    let y_range = axis_range(lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)));

    Ok(Panel {
        x_label: "Time / min",
        x_range,
        left: Axis {
            label: "Measurements",
            range: y_range,
            lines,
        },
        right: None,
    })
}

pub fn kla_title(file_name: &str) -> String {
    format!("Measurement Data Over Time - {}", file_name)
}

pub fn draw_kla<DB>(
    root: DrawingArea<DB, Shift>,
    panel: &Panel,
    title: &str,
    palette: &Palette,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&palette.background)?;
    let area = root.titled(title, font(TITLE_FONT_SIZE).color(&palette.text))?;
    draw_panel(&area, panel, palette)?;
    root.present()?;
    Ok(())
}
