//! The four-panel culture chart.

use super::chart::{Axis, Line, Marker, Panel, TITLE_FONT_SIZE, draw_panel, font};
use super::series::{
    axis_range, channel_values, f64_values, offline_hours, online_hours, paired_points,
};
use super::theme::Palette;
use crate::constants::online;
use crate::error::Result;
use crate::models::ProcessedCulture;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use polars::prelude::BooleanChunked;

/// Relative heights of the four panels, top to bottom
pub const PANEL_HEIGHT_RATIOS: [f64; 4] = [1.5, 1.3, 1.3, 1.3];

pub const TITLE: &str = "Main Culture Simulation";

const OFFLINE_HOURS: std::ops::Range<f64> = 0.0..48.0;
const GLUCOSE_RANGE: std::ops::Range<f64> = 0.0..25.0;
const BIOMASS_ETHANOL_RANGE: std::ops::Range<f64> = 0.0..75.0;

const GLUCOSE: RGBColor = RGBColor(0xff, 0x99, 0x33);
const BIOMASS: RGBColor = RGBColor(0x00, 0x8b, 0x00);
const ETHANOL: RGBColor = RGBColor(0x3a, 0x5f, 0xcd);
const CO2: RGBColor = RGBColor(0x31, 0xbf, 0x05);
const O2: RGBColor = RGBColor(0x36, 0x60, 0x5a);
const DISSOLVED_O2: RGBColor = RGBColor(0x27, 0xab, 0xcf);
const GLUCOSE_FEED: RGBColor = RGBColor(0xcd, 0x5b, 0x45);
const VOLUME: RGBColor = RGBColor(0x27, 0xab, 0xcf);
const PH: RGBColor = RGBColor(0x8b, 0x45, 0x13);
const AIR: RGBColor = RGBColor(0x0b, 0x61, 0x0b);
const STIRRER: RGBColor = RGBColor(0xcd, 0x10, 0x76);

const HOURS: &str = "Time / h";

/// Build the four panels from processed data
pub fn culture_panels(culture: &ProcessedCulture) -> Result<Vec<Panel>> {
    let offline = &culture.offline;
    let masks = &culture.masks;
    let online_data = &culture.online;

    let glucose = paired_points(
        &offline_hours(&offline.time_glucose)?,
        &f64_values(&offline.glucose)?,
        None,
    );
    let biomass = paired_points(
        &offline_hours(&offline.time_biomass)?,
        &f64_values(&offline.biomass)?,
        None,
    );
    let ethanol = paired_points(
        &offline_hours(&offline.time_ethanol)?,
        &f64_values(&offline.ethanol)?,
        None,
    );

    let analytes = Panel {
        x_label: HOURS,
        x_range: OFFLINE_HOURS,
        left: Axis {
            label: "Glucose / g/L",
            range: GLUCOSE_RANGE,
            lines: vec![Line::new("Glucose", GLUCOSE, glucose).with_marker(Marker::Circle)],
        },
        right: Some(Axis {
            label: "Ethanol, Biomass / g/L",
            range: BIOMASS_ETHANOL_RANGE,
            lines: vec![
                Line::new("Biomass", BIOMASS, biomass).with_marker(Marker::Triangle),
                Line::new("Ethanol", ETHANOL, ethanol).with_marker(Marker::Square),
            ],
        }),
    };

    let hours = online_hours(online_data)?;
    let channel = |name: &str, mask: Option<&BooleanChunked>| -> Result<Vec<(f64, f64)>> {
        Ok(match channel_values(online_data, name)? {
            Some(values) => paired_points(&hours, &values, mask),
            None => Vec::new(),
        })
    };

    let offgas = online_panel(
        ("CO2 / %", vec![Line::new("CO2", CO2, channel(online::OFFGAS_CO2, None)?)]),
        ("O2 / %", vec![Line::new("O2", O2, channel(online::OFFGAS_O2, None)?)]),
    );

    let feed = paired_points(
        &f64_values(&culture.feed.time_hours)?,
        &f64_values(&culture.feed.glucose_feed)?,
        Some(&masks.feed_glucose),
    );
    let oxygen_feed = online_panel(
        (
            "spO2 / %",
            vec![Line::new(
                "spO2",
                DISSOLVED_O2,
                channel(online::DISSOLVED_OXYGEN, None)?,
            )],
        ),
        (
            "Glucose Feed / mL/min",
            vec![Line::new("Glucose Feed", GLUCOSE_FEED, feed)],
        ),
    );

    let reactor = online_panel(
        (
            "Volume / L, Air / L/min, pH",
            vec![
                Line::new("Volume", VOLUME, channel(online::VOLUME, None)?),
                Line::new("pH", PH, channel(online::PH, None)?),
                Line::new("Air", AIR, channel(online::AIRFLOW, Some(&masks.aeration))?),
            ],
        ),
        (
            "Stirrer Speed / 1/min",
            vec![Line::new(
                "Stirrer Speed",
                STIRRER,
                channel(online::STIRRER, Some(&masks.stirrer))?,
            )],
        ),
    );

    Ok(vec![analytes, offgas, oxygen_feed, reactor])
}

/// Panel over online hours with ranges fitted to its data
fn online_panel(
    left: (&'static str, Vec<Line>),
    right: (&'static str, Vec<Line>),
) -> Panel {
    let x_range = axis_range(
        left.1
            .iter()
            .chain(right.1.iter())
            .flat_map(|line| line.points.iter().map(|p| p.0)),
    );
    let fitted_axis = |(label, lines): (&'static str, Vec<Line>)| {
        let range = axis_range(lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)));
        Axis { label, range, lines }
    };

    Panel {
        x_label: HOURS,
        x_range,
        left: fitted_axis(left),
        right: Some(fitted_axis(right)),
    }
}

/// Draw the culture chart onto `root`
pub fn draw_culture<DB>(
    root: DrawingArea<DB, Shift>,
    panels: &[Panel],
    palette: &Palette,
    footer: Option<&str>,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&palette.background)?;
    let area = root.titled(TITLE, font(TITLE_FONT_SIZE).color(&palette.text))?;

    let area = match footer {
        Some(text) => {
            let (_, height) = area.dim_in_pixel();
            let (body, footer_area) = area.split_vertically(height.saturating_sub(30));
            let style = FontDesc::new(FontFamily::SansSerif, 12.0, FontStyle::Italic)
                .color(&palette.text)
                .pos(Pos::new(HPos::Center, VPos::Center));
            let (width, footer_height) = footer_area.dim_in_pixel();
            footer_area.draw_text(
                text,
                &style,
                ((width / 2) as i32, (footer_height / 2) as i32),
            )?;
            body
        }
        None => area,
    };

    let (_, height) = area.dim_in_pixel();
    let total: f64 = PANEL_HEIGHT_RATIOS.iter().sum();
    let mut rest = area;
    let mut panel_areas = Vec::with_capacity(panels.len());
    for ratio in &PANEL_HEIGHT_RATIOS[..PANEL_HEIGHT_RATIOS.len() - 1] {
        let panel_height = (height as f64 * ratio / total).round() as u32;
        let (top, bottom) = rest.split_vertically(panel_height);
        panel_areas.push(top);
        rest = bottom;
    }
    panel_areas.push(rest);

    for (panel_area, panel) in panel_areas.iter().zip(panels) {
        draw_panel(panel_area, panel, palette)?;
    }

    root.present()?;
    Ok(())
}
