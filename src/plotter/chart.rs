//! Panel description and drawing shared by both charts.

use super::theme::Palette;
use plotters::chart::DualCoordChartContext;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::ops::Range;

type Coord = Cartesian2d<RangedCoordf64, RangedCoordf64>;

pub const LABEL_FONT_SIZE: f64 = 18.0;
pub const TICK_FONT_SIZE: f64 = 14.0;
pub const TITLE_FONT_SIZE: f64 = 20.0;
pub const LEGEND_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Circle,
    Triangle,
    Square,
}

/// One labelled series
#[derive(Debug, Clone)]
pub struct Line {
    pub label: &'static str,
    pub color: RGBColor,
    pub width: u32,
    pub marker: Marker,
    pub points: Vec<(f64, f64)>,
}

impl Line {
    pub fn new(label: &'static str, color: RGBColor, points: Vec<(f64, f64)>) -> Self {
        Self {
            label,
            color,
            width: 1,
            marker: Marker::None,
            points,
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self.width = 2;
        self
    }
}

/// One y axis with its series
#[derive(Debug, Clone)]
pub struct Axis {
    pub label: &'static str,
    pub range: Range<f64>,
    pub lines: Vec<Line>,
}

impl Axis {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A panel with a left axis and an optional right axis sharing x
#[derive(Debug, Clone)]
pub struct Panel {
    pub x_label: &'static str,
    pub x_range: Range<f64>,
    pub left: Axis,
    pub right: Option<Axis>,
}

pub fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

pub fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    palette: &Palette,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let right_axis_size = if panel.right.is_some() { 70 } else { 0 };
    let right_range = panel
        .right
        .as_ref()
        .map(|axis| axis.range.clone())
        .unwrap_or(0.0..1.0);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Right, right_axis_size)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(panel.x_range.clone(), panel.left.range.clone())?
        .set_secondary_coord(panel.x_range.clone(), right_range);

    chart.plotting_area().fill(&palette.panel)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(panel.x_label)
            .y_desc(panel.left.label)
            .label_style(font(TICK_FONT_SIZE).color(&palette.text))
            .axis_desc_style(font(LABEL_FONT_SIZE).color(&palette.text));
        match palette.grid {
            Some(grid) => {
                mesh.bold_line_style(&grid).light_line_style(&palette.panel);
            }
            None => {
                mesh.disable_mesh();
            }
        }
        if !palette.ticks {
            mesh.set_all_tick_mark_size(0);
        }
        mesh.draw()?;
    }

    for line in &panel.left.lines {
        draw_line(&mut chart, line, false)?;
    }

    if let Some(right) = &panel.right {
        chart
            .configure_secondary_axes()
            .y_desc(right.label)
            .label_style(font(TICK_FONT_SIZE).color(&palette.text))
            .axis_desc_style(font(LABEL_FONT_SIZE).color(&palette.text))
            .draw()?;

        for line in &right.lines {
            draw_line(&mut chart, line, true)?;
        }
    }

    let has_lines = !panel.left.is_empty() || panel.right.as_ref().is_some_and(|a| !a.is_empty());
    if has_lines {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.3))
            .label_font(font(LEGEND_FONT_SIZE))
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    Ok(())
}

fn draw_line<DB>(
    chart: &mut DualCoordChartContext<'_, DB, Coord, Coord>,
    line: &Line,
    secondary: bool,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let color = line.color;
    let style = color.stroke_width(line.width);
    let series = LineSeries::new(line.points.iter().copied(), style);

    let anno = if secondary {
        chart.draw_secondary_series(series)?
    } else {
        chart.draw_series(series)?
    };
    anno.label(line.label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

    let filled = color.filled();
    let points = line.points.iter().copied();
    match (line.marker, secondary) {
        (Marker::None, _) => {}
        (Marker::Circle, false) => {
            chart.draw_series(points.map(|p| Circle::new(p, 4, filled)))?;
        }
        (Marker::Circle, true) => {
            chart.draw_secondary_series(points.map(|p| Circle::new(p, 4, filled)))?;
        }
        (Marker::Triangle, false) => {
            chart.draw_series(points.map(|p| TriangleMarker::new(p, 5, filled)))?;
        }
        (Marker::Triangle, true) => {
            chart.draw_secondary_series(points.map(|p| TriangleMarker::new(p, 5, filled)))?;
        }
        // Squares are sized in pixels around each point
        (Marker::Square, false) => {
            chart.draw_series(
                points.map(|p| EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], filled)),
            )?;
        }
        (Marker::Square, true) => {
            chart.draw_secondary_series(
                points.map(|p| EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], filled)),
            )?;
        }
    }

    Ok(())
}

