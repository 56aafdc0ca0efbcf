//! Chart color themes.

use plotters::style::RGBColor;
use serde::Deserialize;

/// Visual theme selected by the `style` setting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Darkgrid,
    Whitegrid,
    Dark,
    White,
    Ticks,
}

/// Colors derived from a theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: RGBColor,
    pub panel: RGBColor,
    pub grid: Option<RGBColor>,
    pub text: RGBColor,
    /// Whether tick marks are drawn outside the axes
    pub ticks: bool,
}

const WHITE: RGBColor = RGBColor(255, 255, 255);
const GREY_PANEL: RGBColor = RGBColor(234, 234, 242);
const LIGHT_GRID: RGBColor = RGBColor(204, 204, 204);
const TEXT: RGBColor = RGBColor(38, 38, 38);

impl Theme {
    pub fn palette(&self) -> Palette {
        let (panel, grid, ticks) = match self {
            Theme::Darkgrid => (GREY_PANEL, Some(WHITE), false),
            Theme::Whitegrid => (WHITE, Some(LIGHT_GRID), false),
            Theme::Dark => (GREY_PANEL, None, false),
            Theme::White => (WHITE, None, false),
            Theme::Ticks => (WHITE, None, true),
        };

        Palette {
            background: WHITE,
            panel,
            grid,
            text: TEXT,
            ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_themes_have_grid_lines() {
        assert_eq!(Theme::Darkgrid.palette().grid, Some(WHITE));
        assert!(Theme::Whitegrid.palette().grid.is_some());
        assert!(Theme::White.palette().grid.is_none());
        assert!(Theme::Ticks.palette().ticks);
        assert!(!Theme::Dark.palette().ticks);
    }
}
