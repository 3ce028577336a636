//! Visual styling for striplog figures
//!
//! Sizes are configured in points and converted to pixels at the export DPI.

use crate::errors::Result;
use plotters::style::RGBColor;
use striplog::{Rgb, StriplogConfig};

/// Convert a resolved color to its plotters equivalent
pub fn rgb_color(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Fonts, line widths and background colors for one figure
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStyle {
    /// Output resolution
    pub dpi: u32,
    /// Font family name (`sans-serif`, `serif`, `monospace` or a system family)
    pub font_family: String,
    /// Figure title size in points
    pub title_pt: f64,
    /// Axis description size in points
    pub label_pt: f64,
    /// Tick label size in points
    pub tick_pt: f64,
    /// Legend text size in points
    pub legend_pt: f64,
    /// Parameter trace width in points
    pub line_width_pt: f64,
    /// Axes frame width in points
    pub frame_pt: f64,
    /// Fill behind each column
    pub panel_background: Rgb,
    /// Fill of the whole canvas
    pub figure_background: Rgb,
    /// Axes frame and legend edge color
    pub frame: Rgb,
    pub text: Rgb,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            dpi: 300,
            font_family: "sans-serif".to_string(),
            title_pt: 12.0,
            label_pt: 9.0,
            tick_pt: 7.0,
            legend_pt: 9.0,
            line_width_pt: 2.0,
            frame_pt: 0.8,
            panel_background: Rgb::WHITE,
            figure_background: Rgb::WHITE,
            frame: Rgb::BLACK,
            text: Rgb::BLACK,
        }
    }
}

impl FigureStyle {
    pub fn from_config(config: &StriplogConfig) -> Result<Self> {
        Ok(Self {
            dpi: config.output.dpi,
            font_family: config.figure.font_family.clone(),
            line_width_pt: config.figure.line_width_pt,
            panel_background: Rgb::parse(&config.figure.panel_background)?,
            figure_background: Rgb::parse(&config.figure.figure_background)?,
            ..Self::default()
        })
    }

    /// Points to pixels at this style's DPI
    pub fn px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    pub fn title_px(&self) -> f64 {
        self.px(self.title_pt)
    }

    pub fn label_px(&self) -> f64 {
        self.px(self.label_pt)
    }

    pub fn tick_px(&self) -> f64 {
        self.px(self.tick_pt)
    }

    pub fn legend_px(&self) -> f64 {
        self.px(self.legend_pt)
    }

    /// Stroke widths never drop below one pixel
    pub fn line_width_px(&self) -> u32 {
        (self.px(self.line_width_pt).round() as u32).max(1)
    }

    pub fn frame_width_px(&self) -> u32 {
        (self.px(self.frame_pt).round() as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_conversion_at_300_dpi() {
        let style = FigureStyle::default();
        assert_eq!(style.px(72.0), 300.0);
        assert_eq!(style.title_px(), 50.0);
        assert_eq!(style.label_px(), 37.5);
        // 2pt line at 300 dpi
        assert_eq!(style.line_width_px(), 8);
    }

    #[test]
    fn test_stroke_width_floor() {
        let style = FigureStyle {
            dpi: 10,
            ..FigureStyle::default()
        };
        assert_eq!(style.frame_width_px(), 1);
    }

    #[test]
    fn test_from_builtin_config() {
        let config = StriplogConfig::builtin().unwrap();
        let style = FigureStyle::from_config(&config).unwrap();
        assert_eq!(style.dpi, 300);
        assert_eq!(style.panel_background, Rgb::WHITE);
        let color = rgb_color(Rgb(1, 2, 3));
        assert_eq!((color.0, color.1, color.2), (1, 2, 3));
    }
}
