//! Figure layout: panel grid, title anchor and legend box placement
//!
//! Positions follow the usual subplot conventions: the panel grid fills the
//! figure between fractional margins, columns share equal widths separated by
//! a fraction of the column width, and the legend sits outside the grid to the
//! right, vertically centered.

use crate::errors::{Result, VisualizationError};
use crate::styles::FigureStyle;
use serde::{Deserialize, Serialize};
use striplog::{Legend, StriplogConfig};

/// Pixel rectangle, `right` and `bottom` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.left..self.right).contains(&x) && (self.top..self.bottom).contains(&y)
    }
}

/// Panel grid bounds as fractions of the figure, measured from the left and bottom edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubplotBounds {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    /// Gap between columns as a fraction of the column width
    pub wspace: f64,
}

impl Default for SubplotBounds {
    fn default() -> Self {
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
            wspace: 0.2,
        }
    }
}

/// Geometry of a figure at a given size and resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureLayout {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    pub bounds: SubplotBounds,
    /// Title anchor (left edge, baseline) as figure fractions from the left and bottom
    pub title_anchor: (f64, f64),
    /// Legend's left edge as a figure-width fraction
    pub legend_anchor_x: f64,
}

impl Default for FigureLayout {
    fn default() -> Self {
        Self {
            width_in: 8.0,
            height_in: 8.0,
            dpi: 300,
            bounds: SubplotBounds::default(),
            title_anchor: (0.5, 0.9),
            legend_anchor_x: 0.95,
        }
    }
}

impl FigureLayout {
    pub fn from_config(config: &StriplogConfig) -> Self {
        Self {
            width_in: config.figure.width_in,
            height_in: config.figure.height_in,
            dpi: config.output.dpi,
            ..Self::default()
        }
    }

    /// Figure size in pixels, before the legend is added
    pub fn figure_px(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }

    /// Area covered by the panel grid
    pub fn plot_rect(&self) -> PixelRect {
        let (w, h) = self.figure_px();
        let (w, h) = (w as f64, h as f64);
        PixelRect {
            left: (self.bounds.left * w).round() as i32,
            top: ((1.0 - self.bounds.top) * h).round() as i32,
            right: (self.bounds.right * w).round() as i32,
            bottom: ((1.0 - self.bounds.bottom) * h).round() as i32,
        }
    }

    /// Plotting rectangles of `count` equal-width columns, left to right
    pub fn column_rects(&self, count: usize) -> Result<Vec<PixelRect>> {
        if count == 0 {
            return Err(VisualizationError::LayoutError {
                message: "figure needs at least one column".to_string(),
            });
        }

        let plot = self.plot_rect();
        let n = count as f64;
        let width = plot.width() as f64 / (n + (n - 1.0) * self.bounds.wspace);
        let step = width * (1.0 + self.bounds.wspace);

        Ok((0..count)
            .map(|i| {
                let left = plot.left as f64 + i as f64 * step;
                PixelRect {
                    left: left.round() as i32,
                    top: plot.top,
                    right: (left + width).round() as i32,
                    bottom: plot.bottom,
                }
            })
            .collect())
    }

    /// Title anchor in pixels (left edge, baseline)
    pub fn title_position(&self) -> (i32, i32) {
        let (w, h) = self.figure_px();
        (
            (self.title_anchor.0 * w as f64).round() as i32,
            ((1.0 - self.title_anchor.1) * h as f64).round() as i32,
        )
    }

    /// Space left of the first column for depth tick labels and the depth description
    pub fn y_label_area_px(&self, style: &FigureStyle) -> u32 {
        (style.tick_px() * 3.5 + style.label_px() * 1.5).round() as u32
    }

    /// Space below every column for x tick labels and the column description
    pub fn x_label_area_px(&self, style: &FigureStyle) -> u32 {
        (style.tick_px() * 1.8 + style.label_px() * 1.8).round() as u32
    }

    /// Legend box: left edge at the anchor, vertically centered on the figure
    ///
    /// A legend taller than the figure starts at the top edge and the canvas grows
    /// downward to fit it. Text width is estimated from the longest label; the tight
    /// crop removes any slack.
    pub fn legend_rect(&self, legend: &Legend, style: &FigureStyle) -> PixelRect {
        let metrics = LegendMetrics::new(style);
        let (w, h) = self.figure_px();

        let width = 2.0 * metrics.padding
            + metrics.handle_width
            + metrics.handle_gap
            + legend.longest_label() as f64 * metrics.char_width;
        let height = 2.0 * metrics.padding + legend.row_count() as f64 * metrics.row_height;

        let left = self.legend_anchor_x * w as f64;
        let top = (h as f64 / 2.0 - height / 2.0).max(0.0);
        PixelRect {
            left: left.round() as i32,
            top: top.round() as i32,
            right: (left + width).round() as i32,
            bottom: (top + height).round() as i32,
        }
    }

    /// Canvas large enough for the figure and the legend outside it
    pub fn canvas_px(&self, legend: &PixelRect) -> (u32, u32) {
        let (w, h) = self.figure_px();
        let margin = (0.1 * self.dpi as f64).round() as i32;
        (
            w.max((legend.right + margin).max(0) as u32),
            h.max((legend.bottom + margin).max(0) as u32),
        )
    }
}

/// Spacing inside the legend box, derived from the legend font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendMetrics {
    pub font_px: f64,
    pub row_height: f64,
    pub padding: f64,
    pub handle_width: f64,
    pub handle_gap: f64,
    pub char_width: f64,
}

impl LegendMetrics {
    pub fn new(style: &FigureStyle) -> Self {
        let font_px = style.legend_px();
        Self {
            font_px,
            row_height: font_px * 1.5,
            padding: font_px * 0.6,
            handle_width: font_px * 2.0,
            handle_gap: font_px * 0.8,
            char_width: font_px * 0.62,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use striplog::{LegendEntry, LegendKind, LegendSection, Rgb};

    #[test]
    fn test_figure_pixels() {
        let layout = FigureLayout::default();
        assert_eq!(layout.figure_px(), (2400, 2400));
        assert_eq!(
            layout.plot_rect(),
            PixelRect {
                left: 300,
                top: 288,
                right: 2160,
                bottom: 2136
            }
        );
    }

    #[test]
    fn test_column_rects_share_width_and_span_grid() {
        let layout = FigureLayout::default();
        let columns = layout.column_rects(7).unwrap();

        assert_eq!(columns.len(), 7);
        assert_eq!(columns[0].left, 300);
        assert_eq!(columns[6].right, 2160);
        for pair in columns.windows(2) {
            assert!(pair[0].right < pair[1].left, "columns must not overlap");
            assert!((pair[0].width() - pair[1].width()).abs() <= 1);
        }
        assert!(columns.iter().all(|c| c.top == 288 && c.bottom == 2136));
    }

    #[test]
    fn test_zero_columns_rejected() {
        assert!(FigureLayout::default().column_rects(0).is_err());
    }

    #[test]
    fn test_title_anchor() {
        assert_eq!(FigureLayout::default().title_position(), (1200, 240));
    }

    #[test]
    fn test_legend_outside_grid_and_canvas_grows() {
        let layout = FigureLayout::default();
        let style = FigureStyle::default();
        let legend = Legend {
            sections: vec![LegendSection {
                title: "Parameters".to_string(),
                entries: vec![LegendEntry {
                    label: "FFEspaciamiento".to_string(),
                    color: Rgb::WHITE,
                    kind: LegendKind::Line,
                }],
            }],
        };

        let rect = layout.legend_rect(&legend, &style);
        assert_eq!(rect.left, 2280);
        assert!(rect.left > layout.plot_rect().right);
        // centered vertically
        assert!(((rect.top + rect.bottom) / 2 - 1200).abs() <= 1);

        let (w, h) = layout.canvas_px(&rect);
        assert!(w > 2400);
        assert!(w as i32 >= rect.right);
        assert_eq!(h, 2400);
    }

    #[test]
    fn test_tall_legend_stays_on_canvas() {
        let layout = FigureLayout::default();
        let style = FigureStyle::default();
        let entries = (0..120)
            .map(|i| LegendEntry {
                label: format!("CODE{}", i),
                color: Rgb::WHITE,
                kind: LegendKind::Swatch,
            })
            .collect();
        let legend = Legend {
            sections: vec![LegendSection {
                title: "Lithology".to_string(),
                entries,
            }],
        };

        let rect = layout.legend_rect(&legend, &style);
        assert!(rect.height() > 2400);
        assert_eq!(rect.top, 0);

        let (_, h) = layout.canvas_px(&rect);
        assert!(h as i32 >= rect.bottom);
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = PixelRect {
            left: 10,
            top: 20,
            right: 30,
            bottom: 40,
        };
        assert!(rect.contains(10, 20));
        assert!(rect.contains(29, 39));
        assert!(!rect.contains(30, 25));
        assert!(!rect.contains(15, 40));
    }
}
