//! Striplog figure rendering
//!
//! Draws one drillhole as side-by-side columns sharing an inverted depth axis:
//! - lithology and alteration strips filled by code color
//! - one line trace per numeric parameter, broken where values are missing
//! - a combined legend outside the panel grid
//!
//! # Architecture
//!
//! - `data`: turns a selected [`striplog::HoleLog`] into a [`FigureData`]
//! - `elements`: strip rectangles and parameter traces
//! - `layouts`: panel grid, title and legend placement in pixels
//! - `styles`: fonts, line widths and colors at the export DPI
//! - `export`: PNG (tight crop) and SVG output
//! - `analysis`: per-parameter statistics and axis limits

pub mod analysis;
pub mod data;
pub mod elements;
pub mod errors;
pub mod export;
pub mod layouts;
pub mod styles;

// Re-export key types for convenience
pub use analysis::ParameterStats;
pub use data::FigureData;
pub use elements::{ParameterColumn, StripColumn, StripKind, StripRect};
pub use errors::{Result, VisualizationError};
pub use export::{export_figure, ChartExporter, ExportConfig, PngExporter, RenderPlan, SvgExporter};
pub use layouts::{FigureLayout, PixelRect};
pub use styles::FigureStyle;

/// Version of the visualization library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
