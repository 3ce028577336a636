//! # Striplog
//!
//! Drillhole striplog data preparation: load collar and interval tables,
//! normalize missing-value sentinels, select one hole and assemble the color
//! tables and legend for its figure. Rendering lives in the
//! `striplog-visualization` crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use striplog::{CsvTableLoader, HoleLog, Sentinel, StriplogConfig};
//!
//! let config = StriplogConfig::builtin().unwrap();
//! let csv = "holeid,from,to,Litologia,Alteracion\nH1,0,5,GRAV,A\nH1,5,12,SED,-99\n";
//!
//! let table = CsvTableLoader::new()
//!     .with_sentinel(Sentinel::default())
//!     .read_table(csv.as_bytes())
//!     .unwrap();
//!
//! let log = HoleLog::select(&table, &config.columns, "H1", &[]).unwrap();
//! let range = log.depth_range().unwrap();
//! assert_eq!(range.axis_limits(), (12.0, 0.0));
//! assert_eq!(log.intervals[1].alteration, None);
//! ```
//!
//! ## Pipeline
//!
//! 1. Load `collar.csv` and `merged_data.csv` ([`CsvTableLoader`])
//! 2. Replace the `-99` sentinel with missing ([`Table::normalize_sentinels`])
//! 3. Resolve lithology, alteration and parameter colors ([`ColorMap`], [`ParameterSpec`])
//! 4. Select one hole and derive mid-depths ([`HoleLog::select`])
//! 5. Assemble the legend ([`Legend::assemble`])

pub mod colormap;
pub mod colors;
pub mod config;
pub mod csv_loader;
pub mod errors;
pub mod hole;
pub mod legend;
pub mod logging;
pub mod summary;
pub mod table;

// Re-export commonly used types for convenience
pub use colormap::{ColorEntry, ColorMap, ParameterSpec};
pub use colors::Rgb;
pub use config::{ConfigOverrides, StriplogConfig};
pub use csv_loader::CsvTableLoader;
pub use errors::{Result, StriplogError};
pub use hole::{DepthRange, HoleLog, Interval};
pub use legend::{Legend, LegendEntry, LegendKind, LegendSection};
pub use summary::HoleSummary;
pub use table::{Cell, Sentinel, Table};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
