//! Layered run configuration
//!
//! Sources, later wins:
//! 1. built-in defaults (`config/striplog.default.toml`, embedded at compile time)
//! 2. a TOML file (`striplog.toml` in the working directory when present, or an explicit path)
//! 3. `STRIPLOG__*` environment variables, `__` separating nested keys
//!    (`STRIPLOG__HOLE_ID`, `STRIPLOG__OUTPUT__DPI`)
//! 4. command-line overrides

use crate::colormap::{ColorEntry, ColorMap, ParameterSpec};
use crate::colors::Rgb;
use crate::csv_loader::CsvTableLoader;
use crate::errors::{Result, StriplogError};
use crate::table::Sentinel;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Embedded default configuration
pub const DEFAULT_CONFIG: &str = include_str!("../config/striplog.default.toml");

/// Optional configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "striplog.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "STRIPLOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StriplogConfig {
    /// Drillhole to plot
    pub hole_id: String,
    pub input: InputConfig,
    pub columns: ColumnConfig,
    pub output: OutputConfig,
    pub figure: FigureConfig,
    /// Numeric parameters plotted as line columns, in display order
    pub parameters: Vec<ParameterSpec>,
    /// Lithology code colors, in legend order
    pub lithology: Vec<ColorEntry>,
    /// Alteration code colors, in legend order
    pub alteration: Vec<ColorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub collar: PathBuf,
    pub intervals: PathBuf,
    pub delimiter: String,
    pub missing_sentinel: f64,
}

/// Column names in the input tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub hole_id: String,
    pub from: String,
    pub to: String,
    pub lithology: String,
    pub alteration: String,
    pub collar_hole_id: String,
    pub collar_max_depth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub dpi: u32,
    /// Padding around the tight bounding box, in inches
    pub pad_inches: f64,
    /// Crop to the tight bounding box of the drawn content
    pub tight: bool,
    /// Leave the figure background outside the axes and legend transparent
    pub transparent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub title_prefix: String,
    pub font_family: String,
    /// Fill for codes missing from their color map
    pub unmapped_color: String,
    pub panel_background: String,
    pub figure_background: String,
    pub line_width_pt: f64,
    pub parameter_unit: String,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub hole_id: Option<String>,
    pub collar: Option<PathBuf>,
    pub intervals: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub dpi: Option<u32>,
}

impl StriplogConfig {
    /// Built-in defaults only
    pub fn builtin() -> Result<Self> {
        let config: StriplogConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load all layers: defaults, config file, environment, overrides
    ///
    /// An explicit `file` must exist; without one, `striplog.toml` is used when present.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        Self::from_sources(file, overrides, true)
    }

    /// Load with the environment layer switched on or off
    pub fn from_sources(
        file: Option<&Path>,
        overrides: &ConfigOverrides,
        use_env: bool,
    ) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        if use_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        if let Some(hole_id) = &overrides.hole_id {
            builder = builder.set_override("hole_id", hole_id.as_str())?;
        }
        if let Some(collar) = &overrides.collar {
            builder = builder.set_override("input.collar", path_value(collar))?;
        }
        if let Some(intervals) = &overrides.intervals {
            builder = builder.set_override("input.intervals", path_value(intervals))?;
        }
        if let Some(output) = &overrides.output {
            builder = builder.set_override("output.path", path_value(output))?;
        }
        if let Some(dpi) = overrides.dpi {
            builder = builder.set_override("output.dpi", i64::from(dpi))?;
        }

        let config: StriplogConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.hole_id.trim().is_empty() {
            return Err(config_error("hole_id must not be empty"));
        }
        if self.parameters.is_empty() {
            return Err(config_error("at least one parameter is required"));
        }
        if let Some(p) = self.parameters.iter().find(|p| p.name.trim().is_empty()) {
            return Err(config_error(&format!(
                "parameter with color '{}' has an empty name",
                p.color
            )));
        }
        if self.output.dpi == 0 {
            return Err(config_error("output.dpi must be positive"));
        }
        if !(self.figure.width_in > 0.0 && self.figure.height_in > 0.0) {
            return Err(config_error("figure size must be positive"));
        }
        if !(self.output.pad_inches >= 0.0) {
            return Err(config_error("output.pad_inches must not be negative"));
        }
        if !(self.figure.line_width_pt > 0.0) {
            return Err(config_error("figure.line_width_pt must be positive"));
        }
        self.delimiter()?;

        for spec in &self.parameters {
            spec.rgb()?;
        }
        self.lithology_map()?;
        self.alteration_map()?;
        Rgb::parse(&self.figure.panel_background)?;
        Rgb::parse(&self.figure.figure_background)?;
        Ok(())
    }

    /// Field delimiter as a single byte
    pub fn delimiter(&self) -> Result<u8> {
        match self.input.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(config_error(&format!(
                "input.delimiter must be one ASCII character, got '{}'",
                self.input.delimiter
            ))),
        }
    }

    pub fn sentinel(&self) -> Sentinel {
        Sentinel(self.input.missing_sentinel)
    }

    /// Loader for the configured delimiter and sentinel
    pub fn loader(&self) -> Result<CsvTableLoader> {
        Ok(CsvTableLoader::new()
            .with_delimiter(self.delimiter()?)
            .with_sentinel(self.sentinel()))
    }

    pub fn lithology_map(&self) -> Result<ColorMap> {
        ColorMap::from_entries(&self.lithology, &self.figure.unmapped_color)
    }

    pub fn alteration_map(&self) -> Result<ColorMap> {
        ColorMap::from_entries(&self.alteration, &self.figure.unmapped_color)
    }

    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn config_error(message: &str) -> StriplogError {
    StriplogError::ConfigError {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_defaults() {
        let config = StriplogConfig::builtin().unwrap();

        assert_eq!(config.hole_id, "SPD0412");
        assert_eq!(config.input.collar, PathBuf::from("./data/collar.csv"));
        assert_eq!(config.input.intervals, PathBuf::from("./data/merged_data.csv"));
        assert_eq!(config.output.path, PathBuf::from("figure.png"));
        assert_eq!(config.output.dpi, 300);
        assert_eq!(config.output.pad_inches, 0.1);
        assert!(config.output.transparent);
        assert_eq!(config.columns.lithology, "Litologia");
        assert_eq!(config.columns.alteration, "Alteracion");
        assert_eq!(
            config.parameter_names(),
            vec!["FFEspaciamiento", "RqdRQD", "CUS", "MO", "CUFE"]
        );
        assert_eq!(config.lithology.len(), 14);
        assert_eq!(config.alteration.len(), 7);
        assert_eq!(config.lithology[0].code, "GRAV");
        assert_eq!(config.sentinel(), Sentinel(-99.0));
        assert_eq!(config.delimiter().unwrap(), b',');
    }

    #[test]
    fn test_builtin_color_maps() {
        let config = StriplogConfig::builtin().unwrap();
        let lith = config.lithology_map().unwrap();
        assert_eq!(lith.get("VOLC"), Some(Rgb::parse("darkseagreen").unwrap()));
        assert_eq!(lith.color_for(Some("UNKNOWN")), Rgb::WHITE);

        let alt = config.alteration_map().unwrap();
        assert_eq!(alt.get("KF"), Some(Rgb::parse("pink").unwrap()));
    }

    #[test]
    fn test_overrides_win() {
        let overrides = ConfigOverrides {
            hole_id: Some("SPD0413".to_string()),
            output: Some(PathBuf::from("out/hole.svg")),
            dpi: Some(150),
            ..Default::default()
        };
        let config = StriplogConfig::from_sources(None, &overrides, false).unwrap();

        assert_eq!(config.hole_id, "SPD0413");
        assert_eq!(config.output.path, PathBuf::from("out/hole.svg"));
        assert_eq!(config.output.dpi, 150);
        assert_eq!(config.parameters.len(), 5);
    }

    #[test]
    fn test_file_layer_replaces_parameter_list() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
hole_id = "DDH-7"

[[parameters]]
name = "AU"
color = "goldenrod"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config =
            StriplogConfig::from_sources(Some(file.path()), &ConfigOverrides::default(), false)
                .unwrap();

        assert_eq!(config.hole_id, "DDH-7");
        assert_eq!(config.parameter_names(), vec!["AU"]);
        // untouched sections keep their defaults
        assert_eq!(config.lithology.len(), 14);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let result = StriplogConfig::from_sources(
            Some(Path::new("/nonexistent/striplog.toml")),
            &ConfigOverrides::default(),
            false,
        );
        assert!(matches!(result, Err(StriplogError::ConfigError { .. })));
    }

    #[test]
    fn test_validation_errors() {
        let base = StriplogConfig::builtin().unwrap();

        let mut config = base.clone();
        config.parameters.clear();
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.output.dpi = 0;
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.input.delimiter = ";;".to_string();
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.parameters[0].color = "nope".to_string();
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.hole_id = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = base;
        config.figure.width_in = 0.0;
        assert!(config.validate().is_err());
    }
}
