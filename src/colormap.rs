//! Categorical color maps and parameter display specs

use crate::colors::Rgb;
use crate::errors::Result;
use serde::{Deserialize, Serialize};

/// One `code -> color` entry as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub code: String,
    pub color: String,
}

/// Display spec for one numeric parameter column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub color: String,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn rgb(&self) -> Result<Rgb> {
        Rgb::parse(&self.color)
    }
}

/// Ordered mapping from categorical code to color, with a fallback for unmapped codes
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    entries: Vec<(String, Rgb)>,
    fallback: Rgb,
}

impl ColorMap {
    /// Build from resolved entries
    ///
    /// A repeated code keeps its first position and takes the last color given for it.
    pub fn new(entries: Vec<(String, Rgb)>, fallback: Rgb) -> Self {
        let mut merged: Vec<(String, Rgb)> = Vec::with_capacity(entries.len());
        for (code, color) in entries {
            match merged.iter_mut().find(|(c, _)| *c == code) {
                Some(existing) => existing.1 = color,
                None => merged.push((code, color)),
            }
        }
        Self {
            entries: merged,
            fallback,
        }
    }

    /// Build from configuration entries, resolving every color name
    pub fn from_entries(entries: &[ColorEntry], fallback: &str) -> Result<Self> {
        let resolved = entries
            .iter()
            .map(|e| Ok((e.code.clone(), Rgb::parse(&e.color)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(resolved, Rgb::parse(fallback)?))
    }

    /// Mapped color for a code, if any
    pub fn get(&self, code: &str) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, color)| *color)
    }

    /// Display color for a possibly missing code; unmapped and missing codes get the fallback
    pub fn color_for(&self, code: Option<&str>) -> Rgb {
        code.and_then(|c| self.get(c)).unwrap_or(self.fallback)
    }

    pub fn entries(&self) -> &[(String, Rgb)] {
        &self.entries
    }

    pub fn fallback(&self) -> Rgb {
        self.fallback
    }
}
