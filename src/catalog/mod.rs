//! Indicator catalog: the fixed menu of series the dashboard offers.
//!
//! The catalog is a TOML table of `[[indicator]]` entries. A default copy is
//! compiled in from `config/indicators.toml`; a file given with `--catalog`
//! (or `ECON_CATALOG`) replaces it wholesale.
//!
//! Loading normalizes the entries:
//! - names, series ids and units are trimmed
//! - empty names / series ids are rejected
//! - duplicate names (case-insensitive) or series ids are rejected

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{SeriesRequest, WindowSize};
use crate::error::AppError;

const BUILTIN_CATALOG: &str = include_str!("../../config/indicators.toml");

pub const NO_DESCRIPTION: &str = "No description available.";

/// One selectable indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Indicator {
    /// Display name, also used as the chart title.
    pub name: String,
    /// Provider series identifier.
    pub series_id: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Indicator {
    pub fn request(&self, window: WindowSize) -> SeriesRequest {
        SeriesRequest {
            series_id: self.series_id.clone(),
            title: self.name.clone(),
            units: self.units.clone(),
            window,
        }
    }

    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(rename = "indicator", default)]
    indicators: Vec<Indicator>,
}

/// Ordered, validated list of indicators.
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    indicators: Vec<Indicator>,
}

impl IndicatorCatalog {
    /// The compiled-in default catalog.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Load from `path` when given, otherwise use the built-in catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read catalog '{}': {e}", path.display()))
        })?;
        let catalog = Self::from_toml_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            indicators = catalog.len(),
            "Loaded indicator catalog"
        );
        Ok(catalog)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, AppError> {
        let file: CatalogFile = toml::from_str(raw)
            .map_err(|e| AppError::config(format!("Invalid indicator catalog: {e}")))?;
        Self::from_indicators(file.indicators)
    }

    pub fn from_indicators(indicators: Vec<Indicator>) -> Result<Self, AppError> {
        if indicators.is_empty() {
            return Err(AppError::config("Indicator catalog is empty."));
        }

        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        let mut out = Vec::with_capacity(indicators.len());

        for mut ind in indicators {
            ind.name = ind.name.trim().to_string();
            ind.series_id = ind.series_id.trim().to_string();
            ind.units = ind.units.trim().to_string();

            if ind.name.is_empty() {
                return Err(AppError::config("Indicator name cannot be empty."));
            }
            if ind.series_id.is_empty() {
                return Err(AppError::config(format!(
                    "Indicator '{}' has an empty series_id.",
                    ind.name
                )));
            }
            if !names.insert(ind.name.to_lowercase()) {
                return Err(AppError::config(format!(
                    "Duplicate indicator name: {}",
                    ind.name
                )));
            }
            if !ids.insert(ind.series_id.clone()) {
                return Err(AppError::config(format!(
                    "Duplicate series_id: {}",
                    ind.series_id
                )));
            }
            out.push(ind);
        }

        Ok(Self { indicators: out })
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Indicator> {
        self.indicators.get(index)
    }

    /// Index of the indicator matching `query` by display name
    /// (case-insensitive) or exact series id.
    pub fn position(&self, query: &str) -> Option<usize> {
        let query = query.trim();
        self.indicators.iter().position(|ind| {
            ind.series_id == query || ind.name.eq_ignore_ascii_case(query)
        })
    }

    /// Like [`position`](Self::position), but an unknown query is a
    /// configuration error listing what is available.
    pub fn index_of(&self, query: &str) -> Result<usize, AppError> {
        self.position(query).ok_or_else(|| {
            let known: Vec<&str> = self.indicators.iter().map(|i| i.series_id.as_str()).collect();
            AppError::config(format!(
                "Unknown indicator '{}'. Available: {}",
                query.trim(),
                known.join(", ")
            ))
        })
    }
}
