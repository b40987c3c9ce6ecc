//! Configuration de l'outil
//!
//! Ordre de priorité : valeurs par défaut < fichier JSON < variables
//! d'environnement (`VIEWGRID_*`, `.env` accepté) < options de la CLI.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use extent_grid::{CellSize, DEFAULT_DENSIFY};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Nom de couche utilisé par défaut : une seule grille par nom
pub const DEFAULT_LAYER_NAME: &str = "Grid from view";

/// Erreurs de validation de la configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("min_cell_size must be > 0, got {0}")]
    NonPositiveMinimum(f64),

    #[error("min_cell_size ({min}) is greater than max_cell_size ({max})")]
    InvertedRange { min: f64, max: f64 },

    #[error("default cell_size {value} is outside [{min}, {max}]")]
    DefaultOutOfRange { value: f64, min: f64, max: f64 },

    #[error("layer_name must not be empty")]
    EmptyLayerName,

    #[error("max_cells must be > 0")]
    NoCellsAllowed,
}

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Taille de cellule proposée par défaut (mètres)
    pub cell_size: f64,

    /// Taille minimale acceptée (mètres)
    pub min_cell_size: f64,

    /// Taille maximale acceptée (mètres)
    pub max_cell_size: f64,

    /// Nom de la couche générée (remplacée à chaque exécution)
    pub layer_name: String,

    /// Dossier de sortie des couches GeoJSON
    pub output_dir: PathBuf,

    /// Garde-fou sur le nombre de cellules
    pub max_cells: usize,

    /// Points échantillonnés par bord lors de la reprojection
    pub densify: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_size: CellSize::DEFAULT,
            min_cell_size: *CellSize::DEFAULT_RANGE.start(),
            max_cell_size: *CellSize::DEFAULT_RANGE.end(),
            layer_name: DEFAULT_LAYER_NAME.to_string(),
            output_dir: PathBuf::from("."),
            max_cells: 1_000_000,
            densify: DEFAULT_DENSIFY,
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Fichier si fourni, sinon défauts ; puis environnement et validation
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Applique les variables d'environnement `VIEWGRID_*`
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Applique des surcharges lues via `lookup` ; les valeurs illisibles sont ignorées
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parsed(&lookup, "VIEWGRID_CELL_SIZE") {
            self.cell_size = value;
        }
        if let Some(value) = parsed(&lookup, "VIEWGRID_MIN_CELL_SIZE") {
            self.min_cell_size = value;
        }
        if let Some(value) = parsed(&lookup, "VIEWGRID_MAX_CELL_SIZE") {
            self.max_cell_size = value;
        }
        if let Some(value) = parsed(&lookup, "VIEWGRID_MAX_CELLS") {
            self.max_cells = value;
        }
        if let Some(value) = parsed(&lookup, "VIEWGRID_DENSIFY") {
            self.densify = value;
        }
        if let Some(name) = lookup("VIEWGRID_LAYER_NAME") {
            self.layer_name = name;
        }
        if let Some(dir) = lookup("VIEWGRID_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
    }

    /// Vérifie la cohérence des réglages
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cell_size.is_nan() || self.min_cell_size <= 0.0 {
            return Err(ConfigError::NonPositiveMinimum(self.min_cell_size));
        }
        if self.min_cell_size > self.max_cell_size {
            return Err(ConfigError::InvertedRange {
                min: self.min_cell_size,
                max: self.max_cell_size,
            });
        }
        if !self.cell_size_range().contains(&self.cell_size) {
            return Err(ConfigError::DefaultOutOfRange {
                value: self.cell_size,
                min: self.min_cell_size,
                max: self.max_cell_size,
            });
        }
        if self.layer_name.trim().is_empty() {
            return Err(ConfigError::EmptyLayerName);
        }
        if self.max_cells == 0 {
            return Err(ConfigError::NoCellsAllowed);
        }
        Ok(())
    }

    /// Plage inclusive des tailles de cellule acceptées
    pub fn cell_size_range(&self) -> RangeInclusive<f64> {
        self.min_cell_size..=self.max_cell_size
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}
