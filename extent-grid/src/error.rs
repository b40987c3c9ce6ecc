//! Types d'erreurs pour le crate extent-grid

use thiserror::Error;

/// Erreurs pouvant survenir lors de la génération d'une grille
#[derive(Debug, Error)]
pub enum GridError {
    /// Taille de cellule nulle, négative, non finie ou hors plage
    #[error("Invalid cell size {value}: {reason}")]
    InvalidCellSize { value: f64, reason: String },

    /// Transformation impossible entre les deux systèmes de coordonnées
    #[error("Reprojection from EPSG:{source_epsg} to EPSG:{target_epsg} failed: {cause}")]
    Reprojection {
        source_epsg: u32,
        target_epsg: u32,
        #[source]
        cause: ProjectionError,
    },

    /// Emprise invalide (min > max, valeur non finie, hors de la plage d'indices)
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    /// Identifiant de système de coordonnées illisible
    #[error("Unknown coordinate reference system: {0}")]
    UnknownCrs(String),

    /// La grille dépasse la limite de cellules demandée
    #[error("Grid of {columns}x{rows} cells exceeds the limit of {limit} cells")]
    TooManyCells {
        columns: usize,
        rows: usize,
        limit: usize,
    },
}

impl GridError {
    /// Crée une erreur de taille de cellule avec contexte
    pub fn invalid_cell_size(value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidCellSize {
            value,
            reason: reason.into(),
        }
    }

    /// Crée une erreur de reprojection
    pub fn reprojection(source_epsg: u32, target_epsg: u32, cause: ProjectionError) -> Self {
        Self::Reprojection {
            source_epsg,
            target_epsg,
            cause,
        }
    }
}

/// Erreurs bas niveau des projections
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Aucune implémentation disponible pour ce couple de systèmes
    #[error("no transformation available (build with the `reproject` feature for PROJ support)")]
    Unsupported,

    /// Coordonnées géographiques hors du domaine de la projection
    #[error("point ({lon}, {lat}) is outside the projection domain")]
    OutOfDomain { lon: f64, lat: f64 },

    /// Le calcul a produit une valeur non finie
    #[error("transformation produced a non-finite coordinate for ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    /// Système cible géographique : impossible d'y exprimer des mètres
    #[error("target EPSG:{0} is geographic, grids need a projected (metric) system")]
    GeographicTarget(u32),

    /// Erreur remontée par PROJ
    #[error("PROJ error: {0}")]
    Backend(String),
}
