//! Reprojection intelligente : reproject_lite en priorité, fallback sur proj
//!
//! Utilise automatiquement la meilleure option disponible.

use super::ReprojectorLite;
use crate::{CoordinateSystem, GridError, ProjectionError};

/// Reprojection intelligente
///
/// Essaie d'abord reproject_lite (pure Rust), puis fallback sur proj si disponible.
pub enum SmartReprojector {
    /// Reprojection légère (pure Rust)
    Lite(ReprojectorLite),
    /// Reprojection via PROJ (si feature activée)
    #[cfg(feature = "reproject")]
    Proj(crate::reproject::ProjReprojector),
    /// Pas de reprojection (source == cible)
    Identity,
}

impl SmartReprojector {
    /// Crée un nouveau reprojector
    pub fn new(source: &CoordinateSystem, target: &CoordinateSystem) -> Result<Self, GridError> {
        // Pas de reprojection nécessaire
        if source == target {
            return Ok(Self::Identity);
        }

        // Essayer reproject_lite d'abord
        if ReprojectorLite::is_supported(source.epsg, target.epsg) {
            let lite = ReprojectorLite::new(source.epsg, target.epsg)
                .map_err(|e| GridError::reprojection(source.epsg, target.epsg, e))?;
            return Ok(Self::Lite(lite));
        }

        // Fallback sur proj si disponible
        #[cfg(feature = "reproject")]
        {
            let proj = crate::reproject::ProjReprojector::new(source.epsg, target.epsg)
                .map_err(|e| GridError::reprojection(source.epsg, target.epsg, e))?;
            return Ok(Self::Proj(proj));
        }

        // Aucune option disponible
        #[cfg(not(feature = "reproject"))]
        {
            return Err(GridError::reprojection(
                source.epsg,
                target.epsg,
                ProjectionError::Unsupported,
            ));
        }
    }

    /// Transforme une liste de points ; échoue au premier point non transformable
    pub fn transform_points(
        &self,
        points: &[(f64, f64)],
    ) -> Result<Vec<(f64, f64)>, ProjectionError> {
        let transformed = match self {
            Self::Identity => points.to_vec(),
            Self::Lite(lite) => points
                .iter()
                .map(|&(x, y)| lite.transform_point(x, y))
                .collect::<Result<Vec<_>, _>>()?,
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform_points(points)?,
        };

        if let Some(&(x, y)) = points
            .iter()
            .zip(&transformed)
            .find(|(_, (tx, ty))| !tx.is_finite() || !ty.is_finite())
            .map(|(p, _)| p)
        {
            return Err(ProjectionError::NonFinite { x, y });
        }
        Ok(transformed)
    }

    /// Retourne une description du reprojector utilisé
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "identity (no reprojection)",
            Self::Lite(_) => "reproject_lite (pure Rust)",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "proj (PROJ library)",
        }
    }
}
