//! Normalisation d'emprise : passage dans le système métrique cible
//!
//! L'emprise est échantillonnée le long de ses quatre bords (coins compris)
//! puis la boîte englobante des points transformés est retenue. Une
//! transformation des seuls coins opposés peut rogner l'emprise réelle,
//! surtout depuis un système géographique.

use tracing::debug;

use crate::reproject_lite::SmartReprojector;
use crate::{CoordinateSystem, Extent, GridError, ProjectionError};

/// Nombre de points échantillonnés par bord par défaut
pub const DEFAULT_DENSIFY: usize = 21;

/// Normalise une emprise vers un système cible projeté
#[derive(Debug, Clone, Copy)]
pub struct ExtentNormalizer {
    target: CoordinateSystem,
    densify: usize,
}

impl ExtentNormalizer {
    /// Crée un normaliseur ; la cible doit être en mètres
    pub fn new(target: CoordinateSystem) -> Result<Self, GridError> {
        if target.is_geographic() {
            return Err(GridError::reprojection(
                target.epsg,
                target.epsg,
                ProjectionError::GeographicTarget(target.epsg),
            ));
        }
        Ok(Self {
            target,
            densify: DEFAULT_DENSIFY,
        })
    }

    /// Normaliseur vers PUWG 1992 (EPSG:2180)
    pub fn puwg1992() -> Self {
        Self {
            target: CoordinateSystem::puwg1992(),
            densify: DEFAULT_DENSIFY,
        }
    }

    /// Points par bord, coins compris (minimum 2)
    pub fn with_densify(mut self, points_per_edge: usize) -> Self {
        self.densify = points_per_edge.max(2);
        self
    }

    pub fn densify(&self) -> usize {
        self.densify
    }

    /// Exprime `extent` (dans `source`) dans le système cible
    ///
    /// Si `source == cible`, l'emprise est rendue telle quelle.
    pub fn normalize(
        &self,
        extent: &Extent,
        source: &CoordinateSystem,
    ) -> Result<(Extent, CoordinateSystem), GridError> {
        if *source == self.target {
            return Ok((*extent, self.target));
        }

        let reprojector = SmartReprojector::new(source, &self.target)?;
        debug!(
            source = source.epsg,
            target = self.target.epsg,
            backend = reprojector.description(),
            "Reprojecting extent"
        );

        let samples = edge_samples(extent, self.densify);
        let transformed = reprojector
            .transform_points(&samples)
            .map_err(|e| GridError::reprojection(source.epsg, self.target.epsg, e))?;

        let normalized = Extent::from_points(transformed)?.ok_or_else(|| {
            GridError::InvalidExtent("reprojection produced no points".to_string())
        })?;

        debug!(input = %extent, output = %normalized, "Extent reprojected");
        Ok((normalized, self.target))
    }
}

/// Normalise `extent` de `source` vers `target`
pub fn normalize(
    extent: &Extent,
    source: &CoordinateSystem,
    target: &CoordinateSystem,
) -> Result<(Extent, CoordinateSystem), GridError> {
    if source == target {
        return Ok((*extent, *target));
    }
    ExtentNormalizer::new(*target)?.normalize(extent, source)
}

/// Points régulièrement espacés sur le contour (coins inclus, sans doublon)
fn edge_samples(extent: &Extent, per_edge: usize) -> Vec<(f64, f64)> {
    let corners = extent.corners();
    let steps = per_edge.max(2) - 1;
    let mut points = Vec::with_capacity(steps * 4);

    for i in 0..4 {
        let (x0, y0) = corners[i];
        let (x1, y1) = corners[(i + 1) % 4];
        // Le dernier point du bord est le premier du bord suivant
        for step in 0..steps {
            let t = step as f64 / steps as f64;
            points.push((x0 + (x1 - x0) * t, y0 + (y1 - y0) * t));
        }
    }
    points
}
