//! Reprojection de points avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

#[cfg(feature = "reproject")]
use proj::Proj;

#[cfg(feature = "reproject")]
use crate::ProjectionError;

/// Reprojection de points entre deux systèmes de coordonnées via PROJ
#[cfg(feature = "reproject")]
pub struct ProjReprojector {
    proj: Proj,
    source_epsg: u32,
    target_epsg: u32,
}

#[cfg(feature = "reproject")]
impl ProjReprojector {
    /// Crée un nouveau reprojector entre deux EPSG
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, ProjectionError> {
        let source = format!("EPSG:{}", source_epsg);
        let target = format!("EPSG:{}", target_epsg);

        // new_known_crs normalise l'ordre des axes (lon, lat) / (x, y)
        let proj = Proj::new_known_crs(&source, &target, None).map_err(|e| {
            ProjectionError::Backend(format!(
                "failed to create projection from {} to {}: {}",
                source, target, e
            ))
        })?;

        Ok(Self {
            proj,
            source_epsg,
            target_epsg,
        })
    }

    /// Transforme un lot de points (conversion batch)
    pub fn transform_points(
        &self,
        points: &[(f64, f64)],
    ) -> Result<Vec<(f64, f64)>, ProjectionError> {
        let mut coords = points.to_vec();
        self.proj
            .convert_array(&mut coords)
            .map_err(|e| {
                ProjectionError::Backend(format!(
                    "EPSG:{} -> EPSG:{}: {}",
                    self.source_epsg, self.target_epsg, e
                ))
            })?;
        Ok(coords)
    }
}


/// Vérifie si le fallback PROJ est disponible
pub fn is_available() -> bool {
    cfg!(feature = "reproject")
}
