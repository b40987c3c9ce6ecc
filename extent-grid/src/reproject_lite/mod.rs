//! Reprojection légère en Rust pur (sans dépendances externes)
//!
//! Sources supportées :
//! - WGS84 (EPSG:4326), ETRS89 (EPSG:4258)
//! - Web Mercator (EPSG:3857)
//! - Lambert 93 (EPSG:2154)
//! - UTM 33N à 35N (EPSG:32633..32635)
//! - PUWG 1992 (EPSG:2180)
//!
//! Cibles supportées :
//! - PUWG 1992 (EPSG:2180)
//! - Web Mercator (EPSG:3857)
//!
//! Les datums WGS84, ETRS89 et RGF93 sont confondus (écart sub-métrique).

mod ellipsoid;
mod lambert;
mod mercator;
mod smart;
mod transverse;

pub use ellipsoid::{Ellipsoid, GRS80, WGS84};
pub use lambert::LambertConic;
pub use smart::SmartReprojector;
pub use transverse::TransverseMercator;

use crate::ProjectionError;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }

    /// Crée depuis des degrés en refusant les points hors du globe
    pub fn checked_from_degrees(lon_deg: f64, lat_deg: f64) -> Result<Self, ProjectionError> {
        if !(-180.0..=180.0).contains(&lon_deg) || !(-90.0..=90.0).contains(&lat_deg) {
            return Err(ProjectionError::OutOfDomain {
                lon: lon_deg,
                lat: lat_deg,
            });
        }
        Ok(Self::from_degrees(lon_deg, lat_deg))
    }
}

/// Reprojection légère entre deux systèmes de la table
#[derive(Debug, Clone, Copy)]
pub struct ReprojectorLite {
    source_epsg: u32,
    target_epsg: u32,
}

impl ReprojectorLite {
    /// Crée un nouveau reprojector
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, ProjectionError> {
        if !Self::is_supported(source_epsg, target_epsg) {
            return Err(ProjectionError::Unsupported);
        }
        Ok(Self {
            source_epsg,
            target_epsg,
        })
    }

    /// Vérifie si l'EPSG source est supporté
    pub fn is_supported_source(epsg: u32) -> bool {
        matches!(epsg, 4326 | 4258 | 3857 | 2154 | 2180 | 32633..=32635)
    }

    /// Vérifie si l'EPSG cible est supporté
    pub fn is_supported_target(epsg: u32) -> bool {
        matches!(epsg, 2180 | 3857)
    }

    /// Vérifie si la reprojection est supportée
    pub fn is_supported(source: u32, target: u32) -> bool {
        Self::is_supported_source(source) && Self::is_supported_target(target)
    }

    /// Transforme un point (x, y) de la source vers la cible
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        // Étape 1: Source → Géographique
        let geo = self.source_to_geographic(x, y)?;

        // Étape 2: Géographique → Cible
        self.geographic_to_target(geo)
    }

    fn source_to_geographic(&self, x: f64, y: f64) -> Result<Geographic, ProjectionError> {
        match self.source_epsg {
            4326 | 4258 => Geographic::checked_from_degrees(x, y),
            3857 => mercator::web_mercator_to_geographic(x, y),
            2154 => LambertConic::lambert93().inverse(x, y),
            2180 => TransverseMercator::puwg1992().inverse(x, y),
            zone_code @ 32633..=32635 => {
                TransverseMercator::utm(zone_code - 32600, false).inverse(x, y)
            }
            _ => Err(ProjectionError::Unsupported),
        }
    }

    fn geographic_to_target(&self, geo: Geographic) -> Result<(f64, f64), ProjectionError> {
        match self.target_epsg {
            2180 => TransverseMercator::puwg1992().forward(geo),
            3857 => mercator::geographic_to_web_mercator(geo),
            _ => Err(ProjectionError::Unsupported),
        }
    }
}
