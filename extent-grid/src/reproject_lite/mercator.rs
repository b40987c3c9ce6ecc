//! Projection Web Mercator (EPSG:3857)
//!
//! Aussi connu sous le nom de Pseudo-Mercator ou Spherical Mercator.
//! C'est le système d'affichage par défaut des fonds OpenStreetMap.

use super::ellipsoid::WGS84;
use super::Geographic;
use crate::ProjectionError;

/// Latitude limite du carré Web Mercator
const MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

/// Convertit coordonnées géographiques vers Web Mercator
pub fn geographic_to_web_mercator(geo: Geographic) -> Result<(f64, f64), ProjectionError> {
    // Modèle sphérique avec le rayon équatorial
    let r = WGS84.a;

    // Limiter la latitude pour éviter l'infini
    let lat = geo
        .lat
        .clamp(-MAX_LAT_DEG.to_radians(), MAX_LAT_DEG.to_radians());

    let x = r * geo.lon;
    let y = r * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();

    Ok((x, y))
}

/// Convertit Web Mercator vers coordonnées géographiques
pub fn web_mercator_to_geographic(x: f64, y: f64) -> Result<Geographic, ProjectionError> {
    let r = WGS84.a;

    let lon = x / r;
    let lat = 2.0 * (y / r).exp().atan() - std::f64::consts::FRAC_PI_2;

    // Au-delà de ±180°, le point n'existe pas sur la Terre
    if lon.abs() > std::f64::consts::PI + 1e-9 {
        return Err(ProjectionError::OutOfDomain {
            lon: lon.to_degrees(),
            lat: lat.to_degrees(),
        });
    }

    Ok(Geographic::new(lon, lat))
}
