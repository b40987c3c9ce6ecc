//! Projection conique conforme de Lambert (Lambert 93, EPSG:2154)
//!
//! Conique sécante à 2 parallèles standards, sur GRS80.

use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

use super::ellipsoid::{Ellipsoid, GRS80};
use super::Geographic;
use crate::ProjectionError;

/// Conique conforme avec constantes précalculées
#[derive(Debug, Clone, Copy)]
pub struct LambertConic {
    ellipsoid: Ellipsoid,
    lon0: f64,
    x0: f64,
    y0: f64,
    /// Exposant de la projection
    n: f64,
    /// Constante C
    c: f64,
    /// Rayon à l'origine
    r0: f64,
}

impl LambertConic {
    pub fn new(
        ellipsoid: Ellipsoid,
        lon0: f64,
        lat0: f64,
        lat1: f64,
        lat2: f64,
        x0: f64,
        y0: f64,
    ) -> Self {
        let e = ellipsoid.e();
        let n1 = ellipsoid.normal_radius(lat1);
        let n2 = ellipsoid.normal_radius(lat2);
        let iso1 = isometric_latitude(lat1, e);
        let iso2 = isometric_latitude(lat2, e);

        let n = ((n1 * lat1.cos()).ln() - (n2 * lat2.cos()).ln()) / (iso2 - iso1);
        let c = (n1 * lat1.cos() / n) * (n * iso1).exp();
        let r0 = c * (-n * isometric_latitude(lat0, e)).exp();

        Self {
            ellipsoid,
            lon0,
            x0,
            y0,
            n,
            c,
            r0,
        }
    }

    /// Lambert 93 (RGF93, méridien central 3°E)
    pub fn lambert93() -> Self {
        Self::new(
            GRS80,
            3.0_f64.to_radians(),
            46.5_f64.to_radians(),
            44.0_f64.to_radians(),
            49.0_f64.to_radians(),
            700000.0,
            6600000.0,
        )
    }

    /// Géographique → Lambert
    pub fn forward(&self, geo: Geographic) -> Result<(f64, f64), ProjectionError> {
        if geo.lat.abs() >= FRAC_PI_2 {
            return Err(ProjectionError::OutOfDomain {
                lon: geo.lon.to_degrees(),
                lat: geo.lat.to_degrees(),
            });
        }
        let r = self.c * (-self.n * isometric_latitude(geo.lat, self.ellipsoid.e())).exp();
        let gamma = self.n * (geo.lon - self.lon0);
        Ok((
            self.x0 + r * gamma.sin(),
            self.y0 + self.r0 - r * gamma.cos(),
        ))
    }

    /// Lambert → géographique
    pub fn inverse(&self, x: f64, y: f64) -> Result<Geographic, ProjectionError> {
        let dx = x - self.x0;
        let dy = y - self.y0;

        let r = (dx.powi(2) + (self.r0 - dy).powi(2)).sqrt();
        let r = if self.n < 0.0 { -r } else { r };
        let gamma = (dx / (self.r0 - dy)).atan();

        let iso_lat = -(r / self.c).ln() / self.n;
        let lat = latitude_from_isometric(iso_lat, self.ellipsoid.e());
        let lon = self.lon0 + gamma / self.n;

        if !lat.is_finite() || !lon.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }
        Ok(Geographic::new(lon, lat))
    }
}

/// Latitude isométrique
fn isometric_latitude(lat: f64, e: f64) -> f64 {
    let sin_lat = lat.sin();
    let term = ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).powf(e / 2.0);
    ((FRAC_PI_4 + lat / 2.0).tan() * term).ln()
}

/// Latitude depuis la latitude isométrique (itératif)
fn latitude_from_isometric(iso_lat: f64, e: f64) -> f64 {
    let mut lat = 2.0 * iso_lat.exp().atan() - FRAC_PI_2;

    for _ in 0..10 {
        let sin_lat = lat.sin();
        let term = ((1.0 + e * sin_lat) / (1.0 - e * sin_lat)).powf(e / 2.0);
        let next = 2.0 * (iso_lat.exp() * term).atan() - FRAC_PI_2;

        if (next - lat).abs() < 1e-12 {
            return next;
        }
        lat = next;
    }
    lat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris() {
        // Tour Eiffel approximativement
        let geo = LambertConic::lambert93()
            .inverse(648237.0, 6862107.0)
            .unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - 2.2945).abs() < 0.01, "lon={}", lon);
        assert!((lat - 48.8584).abs() < 0.01, "lat={}", lat);
    }

    #[test]
    fn test_roundtrip() {
        let lambert = LambertConic::lambert93();
        let (x, y) = lambert
            .forward(Geographic::from_degrees(5.37, 43.30))
            .unwrap();
        let (lon, lat) = lambert.inverse(x, y).unwrap().to_degrees();

        assert!((lon - 5.37).abs() < 1e-9, "lon={}", lon);
        assert!((lat - 43.30).abs() < 1e-9, "lat={}", lat);
    }

    #[test]
    fn test_origin() {
        let (x, y) = LambertConic::lambert93()
            .forward(Geographic::from_degrees(3.0, 46.5))
            .unwrap();
        assert!((x - 700000.0).abs() < 1e-6, "x={}", x);
        assert!((y - 6600000.0).abs() < 1e-6, "y={}", y);
    }
}
