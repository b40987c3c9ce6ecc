//! Projection Mercator transverse (séries de Krüger à l'ordre 6 en n)
//!
//! - PUWG 1992 (EPSG:2180) : méridien 19°E, k0 = 0.9993, GRS80
//! - UTM nord, zones 33 à 35 (EPSG:32633..32635), WGS84
//!
//! Précision millimétrique jusqu'à ~3900 km du méridien central.

use std::f64::consts::FRAC_PI_2;

use super::ellipsoid::{Ellipsoid, GRS80, WGS84};
use super::Geographic;
use crate::ProjectionError;

/// Écart maximal au méridien central accepté (degrés)
const MAX_LON_OFFSET_DEG: f64 = 35.0;

/// Paramètres d'une Mercator transverse
#[derive(Debug, Clone, Copy)]
pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    /// Méridien central (radians)
    lon0: f64,
    /// False easting
    x0: f64,
    /// False northing
    y0: f64,
    /// k0 · rayon rectifiant
    scale: f64,
    /// Coefficients géographique → plan
    alpha: [f64; 6],
    /// Coefficients plan → géographique
    beta: [f64; 6],
}

impl TransverseMercator {
    pub fn new(ellipsoid: Ellipsoid, lon0: f64, k0: f64, x0: f64, y0: f64) -> Self {
        let n = ellipsoid.third_flattening();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0
                + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1983433.0 * n6 / 1935360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167603.0 * n6 / 181440.0,
            49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
            34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
            212378941.0 * n6 / 319334400.0,
        ];
        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1118711.0 * n6 / 3870720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
            4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
            20648693.0 * n6 / 638668800.0,
        ];

        Self {
            ellipsoid,
            lon0,
            x0,
            y0,
            scale: k0 * ellipsoid.rectifying_radius(),
            alpha,
            beta,
        }
    }

    /// Układ 1992 (EPSG:2180)
    pub fn puwg1992() -> Self {
        Self::new(GRS80, 19.0_f64.to_radians(), 0.9993, 500000.0, -5300000.0)
    }

    /// Zone UTM (WGS84)
    pub fn utm(zone: u32, south: bool) -> Self {
        let lon0 = ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians();
        let y0 = if south { 10000000.0 } else { 0.0 };
        Self::new(WGS84, lon0, 0.9996, 500000.0, y0)
    }

    /// Géographique → plan
    pub fn forward(&self, geo: Geographic) -> Result<(f64, f64), ProjectionError> {
        let dlon = geo.lon - self.lon0;
        if dlon.abs() > MAX_LON_OFFSET_DEG.to_radians() || geo.lat.abs() > FRAC_PI_2 {
            return Err(ProjectionError::OutOfDomain {
                lon: geo.lon.to_degrees(),
                lat: geo.lat.to_degrees(),
            });
        }

        // Latitude conforme, puis coordonnées sur la sphère
        let e = self.ellipsoid.e();
        let sin_lat = geo.lat.sin();
        let tau = (sin_lat.atanh() - e * (e * sin_lat).atanh()).sinh();
        let xi_p = tau.atan2(dlon.cos());
        let eta_p = (dlon.sin() / (1.0 + tau * tau).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in (1..=6).zip(self.alpha) {
            let k = 2.0 * j as f64;
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let x = self.x0 + self.scale * eta;
        let y = self.y0 + self.scale * xi;
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite {
                x: geo.lon.to_degrees(),
                y: geo.lat.to_degrees(),
            });
        }
        Ok((x, y))
    }

    /// Plan → géographique
    pub fn inverse(&self, x: f64, y: f64) -> Result<Geographic, ProjectionError> {
        let xi = (y - self.y0) / self.scale;
        let eta = (x - self.x0) / self.scale;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, beta) in (1..=6).zip(self.beta) {
            let k = 2.0 * j as f64;
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let tau_p = xi_p.sin() / (eta_p.sinh().powi(2) + xi_p.cos().powi(2)).sqrt();
        let dlon = eta_p.sinh().atan2(xi_p.cos());
        let lat = latitude_from_conformal(tau_p, &self.ellipsoid).atan();
        let lon = self.lon0 + dlon;

        if !lat.is_finite() || !lon.is_finite() || lat.abs() > FRAC_PI_2 {
            return Err(ProjectionError::NonFinite { x, y });
        }
        Ok(Geographic::new(lon, lat))
    }
}

/// tan(latitude) depuis tan(latitude conforme), par Newton
fn latitude_from_conformal(tau_p: f64, ellipsoid: &Ellipsoid) -> f64 {
    let e = ellipsoid.e();
    let one_minus_e2 = 1.0 - ellipsoid.e2();

    let mut tau = tau_p;
    for _ in 0..10 {
        let hyp = (1.0 + tau * tau).sqrt();
        let sigma = (e * (e * tau / hyp).atanh()).sinh();
        let tau_i = tau * (1.0 + sigma * sigma).sqrt() - sigma * hyp;
        let delta = (tau_p - tau_i) / (1.0 + tau_i * tau_i).sqrt() * (1.0 + one_minus_e2 * tau * tau)
            / (one_minus_e2 * hyp);
        tau += delta;
        if delta.abs() <= 1e-12 * tau.abs().max(1.0) {
            break;
        }
    }
    tau
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warsaw_puwg1992() {
        // Palais de la Culture, Varsovie: 21.0122°E, 52.2297°N
        let (x, y) = TransverseMercator::puwg1992()
            .forward(Geographic::from_degrees(21.0122, 52.2297))
            .unwrap();

        assert!((x - 637382.2).abs() < 0.5, "x={}", x);
        assert!((y - 486757.2).abs() < 0.5, "y={}", y);
    }

    #[test]
    fn test_central_meridian() {
        let (x, y) = TransverseMercator::puwg1992()
            .forward(Geographic::from_degrees(19.0, 52.0))
            .unwrap();

        assert!((x - 500000.0).abs() < 1e-6, "x={}", x);
        assert!((y - 459309.2).abs() < 0.5, "y={}", y);
    }

    #[test]
    fn test_puwg1992_roundtrip() {
        let tm = TransverseMercator::puwg1992();
        for &(lon, lat) in &[(14.55, 53.43), (19.94, 50.06), (24.15, 49.0), (-10.0, 50.0)] {
            let (x, y) = tm.forward(Geographic::from_degrees(lon, lat)).unwrap();
            let (lon2, lat2) = tm.inverse(x, y).unwrap().to_degrees();
            assert!((lon2 - lon).abs() < 1e-9, "lon={} vs {}", lon2, lon);
            assert!((lat2 - lat).abs() < 1e-9, "lat={} vs {}", lat2, lat);
        }
    }

    #[test]
    fn test_utm33_central_meridian() {
        let (x, y) = TransverseMercator::utm(33, false)
            .forward(Geographic::from_degrees(15.0, 52.0))
            .unwrap();

        assert!((x - 500000.0).abs() < 1e-6, "x={}", x);
        assert!((y - 5761038.2).abs() < 0.5, "y={}", y);
    }

    #[test]
    fn test_far_from_central_meridian() {
        let tm = TransverseMercator::puwg1992();
        // 10° de part et d'autre du méridien : symétriques en x, même y
        let (x, y) = tm.forward(Geographic::from_degrees(9.0, 50.0)).unwrap();
        assert!((x - -215810.423).abs() < 0.01, "x={}", x);
        assert!((y - 285044.158).abs() < 0.01, "y={}", y);
        let (x, y) = tm.forward(Geographic::from_degrees(29.0, 50.0)).unwrap();
        assert!((x - 1215810.423).abs() < 0.01, "x={}", x);
        assert!((y - 285044.158).abs() < 0.01, "y={}", y);

        // 29° du méridien
        let (x, y) = tm.forward(Geographic::from_degrees(-10.0, 50.0)).unwrap();
        assert!((x - -1558660.559).abs() < 0.01, "x={}", x);
        assert!((y - 652275.501).abs() < 0.01, "y={}", y);
    }

    #[test]
    fn test_beyond_accepted_offset() {
        let tm = TransverseMercator::puwg1992();
        for &(lon, lat) in &[(-30.0, 50.0), (60.0, 50.0), (100.0, 50.0)] {
            let result = tm.forward(Geographic::from_degrees(lon, lat));
            assert!(
                matches!(result, Err(ProjectionError::OutOfDomain { .. })),
                "({}, {}) accepted",
                lon,
                lat
            );
        }
    }

    #[test]
    fn test_out_of_domain() {
        // Antipode du méridien central
        let result = TransverseMercator::puwg1992().forward(Geographic::from_degrees(-160.0, 10.0));
        assert!(matches!(result, Err(ProjectionError::OutOfDomain { .. })));
    }
}
