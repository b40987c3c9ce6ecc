//! Types de données pour le crate extent-grid

use std::fmt;
use std::ops::RangeInclusive;

use crate::GridError;

/// Unité des coordonnées d'un système de référence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Système géographique (longitude/latitude)
    Degrees,
    /// Système projeté
    Metres,
}

/// Système de coordonnées de référence, identifié par son code EPSG
///
/// L'égalité ne compare que le code EPSG.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateSystem {
    /// Code EPSG
    pub epsg: u32,

    /// Nom usuel (vide pour les systèmes hors table)
    pub name: &'static str,

    /// Unité des coordonnées
    pub unit: Unit,
}

/// Systèmes connus, reconnus sans PROJ
const KNOWN: &[CoordinateSystem] = &[
    CoordinateSystem::new(4326, "WGS 84", Unit::Degrees),
    CoordinateSystem::new(4258, "ETRS89", Unit::Degrees),
    CoordinateSystem::new(3857, "WGS 84 / Pseudo-Mercator", Unit::Metres),
    CoordinateSystem::new(2180, "ETRS89 / Poland CS92", Unit::Metres),
    CoordinateSystem::new(2154, "RGF93 v1 / Lambert-93", Unit::Metres),
    CoordinateSystem::new(32633, "WGS 84 / UTM zone 33N", Unit::Metres),
    CoordinateSystem::new(32634, "WGS 84 / UTM zone 34N", Unit::Metres),
    CoordinateSystem::new(32635, "WGS 84 / UTM zone 35N", Unit::Metres),
];

impl CoordinateSystem {
    pub const fn new(epsg: u32, name: &'static str, unit: Unit) -> Self {
        Self { epsg, name, unit }
    }

    /// Système hors table, dont l'unité est fournie par l'appelant
    pub const fn custom(epsg: u32, unit: Unit) -> Self {
        Self::new(epsg, "", unit)
    }

    /// Cherche un système connu par son code EPSG
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        KNOWN.iter().copied().find(|crs| crs.epsg == epsg)
    }

    /// Liste des systèmes connus
    pub fn known() -> &'static [CoordinateSystem] {
        KNOWN
    }

    /// Système cible des grilles : PUWG 1992 (EPSG:2180), en mètres
    pub const fn puwg1992() -> Self {
        Self::new(2180, "ETRS89 / Poland CS92", Unit::Metres)
    }

    /// WGS 84 géographique (EPSG:4326)
    pub const fn wgs84() -> Self {
        Self::new(4326, "WGS 84", Unit::Degrees)
    }

    pub fn is_geographic(&self) -> bool {
        self.unit == Unit::Degrees
    }

    /// Identifiant au format `EPSG:xxxx`
    pub fn authid(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

impl PartialEq for CoordinateSystem {
    fn eq(&self, other: &Self) -> bool {
        self.epsg == other.epsg
    }
}

impl Eq for CoordinateSystem {}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "EPSG:{}", self.epsg)
        } else {
            write!(f, "EPSG:{} ({})", self.epsg, self.name)
        }
    }
}

/// Lit un code EPSG depuis `EPSG:2180`, `epsg:2180` ou `2180`
pub fn parse_epsg(spec: &str) -> Result<u32, GridError> {
    let trimmed = spec.trim();
    let code = match trimmed.split_once(':') {
        Some((authority, code)) if authority.eq_ignore_ascii_case("epsg") => code,
        Some(_) => return Err(GridError::UnknownCrs(spec.to_string())),
        None => trimmed,
    };
    code.trim()
        .parse::<u32>()
        .ok()
        .filter(|&c| c > 0)
        .ok_or_else(|| GridError::UnknownCrs(spec.to_string()))
}

/// Emprise rectangulaire alignée sur les axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Extent {
    /// Crée une emprise en vérifiant `min <= max` et la finitude des bornes
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, GridError> {
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return Err(GridError::InvalidExtent(format!(
                "non-finite bound in ({}, {}, {}, {})",
                min_x, min_y, max_x, max_y
            )));
        }
        if min_x > max_x || min_y > max_y {
            return Err(GridError::InvalidExtent(format!(
                "minimum greater than maximum in ({}, {}, {}, {})",
                min_x, min_y, max_x, max_y
            )));
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Bornes issues d'un calage déjà vérifié
    pub(crate) fn from_snapped(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        debug_assert!(min_x <= max_x && min_y <= max_y);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Boîte englobante d'un ensemble de points (None si vide)
    pub fn from_points<I>(points: I) -> Result<Option<Self>, GridError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for (x, y) in points {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((min_x, min_y, max_x, max_y)) => {
                    (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                }
            });
        }
        bounds
            .map(|(min_x, min_y, max_x, max_y)| Self::new(min_x, min_y, max_x, max_y))
            .transpose()
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Coins dans l'ordre : bas-gauche, bas-droite, haut-droite, haut-gauche
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.min_x, self.min_y),
            (self.max_x, self.min_y),
            (self.max_x, self.max_y),
            (self.min_x, self.max_y),
        ]
    }

    /// Vrai si `other` est entièrement inclus (bords compris)
    pub fn contains(&self, other: &Extent) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} : {}, {}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Côté d'une cellule de grille, en mètres (toujours > 0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CellSize(f64);

impl CellSize {
    /// Plage acceptée par défaut pour la saisie utilisateur
    pub const DEFAULT_RANGE: RangeInclusive<f64> = 1.0..=10000.0;

    /// Valeur proposée par défaut (200 m, soit 4 ha)
    pub const DEFAULT: f64 = 200.0;

    pub fn new(value: f64) -> Result<Self, GridError> {
        if !value.is_finite() {
            return Err(GridError::invalid_cell_size(value, "must be a finite number"));
        }
        if value <= 0.0 {
            return Err(GridError::invalid_cell_size(value, "must be greater than zero"));
        }
        Ok(Self(value))
    }

    /// Comme `new`, en imposant en plus une plage inclusive
    pub fn bounded(value: f64, range: &RangeInclusive<f64>) -> Result<Self, GridError> {
        let size = Self::new(value)?;
        if !range.contains(&value) {
            return Err(GridError::invalid_cell_size(
                value,
                format!("must be between {} and {}", range.start(), range.end()),
            ));
        }
        Ok(size)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Surface d'une cellule en hectares
    pub fn area_ha(self) -> f64 {
        (self.0 * self.0) / 10000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_rejects_inverted_bounds() {
        assert!(Extent::new(10.0, 0.0, 0.0, 5.0).is_err());
        assert!(Extent::new(0.0, 10.0, 5.0, 0.0).is_err());
        assert!(Extent::new(0.0, 0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_extent_rejects_non_finite() {
        assert!(Extent::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(Extent::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_extent_from_points() {
        let extent = Extent::from_points(vec![(3.0, -1.0), (-2.0, 4.0), (0.5, 0.5)])
            .unwrap()
            .unwrap();
        assert_eq!(extent, Extent::new(-2.0, -1.0, 3.0, 4.0).unwrap());
        assert!(Extent::from_points(Vec::new()).unwrap().is_none());
    }

    #[test]
    fn test_extent_contains() {
        let outer = Extent::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let inner = Extent::new(1.0, 1.0, 10.0, 9.0).unwrap();
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_parse_epsg() {
        assert_eq!(parse_epsg("EPSG:2180").unwrap(), 2180);
        assert_eq!(parse_epsg("epsg: 4326").unwrap(), 4326);
        assert_eq!(parse_epsg("3857").unwrap(), 3857);
        assert!(parse_epsg("IGNF:LAMB93").is_err());
        assert!(parse_epsg("EPSG:abc").is_err());
        assert!(parse_epsg("0").is_err());
    }

    #[test]
    fn test_crs_equality_by_code() {
        let custom = CoordinateSystem::custom(2180, Unit::Metres);
        assert_eq!(custom, CoordinateSystem::puwg1992());
        assert_ne!(CoordinateSystem::wgs84(), CoordinateSystem::puwg1992());
    }

    #[test]
    fn test_crs_lookup() {
        let wgs84 = CoordinateSystem::from_epsg(4326).unwrap();
        assert!(wgs84.is_geographic());
        assert!(!CoordinateSystem::from_epsg(3857).unwrap().is_geographic());
        assert!(CoordinateSystem::from_epsg(9999).is_none());
        assert_eq!(CoordinateSystem::puwg1992().authid(), "EPSG:2180");
    }

    #[test]
    fn test_cell_size_validation() {
        assert!(CellSize::new(0.0).is_err());
        assert!(CellSize::new(-5.0).is_err());
        assert!(CellSize::new(f64::NAN).is_err());
        assert_eq!(CellSize::new(200.0).unwrap().get(), 200.0);

        let range = CellSize::DEFAULT_RANGE;
        assert!(CellSize::bounded(0.5, &range).is_err());
        assert!(CellSize::bounded(10000.5, &range).is_err());
        assert!(CellSize::bounded(1.0, &range).is_ok());
        assert!(CellSize::bounded(10000.0, &range).is_ok());
    }

    #[test]
    fn test_cell_area_ha() {
        assert_eq!(CellSize::new(200.0).unwrap().area_ha(), 4.0);
        assert_eq!(CellSize::new(100.0).unwrap().area_ha(), 1.0);
    }
}
