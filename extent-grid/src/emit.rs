//! Construction des cellules de sortie à partir du découpage

use geo::{Polygon, Rect};

use crate::tiler::{GridLayout, Tile};
use crate::{CellSize, CoordinateSystem};

/// Une cellule de grille avec ses attributs
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Identifiant séquentiel (0, 1, 2… dans l'ordre d'émission)
    pub id: usize,

    /// Colonne, 0 à gauche
    pub col: usize,

    /// Ligne, 0 en haut
    pub row: usize,

    /// Surface en hectares
    pub area_ha: f64,

    /// Emprise de la cellule
    pub geometry: Rect<f64>,
}

impl GridCell {
    /// Polygone fermé (5 sommets) de la cellule
    pub fn polygon(&self) -> Polygon<f64> {
        self.geometry.to_polygon()
    }
}

/// Résultat d'une génération : cellules ordonnées et système de travail
#[derive(Debug, Clone)]
pub struct GridResult {
    cells: Vec<GridCell>,
    crs: CoordinateSystem,
    source_crs: CoordinateSystem,
    layout: GridLayout,
}

impl GridResult {
    pub fn new(
        cells: Vec<GridCell>,
        crs: CoordinateSystem,
        source_crs: CoordinateSystem,
        layout: GridLayout,
    ) -> Self {
        Self {
            cells,
            crs,
            source_crs,
            layout,
        }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Système dans lequel les géométries sont exprimées
    pub fn crs(&self) -> CoordinateSystem {
        self.crs
    }

    /// Système de l'emprise d'origine
    pub fn source_crs(&self) -> CoordinateSystem {
        self.source_crs
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Nombre de cellules produites
    pub fn count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_size(&self) -> CellSize {
        self.layout.cell_size()
    }

    /// Vrai si l'emprise a dû être reprojetée
    pub fn reprojected(&self) -> bool {
        self.source_crs != self.crs
    }
}

/// Numérote les cellules dans l'ordre du découpage
pub fn emit<I>(tiles: I, cell_size: CellSize) -> Vec<GridCell>
where
    I: IntoIterator<Item = Tile>,
{
    let area_ha = cell_size.area_ha();
    tiles
        .into_iter()
        .enumerate()
        .map(|(id, tile)| GridCell {
            id,
            col: tile.col,
            row: tile.row,
            area_ha,
            geometry: tile.rect,
        })
        .collect()
}
