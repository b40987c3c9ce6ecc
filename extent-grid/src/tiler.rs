//! Découpage d'une emprise métrique en cellules carrées
//!
//! La grille est calée sur les multiples de la taille de cellule. Les bornes
//! basses sont arrondies par défaut, les bornes hautes à la cellule
//! suivante : la grille couvre toujours toute l'emprise, quitte à déborder
//! d'une cellule en haut et à droite.

use geo::{coord, Rect};

use crate::{CellSize, Extent, GridError};

/// Disposition d'une grille calée : origine entière, colonnes, lignes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    cell_size: CellSize,
    /// Indice (en cellules) de la colonne la plus à gauche
    first_col: i64,
    /// Indice (en cellules) du bord haut de la grille
    top_row: i64,
    columns: usize,
    rows: usize,
}

impl GridLayout {
    /// Cale une grille sur `extent`
    pub fn new(extent: &Extent, cell_size: CellSize) -> Result<Self, GridError> {
        let size = cell_size.get();

        let first_col = snap_index(extent.min_x(), size)?;
        let first_row = snap_index(extent.min_y(), size)?;
        let end_col = snap_index(extent.max_x(), size)? + 1;
        let top_row = snap_index(extent.max_y(), size)? + 1;

        let columns = usize::try_from(end_col - first_col).map_err(|_| {
            GridError::InvalidExtent(format!(
                "{} cells wide at cell size {}",
                end_col - first_col,
                size
            ))
        })?;
        let rows = usize::try_from(top_row - first_row).map_err(|_| {
            GridError::InvalidExtent(format!(
                "{} cells high at cell size {}",
                top_row - first_row,
                size
            ))
        })?;

        Ok(Self {
            cell_size,
            first_col,
            top_row,
            columns,
            rows,
        })
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Nombre total de cellules (None en cas de dépassement)
    pub fn cell_count(&self) -> Option<usize> {
        self.columns.checked_mul(self.rows)
    }

    /// Emprise calée couverte par la grille
    pub fn bounds(&self) -> Extent {
        let size = self.cell_size.get();
        Extent::from_snapped(
            self.first_col as f64 * size,
            (self.top_row - self.rows as i64) as f64 * size,
            (self.first_col + self.columns as i64) as f64 * size,
            self.top_row as f64 * size,
        )
    }

    /// Rectangle de la cellule `(col, row)` ; ligne 0 en haut, colonne 0 à gauche
    pub fn cell_rect(&self, col: usize, row: usize) -> Rect<f64> {
        let size = self.cell_size.get();
        let left = self.first_col + col as i64;
        let top = self.top_row - row as i64;
        // Bornes calculées depuis les indices entiers : deux cellules voisines
        // partagent exactement la même valeur flottante
        Rect::new(
            coord! { x: left as f64 * size, y: (top - 1) as f64 * size },
            coord! { x: (left + 1) as f64 * size, y: top as f64 * size },
        )
    }

    /// Itérateur des cellules, de haut en bas puis de gauche à droite
    pub fn tiles(&self) -> Tiles {
        Tiles {
            layout: *self,
            col: 0,
            row: 0,
        }
    }
}

/// Découpe `extent` en cellules de `cell_size` mètres
pub fn tile(extent: &Extent, cell_size: f64) -> Result<Tiles, GridError> {
    let cell_size = CellSize::new(cell_size)?;
    Ok(GridLayout::new(extent, cell_size)?.tiles())
}

/// Indice de cellule contenant `value` (arrondi vers -∞)
fn snap_index(value: f64, size: f64) -> Result<i64, GridError> {
    let index = (value / size).floor();
    // Marge pour que les calculs d'indices (+1, différences) restent exacts
    const LIMIT: f64 = (1u64 << 52) as f64;
    if !index.is_finite() || index.abs() >= LIMIT {
        return Err(GridError::InvalidExtent(format!(
            "coordinate {} is outside the cell index range for cell size {}",
            value, size
        )));
    }
    Ok(index as i64)
}

/// Une cellule produite par le découpage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub col: usize,
    pub row: usize,
    pub rect: Rect<f64>,
}

/// Itérateur ligne par ligne, du haut vers le bas
#[derive(Debug, Clone)]
pub struct Tiles {
    layout: GridLayout,
    col: usize,
    row: usize,
}

impl Tiles {
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    fn remaining(&self) -> usize {
        if self.layout.columns == 0 || self.row >= self.layout.rows {
            return 0;
        }
        (self.layout.rows - self.row - 1)
            .saturating_mul(self.layout.columns)
            .saturating_add(self.layout.columns - self.col)
    }
}

impl Iterator for Tiles {
    type Item = Tile;

    fn next(&mut self) -> Option<Self::Item> {
        if self.layout.columns == 0 || self.row >= self.layout.rows {
            return None;
        }
        let current = Tile {
            col: self.col,
            row: self.row,
            rect: self.layout.cell_rect(self.col, self.row),
        };
        if self.col + 1 < self.layout.columns {
            self.col += 1;
        } else {
            self.col = 0;
            self.row += 1;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tiles {}
