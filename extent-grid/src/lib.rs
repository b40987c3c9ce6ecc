//! # extent-grid
//!
//! Génération d'une grille métrique couvrant une emprise de carte.
//!
//! ## Features
//!
//! - Reprojection de l'emprise vers PUWG 1992 (EPSG:2180), en Rust pur
//! - Échantillonnage des bords pour ne jamais rogner l'emprise reprojetée
//! - Grille calée sur les multiples de la taille de cellule
//! - Fallback PROJ optionnel (feature `reproject`)
//!
//! ## Usage
//!
//! ```rust
//! use extent_grid::{generate, CoordinateSystem, Extent, GridRequest};
//!
//! let request = GridRequest::new(
//!     Extent::new(0.0, 0.0, 450.0, 320.0)?,
//!     CoordinateSystem::puwg1992(),
//!     200.0,
//! );
//! let result = generate(&request)?;
//!
//! assert_eq!(result.count(), 6);
//! assert_eq!(result.cells()[0].area_ha, 4.0);
//! # Ok::<(), extent_grid::GridError>(())
//! ```

pub mod emit;
pub mod error;
pub mod normalize;
pub mod reproject;
pub mod reproject_lite;
pub mod tiler;
pub mod types;

pub use emit::{emit, GridCell, GridResult};
pub use error::{GridError, ProjectionError};
pub use normalize::{normalize, ExtentNormalizer, DEFAULT_DENSIFY};
pub use tiler::{tile, GridLayout, Tile, Tiles};
pub use types::{parse_epsg, CellSize, CoordinateSystem, Extent, Unit};

use tracing::debug;

/// Paramètres d'une génération de grille
#[derive(Debug, Clone)]
pub struct GridRequest {
    /// Emprise de la vue
    pub extent: Extent,

    /// Système de l'emprise
    pub source_crs: CoordinateSystem,

    /// Côté des cellules en mètres
    pub cell_size: f64,

    /// Nombre maximal de cellules accepté (pas de limite si None)
    pub max_cells: Option<usize>,
}

impl GridRequest {
    pub fn new(extent: Extent, source_crs: CoordinateSystem, cell_size: f64) -> Self {
        Self {
            extent,
            source_crs,
            cell_size,
            max_cells: None,
        }
    }

    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = Some(max_cells);
        self
    }
}

/// Chaîne complète : normalisation → découpage → émission
#[derive(Debug, Clone, Copy)]
pub struct GridGenerator {
    normalizer: ExtentNormalizer,
}

impl Default for GridGenerator {
    fn default() -> Self {
        Self {
            normalizer: ExtentNormalizer::puwg1992(),
        }
    }
}

impl GridGenerator {
    pub fn new(normalizer: ExtentNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &ExtentNormalizer {
        &self.normalizer
    }

    /// Calcule la disposition de la grille sans construire les cellules
    pub fn layout(
        &self,
        request: &GridRequest,
    ) -> Result<(GridLayout, CoordinateSystem), GridError> {
        let cell_size = CellSize::new(request.cell_size)?;
        let (extent, crs) = self
            .normalizer
            .normalize(&request.extent, &request.source_crs)?;
        let layout = GridLayout::new(&extent, cell_size)?;

        match (layout.cell_count(), request.max_cells) {
            (Some(count), Some(limit)) if count <= limit => {}
            (Some(_), None) => {}
            _ => {
                return Err(GridError::TooManyCells {
                    columns: layout.columns(),
                    rows: layout.rows(),
                    limit: request.max_cells.unwrap_or(usize::MAX),
                })
            }
        }
        Ok((layout, crs))
    }

    /// Génère la grille ; en cas d'erreur aucune cellule n'est produite
    pub fn generate(&self, request: &GridRequest) -> Result<GridResult, GridError> {
        let (layout, crs) = self.layout(request)?;
        debug!(
            columns = layout.columns(),
            rows = layout.rows(),
            cell_size = layout.cell_size().get(),
            epsg = crs.epsg,
            densify = self.normalizer.densify(),
            "Grid layout computed"
        );

        let cells = emit(layout.tiles(), layout.cell_size());
        Ok(GridResult::new(cells, crs, request.source_crs, layout))
    }
}

/// Génère une grille en PUWG 1992 avec les réglages par défaut
pub fn generate(request: &GridRequest) -> Result<GridResult, GridError> {
    GridGenerator::default().generate(request)
}
