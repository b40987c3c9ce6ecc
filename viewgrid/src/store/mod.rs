//! Stockage des grilles générées sous un nom de couche
//!
//! Une grille stockée sous un nom remplace toujours la précédente de même
//! nom : on ne cumule jamais deux grilles dans une couche.

mod geojson_dir;
mod memory;

pub use geojson_dir::{layer_file_name, GeoJsonDirStore};
pub use memory::MemoryStore;

use anyhow::Result;
use extent_grid::GridResult;

/// Destination des grilles générées
pub trait ResultStore {
    /// Remplace (ou crée) la couche `name` par `result`
    fn replace_named_result(&mut self, name: &str, result: &GridResult) -> Result<()>;

    /// Description lisible de l'emplacement de la couche `name`
    fn location(&self, name: &str) -> String;
}
