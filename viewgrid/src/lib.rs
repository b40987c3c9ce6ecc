//! # viewgrid
//!
//! Génère une grille de cellules carrées couvrant la vue courante d'une carte
//! et l'enregistre comme couche GeoJSON nommée.
//!
//! ## Usage CLI
//!
//! ```bash
//! # Grille de 200 m sur une vue en WGS 84 (convertie en EPSG:2180)
//! viewgrid generate --extent 20.9,52.1,21.1,52.3 --crs EPSG:4326 --output ./grids/
//!
//! # Calcul à blanc : emprise calée et nombre de cellules
//! viewgrid layout --extent 637000,486000,651000,509000 --cell-size 500
//! ```

pub mod config;
pub mod export;
pub mod report;
pub mod store;

pub use config::{Config, ConfigError, DEFAULT_LAYER_NAME};
pub use export::{export_to_geojson, write_feature_collection};
pub use report::GridReport;
pub use store::{layer_file_name, GeoJsonDirStore, MemoryStore, ResultStore};
