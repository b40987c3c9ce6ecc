use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use extent_grid::GridResult;
use serde::Deserialize;
use tracing::debug;

use super::ResultStore;
use crate::export::geojson::export_to_geojson;

/// Stockage des couches en fichiers `<nom>.geojson` dans un dossier
///
/// Le fichier est écrit à côté puis renommé : la couche précédente reste
/// intacte si l'écriture échoue. Plusieurs noms peuvent donner le même
/// fichier (`Grid from view`, `grid_from_view`) ; le nom exact est conservé
/// dans le membre `name` du fichier et seule une couche de même nom peut
/// le remplacer.
#[derive(Debug, Clone)]
pub struct GeoJsonDirStore {
    dir: PathBuf,
}

impl GeoJsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Chemin du fichier de la couche `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(layer_file_name(name))
    }
}

impl ResultStore for GeoJsonDirStore {
    fn replace_named_result(&mut self, name: &str, result: &GridResult) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .context(format!("Failed to create directory: {}", self.dir.display()))?;

        let path = self.path_for(name);
        if let Some(existing) = stored_layer_name(&path)? {
            if existing != name {
                bail!(
                    "{} already holds layer '{}', not replacing it with '{}'",
                    path.display(),
                    existing,
                    name
                );
            }
        }
        let tmp = path.with_extension("geojson.tmp");

        if let Err(e) = export_to_geojson(result, name, &tmp) {
            std::fs::remove_file(&tmp).ok();
            return Err(e);
        }

        if path.exists() {
            debug!(path = %path.display(), "Replacing existing grid layer");
        }
        std::fs::rename(&tmp, &path)
            .context(format!("Failed to replace {}", path.display()))?;

        Ok(())
    }

    fn location(&self, name: &str) -> String {
        self.path_for(name).display().to_string()
    }
}

#[derive(Deserialize)]
struct LayerHeader {
    name: Option<String>,
}

/// Nom de couche enregistré dans un fichier existant (None si absent)
fn stored_layer_name(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let file =
        File::open(path).context(format!("Failed to open layer: {}", path.display()))?;
    let header: LayerHeader = serde_json::from_reader(BufReader::new(file))
        .context(format!("Failed to read existing layer: {}", path.display()))?;
    Ok(header.name)
}

/// Nom de fichier dérivé du nom de couche (`Grid from view` → `grid_from_view.geojson`)
pub fn layer_file_name(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            stem.push(c);
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_matches('_');

    if stem.is_empty() {
        "grid.geojson".to_string()
    } else {
        format!("{}.geojson", stem)
    }
}
