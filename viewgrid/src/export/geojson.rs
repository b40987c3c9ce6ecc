//! Export d'une grille vers GeoJSON avec geozero (streaming)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use extent_grid::{GridCell, GridResult};
use geo::Geometry;
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;

/// Exporte une grille dans un fichier GeoJSON
pub fn export_to_geojson(result: &GridResult, layer_name: &str, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_feature_collection(&mut writer, result, layer_name)?;
    writer.flush()?;

    Ok(())
}

/// Écrit la FeatureCollection complète (nom de couche, CRS, cellules)
pub fn write_feature_collection<W: Write>(
    writer: &mut W,
    result: &GridResult,
    layer_name: &str,
) -> Result<()> {
    // Header FeatureCollection avec CRS
    write!(
        writer,
        r#"{{"type":"FeatureCollection","name":{},"crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:EPSG::{}"}}}},"features":["#,
        serde_json::to_string(layer_name)?,
        result.crs().epsg
    )?;

    for (i, cell) in result.cells().iter().enumerate() {
        if i > 0 {
            write!(writer, ",")?;
        }
        write_cell(writer, cell)?;
    }

    // Footer
    write!(writer, "]}}")?;
    Ok(())
}

/// Écrit une cellule en Feature GeoJSON
fn write_cell<W: Write>(writer: &mut W, cell: &GridCell) -> Result<()> {
    write!(writer, r#"{{"type":"Feature","id":{},"geometry":"#, cell.id)?;

    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    Geometry::Polygon(cell.polygon()).process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(
        writer,
        r#","properties":{{"id":{},"col":{},"row":{},"area_ha":{}}}}}"#,
        cell.id,
        cell.col,
        cell.row,
        serde_json::to_string(&cell.area_ha)?
    )?;

    Ok(())
}
