//! Rapport de génération
//!
//! Résumé destiné à l'utilisateur (message court ou JSON complet).

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use extent_grid::GridResult;
use serde::Serialize;

/// Emprise calée de la grille, dans le système de travail
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Rapport d'une génération de grille
#[derive(Debug, Clone, Serialize)]
pub struct GridReport {
    /// Nom de la couche produite
    pub layer_name: String,
    /// Nombre de cellules
    pub cell_count: usize,
    /// Côté des cellules (mètres)
    pub cell_size_m: f64,
    /// Surface d'une cellule (hectares)
    pub area_ha_per_cell: f64,
    pub columns: usize,
    pub rows: usize,
    pub bounds: ReportBounds,
    /// Système de la grille
    pub working_epsg: u32,
    /// Système de l'emprise d'origine
    pub source_epsg: u32,
    pub source_geographic: bool,
    pub reprojected: bool,
    /// Emplacement de la couche écrite (None pour un calcul à blanc)
    pub output: Option<String>,
    pub duration_secs: f64,
}

impl GridReport {
    /// Construit le rapport d'une grille générée
    pub fn from_result(result: &GridResult, layer_name: &str, duration: Duration) -> Self {
        let layout = result.layout();
        let bounds = layout.bounds();
        let cell_size = result.cell_size();

        Self {
            layer_name: layer_name.to_string(),
            cell_count: result.count(),
            cell_size_m: cell_size.get(),
            area_ha_per_cell: cell_size.area_ha(),
            columns: layout.columns(),
            rows: layout.rows(),
            bounds: ReportBounds {
                min_x: bounds.min_x(),
                min_y: bounds.min_y(),
                max_x: bounds.max_x(),
                max_y: bounds.max_y(),
            },
            working_epsg: result.crs().epsg,
            source_epsg: result.source_crs().epsg,
            source_geographic: result.source_crs().is_geographic(),
            reprojected: result.reprojected(),
            output: None,
            duration_secs: duration.as_secs_f64(),
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Message de fin affiché à l'utilisateur
    pub fn message(&self) -> String {
        let mut message = format!(
            "Generated {} cells of side {} m.",
            self.cell_count, self.cell_size_m
        );
        if self.source_geographic {
            message.push_str(&format!(
                " (converted automatically to EPSG:{})",
                self.working_epsg
            ));
        }
        message
    }

    /// Rapport complet en JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Affichage détaillé sur la sortie standard
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("GRID REPORT - {}", self.layer_name);
        println!("{}", "=".repeat(60));

        println!("\nCells: {} ({} x {})", self.cell_count, self.columns, self.rows);
        println!(
            "Cell size: {} m ({} ha per cell)",
            self.cell_size_m, self.area_ha_per_cell
        );
        println!(
            "Bounds: {:.2}, {:.2}, {:.2}, {:.2} (EPSG:{})",
            self.bounds.min_x,
            self.bounds.min_y,
            self.bounds.max_x,
            self.bounds.max_y,
            self.working_epsg
        );
        if self.reprojected {
            println!("Source CRS: EPSG:{}", self.source_epsg);
        }
        if let Some(output) = &self.output {
            println!("Output: {}", output);
        }
        println!("Duration: {:.3}s", self.duration_secs);

        println!("\n{}", self.message());
        println!("{}", "=".repeat(60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extent_grid::{generate, CoordinateSystem, Extent, GridRequest};

    fn report(extent: Extent, crs: CoordinateSystem, cell_size: f64) -> GridReport {
        let result = generate(&GridRequest::new(extent, crs, cell_size)).unwrap();
        GridReport::from_result(&result, "Grid from view", Duration::from_millis(12))
    }

    #[test]
    fn test_report_from_result() {
        let report = report(
            Extent::new(0.0, 0.0, 450.0, 320.0).unwrap(),
            CoordinateSystem::puwg1992(),
            200.0,
        );

        assert_eq!(report.cell_count, 6);
        assert_eq!(report.columns, 3);
        assert_eq!(report.rows, 2);
        assert_eq!(report.area_ha_per_cell, 4.0);
        assert_eq!(report.bounds.max_x, 600.0);
        assert_eq!(report.bounds.max_y, 400.0);
        assert!(!report.reprojected);
        assert!(report.output.is_none());
    }

    #[test]
    fn test_message_projected_source() {
        let report = report(
            Extent::new(0.0, 0.0, 450.0, 320.0).unwrap(),
            CoordinateSystem::puwg1992(),
            200.0,
        );
        assert_eq!(report.message(), "Generated 6 cells of side 200 m.");
    }

    #[test]
    fn test_message_geographic_source() {
        let report = report(
            Extent::new(20.95, 52.2, 21.05, 52.25).unwrap(),
            CoordinateSystem::wgs84(),
            1000.0,
        );
        assert!(report.reprojected);
        assert!(report
            .message()
            .ends_with("m. (converted automatically to EPSG:2180)"));
    }

    #[test]
    fn test_to_json() {
        let report = report(
            Extent::new(-50.0, -50.0, 50.0, 50.0).unwrap(),
            CoordinateSystem::puwg1992(),
            100.0,
        )
        .with_output("/tmp/grid_from_view.geojson");

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["cell_count"], 4);
        assert_eq!(value["working_epsg"], 2180);
        assert_eq!(value["bounds"]["min_x"], -100.0);
        assert_eq!(value["output"], "/tmp/grid_from_view.geojson");
    }

    #[test]
    fn test_save_to_file() {
        let report = report(
            Extent::new(0.0, 0.0, 450.0, 320.0).unwrap(),
            CoordinateSystem::puwg1992(),
            200.0,
        );
        let path = std::env::temp_dir().join("viewgrid_test_report.json");
        report.save_to_file(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["layer_name"], "Grid from view");
        assert_eq!(value["columns"], 3);
        assert_eq!(value["rows"], 2);

        std::fs::remove_file(path).ok();
    }
}
