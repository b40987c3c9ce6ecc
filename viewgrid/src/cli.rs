//! Définition et implémentation des commandes CLI
//!
//! - `generate` : emprise → grille → couche GeoJSON nommée
//! - `layout` : calcul à blanc de la grille calée
//! - `crs` : systèmes de coordonnées reconnus

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use extent_grid::{
    parse_epsg, CellSize, CoordinateSystem, Extent, ExtentNormalizer, GridGenerator, GridRequest,
    Unit,
};
use tracing::{debug, info};

use viewgrid::{Config, GeoJsonDirStore, GridReport, ResultStore};

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a grid covering the extent and store it as a named layer
    Generate(GenerateArgs),

    /// Compute the snapped grid layout without writing anything
    Layout(ExtentArgs),

    /// List the coordinate systems handled without PROJ
    Crs,
}

/// Emprise et réglages communs aux commandes de génération
#[derive(Args, Debug, Clone)]
pub struct ExtentArgs {
    /// View extent as xmin,ymin,xmax,ymax
    #[arg(short, long, value_parser = parse_extent, allow_hyphen_values = true)]
    pub extent: Extent,

    /// Coordinate system of the extent (EPSG:4326, 2154, ...)
    #[arg(long, default_value = "EPSG:2180")]
    pub crs: String,

    /// Treat a CRS outside the built-in table as geographic (degrees)
    #[arg(long)]
    pub geographic: bool,

    /// Cell side in metres (default: config / 200)
    #[arg(short = 's', long)]
    pub cell_size: Option<f64>,

    /// Path to a JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub extent: ExtentArgs,

    /// Output directory for the GeoJSON layer
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Layer name; an existing layer with this name is replaced
    #[arg(short, long)]
    pub name: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Also save the JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

/// Exécute la commande generate ; rapport détaillé si `verbose > 0`
pub fn cmd_generate(args: &GenerateArgs, verbose: u8) -> Result<()> {
    let mut config = Config::resolve(args.extent.config.as_deref())?;
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(name) = &args.name {
        config.layer_name = name.clone();
    }
    config.validate().context("Invalid command line overrides")?;

    let request = build_request(&args.extent, &config)?;
    let mut store = GeoJsonDirStore::new(&config.output_dir);
    let report = run_generate(&request, &config, &mut store)?;

    if let Some(path) = &args.report {
        report
            .save_to_file(path)
            .context(format!("Failed to write report: {}", path.display()))?;
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else if verbose > 0 {
        report.display();
    } else {
        println!("{}", report.message());
    }
    Ok(())
}

/// Génère la grille et la remplace dans `store` ; rien n'est écrit en cas d'erreur
pub fn run_generate<S: ResultStore>(
    request: &GridRequest,
    config: &Config,
    store: &mut S,
) -> Result<GridReport> {
    let start = Instant::now();

    info!(
        extent = %request.extent,
        crs = %request.source_crs,
        cell_size = request.cell_size,
        "Generating grid"
    );

    let result = generator(config)
        .generate(request)
        .context("Grid generation failed")?;

    store
        .replace_named_result(&config.layer_name, &result)
        .context(format!("Failed to store layer '{}'", config.layer_name))?;

    let report = GridReport::from_result(&result, &config.layer_name, start.elapsed())
        .with_output(store.location(&config.layer_name));

    info!(
        cells = report.cell_count,
        layer = %config.layer_name,
        duration_secs = report.duration_secs,
        "Grid stored"
    );
    Ok(report)
}

/// Exécute la commande layout
pub fn cmd_layout(args: &ExtentArgs) -> Result<()> {
    let config = Config::resolve(args.config.as_deref())?;
    let request = build_request(args, &config)?;

    let (layout, crs) = generator(&config)
        .layout(&request)
        .context("Grid layout failed")?;
    let bounds = layout.bounds();

    println!("CRS: {}", crs);
    println!(
        "Bounds: {}, {}, {}, {}",
        bounds.min_x(),
        bounds.min_y(),
        bounds.max_x(),
        bounds.max_y()
    );
    println!("Columns: {}", layout.columns());
    println!("Rows: {}", layout.rows());
    println!(
        "Cells: {}",
        layout.cell_count().unwrap_or(usize::MAX)
    );
    println!("Area per cell: {} ha", layout.cell_size().area_ha());
    Ok(())
}

/// Exécute la commande crs
pub fn cmd_crs() -> Result<()> {
    println!("Built-in coordinate systems:");
    for crs in CoordinateSystem::known() {
        let unit = match crs.unit {
            Unit::Degrees => "degrees",
            Unit::Metres => "metres",
        };
        println!("  {:<12} {:<28} {}", crs.authid(), crs.name, unit);
    }
    println!("Grid CRS: {}", CoordinateSystem::puwg1992());
    println!(
        "PROJ fallback: {}",
        if extent_grid::reproject::is_available() {
            "enabled"
        } else {
            "disabled (build with --features reproject)"
        }
    );
    Ok(())
}

/// Assemble la requête : taille bornée par la config, système résolu
pub fn build_request(args: &ExtentArgs, config: &Config) -> Result<GridRequest> {
    let value = args.cell_size.unwrap_or(config.cell_size);
    let cell_size = CellSize::bounded(value, &config.cell_size_range())
        .context("Invalid cell size")?;
    let source = resolve_crs(&args.crs, args.geographic)?;
    debug!(crs = %source, cell_size = cell_size.get(), "Request resolved");

    Ok(GridRequest::new(args.extent, source, cell_size.get()).with_max_cells(config.max_cells))
}

fn generator(config: &Config) -> GridGenerator {
    GridGenerator::new(ExtentNormalizer::puwg1992().with_densify(config.densify))
}

/// Lit une emprise `xmin,ymin,xmax,ymax`
pub fn parse_extent(value: &str) -> Result<Extent, String> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        [min_x, min_y, max_x, max_y] => {
            Extent::new(*min_x, *min_y, *max_x, *max_y).map_err(|e| e.to_string())
        }
        _ => Err(format!(
            "expected 4 comma-separated values (xmin,ymin,xmax,ymax), got {}",
            parts.len()
        )),
    }
}

/// Résout un identifiant de système ; hors table, l'unité vient de `geographic`
pub fn resolve_crs(spec: &str, geographic: bool) -> Result<CoordinateSystem> {
    let epsg = parse_epsg(spec)?;
    Ok(CoordinateSystem::from_epsg(epsg).unwrap_or_else(|| {
        let unit = if geographic { Unit::Degrees } else { Unit::Metres };
        CoordinateSystem::custom(epsg, unit)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewgrid::MemoryStore;

    fn args(extent: &str, crs: &str, cell_size: Option<f64>) -> ExtentArgs {
        ExtentArgs {
            extent: parse_extent(extent).unwrap(),
            crs: crs.to_string(),
            geographic: false,
            cell_size,
            config: None,
        }
    }

    #[test]
    fn test_parse_extent() {
        let extent = parse_extent("-50, -50.5,50,50").unwrap();
        assert_eq!(extent.min_x(), -50.0);
        assert_eq!(extent.min_y(), -50.5);

        assert!(parse_extent("0,0,10").is_err());
        assert!(parse_extent("0,0,ten,10").is_err());
        assert!(parse_extent("10,0,0,10").is_err());
    }

    #[test]
    fn test_resolve_crs() {
        assert_eq!(resolve_crs("EPSG:4326", false).unwrap().unit, Unit::Degrees);
        assert_eq!(resolve_crs("2180", false).unwrap(), CoordinateSystem::puwg1992());

        let custom = resolve_crs("epsg:4277", true).unwrap();
        assert_eq!(custom.epsg, 4277);
        assert!(custom.is_geographic());

        assert!(resolve_crs("ESRI:102100", false).is_err());
    }

    #[test]
    fn test_build_request_uses_config_defaults() {
        let config = Config::default();
        let request = build_request(&args("0,0,450,320", "EPSG:2180", None), &config).unwrap();

        assert_eq!(request.cell_size, 200.0);
        assert_eq!(request.max_cells, Some(1_000_000));
    }

    #[test]
    fn test_build_request_rejects_out_of_range_size() {
        let config = Config::default();
        assert!(build_request(&args("0,0,450,320", "EPSG:2180", Some(0.5)), &config).is_err());
        assert!(build_request(&args("0,0,450,320", "EPSG:2180", Some(20000.0)), &config).is_err());
    }

    #[test]
    fn test_run_generate_replaces_layer() {
        let config = Config::default();
        let mut store = MemoryStore::new();

        let first = build_request(&args("0,0,450,320", "EPSG:2180", None), &config).unwrap();
        run_generate(&first, &config, &mut store).unwrap();
        let second = build_request(&args("0,0,150,150", "EPSG:2180", None), &config).unwrap();
        let report = run_generate(&second, &config, &mut store).unwrap();

        assert_eq!(report.cell_count, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&config.layer_name).unwrap().count(), 1);
        assert_eq!(report.output.as_deref(), Some("memory:Grid from view"));
    }

    #[test]
    fn test_failed_run_leaves_store_untouched() {
        let config = Config {
            max_cells: 10,
            ..Config::default()
        };
        let mut store = MemoryStore::new();

        let small = build_request(&args("0,0,450,320", "EPSG:2180", None), &config).unwrap();
        run_generate(&small, &config, &mut store).unwrap();

        let large = build_request(&args("0,0,5000,5000", "EPSG:2180", None), &config).unwrap();
        assert!(run_generate(&large, &config, &mut store).is_err());
        assert_eq!(store.get(&config.layer_name).unwrap().count(), 6);
    }

    #[test]
    fn test_cmd_generate_writes_layer_and_report() {
        let dir = std::env::temp_dir().join("viewgrid_test_cli_generate");
        std::fs::remove_dir_all(&dir).ok();
        let report_path = dir.join("report.json");

        let args = GenerateArgs {
            extent: args("0,0,450,320", "EPSG:2180", Some(200.0)),
            output: Some(dir.clone()),
            name: Some("Siatka z widoku".to_string()),
            json: false,
            report: Some(report_path.clone()),
        };
        std::fs::create_dir_all(&dir).unwrap();
        cmd_generate(&args, 1).unwrap();

        assert!(dir.join("siatka_z_widoku.geojson").exists());
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(value["cell_count"], 6);
        assert_eq!(value["layer_name"], "Siatka z widoku");

        std::fs::remove_dir_all(dir).ok();
    }
}
