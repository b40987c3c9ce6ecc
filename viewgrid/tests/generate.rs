//! Tests d'intégration : génération puis stockage en couche GeoJSON

use std::path::PathBuf;

use extent_grid::{generate, CoordinateSystem, Extent, GridRequest, GridResult};
use geojson::{feature::Id, FeatureCollection, GeoJson, Value};
use viewgrid::{GeoJsonDirStore, GridReport, ResultStore, DEFAULT_LAYER_NAME};

fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("viewgrid_it_{}", name));
    std::fs::remove_dir_all(&dir).ok();
    dir
}

fn grid(extent: Extent, crs: CoordinateSystem, cell_size: f64) -> GridResult {
    generate(&GridRequest::new(extent, crs, cell_size)).unwrap()
}

fn read_layer(store: &GeoJsonDirStore, name: &str) -> FeatureCollection {
    let content = std::fs::read_to_string(store.path_for(name)).unwrap();
    match content.parse::<GeoJson>().unwrap() {
        GeoJson::FeatureCollection(fc) => fc,
        other => panic!("expected a FeatureCollection, got {:?}", other),
    }
}

#[test]
fn test_layer_matches_grid() {
    let dir = output_dir("layer");
    let mut store = GeoJsonDirStore::new(&dir);
    let result = grid(
        Extent::new(0.0, 0.0, 450.0, 320.0).unwrap(),
        CoordinateSystem::puwg1992(),
        200.0,
    );

    store
        .replace_named_result(DEFAULT_LAYER_NAME, &result)
        .unwrap();
    let fc = read_layer(&store, DEFAULT_LAYER_NAME);

    assert_eq!(fc.features.len(), 6);
    let members = fc.foreign_members.as_ref().unwrap();
    assert_eq!(members["name"], DEFAULT_LAYER_NAME);
    assert_eq!(
        members["crs"]["properties"]["name"],
        "urn:ogc:def:crs:EPSG::2180"
    );

    for (i, feature) in fc.features.iter().enumerate() {
        assert_eq!(feature.id, Some(Id::Number(i.into())));
        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props["id"], i);
        assert_eq!(props["area_ha"], 4.0);
    }

    // Première cellule : coin haut gauche
    let first = &fc.features[0];
    assert_eq!(first.property("col").unwrap(), 0);
    assert_eq!(first.property("row").unwrap(), 0);
    match &first.geometry.as_ref().unwrap().value {
        Value::Polygon(rings) => {
            assert_eq!(rings.len(), 1);
            assert_eq!(rings[0].len(), 5);
            assert_eq!(rings[0].first(), rings[0].last());
            let xs = rings[0].iter().map(|p| p[0]).collect::<Vec<_>>();
            let ys = rings[0].iter().map(|p| p[1]).collect::<Vec<_>>();
            assert_eq!(xs.iter().cloned().fold(f64::MAX, f64::min), 0.0);
            assert_eq!(xs.iter().cloned().fold(f64::MIN, f64::max), 200.0);
            assert_eq!(ys.iter().cloned().fold(f64::MAX, f64::min), 200.0);
            assert_eq!(ys.iter().cloned().fold(f64::MIN, f64::max), 400.0);
        }
        other => panic!("expected a Polygon, got {:?}", other),
    }

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_second_run_replaces_first() {
    let dir = output_dir("replace");
    let mut store = GeoJsonDirStore::new(&dir);

    let first = grid(
        Extent::new(0.0, 0.0, 450.0, 320.0).unwrap(),
        CoordinateSystem::puwg1992(),
        200.0,
    );
    let second = grid(
        Extent::new(-50.0, -50.0, 50.0, 50.0).unwrap(),
        CoordinateSystem::puwg1992(),
        100.0,
    );

    store.replace_named_result(DEFAULT_LAYER_NAME, &first).unwrap();
    store.replace_named_result(DEFAULT_LAYER_NAME, &second).unwrap();

    let fc = read_layer(&store, DEFAULT_LAYER_NAME);
    assert_eq!(fc.features.len(), 4);
    assert_eq!(fc.features[0].property("area_ha").unwrap(), 1.0);
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_geographic_view_report() {
    let dir = output_dir("geographic");
    let mut store = GeoJsonDirStore::new(&dir);
    let result = grid(
        Extent::new(20.9, 52.1, 21.1, 52.3).unwrap(),
        CoordinateSystem::wgs84(),
        1000.0,
    );

    store.replace_named_result("Siatka z widoku", &result).unwrap();
    let report = GridReport::from_result(&result, "Siatka z widoku", Default::default())
        .with_output(store.location("Siatka z widoku"));

    assert!(store.path_for("Siatka z widoku").ends_with("siatka_z_widoku.geojson"));
    assert_eq!(read_layer(&store, "Siatka z widoku").features.len(), report.cell_count);
    assert_eq!(report.working_epsg, 2180);
    assert_eq!(report.source_epsg, 4326);
    assert_eq!(
        report.message(),
        format!(
            "Generated {} cells of side 1000 m. (converted automatically to EPSG:2180)",
            report.cell_count
        )
    );

    std::fs::remove_dir_all(dir).ok();
}
