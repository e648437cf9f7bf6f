use std::fs;

use choropleth::{
    compute_breaks,
    io::{read_csv_str, read_regions, read_regions_str, to_geojson, write_classified_csv_string, write_json},
    join_summary, Config, Session, MISSING_COLOR,
};

const CSV: &str = "\
GEOID,population,rate
08001,10,0.5
08003,20,1.5
08005,30,n/a
08007,40,2.5
08009,1000,
99999,7,7
";

fn square(x: f64) -> String {
    format!("[[[{x}, 0], [{}, 0], [{}, 1], [{x}, 1], [{x}, 0]]]", x + 1.0, x + 1.0)
}

fn feature_collection() -> String {
    let features: Vec<String> = ["08001", "08003", "08005", "08007", "08009", "08011"].iter().enumerate()
        .map(|(i, id)| format!(
            r#"{{ "type": "Feature", "properties": {{ "GEOID": "{id}" }}, "geometry": {{ "type": "Polygon", "coordinates": {} }} }}"#,
            square(i as f64),
        ))
        .collect();
    format!(r#"{{ "type": "FeatureCollection", "features": [{}] }}"#, features.join(", "))
}

fn session(regions: &str) -> Session {
    let config = Config::default();
    let table = read_csv_str(CSV, &config.csv_key, b',').unwrap();
    let mut records = read_regions_str(regions, &config).unwrap();
    let summary = join_summary(&mut records, &table.rows, &table.columns);
    assert_eq!(summary.matched, 5);
    assert_eq!(summary.unmatched_rows, 1);
    Session::new(records, table.columns, config).unwrap()
}

#[test]
fn geojson_pipeline_colors_every_region() {
    let s = session(&feature_collection());
    assert_eq!(s.attributes(), &["population", "rate"]);
    assert_eq!(s.expressed(), "population");
    assert_eq!(s.classification().thresholds(), &[20.0, 30.0, 40.0, 1000.0]);

    let colors = s.colors();
    assert_eq!(colors.len(), 6);
    for (i, (key, color)) in colors.iter().take(5).enumerate() {
        assert_eq!(color, &s.classification().colors()[i], "region {key}");
    }
    // 08011 has no row in the table.
    assert_eq!(colors[5].1, MISSING_COLOR);

    let geojson = to_geojson(s.records(), s.classification(), "GEOID");
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 6);
    assert_eq!(features[0]["properties"]["GEOID"], "08001");
    assert_eq!(features[0]["properties"]["class"], 0);
    assert_eq!(features[5]["properties"]["class"], serde_json::Value::Null);
    assert_eq!(features[5]["properties"]["fill"], MISSING_COLOR);
    assert_eq!(features[0]["geometry"]["type"], "MultiPolygon");
}

#[test]
fn switching_attributes_replaces_classification() {
    let mut s = session(&feature_collection());
    s.select("rate").unwrap();
    assert_eq!(s.expressed(), "rate");

    // 0.5, 1.5, 2.5 are the only finite rates: three classes out of five requested.
    let classification = s.classification();
    assert_eq!(classification.num_classes(), 3);
    assert_eq!(classification.thresholds(), &[1.5, 2.5]);
    assert_eq!(classification.color_for(&s.records()[2]), MISSING_COLOR);
    assert_eq!(classification.color_for(&s.records()[4]), MISSING_COLOR);

    let legend = s.legend();
    assert_eq!(legend.attribute, "rate");
    assert_eq!(legend.entries.len(), 4);
    assert_eq!(legend.entries.last().unwrap().color, MISSING_COLOR);

    let csv = write_classified_csv_string(s.records(), s.classification()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("key,rate,class,fill"));
    assert_eq!(lines.count(), 6);
}

#[test]
fn topojson_regions_join_the_same_way() {
    let topology = r#"{
        "type": "Topology",
        "arcs": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]], [[1, 0], [2, 0], [2, 1], [1, 1], [1, 0]]],
        "objects": { "counties": { "type": "GeometryCollection", "geometries": [
            { "type": "Polygon", "arcs": [[0]], "properties": { "GEOID": "08001" } },
            { "type": "Polygon", "arcs": [[1]], "properties": { "GEOID": "08003" } },
            { "type": "Polygon", "arcs": [[0]], "properties": { "GEOID": "08005" } },
            { "type": "Polygon", "arcs": [[1]], "properties": { "GEOID": "08007" } },
            { "type": "Polygon", "arcs": [[0]], "properties": { "GEOID": "08009" } }
        ] } }
    }"#;
    let config = Config::default();
    let table = read_csv_str(CSV, "GEOID", b',').unwrap();
    let mut records = read_regions_str(topology, &config).unwrap();
    assert_eq!(records.len(), 5);
    join_summary(&mut records, &table.rows, &table.columns);

    let s = Session::new(records, table.columns, config).unwrap();
    assert_eq!(s.classification().thresholds(), &[20.0, 30.0, 40.0, 1000.0]);
    let radii = s.radii();
    assert!(radii.iter().all(|(_, r)| r.is_some()));
    assert!(radii[4].1.unwrap() > radii[0].1.unwrap());
}

#[test]
fn breaks_match_session_thresholds() {
    let s = session(&feature_collection());
    let values: Vec<f64> = s.records().iter().map(|r| r.value("population")).collect();
    assert_eq!(compute_breaks(&values, 5).unwrap(), s.classification().thresholds());
}

#[test]
fn bar_chart_orders_descending_with_missing_last() {
    let s = session(&feature_collection());
    let chart = s.bars();
    let keys: Vec<&str> = chart.bars.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["08009", "08007", "08005", "08003", "08001", "08011"]);
    assert_eq!(chart.bars[5].value, None);
}

#[test]
fn outputs_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let regions_path = dir.path().join("regions.geojson");
    fs::write(&regions_path, feature_collection()).unwrap();

    let config = Config::default();
    let records = read_regions(&regions_path, &config).unwrap();
    let table = read_csv_str(CSV, "GEOID", b',').unwrap();
    let s = Session::from_rows(records, &table.rows, table.columns, config).unwrap();

    let out = dir.path().join("out.geojson");
    write_json(&to_geojson(s.records(), s.classification(), "GEOID"), &out).unwrap();
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["type"], "FeatureCollection");

    let legend = dir.path().join("legend.json");
    write_json(&s.legend(), &legend).unwrap();
    assert!(fs::read_to_string(&legend).unwrap().contains("No data"));
}
