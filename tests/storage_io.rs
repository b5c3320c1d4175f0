use chrono::NaiveDate;
use gecon::models::Record;
use gecon::storage;
use std::fs;
use std::path::PathBuf;

fn sample(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            id: "IN".into(),
            date: NaiveDate::from_ymd_opt(2000 + i as i32, 1, 1).unwrap(),
            indicator: "Exports, percent of GDP".into(),
            value: Some(10.0 + i as f64),
        })
        .collect()
}

#[test]
fn save_csv_and_json() {
    let rows = sample(3);
    let tmp = tempfile::tempdir().unwrap();

    let csv_path: PathBuf = tmp.path().join("gecon_test.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("id,date,indicator,value"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());
    assert!(csv_txt.contains("IN,2000-01-01,\"Exports, percent of GDP\",10"));

    let json_path: PathBuf = tmp.path().join("gecon_test.json");
    storage::save_json(&rows, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    assert_eq!(v.as_array().unwrap().len(), rows.len());
    assert_eq!(v[1]["date"], "2001-01-01");
}

#[test]
fn missing_values_are_empty_cells() {
    let mut rows = sample(1);
    rows[0].value = None;
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("null.csv");
    storage::save_csv(&rows, &p).unwrap();
    let mut rdr = csv::Reader::from_path(&p).unwrap();
    let row = rdr.records().next().unwrap().unwrap();
    assert_eq!(row.get(3), Some(""));
}

// Spreadsheet apps evaluate cells starting with = + - @ as formulas;
// such cells are written with a leading single quote.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let rows = vec![Record {
        id: "@foo".into(),
        date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        indicator: "=HYPERLINK(\"http://evil\")".into(),
        value: Some(1.0),
    }];

    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("csv_injection.csv");
    storage::save_csv(&rows, &p).unwrap();

    let mut rdr = csv::Reader::from_path(&p).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    let cell = |name: &str| {
        let idx = headers.iter().position(|h| h == name).expect("header present");
        row.get(idx).unwrap().to_string()
    };

    let id = cell("id");
    assert!(id.starts_with('\''), "id not prefixed: {id}");
    assert!(id.contains("@foo"));

    let ind = cell("indicator");
    assert!(ind.starts_with('\''), "indicator not prefixed: {ind}");
    assert!(ind.contains("=HYPERLINK"));
}
