use crate::models::Record;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

/// Save records as CSV with header.
pub fn save_csv<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("id", "date", "indicator", "value"))?;
    for r in records {
        wtr.serialize((
            sanitize(&r.id),
            r.date.format("%Y-%m-%d").to_string(),
            sanitize(&r.indicator),
            r.value,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save records as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let rows = vec![Record {
            id: "IN".into(),
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            indicator: "Access to electricity".into(),
            value: Some(96.5),
        }];
        save_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }

    #[test]
    fn sanitize_only_touches_formula_starters() {
        assert_eq!(sanitize("=1+1"), "'=1+1");
        assert_eq!(sanitize("-3"), "'-3");
        assert_eq!(sanitize("GDP"), "GDP");
        assert_eq!(sanitize(""), "");
    }
}
