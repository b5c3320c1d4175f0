//! Flattening of `data/country/element` payloads into [`Record`] rows.

use crate::error::RecordError;
use crate::models::Record;
use crate::xml::{Document, Element};
use chrono::NaiveDate;

/// Convert a payload into one record per `element`.
///
/// Elements that cannot be parsed are logged and skipped. Returns `None` when no
/// row could be produced (no countries, no elements, or only broken ones).
pub fn to_table(doc: &Document) -> Option<Vec<Record>> {
    let mut records = Vec::new();
    for country in doc.root.children_named("country") {
        for element in country.children_named("element") {
            match parse_element(country, element) {
                Ok(r) => records.push(r),
                Err(e) => log::warn!("XML Read Error: {}", e),
            }
        }
    }
    if records.is_empty() { None } else { Some(records) }
}

/// Build the record for a single `element` of `country`.
pub fn parse_element(country: &Element, element: &Element) -> Result<Record, RecordError> {
    let id = country.attr("id").ok_or(RecordError::MissingId)?;

    let year_txt = element
        .child_text("year")
        .ok_or(RecordError::MissingField("year"))?;
    let year = year_txt
        .parse::<i32>()
        .map_err(|_| RecordError::InvalidField {
            field: "year",
            value: year_txt.to_string(),
        })?;
    let month = match element.child_text("month") {
        None | Some("") => 1,
        Some(m) => m.parse::<u32>().map_err(|_| RecordError::InvalidField {
            field: "month",
            value: m.to_string(),
        })?,
    };
    let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| RecordError::InvalidField {
        field: "date",
        value: format!("{year}-{month}"),
    })?;

    let indicator = element
        .child_text("indicator")
        .ok_or(RecordError::MissingField("indicator"))?;

    let value_txt = element
        .child_text("value")
        .ok_or(RecordError::MissingField("value"))?;
    let value = if value_txt.is_empty() {
        None
    } else {
        Some(
            value_txt
                .parse::<f64>()
                .map_err(|_| RecordError::InvalidField {
                    field: "value",
                    value: value_txt.to_string(),
                })?,
        )
    };

    Ok(Record {
        id: id.to_string(),
        date,
        indicator: indicator.to_string(),
        value,
    })
}
