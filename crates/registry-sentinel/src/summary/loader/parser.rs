use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Row as it appears in the summary CSV, before validation and label
/// derivation. `is_anomaly` stays raw text here so the loader can tell an
/// absent column apart from an out-of-range value.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSummaryRow {
    pub(crate) state: String,
    pub(crate) district: String,
    pub(crate) pincode: String,
    pub(crate) total_updates: u64,
    #[serde(default, deserialize_with = "empty_u64_as_none")]
    pub(crate) total_enrolment: Option<u64>,
    #[serde(default, deserialize_with = "empty_f64_as_none")]
    pub(crate) sat_score: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) is_anomaly: Option<String>,
}

impl RawSummaryRow {
    pub(crate) fn observed_on(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }
}

pub(crate) struct ParsedTable {
    pub(crate) has_anomaly_column: bool,
    pub(crate) rows: Vec<RawSummaryRow>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<ParsedTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let has_anomaly_column = csv_reader
        .headers()?
        .iter()
        .any(|header| header == "is_anomaly");

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<RawSummaryRow>() {
        rows.push(record?);
    }

    Ok(ParsedTable {
        has_anomaly_column,
        rows,
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_u64_as_none<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| value.trim().parse::<u64>().map_err(serde::de::Error::custom))
        .transpose()
}

fn empty_f64_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| value.trim().parse::<f64>().map_err(serde::de::Error::custom))
        .transpose()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
