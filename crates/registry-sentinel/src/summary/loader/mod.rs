mod normalizer;
mod parser;

use super::domain::{AnomalyFlag, SummaryRecord};
use normalizer::{normalize_pincode, normalize_text};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("summary file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read summary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid summary CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: column '{field}' must not be empty")]
    MissingField { row: usize, field: &'static str },
    #[error("row {row}: is_anomaly must be -1 or 1, found '{value}'")]
    InvalidLabel { row: usize, value: String },
}

/// Recoverable conditions observed while loading. The snapshot is still
/// usable; callers decide how loudly to report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadWarning {
    AnomalyColumnMissing,
}

impl LoadWarning {
    pub const fn message(self) -> &'static str {
        match self {
            Self::AnomalyColumnMissing => {
                "is_anomaly column missing from source; every row treated as safe"
            }
        }
    }
}

/// Immutable in-memory copy of the registry summary table. Built once per
/// source read; all query operations are read-only projections over it.
#[derive(Debug)]
pub struct SummarySnapshot {
    records: Vec<SummaryRecord>,
    warnings: Vec<LoadWarning>,
}

impl SummarySnapshot {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Io(err)
            }
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let parsed = parser::parse_rows(reader)?;

        let mut warnings = Vec::new();
        if !parsed.has_anomaly_column {
            warnings.push(LoadWarning::AnomalyColumnMissing);
        }

        let mut records = Vec::with_capacity(parsed.rows.len());
        for (index, row) in parsed.rows.into_iter().enumerate() {
            // Data rows start on line 2; the header occupies line 1.
            let row_number = index + 2;
            records.push(build_record(row, row_number, parsed.has_anomaly_column)?);
        }

        Ok(Self { records, warnings })
    }

    pub fn records(&self) -> &[SummaryRecord] {
        &self.records
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn build_record(
    row: parser::RawSummaryRow,
    row_number: usize,
    has_anomaly_column: bool,
) -> Result<SummaryRecord, LoadError> {
    let state = normalize_text(&row.state);
    if state.is_empty() {
        return Err(LoadError::MissingField {
            row: row_number,
            field: "state",
        });
    }

    let district = normalize_text(&row.district);
    if district.is_empty() {
        return Err(LoadError::MissingField {
            row: row_number,
            field: "district",
        });
    }

    let pincode = normalize_pincode(&row.pincode);
    if pincode.is_empty() {
        return Err(LoadError::MissingField {
            row: row_number,
            field: "pincode",
        });
    }

    let flag = if has_anomaly_column {
        let raw = row.is_anomaly.as_deref().unwrap_or("").trim().to_string();
        raw.parse::<i64>()
            .ok()
            .and_then(AnomalyFlag::from_label)
            .ok_or(LoadError::InvalidLabel {
                row: row_number,
                value: raw,
            })?
    } else {
        AnomalyFlag::Normal
    };

    let observed_on = row.observed_on();

    Ok(SummaryRecord {
        state,
        district,
        pincode,
        total_updates: row.total_updates,
        total_enrolment: row.total_enrolment,
        sat_score: row.sat_score,
        observed_on,
        flag,
    })
}
