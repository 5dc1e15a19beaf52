//! Boundary with record sources
//!
//! Storage backends hand over rows of `(subject_id, name, level,
//! boundary_data, distribution_data)`; this module turns them into records
//! keyed by subject id.

use crate::normalize::{Boundaries, Distribution, RawData};
use crate::subject::SubjectRecord;
use grade_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// One raw subject row as supplied by a record source
///
/// Boundary and distribution data may each be a structured mapping or text,
/// so a row deserializes from e.g. JSON whether the source stored objects
/// or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRow {
    pub subject_id: i64,
    pub name: String,
    pub level: String,
    pub boundary_data: RawData<Boundaries>,
    pub distribution_data: RawData<Distribution>,
}

impl<B, D> From<(i64, &str, &str, B, D)> for SubjectRow
where
    B: Into<RawData<Boundaries>>,
    D: Into<RawData<Distribution>>,
{
    fn from(row: (i64, &str, &str, B, D)) -> Self {
        let (subject_id, name, level, boundary_data, distribution_data) = row;
        Self {
            subject_id,
            name: name.to_string(),
            level: level.to_string(),
            boundary_data: boundary_data.into(),
            distribution_data: distribution_data.into(),
        }
    }
}

impl TryFrom<SubjectRow> for SubjectRecord {
    type Error = grade_core::Error;

    fn try_from(row: SubjectRow) -> Result<Self> {
        SubjectRecord::new(
            row.subject_id,
            row.name,
            row.level,
            row.boundary_data,
            row.distribution_data,
        )
    }
}

/// Build a lookup of records keyed by subject id
///
/// A later row with an already-seen id replaces the earlier record.
///
/// # Errors
///
/// The first row that fails record construction aborts the load.
#[instrument(skip_all)]
pub fn subjects_from_rows<I>(rows: I) -> Result<HashMap<i64, SubjectRecord>>
where
    I: IntoIterator,
    I::Item: Into<SubjectRow>,
{
    let mut subjects = HashMap::new();
    for row in rows {
        let record = SubjectRecord::try_from(row.into())?;
        let subject_id = record.subject_id();
        if let Some(previous) = subjects.insert(subject_id, record) {
            warn!(
                subject_id,
                replaced = previous.name(),
                "duplicate subject id, keeping the later row"
            );
        }
    }
    debug!(count = subjects.len(), "loaded subject records");
    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grade_core::Error;

    #[test]
    fn test_rows_from_tuples() {
        let rows = vec![
            (1i64, "Biology", "HL", "{'1': (0, 50), '2': (51, 100)}", "{'1': 1, '2': 1}"),
            (2, "Biology", "SL", "{'1': (0, 40), '2': (41, 100)}", "{'1': 1, '2': 3}"),
        ];
        let subjects = subjects_from_rows(rows).unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[&2].level(), "SL");
        assert_eq!(subjects[&2].weight("2").unwrap(), 0.75);
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let rows = vec![
            (7i64, "Old name", "HL", "{'1': (0, 100)}", "{'1': 1}"),
            (7, "New name", "HL", "{'1': (0, 100)}", "{'1': 1}"),
        ];
        let subjects = subjects_from_rows(rows).unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[&7].name(), "New name");
    }

    #[test]
    fn test_bad_row_aborts_load() {
        let rows = vec![
            (1i64, "Good", "HL", "{'1': (0, 100)}", "{'1': 1}"),
            (2, "Bad", "HL", "{'1': (0, 100)}", "{'1': __import__}"),
        ];
        assert!(matches!(subjects_from_rows(rows), Err(Error::Format { .. })));
    }

    #[test]
    fn test_mixed_structured_and_text() {
        let bounds = Boundaries::from([("P".to_string(), (40, 100)), ("F".to_string(), (0, 39))]);
        let row = SubjectRow::from((3i64, "Chemistry", "SL", bounds, "{'P': 0.8, 'F': 0.2}"));
        let record = SubjectRecord::try_from(row).unwrap();
        assert_eq!(record.grades(), &["F", "P"]);
    }
}
