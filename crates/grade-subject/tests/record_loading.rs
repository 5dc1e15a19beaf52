//! Loading subject records from serialized rows

use approx::assert_relative_eq;
use grade_subject::{
    bounds_to_literal, normalize_bounds, subjects_from_rows, Boundaries, Distribution, Error,
    RawData, SubjectRecord, SubjectRow,
};
use proptest::prelude::*;

const ROWS_JSON: &str = r#"[
    {
        "subject_id": 11,
        "name": "Business Management",
        "level": "HL",
        "boundary_data": {"1": [0, 14], "2": [15, 26], "3": [27, 37], "4": [38, 49],
                          "5": [50, 56], "6": [57, 67], "7": [68, 100]},
        "distribution_data": {"1": 0.002, "2": 0.021, "3": 0.073, "4": 0.212,
                              "5": 0.201, "6": 0.308, "7": 0.183}
    },
    {
        "subject_id": 12,
        "name": "Visual Arts",
        "level": "SL",
        "boundary_data": "{'1': (0, 19), '2': (20, 39), '3': (40, 59), '4': (60, 100)}",
        "distribution_data": "{'1': 10, '2': 20, '3': 30, '4': 40}"
    }
]"#;

#[test]
fn test_rows_deserialize_from_objects_and_text() -> anyhow::Result<()> {
    let rows: Vec<SubjectRow> = serde_json::from_str(ROWS_JSON)?;
    assert!(matches!(rows[0].boundary_data, RawData::Structured(_)));
    assert!(matches!(rows[1].boundary_data, RawData::Text(_)));

    let subjects = subjects_from_rows(rows)?;
    assert_eq!(subjects.len(), 2);

    let business = &subjects[&11];
    assert_relative_eq!(business.scaled_mean(), 57.1235, epsilon = 1e-9);

    let arts = &subjects[&12];
    assert_eq!(arts.grades(), &["1", "2", "3", "4"]);
    assert_relative_eq!(arts.weight("4")?, 0.4);
    // 0.1 * 9.5 + 0.2 * 29.5 + 0.3 * 49.5 + 0.4 * 80
    assert_relative_eq!(arts.scaled_mean(), 53.7, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_row_serialization_round_trip() -> anyhow::Result<()> {
    let rows: Vec<SubjectRow> = serde_json::from_str(ROWS_JSON)?;
    let json = serde_json::to_string(&rows)?;
    let again: Vec<SubjectRow> = serde_json::from_str(&json)?;
    assert_eq!(rows, again);
    Ok(())
}

#[test]
fn test_unsafe_text_is_rejected() {
    let row = SubjectRow::from((
        1i64,
        "Injected",
        "HL",
        "{'1': (0, 100)}",
        "{'1': __import__('os').getpid()}",
    ));
    match SubjectRecord::try_from(row) {
        Err(Error::Format { repr, .. }) => assert!(repr.contains("__import__")),
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn test_structured_and_textual_inputs_agree() -> anyhow::Result<()> {
    let bounds = Boundaries::from([
        ("A".to_string(), (70, 100)),
        ("B".to_string(), (50, 69)),
        ("C".to_string(), (0, 49)),
    ]);
    let dist = Distribution::from([
        ("A".to_string(), 0.2),
        ("B".to_string(), 0.5),
        ("C".to_string(), 0.3),
    ]);

    let structured = SubjectRecord::new(1, "History", "HL", bounds.clone(), dist.clone())?;
    let textual = SubjectRecord::new(
        1,
        "History",
        "HL",
        bounds_to_literal(&bounds),
        "{'A': 0.2, 'B': 0.5, 'C': 0.3}",
    )?;

    assert_eq!(structured.boundaries(), textual.boundaries());
    assert_eq!(structured.distribution(), textual.distribution());
    assert_eq!(structured.scaled_mean(), textual.scaled_mean());
    assert_eq!(normalize_bounds(bounds.clone())?, bounds);
    Ok(())
}

fn raw_distribution() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..1.0, 1..10)
        .prop_filter("at least one positive weight", |w| w.iter().any(|&x| x > 1e-6))
}

proptest! {
    #[test]
    fn prop_weights_sum_to_one(weights in raw_distribution()) {
        let labels: Vec<String> = (0..weights.len()).map(|i| format!("g{i}")).collect();
        let bounds: Boundaries = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), (i as i64 * 10, i as i64 * 10 + 9)))
            .collect();
        let dist: Distribution = labels.iter().cloned().zip(weights).collect();

        let record = SubjectRecord::new(1, "Generated", "HL", bounds, dist).unwrap();
        let total: f64 = record.distribution().values().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);

        let mean = record.scaled_mean();
        prop_assert!(mean >= 0.0 && mean <= (record.grades().len() * 10) as f64);
        prop_assert!(record.scaled_standard_deviation() >= 0.0);
    }
}
