use pretty_assertions::assert_eq;
use repair_forecast::densify::SeriesDensifier;
use repair_forecast::{ForecastError, ItemId, Month, Observation, PipelineConfig};
use rstest::rstest;
use std::collections::HashSet;

fn month(s: &str) -> Month {
    s.parse().unwrap()
}

fn items(ids: &[&str]) -> Vec<ItemId> {
    ids.iter().map(|id| ItemId::from(*id)).collect()
}

fn corpus_densifier() -> SeriesDensifier {
    SeriesDensifier::new(PipelineConfig::default().history)
}

#[test]
fn test_every_cell_present_exactly_once() {
    let universe = items(&["AB", "CD", "EF"]);
    let observations = vec![
        Observation::new("AB", month("2005-02"), 3.0),
        Observation::new("AB", month("2007-06"), 5.0),
        Observation::new("CD", month("2009-12"), 1.0),
        // outside the window
        Observation::new("AB", month("2005-01"), 7.0),
        Observation::new("AB", month("2010-01"), 7.0),
        // outside the universe
        Observation::new("ZZ", month("2006-01"), 2.0),
    ];

    let (dense, summary) = corpus_densifier().densify(&universe, &observations).unwrap();

    assert_eq!(dense.len(), 59 * 3);
    assert_eq!(summary.rows(), 59 * 3);
    assert_eq!(summary.observed, 3);
    assert_eq!(summary.out_of_range, 2);
    assert_eq!(summary.unknown_items, 1);

    let rows: Vec<_> = dense.rows().collect();
    let cells: HashSet<(ItemId, Month)> = rows
        .iter()
        .map(|r| (r.item_id.clone(), r.month))
        .collect();
    assert_eq!(cells.len(), rows.len());
    for item in &universe {
        for m in dense.range().iter() {
            assert!(cells.contains(&(item.clone(), m)));
        }
    }
    assert!(!cells.contains(&(ItemId::from("ZZ"), month("2006-01"))));
}

#[test]
fn test_rows_sorted_by_item_then_month() {
    let universe = items(&["CD", "AB"]);
    let (dense, _) = corpus_densifier().densify(&universe, &[]).unwrap();

    let rows: Vec<_> = dense.rows().collect();
    assert!(rows
        .windows(2)
        .all(|w| (&w[0].item_id, w[0].month) < (&w[1].item_id, w[1].month)));
    assert_eq!(rows[0].item_id, ItemId::from("AB"));
    assert_eq!(rows[0].month, month("2005-02"));
    assert_eq!(rows[58].month, month("2009-12"));
}

#[test]
fn test_missing_months_are_zero() {
    let universe = items(&["AB", "EF"]);
    let observations = vec![Observation::new("AB", month("2007-06"), 5.0)];

    let (dense, _) = corpus_densifier().densify(&universe, &observations).unwrap();

    assert_eq!(dense.count(&"AB".into(), month("2007-06")), Some(5.0));
    assert_eq!(dense.count(&"AB".into(), month("2007-05")), Some(0.0));
    assert_eq!(dense.count(&"AB".into(), month("2007-07")), Some(0.0));
    assert_eq!(dense.count(&"AB".into(), month("2010-01")), None);

    // an item with no observations at all is still present, all zeros
    let ef = dense.series(&"EF".into()).unwrap();
    assert_eq!(ef.len(), 59);
    assert!(ef.iter().all(|&c| c == 0.0));
}

#[test]
fn test_last_known_is_final_history_month() {
    let universe = items(&["AB"]);
    let observations = vec![Observation::new("AB", month("2009-12"), 11.0)];
    let (dense, _) = corpus_densifier().densify(&universe, &observations).unwrap();

    assert_eq!(dense.last_known(&"AB".into()), Some((month("2009-12"), 11.0)));
    assert_eq!(dense.last_known(&"XY".into()), None);
}

#[test]
fn test_duplicate_observation_is_rejected() {
    let universe = items(&["AB"]);
    let observations = vec![
        Observation::new("AB", month("2008-03"), 1.0),
        Observation::new("AB", month("2008-03"), 2.0),
    ];

    let result = corpus_densifier().densify(&universe, &observations);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(10)]
fn test_row_count_invariant(#[case] item_count: usize) {
    let universe: Vec<ItemId> = (0..item_count)
        .map(|i| ItemId::new(format!("M{}P{:02}", i, i)))
        .collect();
    let (dense, _) = corpus_densifier().densify(&universe, &[]).unwrap();

    let num_months = 12 * 5 - 1;
    assert_eq!(dense.len(), num_months * item_count);
    dense.check_invariants(item_count).unwrap();
}

#[test]
fn test_invariant_check_detects_missing_items() {
    let universe = items(&["AB", "CD"]);
    let (dense, _) = corpus_densifier().densify(&universe, &[]).unwrap();

    assert!(matches!(
        dense.check_invariants(3),
        Err(ForecastError::RangeMismatch(_))
    ));
}

#[rstest]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
#[case(-10.0)]
fn test_invalid_repair_count_is_rejected(#[case] repair_count: f64) {
    let universe = items(&["AB", "CD"]);
    let observations = vec![
        Observation::new("AB", month("2009-09"), 4.0),
        Observation::new("CD", month("2009-10"), repair_count),
    ];

    let result = corpus_densifier().densify(&universe, &observations);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}
