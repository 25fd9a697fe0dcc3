use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use repair_forecast::calibrate::DecayCalibrator;
use repair_forecast::{
    CalibrationSource, EvaluationRecord, EvaluationSet, ForecastError, ItemId, Month,
    PipelineConfig,
};

fn month(s: &str) -> Month {
    s.parse().unwrap()
}

fn records(item: &str, base_count: f64, truth: &[f64]) -> Vec<EvaluationRecord> {
    truth
        .iter()
        .enumerate()
        .map(|(i, &t)| EvaluationRecord {
            item_id: ItemId::from(item),
            month: month("2009-08").offset(i as i64 + 1),
            months_elapsed: i as u32 + 1,
            truth: t,
            base_count,
        })
        .collect()
}

fn evaluation_set(records: Vec<EvaluationRecord>, dropped: &[&str]) -> EvaluationSet {
    EvaluationSet {
        records,
        dropped: dropped.iter().map(|id| ItemId::from(*id)).collect(),
        boundary: Some(month("2009-08")),
    }
}

fn corpus_calibrator() -> DecayCalibrator {
    let config = PipelineConfig::default();
    DecayCalibrator::new(&config.k_grid, config.fallback_k).unwrap()
}

#[test]
fn test_exact_decay_selects_090() {
    let ab = records("AB", 20.0, &[18.0, 16.0]);
    let refs: Vec<&EvaluationRecord> = ab.iter().collect();

    let at_090 = DecayCalibrator::mean_error(&refs, 0.90).unwrap();
    assert_abs_diff_eq!(at_090, 0.10, epsilon = 1e-9);
    assert!(DecayCalibrator::mean_error(&refs, 0.89).unwrap() > at_090);
    assert!(DecayCalibrator::mean_error(&refs, 0.91).unwrap() > at_090);

    let set = evaluation_set(ab, &[]);
    let calibration = corpus_calibrator()
        .calibrate([ItemId::from("AB")].iter(), &set)
        .unwrap();
    let decay = calibration.get(&"AB".into()).unwrap();

    assert_eq!(decay.k, 0.90);
    assert_eq!(decay.source, CalibrationSource::Searched);
    assert_abs_diff_eq!(decay.mean_error.unwrap(), 0.10, epsilon = 1e-9);
}

#[test]
fn test_falling_series_selects_grid_minimiser() {
    let item = records("XY", 10.0, &[10.0, 8.0, 6.0]);
    let refs: Vec<&EvaluationRecord> = item.iter().collect();
    let calibrator = corpus_calibrator();

    let outcome = calibrator.best_k(&refs).unwrap();

    let brute_force = calibrator
        .candidates()
        .iter()
        .map(|&k| (k, DecayCalibrator::mean_error(&refs, k).unwrap()))
        .fold((f64::NAN, f64::INFINITY), |best, (k, e)| if e < best.1 { (k, e) } else { best });
    assert_eq!(outcome.k, brute_force.0);
    assert_eq!(outcome.k, 0.89);
    assert!(outcome.k <= 1.0);
}

#[test]
fn test_ties_choose_smallest_k() {
    // zero base and zero truth score every candidate at 0
    let set = evaluation_set(records("AB", 0.0, &[0.0, 0.0, 0.0]), &[]);
    let calibration = corpus_calibrator()
        .calibrate([ItemId::from("AB")].iter(), &set)
        .unwrap();

    assert_eq!(calibration.k(&"AB".into()), Some(0.87));
}

#[test]
fn test_calibration_is_deterministic_and_on_grid() {
    let mut all = records("AB", 20.0, &[18.0, 16.0, 15.0, 13.0]);
    all.extend(records("CD", 5.0, &[6.0, 4.0, 5.0, 3.0]));
    all.extend(records("EF", 40.0, &[30.0, 25.0, 20.0, 10.0]));
    let set = evaluation_set(all, &[]);
    let items = vec![ItemId::from("AB"), ItemId::from("CD"), ItemId::from("EF")];
    let calibrator = corpus_calibrator();

    let first = calibrator.calibrate(items.iter(), &set).unwrap();
    let second = calibrator.calibrate(items.iter(), &set).unwrap();

    assert_eq!(first, second);
    let grid = PipelineConfig::default().k_grid;
    for (_, decay) in first.iter() {
        assert!(grid.contains(decay.k), "k {} is not a grid point", decay.k);
    }
    assert_eq!(first.searched_count(), 3);
    assert_eq!(first.fallback_count(), 0);
}

#[test]
fn test_unscorable_items_get_explicit_fallback() {
    let set = evaluation_set(records("AB", 20.0, &[18.0, 16.0]), &["CD"]);
    let items = vec![ItemId::from("AB"), ItemId::from("CD"), ItemId::from("EF")];

    let calibration = corpus_calibrator().calibrate(items.iter(), &set).unwrap();

    let cd = calibration.get(&"CD".into()).unwrap();
    assert_eq!(cd.k, 1.0);
    assert_eq!(cd.source, CalibrationSource::MissingCalibrationMonth);
    assert_eq!(cd.mean_error, None);

    let ef = calibration.get(&"EF".into()).unwrap();
    assert_eq!(ef.k, 1.0);
    assert_eq!(ef.source, CalibrationSource::EmptyEvaluationSet);
    assert!(ef.is_fallback());

    assert_eq!(calibration.fallback_count(), 2);
    let errors = calibration.empty_evaluation_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ForecastError::EmptyEvaluationSet { item_id } if item_id.as_str() == "EF"
    ));
    assert!(calibration.iter().all(|(_, d)| d.k.is_finite()));
}

#[test]
fn test_score_attaches_best_predictions() {
    let set = evaluation_set(records("AB", 20.0, &[18.0, 16.0]), &[]);
    let calibration = corpus_calibrator()
        .calibrate([ItemId::from("AB")].iter(), &set)
        .unwrap();

    let scored = DecayCalibrator::score(&calibration, &set);

    assert_eq!(scored.len(), 2);
    assert_abs_diff_eq!(scored[0].best_prediction, 18.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scored[1].best_prediction, 16.2, epsilon = 1e-9);
    assert_abs_diff_eq!(scored[0].best_error, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scored[1].best_error, 0.2, epsilon = 1e-9);
    assert!(scored.iter().all(|s| s.best_k == 0.90));
    assert_abs_diff_eq!(
        DecayCalibrator::local_score(&scored).unwrap(),
        0.10,
        epsilon = 1e-9
    );
    assert_eq!(DecayCalibrator::local_score(&[]), None);
}

#[test]
fn test_invalid_fallback_is_rejected() {
    let grid = PipelineConfig::default().k_grid;
    assert!(matches!(
        DecayCalibrator::new(&grid, 1.5),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(DecayCalibrator::new(&grid, f64::NAN).is_err());
}
