use decay_math::MathError;
use repair_forecast::{ForecastError, ItemId, Month};
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    let parse_error = "invalid data".parse::<i32>().unwrap_err();
    let forecast_error = ForecastError::from(parse_error);
    assert!(matches!(forecast_error, ForecastError::ParseError(_)));

    let math_error = MathError::InsufficientData("no rows".to_string());
    let forecast_error = ForecastError::from(math_error);
    assert!(matches!(forecast_error, ForecastError::MathError(_)));

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let forecast_error = ForecastError::from(json_error);
    assert!(matches!(forecast_error, ForecastError::ConfigError(_)));
}

#[test]
fn test_error_display() {
    let error = ForecastError::MissingTargetCalibration {
        item_id: ItemId::from("M1P02"),
        row: 17,
    };
    let message = error.to_string();
    assert!(message.contains("M1P02"));
    assert!(message.contains("17"));

    let error = ForecastError::MissingCalibrationMonth {
        item_id: ItemId::from("M1P02"),
        month: Month::new(2009, 8).unwrap(),
    };
    assert!(error.to_string().contains("2009-08"));

    let error = ForecastError::RangeMismatch("3 observations fall outside history".to_string());
    assert!(error.to_string().starts_with("Range mismatch"));
}
