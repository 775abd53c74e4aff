use bike_forecast::error::ForecastError;
use bike_math::MathError;

#[test]
fn test_math_errors_become_fit_errors() {
    let math = MathError::ConvergenceFailure("no convergence within 5 iterations".to_string());
    let error = ForecastError::from(math);

    match error {
        ForecastError::ModelFit(msg) => assert!(msg.contains("5 iterations")),
        other => panic!("Expected ModelFit, got {:?}", other),
    }
}

#[test]
fn test_serde_error_conversion() {
    let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error = ForecastError::from(parse);
    assert!(matches!(error, ForecastError::Serialization(_)));
    assert!(error.to_string().starts_with("Serialization error"));
}

#[test]
fn test_error_display() {
    let cases = [
        (ForecastError::DataLoad("Row 3: bad date".to_string()), "Data load error: Row 3: bad date"),
        (ForecastError::ModelFit("diverged".to_string()), "Model fit error: diverged"),
        (ForecastError::Validation("Empty time series".to_string()), "Validation error: Empty time series"),
        (ForecastError::InvalidParameter("horizon".to_string()), "Invalid parameter: horizon"),
    ];

    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}
