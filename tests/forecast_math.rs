use fi_forecast::forecast::{
    generator::{self, TrendModel},
    linear::LinearFit,
    logit::{inverse_logit, logit, LogitFit},
    overlay::EventOverlay,
    ModelKind,
};

#[test]
fn two_point_line_hits_midpoint_exactly() {
    let fit = LinearFit::fit(&[2020.0, 2024.0], &[40.0, 60.0]);
    let (estimate, se) = fit.predict(2022.0);
    assert_eq!(estimate, 50.0);
    assert_eq!(fit.residual_variance(), 0.0);
    assert_eq!(se, 0.0);
}

#[test]
fn prediction_se_matches_textbook_formula() {
    let years = [2011.0, 2014.0, 2017.0, 2021.0, 2024.0];
    let values = [14.0, 22.0, 35.0, 46.0, 49.0];
    let fit = LinearFit::fit(&years, &values);

    let n = years.len() as f64;
    let mean = years.iter().sum::<f64>() / n;
    let sxx: f64 = years.iter().map(|y| (y - mean).powi(2)).sum();
    let target = 2027.0;
    let expected =
        (fit.residual_variance() * (1.0 + 1.0 / n + (target - mean).powi(2) / sxx)).sqrt();

    let (_, se) = fit.predict(target);
    assert!((se - expected).abs() < 1e-9, "se {se} vs {expected}");
}

#[test]
fn logit_round_trip_away_from_boundary() {
    for p in [0.001, 0.14, 0.35, 0.5, 0.9, 0.999] {
        assert!((inverse_logit(logit(p)) - p).abs() < 1e-12);
    }
}

#[test]
fn bounded_model_stays_inside_percentage_range_in_2100() {
    let fit = LogitFit::fit(&[2011.0, 2014.0, 2017.0, 2021.0], &[14.0, 22.0, 35.0, 46.0]);
    let (estimate, se) = fit.predict(2100.0);
    assert!(estimate > 0.0 && estimate < 100.0);
    assert!(se >= 0.0);

    let falling = LogitFit::fit(&[2014.0, 2017.0, 2021.0], &[30.0, 12.0, 2.0]);
    let (estimate, _) = falling.predict(2100.0);
    assert!(estimate > 0.0 && estimate < 100.0);
}

#[test]
fn linear_model_is_unbounded_where_logit_is_not() {
    let years = [2014.0, 2017.0, 2021.0, 2024.0];
    let values = [22.0, 35.0, 46.0, 49.0];
    let rows = generator::compare("Access", &years, &values, &[2100]);
    assert!(rows[0].linear > 100.0);
    assert!(rows[0].bounded < 100.0);
}

#[test]
fn forecast_rows_respect_band_ordering() {
    let model = TrendModel::fit(
        ModelKind::Bounded,
        &[2014.0, 2017.0, 2021.0, 2024.0],
        &[22.0, 35.0, 46.0, 49.0],
    );
    let rows = generator::generate("Access", &model, &[2025, 2026, 2027]);
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert!(row.pessimistic <= row.baseline && row.baseline <= row.optimistic);
        assert!(row.ci95_low <= row.pessimistic && row.optimistic <= row.ci95_high);
        assert_eq!(row.event_augmented, None);
    }
}

#[test]
fn event_target_interpolates_towards_target() {
    let overlay = EventOverlay::Target {
        last_year: 2024,
        last_value: 50.0,
        target_year: 2027,
        target_value: 70.0,
    };
    let path = overlay
        .apply(&[2025, 2026, 2027], &[0.0, 0.0, 0.0])
        .unwrap();
    assert!((path[0] - 56.67).abs() < 0.01);
    assert!((path[1] - 63.33).abs() < 0.01);
    assert_eq!(path[2], 70.0);
}

#[test]
fn event_target_is_flat_outside_anchors() {
    let overlay = EventOverlay::Target {
        last_year: 2024,
        last_value: 49.0,
        target_year: 2025,
        target_value: 70.0,
    };
    let path = overlay
        .apply(&[2023, 2024, 2025, 2026, 2027], &[0.0; 5])
        .unwrap();
    assert_eq!(path, vec![49.0, 49.0, 70.0, 70.0, 70.0]);
}
