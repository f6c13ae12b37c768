use super::*;
use crate::services::mock;

fn mock_stats() -> Statistics {
    serde_json::from_value(mock::statistics()).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// =============================================================================
// deserialisation
// =============================================================================

#[test]
fn decodes_mock_payload() {
    let stats = mock_stats();
    assert_eq!(stats.user_types.total_users, 3800);
    assert_eq!(stats.user_types.premium, 947);
    assert_eq!(stats.recent_activity.new_users_this_month, 1250);
    assert_eq!(stats.top_countries.len(), 5);
    assert_eq!(stats.user_growth.len(), 6);
    assert_eq!(stats.onboarding_success.in_progress, 280);
}

#[test]
fn decodes_partial_payload_with_defaults() {
    let stats: Statistics = serde_json::from_value(serde_json::json!({ "userTypes": { "premium": 3 } })).unwrap();
    assert_eq!(stats.user_types.premium, 3);
    assert_eq!(stats.user_types.total_users, 0);
    assert!(stats.top_countries.is_empty());
}

// =============================================================================
// ratios
// =============================================================================

#[test]
fn percentage_of_handles_zero_denominator() {
    assert!(approx(percentage_of(5, 0), 0.0));
    assert!(approx(percentage_of(1, 4), 25.0));
}

#[test]
fn parse_percentage_variants() {
    assert_eq!(parse_percentage("31.6%"), Some(31.6));
    assert_eq!(parse_percentage(" 90% "), Some(90.0));
    assert_eq!(parse_percentage("12"), Some(12.0));
    assert_eq!(parse_percentage("n/a"), None);
    assert_eq!(parse_percentage("-3%"), None);
    assert_eq!(parse_percentage(""), None);
}

#[test]
fn format_percentage_one_decimal() {
    assert_eq!(format_percentage(10.0), "10.0%");
    assert_eq!(format_percentage(24.921), "24.9%");
}

#[test]
fn conversion_rate_prefers_reported_value() {
    assert_eq!(mock_stats().conversion_rate(), "24.9%");
}

#[test]
fn conversion_rate_computed_when_missing() {
    let mut stats = mock_stats();
    stats.user_types.conversion_rate = None;
    assert_eq!(stats.conversion_rate(), "24.9%");
    stats.user_types.conversion_rate = Some("unknown".into());
    assert_eq!(stats.conversion_rate(), "24.9%");
}

#[test]
fn completion_rate_computed_when_missing() {
    let mut stats = mock_stats();
    assert_eq!(stats.completion_rate(), "90%");
    stats.onboarding_success.completion_rate = None;
    // 3420 / (3420 + 280 + 100)
    assert_eq!(stats.completion_rate(), "90.0%");
}

#[test]
fn country_bars_use_reported_percentages() {
    let bars = mock_stats().country_bars();
    assert_eq!(bars[0].country, "United States");
    assert!(approx(bars[0].percent, 31.6));
    assert_eq!(bars[3].label(), "10.0%");
}

#[test]
fn country_bars_fall_back_to_listed_share() {
    let stats = Statistics {
        top_countries: vec![
            CountryShare { country: "A".into(), users: 300, percentage: None },
            CountryShare { country: "B".into(), users: 100, percentage: Some("bogus".into()) },
        ],
        ..Statistics::default()
    };
    let bars = stats.country_bars();
    assert!(approx(bars[0].percent, 75.0));
    assert!(approx(bars[1].percent, 25.0));
}

#[test]
fn country_bars_clamp_to_full_width() {
    let stats = Statistics {
        top_countries: vec![CountryShare { country: "A".into(), users: 1, percentage: Some("140%".into()) }],
        ..Statistics::default()
    };
    assert!(approx(stats.country_bars()[0].percent, 100.0));
}

// =============================================================================
// growth chart
// =============================================================================

#[test]
fn growth_chart_scales_to_viewbox() {
    let chart = mock_stats().growth_chart();
    assert_eq!(chart.premium.len(), 6);
    assert_eq!(chart.freemium.len(), 6);

    // First point at the left padding, last at the right padding.
    assert!(approx(chart.freemium[0].0, 30.0));
    assert!(approx(chart.freemium[5].0, CHART_WIDTH - 30.0));
    // Series maximum (freemium Jun = 2853) touches the top padding.
    assert!(approx(chart.freemium[5].1, 30.0));
    // Premium values sit lower on the chart (larger y) than freemium.
    assert!(chart.premium.iter().zip(&chart.freemium).all(|(p, f)| p.1 > f.1));
}

#[test]
fn growth_chart_ticks_span_zero_to_max() {
    let chart = mock_stats().growth_chart();
    assert_eq!(chart.y_ticks.first().map(|t| t.1), Some(0));
    assert_eq!(chart.y_ticks.last().map(|t| t.1), Some(2853));
    assert!(approx(chart.y_ticks[0].0, CHART_HEIGHT - 30.0));
}

#[test]
fn growth_chart_empty_and_single_point() {
    let empty = GrowthChart::from_points(&[]);
    assert!(empty.premium.is_empty());
    assert_eq!(GrowthChart::polyline(&empty.premium), "");

    let single = GrowthChart::from_points(&[GrowthPoint { month: "Jan".into(), freemium: 0, premium: 0 }]);
    assert_eq!(single.premium.len(), 1);
    assert!(approx(single.premium[0].1, CHART_HEIGHT - 30.0));
}

#[test]
fn polyline_formats_points() {
    assert_eq!(GrowthChart::polyline(&[(1.0, 2.26), (3.0, 4.0)]), "1.0,2.3 3.0,4.0");
}
