//! Statistics payload and chart arithmetic.
//!
//! DESIGN
//! ======
//! The backend reports some ratios pre-formatted (`"24.9%"`). Those strings
//! are preferred when they parse; otherwise the ratio is recomputed from the
//! raw counts. Chart geometry is plain numbers for the page renderer, which
//! turns it into inline SVG.

use serde::{Deserialize, Serialize};

/// Growth chart viewbox.
pub const CHART_WIDTH: f64 = 600.0;
pub const CHART_HEIGHT: f64 = 300.0;
const CHART_PADDING: f64 = 30.0;
const CHART_Y_TICKS: u32 = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserTypes {
    pub freemium: u64,
    pub premium: u64,
    pub total_users: u64,
    pub conversion_rate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecentActivity {
    pub new_users_today: u64,
    pub new_users_this_week: u64,
    pub new_users_this_month: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryShare {
    pub country: String,
    pub users: u64,
    pub percentage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthPoint {
    pub month: String,
    pub freemium: u64,
    pub premium: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OnboardingSuccess {
    pub completed: u64,
    pub in_progress: u64,
    pub stalled: u64,
    pub completion_rate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    pub user_types: UserTypes,
    pub recent_activity: RecentActivity,
    pub top_countries: Vec<CountryShare>,
    pub user_growth: Vec<GrowthPoint>,
    pub onboarding_success: OnboardingSuccess,
}

// =============================================================================
// RATIOS
// =============================================================================

/// `part / whole * 100`, or 0 when `whole` is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Parse `"31.6%"` / `"31.6"` into 31.6. Rejects negatives and non-finite values.
#[must_use]
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let value = raw
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// One decimal place, trailing `.0` kept (`10.0%`).
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

impl Statistics {
    /// Conversion rate as reported, or premium over total users.
    #[must_use]
    pub fn conversion_rate(&self) -> String {
        self.user_types
            .conversion_rate
            .as_deref()
            .filter(|r| parse_percentage(r).is_some())
            .map_or_else(
                || format_percentage(percentage_of(self.user_types.premium, self.user_types.total_users)),
                str::to_owned,
            )
    }

    /// Onboarding completion rate as reported, or completed over all
    /// onboarding users.
    #[must_use]
    pub fn completion_rate(&self) -> String {
        let o = &self.onboarding_success;
        o.completion_rate
            .as_deref()
            .filter(|r| parse_percentage(r).is_some())
            .map_or_else(
                || format_percentage(percentage_of(o.completed, o.completed + o.in_progress + o.stalled)),
                str::to_owned,
            )
    }

    /// Bar widths for the top-countries chart, in listing order.
    #[must_use]
    pub fn country_bars(&self) -> Vec<CountryBar> {
        let listed_total: u64 = self.top_countries.iter().map(|c| c.users).sum();
        self.top_countries
            .iter()
            .map(|c| {
                let percent = c
                    .percentage
                    .as_deref()
                    .and_then(parse_percentage)
                    .unwrap_or_else(|| percentage_of(c.users, listed_total));
                CountryBar { country: c.country.clone(), users: c.users, percent: percent.min(100.0) }
            })
            .collect()
    }

    #[must_use]
    pub fn growth_chart(&self) -> GrowthChart {
        GrowthChart::from_points(&self.user_growth)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryBar {
    pub country: String,
    pub users: u64,
    /// Clamped to 0..=100.
    pub percent: f64,
}

impl CountryBar {
    #[must_use]
    pub fn label(&self) -> String {
        format_percentage(self.percent)
    }
}

// =============================================================================
// GROWTH CHART
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GrowthChart {
    pub months: Vec<(f64, String)>,
    pub premium: Vec<(f64, f64)>,
    pub freemium: Vec<(f64, f64)>,
    /// (y position, value) for horizontal grid lines, bottom to top.
    pub y_ticks: Vec<(f64, u64)>,
}

impl GrowthChart {
    /// Scale both series into the viewbox against their shared maximum.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_points(points: &[GrowthPoint]) -> Self {
        let max = points
            .iter()
            .map(|p| p.freemium.max(p.premium))
            .max()
            .unwrap_or(0)
            .max(1);

        let plot_w = CHART_WIDTH - 2.0 * CHART_PADDING;
        let plot_h = CHART_HEIGHT - 2.0 * CHART_PADDING;
        let step = if points.len() > 1 { plot_w / (points.len() - 1) as f64 } else { 0.0 };

        let x_at = |i: usize| CHART_PADDING + step * i as f64;
        let y_at = |v: u64| CHART_HEIGHT - CHART_PADDING - (v as f64 / max as f64) * plot_h;

        let months = points
            .iter()
            .enumerate()
            .map(|(i, p)| (x_at(i), p.month.clone()))
            .collect();
        let premium = points
            .iter()
            .enumerate()
            .map(|(i, p)| (x_at(i), y_at(p.premium)))
            .collect();
        let freemium = points
            .iter()
            .enumerate()
            .map(|(i, p)| (x_at(i), y_at(p.freemium)))
            .collect();
        let y_ticks = (0..=CHART_Y_TICKS)
            .map(|t| {
                let value = (max as f64 * f64::from(t) / f64::from(CHART_Y_TICKS)).round() as u64;
                (y_at(value), value)
            })
            .collect();

        Self { months, premium, freemium, y_ticks }
    }

    /// SVG `points` attribute for a series.
    #[must_use]
    pub fn polyline(series: &[(f64, f64)]) -> String {
        series
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
#[path = "statistics_test.rs"]
mod tests;
