/// Turn the stored per-attempt success percentages (oldest first) into
/// chart points numbered from attempt 1.
pub fn attempt_points(percentages: &[f64]) -> Vec<(f64, f64)> {
    percentages
        .iter()
        .enumerate()
        .map(|(i, pct)| ((i + 1) as f64, *pct))
        .collect()
}

/// Compute X (attempt number) and Y (success %) bounds for the score chart
pub fn compute_chart_params(points: &[(f64, f64)]) -> (f64, f64) {
    let last_attempt = points.last().map(|p| p.0).unwrap_or(1.0);
    (last_attempt.max(1.0), 100.0)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
