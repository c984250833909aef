//! Helper functions for report calculations

/// Linearly interpolated percentile over ascending values
pub(crate) fn calculate_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    let Some(last) = sorted_values.last().copied() else {
        return 0.0;
    };

    if percentile >= 1.0 {
        return last;
    }
    if percentile <= 0.0 {
        return sorted_values[0];
    }

    let index = percentile * (sorted_values.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = (index.ceil() as usize).min(sorted_values.len() - 1);

    let lower_val = sorted_values[lower];
    if lower == upper {
        lower_val
    } else {
        let weight = index - lower as f64;
        lower_val * (1.0 - weight) + sorted_values[upper] * weight
    }
}

/// Mean of the values, 0.0 for an empty slice
pub(crate) fn calculate_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// `part / total`, 0.0 when `total` is zero
#[inline]
pub(crate) fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
