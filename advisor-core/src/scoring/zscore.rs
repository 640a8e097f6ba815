//! Cross-sectional z-scores over the candidate universe.
//!
//! z = (x - mean) / std within the universe on one date. Assets without a
//! value for the metric are excluded from the mean/std and scored 0, so a
//! missing reading never propagates NaN into a composite.

/// Z-score a column of optional raw values.
///
/// Returns one score per input slot: `Some(raw)` becomes its z-score within
/// the present values, `None` becomes 0.0 (neutral). A degenerate column
/// (fewer than two present values, or zero variance) is entirely neutral.
pub fn zscore_column(values: &[Option<f64>]) -> Vec<f64> {
    let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if present.len() < 2 {
        return vec![0.0; values.len()];
    }

    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let var = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    if std == 0.0 || !std.is_finite() {
        return vec![0.0; values.len()];
    }

    values
        .iter()
        .map(|v| match v {
            Some(x) => (x - mean) / std,
            None => 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_zero_unit_spread() {
        let values = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let z = zscore_column(&values);
        let sum: f64 = z.iter().sum();
        assert!(sum.abs() < 1e-9);
        assert!(z[3] > z[0]);
        // symmetric around the mean
        assert!((z[0] + z[3]).abs() < 1e-9);
    }

    #[test]
    fn missing_values_score_neutral() {
        let values = vec![Some(10.0), None, Some(20.0), Some(30.0)];
        let z = zscore_column(&values);
        assert_eq!(z[1], 0.0);
        assert!(z[0] < 0.0);
        assert!(z[3] > 0.0);
    }

    #[test]
    fn constant_column_is_neutral() {
        let values = vec![Some(5.0), Some(5.0), Some(5.0)];
        assert_eq!(zscore_column(&values), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn single_value_is_neutral() {
        let values = vec![Some(5.0), None, None];
        assert_eq!(zscore_column(&values), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn no_nan_ever_emitted() {
        let values = vec![Some(f64::MAX / 4.0), Some(0.0), None];
        let z = zscore_column(&values);
        assert!(z.iter().all(|v| v.is_finite()));
    }
}
