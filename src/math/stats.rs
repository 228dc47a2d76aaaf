//! Sample statistics.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample standard deviation (n - 1 divisor), `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mu = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();
    Some((ss / (values.len() as f64 - 1.0)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        // Squared deviations sum to 32 over 8 values: 32 / 7.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std(&values).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn sample_std_needs_two_values() {
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(sample_std(&[1.0, 1.0]), Some(0.0));
    }
}
