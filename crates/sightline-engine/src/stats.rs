//! Small descriptive statistics over samples. Empty input yields `None`.

pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

pub fn min(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().reduce(f64::min)
}

pub fn max(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().reduce(f64::max)
}

/// Population variance.
pub fn variance(samples: &[f64]) -> Option<f64> {
    let m = mean(samples)?;
    Some(samples.iter().map(|x| (x - m).powi(2)).sum::<f64>() / samples.len() as f64)
}

/// `numerator / denominator`, undefined when the denominator is below `min_sample`
/// or zero.
pub fn ratio(numerator: u32, denominator: u32, min_sample: u32) -> Option<f64> {
    if denominator == 0 || denominator < min_sample {
        return None;
    }
    Some(f64::from(numerator) / f64::from(denominator))
}
