//! D'Agostino–Pearson omnibus normality test.
//!
//! Combines a skewness z-score and a kurtosis z-score into K², which is
//! χ²-distributed with two degrees of freedom under the null hypothesis that the
//! sample is normal. The clusterer uses a low p-value as a multimodality signal.

/// Smallest sample the skewness transform is defined for.
pub const MIN_SAMPLES: usize = 8;

/// Outcome of [`normal_test`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalTest {
    /// K² = z_skew² + z_kurt²
    pub statistic: f64,
    /// Probability of a statistic at least this large under normality.
    pub p_value: f64,
}

/// Central moments m2, m3, m4 (biased, divided by n).
fn central_moments(sample: &[f64]) -> (f64, f64, f64) {
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;

    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &x in sample {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// z-score of the sample skewness (D'Agostino 1970).
///
/// Returns `None` for fewer than [`MIN_SAMPLES`] values or zero variance.
pub fn skew_test(sample: &[f64]) -> Option<f64> {
    if sample.len() < MIN_SAMPLES {
        return None;
    }
    let (m2, m3, _) = central_moments(sample);
    if m2 <= 0.0 {
        return None;
    }
    Some(skew_z(sample.len() as f64, m3 / m2.powf(1.5)))
}

fn skew_z(n: f64, b2: f64) -> f64 {
    let y = b2 * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    delta * (y / alpha).asinh()
}

/// z-score of the sample kurtosis (Anscombe & Glynn 1983).
///
/// Returns `None` for fewer than [`MIN_SAMPLES`] values, zero variance, or when the
/// cube-root transform hits its pole.
pub fn kurtosis_test(sample: &[f64]) -> Option<f64> {
    if sample.len() < MIN_SAMPLES {
        return None;
    }
    let (m2, _, m4) = central_moments(sample);
    if m2 <= 0.0 {
        return None;
    }
    kurtosis_z(sample.len() as f64, m4 / (m2 * m2))
}

fn kurtosis_z(n: f64, b2: f64) -> Option<f64> {
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let variance =
        24.0 * n * (n - 2.0) * (n - 3.0) / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (b2 - expected) / variance.sqrt();

    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * ((6.0 * (n + 3.0) * (n + 5.0)) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());

    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return None;
    }
    let term2 = ((1.0 - 2.0 / a) / denom.abs()).cbrt().copysign(denom);
    Some((term1 - term2) / (2.0 / (9.0 * a)).sqrt())
}

/// Run the omnibus test on `sample`.
///
/// `None` means the test cannot decide (too few values, constant sample, or a
/// non-finite statistic).
pub fn normal_test(sample: &[f64]) -> Option<NormalTest> {
    let z_skew = skew_test(sample)?;
    let z_kurt = kurtosis_test(sample)?;
    let statistic = z_skew * z_skew + z_kurt * z_kurt;
    if !statistic.is_finite() {
        return None;
    }
    // Survival function of chi-squared with 2 degrees of freedom.
    let p_value = (-statistic / 2.0).exp();
    Some(NormalTest { statistic, p_value })
}
