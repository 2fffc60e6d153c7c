//! Neutrophil-to-lymphocyte count ratio

/// Decimal places kept on the ratio
pub const NLCR_DECIMALS: i32 = 2;

/// Round to `decimals` places, halves away from zero
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Compute the NLCR from absolute neutrophil and lymphocyte counts
///
/// A lymphocyte count of zero or below yields exactly `0.0`; the result is
/// never NaN or infinite. Negative neutrophil counts are treated as zero.
#[must_use]
pub fn compute_nlcr(neutrophil: f64, lymphocyte: f64) -> f64 {
    if lymphocyte > 0.0 {
        let ratio = round_to(neutrophil.max(0.0) / lymphocyte, NLCR_DECIMALS);
        if ratio.is_finite() { ratio } else { 0.0 }
    } else {
        0.0
    }
}
