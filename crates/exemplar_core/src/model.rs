//! Categorization Model: the closed-form pieces of the exemplar model.
//!
//! - `activation`: Gaussian similarity between a stored exemplar and the token
//! - `discriminability`: P(intended category is told apart from its competitor)
//! - `typicality`: P(token is judged typical of its category)
//! - `frequency_to_delta`: type frequency → discriminability threshold
//!
//! Every function is pure. Preconditions are checked and surfaced as
//! [`ModelError::Domain`]; nothing here substitutes a default.

use crate::error::{ModelError, ModelResult};

/// Baseline discriminability threshold of the frequency mapping.
pub const LAMBDA: f64 = 0.25;
/// Spread of the frequency mapping around `LAMBDA`.
pub const PHI: f64 = 0.5;
/// Highest type frequency the mapping is defined for.
pub const MAX_FREQUENCY: u32 = 12;

/// `frequency_to_delta` for frequencies 1..=12 (index 0 is frequency 1).
pub const FREQUENCY_DELTA_TABLE: [f64; MAX_FREQUENCY as usize] = [
    0.75,
    0.6590909090909091,
    0.5681818181818181,
    0.4772727272727273,
    0.38636363636363635,
    0.29545454545454547,
    0.20454545454545459,
    0.11363636363636365,
    0.022727272727272707,
    0.0,
    0.0,
    0.0,
];

/// Gaussian-kernel activation of position `x` for a token at `point`.
///
/// `exp(-(x - point)^2 / (2 * alpha^2))`: 1.0 at the token, symmetric and
/// strictly decreasing with distance.
pub fn activation(x: f64, point: f64, alpha: f64) -> ModelResult<f64> {
    check_alpha(alpha)?;
    Ok(kernel(x, point, alpha))
}

/// Activation over a grid of positions (one alpha check for the whole grid).
pub fn activation_curve(xs: &[f64], point: f64, alpha: f64) -> ModelResult<Vec<f64>> {
    check_alpha(alpha)?;
    Ok(xs.iter().map(|&x| kernel(x, point, alpha)).collect())
}

#[inline]
pub(crate) fn kernel(x: f64, point: f64, alpha: f64) -> f64 {
    // scale before squaring so a tiny alpha cannot underflow to 0/0
    let z = (x - point) / alpha;
    (-0.5 * z * z).exp()
}

pub(crate) fn check_alpha(alpha: f64) -> ModelResult<()> {
    if alpha == 0.0 {
        return Err(ModelError::domain("alpha", "activation window width must be non-zero"));
    }
    if !alpha.is_finite() {
        return Err(ModelError::domain("alpha", format!("must be finite, got {alpha}")));
    }
    Ok(())
}

/// Probability of passing the discriminability evaluation: `ratio / (ratio + delta)`.
pub fn discriminability(ratio: f64, delta: f64) -> ModelResult<f64> {
    let denom = ratio + delta;
    if denom == 0.0 {
        return Err(ModelError::domain("delta", "ratio + delta must be non-zero"));
    }
    if !denom.is_finite() {
        return Err(ModelError::domain(
            "ratio",
            format!("ratio + delta must be finite, got {ratio} + {delta}"),
        ));
    }
    Ok(ratio / denom)
}

/// Probability of passing the typicality evaluation: `1 - 1 / 2^(avg_activation / tau)`.
pub fn typicality(avg_activation: f64, tau: f64) -> ModelResult<f64> {
    if !avg_activation.is_finite() {
        return Err(ModelError::domain(
            "avg_activation",
            format!("must be finite, got {avg_activation}"),
        ));
    }
    if tau == 0.0 {
        return Err(ModelError::domain("tau", "typicality threshold must be non-zero"));
    }
    if !tau.is_finite() {
        return Err(ModelError::domain("tau", format!("must be finite, got {tau}")));
    }
    Ok(1.0 - (-avg_activation / tau).exp2())
}

/// Discriminability threshold implied by a type frequency in 1..=12.
///
/// Frequencies outside the table are rejected rather than extrapolated.
pub fn frequency_to_delta(freq: u32) -> ModelResult<f64> {
    if !(1..=MAX_FREQUENCY).contains(&freq) {
        return Err(ModelError::FrequencyOutOfRange { frequency: freq });
    }
    Ok(FREQUENCY_DELTA_TABLE[(freq - 1) as usize])
}

/// The linear mapping behind `FREQUENCY_DELTA_TABLE`, clamped to [0, 1].
pub fn mapped_delta(freq: u32) -> f64 {
    let m = f64::from(MAX_FREQUENCY);
    let f = f64::from(freq);
    let v = LAMBDA - ((2.0 * (f - 1.0) / (m - 1.0) - 1.0) * PHI);
    v.clamp(0.0, 1.0)
}
