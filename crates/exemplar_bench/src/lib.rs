//! exemplar_bench — sweep simulations over the categorization model.
//!
//! Validates emergent behavior across whole parameter ranges:
//! - token sweeps between the Pusher and Pushee clusters
//! - frequency sweeps over the full 1..=12 table

use exemplar_core::{
    aggregate, discriminability, frequency_to_delta, typicality, Dataset, ModelParams,
    ModelResult, MAX_FREQUENCY,
};

/// Model outputs for one token position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub token: f64,
    pub ratio: f64,
    pub avg_activation: f64,
    pub discriminability: f64,
    pub typicality: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyPoint {
    pub frequency: u32,
    pub delta: f64,
    pub discriminability: f64,
}

/// Evaluate the model at every token position, keeping the other parameters fixed.
pub fn sweep_token(
    dataset: &Dataset,
    params: &ModelParams,
    positions: &[f64],
) -> ModelResult<Vec<SweepPoint>> {
    let delta = params.effective_delta()?;
    positions
        .iter()
        .map(|&token| {
            let eval = aggregate(dataset, token, params.alpha)?.evaluation()?;
            Ok(SweepPoint {
                token,
                ratio: eval.ratio,
                avg_activation: eval.avg_activation,
                discriminability: discriminability(eval.ratio, delta)?,
                typicality: typicality(eval.avg_activation, params.tau)?,
            })
        })
        .collect()
}

/// Discriminability at the params' token for every type frequency.
pub fn sweep_frequency(dataset: &Dataset, params: &ModelParams) -> ModelResult<Vec<FrequencyPoint>> {
    let eval = aggregate(dataset, params.token()?, params.alpha)?.evaluation()?;
    (1..=MAX_FREQUENCY)
        .map(|frequency| {
            let delta = frequency_to_delta(frequency)?;
            Ok(FrequencyPoint {
                frequency,
                delta,
                discriminability: discriminability(eval.ratio, delta)?,
            })
        })
        .collect()
}
