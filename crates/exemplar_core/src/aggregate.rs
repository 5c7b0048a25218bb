//! Aggregation of exemplar activation per category.
//!
//! Applies the activation kernel to every stored exemplar, groups by category
//! and reduces with sum and count. The Pushee/Pusher ratio and the Pushee
//! average activation handed to the evaluation stages are derived from it.

use crate::dataset::{Category, Dataset};
use crate::error::{ModelError, ModelResult};
use crate::model::{check_alpha, kernel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reduced activation for one category group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub sum: f64,
    pub count: usize,
    pub avg: f64,
}

/// Intermediate values feeding discriminability and typicality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Σ activation(Pushee) / Σ activation(Pusher)
    pub ratio: f64,
    /// Mean activation over Pushee exemplars.
    pub avg_activation: f64,
}

/// Per-category activation totals for a single token position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    groups: BTreeMap<Category, CategoryStats>,
}

impl Aggregate {
    pub fn get(&self, category: &Category) -> Option<&CategoryStats> {
        self.groups.get(category)
    }

    /// Stats for `category`, failing with `EmptyGroup` if it has no exemplars.
    pub fn require(&self, category: &Category) -> ModelResult<&CategoryStats> {
        self.groups
            .get(category)
            .filter(|s| s.count > 0)
            .ok_or_else(|| ModelError::EmptyGroup {
                category: category.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &CategoryStats)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Ratio and Pushee average activation.
    ///
    /// Needs both the Pusher and the Pushee group. A zero Pusher sum (every
    /// Pusher exemplar out of the window's numeric reach) leaves the ratio
    /// undefined and is reported as a domain error, as is a ratio that
    /// overflows.
    pub fn evaluation(&self) -> ModelResult<Evaluation> {
        let pusher = self.require(&Category::Pusher)?;
        let pushee = self.require(&Category::Pushee)?;
        if pusher.sum == 0.0 {
            return Err(ModelError::domain(
                "ratio",
                "Pusher activation sum is zero, ratio is undefined",
            ));
        }
        let ratio = pushee.sum / pusher.sum;
        if !ratio.is_finite() {
            return Err(ModelError::domain(
                "ratio",
                format!("ratio {} / {} is not finite", pushee.sum, pusher.sum),
            ));
        }
        if !pushee.avg.is_finite() {
            return Err(ModelError::domain(
                "avg_activation",
                format!("Pushee average {} is not finite", pushee.avg),
            ));
        }
        Ok(Evaluation {
            ratio,
            avg_activation: pushee.avg,
        })
    }
}

/// Activate every exemplar against the token at `point` and reduce per category.
pub fn aggregate(dataset: &Dataset, point: f64, alpha: f64) -> ModelResult<Aggregate> {
    check_alpha(alpha)?;

    let mut totals: BTreeMap<Category, (f64, usize)> = BTreeMap::new();
    for obs in dataset.observations() {
        let entry = totals.entry(obs.category.clone()).or_insert((0.0, 0));
        entry.0 += kernel(obs.value, point, alpha);
        entry.1 += 1;
    }

    let groups = totals
        .into_iter()
        .map(|(category, (sum, count))| {
            let stats = CategoryStats {
                sum,
                count,
                avg: sum / count as f64,
            };
            (category, stats)
        })
        .collect();

    Ok(Aggregate { groups })
}
