//! Exemplar Dataset: the immutable collection of labeled scalar observations.
//!
//! Loaded once and then passed around as a cheap clonable handle; nothing
//! mutates an observation after load.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

/// Category label of an exemplar.
///
/// `Pusher` and `Pushee` drive the discriminability/typicality flow; any other
/// label is kept and grouped on its own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Pusher,
    Pushee,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pusher => "Pusher",
            Self::Pushee => "Pushee",
            Self::Other(label) => label,
        }
    }

    pub fn parse(label: &str) -> Self {
        match label {
            "Pusher" => Self::Pusher,
            "Pushee" => Self::Pushee,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Pusher" => Self::Pusher,
            "Pushee" => Self::Pushee,
            _ => Self::Other(label),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single stored exemplar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub category: Category,
    pub value: f64,
}

impl Observation {
    pub fn new(category: Category, value: f64) -> Self {
        Self { category, value }
    }
}

/// Per-category description of the loaded data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Immutable exemplar set. Cloning shares the underlying storage.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Arc<[Observation]>,
}

impl Dataset {
    pub fn from_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        Self {
            observations: observations.into_iter().collect(),
        }
    }

    /// Load a `category,value` table from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let dataset = load_dataset(file)?;
        tracing::info!(
            "Loaded {} exemplars from {}",
            dataset.len(),
            path.as_ref().display()
        );
        Ok(dataset)
    }

    /// Parse a JSON array of `{"category": ..., "value": ...}` records.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let observations: Vec<Observation> = serde_json::from_str(json)?;
        if let Some(pos) = observations.iter().position(|o| !o.value.is_finite()) {
            return Err(ModelError::Parse {
                line: pos + 1,
                message: "value must be finite".to_string(),
            });
        }
        Ok(Self::from_observations(observations))
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct categories in sorted order.
    pub fn categories(&self) -> Vec<Category> {
        let mut cats: Vec<Category> = self
            .observations
            .iter()
            .map(|o| o.category.clone())
            .collect();
        cats.sort();
        cats.dedup();
        cats
    }

    /// Values of one category in load order.
    pub fn values_of(&self, category: &Category) -> Vec<f64> {
        self.observations
            .iter()
            .filter(|o| &o.category == category)
            .map(|o| o.value)
            .collect()
    }

    pub fn summary(&self) -> Vec<CategorySummary> {
        let mut groups: BTreeMap<&Category, Vec<f64>> = BTreeMap::new();
        for obs in self.observations.iter() {
            groups.entry(&obs.category).or_default().push(obs.value);
        }
        groups
            .into_iter()
            .map(|(category, values)| {
                let count = values.len();
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let mean = values.iter().sum::<f64>() / count as f64;
                CategorySummary {
                    category: category.clone(),
                    count,
                    min,
                    max,
                    mean,
                }
            })
            .collect()
    }
}

/// Parse a tabular `category,value` source into a [`Dataset`].
///
/// A leading `category,value` header is optional. Blank lines and lines
/// starting with `#` are skipped; any other malformed row is an error.
pub fn load_dataset<R: Read>(source: R) -> ModelResult<Dataset> {
    let reader = BufReader::new(source);
    let mut observations = Vec::new();
    let mut seen_row = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(unquote).collect();
        if fields.len() != 2 {
            return Err(ModelError::Parse {
                line: line_no,
                message: format!("expected 2 columns, found {}", fields.len()),
            });
        }

        if !seen_row && is_header(&fields) {
            seen_row = true;
            continue;
        }
        seen_row = true;

        let label = fields[0];
        if label.is_empty() {
            return Err(ModelError::Parse {
                line: line_no,
                message: "empty category label".to_string(),
            });
        }
        let value: f64 = fields[1].parse().map_err(|e| ModelError::Parse {
            line: line_no,
            message: format!("invalid value {:?}: {}", fields[1], e),
        })?;
        if !value.is_finite() {
            return Err(ModelError::Parse {
                line: line_no,
                message: format!("value must be finite, got {}", fields[1]),
            });
        }
        observations.push(Observation::new(Category::parse(label), value));
    }

    tracing::debug!("Parsed {} observations", observations.len());
    Ok(Dataset::from_observations(observations))
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
        .trim()
}

fn is_header(fields: &[&str]) -> bool {
    fields[0].eq_ignore_ascii_case("category") && fields[1].eq_ignore_ascii_case("value")
}
