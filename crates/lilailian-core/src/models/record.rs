// ABOUTME: Structured coach record extracted from the model's reply
// ABOUTME: CoachRecord, DataMetrics and RecordType definitions with absent-means-absent fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::labels;

/// Kind of activity a record describes
///
/// The model chooses the value; anything outside the three known kinds is
/// kept verbatim in [`RecordType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    /// Food or drink intake
    Diet,
    /// Resistance training
    Strength,
    /// Endurance training
    Cardio,
    /// Any other model-supplied value
    Other(String),
}

impl RecordType {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Diet => "diet",
            Self::Strength => "strength",
            Self::Cardio => "cardio",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for RecordType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "diet" => Self::Diet,
            "strength" => Self::Strength,
            "cardio" => Self::Cardio,
            _ => Self::Other(raw),
        }
    }
}

impl From<RecordType> for String {
    fn from(kind: RecordType) -> Self {
        match kind {
            RecordType::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Numeric measurements attached to a record
///
/// Every field is optional and unchecked; a metric the model did not report
/// stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataMetrics {
    /// Energy (kcal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    /// Protein (grams)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    /// Carbohydrates (grams)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    /// Fat (grams)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
    /// Lifted load (kilograms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Number of sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<f64>,
    /// Repetitions per set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<f64>,
    /// Duration (minutes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    /// Average heart rate (bpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_heart_rate: Option<f64>,
    /// Keys the model added beyond the known metrics
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DataMetrics {
    /// Known metrics that are present, in display order
    #[must_use]
    pub fn present(&self) -> Vec<(&'static str, f64)> {
        [
            ("calories", self.calories),
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
            ("weight_kg", self.weight_kg),
            ("sets", self.sets),
            ("reps", self.reps),
            ("duration_min", self.duration_min),
            ("avg_heart_rate", self.avg_heart_rate),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    /// True when no known or extra metric is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present().is_empty() && self.extra.is_empty()
    }
}

/// Structured outcome extracted from a coach reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachRecord {
    /// Free-text user identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Kind of activity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<RecordType>,
    /// Informal `YYYY-MM-DD HH:MM` timestamp, kept as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Food or exercise name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    /// Numeric measurements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_metrics: Option<DataMetrics>,
    /// Coach feedback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach_comment: Option<String>,
    /// Top-level keys the model added beyond the known fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CoachRecord {
    /// Coach comment, or the placeholder shown when the model omitted it
    #[must_use]
    pub fn coach_comment_or_default(&self) -> &str {
        self.coach_comment
            .as_deref()
            .unwrap_or(labels::MISSING_COACH_COMMENT)
    }
}
