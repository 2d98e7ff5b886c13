//! Curation rules deciding what may be published

use ipx_common::IpxError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ExportError, Result};

/// Default minimum MI score below which a pair is considered low confidence
pub const DEFAULT_MIN_SCORE: f64 = 0.43;

/// Export status curated on an interaction detection method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodStatus {
    /// Always export evidence from this method
    Export,
    /// Never export evidence from this method, whatever its score
    DoNotExport,
    /// No curator decision; the score threshold decides
    #[default]
    NotSpecified,
    /// Export once the method is backed by `min_occurrence` distinct publications
    Conditional { min_occurrence: u32 },
}

impl std::str::FromStr for MethodStatus {
    type Err = IpxError;

    /// Parse the value of a curation annotation: `yes`, `no`, or a minimum
    /// publication count
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        match value.as_str() {
            "yes" | "export" => Ok(MethodStatus::Export),
            "no" | "do_not_export" => Ok(MethodStatus::DoNotExport),
            "" | "not_specified" => Ok(MethodStatus::NotSpecified),
            _ => match value.parse::<u32>() {
                Ok(0) => Err(IpxError::Parse(
                    "conditional export needs a minimum of at least 1".to_string(),
                )),
                Ok(min_occurrence) => Ok(MethodStatus::Conditional { min_occurrence }),
                Err(_) => Err(IpxError::Parse(format!("Unknown method export status: {}", s))),
            },
        }
    }
}

impl std::fmt::Display for MethodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodStatus::Export => write!(f, "export"),
            MethodStatus::DoNotExport => write!(f, "do_not_export"),
            MethodStatus::NotSpecified => write!(f, "not_specified"),
            MethodStatus::Conditional { min_occurrence } => {
                write!(f, "conditional({})", min_occurrence)
            },
        }
    }
}

/// Filter toggles plus per-method export statuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPolicy {
    /// Drop evidence inferred by spoke expansion
    pub exclude_spoke_expanded: bool,
    /// Drop pairs scoring below `min_score`
    pub exclude_low_confidence: bool,
    /// Drop negative clusters entirely
    pub exclude_negative: bool,
    /// Drop pairs with an interactor outside UniProtKB
    pub exclude_non_target_interactors: bool,
    pub min_score: f64,
    /// Status by detection method term id
    pub method_statuses: BTreeMap<String, MethodStatus>,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self {
            exclude_spoke_expanded: true,
            exclude_low_confidence: true,
            exclude_negative: true,
            exclude_non_target_interactors: true,
            min_score: DEFAULT_MIN_SCORE,
            method_statuses: BTreeMap::new(),
        }
    }
}

impl ExportPolicy {
    /// Status of a detection method; `NotSpecified` when not curated
    pub fn status_for(&self, detection_method: &str) -> MethodStatus {
        self.method_statuses
            .get(detection_method)
            .copied()
            .unwrap_or_default()
    }

    /// Whether a score clears the low-confidence gate
    pub fn accepts_score(&self, score: f64) -> bool {
        !self.exclude_low_confidence || score >= self.min_score
    }

    pub fn with_method_status(
        mut self,
        detection_method: impl Into<String>,
        status: MethodStatus,
    ) -> Self {
        self.method_statuses.insert(detection_method.into(), status);
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_score.is_finite() || !(0.0..=1.0).contains(&self.min_score) {
            return Err(ExportError::Config(format!(
                "min_score must be within [0, 1], got {}",
                self.min_score
            )));
        }

        for (method, status) in &self.method_statuses {
            if method.trim().is_empty() {
                return Err(ExportError::Config(
                    "method status with empty detection method".to_string(),
                ));
            }
            if let MethodStatus::Conditional { min_occurrence: 0 } = status {
                return Err(ExportError::Config(format!(
                    "conditional status of {} needs a minimum of at least 1",
                    method
                )));
            }
        }

        Ok(())
    }
}
