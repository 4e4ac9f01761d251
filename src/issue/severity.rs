use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered `Critical > High > Medium > Low`. Unrecognized encodings become `Low`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown severity {0:?}")]
pub struct UnknownSeverity(pub String);

impl Severity {
    /// SARIF result level, either a level name or the numeric code used by Snyk Code.
    pub fn from_sarif_level(level: &str) -> Self {
        match level {
            "3" | "error" => Severity::High,
            "2" | "warning" => Severity::Medium,
            _ => Severity::Low,
        }
    }

    /// Severity string of an open-source dependency finding.
    pub fn from_sca(severity: &str) -> Self {
        severity.parse().unwrap_or_default()
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        };
        write!(f, "{name}")
    }
}
