//! Domain profile model.
//!
//! Per-domain behavior (quality weight, vocabulary, signal extractor) is
//! modeled as data: one concrete profile type, many instances, selected by
//! string key through the registry. No trait hierarchy for what is
//! fundamentally configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Selects which signal-extraction heuristic applies to a domain's logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Stack traces and error lines
    Engineering,
    /// Bounce / delivery-failure and deal-conversion markers
    Crm,
    /// Conflict and double-booking markers
    Scheduling,
    /// Reconciliation mismatch markers
    Finance,
    /// Escalation markers
    Support,
    /// Best-effort error-line scan
    Generic,
}

/// A named configuration bundle describing one business domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainProfile {
    /// Display name (e.g. "Engineering")
    pub name: String,
    /// Vocabulary used when describing successful outcomes
    pub success_term: String,
    /// Vocabulary used when describing failures
    pub failure_term: String,
    /// What this domain calls the artifact a run produces
    pub patch_label: String,
    /// Preamble injected into the reflection system prompt
    pub prompt_preamble: String,
    /// Multiplier on the base quality threshold; > 1 is a stricter gate,
    /// < 1 more permissive. Strictly positive.
    pub quality_weight: f64,
    /// Tools considered native to this domain, marked in pool summaries
    #[serde(default)]
    pub native_tools: BTreeSet<String>,
    /// Which signal-extraction heuristic to apply to task logs
    pub signal: SignalKind,
}

impl DomainProfile {
    /// Create a profile with generic vocabulary and neutral weight.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success_term: "successful outcomes".to_string(),
            failure_term: "failures".to_string(),
            patch_label: "change".to_string(),
            prompt_preamble: String::new(),
            quality_weight: 1.0,
            native_tools: BTreeSet::new(),
            signal: SignalKind::Generic,
        }
    }

    pub fn with_vocabulary(
        mut self,
        success: impl Into<String>,
        failure: impl Into<String>,
        patch: impl Into<String>,
    ) -> Self {
        self.success_term = success.into();
        self.failure_term = failure.into();
        self.patch_label = patch.into();
        self
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.prompt_preamble = preamble.into();
        self
    }

    pub fn with_quality_weight(mut self, weight: f64) -> Self {
        self.quality_weight = weight;
        self
    }

    pub fn with_native_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.native_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_signal(mut self, signal: SignalKind) -> Self {
        self.signal = signal;
        self
    }

    /// Whether a tool is considered native to this domain.
    pub fn is_native_tool(&self, tool: &str) -> bool {
        self.native_tools.contains(tool)
    }

    /// Validate required fields.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("profile name cannot be empty".to_string());
        }
        if !(self.quality_weight.is_finite() && self.quality_weight > 0.0) {
            return Err(format!(
                "quality_weight must be a positive number, got {}",
                self.quality_weight
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_weight() {
        assert!(DomainProfile::new("Legal").with_quality_weight(1.4).validate().is_ok());
        assert!(DomainProfile::new("Legal").with_quality_weight(0.0).validate().is_err());
        assert!(DomainProfile::new("Legal").with_quality_weight(-1.0).validate().is_err());
        assert!(DomainProfile::new("Legal").with_quality_weight(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_native_tool_lookup() {
        let profile = DomainProfile::new("CRM").with_native_tools(["send_campaign"]);
        assert!(profile.is_native_tool("send_campaign"));
        assert!(!profile.is_native_tool("apply_patch"));
    }
}
