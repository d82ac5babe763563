//! Domain-adjusted quality gate for execution traces.
//!
//! Decides per trace whether it is dense/clean enough to learn from. The
//! `is_high_quality` flag is an absolute veto; beyond that, the benchmark
//! score must clear the base threshold scaled by the domain's quality
//! weight, so the same score can pass in a permissive domain and fail in a
//! strict one.

use crate::domain::models::{DomainProfile, ExecutionTrace};

/// Base admission threshold before domain weighting.
pub const BASE_QUALITY_THRESHOLD: f64 = 0.3;

/// Why a trace was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// The high-quality flag was false (veto, independent of score)
    LowQualityFlag,
    /// The score did not clear the domain-weighted threshold
    BelowThreshold,
}

/// Admission filter over execution traces.
#[derive(Debug, Clone)]
pub struct QualityGate {
    base_threshold: f64,
}

impl QualityGate {
    pub fn new(base_threshold: f64) -> Self {
        Self { base_threshold }
    }

    /// The effective threshold for a domain.
    pub fn effective_threshold(&self, profile: &DomainProfile) -> f64 {
        self.base_threshold * profile.quality_weight
    }

    /// Check one trace against the gate.
    pub fn check(
        &self,
        trace: &ExecutionTrace,
        profile: &DomainProfile,
    ) -> Result<(), GateRejection> {
        if !trace.is_high_quality {
            return Err(GateRejection::LowQualityFlag);
        }
        if trace.benchmark_score <= self.effective_threshold(profile) {
            return Err(GateRejection::BelowThreshold);
        }
        Ok(())
    }

    /// Whether a trace is admitted to the reflection pool.
    pub fn admits(&self, trace: &ExecutionTrace, profile: &DomainProfile) -> bool {
        self.check(trace, profile).is_ok()
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::new(BASE_QUALITY_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_weight(weight: f64) -> DomainProfile {
        DomainProfile::new("test").with_quality_weight(weight)
    }

    #[test]
    fn test_same_score_passes_permissive_fails_strict() {
        let gate = QualityGate::default();
        let trace = ExecutionTrace::new("a1", 0.35, true);

        // 0.35 > 0.3 * 0.8 = 0.24
        assert!(gate.admits(&trace, &profile_with_weight(0.8)));
        // 0.35 <= 0.3 * 1.3 = 0.39
        assert!(!gate.admits(&trace, &profile_with_weight(1.3)));
    }

    #[test]
    fn test_quality_flag_is_absolute_veto() {
        let gate = QualityGate::default();
        let trace = ExecutionTrace::new("a1", 0.99, false);
        for weight in [0.5, 0.8, 1.0, 1.3, 2.0] {
            assert_eq!(
                gate.check(&trace, &profile_with_weight(weight)),
                Err(GateRejection::LowQualityFlag)
            );
        }
    }

    #[test]
    fn test_score_at_threshold_rejected() {
        let gate = QualityGate::default();
        let trace = ExecutionTrace::new("a1", 0.3, true);
        assert_eq!(
            gate.check(&trace, &profile_with_weight(1.0)),
            Err(GateRejection::BelowThreshold)
        );
    }
}
