//! Domain profile registry.
//!
//! Resolves a free-text business-domain category to a `DomainProfile`.
//! Lookup is case-insensitive and space/underscore-normalizing, with alias
//! resolution ("coding" → engineering, "calendar" → scheduling). Unknown
//! categories and `None` fall back to the generic profile; resolution
//! never fails.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DomainProfile, SignalKind};

/// Registry of named domain profiles with alias resolution.
///
/// An explicit, constructible object rather than process-global state:
/// tests can build ephemeral registries without cross-test leakage.
#[derive(Debug, Clone)]
pub struct DomainProfileRegistry {
    profiles: HashMap<String, Arc<DomainProfile>>,
    aliases: HashMap<String, String>,
    fallback: Arc<DomainProfile>,
}

impl DomainProfileRegistry {
    /// Normalize a category key: trim, lowercase, unify spaces and hyphens
    /// to underscores.
    fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase().replace([' ', '-'], "_")
    }

    /// Create an empty registry with only the generic fallback profile.
    pub fn empty() -> Self {
        let fallback = Arc::new(general_profile());
        let mut profiles = HashMap::new();
        profiles.insert("general".to_string(), fallback.clone());
        Self {
            profiles,
            aliases: HashMap::new(),
            fallback,
        }
    }

    /// Create a registry pre-populated with the built-in domains.
    ///
    /// Quality weights are a deliberate knob: engineering is permissive
    /// (0.8) so noisy low-benchmark traces still count as training signal,
    /// while finance is strict (1.35) because the domain demands precision.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        registry.insert_builtin(engineering_profile(), &["coding", "software", "swe"]);
        registry.insert_builtin(crm_profile(), &["sales"]);
        registry.insert_builtin(finance_profile(), &["financial"]);
        registry.insert_builtin(scheduling_profile(), &["calendar"]);
        registry.insert_builtin(support_profile(), &["customer_support", "helpdesk"]);

        registry
    }

    fn insert_builtin(&mut self, profile: DomainProfile, aliases: &[&str]) {
        let key = Self::normalize(&profile.name);
        for alias in aliases {
            self.aliases.insert(Self::normalize(alias), key.clone());
        }
        self.profiles.insert(key, Arc::new(profile));
    }

    /// Resolve a category to a profile, falling back to the generic
    /// profile for `None` or any unrecognized string. Never fails.
    pub fn resolve(&self, category: Option<&str>) -> Arc<DomainProfile> {
        let Some(raw) = category else {
            return self.fallback.clone();
        };
        let key = Self::normalize(raw);
        if let Some(profile) = self.profiles.get(&key) {
            return profile.clone();
        }
        if let Some(target) = self.aliases.get(&key) {
            if let Some(profile) = self.profiles.get(target) {
                return profile.clone();
            }
        }
        tracing::debug!(category = raw, "unknown domain category, using fallback");
        self.fallback.clone()
    }

    /// Add or overwrite a named profile at runtime.
    pub fn register(&mut self, name: &str, profile: DomainProfile) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "domain name cannot be empty".to_string(),
            ));
        }
        profile.validate().map_err(DomainError::ValidationFailed)?;
        self.profiles
            .insert(Self::normalize(name), Arc::new(profile));
        Ok(())
    }

    /// Remove a runtime-registered (or built-in) profile. Used for test
    /// isolation; resolving the removed name falls back to generic.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.profiles.remove(&Self::normalize(name)).is_some()
    }

    /// All currently registered domain names, sorted for stable output.
    pub fn list_domains(&self) -> Vec<String> {
        let mut names: Vec<_> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for DomainProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn general_profile() -> DomainProfile {
    DomainProfile::new("General")
        .with_vocabulary("successful outcomes", "failures", "change")
        .with_preamble("You review execution logs from a pool of general-purpose agents.")
        .with_quality_weight(1.0)
        .with_signal(SignalKind::Generic)
}

fn engineering_profile() -> DomainProfile {
    DomainProfile::new("Engineering")
        .with_vocabulary(
            "passing builds and merged patches",
            "regressions and broken builds",
            "patch",
        )
        .with_preamble(
            "You review execution logs from software engineering agents. \
             Focus on recurring tracebacks, flaky tooling, and patch quality.",
        )
        .with_quality_weight(0.8)
        .with_native_tools(["apply_patch", "run_tests", "git_commit"])
        .with_signal(SignalKind::Engineering)
}

fn crm_profile() -> DomainProfile {
    DomainProfile::new("CRM")
        .with_vocabulary(
            "closed-won deals and delivered campaigns",
            "bounced sends and stalled deals",
            "campaign update",
        )
        .with_preamble(
            "You review execution logs from CRM and sales agents. \
             Focus on delivery failures, bounce patterns, and deal-stage conversions.",
        )
        .with_quality_weight(1.0)
        .with_native_tools(["send_campaign", "update_deal_stage", "sync_contacts"])
        .with_signal(SignalKind::Crm)
}

fn finance_profile() -> DomainProfile {
    DomainProfile::new("Finance")
        .with_vocabulary(
            "reconciled ledgers and balanced books",
            "reconciliation mismatches",
            "journal adjustment",
        )
        .with_preamble(
            "You review execution logs from finance agents. Precision is \
             paramount; focus on amount mismatches and reconciliation gaps.",
        )
        .with_quality_weight(1.35)
        .with_native_tools(["post_journal", "reconcile_accounts", "export_statement"])
        .with_signal(SignalKind::Finance)
}

fn scheduling_profile() -> DomainProfile {
    DomainProfile::new("Scheduling")
        .with_vocabulary(
            "conflict-free calendars",
            "double-bookings and conflicts",
            "schedule change",
        )
        .with_preamble(
            "You review execution logs from scheduling agents. \
             Focus on booking conflicts and timezone mistakes.",
        )
        .with_quality_weight(0.9)
        .with_native_tools(["create_event", "find_slot", "send_invite"])
        .with_signal(SignalKind::Scheduling)
}

fn support_profile() -> DomainProfile {
    DomainProfile::new("Support")
        .with_vocabulary(
            "resolved tickets",
            "escalations and reopened tickets",
            "macro update",
        )
        .with_preamble(
            "You review execution logs from customer support agents. \
             Focus on escalation causes and resolution quality.",
        )
        .with_quality_weight(1.1)
        .with_native_tools(["reply_ticket", "escalate_ticket", "close_ticket"])
        .with_signal(SignalKind::Support)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_is_case_and_spacing_insensitive() {
        let registry = DomainProfileRegistry::builtin();
        let a = registry.resolve(Some("CRM"));
        let b = registry.resolve(Some("crm"));
        let c = registry.resolve(Some(" cRm "));
        assert_eq!(a.name, "CRM");
        assert_eq!(a.name, b.name);
        assert_eq!(b.name, c.name);
    }

    #[test]
    fn test_alias_resolution() {
        let registry = DomainProfileRegistry::builtin();
        assert_eq!(registry.resolve(Some("coding")).name, "Engineering");
        assert_eq!(registry.resolve(Some("financial")).name, "Finance");
        assert_eq!(registry.resolve(Some("calendar")).name, "Scheduling");
        assert_eq!(registry.resolve(Some("customer support")).name, "Support");
    }

    #[test]
    fn test_unknown_and_none_fall_back() {
        let registry = DomainProfileRegistry::builtin();
        assert_eq!(registry.resolve(Some("totally_unknown_xyz")).name, "General");
        assert_eq!(registry.resolve(None).name, "General");
    }

    #[test]
    fn test_register_and_unregister() {
        let mut registry = DomainProfileRegistry::builtin();
        let legal = DomainProfile::new("Legal").with_quality_weight(1.4);
        registry.register("legal", legal).unwrap();
        assert_eq!(registry.resolve(Some("Legal")).quality_weight, 1.4);
        assert!(registry.list_domains().contains(&"legal".to_string()));

        assert!(registry.unregister("legal"));
        assert_eq!(registry.resolve(Some("legal")).name, "General");
    }

    #[test]
    fn test_register_rejects_invalid_profile() {
        let mut registry = DomainProfileRegistry::builtin();
        let bad = DomainProfile::new("Bad").with_quality_weight(0.0);
        assert!(registry.register("bad", bad).is_err());
        assert!(registry.register("", DomainProfile::new("X")).is_err());
    }

    #[test]
    fn test_builtin_weights_differ_by_strictness() {
        let registry = DomainProfileRegistry::builtin();
        let engineering = registry.resolve(Some("engineering"));
        let finance = registry.resolve(Some("finance"));
        assert!(engineering.quality_weight < 1.0);
        assert!(finance.quality_weight >= 1.3);
    }
}
