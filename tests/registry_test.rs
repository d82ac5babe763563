use atom_memory::domain::models::DomainProfile;
use atom_memory::services::DomainProfileRegistry;

#[test]
fn builtin_domains_are_discoverable() {
    let registry = DomainProfileRegistry::builtin();
    let domains = registry.list_domains();
    for expected in ["engineering", "crm", "finance", "scheduling", "support", "general"] {
        assert!(
            domains.contains(&expected.to_string()),
            "missing builtin domain {expected}"
        );
    }
}

#[test]
fn resolution_normalizes_case_spacing_and_aliases() {
    let registry = DomainProfileRegistry::builtin();

    assert_eq!(registry.resolve(Some("CRM")).name, "CRM");
    assert_eq!(registry.resolve(Some("crm")).name, "CRM");
    assert_eq!(registry.resolve(Some(" cRm ")).name, "CRM");
    assert_eq!(registry.resolve(Some("customer-support")).name, "Support");
    assert_eq!(registry.resolve(Some("customer support")).name, "Support");
    assert_eq!(registry.resolve(Some("coding")).name, "Engineering");
    assert_eq!(registry.resolve(Some("financial")).name, "Finance");
    assert_eq!(registry.resolve(Some("calendar")).name, "Scheduling");
}

#[test]
fn unknown_categories_never_error() {
    let registry = DomainProfileRegistry::builtin();
    assert_eq!(registry.resolve(Some("totally_unknown_xyz")).name, "General");
    assert_eq!(registry.resolve(Some("")).name, "General");
    assert_eq!(registry.resolve(None).name, "General");
}

#[test]
fn runtime_registration_is_isolated_per_registry() {
    let mut a = DomainProfileRegistry::builtin();
    let b = DomainProfileRegistry::builtin();

    a.register("legal", DomainProfile::new("Legal").with_quality_weight(1.4))
        .unwrap();

    assert_eq!(a.resolve(Some("legal")).name, "Legal");
    // No cross-registry leakage.
    assert_eq!(b.resolve(Some("legal")).name, "General");
}

#[test]
fn registration_overwrites_existing_profile() {
    let mut registry = DomainProfileRegistry::builtin();
    registry
        .register("crm", DomainProfile::new("CRM").with_quality_weight(2.0))
        .unwrap();
    assert_eq!(registry.resolve(Some("crm")).quality_weight, 2.0);
}
