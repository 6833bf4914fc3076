mod common;

use common::{Calls, counted, fleet};
use proptest::prelude::*;
use sailor_modules::{
    AccessSnapshot, EntitlementRecord, ModuleMeta, ModuleRegistry, PermissionResolver,
};

fn records(names: &[&str]) -> Vec<EntitlementRecord> {
    names.iter().copied().map(EntitlementRecord::enabled).collect()
}

#[test]
fn non_admin_never_sees_admin_only_modules() {
    let resolver = PermissionResolver::new(fleet(&Calls::default()));
    let available = resolver.compute_available(&records(&["dashboard", "admin"]), false);

    assert_eq!(available.names().collect::<Vec<_>>(), ["dashboard"]);
}

#[test]
fn admin_list_is_sorted_by_display_name() {
    let resolver = PermissionResolver::new(fleet(&Calls::default()));
    let available = resolver.compute_available(&records(&["dashboard", "admin"]), true);

    assert_eq!(available.names().collect::<Vec<_>>(), ["admin", "dashboard"]);
    assert_eq!(available[0].display_name, "Admin Panel");
}

#[test]
fn unknown_names_are_unavailable() {
    let resolver = PermissionResolver::new(fleet(&Calls::default()));
    let entitlements = records(&["ghost", "dashboard"]);

    assert!(!resolver.is_available("ghost", &entitlements, true));
    assert!(!resolver.is_available("", &entitlements, true));
    assert!(resolver.is_available("dashboard", &entitlements, false));
    assert!(!resolver.compute_available(&entitlements, true).contains("ghost"));
}

#[test]
fn disabled_entitlements_hide_modules() {
    let resolver = PermissionResolver::new(fleet(&Calls::default()));
    let entitlements = [
        EntitlementRecord::new("dashboard", false),
        EntitlementRecord::enabled("boats"),
    ];

    let available = resolver.compute_available(&entitlements, true);
    assert_eq!(available.names().collect::<Vec<_>>(), ["boats"]);
    assert!(!resolver.is_permitted("dashboard", &AccessSnapshot::new(&entitlements, true)));
}

#[test]
fn builtin_catalog_for_a_crew_member() {
    let resolver = PermissionResolver::new(ModuleRegistry::builtin());
    let everything: Vec<_> = resolver.registry().names().collect();
    let available = resolver.compute_available(&records(&everything), false);

    assert_eq!(
        available.names().collect::<Vec<_>>(),
        [
            "social",
            "dashboard",
            "equipment",
            "events",
            "boats",
            "maintenance",
            "trips",
            "navigation"
        ]
    );
}

fn registry_from(entries: &[(String, String, bool)]) -> ModuleRegistry {
    let calls = Calls::default();
    entries
        .iter()
        .fold(ModuleRegistry::builder(), |builder, (name, display, admin_only)| {
            let meta = ModuleMeta::new(name.clone(), display.clone());
            let meta = if *admin_only { meta.admin_only() } else { meta };
            builder.register(meta, counted("page", &calls))
        })
        .build()
        .unwrap()
}

fn entries() -> impl Strategy<Value = Vec<(String, String, bool)>> {
    let modules =
        prop::collection::btree_map("m[a-z]{0,7}", ("[A-Za-z ]{0,10}", any::<bool>()), 0..12);
    modules.prop_map(|modules| {
        modules.into_iter().map(|(name, (display, admin))| (name, display, admin)).collect()
    })
}

proptest! {
    #[test]
    fn available_is_sorted_and_respects_role(
        entries in entries(),
        enabled in prop::collection::vec(any::<bool>(), 12),
        is_admin in any::<bool>(),
    ) {
        let registry = registry_from(&entries);
        let entitlements: Vec<_> = entries
            .iter()
            .zip(&enabled)
            .map(|((name, _, _), on)| EntitlementRecord::new(name.clone(), *on))
            .collect();

        let resolver = PermissionResolver::new(registry);
        let available = resolver.compute_available(&entitlements, is_admin);

        for pair in available.windows(2) {
            prop_assert!(
                (&pair[0].display_name, &pair[0].name) <= (&pair[1].display_name, &pair[1].name)
            );
        }
        if !is_admin {
            prop_assert!(available.iter().all(|descriptor| !descriptor.is_admin_only()));
        }
        for descriptor in resolver.registry().list() {
            prop_assert_eq!(
                available.contains(&descriptor.name),
                resolver.is_available(&descriptor.name, &entitlements, is_admin)
            );
        }
    }
}
