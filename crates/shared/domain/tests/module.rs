use sailor_domain::constants::{ADMIN, DASHBOARD, DEFAULT_MODULE, LOGOUT};
use sailor_domain::identity::UserIdentity;
use sailor_domain::module::{EntitlementDocument, EntitlementRecord, ModuleFlags, ModuleMeta};
use serde_json::json;

#[test]
fn constants_match_wire_strings() {
    assert_eq!(LOGOUT, "logout");
    assert_eq!(DEFAULT_MODULE, DASHBOARD);
    assert_eq!(ADMIN, "admin");
}

#[test]
fn meta_defaults_to_auth_and_name_path() {
    let meta = ModuleMeta::new("boats", "Fleet Management").icon("boat");
    assert_eq!(meta.path, "/boats");
    assert_eq!(meta.icon, "boat");
    assert!(meta.requires_auth());
    assert!(!meta.is_admin_only());

    let admin = ModuleMeta::new(ADMIN, "Admin Panel").admin_only();
    assert!(admin.requires_auth());
    assert!(admin.is_admin_only());
    assert_eq!(admin.flags, ModuleFlags::REQUIRES_AUTH | ModuleFlags::ADMIN_ONLY);
}

#[test]
fn entitlement_document_parses_backend_shape() {
    let raw = json!({
        "modules": [
            { "name": "dashboard", "is_enabled": true },
            { "name": "admin" }
        ]
    });

    let doc: EntitlementDocument = serde_json::from_value(raw).expect("document deserialize");
    assert_eq!(
        doc.modules,
        vec![EntitlementRecord::enabled("dashboard"), EntitlementRecord::new("admin", false)]
    );
}

#[test]
fn display_name_prefers_first_name() {
    let user = UserIdentity::new("skipper").with_first_name("Ada");
    assert_eq!(user.display_name(), "Ada");

    let blank = UserIdentity::new("skipper").with_first_name("  ");
    assert_eq!(blank.display_name(), "skipper");

    let parsed: UserIdentity =
        serde_json::from_value(json!({ "username": "mate", "is_admin": true })).expect("identity");
    assert!(parsed.is_admin);
    assert_eq!(parsed.display_name(), "mate");
    assert!(parsed.default_module.is_none());
}
