//! Well-known module names and shell strings.

pub const APP_TITLE: &str = "Sailor Utility";

pub const DASHBOARD: &str = "dashboard";
pub const BOATS: &str = "boats";
pub const TRIPS: &str = "trips";
pub const EQUIPMENT: &str = "equipment";
pub const MAINTENANCE: &str = "maintenance";
pub const EVENTS: &str = "events";
pub const NAVIGATION: &str = "navigation";
pub const SOCIAL: &str = "social";
pub const ADMIN: &str = "admin";

/// Reserved pseudo-module that ends the session. Never registered.
pub const LOGOUT: &str = "logout";

/// Module opened after sign-in when the user has no preference.
pub const DEFAULT_MODULE: &str = DASHBOARD;
