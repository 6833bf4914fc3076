use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

bitflags! {
    /// Access requirements of a module.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ModuleFlags: u8 {
        const REQUIRES_AUTH = 1 << 0;
        const ADMIN_ONLY = 1 << 1;
    }
}

impl Default for ModuleFlags {
    fn default() -> Self {
        Self::REQUIRES_AUTH
    }
}

/// Static metadata describing a module, independent of whether it was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleMeta {
    pub name: Cow<'static, str>,
    pub display_name: Cow<'static, str>,
    pub icon: Cow<'static, str>,
    pub description: Cow<'static, str>,
    /// Route the module is mounted under, e.g. `/boats`.
    pub path: Cow<'static, str>,
    pub flags: ModuleFlags,
}

impl ModuleMeta {
    /// Metadata with an empty icon/description and a `/<name>` path.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        display_name: impl Into<Cow<'static, str>>,
    ) -> Self {
        let name = name.into();
        let path = Cow::Owned(format!("/{name}"));
        Self {
            name,
            display_name: display_name.into(),
            icon: Cow::Borrowed(""),
            description: Cow::Borrowed(""),
            path,
            flags: ModuleFlags::default(),
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<Cow<'static, str>>) -> Self {
        self.icon = icon.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<Cow<'static, str>>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub const fn flags(mut self, flags: ModuleFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub const fn admin_only(mut self) -> Self {
        self.flags = self.flags.union(ModuleFlags::ADMIN_ONLY);
        self
    }

    pub const fn requires_auth(&self) -> bool {
        self.flags.contains(ModuleFlags::REQUIRES_AUTH)
    }

    pub const fn is_admin_only(&self) -> bool {
        self.flags.contains(ModuleFlags::ADMIN_ONLY)
    }
}

/// Per-user enablement flag for one module, as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitlementRecord {
    pub name: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl EntitlementRecord {
    pub fn new(name: impl Into<String>, is_enabled: bool) -> Self {
        Self { name: name.into(), is_enabled }
    }

    pub fn enabled(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }
}

/// Wire shape of an entitlement listing: `{ "modules": [ .. ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementDocument {
    #[serde(default)]
    pub modules: Vec<EntitlementRecord>,
}
