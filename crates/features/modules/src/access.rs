//! The single authority deciding which modules a user may see and use.
//!
//! Navigation filtering and load-time re-validation both call
//! [`PermissionResolver::permits`], so visibility and usability cannot diverge.

use crate::registry::{ModuleDescriptor, ModuleRegistry};
use fxhash::FxHashSet;
use sailor_domain::module::{EntitlementRecord, ModuleMeta};
use std::cmp::Ordering;
use std::ops::Deref;
use std::sync::Arc;

/// A user's role plus the set of module names enabled for them.
///
/// A name counts as enabled when *some* record for it has `is_enabled = true`,
/// so duplicate or contradictory records never hide a granted module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessSnapshot {
    is_admin: bool,
    enabled: FxHashSet<String>,
}

impl AccessSnapshot {
    pub fn new(entitlements: &[EntitlementRecord], is_admin: bool) -> Self {
        let enabled = entitlements
            .iter()
            .filter(|record| record.is_enabled)
            .map(|record| record.name.clone())
            .collect();
        Self { is_admin, enabled }
    }

    /// Nothing enabled; what a session holds when entitlements could not be fetched.
    pub fn empty(is_admin: bool) -> Self {
        Self { is_admin, enabled: FxHashSet::default() }
    }

    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }
}

/// Ordered, immutable list of the descriptors visible to one user.
#[derive(Debug, Clone, Default)]
pub struct AvailableModules(Arc<[Arc<ModuleDescriptor>]>);

impl AvailableModules {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|descriptor| descriptor.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModuleDescriptor>> {
        self.0.iter().find(|descriptor| descriptor.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|descriptor| &*descriptor.name)
    }
}

impl Deref for AvailableModules {
    type Target = [Arc<ModuleDescriptor>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pure function of (registry, entitlements, role). Holds no per-user state.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    registry: ModuleRegistry,
}

impl PermissionResolver {
    pub const fn new(registry: ModuleRegistry) -> Self {
        Self { registry }
    }

    pub const fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// The access predicate: admin-only modules need an admin, and every module
    /// needs an enabled entitlement record with its name.
    ///
    /// `requires_auth` is not consulted here: a snapshot only exists for a
    /// signed-in user.
    pub fn permits(meta: &ModuleMeta, snapshot: &AccessSnapshot) -> bool {
        (!meta.is_admin_only() || snapshot.is_admin()) && snapshot.is_enabled(&meta.name)
    }

    /// Visible modules for raw entitlement records.
    pub fn compute_available(
        &self,
        entitlements: &[EntitlementRecord],
        is_admin: bool,
    ) -> AvailableModules {
        self.available_for(&AccessSnapshot::new(entitlements, is_admin))
    }

    /// Visible modules, sorted by display name (ordinal), ties broken by name.
    pub fn available_for(&self, snapshot: &AccessSnapshot) -> AvailableModules {
        let mut visible: Vec<_> = self
            .registry
            .list()
            .iter()
            .filter(|descriptor| Self::permits(descriptor.meta(), snapshot))
            .cloned()
            .collect();
        visible.sort_by(|a, b| by_display_name(a, b));
        AvailableModules(visible.into())
    }

    /// Single-module form of the predicate. Unknown names are simply unavailable.
    pub fn is_available(
        &self,
        name: &str,
        entitlements: &[EntitlementRecord],
        is_admin: bool,
    ) -> bool {
        self.is_permitted(name, &AccessSnapshot::new(entitlements, is_admin))
    }

    pub fn is_permitted(&self, name: &str, snapshot: &AccessSnapshot) -> bool {
        self.registry.get(name).is_ok_and(|descriptor| Self::permits(descriptor.meta(), snapshot))
    }
}

fn by_display_name(a: &ModuleDescriptor, b: &ModuleDescriptor) -> Ordering {
    a.display_name.cmp(&b.display_name).then_with(|| a.name.cmp(&b.name))
}
