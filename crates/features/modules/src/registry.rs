//! Static table of the modules the shell knows about.
//!
//! Every module is declared once, at start-up, together with the factory that
//! materializes it. Laziness means the factory is invoked on first selection,
//! never that code is discovered at runtime.

use crate::component::ModuleExports;
use crate::error::{FactoryError, ModuleError};
use fxhash::{FxHashMap, FxHashSet};
use sailor_domain::constants::LOGOUT;
use sailor_domain::module::ModuleMeta;
use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

pub type FactoryFuture =
    Pin<Box<dyn Future<Output = Result<ModuleExports, FactoryError>> + Send + 'static>>;

/// No-argument operation that produces a module's implementation on demand.
///
/// Implemented for every `Fn() -> impl Future<Output = Result<ModuleExports, FactoryError>>`,
/// so async closures and plain functions register directly.
pub trait ModuleFactory: Send + Sync + 'static {
    fn produce(&self) -> FactoryFuture;
}

impl<F, Fut> ModuleFactory for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ModuleExports, FactoryError>> + Send + 'static,
{
    fn produce(&self) -> FactoryFuture {
        Box::pin(self())
    }
}

/// Metadata plus the factory for one module. Immutable once registered.
#[derive(Clone)]
pub struct ModuleDescriptor {
    meta: ModuleMeta,
    factory: Arc<dyn ModuleFactory>,
}

impl ModuleDescriptor {
    pub fn new(meta: ModuleMeta, factory: impl ModuleFactory) -> Self {
        Self { meta, factory: Arc::new(factory) }
    }

    pub const fn meta(&self) -> &ModuleMeta {
        &self.meta
    }

    pub fn factory(&self) -> &dyn ModuleFactory {
        self.factory.as_ref()
    }
}

impl Deref for ModuleDescriptor {
    type Target = ModuleMeta;

    fn deref(&self) -> &Self::Target {
        &self.meta
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor").field("meta", &self.meta).finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct RegistryInner {
    descriptors: Vec<Arc<ModuleDescriptor>>,
    index: FxHashMap<String, usize>,
}

/// Read-only, cheaply cloneable module table.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    inner: Arc<RegistryInner>,
}

impl ModuleRegistry {
    pub fn builder() -> ModuleRegistryBuilder {
        ModuleRegistryBuilder::default()
    }

    /// Assembles a registry from descriptors already known to be valid.
    pub(crate) fn from_descriptors(descriptors: Vec<Arc<ModuleDescriptor>>) -> Self {
        let index = descriptors
            .iter()
            .enumerate()
            .map(|(position, descriptor)| (descriptor.name.to_string(), position))
            .collect();
        Self { inner: Arc::new(RegistryInner { descriptors, index }) }
    }

    /// All descriptors in declaration order.
    pub fn list(&self) -> &[Arc<ModuleDescriptor>] {
        &self.inner.descriptors
    }

    /// Looks a module up by name.
    ///
    /// # Errors
    /// Returns [`ModuleError::NotFound`] for names that were never registered.
    pub fn get(&self, name: &str) -> Result<&Arc<ModuleDescriptor>, ModuleError> {
        self.inner
            .index
            .get(name)
            .and_then(|position| self.inner.descriptors.get(*position))
            .ok_or_else(|| ModuleError::not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.descriptors.iter().map(|descriptor| &*descriptor.name)
    }

    pub fn len(&self) -> usize {
        self.inner.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.descriptors.is_empty()
    }
}

/// Collects descriptors and validates them on [`ModuleRegistryBuilder::build`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ModuleRegistryBuilder {
    descriptors: Vec<Arc<ModuleDescriptor>>,
}

impl ModuleRegistryBuilder {
    pub fn register(self, meta: ModuleMeta, factory: impl ModuleFactory) -> Self {
        self.descriptor(ModuleDescriptor::new(meta, factory))
    }

    pub fn descriptor(mut self, descriptor: ModuleDescriptor) -> Self {
        self.descriptors.push(Arc::new(descriptor));
        self
    }

    /// Finalizes the table.
    ///
    /// # Errors
    /// Returns [`ModuleError::Registry`] for a blank name, a duplicate name, or
    /// a module claiming the reserved `logout` sentinel.
    pub fn build(self) -> Result<ModuleRegistry, ModuleError> {
        let mut seen = FxHashSet::default();
        for descriptor in &self.descriptors {
            let name = &*descriptor.name;
            if name.trim().is_empty() {
                return Err(ModuleError::Registry {
                    message: "module name cannot be blank".into(),
                    context: Some(descriptor.display_name.to_string().into()),
                });
            }
            if name == LOGOUT {
                return Err(ModuleError::Registry {
                    message: format!("'{LOGOUT}' is reserved for ending the session").into(),
                    context: None,
                });
            }
            if !seen.insert(name) {
                return Err(ModuleError::Registry {
                    message: format!("duplicate module name '{name}'").into(),
                    context: None,
                });
            }
        }

        debug!(modules = self.descriptors.len(), "Module registry assembled");
        Ok(ModuleRegistry::from_descriptors(self.descriptors))
    }
}
