//! Resolves permitted modules into runnable implementations and caches them
//! for the lifetime of a session.

use crate::access::{AccessSnapshot, PermissionResolver};
use crate::component::{ModuleComponent, ModuleView};
use crate::error::{FactoryError, ModuleError};
use crate::registry::{ModuleDescriptor, ModuleRegistry};
use chrono::{DateTime, Utc};
use moka::future::Cache;
use sailor_domain::identity::UserIdentity;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, trace, warn};

/// Upper bound on distinct cached modules. The registry is far smaller.
const MAX_CACHED_MODULES: u64 = 256;

/// A successfully materialized module.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    descriptor: Arc<ModuleDescriptor>,
    component: Arc<dyn ModuleComponent>,
    loaded_at: DateTime<Utc>,
}

impl LoadedModule {
    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn component(&self) -> &dyn ModuleComponent {
        self.component.as_ref()
    }

    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn render(&self, user: &UserIdentity) -> ModuleView {
        self.component.render(user)
    }
}

#[derive(Debug)]
struct LoaderInner {
    registry: ModuleRegistry,
    cache: Cache<String, Arc<LoadedModule>>,
    timeout: Option<Duration>,
}

/// Session-scoped module loader.
///
/// Concurrent first loads of the same name share one factory invocation;
/// failures are handed to every waiter and never cached.
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    inner: Arc<LoaderInner>,
}

impl ModuleLoader {
    pub fn new(registry: ModuleRegistry) -> Self {
        Self::with_timeout(registry, None)
    }

    /// A loader whose factory invocations expire after `timeout`.
    pub fn with_timeout(registry: ModuleRegistry, timeout: Option<Duration>) -> Self {
        let cache = Cache::builder().max_capacity(MAX_CACHED_MODULES).build();
        Self { inner: Arc::new(LoaderInner { registry, cache, timeout }) }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.inner.registry
    }

    /// Resolves `name` into a loaded module.
    ///
    /// Lookup, then permission, then cache, then factory. A cached module is
    /// returned as-is (same `loaded_at`).
    ///
    /// # Errors
    /// * [`ModuleError::NotFound`] for names the registry does not know.
    /// * [`ModuleError::AccessDenied`] when the snapshot does not permit the
    ///   module; the factory is not touched.
    /// * [`ModuleError::LoadFailure`] when the factory fails, times out, or
    ///   exports no component.
    #[instrument(skip_all, fields(module = %name))]
    pub async fn load(
        &self,
        name: &str,
        snapshot: &AccessSnapshot,
    ) -> Result<Arc<LoadedModule>, ModuleError> {
        let descriptor = self.inner.registry.get(name)?;

        if !PermissionResolver::permits(descriptor.meta(), snapshot) {
            debug!("Load rejected by access predicate");
            return Err(ModuleError::access_denied(name));
        }

        if let Some(loaded) = self.inner.cache.get(name).await {
            trace!("Module served from session cache");
            return Ok(loaded);
        }

        let init = materialize(Arc::clone(descriptor), self.inner.timeout);
        self.inner.cache.try_get_with(name.to_owned(), init).await.map_err(
            |source: Arc<FactoryError>| {
                warn!(error = %source, "Module failed to load");
                ModuleError::load_failure(name, source)
            },
        )
    }

    /// Drops any cached copy of `name`, then loads it again.
    ///
    /// # Errors
    /// Same as [`ModuleLoader::load`].
    pub async fn reload(
        &self,
        name: &str,
        snapshot: &AccessSnapshot,
    ) -> Result<Arc<LoadedModule>, ModuleError> {
        self.invalidate(name).await;
        self.load(name, snapshot).await
    }

    pub async fn invalidate(&self, name: &str) {
        self.inner.cache.invalidate(name).await;
        debug!(module = %name, "Module cache entry invalidated");
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.inner.cache.contains_key(name)
    }

    /// Empties the session cache.
    pub async fn clear(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
        debug!("Module cache cleared");
    }
}

async fn materialize(
    descriptor: Arc<ModuleDescriptor>,
    timeout: Option<Duration>,
) -> Result<Arc<LoadedModule>, FactoryError> {
    debug!(module = %descriptor.name, "Invoking module factory");
    let produce = descriptor.factory().produce();

    let exports = match timeout {
        Some(limit) => tokio::time::timeout(limit, produce).await.map_err(|_| {
            FactoryError::TimedOut {
                elapsed_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                context: Some(descriptor.name.to_string().into()),
            }
        })??,
        None => produce.await?,
    };

    let component = exports.component.ok_or_else(|| FactoryError::MissingEntryPoint {
        message: format!("'{}' resolved without a component", descriptor.name).into(),
        context: None,
    })?;

    Ok(Arc::new(LoadedModule { descriptor, component, loaded_at: Utc::now() }))
}
