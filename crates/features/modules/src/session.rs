//! One signed-in user's view of the module shell.
//!
//! [`ModuleSession`] owns the entitlement snapshot and hands the same snapshot
//! to both the navigation list and the loader, so what is shown and what can be
//! opened always come from one fetch.

use crate::access::{AccessSnapshot, AvailableModules, PermissionResolver};
use crate::error::{SessionError, SessionErrorExt};
use crate::loader::ModuleLoader;
use crate::navigation::{NavigationEvent, NavigationPresenter, NavigationView};
use crate::registry::ModuleRegistry;
use crate::state::{LoaderState, LoaderStateMachine, PendingLoad};
use parking_lot::RwLock;
use sailor_domain::config::ShellConfig;
use sailor_domain::constants::DEFAULT_MODULE;
use sailor_domain::identity::UserIdentity;
use sailor_domain::module::{EntitlementDocument, EntitlementRecord};
use sailor_event_bus::EventBus;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Backend that knows which modules are enabled for a user.
pub trait EntitlementSource: Send + Sync + 'static {
    fn fetch(
        &self,
        user: &UserIdentity,
    ) -> impl Future<Output = Result<Vec<EntitlementRecord>, SessionError>> + Send;

    /// Flips the enablement of `name` for `user`. Unknown names become enabled.
    fn toggle(
        &self,
        user: &UserIdentity,
        name: &str,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;
}

impl<S: EntitlementSource> EntitlementSource for Arc<S> {
    fn fetch(
        &self,
        user: &UserIdentity,
    ) -> impl Future<Output = Result<Vec<EntitlementRecord>, SessionError>> + Send {
        S::fetch(self, user)
    }

    fn toggle(
        &self,
        user: &UserIdentity,
        name: &str,
    ) -> impl Future<Output = Result<(), SessionError>> + Send {
        S::toggle(self, user, name)
    }
}

/// Flips every record named `name`; returns the new enablement.
fn flip(records: &mut Vec<EntitlementRecord>, name: &str) -> bool {
    let enabled = !records.iter().any(|record| record.name == name && record.is_enabled);
    let mut found = false;
    for record in records.iter_mut().filter(|record| record.name == name) {
        record.is_enabled = enabled;
        found = true;
    }
    if !found {
        records.push(EntitlementRecord::new(name, enabled));
    }
    enabled
}

/// In-memory entitlements shared by every user.
#[derive(Debug, Default)]
pub struct StaticEntitlements {
    records: RwLock<Vec<EntitlementRecord>>,
}

impl StaticEntitlements {
    pub fn new(records: impl IntoIterator<Item = EntitlementRecord>) -> Self {
        Self { records: RwLock::new(records.into_iter().collect()) }
    }

    /// Every name enabled.
    pub fn all_enabled<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(names.into_iter().map(EntitlementRecord::enabled))
    }

    pub fn records(&self) -> Vec<EntitlementRecord> {
        self.records.read().clone()
    }
}

impl EntitlementSource for StaticEntitlements {
    async fn fetch(&self, _user: &UserIdentity) -> Result<Vec<EntitlementRecord>, SessionError> {
        Ok(self.records())
    }

    async fn toggle(&self, _user: &UserIdentity, name: &str) -> Result<(), SessionError> {
        let enabled = flip(&mut self.records.write(), name);
        debug!(module = %name, enabled, "Entitlement toggled");
        Ok(())
    }
}

/// Entitlements stored as `{ "modules": [ { "name": .., "is_enabled": .. } ] }`.
#[derive(Debug)]
pub struct JsonFileEntitlements {
    path: PathBuf,
    write: Mutex<()>,
}

impl JsonFileEntitlements {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<EntitlementDocument, SessionError> {
        let bytes = tokio::fs::read(&self.path).await.context(self.path.display().to_string())?;
        serde_json::from_slice(&bytes).context(self.path.display().to_string())
    }
}

impl EntitlementSource for JsonFileEntitlements {
    async fn fetch(&self, _user: &UserIdentity) -> Result<Vec<EntitlementRecord>, SessionError> {
        Ok(self.read_document().await?.modules)
    }

    async fn toggle(&self, _user: &UserIdentity, name: &str) -> Result<(), SessionError> {
        let _guard = self.write.lock().await;
        let mut document = self.read_document().await?;
        let enabled = flip(&mut document.modules, name);

        let bytes = serde_json::to_vec_pretty(&document).context("encoding entitlements")?;
        tokio::fs::write(&self.path, bytes).await.context(self.path.display().to_string())?;
        debug!(module = %name, enabled, path = %self.path.display(), "Entitlement toggled");
        Ok(())
    }
}

/// Outcome of a navigation click.
#[derive(Debug)]
pub enum Selection {
    /// The reserved entry; the host ends the session.
    Logout,
    /// Re-click on the module that is still resolving.
    Ignored,
    /// Reached `Idle`, `Denied` or `Failed` without loading.
    Settled,
    /// Access granted; run it to reach `Ready` or `Failed`.
    Pending(PendingLoad),
}

/// Identity, entitlement snapshot, loader, state machine and navigation of
/// one user session.
#[derive(Debug)]
pub struct ModuleSession<S> {
    user: UserIdentity,
    source: S,
    resolver: PermissionResolver,
    snapshot: Arc<AccessSnapshot>,
    available: AvailableModules,
    machine: LoaderStateMachine,
    presenter: NavigationPresenter,
    bus: EventBus,
    last_error: Option<String>,
}

impl<S: EntitlementSource> ModuleSession<S> {
    /// Opens a session and fetches entitlements once.
    ///
    /// A failed fetch does not abort the session: it starts with nothing
    /// available and the error in [`ModuleSession::last_error`].
    pub async fn start(
        user: UserIdentity,
        source: S,
        registry: ModuleRegistry,
        config: &ShellConfig,
        bus: EventBus,
    ) -> Self {
        let loader = ModuleLoader::with_timeout(registry.clone(), config.loader.timeout());
        let machine = LoaderStateMachine::new(loader, bus.clone());
        let presenter = NavigationPresenter::new(bus.clone())
            .with_title(config.shell.title.clone())
            .with_collapsed(config.shell.collapsed);

        let mut session = Self {
            snapshot: Arc::new(AccessSnapshot::empty(user.is_admin)),
            user,
            source,
            resolver: PermissionResolver::new(registry),
            available: AvailableModules::default(),
            machine,
            presenter,
            bus,
            last_error: None,
        };
        // Failure is already recorded in `last_error`.
        let _ = session.refresh().await;

        info!(
            user = %session.user.username,
            admin = session.user.is_admin,
            modules = session.available.len(),
            "Module session started"
        );
        session
    }

    /// Re-fetches entitlements and recomputes the available list.
    ///
    /// A module that is open or still loading and is no longer permitted is
    /// closed; a load still in flight goes stale and its result is dropped.
    ///
    /// # Errors
    /// Returns the source's error after clearing the available list.
    #[instrument(skip_all, fields(user = %self.user.username))]
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let fetched = self.source.fetch(&self.user).await;
        let result = match fetched {
            Ok(records) => {
                self.snapshot = Arc::new(AccessSnapshot::new(&records, self.user.is_admin));
                self.available = self.resolver.available_for(&self.snapshot);
                self.last_error = None;
                debug!(modules = self.available.len(), "Entitlements refreshed");
                Ok(())
            },
            Err(err) => {
                warn!(error = %err, "Failed to fetch entitlements");
                self.snapshot = Arc::new(AccessSnapshot::empty(self.user.is_admin));
                self.available = AvailableModules::default();
                self.last_error = Some(err.to_string());
                Err(err)
            },
        };

        let state = self.machine.state();
        if (state.is_busy() || matches!(state, LoaderState::Ready(_)))
            && let Some(name) = state.selection()
            && !self.available.contains(name)
        {
            debug!(module = %name, state = state.label(), "Selected module no longer permitted");
            self.machine.reset();
        }
        result
    }

    /// Flips a module's enablement at the source, then refreshes.
    ///
    /// # Errors
    /// Returns the source's error from either step.
    pub async fn toggle(&mut self, name: &str) -> Result<(), SessionError> {
        self.source.toggle(&self.user, name).await?;
        self.refresh().await
    }

    /// Routes a navigation click.
    pub fn select(&self, name: &str) -> Selection {
        let state = self.machine.state();
        match self.presenter.select(name, &state) {
            None => Selection::Ignored,
            Some(NavigationEvent::Logout) => Selection::Logout,
            Some(NavigationEvent::Selected(name)) => {
                match self.machine.select(Some(&name), Arc::clone(&self.snapshot)) {
                    Some(pending) => Selection::Pending(pending),
                    None => Selection::Settled,
                }
            },
        }
    }

    /// Opens the user's default module, or the dashboard, whichever is
    /// available first. Stays `Idle` when neither is.
    pub fn open_default(&self) -> Option<PendingLoad> {
        let target = self
            .user
            .default_module
            .as_deref()
            .into_iter()
            .chain([DEFAULT_MODULE])
            .find(|name| self.available.contains(name));
        let Some(target) = target else {
            debug!("No default module available");
            return None;
        };
        self.machine.select(Some(target), Arc::clone(&self.snapshot))
    }

    pub fn retry(&self) -> Option<PendingLoad> {
        self.machine.retry(Arc::clone(&self.snapshot))
    }

    /// Drops the cached copy of `name` and selects it again.
    pub async fn reload(&self, name: &str) -> Option<PendingLoad> {
        self.machine.loader().invalidate(name).await;
        self.machine.select(Some(name), Arc::clone(&self.snapshot))
    }

    pub const fn toggle_collapsed(&mut self) -> bool {
        self.presenter.toggle_collapsed()
    }

    pub fn navigation(&self) -> NavigationView {
        self.presenter.render(&self.available, &self.machine.state(), &self.user)
    }

    pub fn state(&self) -> LoaderState {
        self.machine.state()
    }

    pub const fn user(&self) -> &UserIdentity {
        &self.user
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub const fn available(&self) -> &AvailableModules {
        &self.available
    }

    pub fn snapshot(&self) -> Arc<AccessSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Why the last entitlement fetch failed, until the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub const fn machine(&self) -> &LoaderStateMachine {
        &self.machine
    }

    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Ends the session: in-flight loads go stale and the module cache is dropped.
    pub async fn logout(self) {
        self.machine.reset();
        self.machine.loader().clear().await;
        info!(user = %self.user.username, "Module session ended");
    }
}
