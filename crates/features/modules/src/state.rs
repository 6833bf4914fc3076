//! Presentation lifecycle of the content area.
//!
//! ```text
//! Idle -> CheckingAccess -> Denied
//!                        -> Loading -> Ready
//!                                   -> Failed --retry--> CheckingAccess
//! ```
//!
//! Every selection takes a fresh sequence number. A load result is applied only
//! while its sequence number is still the current one; anything older is
//! computed, logged and dropped.

use crate::access::{AccessSnapshot, PermissionResolver};
use crate::error::ModuleError;
use crate::loader::{LoadedModule, ModuleLoader};
use parking_lot::Mutex;
use sailor_event_bus::EventBus;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub enum LoaderState {
    /// No module selected.
    Idle,
    CheckingAccess { name: String },
    Loading { name: String },
    Ready(Arc<LoadedModule>),
    Denied { name: String, reason: ModuleError },
    Failed { name: String, error: ModuleError },
}

impl LoaderState {
    /// The module this state is about, if any.
    pub fn selection(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::CheckingAccess { name }
            | Self::Loading { name }
            | Self::Denied { name, .. }
            | Self::Failed { name, .. } => Some(name.as_str()),
            Self::Ready(loaded) => Some(loaded.name()),
        }
    }

    /// Selection received but not settled yet.
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::CheckingAccess { .. } | Self::Loading { .. })
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CheckingAccess { .. } => "checking-access",
            Self::Loading { .. } => "loading",
            Self::Ready(_) => "ready",
            Self::Denied { .. } => "denied",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for LoaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("No module selected"),
            Self::CheckingAccess { name } => write!(f, "Checking access to {name}..."),
            Self::Loading { name } => write!(f, "Loading {name}..."),
            Self::Ready(loaded) => write!(f, "{} ready", loaded.descriptor().display_name),
            Self::Denied { reason, .. } => write!(f, "{reason}"),
            Self::Failed { error, .. } => write!(f, "{error}"),
        }
    }
}

/// Whether a finished load reached the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer selection took over while the load was in flight.
    Superseded,
}

#[derive(Debug)]
struct Current {
    seq: u64,
    state: LoaderState,
}

#[derive(Debug)]
struct MachineInner {
    loader: ModuleLoader,
    bus: EventBus,
    current: Mutex<Current>,
}

/// Drives [`LoaderState`] and mirrors every applied transition onto the
/// event bus as a watch value.
#[derive(Debug, Clone)]
pub struct LoaderStateMachine {
    inner: Arc<MachineInner>,
}

impl LoaderStateMachine {
    pub fn new(loader: ModuleLoader, bus: EventBus) -> Self {
        if let Err(err) = bus.publish_watch(LoaderState::Idle) {
            warn!(error = %err, "Loader state channel unavailable");
        }
        let current = Mutex::new(Current { seq: 0, state: LoaderState::Idle });
        Self { inner: Arc::new(MachineInner { loader, bus, current }) }
    }

    pub fn state(&self) -> LoaderState {
        self.inner.current.lock().state.clone()
    }

    /// Sequence number of the selection the current state belongs to.
    pub fn seq(&self) -> u64 {
        self.inner.current.lock().seq
    }

    pub fn loader(&self) -> &ModuleLoader {
        &self.inner.loader
    }

    /// Starts a new selection, superseding whatever was in progress.
    ///
    /// An empty or absent name goes straight to `Idle`. Unknown names end in
    /// `Failed(NotFound)`, rejected ones in `Denied`. Otherwise the machine is
    /// left in `Loading` and the returned [`PendingLoad`] must be run to settle it.
    pub fn select(
        &self,
        name: Option<&str>,
        snapshot: Arc<AccessSnapshot>,
    ) -> Option<PendingLoad> {
        let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
            let seq = self.begin();
            self.apply(seq, LoaderState::Idle);
            return None;
        };

        let seq = self.begin();
        self.apply(seq, LoaderState::CheckingAccess { name: name.to_owned() });

        let descriptor = match self.inner.loader.registry().get(name) {
            Ok(descriptor) => descriptor,
            Err(error) => {
                self.apply(seq, LoaderState::Failed { name: name.to_owned(), error });
                return None;
            },
        };

        if !PermissionResolver::permits(descriptor.meta(), &snapshot) {
            let reason = ModuleError::access_denied(name);
            self.apply(seq, LoaderState::Denied { name: name.to_owned(), reason });
            return None;
        }

        self.apply(seq, LoaderState::Loading { name: name.to_owned() });
        Some(PendingLoad { machine: self.clone(), seq, name: name.to_owned(), snapshot })
    }

    /// Re-runs a selection whose load failed. `Failed(NotFound)` and every
    /// other state are left untouched.
    pub fn retry(&self, snapshot: Arc<AccessSnapshot>) -> Option<PendingLoad> {
        let name = match &self.inner.current.lock().state {
            LoaderState::Failed { name, error } if error.is_retryable() => name.clone(),
            other => {
                debug!(state = other.label(), "Retry ignored, nothing retryable");
                return None;
            },
        };
        self.select(Some(&name), snapshot)
    }

    /// Back to `Idle`; in-flight loads become stale.
    pub fn reset(&self) {
        let seq = self.begin();
        self.apply(seq, LoaderState::Idle);
    }

    fn begin(&self) -> u64 {
        let mut current = self.inner.current.lock();
        current.seq += 1;
        current.seq
    }

    fn apply(&self, seq: u64, state: LoaderState) -> Completion {
        let mut current = self.inner.current.lock();
        if current.seq != seq {
            debug!(seq, current = current.seq, state = state.label(), "Discarding stale result");
            return Completion::Superseded;
        }

        debug!(seq, state = state.label(), module = state.selection(), "Loader state changed");
        if let Err(err) = self.inner.bus.publish_watch(state.clone()) {
            warn!(error = %err, "Failed to publish loader state");
        }
        current.state = state;
        Completion::Applied
    }
}

/// An in-flight load tagged with the selection that started it.
///
/// Dropping it without running leaves the machine in `Loading` until the next
/// selection.
#[must_use = "the machine stays in Loading until the pending load is run"]
#[derive(Debug)]
pub struct PendingLoad {
    machine: LoaderStateMachine,
    seq: u64,
    name: String,
    snapshot: Arc<AccessSnapshot>,
}

impl PendingLoad {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Awaits the loader and applies the outcome if this selection is still current.
    pub async fn run(self) -> Completion {
        let outcome = self.machine.inner.loader.load(&self.name, &self.snapshot).await;
        let state = match outcome {
            Ok(loaded) => LoaderState::Ready(loaded),
            Err(reason @ ModuleError::AccessDenied { .. }) => {
                LoaderState::Denied { name: self.name, reason }
            },
            Err(error) => LoaderState::Failed { name: self.name, error },
        };
        self.machine.apply(self.seq, state)
    }
}
