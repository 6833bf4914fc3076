//! Module access for the sailor shell.
//!
//! A static [`ModuleRegistry`] declares every module with a lazy factory. The
//! [`PermissionResolver`] filters it by role and per-user entitlements, the
//! [`ModuleLoader`] materializes permitted modules at most once per session,
//! and the [`LoaderStateMachine`] tracks what the content area shows while
//! discarding results of superseded selections.
//!
//! ```no_run
//! use sailor_domain::config::ShellConfig;
//! use sailor_domain::identity::UserIdentity;
//! use sailor_event_bus::EventBus;
//! use sailor_modules::{ModuleRegistry, ModuleSession, Selection, StaticEntitlements};
//!
//! # async fn run() {
//! let source = StaticEntitlements::all_enabled(["dashboard", "boats"]);
//! let session = ModuleSession::start(
//!     UserIdentity::new("skipper"),
//!     source,
//!     ModuleRegistry::builtin(),
//!     &ShellConfig::default(),
//!     EventBus::new(),
//! )
//! .await;
//!
//! if let Selection::Pending(load) = session.select("boats") {
//!     load.run().await;
//! }
//! println!("{}", session.state());
//! # }
//! ```

mod access;
mod catalog;
mod component;
mod error;
mod loader;
mod navigation;
mod registry;
mod session;
mod state;

pub use access::{AccessSnapshot, AvailableModules, PermissionResolver};
pub use component::{ModuleComponent, ModuleExports, ModuleView, ViewSection};
pub use error::{
    FactoryError, FactoryErrorExt, ModuleError, ModuleErrorExt, SessionError, SessionErrorExt,
};
pub use loader::{LoadedModule, ModuleLoader};
pub use navigation::{
    LOGOUT_GLYPH, LOGOUT_LABEL, NavigationEvent, NavigationHeader, NavigationItem,
    NavigationPresenter, NavigationView, glyph_for,
};
pub use registry::{
    FactoryFuture, ModuleDescriptor, ModuleFactory, ModuleRegistry, ModuleRegistryBuilder,
};
pub use session::{
    EntitlementSource, JsonFileEntitlements, ModuleSession, Selection, StaticEntitlements,
};
pub use state::{Completion, LoaderState, LoaderStateMachine, PendingLoad};

pub use sailor_domain::identity::UserIdentity;
pub use sailor_domain::module::{EntitlementDocument, EntitlementRecord, ModuleFlags, ModuleMeta};
