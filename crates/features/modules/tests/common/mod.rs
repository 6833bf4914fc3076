#![allow(dead_code)]

use sailor_modules::{
    FactoryError, ModuleComponent, ModuleExports, ModuleFactory, ModuleMeta, ModuleRegistry,
    ModuleView, UserIdentity,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Debug)]
pub struct Page(pub &'static str);

impl ModuleComponent for Page {
    fn render(&self, _user: &UserIdentity) -> ModuleView {
        ModuleView::new(self.0)
    }
}

/// Shared factory invocation counter.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn counted(title: &'static str, calls: &Calls) -> impl ModuleFactory {
    let calls = calls.clone();
    move || {
        let calls = calls.clone();
        async move {
            calls.hit();
            Ok::<_, FactoryError>(ModuleExports::component(Page(title)))
        }
    }
}

/// Blocks inside the factory until `gate` is notified.
pub fn gated(title: &'static str, calls: &Calls, gate: &Arc<Notify>) -> impl ModuleFactory {
    let calls = calls.clone();
    let gate = Arc::clone(gate);
    move || {
        let calls = calls.clone();
        let gate = Arc::clone(&gate);
        async move {
            calls.hit();
            gate.notified().await;
            Ok::<_, FactoryError>(ModuleExports::component(Page(title)))
        }
    }
}

/// Fails on the first `failures` invocations, then succeeds.
pub fn flaky(title: &'static str, calls: &Calls, failures: usize) -> impl ModuleFactory {
    let calls = calls.clone();
    move || {
        let calls = calls.clone();
        async move {
            calls.hit();
            if calls.count() <= failures {
                return Err(FactoryError::failed("bundle unavailable"));
            }
            Ok(ModuleExports::component(Page(title)))
        }
    }
}

/// `dashboard`, `boats` and an admin-only `admin`, each counting its invocations.
pub fn fleet(calls: &Calls) -> ModuleRegistry {
    ModuleRegistry::builder()
        .register(ModuleMeta::new("dashboard", "Dashboard"), counted("Dashboard", calls))
        .register(ModuleMeta::new("boats", "Fleet Management"), counted("Fleet", calls))
        .register(ModuleMeta::new("admin", "Admin Panel").admin_only(), counted("Admin", calls))
        .build()
        .unwrap()
}
