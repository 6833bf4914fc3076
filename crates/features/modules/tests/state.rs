mod common;

use common::{Calls, counted, fleet, flaky, gated};
use sailor_event_bus::EventBus;
use sailor_modules::{
    AccessSnapshot, Completion, EntitlementRecord, LoaderState, LoaderStateMachine, ModuleError,
    ModuleLoader, ModuleMeta, ModuleRegistry, NavigationEvent, NavigationPresenter,
    PermissionResolver, UserIdentity,
};
use std::sync::Arc;
use tokio::sync::Notify;

fn snapshot(names: &[&str], is_admin: bool) -> Arc<AccessSnapshot> {
    let records: Vec<_> = names.iter().copied().map(EntitlementRecord::enabled).collect();
    Arc::new(AccessSnapshot::new(&records, is_admin))
}

fn machine(registry: ModuleRegistry) -> (LoaderStateMachine, EventBus) {
    let bus = EventBus::new();
    (LoaderStateMachine::new(ModuleLoader::new(registry), bus.clone()), bus)
}

#[tokio::test]
async fn stale_result_never_overwrites_newer_selection() {
    let calls = Calls::default();
    let gate = Arc::new(Notify::new());
    let registry = ModuleRegistry::builder()
        .register(ModuleMeta::new("x", "Slow X"), gated("X", &calls, &gate))
        .register(ModuleMeta::new("y", "Fast Y"), counted("Y", &calls))
        .build()
        .unwrap();
    let (machine, _bus) = machine(registry);
    let access = snapshot(&["x", "y"], false);

    let pending_x = machine.select(Some("x"), Arc::clone(&access)).unwrap();
    let slow = tokio::spawn(pending_x.run());

    let pending_y = machine.select(Some("y"), Arc::clone(&access)).unwrap();
    assert!(pending_y.seq() > 1);
    assert_eq!(pending_y.run().await, Completion::Applied);

    gate.notify_one();
    assert_eq!(slow.await.unwrap(), Completion::Superseded);

    let LoaderState::Ready(loaded) = machine.state() else {
        panic!("expected y to be ready, got {}", machine.state());
    };
    assert_eq!(loaded.name(), "y");
    assert_eq!(machine.seq(), 2);
}

#[tokio::test]
async fn empty_selection_goes_idle() {
    let (machine, _bus) = machine(fleet(&Calls::default()));
    let access = snapshot(&["boats"], false);

    let pending = machine.select(Some("boats"), Arc::clone(&access)).unwrap();
    assert!(matches!(machine.state(), LoaderState::Loading { .. }));

    assert!(machine.select(Some("  "), Arc::clone(&access)).is_none());
    assert!(matches!(machine.state(), LoaderState::Idle));
    assert_eq!(machine.state().to_string(), "No module selected");

    assert_eq!(pending.run().await, Completion::Superseded);
    assert!(matches!(machine.state(), LoaderState::Idle));
    assert!(machine.select(None, access).is_none());
}

#[tokio::test]
async fn unknown_and_forbidden_selections_settle_without_loading() {
    let calls = Calls::default();
    let (machine, _bus) = machine(fleet(&calls));
    let access = snapshot(&["dashboard", "admin"], false);

    assert!(machine.select(Some("ghost"), Arc::clone(&access)).is_none());
    let LoaderState::Failed { error, .. } = machine.state() else {
        panic!("expected a failed state");
    };
    assert!(matches!(error, ModuleError::NotFound { .. }));

    assert!(machine.select(Some("admin"), Arc::clone(&access)).is_none());
    let LoaderState::Denied { name, reason } = machine.state() else {
        panic!("expected a denied state");
    };
    assert_eq!(name, "admin");
    assert!(reason.to_string().starts_with("Access denied to this module"));
    assert_eq!(calls.count(), 0);
}

#[tokio::test]
async fn retry_is_only_offered_after_a_failure() {
    let calls = Calls::default();
    let registry = ModuleRegistry::builder()
        .register(ModuleMeta::new("flaky", "Flaky"), flaky("Flaky", &calls, 1))
        .build()
        .unwrap();
    let (machine, _bus) = machine(registry);
    let access = snapshot(&["flaky"], false);

    assert!(machine.retry(Arc::clone(&access)).is_none());

    let first = machine.select(Some("flaky"), Arc::clone(&access)).unwrap();
    assert_eq!(first.run().await, Completion::Applied);
    let LoaderState::Failed { error, .. } = machine.state() else {
        panic!("expected a failed state");
    };
    assert!(error.is_retryable());

    let retry = machine.retry(Arc::clone(&access)).unwrap();
    assert_eq!(retry.name(), "flaky");
    assert_eq!(retry.run().await, Completion::Applied);
    assert!(matches!(machine.state(), LoaderState::Ready(_)));
    assert_eq!(calls.count(), 2);

    assert!(machine.retry(access).is_none());
}

#[tokio::test]
async fn unknown_module_failure_is_not_retried() {
    let calls = Calls::default();
    let (machine, _bus) = machine(fleet(&calls));
    let access = snapshot(&["boats"], false);

    assert!(machine.select(Some("ghost"), Arc::clone(&access)).is_none());
    let seq = machine.seq();
    let LoaderState::Failed { error, .. } = machine.state() else {
        panic!("expected a failed state");
    };
    assert!(matches!(error, ModuleError::NotFound { .. }));

    assert!(machine.retry(access).is_none());
    assert_eq!(machine.seq(), seq);
    assert_eq!(machine.state().selection(), Some("ghost"));
    assert_eq!(machine.state().label(), "failed");
    assert_eq!(calls.count(), 0);
}

#[tokio::test]
async fn applied_transitions_are_mirrored_on_the_bus() {
    let (machine, bus) = machine(fleet(&Calls::default()));
    let mut states = bus.subscribe_watch(LoaderState::Idle).unwrap();

    let pending = machine.select(Some("boats"), snapshot(&["boats"], false)).unwrap();
    assert_eq!(states.borrow_and_update().label(), "loading");

    pending.run().await;
    assert!(states.has_changed().unwrap());
    assert_eq!(states.borrow_and_update().label(), "ready");
    assert_eq!(bus.latest::<LoaderState>().unwrap().selection(), Some("boats"));

    machine.reset();
    assert_eq!(states.borrow_and_update().label(), "idle");
}

#[tokio::test]
async fn logout_never_enters_checking_access() {
    let (machine, bus) = machine(fleet(&Calls::default()));
    let presenter = NavigationPresenter::new(bus.clone());
    let mut events = bus.subscribe::<NavigationEvent>().unwrap();
    let mut states = bus.subscribe_watch(LoaderState::Idle).unwrap();

    let pending = machine.select(Some("boats"), snapshot(&["boats"], false)).unwrap();
    states.mark_unchanged();
    let seq = machine.seq();

    assert_eq!(presenter.select("logout", &machine.state()), Some(NavigationEvent::Logout));
    assert_eq!(*events.recv().await.unwrap(), NavigationEvent::Logout);
    assert_eq!(machine.seq(), seq);
    assert!(!states.has_changed().unwrap());

    pending.run().await;
    assert!(matches!(machine.state(), LoaderState::Ready(_)));
}

#[tokio::test]
async fn busy_module_cannot_be_reselected_but_others_can() {
    let (machine, bus) = machine(fleet(&Calls::default()));
    let presenter = NavigationPresenter::new(bus);
    let access = snapshot(&["boats", "dashboard"], false);
    let available =
        PermissionResolver::new(machine.loader().registry().clone()).available_for(&access);

    let _pending = machine.select(Some("boats"), Arc::clone(&access)).unwrap();
    let state = machine.state();

    let view = presenter.render(&available, &state, &UserIdentity::new("skipper"));
    let boats = view.item("boats").unwrap();
    assert!(boats.active && boats.loading && boats.disabled);
    assert!(!view.item("dashboard").unwrap().disabled);

    assert_eq!(presenter.select("boats", &state), None);
    assert_eq!(
        presenter.select("dashboard", &state),
        Some(NavigationEvent::Selected("dashboard".to_owned()))
    );
}
