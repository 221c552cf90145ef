use std::rc::Rc;

use viewbind_api_core::PropertyValue;
use viewbind_bridge::runtime::InstanceRef;
use viewbind_bridge::{
    BindingOptions, Config, Diagnostics, DiagnosticsCfg, EnumBinding, ListBinding,
    MutationOutcome, NumberBinding, ReadinessQueue, RuntimeController, RuntimeError,
    RuntimeOptions, StringBinding,
};
use viewbind_test_fixtures::{view_models, Journal, MockInstance};

fn profile() -> (Rc<viewbind_test_fixtures::MockRuntime>, Rc<MockInstance>, InstanceRef) {
    let runtime = view_models::runtime("profile").expect("profile fixture");
    let mock = runtime.default_mock_instance().expect("default instance");
    let instance: InstanceRef = mock.clone();
    (runtime, mock, instance)
}

#[test]
fn write_before_load_lands_once_after_ready() {
    let (runtime, mock, instance) = profile();
    let controller = RuntimeController::new(Config::default(), RuntimeOptions::default());
    controller.attach(runtime.clone());

    // the instance arrives after the write
    let name = StringBinding::new(controller.binding_options());
    name.set_path(Some("user/name"));
    assert_eq!(name.set_value("Alice"), MutationOutcome::Queued);
    name.set_instance(Some(&instance));
    assert_eq!(name.value().as_deref(), Some("Ada"));

    let prop = mock.property("user/name").expect("user/name");
    assert_eq!(prop.current(), PropertyValue::String("Ada".into()));
    assert_eq!(prop.stats().writes, 0);

    runtime.emit_load();

    assert_eq!(prop.current(), PropertyValue::String("Alice".into()));
    assert_eq!(prop.stats().writes, 1);
    assert_eq!(name.value().as_deref(), Some("Alice"));

    // a second load event does not replay anything
    runtime.emit_load();
    assert_eq!(prop.stats().writes, 1);
}

#[test]
fn enum_mirrors_value_and_legal_members() {
    let instance = MockInstance::empty("e", Journal::default());
    instance.insert_enum(
        "mode",
        PropertyValue::Enum("B".into()),
        vec!["A".into(), "B".into(), "C".into()],
    );
    let instance: InstanceRef = instance;

    let mode = EnumBinding::new(BindingOptions::new());
    mode.bind(Some(&instance), Some("mode"));

    assert_eq!(mode.values(), vec!["A", "B", "C"]);
    assert_eq!(mode.value().as_deref(), Some("B"));
    assert_eq!(mode.snapshot(), Some(PropertyValue::Enum("B".into())));
}

#[test]
fn path_switch_unsubscribes_before_subscribing() {
    let journal = Journal::default();
    let mock = MockInstance::empty("n", journal.clone());
    let a = mock.insert("a", PropertyValue::Number(1.0));
    let b = mock.insert("b", PropertyValue::Number(2.0));
    let instance: InstanceRef = mock;

    let number = NumberBinding::new(BindingOptions::new());
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = seen.clone();
    number.subscribe(move |s| sink.borrow_mut().push(s.value));

    number.bind(Some(&instance), Some("a"));
    number.set_path(Some("b"));

    assert_eq!(journal.listener_lines(), vec!["a: on", "a: off", "b: on"]);
    assert_eq!(a.stats().active_listeners, 0);
    assert_eq!(b.stats().active_listeners, 1);
    assert_eq!(*seen.borrow(), vec![Some(1.0), Some(2.0)]);
    assert_eq!(number.value(), Some(2.0));
}

#[test]
fn failing_cached_handle_falls_back_to_fresh_resolution() {
    let (_runtime, mock, instance) = profile();
    let failures = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = failures.clone();
    let diagnostics =
        Diagnostics::new(DiagnosticsCfg::default()).with_hook(move |f| sink.borrow_mut().push(f.clone()));

    let age = NumberBinding::new(BindingOptions::new().with_diagnostics(diagnostics));
    age.bind(Some(&instance), Some("user/age"));

    let old = mock.property("user/age").expect("user/age");
    let fresh = mock.hot_reload("user/age").expect("reloaded");

    assert_eq!(age.set_value(40.0), MutationOutcome::Applied);

    assert_eq!(fresh.current(), PropertyValue::Number(40.0));
    assert_eq!(old.stats().writes, 0);
    assert_eq!(old.stats().active_listeners, 0);
    assert_eq!(fresh.stats().active_listeners, 1);
    assert_eq!(age.value(), Some(40.0));

    let failures = failures.borrow();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].error, RuntimeError::StaleHandle);

    // the subscription now follows the fresh handle
    fresh.set_native(PropertyValue::Number(41.0));
    assert_eq!(age.value(), Some(41.0));
}

#[test]
fn one_shot_failure_retries_on_the_same_handle() {
    let (_runtime, mock, instance) = profile();
    let age = NumberBinding::new(BindingOptions::new());
    age.bind(Some(&instance), Some("user/age"));

    let prop = mock.property("user/age").expect("user/age");
    prop.fail_next(RuntimeError::Native("flaky".into()));

    assert_eq!(age.set_value(50.0), MutationOutcome::Applied);
    assert_eq!(prop.current(), PropertyValue::Number(50.0));
    assert_eq!(prop.stats().on_calls, 1, "no resubscription for the same handle");
}

#[test]
fn list_revision_counts_native_events() {
    let runtime = view_models::runtime("todo").expect("todo fixture");
    let instance: InstanceRef = runtime.default_mock_instance().expect("main");
    let vm = runtime.view_model("Todo").expect("Todo view model");
    let extra: InstanceRef = viewbind_bridge::runtime::ViewModel::new_instance(&*vm).expect("item");

    let queue = ReadinessQueue::new();
    queue.flush();
    let items = ListBinding::new(BindingOptions::new().with_scheduler(queue));
    items.bind(Some(&instance), Some("items"));
    assert_eq!(items.length(), Some(2));

    assert!(items.add_instance_at(&extra, 0));
    assert_eq!(items.swap(0, 1), MutationOutcome::Applied);

    assert_eq!(
        runtime.journal().lines(),
        vec!["items: add Todo#1 at 0", "items: swap 0 1"]
    );
    assert_eq!(items.length(), Some(3));
    assert_eq!(items.revision(), 2);
    let second = items.instance_at(1).expect("element 1");
    assert_eq!(second.name(), "Todo#1");

    // removing a non-member produces no native event
    let stranger: InstanceRef = MockInstance::empty("stranger", Journal::default());
    assert_eq!(items.remove_instance(&stranger), MutationOutcome::Applied);
    assert_eq!(items.revision(), 2);
}
