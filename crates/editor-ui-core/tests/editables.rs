use editor_ui_core::{
    ComponentError, ComponentSettings, ComponentTypes, Document, EditableId, Element,
    ElementKind, LifecycleState, Notification, PresentationEvent, SelectionRange, UiRuntime,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<(u64, EditableId)>>>;

fn runtime_with_button(log: &Log) -> UiRuntime {
    let (mut ui, _) = UiRuntime::headless();
    let log = log.clone();
    ui.define(
        "button",
        ComponentTypes::COMPONENT,
        ComponentSettings::new()
            .element(ElementKind::Button)
            .on_selection_change(move |cx, _| {
                log.lock().unwrap().push((cx.id().get(), cx.editable()));
                Ok(())
            }),
    )
    .unwrap();
    ui
}

fn caret_document() -> (Document, SelectionRange) {
    let mut doc = Document::new();
    let host = doc.create_root(Element::new("div"));
    doc.set_editing_host(host, true).unwrap();
    let p = doc.append_element(host, Element::new("p")).unwrap();
    (doc, SelectionRange::collapsed(p, 0))
}

#[test]
fn test_instances_only_see_their_editable() {
    let log: Log = Arc::default();
    let mut ui = runtime_with_button(&log);
    let (doc, caret) = caret_document();

    let e = ui.create_named_editable("left");
    let f = ui.create_named_editable("right");
    let on_e = ui.render("button", e).unwrap();
    let on_f = ui.render("button", f).unwrap();
    assert_ne!(on_e, on_f);
    assert_eq!(ui.editable_of(on_e).unwrap(), e);
    assert_eq!(ui.editable_of(on_f).unwrap(), f);

    ui.notify(e, &doc, &Notification::selection_changed(caret))
        .unwrap();
    assert_eq!(*log.lock().unwrap(), vec![(on_e.get(), e)]);

    ui.notify(f, &doc, &Notification::selection_changed(caret))
        .unwrap();
    ui.notify(f, &doc, &Notification::command_executed(Some(caret)))
        .unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec![(on_e.get(), e), (on_f.get(), f), (on_f.get(), f)]
    );
}

#[test]
fn test_render_missing_type_creates_no_instance() {
    let log: Log = Arc::default();
    let mut ui = runtime_with_button(&log);
    let e = ui.create_editable();

    let err = ui.render("missingType", e).unwrap_err();
    assert_eq!(err, ComponentError::UnknownType("missingType".to_string()));
    assert!(ui.components_of(e).unwrap().is_empty());
    assert!(ui.container_registry(e).unwrap().is_none());

    let (doc, caret) = caret_document();
    ui.notify(e, &doc, &Notification::selection_changed(caret))
        .unwrap();
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_subscribers_run_in_render_order() {
    let log: Log = Arc::default();
    let mut ui = runtime_with_button(&log);
    let (doc, caret) = caret_document();
    let e = ui.create_editable();
    let ids: Vec<_> = (0..3).map(|_| ui.render("button", e).unwrap()).collect();

    ui.notify(e, &doc, &Notification::selection_changed(caret))
        .unwrap();
    let seen: Vec<u64> = log.lock().unwrap().iter().map(|(id, _)| *id).collect();
    assert_eq!(seen, ids.iter().map(|id| id.get()).collect::<Vec<_>>());
}

#[test]
fn test_each_editable_gets_its_own_registry() {
    let (mut ui, _) = UiRuntime::headless();
    ui.define(
        "table-tab",
        ComponentTypes::CONTAINER,
        ComponentSettings::new().show_on("table"),
    )
    .unwrap();

    let mut doc = Document::new();
    let host = doc.create_root(Element::new("div"));
    doc.set_editing_host(host, true).unwrap();
    let table = doc.append_element(host, Element::new("table")).unwrap();
    let p = doc.append_element(host, Element::new("p")).unwrap();

    let e = ui.create_editable();
    let f = ui.create_editable();
    let tab_e = ui.render("table-tab", e).unwrap();
    let tab_f = ui.render("table-tab", f).unwrap();

    ui.notify(e, &doc, &Notification::selection_changed(SelectionRange::collapsed(p, 0)))
        .unwrap();
    ui.notify(f, &doc, &Notification::selection_changed(SelectionRange::collapsed(table, 0)))
        .unwrap();

    assert!(!ui.is_visible(tab_e).unwrap());
    assert!(ui.is_visible(tab_f).unwrap());
    assert_eq!(ui.container_registry(e).unwrap().unwrap().container_count(), 1);
    assert_eq!(ui.container_registry(f).unwrap().unwrap().container_count(), 1);
}

#[test]
fn test_editable_teardown() {
    let (mut ui, journal) = UiRuntime::headless();
    ui.define("tab", ComponentTypes::CONTAINER, ComponentSettings::new())
        .unwrap();
    ui.define("button", ComponentTypes::COMPONENT, ComponentSettings::new())
        .unwrap();

    let e = ui.create_editable();
    let tab = ui.render("tab", e).unwrap();
    let button = ui.render("button", e).unwrap();
    assert_eq!(ui.destroy_editable(e).unwrap(), 2);

    assert_eq!(ui.lifecycle(tab), Some(LifecycleState::Destroyed));
    assert_eq!(ui.lifecycle(button), Some(LifecycleState::Destroyed));
    assert_eq!(
        ui.render("tab", e).unwrap_err(),
        ComponentError::EditableNotFound(e)
    );
    let (doc, caret) = caret_document();
    assert_eq!(
        ui.notify(e, &doc, &Notification::selection_changed(caret))
            .unwrap_err(),
        ComponentError::EditableNotFound(e)
    );

    let removed: Vec<_> = journal
        .events()
        .into_iter()
        .filter(|event| matches!(event, PresentationEvent::Removed(_)))
        .collect();
    assert_eq!(
        removed,
        vec![PresentationEvent::Removed(tab), PresentationEvent::Removed(button)]
    );
}
