use crate::TOGGLE_BUTTON;
use editor_ui_core::{
    ComponentCx, ComponentError, ComponentSettings, ComponentType, HookError, SelectionEvent,
    Selector, SelectorError, UiRuntime,
};
use std::sync::Arc;

/// Define a toggle button named `name`.
///
/// On every notification delivered to its editable, `is_active` is evaluated against the
/// notification and the result becomes the button's active state. The presentation is only told
/// when the state actually flips.
pub fn define_toggle_button<Q, F>(
    ui: &mut UiRuntime,
    name: &str,
    settings: ComponentSettings,
    is_active: Q,
    on_click: F,
) -> Result<Arc<ComponentType>, ComponentError>
where
    Q: Fn(&SelectionEvent<'_>) -> bool + Send + Sync + 'static,
    F: Fn(&mut ComponentCx<'_>) -> Result<(), HookError> + Send + Sync + 'static,
{
    let settings = settings
        .on_selection_change(move |cx, event| {
            cx.set_active(is_active(event));
            Ok(())
        })
        .on_click(on_click);
    ui.define(name, TOGGLE_BUTTON, settings)
}

/// Active-state query: true when any node of the selection's ancestor chain matches `rule`.
///
/// Combinators in `rule` are checked against the chain above each node.
pub fn inside(
    rule: &str,
) -> Result<impl Fn(&SelectionEvent<'_>) -> bool + Send + Sync + 'static, SelectorError> {
    let selector = Selector::parse(rule)?;
    Ok(move |event: &SelectionEvent<'_>| {
        event
            .chain
            .contexts()
            .any(|(node, ancestors)| node.is_some_and(|n| selector.matches_in(n, ancestors)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_ui_core::{Document, Element, Notification, PresentationEvent, SelectionRange};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_active_state_follows_selection() {
        let (mut ui, journal) = UiRuntime::headless();
        crate::install(&mut ui).unwrap();
        define_toggle_button(
            &mut ui,
            "bold",
            ComponentSettings::new().label("Bold"),
            inside("b,strong").unwrap(),
            |_| Ok(()),
        )
        .unwrap();

        let mut doc = Document::new();
        let host = doc.create_root(Element::new("div"));
        doc.set_editing_host(host, true).unwrap();
        let p = doc.append_element(host, Element::new("p")).unwrap();
        let strong = doc.append_element(p, Element::new("strong")).unwrap();
        let text = doc.append_text(strong, "loud").unwrap();

        let e = ui.create_editable();
        let bold = ui.render("bold", e).unwrap();
        assert!(!ui.is_active(bold).unwrap());

        let in_strong = Notification::selection_changed(SelectionRange::collapsed(text, 1));
        let in_p = Notification::selection_changed(SelectionRange::collapsed(p, 0));
        ui.notify(e, &doc, &in_strong).unwrap();
        ui.notify(e, &doc, &in_strong).unwrap();
        assert!(ui.is_active(bold).unwrap());
        ui.notify(e, &doc, &in_p).unwrap();
        assert!(!ui.is_active(bold).unwrap());

        let toggles: Vec<_> = journal
            .events_for(bold)
            .into_iter()
            .filter(|event| matches!(event, PresentationEvent::Active(..)))
            .collect();
        assert_eq!(
            toggles,
            vec![
                PresentationEvent::Active(bold, true),
                PresentationEvent::Active(bold, false),
            ]
        );
    }

    #[test]
    fn test_inside_with_descendant_rule() {
        let (mut ui, _) = UiRuntime::headless();
        crate::install(&mut ui).unwrap();
        define_toggle_button(
            &mut ui,
            "cell-bold",
            ComponentSettings::new(),
            inside("td strong").unwrap(),
            |_| Ok(()),
        )
        .unwrap();

        let mut doc = Document::new();
        let host = doc.create_root(Element::new("div"));
        doc.set_editing_host(host, true).unwrap();
        let table = doc.append_element(host, Element::new("table")).unwrap();
        let td = doc.append_element(table, Element::new("td")).unwrap();
        let cell_strong = doc.append_element(td, Element::new("strong")).unwrap();
        let cell_text = doc.append_text(cell_strong, "total").unwrap();
        let p = doc.append_element(host, Element::new("p")).unwrap();
        let strong = doc.append_element(p, Element::new("strong")).unwrap();
        let text = doc.append_text(strong, "loud").unwrap();

        let e = ui.create_editable();
        let button = ui.render("cell-bold", e).unwrap();
        let caret = |node| Notification::selection_changed(SelectionRange::collapsed(node, 0));
        ui.notify(e, &doc, &caret(cell_text)).unwrap();
        assert!(ui.is_active(button).unwrap());
        ui.notify(e, &doc, &caret(text)).unwrap();
        assert!(!ui.is_active(button).unwrap());
    }

    #[test]
    fn test_inside_rejects_invalid_rule() {
        assert_eq!(
            inside("p + strong").err(),
            Some(SelectorError::UnsupportedCombinator("p + strong".to_string()))
        );
        assert!(inside("strong!").is_err());
    }
}
