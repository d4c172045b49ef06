use crate::BUTTON;
use editor_ui_core::{ComponentCx, ComponentError, ComponentSettings, ComponentType, HookError, UiRuntime};
use std::sync::Arc;

/// Define a push button named `name`.
///
/// `settings` carries the presentation (label, icon, tooltip); `on_click` runs each time the
/// button is clicked through [`UiRuntime::click`].
pub fn define_button<F>(
    ui: &mut UiRuntime,
    name: &str,
    settings: ComponentSettings,
    on_click: F,
) -> Result<Arc<ComponentType>, ComponentError>
where
    F: Fn(&mut ComponentCx<'_>) -> Result<(), HookError> + Send + Sync + 'static,
{
    ui.define(name, BUTTON, settings.on_click(on_click))
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_ui_core::{ElementKind, PresentationEvent};
    use std::sync::Mutex;

    #[test]
    fn test_button_click_runs_action() {
        let (mut ui, journal) = UiRuntime::headless();
        crate::install(&mut ui).unwrap();

        let clicks = Arc::new(Mutex::new(Vec::new()));
        let log = clicks.clone();
        define_button(
            &mut ui,
            "hr",
            ComponentSettings::new().label("Horizontal rule").tooltip("Insert a rule"),
            move |cx| {
                log.lock().unwrap().push(cx.id());
                Ok(())
            },
        )
        .unwrap();

        let e = ui.create_editable();
        let hr = ui.render("hr", e).unwrap();
        ui.click(hr).unwrap();
        ui.click(hr).unwrap();

        assert_eq!(*clicks.lock().unwrap(), vec![hr, hr]);
        assert_eq!(
            journal.events_for(hr),
            vec![PresentationEvent::Created {
                component: hr,
                element: ElementKind::Button,
                label: Some("Horizontal rule".to_string()),
            }]
        );
    }

    #[test]
    fn test_same_button_in_two_editables() {
        let (mut ui, _) = UiRuntime::headless();
        crate::install(&mut ui).unwrap();
        define_button(&mut ui, "undo", ComponentSettings::new(), |cx| {
            if cx.is_visible() {
                Ok(())
            } else {
                Err("hidden".into())
            }
        })
        .unwrap();

        let toolbar = ui.create_editable();
        let sidebar = ui.create_editable();
        let a = ui.render("undo", toolbar).unwrap();
        let b = ui.render("undo", sidebar).unwrap();
        ui.hide(b).unwrap();

        assert!(ui.click(a).is_ok());
        assert!(ui.click(b).is_err());
    }
}
