//! Component type definitions.
//!
//! A component type is pure data: a role, an element kind, presentation settings and optional
//! hooks. New types are composed from an existing one with [`ComponentTypes::define`], which merges
//! override [`ComponentSettings`] over the base's settings. No instances are created here; see
//! [`UiRuntime::render`](crate::UiRuntime::render).
//!
//! Two root bases always exist and cannot be redefined:
//!
//! - [`ComponentTypes::COMPONENT`]: a plain widget
//! - [`ComponentTypes::CONTAINER`]: a container, whose visibility follows its `show_on` rule
//!
//! Hook merge rules: `init` hooks compose (the base's runs first, then the override's), while
//! `selection_change` and `click` hooks replace the base's.

use crate::dom::SelectionRange;
use crate::dom::AncestorChain;
use crate::error::ComponentError;
use crate::presentation::PresentationHandle;
use crate::runtime::{ComponentId, EditableId};
use crate::show_on::{EventType, ShowOn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Whether instances of a type take part in selection-driven visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentRole {
    /// A leaf widget; visibility changes only through explicit `show` / `hide`.
    Widget,
    /// A container, registered in its editable's container registry.
    Container,
}

/// Kind of element a toolkit should create for a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A generic wrapper element.
    Generic,
    /// A grouping element (toolbar tab, panel, sidebar section).
    Container,
    /// A push button.
    Button,
    /// A visual separator.
    Separator,
    /// A toolkit-specific element.
    Custom(String),
}

/// Error type returned by hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Hook run once when an instance is initialized.
pub type InitHook = Arc<dyn Fn(&mut ComponentCx<'_>) + Send + Sync>;

/// Hook run for every notification delivered to an instance.
pub type SelectionHook =
    Arc<dyn Fn(&mut ComponentCx<'_>, &SelectionEvent<'_>) -> Result<(), HookError> + Send + Sync>;

/// Hook run when an instance is clicked.
pub type ClickHook = Arc<dyn Fn(&mut ComponentCx<'_>) -> Result<(), HookError> + Send + Sync>;

/// Settings of a component type; also used as the override set in [`ComponentTypes::define`].
///
/// `None` means "inherit from the base".
#[derive(Clone, Default)]
pub struct ComponentSettings {
    /// Text label.
    pub label: Option<String>,
    /// Icon name.
    pub icon: Option<String>,
    /// Render only the icon.
    pub icon_only: Option<bool>,
    /// Tooltip text.
    pub tooltip: Option<String>,
    /// Element kind to request from the toolkit.
    pub element: Option<ElementKind>,
    /// Visibility rule (containers only).
    pub show_on: Option<ShowOn>,
    /// Initialization hook.
    pub init: Option<InitHook>,
    /// Notification hook.
    pub selection_change: Option<SelectionHook>,
    /// Click hook.
    pub click: Option<ClickHook>,
}

impl ComponentSettings {
    /// Create an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set whether only the icon is rendered.
    pub fn icon_only(mut self, icon_only: bool) -> Self {
        self.icon_only = Some(icon_only);
        self
    }

    /// Set the tooltip.
    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Set the element kind.
    pub fn element(mut self, element: ElementKind) -> Self {
        self.element = Some(element);
        self
    }

    /// Set the visibility rule.
    pub fn show_on(mut self, show_on: impl Into<ShowOn>) -> Self {
        self.show_on = Some(show_on.into());
        self
    }

    /// Set the initialization hook.
    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ComponentCx<'_>) + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(hook));
        self
    }

    /// Set the notification hook.
    pub fn on_selection_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ComponentCx<'_>, &SelectionEvent<'_>) -> Result<(), HookError>
            + Send
            + Sync
            + 'static,
    {
        self.selection_change = Some(Arc::new(hook));
        self
    }

    /// Set the click hook.
    pub fn on_click<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ComponentCx<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.click = Some(Arc::new(hook));
        self
    }

    /// Merge `self` (overrides) over `base`.
    pub fn merged_over(self, base: &ComponentSettings) -> ComponentSettings {
        let init = match (base.init.clone(), self.init) {
            (Some(first), Some(then)) => {
                let chained: InitHook = Arc::new(move |cx: &mut ComponentCx<'_>| {
                    first(cx);
                    then(cx);
                });
                Some(chained)
            }
            (first, then) => then.or(first),
        };

        ComponentSettings {
            label: self.label.or_else(|| base.label.clone()),
            icon: self.icon.or_else(|| base.icon.clone()),
            icon_only: self.icon_only.or(base.icon_only),
            tooltip: self.tooltip.or_else(|| base.tooltip.clone()),
            element: self.element.or_else(|| base.element.clone()),
            show_on: self.show_on.or_else(|| base.show_on.clone()),
            init,
            selection_change: self
                .selection_change
                .or_else(|| base.selection_change.clone()),
            click: self.click.or_else(|| base.click.clone()),
        }
    }
}

impl fmt::Debug for ComponentSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentSettings")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("icon_only", &self.icon_only)
            .field("tooltip", &self.tooltip)
            .field("element", &self.element)
            .field("show_on", &self.show_on)
            .field("init", &self.init.is_some())
            .field("selection_change", &self.selection_change.is_some())
            .field("click", &self.click.is_some())
            .finish()
    }
}

/// A named, fully merged component type.
#[derive(Debug, Clone)]
pub struct ComponentType {
    name: String,
    base: String,
    role: ComponentRole,
    settings: ComponentSettings,
}

impl ComponentType {
    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the type this one was derived from.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Role inherited from the root base.
    pub fn role(&self) -> ComponentRole {
        self.role
    }

    /// Merged settings.
    pub fn settings(&self) -> &ComponentSettings {
        &self.settings
    }

    /// The effective element kind.
    pub fn element(&self) -> ElementKind {
        self.settings.element.clone().unwrap_or(match self.role {
            ComponentRole::Widget => ElementKind::Generic,
            ComponentRole::Container => ElementKind::Container,
        })
    }
}

/// The registry of component type definitions.
///
/// Filled by explicit [`define`](Self::define) calls at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct ComponentTypes {
    types: HashMap<String, Arc<ComponentType>>,
}

impl ComponentTypes {
    /// Root base for widgets.
    pub const COMPONENT: &'static str = "component";
    /// Root base for containers.
    pub const CONTAINER: &'static str = "container";

    /// Create an empty registry (only the root bases are known).
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name` as `base` extended with `settings`.
    ///
    /// Fails if `name` is already defined (or is a root base name), or if `base` is unknown.
    pub fn define(
        &mut self,
        name: &str,
        base: &str,
        settings: ComponentSettings,
    ) -> Result<Arc<ComponentType>, ComponentError> {
        if Self::is_root(name) || self.types.contains_key(name) {
            return Err(ComponentError::AlreadyDefined(name.to_string()));
        }

        let (role, merged) = match base {
            Self::COMPONENT => (ComponentRole::Widget, settings),
            Self::CONTAINER => (ComponentRole::Container, settings),
            _ => {
                let parent = self
                    .types
                    .get(base)
                    .ok_or_else(|| ComponentError::UnknownBase {
                        name: name.to_string(),
                        base: base.to_string(),
                    })?;
                (parent.role, settings.merged_over(&parent.settings))
            }
        };

        if role == ComponentRole::Widget && merged.show_on.is_some() {
            tracing::debug!("component type {name:?} is not a container; its show_on is ignored");
        }

        let ty = Arc::new(ComponentType {
            name: name.to_string(),
            base: base.to_string(),
            role,
            settings: merged,
        });
        self.types.insert(name.to_string(), ty.clone());
        tracing::debug!(name, base, ?role, "defined component type");
        Ok(ty)
    }

    /// Look up a type by name.
    pub fn get(&self, name: &str) -> Option<Arc<ComponentType>> {
        self.types.get(name).cloned()
    }

    /// Returns `true` if `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of defined types (root bases excluded).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type has been defined.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Defined type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    fn is_root(name: &str) -> bool {
        name == Self::COMPONENT || name == Self::CONTAINER
    }
}

/// A notification as seen by a component's `selection_change` hook.
#[derive(Debug, Clone, Copy)]
pub struct SelectionEvent<'a> {
    /// What triggered the notification.
    pub event_type: &'a EventType,
    /// The selection, if the notification carried one.
    pub range: Option<&'a SelectionRange>,
    /// Ancestor chain of the selection start (sentinel only when there is no range).
    pub chain: &'a AncestorChain<'a>,
}

/// Where an instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Created and subscribed, `init` not yet run.
    Constructed,
    /// Initialized and visible.
    Visible,
    /// Initialized and hidden.
    Hidden,
    /// Torn down with its editable.
    Destroyed,
}

/// Per-instance state owned by the runtime.
pub(crate) struct InstanceState {
    pub(crate) ty: Arc<ComponentType>,
    pub(crate) initialized: bool,
    pub(crate) visible: bool,
    pub(crate) active: bool,
    pub(crate) presentation: Option<Box<dyn PresentationHandle>>,
}

impl InstanceState {
    pub(crate) fn new(ty: Arc<ComponentType>) -> Self {
        Self {
            ty,
            initialized: false,
            visible: true,
            active: false,
            presentation: None,
        }
    }

    pub(crate) fn show(&mut self) {
        if !self.visible
            && let Some(presentation) = self.presentation.as_mut()
        {
            presentation.show();
        }
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        if self.visible
            && let Some(presentation) = self.presentation.as_mut()
        {
            presentation.hide();
        }
        self.visible = false;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        if self.active != active
            && let Some(presentation) = self.presentation.as_mut()
        {
            presentation.set_active(active);
        }
        self.active = active;
    }

    pub(crate) fn lifecycle(&self) -> LifecycleState {
        match (self.initialized, self.visible) {
            (false, _) => LifecycleState::Constructed,
            (true, true) => LifecycleState::Visible,
            (true, false) => LifecycleState::Hidden,
        }
    }
}

/// A component instance, as seen from inside its hooks.
pub struct ComponentCx<'a> {
    id: ComponentId,
    editable: EditableId,
    state: &'a mut InstanceState,
}

impl<'a> ComponentCx<'a> {
    pub(crate) fn new(id: ComponentId, editable: EditableId, state: &'a mut InstanceState) -> Self {
        Self {
            id,
            editable,
            state,
        }
    }

    /// The instance id.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The editable this instance is bound to.
    pub fn editable(&self) -> EditableId {
        self.editable
    }

    /// The instance's type.
    pub fn component_type(&self) -> &ComponentType {
        &self.state.ty
    }

    /// The instance's merged settings.
    pub fn settings(&self) -> &ComponentSettings {
        &self.state.ty.settings
    }

    /// Whether the instance is visible.
    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Show the instance (no-op if already visible).
    pub fn show(&mut self) {
        self.state.show();
    }

    /// Hide the instance (no-op if already hidden).
    pub fn hide(&mut self) {
        self.state.hide();
    }

    /// Whether the instance is in its active state.
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Change the active state (forwarded to the presentation only on change).
    pub fn set_active(&mut self, active: bool) {
        self.state.set_active(active);
    }

    /// The toolkit presentation, once initialized.
    pub fn presentation_mut(&mut self) -> Option<&mut (dyn PresentationHandle + 'static)> {
        self.state.presentation.as_deref_mut()
    }
}

impl fmt::Debug for ComponentCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCx")
            .field("id", &self.id)
            .field("editable", &self.editable)
            .field("type", &self.state.ty.name)
            .field("visible", &self.state.visible)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_define_and_inherit_settings() {
        let mut types = ComponentTypes::new();
        assert!(types.is_empty());

        types
            .define(
                "button",
                ComponentTypes::COMPONENT,
                ComponentSettings::new().element(ElementKind::Button).label("Button"),
            )
            .unwrap();
        let bold = types
            .define(
                "bold",
                "button",
                ComponentSettings::new().label("Bold").icon("format-bold"),
            )
            .unwrap();

        assert_eq!(bold.base(), "button");
        assert_eq!(bold.role(), ComponentRole::Widget);
        assert_eq!(bold.element(), ElementKind::Button);
        assert_eq!(bold.settings().label.as_deref(), Some("Bold"));
        assert_eq!(bold.settings().icon.as_deref(), Some("format-bold"));
        assert_eq!(types.names(), vec!["bold", "button"]);
    }

    #[test]
    fn test_container_role_is_inherited() {
        let mut types = ComponentTypes::new();
        types
            .define("tab", ComponentTypes::CONTAINER, ComponentSettings::new())
            .unwrap();
        let table_tab = types
            .define("table-tab", "tab", ComponentSettings::new().show_on("table"))
            .unwrap();
        assert_eq!(table_tab.role(), ComponentRole::Container);
        assert_eq!(table_tab.element(), ElementKind::Container);
        assert!(matches!(
            table_tab.settings().show_on,
            Some(ShowOn::Selector(ref rule)) if rule == "table"
        ));
    }

    #[test]
    fn test_define_collisions_and_unknown_base() {
        let mut types = ComponentTypes::new();
        types
            .define("button", ComponentTypes::COMPONENT, ComponentSettings::new())
            .unwrap();

        let err = types
            .define("button", ComponentTypes::COMPONENT, ComponentSettings::new())
            .unwrap_err();
        assert_eq!(err, ComponentError::AlreadyDefined("button".to_string()));

        let err = types
            .define("container", ComponentTypes::COMPONENT, ComponentSettings::new())
            .unwrap_err();
        assert_eq!(err, ComponentError::AlreadyDefined("container".to_string()));

        let err = types
            .define("link", "missing", ComponentSettings::new())
            .unwrap_err();
        assert_eq!(
            err,
            ComponentError::UnknownBase {
                name: "link".to_string(),
                base: "missing".to_string(),
            }
        );
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn test_init_hooks_chain_base_first() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (o1, o2) = (order.clone(), order.clone());
        let base = ComponentSettings::new().on_init(move |_| o1.lock().unwrap().push("base"));
        let merged = ComponentSettings::new()
            .on_init(move |_| o2.lock().unwrap().push("override"))
            .merged_over(&base);

        let mut types = ComponentTypes::new();
        let ty = types
            .define("x", ComponentTypes::COMPONENT, merged)
            .unwrap();
        let mut state = InstanceState::new(ty.clone());
        let hook = ty.settings().init.clone().unwrap();
        hook(&mut ComponentCx::new(
            ComponentId::from_raw(1),
            EditableId::from_raw(1),
            &mut state,
        ));
        assert_eq!(*order.lock().unwrap(), vec!["base", "override"]);
    }

    #[test]
    fn test_click_hook_replaces_base() {
        let base = ComponentSettings::new().on_click(|_| Err("base".into()));
        let merged = ComponentSettings::new()
            .on_click(|_| Ok(()))
            .merged_over(&base);
        let inherited = ComponentSettings::new().merged_over(&base);

        let mut types = ComponentTypes::new();
        let ty = types
            .define("a", ComponentTypes::COMPONENT, merged)
            .unwrap();
        let inherited_ty = types
            .define("b", ComponentTypes::COMPONENT, inherited)
            .unwrap();

        let mut state = InstanceState::new(ty.clone());
        let mut cx = ComponentCx::new(ComponentId::from_raw(1), EditableId::from_raw(1), &mut state);
        assert!((ty.settings().click.clone().unwrap())(&mut cx).is_ok());
        assert!((inherited_ty.settings().click.clone().unwrap())(&mut cx).is_err());
    }

    #[test]
    fn test_show_hide_are_idempotent() {
        let mut types = ComponentTypes::new();
        let ty = types
            .define("x", ComponentTypes::CONTAINER, ComponentSettings::new())
            .unwrap();
        let mut state = InstanceState::new(ty);
        assert_eq!(state.lifecycle(), LifecycleState::Constructed);
        state.initialized = true;
        state.hide();
        state.hide();
        assert_eq!(state.lifecycle(), LifecycleState::Hidden);
        state.show();
        state.show();
        assert_eq!(state.lifecycle(), LifecycleState::Visible);
    }
}
