//! Editable-scoped component runtime.
//!
//! [`UiRuntime`] is the host side of the UI layer. It owns:
//!
//! - the component type registry ([`ComponentTypes`])
//! - the `show_on` normalizer and the predicate identity memo
//! - one entry per editable (`EditableId`): its subscribed component instances and its
//!   container registry, created when the first container is rendered into it
//! - every component instance (`ComponentId`), bound to exactly one editable
//!
//! Notifications are delivered per editable with [`UiRuntime::notify`]. Each notification first
//! resolves container visibility for that editable (one pass over its predicate groups), then runs
//! the `selection_change` hook of every instance subscribed to the editable, in render order.
//! Instances of other editables never see it.
//!
//! Everything runs synchronously on the caller's thread; no operation suspends or spawns work.
//!
//! There is no global state. A host creates one runtime and keeps it for its lifetime; the type
//! registry and the rule cache live in it, and two runtimes share nothing.

use crate::component::{
    ComponentCx, ComponentRole, ComponentSettings, ComponentType, ComponentTypes, InstanceState,
    LifecycleState, SelectionEvent,
};
use crate::container::{ContainerRegistry, GroupDecision, PredicateId, PredicateIds};
use crate::dom::{AncestorChain, DomTree, SelectionRange};
use crate::error::ComponentError;
use crate::presentation::{HeadlessToolkit, PresentationJournal, PresentationRequest, Toolkit};
use crate::show_on::{EventType, Predicate, ShowOn, ShowOnNormalizer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Opaque identifier for an editable surface in a [`UiRuntime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditableId(u64);

impl EditableId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Opaque identifier for a component instance in a [`UiRuntime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// A notification delivered to one editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Event classifier, also passed to predicates.
    pub event_type: EventType,
    /// Current selection, if any.
    pub range: Option<SelectionRange>,
}

impl Notification {
    /// The selection moved to `range`.
    pub fn selection_changed(range: SelectionRange) -> Self {
        Self {
            event_type: EventType::SelectionChanged,
            range: Some(range),
        }
    }

    /// An editing command ran; `range` is the selection afterwards.
    pub fn command_executed(range: Option<SelectionRange>) -> Self {
        Self {
            event_type: EventType::CommandExecuted,
            range,
        }
    }

    /// A host-defined event.
    pub fn custom(name: impl Into<String>, range: Option<SelectionRange>) -> Self {
        Self {
            event_type: EventType::Custom(name.into()),
            range,
        }
    }
}

struct EditableEntry {
    name: Option<String>,
    registry: Option<ContainerRegistry>,
    subscribers: Vec<ComponentId>,
}

struct ComponentEntry {
    editable: EditableId,
    state: InstanceState,
}

/// Owns editables, component instances and the type registry.
pub struct UiRuntime {
    types: ComponentTypes,
    normalizer: ShowOnNormalizer,
    predicate_ids: PredicateIds,
    toolkit: Box<dyn Toolkit>,

    next_editable_id: u64,
    editables: BTreeMap<EditableId, EditableEntry>,

    last_component_id: u64,
    components: BTreeMap<ComponentId, ComponentEntry>,
}

impl std::fmt::Debug for UiRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiRuntime")
            .field("type_count", &self.types.len())
            .field("editable_count", &self.editables.len())
            .field("component_count", &self.components.len())
            .field("predicate_count", &self.predicate_ids.len())
            .finish()
    }
}

impl UiRuntime {
    /// Create a runtime that builds presentations with `toolkit`.
    pub fn new(toolkit: impl Toolkit + 'static) -> Self {
        Self {
            types: ComponentTypes::new(),
            normalizer: ShowOnNormalizer::new(),
            predicate_ids: PredicateIds::new(),
            toolkit: Box::new(toolkit),
            next_editable_id: 0,
            editables: BTreeMap::new(),
            last_component_id: 0,
            components: BTreeMap::new(),
        }
    }

    /// Create a runtime backed by a [`HeadlessToolkit`], returning its journal.
    pub fn headless() -> (Self, PresentationJournal) {
        let toolkit = HeadlessToolkit::new();
        let journal = toolkit.journal();
        (Self::new(toolkit), journal)
    }

    /// The component type registry.
    pub fn types(&self) -> &ComponentTypes {
        &self.types
    }

    /// Define a component type. See [`ComponentTypes::define`].
    pub fn define(
        &mut self,
        name: &str,
        base: &str,
        settings: ComponentSettings,
    ) -> Result<Arc<ComponentType>, ComponentError> {
        self.types.define(name, base, settings)
    }

    /// Normalize a `show_on` specification with this runtime's cache.
    pub fn normalize(&mut self, spec: &ShowOn) -> Predicate {
        self.normalizer.normalize(spec)
    }

    // ---------------------------------------------------------------------
    // Editables
    // ---------------------------------------------------------------------

    /// Create a new, empty editable.
    pub fn create_editable(&mut self) -> EditableId {
        self.insert_editable(None)
    }

    /// Create a new, empty editable with a host-provided name (used in diagnostics).
    pub fn create_named_editable(&mut self, name: impl Into<String>) -> EditableId {
        self.insert_editable(Some(name.into()))
    }

    /// Returns the number of live editables.
    pub fn editable_count(&self) -> usize {
        self.editables.len()
    }

    /// Returns `true` if `id` is a live editable.
    pub fn contains_editable(&self, id: EditableId) -> bool {
        self.editables.contains_key(&id)
    }

    /// The name given to an editable at creation.
    pub fn editable_name(&self, id: EditableId) -> Option<&str> {
        self.editables.get(&id).and_then(|e| e.name.as_deref())
    }

    /// Component instances bound to an editable, in render order.
    pub fn components_of(&self, id: EditableId) -> Result<&[ComponentId], ComponentError> {
        self.editables
            .get(&id)
            .map(|e| e.subscribers.as_slice())
            .ok_or(ComponentError::EditableNotFound(id))
    }

    /// The editable's container registry; `None` until a container is rendered into it.
    pub fn container_registry(
        &self,
        id: EditableId,
    ) -> Result<Option<&ContainerRegistry>, ComponentError> {
        self.editables
            .get(&id)
            .map(|e| e.registry.as_ref())
            .ok_or(ComponentError::EditableNotFound(id))
    }

    /// Tear an editable down, destroying every component bound to it.
    ///
    /// Returns the number of destroyed components.
    pub fn destroy_editable(&mut self, id: EditableId) -> Result<usize, ComponentError> {
        let entry = self
            .editables
            .remove(&id)
            .ok_or(ComponentError::EditableNotFound(id))?;

        for component_id in &entry.subscribers {
            if let Some(mut component) = self.components.remove(component_id)
                && let Some(presentation) = component.state.presentation.as_mut()
            {
                presentation.remove();
            }
        }

        tracing::debug!(
            editable = id.0,
            name = entry.name.as_deref(),
            components = entry.subscribers.len(),
            "destroyed editable"
        );
        Ok(entry.subscribers.len())
    }

    fn insert_editable(&mut self, name: Option<String>) -> EditableId {
        let id = EditableId(self.next_editable_id);
        self.next_editable_id = self.next_editable_id.saturating_add(1);
        self.editables.insert(
            id,
            EditableEntry {
                name,
                registry: None,
                subscribers: Vec::new(),
            },
        );
        id
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Instantiate the component type `name` for `editable`.
    ///
    /// The instance is subscribed to the editable's notifications, registered in the editable's
    /// container registry if it is a container, and initialized (presentation created, `init`
    /// hooks run). Nothing is created if the type or the editable is unknown.
    pub fn render(&mut self, name: &str, editable: EditableId) -> Result<ComponentId, ComponentError> {
        let ty = self
            .types
            .get(name)
            .ok_or_else(|| ComponentError::UnknownType(name.to_string()))?;
        let entry = self
            .editables
            .get_mut(&editable)
            .ok_or(ComponentError::EditableNotFound(editable))?;

        self.last_component_id += 1;
        let id = ComponentId(self.last_component_id);
        entry.subscribers.push(id);
        self.components.insert(
            id,
            ComponentEntry {
                editable,
                state: InstanceState::new(ty.clone()),
            },
        );

        if ty.role() == ComponentRole::Container {
            let spec = ty.settings().show_on.clone().unwrap_or_default();
            self.register_container(editable, id, &spec);
        }

        self.init_component(id, editable, &ty);
        tracing::debug!(component = id.0, editable = editable.0, component_type = name, "rendered component");
        Ok(id)
    }

    /// The type of a component instance.
    pub fn component_type(&self, id: ComponentId) -> Result<&ComponentType, ComponentError> {
        self.component(id).map(|c| c.state.ty.as_ref())
    }

    /// The editable a component instance is bound to.
    pub fn editable_of(&self, id: ComponentId) -> Result<EditableId, ComponentError> {
        self.component(id).map(|c| c.editable)
    }

    /// Lifecycle state of a component id; `None` if the id was never handed out.
    pub fn lifecycle(&self, id: ComponentId) -> Option<LifecycleState> {
        match self.components.get(&id) {
            Some(component) => Some(component.state.lifecycle()),
            None if id.0 >= 1 && id.0 <= self.last_component_id => Some(LifecycleState::Destroyed),
            None => None,
        }
    }

    /// Whether a component is visible.
    pub fn is_visible(&self, id: ComponentId) -> Result<bool, ComponentError> {
        self.component(id).map(|c| c.state.visible)
    }

    /// Whether a component is in its active state.
    pub fn is_active(&self, id: ComponentId) -> Result<bool, ComponentError> {
        self.component(id).map(|c| c.state.active)
    }

    /// Show a component. No-op if it is already visible.
    pub fn show(&mut self, id: ComponentId) -> Result<(), ComponentError> {
        self.component_mut(id).map(|c| c.state.show())
    }

    /// Hide a component. No-op if it is already hidden.
    pub fn hide(&mut self, id: ComponentId) -> Result<(), ComponentError> {
        self.component_mut(id).map(|c| c.state.hide())
    }

    /// Run a component's `click` hook, if it has one.
    pub fn click(&mut self, id: ComponentId) -> Result<(), ComponentError> {
        let component = self.component_mut(id)?;
        let Some(hook) = component.state.ty.settings().click.clone() else {
            return Ok(());
        };
        let editable = component.editable;
        hook(&mut ComponentCx::new(id, editable, &mut component.state)).map_err(|err| {
            ComponentError::Hook {
                component: id,
                message: err.to_string(),
            }
        })
    }

    /// The predicate group a container belongs to (`None` for widgets).
    pub fn container_group(&self, id: ComponentId) -> Result<Option<PredicateId>, ComponentError> {
        let editable = self.editable_of(id)?;
        Ok(self
            .editables
            .get(&editable)
            .and_then(|e| e.registry.as_ref())
            .and_then(|r| r.group_of(id)))
    }

    fn component(&self, id: ComponentId) -> Result<&ComponentEntry, ComponentError> {
        self.components
            .get(&id)
            .ok_or(ComponentError::ComponentNotFound(id))
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut ComponentEntry, ComponentError> {
        self.components
            .get_mut(&id)
            .ok_or(ComponentError::ComponentNotFound(id))
    }

    fn register_container(
        &mut self,
        editable: EditableId,
        container: ComponentId,
        spec: &ShowOn,
    ) -> PredicateId {
        let predicate = self.normalizer.normalize(spec);
        let key = self.predicate_ids.id_for(&predicate);
        if let Some(entry) = self.editables.get_mut(&editable) {
            let registry = entry.registry.get_or_insert_with(ContainerRegistry::new);
            if registry.register(key, &predicate, container) {
                tracing::debug!(editable = editable.0, group = key.get(), "created container group");
            }
        }
        key
    }

    fn init_component(&mut self, id: ComponentId, editable: EditableId, ty: &ComponentType) {
        let Some(component) = self.components.get_mut(&id) else {
            return;
        };

        let settings = ty.settings();
        let request = PresentationRequest {
            component: id,
            element: ty.element(),
            label: settings.label.clone(),
            icon: settings.icon.clone(),
            icon_only: settings.icon_only.unwrap_or(false),
            tooltip: settings.tooltip.clone(),
        };
        component.state.presentation = Some(self.toolkit.create(&request));

        if let Some(hook) = settings.init.clone() {
            hook(&mut ComponentCx::new(id, editable, &mut component.state));
        }
        component.state.initialized = true;
    }

    // ---------------------------------------------------------------------
    // Visibility
    // ---------------------------------------------------------------------

    /// Resolve container visibility for `editable` against an explicit ancestor chain.
    ///
    /// Every predicate group is evaluated once; all containers of a group are shown or hidden
    /// together. An editable without containers resolves to no decisions.
    pub fn resolve_context(
        &mut self,
        editable: EditableId,
        chain: &AncestorChain<'_>,
        event: Option<&EventType>,
    ) -> Result<Vec<GroupDecision>, ComponentError> {
        let entry = self
            .editables
            .get(&editable)
            .ok_or(ComponentError::EditableNotFound(editable))?;
        let Some(registry) = entry.registry.as_ref() else {
            return Ok(Vec::new());
        };

        let decisions = registry.resolve(chain, event);
        for decision in &decisions {
            let Some(group) = registry.group(decision.group) else {
                continue;
            };
            for container in group.containers() {
                let Some(component) = self.components.get_mut(container) else {
                    continue;
                };
                if decision.show {
                    component.state.show();
                } else {
                    component.state.hide();
                }
            }
        }
        Ok(decisions)
    }

    /// Resolve container visibility for `editable` from a selection range.
    ///
    /// The ancestor chain is walked from the range's start container up to the editing host.
    pub fn resolve_selection<D: DomTree + ?Sized>(
        &mut self,
        editable: EditableId,
        dom: &D,
        range: &SelectionRange,
    ) -> Result<Vec<GroupDecision>, ComponentError> {
        let chain = AncestorChain::walk(dom, range.start_container);
        self.resolve_context(editable, &chain, None)
    }

    /// Deliver a notification to `editable`.
    ///
    /// Container visibility is resolved first, then each subscribed instance's `selection_change`
    /// hook runs. A failing hook is logged and skipped; the remaining instances still run.
    pub fn notify<D: DomTree + ?Sized>(
        &mut self,
        editable: EditableId,
        dom: &D,
        notification: &Notification,
    ) -> Result<(), ComponentError> {
        let chain = match &notification.range {
            Some(range) => AncestorChain::walk(dom, range.start_container),
            None => AncestorChain::empty(),
        };
        self.resolve_context(editable, &chain, Some(&notification.event_type))?;

        let event = SelectionEvent {
            event_type: &notification.event_type,
            range: notification.range.as_ref(),
            chain: &chain,
        };
        let entry = self
            .editables
            .get(&editable)
            .ok_or(ComponentError::EditableNotFound(editable))?;
        for id in &entry.subscribers {
            let Some(component) = self.components.get_mut(id) else {
                continue;
            };
            let Some(hook) = component.state.ty.settings().selection_change.clone() else {
                continue;
            };
            let mut cx = ComponentCx::new(*id, editable, &mut component.state);
            if let Err(err) = hook(&mut cx, &event) {
                tracing::warn!(component = id.0, editable = editable.0, "selection_change hook failed: {err}");
            }
        }
        Ok(())
    }
}
