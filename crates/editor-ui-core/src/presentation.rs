//! Presentation toolkit boundary.
//!
//! Rendering is not done here. When a component is initialized, the runtime asks a [`Toolkit`] for
//! a [`PresentationHandle`] and from then on only calls `show` / `hide` / `set_active` / `remove`
//! on it. [`HeadlessToolkit`] records those calls in a [`PresentationJournal`], which is what
//! headless hosts and tests use.

use crate::component::ElementKind;
use crate::runtime::ComponentId;
use std::sync::{Arc, Mutex, PoisonError};

/// What the toolkit needs to build a presentation for a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationRequest {
    /// The component being initialized.
    pub component: ComponentId,
    /// Kind of element to create.
    pub element: ElementKind,
    /// Optional text label.
    pub label: Option<String>,
    /// Optional icon name (toolkit-defined).
    pub icon: Option<String>,
    /// Render only the icon, without the label.
    pub icon_only: bool,
    /// Optional tooltip text.
    pub tooltip: Option<String>,
}

/// A toolkit-owned presentation for one component instance.
pub trait PresentationHandle {
    /// Make the presentation visible.
    fn show(&mut self);

    /// Make the presentation invisible.
    fn hide(&mut self);

    /// Reflect an "active" (pressed / selected) state.
    fn set_active(&mut self, _active: bool) {}

    /// Tear the presentation down.
    fn remove(&mut self) {}
}

/// Creates presentations for components.
pub trait Toolkit {
    /// Build the presentation for a component being initialized.
    fn create(&mut self, request: &PresentationRequest) -> Box<dyn PresentationHandle>;
}

/// A call recorded by [`HeadlessToolkit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    /// A presentation was created.
    Created {
        /// Owning component.
        component: ComponentId,
        /// Element kind requested.
        element: ElementKind,
        /// Label requested.
        label: Option<String>,
    },
    /// `show()` was called.
    Shown(ComponentId),
    /// `hide()` was called.
    Hidden(ComponentId),
    /// `set_active()` was called.
    Active(ComponentId, bool),
    /// `remove()` was called.
    Removed(ComponentId),
}

impl PresentationEvent {
    /// The component this event belongs to.
    pub fn component(&self) -> ComponentId {
        match self {
            PresentationEvent::Created { component, .. } => *component,
            PresentationEvent::Shown(c)
            | PresentationEvent::Hidden(c)
            | PresentationEvent::Active(c, _)
            | PresentationEvent::Removed(c) => *c,
        }
    }
}

/// Shared, append-only log of presentation calls.
#[derive(Debug, Clone, Default)]
pub struct PresentationJournal {
    events: Arc<Mutex<Vec<PresentationEvent>>>,
}

impl PresentationJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events.
    pub fn events(&self) -> Vec<PresentationEvent> {
        self.lock().clone()
    }

    /// Events recorded for one component.
    pub fn events_for(&self, component: ComponentId) -> Vec<PresentationEvent> {
        self.lock()
            .iter()
            .filter(|e| e.component() == component)
            .cloned()
            .collect()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, event: PresentationEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PresentationEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A toolkit that renders nothing and journals every call.
#[derive(Debug, Clone, Default)]
pub struct HeadlessToolkit {
    journal: PresentationJournal,
}

impl HeadlessToolkit {
    /// Create a toolkit with a fresh journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle to the journal (shared with the toolkit).
    pub fn journal(&self) -> PresentationJournal {
        self.journal.clone()
    }
}

impl Toolkit for HeadlessToolkit {
    fn create(&mut self, request: &PresentationRequest) -> Box<dyn PresentationHandle> {
        self.journal.record(PresentationEvent::Created {
            component: request.component,
            element: request.element.clone(),
            label: request.label.clone(),
        });
        Box::new(HeadlessHandle {
            component: request.component,
            journal: self.journal.clone(),
        })
    }
}

struct HeadlessHandle {
    component: ComponentId,
    journal: PresentationJournal,
}

impl PresentationHandle for HeadlessHandle {
    fn show(&mut self) {
        self.journal.record(PresentationEvent::Shown(self.component));
    }

    fn hide(&mut self) {
        self.journal.record(PresentationEvent::Hidden(self.component));
    }

    fn set_active(&mut self, active: bool) {
        self.journal
            .record(PresentationEvent::Active(self.component, active));
    }

    fn remove(&mut self) {
        self.journal.record(PresentationEvent::Removed(self.component));
    }
}
