#![warn(missing_docs)]
//! Editor UI Core - Headless UI Composition for Rich-Text Editors
//!
//! # Overview
//!
//! `editor-ui-core` manages the toolbar-and-panel layer around a rich-text editable: component
//! types, component instances, and the containers (tabs, panels, groups) whose visibility follows
//! the current selection. It does not render anything. A [`Toolkit`] creates presentations and
//! the runtime only tells them to show, hide or change their active state.
//!
//! # Core Features
//!
//! - **Type Composition**: types derive from a base with merged settings and hooks
//! - **Editable Scoping**: every instance is bound to one editable and only sees its notifications
//! - **Predicate Normalization**: `show_on` rules, flags and functions become shared predicates
//! - **Grouped Resolution**: containers sharing a predicate are resolved with one evaluation pass
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  UiRuntime (editables, instances, notify)   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Component Types (define / merge / hooks)   │  ← Composition
//! ├─────────────────────────────────────────────┤
//! │  Container Registry (predicate groups)      │  ← Visibility
//! ├─────────────────────────────────────────────┤
//! │  ShowOn Normalizer + Match Rules            │  ← Predicates
//! ├─────────────────────────────────────────────┤
//! │  DomTree / AncestorChain                    │  ← Document Boundary
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use editor_ui_core::{
//!     ComponentSettings, ComponentTypes, Document, Element, Notification, SelectionRange,
//!     UiRuntime,
//! };
//!
//! let (mut ui, _journal) = UiRuntime::headless();
//! ui.define(
//!     "table-tab",
//!     ComponentTypes::CONTAINER,
//!     ComponentSettings::new().label("Table").show_on("table"),
//! )
//! .unwrap();
//!
//! let mut doc = Document::new();
//! let host = doc.create_root(Element::new("div"));
//! doc.set_editing_host(host, true).unwrap();
//! let p = doc.append_element(host, Element::new("p")).unwrap();
//!
//! let editable = ui.create_editable();
//! let tab = ui.render("table-tab", editable).unwrap();
//!
//! ui.notify(editable, &doc, &Notification::selection_changed(SelectionRange::collapsed(p, 0)))
//!     .unwrap();
//! assert!(!ui.is_visible(tab).unwrap());
//! ```
//!
//! # Module Description
//!
//! - [`dom`] - document boundary trait, arena document, ancestor chains
//! - [`selector`] - element match rules used by `show_on`
//! - [`show_on`] - `show_on` specifications and predicate normalization
//! - [`container`] - predicate-grouped container registry
//! - [`component`] - component types, settings and hooks
//! - [`presentation`] - toolkit boundary and the headless toolkit
//! - [`runtime`] - editables, instances and notification delivery
//! - [`error`] - error types

pub mod component;
pub mod container;
pub mod dom;
pub mod error;
pub mod presentation;
pub mod runtime;
pub mod selector;
pub mod show_on;

pub use component::{
    ClickHook, ComponentCx, ComponentRole, ComponentSettings, ComponentType, ComponentTypes,
    ElementKind, HookError, InitHook, LifecycleState, SelectionEvent, SelectionHook,
};
pub use container::{ContainerRegistry, GroupDecision, PredicateGroup, PredicateId, PredicateIds};
pub use dom::{AncestorChain, Ancestors, Document, DomTree, Element, Node, NodeId, NodeKind, SelectionRange};
pub use error::{ComponentError, DomError, SelectorError};
pub use presentation::{
    HeadlessToolkit, PresentationEvent, PresentationHandle, PresentationJournal,
    PresentationRequest, Toolkit,
};
pub use runtime::{ComponentId, EditableId, Notification, UiRuntime};
pub use selector::Selector;
pub use show_on::{EventType, Predicate, PredicateFn, ShowOn, ShowOnNormalizer};
