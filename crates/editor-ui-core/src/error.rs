use crate::dom::NodeId;
use crate::runtime::{ComponentId, EditableId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced while defining, rendering or driving components.
pub enum ComponentError {
    #[error("no such component type: {0}")]
    /// `render` was called with a type name that was never defined.
    UnknownType(String),

    #[error("component type already defined: {0}")]
    /// `define` was called with a name that is already taken.
    AlreadyDefined(String),

    #[error("cannot define '{name}': unknown base type '{base}'")]
    /// `define` referenced a base type that does not exist.
    UnknownBase {
        /// The type being defined.
        name: String,
        /// The missing base.
        base: String,
    },

    #[error("editable not found: {0:?}")]
    /// The editable id is unknown (never created, or already destroyed).
    EditableNotFound(EditableId),

    #[error("component not found: {0:?}")]
    /// The component id is unknown (never rendered, or already destroyed).
    ComponentNotFound(ComponentId),

    #[error("hook failed for component {component:?}: {message}")]
    /// A component hook returned an error.
    Hook {
        /// The component whose hook failed.
        component: ComponentId,
        /// The hook's error message.
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced when parsing an element match rule.
pub enum SelectorError {
    #[error("empty match rule")]
    /// The rule was empty or whitespace.
    Empty,

    #[error("empty alternative in match rule '{0}'")]
    /// A comma-separated alternative was empty.
    EmptyAlternative(String),

    #[error("sibling combinators are not supported: '{0}'")]
    /// The rule used a `+` or `~` combinator outside an attribute test.
    UnsupportedCombinator(String),

    #[error("invalid match rule: '{0}'")]
    /// The rule could not be parsed.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by [`Document`](crate::dom::Document) edits.
pub enum DomError {
    #[error("node not found: {0:?}")]
    /// The node id is not part of the document.
    NodeNotFound(NodeId),
}
