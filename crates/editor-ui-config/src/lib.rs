#![warn(missing_docs)]
//! Editor UI Config - layout files for `editor-ui-core`
//!
//! A layout lists component type definitions and the components rendered into each editable.
//! It is read from YAML or JSON:
//!
//! ```yaml
//! components:
//!   - name: table-tab
//!     base: container
//!     label: Table
//!     show_on: "table,td,th"
//!   - name: add-row
//!     base: button
//!     label: Add row
//!     icon: table-row-add
//! render: [table-tab, add-row]
//! ```
//!
//! `show_on` accepts a match rule string or a boolean. Any other value loads, logs a warning and
//! behaves as "always visible". Unknown keys are ignored.
//!
//! Hooks cannot be expressed in a layout. Types needing behavior are defined in code first and
//! used as a `base` here.

mod error;
mod layout;

pub use error::ConfigError;
pub use layout::{ComponentDefinition, ShowOnValue, UiConfig};
