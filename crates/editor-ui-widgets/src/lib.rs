#![warn(missing_docs)]
//! Editor UI Widgets - stock widget types for `editor-ui-core`
//!
//! [`install`] defines the base widget types in a [`UiRuntime`]:
//!
//! - [`BUTTON`]: a push button; its `click` hook does the work
//! - [`TOGGLE_BUTTON`]: a button whose active state follows the selection
//! - [`SEPARATOR`]: a visual divider between groups of buttons
//!
//! Concrete widgets are then derived from these with [`define_button`] and
//! [`define_toggle_button`], or directly through [`UiRuntime::define`].
//!
//! ```rust
//! use editor_ui_core::{ComponentSettings, UiRuntime};
//! use editor_ui_widgets::{define_toggle_button, inside};
//!
//! let (mut ui, _journal) = UiRuntime::headless();
//! editor_ui_widgets::install(&mut ui).unwrap();
//! define_toggle_button(
//!     &mut ui,
//!     "bold",
//!     ComponentSettings::new().label("Bold").icon("format-bold").icon_only(true),
//!     inside("b,strong").unwrap(),
//!     |_cx| Ok(()),
//! )
//! .unwrap();
//! ```

mod button;
mod toggle;

pub use button::define_button;
pub use toggle::{define_toggle_button, inside};

use editor_ui_core::{ComponentError, ComponentSettings, ComponentTypes, ElementKind, UiRuntime};

/// Base type for push buttons.
pub const BUTTON: &str = "button";
/// Base type for buttons with an active state.
pub const TOGGLE_BUTTON: &str = "toggle-button";
/// Base type for separators.
pub const SEPARATOR: &str = "separator";

/// Define the base widget types in `ui`.
///
/// Fails with [`ComponentError::AlreadyDefined`] if any of them already exists.
pub fn install(ui: &mut UiRuntime) -> Result<(), ComponentError> {
    ui.define(
        BUTTON,
        ComponentTypes::COMPONENT,
        ComponentSettings::new().element(ElementKind::Button),
    )?;
    ui.define(TOGGLE_BUTTON, BUTTON, ComponentSettings::new())?;
    ui.define(
        SEPARATOR,
        ComponentTypes::COMPONENT,
        ComponentSettings::new().element(ElementKind::Separator),
    )?;
    tracing::debug!("installed stock widget types");
    Ok(())
}
