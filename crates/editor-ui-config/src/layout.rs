use crate::ConfigError;
use editor_ui_core::{
    ComponentId, ComponentSettings, ComponentTypes, EditableId, ElementKind, ShowOn, UiRuntime,
};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

/// A UI layout: component definitions plus the components to render into each editable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UiConfig {
    /// Component types to define, in order (a definition may use an earlier one as its base).
    #[serde(default)]
    pub components: Vec<ComponentDefinition>,

    /// Type names rendered into an editable by [`UiConfig::render_into`], in order.
    #[serde(default)]
    pub render: Vec<String>,
}

/// One component type definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentDefinition {
    /// Type name.
    pub name: String,

    /// Base type name.
    #[serde(default = "default_base")]
    pub base: String,

    /// Text label.
    #[serde(default)]
    pub label: Option<String>,

    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,

    /// Render only the icon.
    #[serde(default)]
    pub icon_only: Option<bool>,

    /// Tooltip text.
    #[serde(default)]
    pub tooltip: Option<String>,

    /// Element kind (`generic`, `container`, `button`, `separator`, anything else is custom).
    #[serde(default)]
    pub element: Option<String>,

    /// Visibility rule for containers.
    #[serde(default)]
    pub show_on: Option<ShowOnValue>,
}

/// A `show_on` value as written in a layout file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ShowOnValue {
    /// `true` / `false`.
    Flag(bool),
    /// An element match rule.
    Rule(String),
    /// Anything else; kept so newer layouts still load.
    Other(Value),
}

fn default_base() -> String {
    ComponentTypes::COMPONENT.to_string()
}

impl ShowOnValue {
    /// Convert to the runtime representation.
    pub fn to_show_on(&self) -> ShowOn {
        match self {
            ShowOnValue::Flag(flag) => ShowOn::Flag(*flag),
            ShowOnValue::Rule(rule) => ShowOn::Selector(rule.clone()),
            ShowOnValue::Other(value) => ShowOn::Unrecognized(describe(value).to_string()),
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn element_kind(name: &str) -> ElementKind {
    match name {
        "generic" => ElementKind::Generic,
        "container" => ElementKind::Container,
        "button" => ElementKind::Button,
        "separator" => ElementKind::Separator,
        other => ElementKind::Custom(other.to_string()),
    }
}

impl ComponentDefinition {
    /// Override settings described by this definition.
    pub fn settings(&self) -> ComponentSettings {
        ComponentSettings {
            label: self.label.clone(),
            icon: self.icon.clone(),
            icon_only: self.icon_only,
            tooltip: self.tooltip.clone(),
            element: self.element.as_deref().map(element_kind),
            show_on: self.show_on.as_ref().map(ShowOnValue::to_show_on),
            ..ComponentSettings::default()
        }
    }
}

impl UiConfig {
    /// Parse a layout from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a layout from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a layout file; the format is picked from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        tracing::debug!(path = %path.display(), "loading layout");
        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&std::fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Define every component type in `ui`, in file order.
    ///
    /// Stops at the first failing definition; earlier definitions stay in place.
    pub fn apply(&self, ui: &mut UiRuntime) -> Result<usize, ConfigError> {
        for definition in &self.components {
            ui.define(&definition.name, &definition.base, definition.settings())?;
        }
        Ok(self.components.len())
    }

    /// Render the `render` list into `editable`.
    ///
    /// Stops at the first failing render; instances created before it stay rendered.
    pub fn render_into(
        &self,
        ui: &mut UiRuntime,
        editable: EditableId,
    ) -> Result<Vec<ComponentId>, ConfigError> {
        let mut rendered = Vec::with_capacity(self.render.len());
        for name in &self.render {
            rendered.push(ui.render(name, editable)?);
        }
        Ok(rendered)
    }
}
