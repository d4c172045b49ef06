//! Headless UI demo
//!
//! Loads a layout, renders it into two editables over a sample document, replays a few
//! selections and prints which containers are visible and which toggle buttons are active.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p editor-ui-demo                      # built-in layout
//! cargo run -p editor-ui-demo -- my-layout.yaml    # custom layout (YAML or JSON)
//! RUST_LOG=editor_ui_core=debug cargo run -p editor-ui-demo
//! ```

use editor_ui_config::UiConfig;
use editor_ui_core::{
    ComponentError, ComponentSettings, Document, EditableId, Element, NodeId, Notification,
    SelectionRange, UiRuntime,
};
use editor_ui_widgets::{define_button, define_toggle_button, inside};
use std::env;
use std::error::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LAYOUT: &str = include_str!("../layouts/default.yaml");

struct SampleDocument {
    doc: Document,
    heading: NodeId,
    bold_text: NodeId,
    cell: NodeId,
    link_text: NodeId,
}

fn sample_document() -> Result<SampleDocument, editor_ui_core::DomError> {
    let mut doc = Document::new();
    let host = doc.create_root(Element::new("div").with_class("editable"));
    doc.set_editing_host(host, true)?;

    let h1 = doc.append_element(host, Element::new("h1"))?;
    let heading = doc.append_text(h1, "Quarterly report")?;

    let p = doc.append_element(host, Element::new("p"))?;
    doc.append_text(p, "Revenue grew ")?;
    let strong = doc.append_element(p, Element::new("strong"))?;
    let bold_text = doc.append_text(strong, "twelve percent")?;

    let table = doc.append_element(host, Element::new("table"))?;
    let tr = doc.append_element(table, Element::new("tr"))?;
    let td = doc.append_element(tr, Element::new("td"))?;
    let cell = doc.append_text(td, "Q1")?;

    let footer = doc.append_element(host, Element::new("p"))?;
    let a = doc.append_element(
        footer,
        Element::new("a").with_attribute("href", "https://example.com/report"),
    )?;
    let link_text = doc.append_text(a, "full report")?;

    Ok(SampleDocument {
        doc,
        heading,
        bold_text,
        cell,
        link_text,
    })
}

fn define_behaviors(ui: &mut UiRuntime) -> Result<(), Box<dyn Error>> {
    editor_ui_widgets::install(ui)?;
    define_toggle_button(
        ui,
        "bold",
        ComponentSettings::new().label("Bold").icon("format-bold").icon_only(true),
        inside("b,strong")?,
        |cx| {
            tracing::info!(component = cx.id().get(), "bold clicked");
            Ok(())
        },
    )?;
    define_toggle_button(
        ui,
        "italic",
        ComponentSettings::new().label("Italic").icon("format-italic").icon_only(true),
        inside("i,em")?,
        |_| Ok(()),
    )?;
    define_button(ui, "undo", ComponentSettings::new().label("Undo").icon("undo"), |cx| {
        tracing::info!(component = cx.id().get(), "undo clicked");
        Ok(())
    })?;
    Ok(())
}

fn print_state(ui: &UiRuntime, editable: EditableId, step: &str) -> Result<(), ComponentError> {
    println!("[{}] {step}", ui.editable_name(editable).unwrap_or("?"));
    for &id in ui.components_of(editable)? {
        let name = ui.component_type(id)?.name();
        let visible = if ui.is_visible(id)? { "shown" } else { "hidden" };
        let active = if ui.is_active(id)? { " (active)" } else { "" };
        println!("    {name:<14} {visible}{active}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match env::args().nth(1) {
        Some(path) => UiConfig::from_path(&path)?,
        None => UiConfig::from_yaml_str(DEFAULT_LAYOUT)?,
    };

    let (mut ui, journal) = UiRuntime::headless();
    define_behaviors(&mut ui)?;
    let defined = config.apply(&mut ui)?;
    tracing::info!(defined, total = ui.types().len(), "component types ready");

    let sample = sample_document()?;
    let toolbar = ui.create_named_editable("toolbar");
    let sidebar = ui.create_named_editable("sidebar");
    config.render_into(&mut ui, toolbar)?;
    config.render_into(&mut ui, sidebar)?;

    let steps = [
        ("caret in heading", sample.heading),
        ("caret in bold text", sample.bold_text),
        ("caret in table cell", sample.cell),
        ("caret in link", sample.link_text),
    ];
    for (step, node) in steps {
        let notification = Notification::selection_changed(SelectionRange::collapsed(node, 0));
        ui.notify(toolbar, &sample.doc, &notification)?;
        print_state(&ui, toolbar, step)?;
    }

    // The sidebar never received a notification, so everything there is still in its initial state.
    print_state(&ui, sidebar, "untouched")?;

    ui.notify(sidebar, &sample.doc, &Notification::command_executed(None))?;
    print_state(&ui, sidebar, "after command with no selection")?;

    let undo = ui
        .components_of(toolbar)?
        .iter()
        .copied()
        .find(|&id| ui.component_type(id).is_ok_and(|ty| ty.name() == "undo"));
    if let Some(undo) = undo {
        ui.click(undo)?;
    }

    let removed = ui.destroy_editable(sidebar)?;
    println!(
        "destroyed sidebar ({removed} components), {} presentation calls recorded",
        journal.events().len()
    );
    Ok(())
}
