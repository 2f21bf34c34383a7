//! Semantic role detection.
//!
//! Name rules are tried top to bottom and the first hit wins, so a node
//! called "Submit Button Card" is a button, not a card. Text nodes that
//! match no name rule fall back to font metrics.

use serde::Serialize;

use crate::style::TextStyle;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ComponentRole {
    Button,
    Card,
    FormField,
    Select,
    Checkbox,
    Radio,
    TabGroup,
    Dialog,
    Menu,
    Toolbar,
    Icon,
    Chip,
    ProgressSpinner,
    ProgressBar,
    /// Heading level 1..=3.
    Heading(u8),
    Strong,
    /// No rule matched: the lowercased raw kind.
    Passthrough(String),
}

impl ComponentRole {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentRole::Button => "button",
            ComponentRole::Card => "card",
            ComponentRole::FormField => "form-field",
            ComponentRole::Select => "select",
            ComponentRole::Checkbox => "checkbox",
            ComponentRole::Radio => "radio",
            ComponentRole::TabGroup => "tab-group",
            ComponentRole::Dialog => "dialog",
            ComponentRole::Menu => "menu",
            ComponentRole::Toolbar => "toolbar",
            ComponentRole::Icon => "icon",
            ComponentRole::Chip => "chip",
            ComponentRole::ProgressSpinner => "progress-spinner",
            ComponentRole::ProgressBar => "progress-bar",
            ComponentRole::Heading(1) => "h1",
            ComponentRole::Heading(2) => "h2",
            ComponentRole::Heading(_) => "h3",
            ComponentRole::Strong => "strong",
            ComponentRole::Passthrough(kind) => kind,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, ComponentRole::Heading(_))
    }
}

impl From<ComponentRole> for String {
    fn from(role: ComponentRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds that count as "frame-like" for the tab rule.
fn is_frame_kind(kind: &str) -> bool {
    kind.eq_ignore_ascii_case("FRAME")
}

fn from_name(name: &str, kind: &str) -> Option<ComponentRole> {
    let name = name.to_lowercase();
    let has = |needle: &str| name.contains(needle);

    let role = if has("button") || name.ends_with("btn") {
        ComponentRole::Button
    } else if has("card") {
        ComponentRole::Card
    } else if has("input") || has("textfield") {
        ComponentRole::FormField
    } else if has("select") || has("dropdown") {
        ComponentRole::Select
    } else if has("checkbox") {
        ComponentRole::Checkbox
    } else if has("radio") {
        ComponentRole::Radio
    } else if has("tab") && is_frame_kind(kind) {
        ComponentRole::TabGroup
    } else if has("dialog") || has("modal") {
        ComponentRole::Dialog
    } else if has("menu") {
        ComponentRole::Menu
    } else if has("toolbar") {
        ComponentRole::Toolbar
    } else if has("icon") {
        ComponentRole::Icon
    } else if has("chip") || has("tag") {
        ComponentRole::Chip
    } else if has("progress") {
        if has("circular") || has("spinner") {
            ComponentRole::ProgressSpinner
        } else {
            ComponentRole::ProgressBar
        }
    } else {
        return None;
    };
    Some(role)
}

fn from_typography(text: &TextStyle) -> Option<ComponentRole> {
    if text.font_size > 24.0 {
        Some(ComponentRole::Heading(1))
    } else if text.font_size > 20.0 {
        Some(ComponentRole::Heading(2))
    } else if text.font_size > 16.0 {
        Some(ComponentRole::Heading(3))
    } else if text.font_weight > 500.0 {
        Some(ComponentRole::Strong)
    } else {
        None
    }
}

/// Classify a node from its name, raw kind and (for text) typography.
pub fn detect_role(name: &str, kind: &str, text: Option<&TextStyle>) -> ComponentRole {
    if let Some(role) = from_name(name, kind) {
        return role;
    }
    if kind.eq_ignore_ascii_case("TEXT") {
        if let Some(role) = text.and_then(from_typography) {
            return role;
        }
    }
    if kind.is_empty() {
        return ComponentRole::Passthrough("div".to_string());
    }
    ComponentRole::Passthrough(kind.to_lowercase())
}
