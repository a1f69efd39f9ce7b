#![forbid(unsafe_code)]

//! Page markup contract and DOM-independent render plans.
//!
//! Pages opt in with attributes rather than ids:
//!
//! ```html
//! <button data-theme-toggle>
//!   <span data-theme-indicator></span>
//!   <span data-theme-label></span>
//! </button>
//! <select data-theme-select>...</select>
//! <span data-style-label></span>
//! <select data-style-select>...</select>
//! <button data-style-select>Cycle style</button>
//! ```
//!
//! A page with no theme toggle at all gets a [`FallbackToggle`] pinned to
//! the top-right corner.

use vpc_runtime::ControlView;
use vpc_style::StyleVariant;

pub const TOGGLE_SELECTOR: &str = "[data-theme-toggle]";
pub const THEME_SELECT_SELECTOR: &str = "select[data-theme-select]";
pub const LABEL_SELECTOR: &str = "[data-theme-label]";
pub const INDICATOR_SELECTOR: &str = "[data-theme-indicator]";
pub const STYLE_LABEL_SELECTOR: &str = "[data-style-label]";
/// Style controls: `<select>` boxes pick a variant, anything else cycles.
pub const STYLE_SELECT_SELECTOR: &str = "[data-style-select]";
/// Set on non-select style controls to the current variant.
pub const STYLE_CURRENT_ATTRIBUTE: &str = "data-style-current";

/// Any existing theme toggle, including legacy class-based ones.
pub const ANY_TOGGLE_SELECTOR: &str = "[data-theme-toggle], .theme-toggle-btn, .theme-fab";

/// Set on a control once an event listener is attached.
pub const WIRED_ATTRIBUTE: &str = "data-theme-wired";

pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";
pub const PREFERS_LIGHT_QUERY: &str = "(prefers-color-scheme: light)";

pub const THEME_CHANGE_EVENT: &str = "themechange";
pub const STYLE_CHANGE_EVENT: &str = "stylechange";

const LOADING_READY_STATE: &str = "loading";

/// `document.readyState` still parsing, so wiring waits for `DOMContentLoaded`.
#[must_use]
pub fn is_loading(ready_state: &str) -> bool {
    ready_state == LOADING_READY_STATE
}

/// Where a toggle's label text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTarget {
    /// The `[data-theme-label]` child.
    Child,
    /// The button itself, replacing its text.
    Control,
}

/// Everything a toggle button writes on render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TogglePatch {
    pub label: String,
    pub label_target: LabelTarget,
    /// CSS `background-color` for the indicator child, if there is one.
    pub indicator_background: Option<String>,
    pub aria_label: String,
}

impl TogglePatch {
    #[must_use]
    pub fn new(view: &ControlView, has_label_child: bool, has_indicator: bool) -> Self {
        Self {
            label: view.label.clone(),
            label_target: if has_label_child {
                LabelTarget::Child
            } else {
                LabelTarget::Control
            },
            indicator_background: has_indicator.then(|| view.indicator.to_hex()),
            aria_label: view.aria_label.clone(),
        }
    }
}

/// Text and value for style-variant labels and selects.
#[must_use]
pub fn style_display(variant: StyleVariant) -> (&'static str, &'static str) {
    (variant.label(), variant.as_str())
}

/// How a `[data-style-select]` element is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleControlShape {
    /// A `<select>`: its value is the variant.
    Select,
    /// Any other element: each click moves to the next variant.
    Button,
}

impl StyleControlShape {
    #[must_use]
    pub fn from_tag(tag_name: &str) -> Self {
        if tag_name.eq_ignore_ascii_case("select") {
            Self::Select
        } else {
            Self::Button
        }
    }

    /// DOM event the control reacts to.
    #[must_use]
    pub const fn event(self) -> &'static str {
        match self {
            Self::Select => "change",
            Self::Button => "click",
        }
    }
}

/// What a style control shows for the current variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePatch {
    /// Set the select's `value`.
    Value(&'static str),
    /// Set [`STYLE_CURRENT_ATTRIBUTE`].
    CurrentAttribute(&'static str),
}

impl StylePatch {
    #[must_use]
    pub fn new(shape: StyleControlShape, variant: StyleVariant) -> Self {
        let (_, value) = style_display(variant);
        match shape {
            StyleControlShape::Select => Self::Value(value),
            StyleControlShape::Button => Self::CurrentAttribute(value),
        }
    }
}

/// The toggle injected when a page ships none.
///
/// The button carries `data-theme-toggle`, so the regular wiring pass
/// renders and binds it like any authored toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackToggle {
    pub container_style: &'static str,
    pub button_class: &'static str,
    pub button_type: &'static str,
    pub title: &'static str,
    pub inner_html: &'static str,
}

impl FallbackToggle {
    pub const CONTAINER_STYLE: &'static str =
        "position:fixed;top:12px;right:12px;display:flex;gap:8px;z-index:1000;";

    /// Plan for a page; `None` when a toggle already exists.
    #[must_use]
    pub fn plan(has_toggle: bool) -> Option<Self> {
        (!has_toggle).then_some(Self::DEFAULT)
    }

    const DEFAULT: Self = Self {
        container_style: Self::CONTAINER_STYLE,
        button_class: "theme-toggle-btn",
        button_type: "button",
        title: "Toggle theme",
        inner_html: "<span data-theme-indicator></span><span data-theme-label></span>",
    };

    /// Attributes set on the button, in order.
    #[must_use]
    pub fn button_attributes(&self) -> [(&'static str, &'static str); 5] {
        [
            ("type", self.button_type),
            ("class", self.button_class),
            ("title", self.title),
            ("aria-label", self.title),
            ("data-theme-toggle", ""),
        ]
    }
}
