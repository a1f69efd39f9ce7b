#![forbid(unsafe_code)]

//! DOM-backed theme controls.

use tracing::debug;
use vpc_runtime::{ControlKind, ControlView, ThemeControl};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlSelectElement};

use crate::error::describe;
use crate::markup::{INDICATOR_SELECTOR, LABEL_SELECTOR, LabelTarget, TogglePatch, WIRED_ATTRIBUTE};

fn child(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok().flatten()
}

pub(crate) fn set_attribute(element: &Element, name: &str, value: &str) {
    if let Err(err) = element.set_attribute(name, value) {
        debug!(name, reason = %describe(&err), "control attribute not set");
    }
}

/// A `[data-theme-toggle]` button.
#[derive(Debug, Clone)]
pub struct DomToggle {
    button: HtmlElement,
}

impl DomToggle {
    #[must_use]
    pub fn new(button: HtmlElement) -> Self {
        Self { button }
    }

    #[must_use]
    pub fn element(&self) -> &HtmlElement {
        &self.button
    }
}

impl ThemeControl for DomToggle {
    fn kind(&self) -> ControlKind {
        ControlKind::Toggle
    }

    fn is_wired(&self) -> bool {
        self.button.has_attribute(WIRED_ATTRIBUTE)
    }

    fn mark_wired(&self) {
        set_attribute(&self.button, WIRED_ATTRIBUTE, "true");
    }

    fn render(&self, view: &ControlView) {
        let label_child = child(&self.button, LABEL_SELECTOR);
        let indicator = child(&self.button, INDICATOR_SELECTOR)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let patch = TogglePatch::new(view, label_child.is_some(), indicator.is_some());

        match (patch.label_target, label_child) {
            (LabelTarget::Child, Some(label)) => label.set_text_content(Some(&patch.label)),
            _ => self.button.set_text_content(Some(&patch.label)),
        }
        if let (Some(indicator), Some(color)) = (indicator, &patch.indicator_background) {
            if let Err(err) = indicator.style().set_property("background-color", color) {
                debug!(reason = %describe(&err), "indicator color not set");
            }
        }
        set_attribute(&self.button, "aria-label", &patch.aria_label);
    }
}

/// A `select[data-theme-select]` box whose option values are theme names.
#[derive(Debug, Clone)]
pub struct DomSelect {
    select: HtmlSelectElement,
}

impl DomSelect {
    #[must_use]
    pub fn new(select: HtmlSelectElement) -> Self {
        Self { select }
    }

    #[must_use]
    pub fn element(&self) -> &HtmlSelectElement {
        &self.select
    }
}

impl ThemeControl for DomSelect {
    fn kind(&self) -> ControlKind {
        ControlKind::Select
    }

    fn is_wired(&self) -> bool {
        self.select.has_attribute(WIRED_ATTRIBUTE)
    }

    fn mark_wired(&self) {
        set_attribute(&self.select, WIRED_ATTRIBUTE, "true");
    }

    fn render(&self, view: &ControlView) {
        self.select.set_value(view.theme.as_str());
    }
}
