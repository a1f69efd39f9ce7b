#![forbid(unsafe_code)]

//! Theme control bindings.
//!
//! A [`ThemeControl`] is anything on the page that shows the current theme
//! and lets the user change it: a toggle button or a select box. A
//! [`ThemeControls`] set wires controls to a [`ThemeStore`]:
//!
//! - wiring is idempotent per control ([`ThemeControl::is_wired`]);
//! - a freshly wired control renders immediately;
//! - every store notification re-renders every wired control, whichever
//!   control (or other binding set) caused it.
//!
//! Several independent `ThemeControls` sets may share one store, like
//! separately loaded page scripts; each keeps its own subscription.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;
use vpc_style::{Rgb, ThemeName};

use crate::broadcast::Subscription;
use crate::store::{InvalidTheme, ThemeChange, ThemeStore};

/// What a control does when the user interacts with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Flips to the paired theme on activation.
    Toggle,
    /// Sets whatever theme the user picked.
    Select,
}

/// Everything a control needs to render itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub theme: ThemeName,
    pub label: String,
    pub indicator: Rgb,
    pub aria_label: String,
}

impl ControlView {
    #[must_use]
    pub fn for_theme(theme: ThemeName) -> Self {
        let label = theme.label().to_string();
        Self {
            theme,
            aria_label: format!("Toggle theme (current: {label})"),
            label,
            indicator: theme.indicator(),
        }
    }
}

/// A page element bound to the theme store.
pub trait ThemeControl {
    fn kind(&self) -> ControlKind;

    /// Whether this control has already been wired by some binding set.
    fn is_wired(&self) -> bool;

    fn mark_wired(&self);

    /// Reflect `view`. Parts the control lacks (no label slot, no
    /// indicator) are skipped.
    fn render(&self, view: &ControlView);
}

/// A user interaction routed from a control to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction<'a> {
    Toggle,
    Select(&'a str),
}

type Controls = RefCell<Vec<Rc<dyn ThemeControl>>>;

/// A set of controls wired to one store.
pub struct ThemeControls {
    store: ThemeStore,
    controls: Rc<Controls>,
    _subscription: Subscription,
}

impl fmt::Debug for ThemeControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeControls")
            .field("controls", &self.controls.borrow().len())
            .finish_non_exhaustive()
    }
}

impl ThemeControls {
    /// Create an empty set subscribed to `store`.
    #[must_use]
    pub fn new(store: &ThemeStore) -> Self {
        let controls: Rc<Controls> = Rc::new(RefCell::new(Vec::new()));
        let weak: Weak<Controls> = Rc::downgrade(&controls);
        let subscription = store.subscribe(move |change: &ThemeChange| {
            if let Some(controls) = weak.upgrade() {
                render_all(&controls, change.theme);
            }
        });
        Self {
            store: store.clone(),
            controls,
            _subscription: subscription,
        }
    }

    /// Wire `control` unless it is already wired. Returns whether it was
    /// newly wired.
    pub fn wire(&self, control: Rc<dyn ThemeControl>) -> bool {
        if control.is_wired() {
            return false;
        }
        control.mark_wired();
        control.render(&ControlView::for_theme(self.store.get_theme()));
        debug!(kind = ?control.kind(), "theme control wired");
        self.controls.borrow_mut().push(control);
        true
    }

    /// Wire many controls; returns how many were new.
    pub fn wire_all(&self, controls: impl IntoIterator<Item = Rc<dyn ThemeControl>>) -> usize {
        controls
            .into_iter()
            .filter(|control| self.wire(Rc::clone(control)))
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.borrow().is_empty()
    }

    /// Route an interaction to the store.
    pub fn act(&self, action: ControlAction<'_>) -> Result<ThemeChange, InvalidTheme> {
        match action {
            ControlAction::Toggle => Ok(self.store.toggle_theme()),
            ControlAction::Select(value) => self.store.set_theme_str(value),
        }
    }

    /// Re-render every control from the store's current value.
    pub fn refresh(&self) {
        render_all(&self.controls, self.store.get_theme());
    }
}

fn render_all(controls: &Controls, theme: ThemeName) {
    let view = ControlView::for_theme(theme);
    // Snapshot so a control's render may wire further controls.
    let snapshot: Vec<Rc<dyn ThemeControl>> = controls.borrow().iter().cloned().collect();
    for control in snapshot {
        control.render(&view);
    }
}

/// A recording control for tests and headless use.
#[derive(Debug)]
pub struct MemoryControl {
    kind: ControlKind,
    has_indicator: bool,
    wired: Cell<bool>,
    renders: RefCell<Vec<ControlView>>,
}

impl MemoryControl {
    #[must_use]
    pub fn new(kind: ControlKind) -> Rc<Self> {
        Rc::new(Self {
            kind,
            has_indicator: true,
            wired: Cell::new(false),
            renders: RefCell::new(Vec::new()),
        })
    }

    /// A toggle without an indicator slot.
    #[must_use]
    pub fn without_indicator(kind: ControlKind) -> Rc<Self> {
        Rc::new(Self {
            kind,
            has_indicator: false,
            wired: Cell::new(false),
            renders: RefCell::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn last_view(&self) -> Option<ControlView> {
        self.renders.borrow().last().cloned()
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders.borrow().len()
    }

    #[must_use]
    pub fn last_label(&self) -> Option<String> {
        self.last_view().map(|view| view.label)
    }

    #[must_use]
    pub fn last_indicator(&self) -> Option<Rgb> {
        if self.has_indicator {
            self.last_view().map(|view| view.indicator)
        } else {
            None
        }
    }
}

impl ThemeControl for MemoryControl {
    fn kind(&self) -> ControlKind {
        self.kind
    }

    fn is_wired(&self) -> bool {
        self.wired.get()
    }

    fn mark_wired(&self) {
        self.wired.set(true);
    }

    fn render(&self, view: &ControlView) {
        self.renders.borrow_mut().push(view.clone());
    }
}
