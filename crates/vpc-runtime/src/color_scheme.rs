#![forbid(unsafe_code)]

//! Operating-system colour-scheme preference.

use std::cell::Cell;
use std::rc::Rc;

/// What `prefers-color-scheme` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    Light,
    Dark,
    #[default]
    NoPreference,
}

/// Source of the system colour-scheme preference.
pub trait ColorSchemeSource {
    fn preferred(&self) -> ColorScheme;
}

/// A preference that can be changed by hand. Clones share the value, so a
/// test can flip the "system" setting after handing a clone to a store.
#[derive(Debug, Default, Clone)]
pub struct FixedColorScheme {
    scheme: Rc<Cell<ColorScheme>>,
}

impl FixedColorScheme {
    #[must_use]
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            scheme: Rc::new(Cell::new(scheme)),
        }
    }

    pub fn set(&self, scheme: ColorScheme) {
        self.scheme.set(scheme);
    }
}

impl ColorSchemeSource for FixedColorScheme {
    fn preferred(&self) -> ColorScheme {
        self.scheme.get()
    }
}
