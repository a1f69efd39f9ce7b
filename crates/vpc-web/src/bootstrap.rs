#![forbid(unsafe_code)]

//! Page bootstrap and the JavaScript-facing API.
//!
//! [`install`] runs once per page:
//!
//! 1. `?theme=` / `?style=` overrides are written to `localStorage`;
//! 2. both stores are built over the browser adapters, and their changes are
//!    re-dispatched on `window` as `themechange` / `stylechange`
//!    `CustomEvent`s (`detail: {theme, previous}`);
//! 3. both stores initialize and paint `<html>`;
//! 4. `[data-theme-toggle]`, `select[data-theme-select]` and
//!    `[data-style-select]` are wired, after `DOMContentLoaded` if the
//!    document is still loading. A page with no toggle gets a fallback one
//!    first;
//! 5. a `(prefers-color-scheme: dark)` listener forwards system changes.
//!
//! Controls added to the page later are picked up by [`PageTheme::rescan`].

use std::rc::{Rc, Weak};

use js_sys::{Object, Reflect};
use tracing::{debug, info, warn};
use vpc_runtime::{
    ControlAction, LaunchOverrides, StyleStore, Subscription, ThemeChange, ThemeConfig,
    ThemeControls, ThemeStore, VariantChange,
};
use vpc_style::StyleVariant;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CustomEvent, CustomEventInit, Document, Event, EventTarget, HtmlElement, HtmlSelectElement,
    MediaQueryListEvent, Window,
};

use crate::adapters::{DocumentCookies, HtmlRoot, LocalStorage, MediaQueryScheme};
use crate::controls::{DomSelect, DomToggle, set_attribute};
use crate::error::{WebError, describe};
use crate::markup::{
    ANY_TOGGLE_SELECTOR, FallbackToggle, PREFERS_DARK_QUERY, STYLE_CHANGE_EVENT,
    STYLE_CURRENT_ATTRIBUTE, STYLE_LABEL_SELECTOR, STYLE_SELECT_SELECTOR, StyleControlShape,
    StylePatch, THEME_CHANGE_EVENT, THEME_SELECT_SELECTOR, TOGGLE_SELECTOR, WIRED_ATTRIBUTE,
    is_loading, style_display,
};

/// The runtime attached to one page.
pub struct PageTheme {
    wiring: Wiring,
    _subscriptions: Vec<Subscription>,
}

#[derive(Clone)]
struct Wiring {
    document: Document,
    store: ThemeStore,
    styles: StyleStore,
    controls: Rc<ThemeControls>,
}

/// Attach the theme runtime to the current page.
///
/// An invalid `config` is reported and replaced by the defaults.
pub fn install(config: ThemeConfig) -> Result<PageTheme, WebError> {
    let config = match config.validated() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "theme config rejected, using defaults");
            ThemeConfig::default()
        }
    };

    let window = web_sys::window().ok_or(WebError::MissingGlobal("window"))?;
    let document = window.document().ok_or(WebError::MissingGlobal("document"))?;

    let storage = LocalStorage::from_window(&window);
    apply_launch_overrides(&window, &storage, &config);

    let cookies = DocumentCookies::new(&document)?;
    let root = HtmlRoot::new(&document)?;
    let store = ThemeStore::builder()
        .config(config.clone())
        .storage(storage.clone())
        .cookies(cookies.clone())
        .document(root.clone())
        .color_scheme(MediaQueryScheme::new(&window))
        .build();
    let styles = StyleStore::new(config, storage, cookies, root);

    let subscriptions = vec![
        forward_theme_changes(&window, &store),
        forward_style_changes(&window, &document, &styles),
    ];
    store.init();
    styles.init();

    let wiring = Wiring {
        controls: Rc::new(ThemeControls::new(&store)),
        document: document.clone(),
        store,
        styles,
    };
    listen_for_system_scheme(&window, &wiring.store)?;

    if is_loading(&document.ready_state()) {
        let deferred = wiring.clone();
        listen(&document, "DOMContentLoaded", move |_| {
            if let Err(err) = deferred.scan() {
                warn!(error = %err, "theme control discovery failed");
            }
        })?;
    } else {
        wiring.scan()?;
    }

    info!(theme = %wiring.store.get_theme(), "theme runtime installed");
    Ok(PageTheme {
        wiring,
        _subscriptions: subscriptions,
    })
}

impl PageTheme {
    #[must_use]
    pub fn store(&self) -> &ThemeStore {
        &self.wiring.store
    }

    #[must_use]
    pub fn styles(&self) -> &StyleStore {
        &self.wiring.styles
    }

    /// Wire controls added since the last scan. Returns how many were new.
    pub fn rescan(&self) -> Result<usize, WebError> {
        self.wiring.scan()
    }
}

impl Wiring {
    fn scan(&self) -> Result<usize, WebError> {
        let mut wired = 0;
        self.inject_fallback_toggle()?;

        for button in query_all::<HtmlElement>(&self.document, TOGGLE_SELECTOR)? {
            if !self.controls.wire(Rc::new(DomToggle::new(button.clone()))) {
                continue;
            }
            let controls = Rc::downgrade(&self.controls);
            listen(&button, "click", move |event: Event| {
                event.prevent_default();
                act(&controls, ControlAction::Toggle);
            })?;
            wired += 1;
        }

        for select in query_all::<HtmlSelectElement>(&self.document, THEME_SELECT_SELECTOR)? {
            if !self.controls.wire(Rc::new(DomSelect::new(select.clone()))) {
                continue;
            }
            let controls = Rc::downgrade(&self.controls);
            let target = select.clone();
            listen(&select, "change", move |_| {
                act(&controls, ControlAction::Select(&target.value()));
            })?;
            wired += 1;
        }

        for control in query_all::<HtmlElement>(&self.document, STYLE_SELECT_SELECTOR)? {
            if control.has_attribute(WIRED_ATTRIBUTE) {
                continue;
            }
            set_attribute(&control, WIRED_ATTRIBUTE, "true");
            let shape = StyleControlShape::from_tag(&control.tag_name());
            let styles = self.styles.clone();
            let document = self.document.clone();
            let target = control.clone();
            listen(&control, shape.event(), move |event: Event| {
                match target.dyn_ref::<HtmlSelectElement>() {
                    Some(select) => {
                        if styles.set_variant_str(&select.value()).is_err() {
                            render_style_controls(&document, styles.get_variant());
                        }
                    }
                    None => {
                        event.prevent_default();
                        styles.cycle_variant();
                    }
                }
            })?;
            wired += 1;
        }
        render_style_controls(&self.document, self.styles.get_variant());

        debug!(wired, "theme controls scanned");
        Ok(wired)
    }

    fn inject_fallback_toggle(&self) -> Result<(), WebError> {
        let has_toggle = self
            .document
            .query_selector(ANY_TOGGLE_SELECTOR)
            .map_err(|err| WebError::js("querySelector", &err))?
            .is_some();
        let Some(plan) = FallbackToggle::plan(has_toggle) else {
            return Ok(());
        };
        let Some(body) = self.document.body() else {
            debug!("no <body>, fallback theme toggle skipped");
            return Ok(());
        };

        let create = |tag: &str| {
            self.document
                .create_element(tag)
                .map_err(|err| WebError::js("createElement", &err))
        };
        let container = create("div")?;
        set_attribute(&container, "style", plan.container_style);
        let button = create("button")?;
        for (name, value) in plan.button_attributes() {
            set_attribute(&button, name, value);
        }
        button.set_inner_html(plan.inner_html);

        container
            .append_child(&button)
            .and_then(|_| body.append_child(&container))
            .map_err(|err| WebError::js("appendChild", &err))?;
        debug!("fallback theme toggle injected");
        Ok(())
    }
}

fn act(controls: &Weak<ThemeControls>, action: ControlAction<'_>) {
    let Some(controls) = controls.upgrade() else {
        return;
    };
    if controls.act(action).is_err() {
        // Put the select back on the current theme.
        controls.refresh();
    }
}

fn apply_launch_overrides(window: &Window, storage: &LocalStorage, config: &ThemeConfig) {
    let search = match window.location().search() {
        Ok(search) => search,
        Err(err) => {
            debug!(reason = %describe(&err), "location.search unavailable");
            return;
        }
    };
    let overrides = LaunchOverrides::from_query(&search);
    if !overrides.is_empty() {
        overrides.persist(storage, config);
    }
}

fn listen_for_system_scheme(window: &Window, store: &ThemeStore) -> Result<(), WebError> {
    let Ok(Some(list)) = window.match_media(PREFERS_DARK_QUERY) else {
        debug!("matchMedia unavailable, system scheme changes ignored");
        return Ok(());
    };
    let store = store.clone();
    listen(&list, "change", move |event: Event| {
        if let Some(event) = event.dyn_ref::<MediaQueryListEvent>() {
            store.on_system_scheme_change(event.matches());
        }
    })
}

fn forward_theme_changes(window: &Window, store: &ThemeStore) -> Subscription {
    let window = window.clone();
    store.subscribe(move |change: &ThemeChange| {
        dispatch(
            &window,
            THEME_CHANGE_EVENT,
            change.theme.as_str(),
            change.previous.as_str(),
        );
    })
}

fn forward_style_changes(window: &Window, document: &Document, styles: &StyleStore) -> Subscription {
    let window = window.clone();
    let document = document.clone();
    styles.subscribe(move |change: &VariantChange| {
        render_style_controls(&document, change.variant);
        dispatch(
            &window,
            STYLE_CHANGE_EVENT,
            change.variant.as_str(),
            change.previous.as_str(),
        );
    })
}

fn render_style_controls(document: &Document, variant: StyleVariant) {
    let (label, _) = style_display(variant);
    if let Ok(labels) = query_all::<HtmlElement>(document, STYLE_LABEL_SELECTOR) {
        for element in labels {
            element.set_text_content(Some(label));
        }
    }
    let Ok(controls) = query_all::<HtmlElement>(document, STYLE_SELECT_SELECTOR) else {
        return;
    };
    for control in controls {
        let shape = StyleControlShape::from_tag(&control.tag_name());
        match StylePatch::new(shape, variant) {
            StylePatch::Value(value) => {
                if let Some(select) = control.dyn_ref::<HtmlSelectElement>() {
                    select.set_value(value);
                }
            }
            StylePatch::CurrentAttribute(value) => {
                set_attribute(&control, STYLE_CURRENT_ATTRIBUTE, value);
            }
        }
    }
}

fn dispatch(window: &Window, name: &str, current: &str, previous: &str) {
    let detail = Object::new();
    let key = if name == STYLE_CHANGE_EVENT {
        "style"
    } else {
        "theme"
    };
    let filled = Reflect::set(&detail, &JsValue::from_str(key), &JsValue::from_str(current))
        .and_then(|_| {
            Reflect::set(
                &detail,
                &JsValue::from_str("previous"),
                &JsValue::from_str(previous),
            )
        });
    if let Err(err) = filled {
        debug!(event = name, reason = %describe(&err), "event detail incomplete");
    }

    let init = CustomEventInit::new();
    init.set_detail(&detail);
    match CustomEvent::new_with_event_init_dict(name, &init) {
        Ok(event) => {
            if let Err(err) = window.dispatch_event(&event) {
                debug!(event = name, reason = %describe(&err), "event listener threw");
            }
        }
        Err(err) => debug!(event = name, reason = %describe(&err), "CustomEvent unavailable"),
    }
}

fn query_all<T: JsCast>(document: &Document, selector: &'static str) -> Result<Vec<T>, WebError> {
    let list = document
        .query_selector_all(selector)
        .map_err(|err| WebError::js("querySelectorAll", &err))?;
    Ok((0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}

/// Attach `handler` for the lifetime of the page.
fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), WebError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|err| WebError::js("addEventListener", &err))?;
    closure.forget();
    Ok(())
}

// ── JavaScript API ──────────────────────────────────────────────────────

/// `window.themeAPI`-style handle returned by `installTheme()`.
#[wasm_bindgen]
pub struct ThemeApi {
    page: PageTheme,
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen]
impl ThemeApi {
    #[wasm_bindgen(js_name = getTheme)]
    pub fn get_theme(&self) -> String {
        self.page.store().get_theme().as_str().to_string()
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, name: &str) -> Result<(), JsValue> {
        self.page
            .store()
            .set_theme_str(name)
            .map(|_| ())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> String {
        self.page.store().toggle_theme().theme.as_str().to_string()
    }

    #[wasm_bindgen(js_name = getThemeLabel)]
    pub fn theme_label(&self, name: &str) -> String {
        self.page.store().theme_label(name)
    }

    #[wasm_bindgen(js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        self.page.store().is_dark()
    }

    #[wasm_bindgen(js_name = getStyle)]
    pub fn get_style(&self) -> String {
        self.page.styles().get_variant().as_str().to_string()
    }

    #[wasm_bindgen(js_name = setStyle)]
    pub fn set_style(&self, name: &str) -> Result<(), JsValue> {
        self.page
            .styles()
            .set_variant_str(name)
            .map(|_| ())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = cycleStyle)]
    pub fn cycle_style(&self) -> String {
        self.page.styles().cycle_variant().variant.as_str().to_string()
    }

    pub fn rescan(&self) -> Result<u32, JsValue> {
        let wired = self.page.rescan()?;
        Ok(u32::try_from(wired).unwrap_or(u32::MAX))
    }
}

/// Bootstrap with the default configuration.
#[wasm_bindgen(js_name = installTheme)]
pub fn install_theme() -> Result<ThemeApi, JsValue> {
    let page = install(ThemeConfig::default())?;
    Ok(ThemeApi { page })
}
