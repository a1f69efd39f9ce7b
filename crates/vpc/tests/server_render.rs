//! Server-side rendering through the facade: a request's cookies drive both
//! the first-paint attributes and the store a template would consult.

use pretty_assertions::assert_eq;
use tracing_test::traced_test;
use vpc::prelude::*;
use vpc::{LaunchOverrides, root_attributes};

#[test]
fn cookie_header_and_layer_agree() {
    let header = "cart=3; vpc_theme=chaos; vpc_style=aurora";
    let config = ThemeConfig::default();

    let attrs = root_attributes(header, &config);
    let layer = ThemeLayer::from_cookie_header(header, config);
    layer.init();

    assert_eq!(layer.root_attributes(), attrs);
    assert_eq!(
        attrs.to_html_attributes(),
        "data-theme=\"chaos\" data-style=\"aurora\" class=\"theme-chaos\" \
         style=\"--color-bg: #0d0b12; --color-text: #f1eafe;\""
    );
    assert!(layer.document.has_class("theme-chaos"));
}

#[test]
fn launch_override_beats_cookie() {
    let layer = ThemeLayer::from_cookie_header("vpc_theme=vpc", ThemeConfig::default());
    LaunchOverrides::from_query("?theme=light").persist(&layer.storage, layer.store.config());

    let (change, _) = layer.init();
    assert_eq!(change.theme, ThemeName::Light);
    assert!(
        layer
            .cookies
            .assignments()
            .iter()
            .any(|a| a == "vpc_theme=light; path=/; max-age=31536000; SameSite=Lax")
    );
}

#[test]
fn brand_query_override_leaves_cookie_choice() {
    let layer = ThemeLayer::from_cookie_header("vpc_theme=chaos", ThemeConfig::default());
    LaunchOverrides::from_query("?theme=vpc-light").persist(&layer.storage, layer.store.config());

    let (change, _) = layer.init();
    assert_eq!(change.theme, ThemeName::Chaos);
}

#[test]
fn toggle_through_prelude_types() {
    let layer = ThemeLayer::in_memory(ThemeConfig::default());
    layer.init();
    let controls = ThemeControls::new(&layer.store);
    let change = controls.act(ControlAction::Toggle).expect("toggle");
    assert_eq!(change.theme, ThemeName::Light);
    assert!(!layer.store.is_dark());
}

#[test]
#[traced_test]
fn rejected_variant_is_logged_and_mapped() {
    let layer = ThemeLayer::in_memory(ThemeConfig::default());
    let err = layer.set_variant("neon").expect_err("unknown variant");
    assert_eq!(err.degradation(), Degradation::RejectChange);
    assert_eq!(err.error_type(), "invalid_variant");
    assert!(logs_contain("invalid style variant"));
}
