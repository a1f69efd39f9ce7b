//! Property-based invariant tests for the theme store.
//!
//! 1. `set_theme(t)` then `get_theme()` returns `t`
//! 2. Rejected names leave the theme unchanged
//! 3. Toggling twice is the identity
//! 4. Exactly one theme class token (none for the default) after any set
//! 5. Arbitrary operation sequences keep storage, cookie and document agreeing

use proptest::prelude::*;
use vpc_runtime::{
    CookieJar, MemoryCookies, MemoryDocument, MemoryStorage, ThemeStore,
};
use vpc_style::ThemeName;

// ── Strategies ──────────────────────────────────────────────────────────

fn theme_strategy() -> impl Strategy<Value = ThemeName> {
    prop::sample::select(ThemeName::ALL.to_vec())
}

#[derive(Debug, Clone)]
enum Op {
    Set(ThemeName),
    SetStr(String),
    Toggle,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        theme_strategy().prop_map(Op::Set),
        "[a-z-]{0,12}".prop_map(Op::SetStr),
        Just(Op::Toggle),
    ]
}

struct Page {
    storage: MemoryStorage,
    cookies: MemoryCookies,
    document: MemoryDocument,
    store: ThemeStore,
}

fn page() -> Page {
    let storage = MemoryStorage::new();
    let cookies = MemoryCookies::new();
    let document = MemoryDocument::new();
    let store = ThemeStore::builder()
        .storage(storage.clone())
        .cookies(cookies.clone())
        .document(document.clone())
        .build();
    Page {
        storage,
        cookies,
        document,
        store,
    }
}

fn theme_classes(document: &MemoryDocument) -> Vec<String> {
    document
        .classes()
        .into_iter()
        .filter(|class| class.starts_with("theme-"))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_then_get_returns_value(theme in theme_strategy()) {
        let page = page();
        page.store.set_theme(theme);
        prop_assert_eq!(page.store.get_theme(), theme);
    }

    #[test]
    fn rejected_name_leaves_theme(start in theme_strategy(), name in "[a-z]{1,8}[0-9]") {
        let page = page();
        page.store.set_theme(start);
        prop_assert!(page.store.set_theme_str(&name).is_err());
        prop_assert_eq!(page.store.get_theme(), start);
    }

    #[test]
    fn double_toggle_is_identity(theme in theme_strategy()) {
        let page = page();
        page.store.set_theme(theme);
        page.store.toggle_theme();
        prop_assert_ne!(page.store.get_theme(), theme);
        page.store.toggle_theme();
        prop_assert_eq!(page.store.get_theme(), theme);
    }

    #[test]
    fn one_class_token_after_set(theme in theme_strategy()) {
        let page = page();
        page.store.set_theme(theme.toggled());
        page.store.set_theme(theme);

        let attr = page.document.data_attribute("theme");
        prop_assert_eq!(attr.as_deref(), Some(theme.as_str()));
        let classes = theme_classes(&page.document);
        match theme.class_token() {
            Some(token) => prop_assert_eq!(classes, vec![token.to_string()]),
            None => prop_assert!(classes.is_empty()),
        }
    }

    #[test]
    fn persistence_tracks_in_memory_value(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let page = page();
        page.store.init();
        for op in &ops {
            match op {
                Op::Set(theme) => {
                    page.store.set_theme(*theme);
                }
                Op::SetStr(name) => {
                    let _ = page.store.set_theme_str(name);
                }
                Op::Toggle => {
                    page.store.toggle_theme();
                }
            }
        }

        let current = page.store.get_theme();
        let attr = page.document.data_attribute("theme");
        prop_assert_eq!(attr.as_deref(), Some(current.as_str()));
        prop_assert!(theme_classes(&page.document).len() <= 1);
        if page.storage.write_count() > 0 {
            let stored = page.storage.peek("vpc_theme");
            prop_assert_eq!(stored.as_deref(), Some(current.as_str()));
            let cookie = page.cookies.get("vpc_theme").expect("memory jar");
            prop_assert_eq!(cookie.as_deref(), Some(current.as_str()));
        }
    }
}
