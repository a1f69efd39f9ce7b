#![forbid(unsafe_code)]

//! Cookie header parsing and assignment formatting.
//!
//! The theme cookie mirrors durable storage so the server can read the
//! choice from the request and render the right root attributes on first
//! paint. Values written here are always theme or variant wire names
//! (`[a-z-]+`), so no percent-encoding is needed on either side.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::persistence::StorageResult;

/// One year, in seconds.
pub const ONE_YEAR_SECS: u64 = 365 * 24 * 60 * 60;

/// `SameSite` policy for written cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub enum SameSite {
    #[default]
    Lax,
    Strict,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lax => "Lax",
            Self::Strict => "Strict",
            Self::None => "None",
        })
    }
}

/// Attributes appended to every cookie assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CookieAttributes {
    pub path: String,
    pub max_age_secs: u64,
    pub same_site: SameSite,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            path: "/".into(),
            max_age_secs: ONE_YEAR_SECS,
            same_site: SameSite::Lax,
        }
    }
}

/// Format a `document.cookie` assignment.
///
/// ```
/// use vpc_runtime::cookie::{CookieAttributes, format_assignment};
///
/// let line = format_assignment("vpc_theme", "light", &CookieAttributes::default());
/// assert_eq!(line, "vpc_theme=light; path=/; max-age=31536000; SameSite=Lax");
/// ```
#[must_use]
pub fn format_assignment(name: &str, value: &str, attrs: &CookieAttributes) -> String {
    format!(
        "{name}={value}; path={}; max-age={}; SameSite={}",
        attrs.path, attrs.max_age_secs, attrs.same_site
    )
}

/// Find `name` in a `Cookie` header or `document.cookie` string.
///
/// Pairs are separated by `;` with optional whitespace. The first match wins.
#[must_use]
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then_some(value)
        })
}

/// Read/write access to the page's cookies.
pub trait CookieJar {
    /// The full `name=value; name=value` string.
    fn read_all(&self) -> StorageResult<String>;

    /// Apply one assignment as produced by [`format_assignment`].
    fn write(&self, assignment: &str) -> StorageResult<()>;

    /// Convenience lookup over [`read_all`](Self::read_all).
    fn get(&self, name: &str) -> StorageResult<Option<String>> {
        let all = self.read_all()?;
        Ok(find_cookie(&all, name).map(str::to_string))
    }
}

/// A cookie jar with nothing in it that ignores writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCookies;

impl CookieJar for NoopCookies {
    fn read_all(&self) -> StorageResult<String> {
        Ok(String::new())
    }

    fn write(&self, _assignment: &str) -> StorageResult<()> {
        Ok(())
    }
}

/// In-memory cookie jar with `document.cookie` semantics.
///
/// Writing `name=value; attrs` replaces an existing cookie of the same name
/// in place, and `max-age=0` deletes it. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct MemoryCookies {
    jar: Rc<RefCell<Vec<(String, String)>>>,
    assignments: Rc<RefCell<Vec<String>>>,
}

impl MemoryCookies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a header string such as `"vpc_theme=light; sid=abc"`.
    #[must_use]
    pub fn from_header(header: &str) -> Self {
        let jar = Self::new();
        {
            let mut cookies = jar.jar.borrow_mut();
            for pair in header.split(';').map(str::trim) {
                if let Some((name, value)) = pair.split_once('=') {
                    cookies.push((name.to_string(), value.to_string()));
                }
            }
        }
        jar
    }

    /// Every raw assignment written so far, oldest first.
    #[must_use]
    pub fn assignments(&self) -> Vec<String> {
        self.assignments.borrow().clone()
    }

    pub fn clear(&self) {
        self.jar.borrow_mut().clear();
    }
}

impl CookieJar for MemoryCookies {
    fn read_all(&self) -> StorageResult<String> {
        Ok(self
            .jar
            .borrow()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "))
    }

    fn write(&self, assignment: &str) -> StorageResult<()> {
        self.assignments.borrow_mut().push(assignment.to_string());

        let mut parts = assignment.split(';').map(str::trim);
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return Ok(());
        };
        let expired = parts
            .filter_map(|attr| attr.split_once('='))
            .any(|(key, max_age)| {
                key.eq_ignore_ascii_case("max-age")
                    && max_age.parse::<i64>().is_ok_and(|secs| secs <= 0)
            });

        let mut jar = self.jar.borrow_mut();
        let existing = jar.iter().position(|(existing, _)| existing == name);
        match (existing, expired) {
            (Some(idx), true) => {
                jar.remove(idx);
            }
            (Some(idx), false) => jar[idx].1 = value.to_string(),
            (None, true) => {}
            (None, false) => jar.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }
}
