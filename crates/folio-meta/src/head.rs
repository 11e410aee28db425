//! Head-metadata extraction from HTML.
//!
//! This is deliberately not an HTML parser. Each field has an ordered chain
//! of small, independent [`Extractor`]s over the raw markup; the first one
//! that yields a non-empty value wins.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Fallback icon path used when a page declares none.
pub const FAVICON_PATH: &str = "/favicon.ico";

static META_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<meta\b([^>]*)>"));
static LINK_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<link\b([^>]*)>"));
static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)<title\b[^>]*>(.*?)</title\s*>"));
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
});
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is valid")
}

/// One way of finding a value in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// `<meta>` whose `property` or `name` equals the key; yields `content`.
    Meta(&'static str),
    /// The text of `<title>`.
    TitleTag,
    /// `<link>` whose `rel` contains the token; yields `href`.
    LinkRel(&'static str),
}

/// Title sources in priority order.
pub const TITLE_CHAIN: &[Extractor] = &[
    Extractor::Meta("og:title"),
    Extractor::Meta("twitter:title"),
    Extractor::TitleTag,
];

/// Description sources in priority order.
pub const DESCRIPTION_CHAIN: &[Extractor] = &[
    Extractor::Meta("description"),
    Extractor::Meta("og:description"),
    Extractor::Meta("twitter:description"),
];

/// Icon sources in priority order; [`FAVICON_PATH`] applies when all miss.
pub const ICON_CHAIN: &[Extractor] = &[
    Extractor::LinkRel("icon"),
    Extractor::LinkRel("apple-touch-icon"),
];

impl Extractor {
    /// Run this extractor over `html`.
    pub fn extract(&self, html: &str) -> Option<String> {
        match self {
            Self::Meta(key) => tags(&META_TAG, html)
                .find(|attrs| {
                    ["property", "name"]
                        .iter()
                        .any(|a| attrs.get(*a).is_some_and(|v| v.trim().eq_ignore_ascii_case(key)))
                })
                .and_then(|attrs| attrs.get("content").and_then(|c| clean_text(c))),
            Self::TitleTag => TITLE_TAG
                .captures(html)
                .and_then(|c| c.get(1))
                .and_then(|m| clean_text(m.as_str())),
            Self::LinkRel(token) => tags(&LINK_TAG, html)
                .find(|attrs| {
                    attrs.get("rel").is_some_and(|rel| {
                        rel.split_ascii_whitespace()
                            .any(|t| t.eq_ignore_ascii_case(token))
                    })
                })
                .and_then(|attrs| attrs.get("href").map(|h| decode_entities(h.trim())))
                .filter(|href| !href.is_empty()),
        }
    }
}

/// Run a chain, returning the first hit.
pub fn first_match(chain: &[Extractor], html: &str) -> Option<String> {
    chain.iter().find_map(|e| e.extract(html))
}

/// The three head fields before URL resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadFields {
    /// Page title.
    pub title: Option<String>,
    /// Page description.
    pub description: Option<String>,
    /// Icon href as written in the page (possibly relative).
    pub icon_href: String,
}

/// Extract all head fields from a page.
pub fn extract(html: &str) -> HeadFields {
    HeadFields {
        title: first_match(TITLE_CHAIN, html),
        description: first_match(DESCRIPTION_CHAIN, html),
        icon_href: first_match(ICON_CHAIN, html).unwrap_or_else(|| FAVICON_PATH.to_string()),
    }
}

/// Attributes of every tag matched by `tag`, names lower-cased.
fn tags<'a>(
    tag: &'a Regex,
    html: &'a str,
) -> impl Iterator<Item = HashMap<String, String>> + 'a {
    tag.captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| attributes(m.as_str()))
}

fn attributes(raw: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for cap in ATTRIBUTE.captures_iter(raw) {
        let name = cap[1].to_ascii_lowercase();
        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .or_else(|| cap.get(4))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        out.entry(name).or_insert(value);
    }
    out
}

/// Decode entities, collapse whitespace and trim; `None` when empty.
fn clean_text(raw: &str) -> Option<String> {
    let decoded = decode_entities(raw);
    let collapsed = WHITESPACE.replace_all(&decoded, " ");
    let trimmed = collapsed.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Decode numeric entities and the handful of named ones pages actually use
/// in titles. Unknown entities are left as written.
pub fn decode_entities(raw: &str) -> String {
    ENTITY
        .replace_all(raw, |c: &Captures<'_>| {
            let body = &c[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| c[0].to_string(), |ch| ch.to_string())
        })
        .into_owned()
}
