//! Frontmatter extraction.
//!
//! Documents may start with a block like:
//!
//! ```text
//! ---
//! title: "Hello: World"
//! date: 2024-05-01
//! ---
//! body...
//! ```
//!
//! Only four keys are recognised (`title`, `summary`, `date`, `cover`).
//! Parsing is line based rather than YAML: values are taken verbatim after
//! the first colon, so colons inside values need no quoting.

use serde::{Deserialize, Serialize};

const DELIMITER: &str = "---";

/// Metadata pulled from a document's frontmatter block.
///
/// Every field is optional; a document without frontmatter yields the
/// default (all `None`) record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short summary used in listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Publication date, kept as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Cover image URL or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

impl PostMetadata {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.summary.is_none() && self.date.is_none() && self.cover.is_none()
    }

    /// Render this record as a frontmatter block, including both delimiters
    /// and a trailing newline. Values are double-quoted so that leading or
    /// trailing quote characters in the value survive a re-parse.
    pub fn to_frontmatter(&self) -> String {
        let mut out = String::from("---\n");
        for (key, value) in self.fields() {
            if let Some(value) = value {
                out.push_str(key);
                out.push_str(": \"");
                out.push_str(value);
                out.push_str("\"\n");
            }
        }
        out.push_str("---\n");
        out
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("title", self.title.as_deref()),
            ("summary", self.summary.as_deref()),
            ("date", self.date.as_deref()),
            ("cover", self.cover.as_deref()),
        ]
    }

    fn set(&mut self, key: &str, value: String) {
        match key {
            "title" => self.title = Some(value),
            "summary" => self.summary = Some(value),
            "date" => self.date = Some(value),
            "cover" => self.cover = Some(value),
            _ => {}
        }
    }
}

/// Parse the frontmatter at the head of `text`.
///
/// Never fails: a missing or unterminated block gives an empty record.
///
/// # Example
///
/// ```
/// use folio_content::frontmatter::parse;
///
/// let meta = parse("---\ntitle: 'Notes'\nauthor: me\n---\n# Body");
/// assert_eq!(meta.title.as_deref(), Some("Notes"));
/// assert!(meta.summary.is_none());
/// ```
pub fn parse(text: &str) -> PostMetadata {
    split(text).0
}

/// Parse the frontmatter and return it with the remaining body.
///
/// When there is no valid block the body is the whole input.
pub fn split(text: &str) -> (PostMetadata, &str) {
    let source = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (PostMetadata::default(), text);
    };
    if !is_delimiter(first) {
        return (PostMetadata::default(), text);
    }

    let mut meta = PostMetadata::default();
    let mut consumed = first.len();
    for line in lines {
        consumed += line.len();
        if is_delimiter(line) {
            return (meta, &source[consumed..]);
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_ascii_lowercase();
            meta.set(&key, unquote(value.trim()).to_string());
        }
    }

    log::debug!("frontmatter block has no closing delimiter; ignoring it");
    (PostMetadata::default(), text)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == DELIMITER
}

/// Strip one layer of matching single or double quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_all_fields() {
        let text = "---\ntitle: Hello\nsummary: A post\ndate: 2024-01-02\ncover: /img/a.png\n---\nbody";
        let meta = parse(text);
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.summary.as_deref(), Some("A post"));
        assert_eq!(meta.date.as_deref(), Some("2024-01-02"));
        assert_eq!(meta.cover.as_deref(), Some("/img/a.png"));
    }

    #[test]
    fn test_parse_colon_inside_value() {
        let meta = parse("---\ntitle: Rust: the good parts\ncover: https://x.test/a.png\n---\n");
        assert_eq!(meta.title.as_deref(), Some("Rust: the good parts"));
        assert_eq!(meta.cover.as_deref(), Some("https://x.test/a.png"));
    }

    #[test]
    fn test_parse_strips_one_quote_layer() {
        let meta = parse("---\ntitle: \"'quoted'\"\nsummary: 'single'\n---\n");
        assert_eq!(meta.title.as_deref(), Some("'quoted'"));
        assert_eq!(meta.summary.as_deref(), Some("single"));
    }

    #[test]
    fn test_parse_mismatched_quotes_kept() {
        let meta = parse("---\ntitle: \"half'\n---\n");
        assert_eq!(meta.title.as_deref(), Some("\"half'"));
    }

    #[test]
    fn test_parse_ignores_unknown_keys_and_junk_lines() {
        let meta = parse("---\nauthor: me\ntags: [a, b]\njust text\ntitle: T\n---\n");
        assert_eq!(
            meta,
            PostMetadata {
                title: Some("T".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_parse_key_case_and_whitespace() {
        let meta = parse("---\n  Title  :   Spaced   \n---\n");
        assert_eq!(meta.title.as_deref(), Some("Spaced"));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let meta = parse("---\ntitle: one\ntitle: two\n---\n");
        assert_eq!(meta.title.as_deref(), Some("two"));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_no_block() {
        assert!(parse("# Title\n\ntitle: not frontmatter\n").is_empty());
    }

    #[test]
    fn test_parse_block_not_at_start() {
        assert!(parse("\n---\ntitle: late\n---\n").is_empty());
    }

    #[test]
    fn test_parse_unterminated_block() {
        assert!(parse("---\ntitle: never closed\nbody").is_empty());
    }

    #[test]
    fn test_parse_delimiter_must_be_exact() {
        assert!(parse("----\ntitle: x\n----\n").is_empty());
        assert!(parse("--- \ntitle: x\n---\n").is_empty());
    }

    #[test]
    fn test_parse_crlf() {
        let meta = parse("---\r\ntitle: Windows\r\n---\r\nbody");
        assert_eq!(meta.title.as_deref(), Some("Windows"));
    }

    #[test]
    fn test_parse_bom() {
        let meta = parse("\u{feff}---\ntitle: Bom\n---\n");
        assert_eq!(meta.title.as_deref(), Some("Bom"));
    }

    #[test]
    fn test_parse_closing_delimiter_at_eof() {
        let meta = parse("---\ndate: 2020\n---");
        assert_eq!(meta.date.as_deref(), Some("2020"));
    }

    #[test]
    fn test_split_returns_body() {
        let (meta, body) = split("---\ntitle: T\n---\n# Heading\n");
        assert_eq!(meta.title.as_deref(), Some("T"));
        assert_eq!(body, "# Heading\n");
    }

    #[test]
    fn test_split_without_block_returns_whole_text() {
        let (meta, body) = split("plain");
        assert!(meta.is_empty());
        assert_eq!(body, "plain");
    }

    #[test]
    fn test_serialize_skips_missing_fields() {
        let meta = PostMetadata {
            date: Some("2024".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&meta).unwrap(), r#"{"date":"2024"}"#);
    }

    fn field() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[^\r\n\u{feff}]{0,24}".prop_map(|s| s.trim().to_string()))
    }

    proptest! {
        #[test]
        fn prop_no_leading_delimiter_is_empty(body in "[^-\u{feff}][^\u{0}]{0,200}") {
            prop_assert!(parse(&body).is_empty());
        }

        #[test]
        fn prop_render_then_parse_is_stable(
            title in field(),
            summary in field(),
            date in field(),
            cover in field(),
            body in "[^\u{0}]{0,80}",
        ) {
            let meta = PostMetadata { title, summary, date, cover };
            let doc = format!("{}{}", meta.to_frontmatter(), body);
            let first = parse(&doc);
            prop_assert_eq!(&first, &meta);

            let again = format!("{}{}", first.to_frontmatter(), body);
            prop_assert_eq!(parse(&again), first);
        }
    }
}
