//! Lightweight `key: value` frontmatter stripper for markdown documents.
//! Not a full YAML parser (the workspace doesn't carry one) — good enough
//! to pull metadata fields out before the body is chunked as text.

use std::collections::BTreeMap;

pub struct Frontmatter {
    pub fields: BTreeMap<String, String>,
    pub body: String,
}

pub fn split_frontmatter(source: &str) -> Frontmatter {
    let mut lines = source.lines();
    if lines.next() != Some("---") {
        return Frontmatter { fields: BTreeMap::new(), body: source.to_string() };
    }

    let mut fields = BTreeMap::new();
    let mut consumed = 1usize;
    let mut closed = false;

    for line in source.lines().skip(1) {
        consumed += 1;
        if line.trim() == "---" {
            closed = true;
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), value.trim().trim_matches('"').to_string());
        }
    }

    if !closed {
        return Frontmatter { fields: BTreeMap::new(), body: source.to_string() };
    }

    let body = source.lines().skip(consumed).collect::<Vec<_>>().join("\n");
    Frontmatter { fields, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_fields() {
        let source = "---\ntitle: Hello\ntags: a, b\n---\n# Body\ntext here\n";
        let fm = split_frontmatter(source);
        assert_eq!(fm.fields.get("title").map(String::as_str), Some("Hello"));
        assert!(fm.body.starts_with("# Body"));
    }

    #[test]
    fn no_frontmatter_returns_source_unchanged() {
        let source = "# Just a heading\nbody text\n";
        let fm = split_frontmatter(source);
        assert!(fm.fields.is_empty());
        assert_eq!(fm.body, source);
    }

    #[test]
    fn unclosed_frontmatter_is_left_untouched() {
        let source = "---\ntitle: Hello\nno closing delimiter\n";
        let fm = split_frontmatter(source);
        assert!(fm.fields.is_empty());
        assert_eq!(fm.body, source);
    }
}
