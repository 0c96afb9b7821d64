//! Tree-sitter backed symbol extraction, one [`TreeSitterParser`] instance
//! per language. Each instance runs a small set of queries over the parse
//! tree to pull out top-level symbols; the chunker never inspects the
//! underlying `tree_sitter::Tree` directly, only the `Vec<Symbol>` that
//! falls out of it, so we don't need to keep a borrowed tree alive past
//! `parse()`.

mod go;
mod javascript;
mod python;
mod rust;
mod typescript;

use std::sync::Mutex;

use tree_sitter::{Query, QueryCursor};

use succ_core::traits::{Parser, Symbol, SymbolKind, Tree};

/// One query plus the capture names needed to turn a match into a [`Symbol`].
struct SymbolQuery {
    query: Query,
    /// Capture spanning the whole symbol (used for the byte/line range).
    node_capture: &'static str,
    /// Capture holding the symbol's identifier.
    name_capture: &'static str,
    kind: SymbolKind,
}

/// Generic tree-sitter parser driven entirely by its query set; language
/// differences live in the per-language constructors in the sibling
/// modules, not in this type.
pub struct TreeSitterParser {
    parser: Mutex<tree_sitter::Parser>,
    queries: Vec<SymbolQuery>,
    languages: Vec<&'static str>,
}

impl TreeSitterParser {
    fn new(
        language: tree_sitter::Language,
        languages: Vec<&'static str>,
        specs: Vec<(&str, &'static str, &'static str, SymbolKind)>,
    ) -> Self {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language)
            .expect("bundled tree-sitter grammar version mismatch");

        let queries = specs
            .into_iter()
            .map(|(source, node_capture, name_capture, kind)| {
                let query = Query::new(&language, source)
                    .unwrap_or_else(|e| panic!("invalid query for {languages:?}: {e}"));
                SymbolQuery { query, node_capture, name_capture, kind }
            })
            .collect();

        Self { parser: Mutex::new(parser), queries, languages }
    }
}

impl Parser for TreeSitterParser {
    fn languages(&self) -> &[&str] {
        &self.languages
    }

    fn parse(&self, source: &str) -> Option<Box<dyn Tree>> {
        let tree = {
            let mut parser = self.parser.lock().ok()?;
            parser.parse(source, None)?
        };

        let root = tree.root_node();
        let bytes = source.as_bytes();
        let mut symbols = Vec::new();

        for sq in &self.queries {
            let mut cursor = QueryCursor::new();
            let matches = cursor.matches(&sq.query, root, bytes);
            for m in matches {
                let mut name = None;
                let mut node = None;
                for capture in m.captures {
                    let capture_name = sq.query.capture_names()[capture.index as usize];
                    if capture_name == sq.name_capture {
                        name = capture.node.utf8_text(bytes).ok().map(str::to_string);
                    }
                    if capture_name == sq.node_capture {
                        node = Some(capture.node);
                    }
                }
                if let (Some(name), Some(node)) = (name, node) {
                    symbols.push(build_symbol(source, node, name, sq.kind));
                }
            }
        }

        symbols.sort_by_key(|s| s.start_byte);
        Some(Box::new(StaticTree { symbols }))
    }
}

struct StaticTree {
    symbols: Vec<Symbol>,
}

impl Tree for StaticTree {
    fn symbols(&self) -> Vec<Symbol> {
        self.symbols.clone()
    }
}

/// Builds a [`Symbol`] for `node`, extending its start backward over any
/// contiguous leading comment/attribute/decorator lines so the chunk keeps
/// doc comments attached to the symbol they document.
fn build_symbol(source: &str, node: tree_sitter::Node, name: String, kind: SymbolKind) -> Symbol {
    let node_start_line0 = node.start_position().row;
    let (start_byte, start_line) = extend_over_leading_comments(source, node_start_line0);

    Symbol {
        name,
        kind,
        start_byte,
        end_byte: node.end_byte(),
        start_line,
        end_line: node.end_position().row as u32 + 1,
    }
}

fn extend_over_leading_comments(source: &str, symbol_start_line0: usize) -> (usize, u32) {
    let lines: Vec<&str> = source.lines().collect();
    let mut first = symbol_start_line0;

    while first > 0 {
        let prev = lines[first - 1].trim_start();
        let is_comment_like = prev.starts_with("//")
            || prev.starts_with('#')
            || prev.starts_with('@')
            || prev.starts_with("/*")
            || prev.starts_with('*');
        if prev.is_empty() || !is_comment_like {
            break;
        }
        first -= 1;
    }

    let start_byte: usize = lines[..first].iter().map(|l| l.len() + 1).sum();
    (start_byte, (first + 1) as u32)
}

/// All bundled language parsers, one per supported grammar.
pub fn all_parsers() -> Vec<Box<dyn Parser>> {
    vec![
        Box::new(rust::parser()),
        Box::new(python::parser()),
        Box::new(typescript::parser()),
        Box::new(javascript::parser()),
        Box::new(go::parser()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_function_keeps_leading_doc_comment() {
        let source = "/// Adds two numbers.\npub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n";
        let parser = rust::parser();
        let tree = parser.parse(source).expect("parses");
        let symbols = tree.symbols();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "add");
        assert_eq!(symbols[0].start_line, 1);
    }
}
