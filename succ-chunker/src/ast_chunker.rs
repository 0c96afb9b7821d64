//! Turns a parser's flat `Vec<Symbol>` into chunks: one per top-level
//! symbol (doc-comments included via the symbol's own start), plus a
//! chunk for any non-trivial gap of lines between symbols.

use succ_core::traits::{Symbol, SymbolKind};

use crate::draft::ChunkDraft;

pub fn chunk_by_symbols(source: &str, symbols: &[Symbol]) -> Vec<ChunkDraft> {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let top_level = drop_nested(symbols);
    if top_level.is_empty() {
        return Vec::new();
    }

    let mut drafts = Vec::new();
    let mut cursor_line = 1u32;

    for symbol in &top_level {
        if symbol.start_line > cursor_line {
            push_gap_if_nontrivial(&lines, cursor_line, symbol.start_line - 1, &mut drafts);
        }

        let start = symbol.start_line.max(cursor_line);
        let end = symbol.end_line.max(start);
        drafts.push(ChunkDraft {
            content: slice_lines(&lines, start, end),
            start_line: start,
            end_line: end,
            symbol_name: Some(symbol.name.clone()),
            symbol_type: Some(symbol_kind_label(symbol.kind).to_string()),
        });
        cursor_line = end + 1;
    }

    let total_lines = lines.len() as u32;
    if cursor_line <= total_lines {
        push_gap_if_nontrivial(&lines, cursor_line, total_lines, &mut drafts);
    }

    drafts
}

/// Keeps only symbols not strictly contained within another (e.g. a
/// Python method's `function_definition` nested inside its class's).
/// Symbols must already be sorted by `start_byte` ascending (the parser
/// guarantees this).
fn drop_nested(symbols: &[Symbol]) -> Vec<Symbol> {
    let mut kept = Vec::new();
    let mut frontier_end = 0usize;

    for symbol in symbols {
        if symbol.start_byte >= frontier_end {
            frontier_end = symbol.end_byte;
            kept.push(symbol.clone());
        }
    }

    kept
}

fn push_gap_if_nontrivial(lines: &[&str], start: u32, end: u32, out: &mut Vec<ChunkDraft>) {
    if start > end {
        return;
    }
    let content = slice_lines(lines, start, end);
    if content.trim().is_empty() {
        return;
    }
    out.push(ChunkDraft::plain(content, start, end));
}

fn slice_lines(lines: &[&str], start: u32, end: u32) -> String {
    let start_idx = (start.saturating_sub(1)) as usize;
    let end_idx = ((end.saturating_sub(1)) as usize).min(lines.len().saturating_sub(1));
    if start_idx > end_idx || lines.is_empty() {
        return String::new();
    }
    lines[start_idx..=end_idx].join("\n")
}

fn symbol_kind_label(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Function => "function",
        SymbolKind::Method => "method",
        SymbolKind::Class => "class",
        SymbolKind::Interface => "interface",
        SymbolKind::Type => "type",
        SymbolKind::Enum => "enum",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str, kind: SymbolKind, start_byte: usize, end_byte: usize, start_line: u32, end_line: u32) -> Symbol {
        Symbol { name: name.to_string(), kind, start_byte, end_byte, start_line, end_line }
    }

    #[test]
    fn one_chunk_per_symbol_with_gap_between() {
        let source = "fn a() {\n    1;\n}\n\nfn b() {\n    2;\n}\n";
        let symbols = vec![
            sym("a", SymbolKind::Function, 0, 18, 1, 3),
            sym("b", SymbolKind::Function, 20, 38, 5, 7),
        ];
        let drafts = chunk_by_symbols(source, &symbols);
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].symbol_name.as_deref(), Some("a"));
        assert!(drafts[1].symbol_name.is_none());
        assert_eq!(drafts[2].symbol_name.as_deref(), Some("b"));
    }

    #[test]
    fn blank_gap_is_dropped() {
        let source = "fn a() {\n}\n\nfn b() {\n}\n";
        let symbols = vec![
            sym("a", SymbolKind::Function, 0, 10, 1, 2),
            sym("b", SymbolKind::Function, 12, 22, 4, 5),
        ];
        let drafts = chunk_by_symbols(source, &symbols);
        assert_eq!(drafts.len(), 2);
    }

    #[test]
    fn nested_symbol_is_dropped_in_favor_of_container() {
        let source = "class Foo:\n    def bar(self):\n        pass\n";
        let symbols = vec![
            sym("Foo", SymbolKind::Class, 0, 44, 1, 3),
            sym("bar", SymbolKind::Method, 15, 44, 2, 3),
        ];
        let drafts = chunk_by_symbols(source, &symbols);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].symbol_name.as_deref(), Some("Foo"));
    }
}
