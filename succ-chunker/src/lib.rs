//! Text and AST-aware code chunking (C3).
//!
//! Three chunkers feed a common [`ChunkDraft`] shape: a plain-text sliding
//! window, a markdown-frontmatter-aware document chunker built on top of
//! it, and a code chunker that prefers tree-sitter symbol extraction and
//! degrades through a brace-depth heuristic down to the text chunker.

mod ast_chunker;
mod brace_fallback;
mod draft;
mod frontmatter;
mod parsers;
mod size_cap;
mod text;

pub use draft::ChunkDraft;
pub use frontmatter::Frontmatter;

use succ_core::traits::Parser;

/// Entry point for all three chunking strategies. Holds the compiled
/// tree-sitter parsers so they're built once, not per call.
pub struct Chunker {
    parsers: Vec<Box<dyn Parser>>,
}

impl Chunker {
    pub fn new() -> Self {
        Self { parsers: parsers::all_parsers() }
    }

    /// Chunks source code, preferring AST symbol extraction for
    /// `language` when a grammar is registered, degrading to a
    /// brace-depth heuristic and finally to the plain text chunker.
    pub fn chunk_code(&self, source: &str, language: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<ChunkDraft> {
        if let Some(drafts) = self.try_ast_chunk(source, language) {
            return cap_all(drafts);
        }
        cap_all(self.fallback_chunk(source, chunk_size, chunk_overlap))
    }

    /// Strips a leading `---` frontmatter block, then runs the text
    /// chunker over the remaining body.
    pub fn chunk_document(&self, source: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<ChunkDraft> {
        let fm = frontmatter::split_frontmatter(source);
        cap_all(text::chunk_text(&fm.body, chunk_size, chunk_overlap))
    }

    pub fn chunk_plain_text(&self, source: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<ChunkDraft> {
        cap_all(text::chunk_text(source, chunk_size, chunk_overlap))
    }

    fn try_ast_chunk(&self, source: &str, language: &str) -> Option<Vec<ChunkDraft>> {
        let parser = self.parsers.iter().find(|p| p.languages().contains(&language))?;
        let tree = parser.parse(source)?;
        let symbols = tree.symbols();
        if symbols.is_empty() {
            return None;
        }
        Some(ast_chunker::chunk_by_symbols(source, &symbols))
    }

    fn fallback_chunk(&self, source: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<ChunkDraft> {
        let brace_drafts = brace_fallback::chunk_by_brace_depth(source);
        if brace_drafts.is_empty() && !source.trim().is_empty() {
            text::chunk_text(source, chunk_size, chunk_overlap)
        } else {
            brace_drafts
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new()
    }
}

fn cap_all(drafts: Vec<ChunkDraft>) -> Vec<ChunkDraft> {
    drafts.into_iter().flat_map(size_cap::apply_size_cap).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_code_uses_ast_for_registered_language() {
        let chunker = Chunker::new();
        let source = "fn a() {\n    1;\n}\n\nfn b() {\n    2;\n}\n";
        let drafts = chunker.chunk_code(source, "rust", 2000, 100);
        assert!(drafts.iter().any(|d| d.symbol_name.as_deref() == Some("a")));
        assert!(drafts.iter().any(|d| d.symbol_name.as_deref() == Some("b")));
    }

    #[test]
    fn chunk_code_falls_back_for_unknown_language() {
        let chunker = Chunker::new();
        let source = "block main {\n  step {\n    1;\n  }\n}\nblock other {\n  2;\n}";
        let drafts = chunker.chunk_code(source, "cobol", 2000, 100);
        assert_eq!(drafts.len(), 2);
    }

    #[test]
    fn chunk_document_strips_frontmatter_before_chunking() {
        let chunker = Chunker::new();
        let source = "---\ntitle: Notes\n---\nfirst line\nsecond line\n";
        let drafts = chunker.chunk_document(source, 2000, 100);
        assert_eq!(drafts.len(), 1);
        assert!(!drafts[0].content.contains("title"));
    }
}
