use succ_core::traits::SymbolKind;

use super::TreeSitterParser;

pub fn parser() -> TreeSitterParser {
    let language: tree_sitter::Language = tree_sitter_javascript::LANGUAGE.into();
    TreeSitterParser::new(
        language,
        vec!["javascript"],
        vec![
            (
                r#"(function_declaration name: (identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Function,
            ),
            (
                r#"(class_declaration name: (identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Class,
            ),
            // Methods live inside `class_declaration`, which is already
            // captured above as one top-level chunk; extracting them
            // separately would just duplicate the class body.
        ],
    )
}
