use succ_core::traits::SymbolKind;

use super::TreeSitterParser;

pub fn parser() -> TreeSitterParser {
    let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
    TreeSitterParser::new(
        language,
        vec!["go"],
        vec![
            (
                r#"(function_declaration name: (identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Function,
            ),
            (
                r#"(method_declaration name: (field_identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Method,
            ),
            // Go's `type` declarations cover structs, interfaces, and plain
            // aliases under one grammar node; we don't distinguish them and
            // tag everything `Type` rather than guessing from the child shape.
            (
                r#"(type_declaration (type_spec name: (type_identifier) @name)) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Type,
            ),
        ],
    )
}
