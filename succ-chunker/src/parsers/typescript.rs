use succ_core::traits::SymbolKind;

use super::TreeSitterParser;

pub fn parser() -> TreeSitterParser {
    let language: tree_sitter::Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
    TreeSitterParser::new(
        language,
        vec!["typescript"],
        vec![
            (
                r#"(function_declaration name: (identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Function,
            ),
            (
                r#"(class_declaration name: (type_identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Class,
            ),
            (
                r#"(interface_declaration name: (type_identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Interface,
            ),
            (
                r#"(type_alias_declaration name: (type_identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Type,
            ),
            // Methods live inside `class_declaration`, which is already
            // captured above as one top-level chunk; extracting them
            // separately would just duplicate the class body.
        ],
    )
}
