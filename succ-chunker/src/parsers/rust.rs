use succ_core::traits::SymbolKind;

use super::TreeSitterParser;

pub fn parser() -> TreeSitterParser {
    let language: tree_sitter::Language = tree_sitter_rust::LANGUAGE.into();
    TreeSitterParser::new(
        language,
        vec!["rust"],
        vec![
            (
                r#"(function_item name: (identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Function,
            ),
            (
                r#"(struct_item name: (type_identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Class,
            ),
            (
                r#"(enum_item name: (type_identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Enum,
            ),
            (
                r#"(trait_item name: (type_identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Interface,
            ),
            (
                r#"(type_item name: (type_identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Type,
            ),
            (
                r#"(impl_item type: (type_identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Class,
            ),
        ],
    )
}
