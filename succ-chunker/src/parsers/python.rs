use succ_core::traits::SymbolKind;

use super::TreeSitterParser;

pub fn parser() -> TreeSitterParser {
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    TreeSitterParser::new(
        language,
        vec!["python"],
        vec![
            (
                r#"(function_definition name: (identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Function,
            ),
            (
                r#"(class_definition name: (identifier) @name) @symbol"#,
                "symbol",
                "name",
                SymbolKind::Class,
            ),
        ],
    )
}
