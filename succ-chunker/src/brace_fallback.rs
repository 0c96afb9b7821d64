//! Brace-depth heuristic chunker (spec.md §4.3): used for languages with
//! no tree-sitter grammar registered. Splits on `{`/`}` depth returning
//! to zero, so each chunk roughly corresponds to one top-level block.
//! Braces inside string/char literals and line comments don't count.

use crate::draft::ChunkDraft;

#[derive(Clone, Copy, PartialEq)]
enum StringState {
    None,
    Single,
    Double,
    Backtick,
}

pub fn chunk_by_brace_depth(source: &str) -> Vec<ChunkDraft> {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let mut drafts = Vec::new();
    let mut depth: i32 = 0;
    let mut seen_open = false;
    let mut block_start = 0usize;
    let mut string_state = StringState::None;

    for (i, line) in lines.iter().enumerate() {
        scan_line(line, &mut depth, &mut string_state, &mut seen_open);

        if seen_open && depth <= 0 {
            let content = lines[block_start..=i].join("\n");
            drafts.push(ChunkDraft::plain(content, (block_start + 1) as u32, (i + 1) as u32));
            block_start = i + 1;
            seen_open = false;
            depth = 0;
        }
    }

    if block_start < lines.len() {
        let content = lines[block_start..].join("\n");
        drafts.push(ChunkDraft::plain(content, (block_start + 1) as u32, lines.len() as u32));
    }

    drafts
}

fn scan_line(line: &str, depth: &mut i32, string_state: &mut StringState, seen_open: &mut bool) {
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut prev_escaped = false;

    while i < bytes.len() {
        let c = bytes[i] as char;

        match string_state {
            StringState::None => match c {
                '/' if i + 1 < bytes.len() && bytes[i + 1] as char == '/' => break,
                '#' => break,
                '\'' => *string_state = StringState::Single,
                '"' => *string_state = StringState::Double,
                '`' => *string_state = StringState::Backtick,
                '{' => {
                    *depth += 1;
                    *seen_open = true;
                }
                '}' => *depth -= 1,
                _ => {}
            },
            StringState::Single | StringState::Double | StringState::Backtick => {
                if prev_escaped {
                    prev_escaped = false;
                } else if c == '\\' {
                    prev_escaped = true;
                } else {
                    let closes = matches!(
                        (&string_state, c),
                        (StringState::Single, '\'') | (StringState::Double, '"') | (StringState::Backtick, '`')
                    );
                    if closes {
                        *string_state = StringState::None;
                    }
                }
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_sibling_blocks() {
        let source = "fn a() {\n  1;\n}\nfn b() {\n  2;\n}";
        let drafts = chunk_by_brace_depth(source);
        assert_eq!(drafts.len(), 2);
        assert!(drafts[0].content.contains("fn a"));
        assert!(drafts[1].content.contains("fn b"));
    }

    #[test]
    fn ignores_braces_in_strings() {
        let source = "fn a() {\n  let s = \"{ not a brace\";\n}";
        let drafts = chunk_by_brace_depth(source);
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn ignores_braces_in_line_comments() {
        let source = "fn a() {\n  // { unmatched\n  1;\n}";
        let drafts = chunk_by_brace_depth(source);
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn trailing_lines_with_no_braces_become_final_chunk() {
        let source = "fn a() {\n  1;\n}\n\n// trailing comment";
        let drafts = chunk_by_brace_depth(source);
        assert_eq!(drafts.len(), 2);
    }
}
