//! Size cap (spec.md §4.3): chunks over `MAX_CHUNK_CHARS` are split into
//! sub-chunks at line boundaries. Only the first sub-chunk keeps the
//! symbol metadata — the rest are anonymous continuations.

use succ_core::constants::MAX_CHUNK_CHARS;

use crate::draft::ChunkDraft;

pub fn apply_size_cap(draft: ChunkDraft) -> Vec<ChunkDraft> {
    if draft.content.len() <= MAX_CHUNK_CHARS {
        return vec![draft];
    }

    let lines: Vec<&str> = draft.content.lines().collect();
    if lines.len() <= 1 {
        // Can't split a single over-long line any further at a line
        // boundary; return as-is rather than cutting mid-token.
        return vec![draft];
    }

    let mut out = Vec::new();
    let mut buf = String::new();
    let mut buf_start_line = draft.start_line;
    let mut line_offset = 0u32;
    let mut first = true;

    for line in &lines {
        let candidate_len = buf.len() + line.len() + 1;
        if !buf.is_empty() && candidate_len > MAX_CHUNK_CHARS {
            out.push(finish_sub_chunk(&draft, &mut buf, buf_start_line, line_offset, first));
            first = false;
            buf_start_line += line_offset + 1;
            line_offset = 0;
        } else {
            if !buf.is_empty() {
                buf.push('\n');
            }
            buf.push_str(line);
            line_offset += 1;
        }
    }
    if !buf.is_empty() {
        out.push(finish_sub_chunk(&draft, &mut buf, buf_start_line, line_offset.saturating_sub(1), first));
    }

    out
}

fn finish_sub_chunk(original: &ChunkDraft, buf: &mut String, start_line: u32, line_offset: u32, first: bool) -> ChunkDraft {
    let content = std::mem::take(buf);
    let end_line = start_line + line_offset;
    if first {
        ChunkDraft { content, start_line, end_line, symbol_name: original.symbol_name.clone(), symbol_type: original.symbol_type.clone() }
    } else {
        ChunkDraft::plain(content, start_line, end_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_cap_is_unchanged() {
        let draft = ChunkDraft::plain("short".to_string(), 1, 1);
        let out = apply_size_cap(draft.clone());
        assert_eq!(out, vec![draft]);
    }

    #[test]
    fn over_cap_splits_at_line_boundaries() {
        let line = "x".repeat(100);
        let content = std::iter::repeat(line).take(100).collect::<Vec<_>>().join("\n");
        let mut draft = ChunkDraft::plain(content, 1, 100);
        draft.symbol_name = Some("big_fn".to_string());
        draft.symbol_type = Some("function".to_string());

        let out = apply_size_cap(draft);
        assert!(out.len() > 1);
        assert!(out.iter().all(|c| c.content.len() <= MAX_CHUNK_CHARS));
        assert_eq!(out[0].symbol_name.as_deref(), Some("big_fn"));
        assert!(out[1].symbol_name.is_none());
    }
}
