//! Plain-text chunker (spec.md §4.3): sliding window over lines, sized
//! in characters, with tail overlap carried into the next chunk.

use crate::draft::ChunkDraft;

pub fn chunk_text(source: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<ChunkDraft> {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let mut drafts = Vec::new();
    let mut start_idx = 0usize;

    loop {
        let mut end_idx = start_idx;
        let mut char_count = lines[start_idx].len();
        while char_count < chunk_size && end_idx + 1 < lines.len() {
            end_idx += 1;
            char_count += lines[end_idx].len() + 1;
        }

        let content = lines[start_idx..=end_idx].join("\n");
        drafts.push(ChunkDraft::plain(content, (start_idx + 1) as u32, (end_idx + 1) as u32));

        if end_idx + 1 >= lines.len() {
            break;
        }

        let next_start = if chunk_overlap == 0 {
            end_idx + 1
        } else {
            let mut overlap_chars = 0usize;
            let mut candidate = end_idx;
            while candidate > start_idx && overlap_chars < chunk_overlap {
                overlap_chars += lines[candidate].len() + 1;
                candidate -= 1;
            }
            // Guarantee forward progress even when overlap would otherwise
            // reproduce the whole prior chunk.
            candidate.max(start_idx + 1).min(end_idx)
        };

        start_idx = next_start;
    }

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_short_line_is_one_chunk() {
        let drafts = chunk_text("hello", 100, 10);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].start_line, 1);
        assert_eq!(drafts[0].end_line, 1);
    }

    #[test]
    fn empty_source_yields_no_chunks() {
        assert!(chunk_text("", 100, 10).is_empty());
    }

    #[test]
    fn long_source_splits_into_multiple_overlapping_chunks() {
        let source = (1..=50).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let drafts = chunk_text(&source, 40, 10);
        assert!(drafts.len() > 1);
        // Every chunk after the first should start before the previous
        // chunk's end (overlap), never past it (no gaps).
        for pair in drafts.windows(2) {
            assert!(pair[1].start_line <= pair[0].end_line);
        }
    }

    #[test]
    fn zero_overlap_does_not_repeat_lines() {
        let source = (1..=20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let drafts = chunk_text(&source, 30, 0);
        for pair in drafts.windows(2) {
            assert_eq!(pair[1].start_line, pair[0].end_line + 1);
        }
    }

    #[test]
    fn covers_every_line_with_no_gaps() {
        let source = (1..=30).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let drafts = chunk_text(&source, 25, 5);
        assert_eq!(drafts.last().unwrap().end_line, 30);
        assert_eq!(drafts[0].start_line, 1);
    }
}
