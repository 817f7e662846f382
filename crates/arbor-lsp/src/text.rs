//! Rope-backed document text and LSP position mapping.
//!
//! LSP positions count UTF-16 code units; everything else in the server
//! works on `char` columns within a single line.

use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range};

/// Line `pos.line` (without its line break) and the cursor's char column
/// in it. `None` past the end of the document.
pub fn line_at(rope: &Rope, pos: Position) -> Option<(String, usize)> {
    let line_idx = pos.line as usize;
    if line_idx >= rope.len_lines() {
        return None;
    }
    let line = rope.line(line_idx);
    let text: String = line.chars().filter(|c| *c != '\n' && *c != '\r').collect();

    let line_start = rope.line_to_char(line_idx);
    let start_cu = rope.char_to_utf16_cu(line_start);
    let target_cu = (start_cu + pos.character as usize).min(rope.len_utf16_cu());
    let col = rope
        .utf16_cu_to_char(target_cu)
        .saturating_sub(line_start)
        .min(text.chars().count());
    Some((text, col))
}

/// Range covering the trimmed content of 1-based `line` in `text`.
pub fn line_range(text: &str, line: usize) -> Range {
    let zero_based = line.saturating_sub(1);
    let content = text.lines().nth(zero_based).unwrap_or("");
    let leading = content.len() - content.trim_start().len();
    let start = utf16_len(&content[..leading]);
    let end = utf16_len(content.trim_end());
    let row = zero_based as u32;
    Range {
        start: Position::new(row, start),
        end: Position::new(row, end.max(start)),
    }
}

/// Range of the first occurrence of `needle` as a whole token on 1-based
/// `line`, falling back to the trimmed line.
pub fn token_range(text: &str, line: usize, needle: &str) -> Range {
    let zero_based = line.saturating_sub(1);
    let content = text.lines().nth(zero_based).unwrap_or("");
    let found = content.match_indices(needle).find(|&(i, _)| {
        let before = content[..i].chars().next_back();
        let after = content[i + needle.len()..].chars().next();
        before.is_none_or(|c| c.is_whitespace() || c == '>')
            && after.is_none_or(|c| c.is_whitespace() || c == '-' || c == '"')
    });
    match found {
        Some((i, _)) => {
            let start = utf16_len(&content[..i]);
            let row = zero_based as u32;
            Range {
                start: Position::new(row, start),
                end: Position::new(row, start + utf16_len(needle)),
            }
        }
        None => line_range(text, line),
    }
}

fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}
