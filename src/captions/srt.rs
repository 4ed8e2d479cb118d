//! SRT caption generation with word-level grouping
//!
//! Segments are split into groups of `words_per_line` words and each group
//! gets an even share of the segment's duration, giving short, punchy
//! entries suited to vertical clips.

use std::path::Path;

use tracing::info;

use crate::captions::{sanitize::Sanitizer, Segment};
use crate::error::ClipgateResult;
use crate::utils::time::format_srt_timestamp;

/// Render transcript segments as SRT text.
///
/// Text is sanitized even here: burned-in SRT goes through the same
/// subtitle renderer as ASS, which honors `{\...}` override blocks.
pub fn render_srt(segments: &[Segment], words_per_line: usize) -> String {
    let sanitizer = Sanitizer::default();
    let words_per_line = words_per_line.max(1);
    let mut entries = String::new();
    let mut entry_index = 1;

    for seg in segments {
        let text = seg.text.trim();
        if text.is_empty() {
            continue;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        let groups: Vec<String> = words
            .chunks(words_per_line)
            .map(|chunk| sanitizer.sanitize(&chunk.join(" ")))
            .collect();
        if groups.is_empty() {
            continue;
        }

        let time_per_group = (seg.end - seg.start) / groups.len() as f64;

        for (i, group) in groups.iter().enumerate() {
            let group_start = seg.start + i as f64 * time_per_group;
            let group_end = (seg.start + (i + 1) as f64 * time_per_group).min(seg.end);

            entries.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                entry_index,
                format_srt_timestamp(group_start),
                format_srt_timestamp(group_end),
                group
            ));
            entry_index += 1;
        }
    }

    entries
}

/// Write an SRT file for the given segments
pub fn write_srt(
    segments: &[Segment],
    output_path: &Path,
    words_per_line: usize,
) -> ClipgateResult<()> {
    let content = render_srt(segments, words_per_line);
    std::fs::write(output_path, &content)?;
    info!(
        "SRT file created ({} entries): {}",
        content.matches("-->").count(),
        output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_groups_words_per_entry() {
        let segments = vec![segment(0.0, 4.0, "one two three four")];
        let srt = render_srt(&segments, 2);

        assert!(srt.contains("one two"));
        assert!(srt.contains("three four"));
        assert_eq!(srt.matches("-->").count(), 2);
    }

    #[test]
    fn test_entry_timing_splits_segment_evenly() {
        let segments = vec![segment(0.0, 4.0, "a b c d")];
        let srt = render_srt(&segments, 2);

        assert!(srt.contains("00:00:00,000 --> 00:00:02,000"));
        assert!(srt.contains("00:00:02,000 --> 00:00:04,000"));
    }

    #[test]
    fn test_entries_numbered_sequentially_across_segments() {
        let segments = vec![segment(0.0, 1.0, "first"), segment(1.0, 2.0, "second")];
        let srt = render_srt(&segments, 3);

        assert!(srt.starts_with("1\n"));
        assert!(srt.contains("\n2\n"));
    }

    #[test]
    fn test_skips_empty_segments() {
        let segments = vec![segment(0.0, 1.0, "   "), segment(1.0, 2.0, "kept")];
        let srt = render_srt(&segments, 2);
        assert_eq!(srt.matches("-->").count(), 1);
        assert!(srt.contains("kept"));
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(render_srt(&[], 2), "");
    }

    #[test]
    fn test_override_blocks_are_neutralized() {
        let segments = vec![segment(0.0, 1.0, r"{\an8}top")];
        let srt = render_srt(&segments, 2);
        assert!(!srt.contains(r"{\an8}"));
        assert!(srt.contains('｛'));
    }
}
