//! Animated ASS caption generation
//!
//! Produces word-by-word highlight captions (karaoke style): each word in a
//! batch gets one dialogue event during which it is rendered in the
//! highlight color and scaled up while its neighbors stay in the primary
//! style. User text is sanitized before any override tags are composed
//! around it, so caller-controlled input cannot inject tags of its own.

use std::path::Path;

use tracing::info;

use crate::captions::{sanitize::Sanitizer, Segment};
use crate::config::CaptionSettings;
use crate::error::ClipgateResult;
use crate::utils::time::format_ass_timestamp;

const PLAY_RES_X: u32 = 1080;
const PLAY_RES_Y: u32 = 1920;
const PRIMARY_COLOR: &str = "&H00FFFFFF";
const OUTLINE_COLOR: &str = "&H00000000";
const BACK_COLOR: &str = "&H80000000";

fn script_header(settings: &CaptionSettings) -> String {
    format!(
        "[Script Info]\n\
         ScriptType: v4.00+\n\
         PlayResX: {}\n\
         PlayResY: {}\n\
         WrapStyle: 1\n\
         \n\
         [V4+ Styles]\n\
         Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n\
         Style: Default,{},{},{},{},{},{},1,0,0,0,100,100,0,0,1,{},{},2,50,50,{},1\n\
         \n\
         [Events]\n\
         Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n",
        PLAY_RES_X,
        PLAY_RES_Y,
        settings.font,
        settings.font_size,
        PRIMARY_COLOR,
        PRIMARY_COLOR,
        OUTLINE_COLOR,
        BACK_COLOR,
        settings.outline_width,
        settings.shadow_depth,
        settings.margin_bottom,
    )
}

/// Render transcript segments as animated ASS text
pub fn render_animated_ass(segments: &[Segment], settings: &CaptionSettings) -> String {
    let sanitizer = Sanitizer::default();
    let words_per_batch = settings.words_per_line.max(1);
    let mut content = script_header(settings);

    for seg in segments {
        let words: Vec<&str> = seg.text.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let time_per_word = (seg.end - seg.start) / words.len() as f64;

        for (batch_index, batch) in words.chunks(words_per_batch).enumerate() {
            let batch_start = seg.start + (batch_index * words_per_batch) as f64 * time_per_word;
            let time_per_batch_word = time_per_word;

            // One event per word: that word highlighted, the rest plain.
            for (highlight, _) in batch.iter().enumerate() {
                let event_start = batch_start + highlight as f64 * time_per_batch_word;
                let event_end = batch_start + (highlight + 1) as f64 * time_per_batch_word;

                let mut line = String::new();
                for (j, word) in batch.iter().enumerate() {
                    let safe = sanitizer.sanitize(word);
                    if j == highlight {
                        line.push_str(&format!(
                            "{{\\c{}\\fscx120\\fscy120}}{}{{\\c{}\\fscx100\\fscy100}} ",
                            settings.highlight_color, safe, PRIMARY_COLOR
                        ));
                    } else {
                        line.push_str(&safe);
                        line.push(' ');
                    }
                }

                content.push_str(&format!(
                    "Dialogue: 0,{},{},Default,,0,0,0,,{}\n",
                    format_ass_timestamp(event_start),
                    format_ass_timestamp(event_end),
                    line.trim_end()
                ));
            }
        }
    }

    content
}

/// Write an animated ASS file for the given segments
pub fn write_animated_ass(
    segments: &[Segment],
    output_path: &Path,
    settings: &CaptionSettings,
) -> ClipgateResult<()> {
    let content = render_animated_ass(segments, settings);
    std::fs::write(output_path, &content)?;
    info!(
        "Animated ASS captions created: {}",
        output_path.display()
    );
    Ok(())
}
