//! Subtitle timestamp formatting
//!
//! SRT uses `HH:MM:SS,mmm` (millisecond precision); ASS uses `H:MM:SS.cc`
//! (centisecond precision). Both round to the nearest unit rather than
//! truncating, so adjacent entries stay contiguous.

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_millis = (seconds * 1000.0).round().max(0.0) as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1_000;
    let millis = total_millis % 1_000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Format seconds as an ASS timestamp (`H:MM:SS.cc`)
pub fn format_ass_timestamp(seconds: f64) -> String {
    let total_cs = (seconds * 100.0).round().max(0.0) as u64;
    let hours = total_cs / 360_000;
    let minutes = (total_cs % 360_000) / 6_000;
    let secs = (total_cs % 6_000) / 100;
    let centis = total_cs % 100;
    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
}
