//! Mood-based background music selection

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

/// Filename keywords tried for each mood, in order
fn mood_keywords(mood: &str) -> Vec<&'static str> {
    match mood.to_lowercase().as_str() {
        "energetic" => vec!["energetic", "upbeat", "hype", "energy"],
        "emotional" => vec!["emotional", "sad", "touching", "piano"],
        "funny" => vec!["funny", "comedy", "quirky", "fun"],
        "dramatic" => vec!["dramatic", "epic", "intense", "cinematic"],
        "chill" => vec!["chill", "lofi", "relax", "calm"],
        _ => vec![],
    }
}

fn is_music_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("mp3") | Some("wav")
    )
}

/// Pick a music track matching a mood keyword from a directory.
///
/// Scans for mp3/wav files one level deep, preferring filenames containing a
/// keyword for the mood. Falls back to the first track found; returns `None`
/// when the directory is missing or holds no music.
pub fn select_music_for_mood(music_dir: &Path, mood: &str) -> Option<PathBuf> {
    if !music_dir.is_dir() {
        warn!("Music directory not found: {}", music_dir.display());
        return None;
    }

    let mut tracks: Vec<PathBuf> = WalkDir::new(music_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| is_music_file(path))
        .collect();
    tracks.sort();

    if tracks.is_empty() {
        warn!("No music files found in {}", music_dir.display());
        return None;
    }

    for keyword in mood_keywords(mood)
        .into_iter()
        .chain(std::iter::once(mood))
    {
        let keyword = keyword.to_lowercase();
        if let Some(track) = tracks.iter().find(|t| {
            t.file_stem()
                .map(|s| s.to_string_lossy().to_lowercase().contains(&keyword))
                .unwrap_or(false)
        }) {
            info!(
                "Selected music for '{}' mood: {}",
                mood,
                track.file_name().unwrap_or_default().to_string_lossy()
            );
            return Some(track.clone());
        }
    }

    // No keyword match; fall back to the first track.
    let fallback = tracks.into_iter().next();
    if let Some(ref track) = fallback {
        info!(
            "No mood match, falling back to: {}",
            track.file_name().unwrap_or_default().to_string_lossy()
        );
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_selects_mood_keyword_match() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "lofi_beats.mp3");
        touch(dir.path(), "epic_trailer.mp3");

        let track = select_music_for_mood(dir.path(), "chill").unwrap();
        assert_eq!(track.file_name().unwrap(), "lofi_beats.mp3");

        let track = select_music_for_mood(dir.path(), "dramatic").unwrap();
        assert_eq!(track.file_name().unwrap(), "epic_trailer.mp3");
    }

    #[test]
    fn test_falls_back_to_any_track() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "track.wav");

        let track = select_music_for_mood(dir.path(), "funny").unwrap();
        assert_eq!(track.file_name().unwrap(), "track.wav");
    }

    #[test]
    fn test_ignores_non_music_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "readme.txt");
        assert!(select_music_for_mood(dir.path(), "chill").is_none());
    }

    #[test]
    fn test_missing_directory_returns_none() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(select_music_for_mood(&missing, "chill").is_none());
    }
}
