use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// On-disk layout of one story directory.
///
/// The naming convention is fixed, 1-indexed by page:
///
/// - `image/p{n}.png`: one still per page (required)
/// - `speech/p{n}.wav`: single-utterance narration, OR
///   `speech/p{n}_{k}.wav`: sub-utterances, `k` 0-indexed and sorted
///   numerically (at least one form required)
/// - `sound/p{n}.wav`: per-page sound effect (optional)
/// - `music/music.wav`: shared background track
#[derive(Clone, Debug)]
pub struct StoryDir {
    root: PathBuf,
}

impl StoryDir {
    /// Wrap a story directory root. No IO happens until paths are queried.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The story directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of page `page`'s still image, which must exist for the page to
    /// be composable.
    pub fn image_path(&self, page: usize) -> StoryreelResult<PathBuf> {
        let path = self.root.join("image").join(format!("p{page}.png"));
        if !path.is_file() {
            return Err(StoryreelError::missing_asset(format!(
                "page {page} image '{}'",
                path.display()
            )));
        }
        Ok(path)
    }

    /// Path of page `page`'s sound effect, if one exists. Only the exact
    /// `sound/p{n}.wav` name is recognized.
    pub fn sound_path(&self, page: usize) -> Option<PathBuf> {
        let path = self.root.join("sound").join(format!("p{page}.wav"));
        path.is_file().then_some(path)
    }

    /// Path of the shared background music track.
    pub fn music_path(&self) -> StoryreelResult<PathBuf> {
        let path = self.root.join("music").join("music.wav");
        if !path.is_file() {
            return Err(StoryreelError::missing_asset(format!(
                "background music '{}'",
                path.display()
            )));
        }
        Ok(path)
    }

    /// Ordered speech files for page `page`.
    ///
    /// A single `p{n}.wav` wins over any `p{n}_{k}.wav` sub-utterances;
    /// otherwise sub-utterances are returned sorted by their numeric suffix.
    /// Files whose suffix is not a number are ignored.
    pub fn speech_paths(&self, page: usize) -> StoryreelResult<Vec<PathBuf>> {
        let speech_dir = self.root.join("speech");
        let single = speech_dir.join(format!("p{page}.wav"));
        if single.is_file() {
            return Ok(vec![single]);
        }

        let prefix = format!("p{page}_");
        let mut parts: Vec<(u32, PathBuf)> = Vec::new();
        if speech_dir.is_dir() {
            let entries = std::fs::read_dir(&speech_dir)
                .with_context(|| format!("list speech dir '{}'", speech_dir.display()))?;
            for entry in entries {
                let entry = entry.with_context(|| "read speech dir entry")?;
                let name = entry.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };
                let Some(stem) = name.strip_suffix(".wav") else {
                    continue;
                };
                let Some(suffix) = stem.strip_prefix(&prefix) else {
                    continue;
                };
                if let Ok(idx) = suffix.parse::<u32>() {
                    parts.push((idx, entry.path()));
                }
            }
        }

        if parts.is_empty() {
            return Err(StoryreelError::missing_asset(format!(
                "page {page} speech ('{}' or '{}*.wav')",
                single.display(),
                speech_dir.join(&prefix).display()
            )));
        }
        parts.sort_by_key(|(idx, _)| *idx);
        Ok(parts.into_iter().map(|(_, path)| path).collect())
    }
}
