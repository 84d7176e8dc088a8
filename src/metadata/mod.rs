//! Audio file tag access for the lyrics run.
//!
//! Uses the lofty crate for format-independent metadata access.
//! Supports reading from and writing to MP3, FLAC, OGG, M4A, and WAV files.
//!
//! The batch loop only talks to [`MetadataStore`]; [`LoftyStore`] is the
//! real implementation and tests use the in-memory store in [`mocks`].

use lofty::config::WriteOptions;
use lofty::file::{FileType, TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Tags the lyrics run needs from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub artist: String,
    pub title: String,
    /// Lyrics already embedded, if any
    pub lyrics: Option<String>,
}

/// Errors reading or writing a file's tags
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetadataError {
    #[error("Unsupported file format: {}", path.display())]
    Unsupported { path: PathBuf },

    #[error("Could not read {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },

    #[error("Artist/Title could not be found in {}", path.display())]
    MissingTags { path: PathBuf },

    #[error("Could not write lyrics to {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl MetadataError {
    fn unreadable(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Unreadable {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    fn write(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Read/write access to the tags of audio files.
pub trait MetadataStore: Send + Sync {
    /// Artist, title and existing lyrics of a file.
    fn read_track(&self, path: &Path) -> Result<TrackTags, MetadataError>;

    /// Replace the file's lyrics with `lyrics`.
    fn write_lyrics(&self, path: &Path, lyrics: &str) -> Result<(), MetadataError>;
}

/// Whether lofty can handle a file, judged by its extension.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(FileType::from_ext)
        .is_some()
}

fn non_empty(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Every tag in the file, the format's primary tag first.
fn tags_by_preference(tagged_file: &TaggedFile) -> Vec<&Tag> {
    let primary = tagged_file.primary_tag_type();
    let mut tags: Vec<&Tag> = tagged_file.tags().iter().collect();
    tags.sort_by_key(|tag| tag.tag_type() != primary);
    tags
}

/// First non-empty artist and title across `tags`, each taken independently.
fn artist_and_title(tags: &[&Tag]) -> (Option<String>, Option<String>) {
    (
        tags.iter().find_map(|tag| non_empty(tag.artist())),
        tags.iter().find_map(|tag| non_empty(tag.title())),
    )
}

/// Tag store backed by lofty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyStore;

impl LoftyStore {
    fn open(path: &Path) -> Result<TaggedFile, MetadataError> {
        if !is_supported(path) {
            return Err(MetadataError::Unsupported {
                path: path.to_path_buf(),
            });
        }
        Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|e| MetadataError::unreadable(path, e))
    }
}

impl MetadataStore for LoftyStore {
    fn read_track(&self, path: &Path) -> Result<TrackTags, MetadataError> {
        let tagged_file = Self::open(path)?;

        // A file may carry several tags (ID3v2 and RIFF INFO in a WAV, ID3v1
        // next to ID3v2 in an MP3); fields come from whichever has them
        let tags = tags_by_preference(&tagged_file);

        let (Some(artist), Some(title)) = artist_and_title(&tags) else {
            return Err(MetadataError::MissingTags {
                path: path.to_path_buf(),
            });
        };

        let lyrics = tags
            .iter()
            .find_map(|tag| tag.get_string(&ItemKey::Lyrics))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(TrackTags {
            artist,
            title,
            lyrics,
        })
    }

    fn write_lyrics(&self, path: &Path, lyrics: &str) -> Result<(), MetadataError> {
        let mut tagged_file = Self::open(path)?;
        let (artist, title) = artist_and_title(&tags_by_preference(&tagged_file));

        // Get the primary tag type for this format, or create one
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let Some(tag) = tagged_file.tag_mut(tag_type) else {
            return Err(MetadataError::write(path, "no writable tag"));
        };

        // The file must still be readable through this tag alone
        if let Some(artist) = artist.filter(|_| non_empty(tag.artist()).is_none()) {
            tag.set_artist(artist);
        }
        if let Some(title) = title.filter(|_| non_empty(tag.title()).is_none()) {
            tag.set_title(title);
        }

        // Drop every existing lyrics item so the file never ends up with two
        tag.retain(|item| item.key() != &ItemKey::Lyrics);
        tag.insert_text(ItemKey::Lyrics, lyrics.to_string());

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| MetadataError::write(path, e))
    }
}

/// In-memory tag store for testing.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Store holding scripted read results and recording writes.
    #[derive(Default)]
    pub struct MemoryStore {
        tracks: Mutex<HashMap<PathBuf, Result<TrackTags, MetadataError>>>,
        writes: Mutex<Vec<(PathBuf, String)>>,
        /// Error every write fails with
        pub write_error: Option<MetadataError>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_track(self, path: &str, artist: &str, title: &str, lyrics: Option<&str>) -> Self {
            self.insert(
                path,
                Ok(TrackTags {
                    artist: artist.to_string(),
                    title: title.to_string(),
                    lyrics: lyrics.map(String::from),
                }),
            )
        }

        pub fn with_error(self, path: &str, error: MetadataError) -> Self {
            self.insert(path, Err(error))
        }

        fn insert(self, path: &str, entry: Result<TrackTags, MetadataError>) -> Self {
            self.tracks
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), entry);
            self
        }

        /// Every successful write, in order.
        pub fn writes(&self) -> Vec<(PathBuf, String)> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl MetadataStore for MemoryStore {
        fn read_track(&self, path: &Path) -> Result<TrackTags, MetadataError> {
            self.tracks
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .unwrap_or_else(|| {
                    Err(MetadataError::Unreadable {
                        path: path.to_path_buf(),
                        message: "not in store".to_string(),
                    })
                })
        }

        fn write_lyrics(&self, path: &Path, lyrics: &str) -> Result<(), MetadataError> {
            if let Some(ref err) = self.write_error {
                return Err(err.clone());
            }
            self.writes
                .lock()
                .unwrap()
                .push((path.to_path_buf(), lyrics.to_string()));
            Ok(())
        }
    }
}
