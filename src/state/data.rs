/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the gallery controller and the UI layer.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{IMAGE_EXTENSIONS, MEDIA_DIR, VIDEO_EXTENSIONS};

/// What a media file is, decided purely by its filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Unsupported,
}

impl MediaKind {
    /// Classify a filename by the text after its last `.` (case-insensitive).
    /// A name without a dot is compared as a whole.
    pub fn from_file_name(file_name: &str) -> Self {
        let ext = file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Unsupported
        }
    }
}

/// One file listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaItem {
    /// Category (manifest key) the file belongs to
    pub category: String,
    /// Filename only (e.g., "3.mp4")
    pub file_name: String,
}

impl MediaItem {
    pub fn new(category: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            file_name: file_name.into(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_file_name(&self.file_name)
    }

    /// Resolve `<root>/media/<category>/<file_name>`
    pub fn path_under(&self, root: &Path) -> PathBuf {
        root.join(MEDIA_DIR)
            .join(&self.category)
            .join(&self.file_name)
    }
}

/// A tab of the gallery: a synthetic view or one manifest category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Every relevant category, shuffled
    All,
    /// Every relevant category, videos only, manifest order
    Videos,
    /// One manifest category, verbatim
    Category(String),
}

impl Tab {
    /// Map a tab identifier ("all", "videos" or a category name) to a tab
    pub fn from_id(id: &str) -> Self {
        match id {
            "all" => Tab::All,
            "videos" => Tab::Videos,
            other => Tab::Category(other.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Tab::All => "all",
            Tab::Videos => "videos",
            Tab::Category(name) => name,
        }
    }

    /// Human readable label ("glitch_abuser" -> "Glitch Abuser")
    pub fn label(&self) -> String {
        self.id()
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
