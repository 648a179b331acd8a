/// Command line arguments and fixed gallery constants
use clap::Parser;
use std::path::PathBuf;

use crate::state::data::Tab;

/// Manifest file name, relative to the gallery root
pub const MANIFEST_FILE: &str = "media_manifest.json";

/// Directory holding one subdirectory per category, relative to the gallery root
pub const MEDIA_DIR: &str = "media";

/// Image suffixes, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Video suffixes, compared case-insensitively
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "webm", "ogg"];

/// Categories the rebuild tool always creates, in manifest order
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "wins",
    "losses",
    "funny",
    "toxic",
    "hackers",
    "glitch_abuser",
    "history",
];

/// Vertical scroll offset (logical pixels) past which "Top" is offered
pub const SCROLL_TOP_THRESHOLD: f32 = 300.0;

#[derive(Debug, Parser)]
#[command(name = "media-gallery", version, about)]
pub struct Args {
    /// Gallery root containing media_manifest.json and media/
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Restrict the "all" and "videos" tabs to these categories (repeatable)
    #[arg(long = "all-category", value_name = "NAME")]
    pub all_categories: Vec<String>,

    /// Tab shown once the manifest is loaded ("all", "videos" or a category)
    #[arg(long, value_name = "TAB", default_value = "all")]
    pub tab: String,

    /// Do not play video previews while hovered
    #[arg(long)]
    pub no_hover_preview: bool,

    /// Rename media files and rewrite media_manifest.json, then exit
    #[arg(long)]
    pub rebuild_manifest: bool,
}

/// Runtime settings of the gallery view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    pub root: PathBuf,
    /// `None` means every manifest category feeds "all" and "videos"
    pub all_categories: Option<Vec<String>>,
    pub hover_preview: bool,
    pub default_tab: Tab,
}

impl GalleryConfig {
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.join(MEDIA_DIR)
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            all_categories: None,
            hover_preview: true,
            default_tab: Tab::All,
        }
    }
}

impl From<&Args> for GalleryConfig {
    fn from(args: &Args) -> Self {
        Self {
            root: args.root.clone(),
            all_categories: if args.all_categories.is_empty() {
                None
            } else {
                Some(args.all_categories.clone())
            },
            hover_preview: !args.no_hover_preview,
            default_tab: Tab::from_id(&args.tab),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_args() {
        let args = Args::parse_from(["media-gallery"]);
        let config = GalleryConfig::from(&args);

        assert_eq!(config, GalleryConfig::default());
        assert!(!args.rebuild_manifest);
        assert_eq!(config.manifest_path(), PathBuf::from("./media_manifest.json"));
    }

    #[test]
    fn test_all_category_restriction() {
        let args = Args::parse_from([
            "media-gallery",
            "/srv/gallery",
            "--all-category",
            "wins",
            "--all-category",
            "funny",
            "--no-hover-preview",
            "--tab",
            "videos",
        ]);
        let config = GalleryConfig::from(&args);

        assert_eq!(config.root, PathBuf::from("/srv/gallery"));
        assert_eq!(
            config.all_categories,
            Some(vec!["wins".to_string(), "funny".to_string()])
        );
        assert!(!config.hover_preview);
        assert_eq!(config.default_tab, Tab::Videos);
        assert_eq!(config.media_dir(), PathBuf::from("/srv/gallery/media"));
    }
}
