/// Gallery controller
///
/// Owns the loaded manifest, the active media list of the selected tab and
/// the fullscreen viewer state. Everything here is synchronous; the UI layer
/// feeds it events one at a time and renders what it exposes.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use super::data::{MediaItem, MediaKind, Tab};
use super::manifest::Manifest;
use crate::config::GalleryConfig;
use crate::error::ManifestLoadError;

/// Where the manifest load stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Terminal for this gallery root; nothing is retried
    Failed(ManifestLoadError),
}

/// Direction for viewer navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// Playback attributes of a video element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoPlayback {
    pub muted: bool,
    pub looping: bool,
    pub controls: bool,
    pub autoplay: bool,
    pub playing: bool,
}

impl VideoPlayback {
    /// Grid preview: muted, looping, no controls, idle until hovered
    pub fn preview() -> Self {
        Self {
            muted: true,
            looping: true,
            controls: false,
            autoplay: false,
            playing: false,
        }
    }

    /// Fullscreen: controls on, unmuted, starts playing immediately
    pub fn fullscreen() -> Self {
        Self {
            muted: false,
            looping: true,
            controls: true,
            autoplay: true,
            playing: true,
        }
    }

    /// Previews go back to their first frame when they stop; a paused
    /// fullscreen video keeps its position
    pub fn rewinds_on_pause(&self) -> bool {
        !self.controls
    }
}

/// How one media item is shown, in a grid cell or in the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaView {
    Image { path: PathBuf },
    Video { path: PathBuf, playback: VideoPlayback },
    Unsupported { file_name: String },
}

/// The open fullscreen viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub index: usize,
    pub item: MediaItem,
    pub content: MediaView,
}

#[derive(Debug)]
pub struct Gallery {
    config: GalleryConfig,
    load_state: LoadState,
    manifest: Manifest,
    tab: Tab,
    /// Active media list; the grid renders it in this exact order
    items: Vec<MediaItem>,
    viewer: Option<Viewer>,
    hovered: Option<usize>,
}

impl Gallery {
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            config,
            load_state: LoadState::Loading,
            manifest: Manifest::new(),
            tab: Tab::All,
            items: Vec::new(),
            viewer: None,
            hovered: None,
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[cfg(test)]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    /// Forget everything and wait for the manifest of a (new) gallery root
    pub fn reset(&mut self, config: GalleryConfig) {
        *self = Self::new(config);
    }

    /// Apply the result of the manifest read and show the default tab
    pub fn manifest_loaded(
        &mut self,
        result: Result<Manifest, ManifestLoadError>,
        seed: impl FnOnce() -> u64,
    ) {
        match result {
            Ok(manifest) => {
                self.manifest = manifest;
                self.load_state = LoadState::Ready;
                let tab = self.config.default_tab.clone();
                self.select_tab(tab, seed);
            }
            Err(err) => {
                warn!("Could not load gallery manifest: {}", err);
                self.manifest = Manifest::new();
                self.items.clear();
                self.close_viewer();
                self.load_state = LoadState::Failed(err);
            }
        }
    }

    /// Tabs offered once the manifest is loaded: the synthetic views, then categories
    pub fn tabs(&self) -> Vec<Tab> {
        let mut tabs = vec![Tab::All, Tab::Videos];
        tabs.extend(
            self.manifest
                .category_names()
                .map(|name| Tab::Category(name.to_string())),
        );
        tabs
    }

    /// Categories feeding the "all" and "videos" tabs, in manifest order
    pub fn relevant_categories(&self) -> Vec<&str> {
        match &self.config.all_categories {
            None => self.manifest.category_names().collect(),
            Some(subset) => subset
                .iter()
                .map(String::as_str)
                .filter(|name| self.manifest.contains(name))
                .collect(),
        }
    }

    /// Rebuild the active media list for `tab`
    ///
    /// `seed` is only called for the "all" tab, whose order it shuffles.
    pub fn select_tab(&mut self, tab: Tab, seed: impl FnOnce() -> u64) -> &[MediaItem] {
        let items = match &tab {
            Tab::All => {
                let mut items = self.relevant_items();
                shuffle(&mut items, seed());
                items
            }
            Tab::Videos => self
                .relevant_items()
                .into_iter()
                .filter(|item| item.kind() == MediaKind::Video)
                .collect(),
            Tab::Category(name) => self.manifest.items(name),
        };

        debug!("Tab `{}` selected with {} items", tab, items.len());

        // Indices from the previous list mean nothing against the new one
        self.close_viewer();
        self.hovered = None;
        self.items = items;
        self.tab = tab;
        &self.items
    }

    fn relevant_items(&self) -> Vec<MediaItem> {
        self.relevant_categories()
            .into_iter()
            .flat_map(|name| self.manifest.items(name))
            .collect()
    }

    /// Placeholder text when the active list is empty
    pub fn empty_message(&self) -> Option<String> {
        if !self.items.is_empty() || self.load_state != LoadState::Ready {
            return None;
        }

        Some(match &self.tab {
            Tab::All => "No content yet for any category.".to_string(),
            tab => format!("No content yet for {}.", tab),
        })
    }

    /// Grid cells, one per active item and in the same order
    pub fn previews(&self) -> Vec<MediaView> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mut playback = VideoPlayback::preview();
                playback.playing = self.config.hover_preview && self.hovered == Some(index);
                self.media_view(item, playback)
            })
            .collect()
    }

    fn media_view(&self, item: &MediaItem, playback: VideoPlayback) -> MediaView {
        let path = item.path_under(&self.config.root);
        match item.kind() {
            MediaKind::Image => MediaView::Image { path },
            MediaKind::Video => MediaView::Video { path, playback },
            MediaKind::Unsupported => MediaView::Unsupported {
                file_name: item.file_name.clone(),
            },
        }
    }

    /// Track the pointer entering (`Some`) or leaving (`None`) a grid cell
    pub fn hover(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|i| *i < self.items.len());
    }

    /// Show the item at `index` enlarged; out-of-range indices are ignored
    pub fn open_viewer(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get(index) else {
            warn!("Viewer index {} out of range ({} items)", index, self.items.len());
            return false;
        };

        let content = self.media_view(item, VideoPlayback::fullscreen());

        debug!("Viewer opened at {} ({}/{})", index, item.category, item.file_name);

        self.viewer = Some(Viewer {
            index,
            item: item.clone(),
            content,
        });
        self.hovered = None;
        true
    }

    /// Clear the viewer; its video player is dropped with it
    pub fn close_viewer(&mut self) {
        if let Some(viewer) = self.viewer.take() {
            debug!("Viewer closed at {}", viewer.index);
        }
    }

    /// Step the open viewer with wraparound; a no-op when nothing is open
    pub fn navigate_viewer(&mut self, direction: Direction) -> Option<usize> {
        let current = self.viewer.as_ref()?.index;
        let len = self.items.len() as isize;
        if len == 0 {
            return None;
        }

        let next = (current as isize + direction.step()).rem_euclid(len) as usize;
        self.open_viewer(next).then_some(next)
    }

    /// Flip the open video between playing and paused
    pub fn toggle_playback(&mut self) {
        if let Some(Viewer {
            content: MediaView::Video { playback, .. },
            ..
        }) = &mut self.viewer
        {
            playback.playing = !playback.playing;
        }
    }

    /// Flip the open video's muted state
    pub fn toggle_mute(&mut self) {
        if let Some(Viewer {
            content: MediaView::Video { playback, .. },
            ..
        }) = &mut self.viewer
        {
            playback.muted = !playback.muted;
        }
    }
}

/// A fresh seed for the "all" tab shuffle
pub fn shuffle_seed() -> u64 {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x9e3779b97f4a7c15);
    debug!("Shuffle seed {:#x}", seed);
    seed
}

/// Uniform Fisher-Yates shuffle driven by a SplitMix64 stream
fn shuffle<T>(items: &mut [T], seed: u64) {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    };

    for i in (1..items.len()).rev() {
        // Multiply-shift maps the 64-bit draw onto 0..=i
        let j = ((next() as u128 * (i as u128 + 1)) >> 64) as usize;
        items.swap(i, j);
    }
}
