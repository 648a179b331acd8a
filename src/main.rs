use clap::Parser;
use iced::keyboard::{self, key::Named, Key};
use iced::widget::{column, scrollable, stack};
use iced::{Element, Subscription, Task, Theme};
use rfd::FileDialog;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod media;
mod state;
mod ui;

use config::{Args, GalleryConfig, SCROLL_TOP_THRESHOLD};
use error::ManifestLoadError;
use state::data::{MediaKind, Tab};
use media::video::VideoPlayers;
use state::gallery::{shuffle_seed, Direction, Gallery};
use state::manifest::{load_manifest, Manifest};

/// Main application state
struct MediaGallery {
    /// Manifest, active media list and viewer
    gallery: Gallery,
    /// Source image -> cached grid thumbnail
    thumbnails: HashMap<PathBuf, PathBuf>,
    /// Players for the videos currently on screen
    videos: VideoPlayers,
    /// Vertical offset of the grid, drives the "Top" button
    scroll_offset: f32,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The manifest read for a gallery root finished
    ManifestLoaded(PathBuf, Result<Manifest, ManifestLoadError>),
    /// User clicked a tab button
    TabSelected(Tab),
    /// User clicked a grid tile
    OpenViewer(usize),
    /// Close button, backdrop click or Escape
    CloseViewer,
    /// Viewer arrows or ArrowLeft/ArrowRight
    Navigate(Direction),
    /// Pointer entered (`Some`) or left (`None`) a video tile
    PreviewHovered(Option<usize>),
    TogglePlayback,
    ToggleMute,
    /// Background thumbnail generation for a gallery root finished
    ThumbnailsReady(PathBuf, Vec<(PathBuf, PathBuf)>),
    /// New vertical offset of the grid
    GridScrolled(f32),
    ScrollToTop,
    /// User clicked "Open Gallery…"
    OpenGallery,
}

impl MediaGallery {
    /// Create the application and start reading the manifest
    fn new(config: GalleryConfig) -> (Self, Task<Message>) {
        info!("Media gallery starting at {}", config.root.display());

        let task = load_task(&config);
        (
            MediaGallery {
                gallery: Gallery::new(config),
                thumbnails: HashMap::new(),
                videos: VideoPlayers::new(),
                scroll_offset: 0.0,
            },
            task,
        )
    }

    /// Handle application messages, then bring the video players in line
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle(message);
        self.videos.sync(
            &self.gallery.previews(),
            self.gallery.viewer().map(|viewer| &viewer.content),
        );
        task
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ManifestLoaded(root, result) => {
                if !self.is_current_root(&root) {
                    debug!("Dropping manifest of previous root {}", root.display());
                    return Task::none();
                }
                self.gallery.manifest_loaded(result, shuffle_seed);
                self.after_tab_change()
            }
            Message::TabSelected(tab) => {
                self.gallery.select_tab(tab, shuffle_seed);
                self.after_tab_change()
            }
            Message::OpenViewer(index) => {
                self.gallery.open_viewer(index);
                Task::none()
            }
            Message::CloseViewer => {
                self.gallery.close_viewer();
                Task::none()
            }
            Message::Navigate(direction) => {
                self.gallery.navigate_viewer(direction);
                Task::none()
            }
            Message::PreviewHovered(index) => {
                self.gallery.hover(index);
                Task::none()
            }
            Message::TogglePlayback => {
                self.gallery.toggle_playback();
                Task::none()
            }
            Message::ToggleMute => {
                self.gallery.toggle_mute();
                Task::none()
            }
            Message::ThumbnailsReady(root, pairs) => {
                if self.is_current_root(&root) {
                    debug!("{} thumbnails ready", pairs.len());
                    self.thumbnails.extend(pairs);
                }
                Task::none()
            }
            Message::GridScrolled(offset) => {
                self.scroll_offset = offset;
                Task::none()
            }
            Message::ScrollToTop => {
                self.scroll_offset = 0.0;
                scroll_grid_to_top()
            }
            Message::OpenGallery => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Gallery Folder")
                    .set_directory(&self.gallery.config().root)
                    .pick_folder();

                let Some(root) = folder else {
                    return Task::none();
                };

                info!("Opening gallery at {}", root.display());
                let config = GalleryConfig {
                    root,
                    ..self.gallery.config().clone()
                };
                let task = load_task(&config);
                self.gallery.reset(config);
                self.thumbnails.clear();
                self.videos = VideoPlayers::new();
                self.scroll_offset = 0.0;
                task
            }
        }
    }

    fn is_current_root(&self, root: &Path) -> bool {
        self.gallery.config().root == root
    }

    /// The "Top" button only floats over the grid, never over the viewer
    fn shows_scroll_to_top(&self) -> bool {
        self.gallery.viewer().is_none() && self.scroll_offset > SCROLL_TOP_THRESHOLD
    }

    /// Rewind the grid and queue thumbnails for the new active list
    fn after_tab_change(&mut self) -> Task<Message> {
        self.scroll_offset = 0.0;

        let root = &self.gallery.config().root;
        let pending: Vec<PathBuf> = self
            .gallery
            .items()
            .iter()
            .filter(|item| item.kind() == MediaKind::Image)
            .map(|item| item.path_under(root))
            .filter(|path| !self.thumbnails.contains_key(path))
            .collect();

        let thumbnails = if pending.is_empty() {
            Task::none()
        } else {
            debug!("Queueing {} thumbnails", pending.len());
            let root = root.clone();
            Task::perform(media::thumbnail::generate_thumbnails(pending), move |pairs| {
                Message::ThumbnailsReady(root.clone(), pairs)
            })
        };

        Task::batch([thumbnails, scroll_grid_to_top()])
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let base = column![
            ui::grid::tab_bar(&self.gallery),
            ui::grid::gallery_area(&self.gallery, &self.thumbnails, &self.videos),
        ];

        let mut layers = stack![base];

        if let Some(viewer) = self.gallery.viewer() {
            layers = layers.push(ui::viewer::overlay(
                viewer,
                self.gallery.items().len(),
                &self.videos,
            ));
        } else if self.shows_scroll_to_top() {
            layers = layers.push(ui::grid::scroll_to_top());
        }

        layers.into()
    }

    /// Viewer keys are only listened for while the viewer is open
    fn subscription(&self) -> Subscription<Message> {
        if self.gallery.viewer().is_none() {
            return Subscription::none();
        }

        keyboard::on_key_press(|key, _modifiers| match key.as_ref() {
            Key::Named(Named::Escape) => Some(Message::CloseViewer),
            Key::Named(Named::ArrowLeft) => Some(Message::Navigate(Direction::Previous)),
            Key::Named(Named::ArrowRight) => Some(Message::Navigate(Direction::Next)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn load_task(config: &GalleryConfig) -> Task<Message> {
    let root = config.root.clone();
    Task::perform(load_manifest(config.manifest_path()), move |result| {
        Message::ManifestLoaded(root.clone(), result)
    })
}

fn scroll_grid_to_top() -> Task<Message> {
    scrollable::scroll_to(
        ui::grid::grid_id(),
        scrollable::AbsoluteOffset { x: 0.0, y: 0.0 },
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("media_gallery=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = GalleryConfig::from(&args);

    if args.rebuild_manifest {
        let (_, report) = media::rebuild::rebuild_manifest(&config)?;
        println!(
            "Gallery manifest updated: {} renamed, {} unchanged, {} failed, {} directories created. Saved to {}",
            report.renamed,
            report.kept,
            report.failed,
            report.created_dirs,
            report.manifest_path.display()
        );
        return Ok(());
    }

    iced::application("Media Gallery", MediaGallery::update, MediaGallery::view)
        .theme(MediaGallery::theme)
        .subscription(MediaGallery::subscription)
        .centered()
        .run_with(move || MediaGallery::new(config))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use state::gallery::LoadState;

    fn loaded(json: &str) -> MediaGallery {
        let (mut app, _) = MediaGallery::new(GalleryConfig::default());
        let root = app.gallery.config().root.clone();
        let _ = app.update(Message::ManifestLoaded(
            root,
            Ok(Manifest::from_json(json).unwrap()),
        ));
        app
    }

    #[test]
    fn test_scroll_offset_follows_the_grid_while_viewer_is_open() {
        let mut app = loaded(r#"{"wins": ["1.png", "2.png", "3.png"]}"#);

        let _ = app.update(Message::GridScrolled(800.0));
        assert!(app.shows_scroll_to_top());

        let _ = app.update(Message::OpenViewer(1));
        assert!(!app.shows_scroll_to_top());

        let _ = app.update(Message::GridScrolled(40.0));
        let _ = app.update(Message::CloseViewer);
        assert_eq!(app.scroll_offset, 40.0);
        assert!(!app.shows_scroll_to_top());

        let _ = app.update(Message::GridScrolled(301.0));
        let _ = app.update(Message::ScrollToTop);
        assert!(!app.shows_scroll_to_top());
    }

    #[test]
    fn test_tab_change_rewinds_the_offset() {
        let mut app = loaded(r#"{"wins": ["1.png"], "losses": ["2.png"]}"#);

        let _ = app.update(Message::GridScrolled(900.0));
        let _ = app.update(Message::TabSelected(Tab::from_id("losses")));
        assert_eq!(app.scroll_offset, 0.0);
        assert_eq!(app.gallery.items().len(), 1);
    }

    #[test]
    fn test_results_for_a_previous_root_are_dropped() {
        let (mut app, _) = MediaGallery::new(GalleryConfig::default());
        let previous = PathBuf::from("/srv/previous-gallery");

        let _ = app.update(Message::ManifestLoaded(
            previous.clone(),
            Ok(Manifest::from_json(r#"{"wins": ["1.png"]}"#).unwrap()),
        ));
        assert_eq!(app.gallery.load_state(), &LoadState::Loading);

        let _ = app.update(Message::ThumbnailsReady(
            previous,
            vec![(PathBuf::from("a.png"), PathBuf::from("thumb-a.png"))],
        ));
        assert!(app.thumbnails.is_empty());

        let root = app.gallery.config().root.clone();
        let _ = app.update(Message::ThumbnailsReady(
            root,
            vec![(PathBuf::from("b.png"), PathBuf::from("thumb-b.png"))],
        ));
        assert_eq!(app.thumbnails.len(), 1);
    }
}
