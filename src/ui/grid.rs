use iced::alignment::{Horizontal, Vertical};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, mouse_area, row, scrollable, text, Image};
use iced::{Color, ContentFit, Element, Length, Theme};
use iced_aw::Wrap;
use iced_video_player::VideoPlayer;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::media::video::VideoPlayers;
use crate::state::data::Tab;
use crate::state::gallery::{Gallery, LoadState, MediaView};
use crate::Message;

const TILE_WIDTH: f32 = 240.0;
const TILE_HEIGHT: f32 = 180.0;
const SPACING: f32 = 12.0;

/// Scrollable id of the grid, used by "Top"
pub fn grid_id() -> scrollable::Id {
    scrollable::Id::new("gallery-grid")
}

/// Tab buttons plus the gallery picker
pub fn tab_bar(gallery: &Gallery) -> Element<'_, Message> {
    let tabs: Vec<Element<'_, Message>> = gallery
        .tabs()
        .into_iter()
        .map(|tab| tab_button(tab, gallery.tab()))
        .collect();

    row![
        container(Wrap::with_elements(tabs).spacing(8.0).line_spacing(8.0)).width(Length::Fill),
        button("Open Gallery…")
            .on_press(Message::OpenGallery)
            .padding(8)
            .style(button::secondary),
    ]
    .spacing(SPACING)
    .padding(SPACING)
    .into()
}

fn tab_button<'a>(tab: Tab, active: &Tab) -> Element<'a, Message> {
    let style: fn(&Theme, button::Status) -> button::Style = if tab == *active {
        button::primary
    } else {
        button::secondary
    };

    button(text(tab.label()))
        .on_press(Message::TabSelected(tab))
        .padding([6, 14])
        .style(style)
        .into()
}

/// The gallery area: loading text, load error, empty placeholder or the grid
pub fn gallery_area<'a>(
    gallery: &'a Gallery,
    thumbnails: &'a HashMap<PathBuf, PathBuf>,
    videos: &'a VideoPlayers,
) -> Element<'a, Message> {
    match gallery.load_state() {
        LoadState::Loading => centered_message(text("Loading gallery…").size(24)),
        LoadState::Failed(err) => centered_message(
            column![
                text("Error loading gallery data. Please ensure 'media_manifest.json' exists and is accessible.")
                    .size(24)
                    .color(Color::from_rgb(0.9, 0.25, 0.25)),
                text(err.to_string()).size(14),
            ]
            .spacing(10)
            .align_x(iced::Alignment::Center),
        ),
        LoadState::Ready => match gallery.empty_message() {
            Some(message) => centered_message(text(message).size(24)),
            None => grid(gallery, thumbnails, videos),
        },
    }
}

fn centered_message<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .padding([50, 20])
        .center_x(Length::Fill)
        .into()
}

/// One tile per active item, in active-list order
fn grid<'a>(
    gallery: &'a Gallery,
    thumbnails: &'a HashMap<PathBuf, PathBuf>,
    videos: &'a VideoPlayers,
) -> Element<'a, Message> {
    let tiles: Vec<Element<'a, Message>> = gallery
        .previews()
        .into_iter()
        .enumerate()
        .map(|(index, preview)| tile(index, preview, thumbnails, videos))
        .collect();

    scrollable(
        container(Wrap::with_elements(tiles).spacing(SPACING).line_spacing(SPACING))
            .padding(SPACING)
            .width(Length::Fill),
    )
    .id(grid_id())
    .on_scroll(|viewport| Message::GridScrolled(viewport.absolute_offset().y))
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn tile<'a>(
    index: usize,
    preview: MediaView,
    thumbnails: &HashMap<PathBuf, PathBuf>,
    videos: &'a VideoPlayers,
) -> Element<'a, Message> {
    let area = match preview {
        MediaView::Image { path } => {
            let shown = thumbnails.get(&path).cloned().unwrap_or(path);
            mouse_area(
                tile_frame(
                    Image::new(Handle::from_path(shown))
                        .content_fit(ContentFit::Cover)
                        .width(Length::Fill)
                        .height(Length::Fill),
                ),
            )
        }
        MediaView::Video { path, .. } => {
            // Muted and looping; playback follows the pointer
            let content: Element<'a, Message> = match videos.preview(&path) {
                Some(video) => VideoPlayer::new(video)
                    .content_fit(ContentFit::Cover)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into(),
                None => video_placeholder(&path),
            };
            mouse_area(tile_frame(content))
                .on_enter(Message::PreviewHovered(Some(index)))
                .on_exit(Message::PreviewHovered(None))
        }
        MediaView::Unsupported { file_name } => mouse_area(tile_frame(
            text(format!("Unsupported: {}", file_name))
                .size(18)
                .align_x(Horizontal::Center),
        )),
    };

    area.on_press(Message::OpenViewer(index)).into()
}

/// Shown when a video cannot be opened
fn video_placeholder<'a>(path: &Path) -> Element<'a, Message> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    column![text("▶").size(32), text(file_name).size(14)]
        .spacing(6)
        .align_x(iced::Alignment::Center)
        .into()
}

fn tile_frame<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fixed(TILE_WIDTH))
        .height(Length::Fixed(TILE_HEIGHT))
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .style(container::rounded_box)
        .into()
}

/// The "Top" affordance, pinned to the bottom-right corner
pub fn scroll_to_top<'a>() -> Element<'a, Message> {
    container(
        button("Top")
            .on_press(Message::ScrollToTop)
            .padding([8, 16])
            .style(button::primary),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .padding(24)
    .align_x(Horizontal::Right)
    .align_y(Vertical::Bottom)
    .into()
}
