/// Fullscreen viewer overlay
///
/// The whole overlay is opaque, so no click or wheel event reaches the grid
/// below while it is open. A click on the backdrop closes the viewer; the
/// panel is opaque as well, so clicks inside it never reach the backdrop.
use iced::alignment::{Horizontal, Vertical};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, horizontal_space, mouse_area, opaque, row, text, Image};
use iced::{Background, Color, ContentFit, Element, Length};
use iced_video_player::{Video, VideoPlayer};

use crate::media::video::VideoPlayers;
use crate::state::gallery::{Direction, MediaView, VideoPlayback, Viewer};
use crate::Message;

pub fn overlay<'a>(
    viewer: &'a Viewer,
    count: usize,
    videos: &'a VideoPlayers,
) -> Element<'a, Message> {
    let controls = row![
        button("‹").on_press(Message::Navigate(Direction::Previous)).padding([6, 14]),
        text(format!(
            "{} / {}   {} · {}",
            viewer.index + 1,
            count,
            viewer.item.category,
            viewer.item.file_name
        ))
        .size(16),
        button("›").on_press(Message::Navigate(Direction::Next)).padding([6, 14]),
        horizontal_space(),
        button("✕")
            .on_press(Message::CloseViewer)
            .padding([6, 14])
            .style(button::danger),
    ]
    .spacing(12)
    .align_y(iced::Alignment::Center);

    let body: Element<'a, Message> = match &viewer.content {
        MediaView::Image { path } => Image::new(Handle::from_path(path))
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        MediaView::Video { path, playback } => {
            video_panel(&viewer.item.file_name, *playback, videos.viewer(path))
        }
        // Nothing can be shown enlarged for an unknown type
        MediaView::Unsupported { file_name } => {
            text(format!("Unsupported: {}", file_name)).size(24).into()
        }
    };

    let panel = container(
        column![
            controls,
            container(body)
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(Horizontal::Center)
                .align_y(Vertical::Center),
        ]
        .spacing(12),
    )
    .padding(16)
    .width(Length::Fill)
    .height(Length::Fill)
    .style(container::rounded_box);

    opaque(
        mouse_area(
            container(opaque(panel))
                .padding(40)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.9))),
                    ..container::Style::default()
                }),
        )
        .on_press(Message::CloseViewer),
    )
}

fn video_panel<'a>(
    file_name: &str,
    playback: VideoPlayback,
    video: Option<&'a Video>,
) -> Element<'a, Message> {
    let Some(video) = video else {
        return text(format!("Cannot play {}", file_name)).size(24).into();
    };

    let mut panel = column![VideoPlayer::new(video)
        .content_fit(ContentFit::Contain)
        .width(Length::Fill)
        .height(Length::Fill)]
    .spacing(12)
    .align_x(iced::Alignment::Center);

    if playback.controls {
        panel = panel.push(
            row![
                button(if playback.playing { "Pause" } else { "Play" })
                    .on_press(Message::TogglePlayback)
                    .padding([6, 14]),
                button(if playback.muted { "Unmute" } else { "Mute" })
                    .on_press(Message::ToggleMute)
                    .padding([6, 14]),
            ]
            .spacing(12),
        );
    }

    panel.into()
}
