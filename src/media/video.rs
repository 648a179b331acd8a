/// Video players behind the grid previews and the fullscreen viewer
///
/// The gallery state decides how each video should behave (muted, looping,
/// playing); this module owns the GStreamer-backed players and applies those
/// attributes to them after every update.
use iced_video_player::Video;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{GalleryError, Result};
use crate::state::gallery::{MediaView, VideoPlayback};

#[derive(Default)]
pub struct VideoPlayers {
    previews: HashMap<PathBuf, Video>,
    viewer: Option<(PathBuf, Video)>,
    /// Files that could not be opened keep their text placeholder
    failed: HashSet<PathBuf>,
}

impl VideoPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preview(&self, path: &Path) -> Option<&Video> {
        self.previews.get(path)
    }

    pub fn viewer(&self, path: &Path) -> Option<&Video> {
        self.viewer
            .as_ref()
            .filter(|(open, _)| open == path)
            .map(|(_, video)| video)
    }

    /// Open, drop and steer players so they match what the gallery shows
    pub fn sync(&mut self, previews: &[MediaView], viewer: Option<&MediaView>) {
        let shown: HashSet<&Path> = previews
            .iter()
            .filter_map(|view| match view {
                MediaView::Video { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect();
        self.previews.retain(|path, _| shown.contains(path.as_path()));

        for view in previews {
            let MediaView::Video { path, playback } = view else {
                continue;
            };
            let video = match self.previews.entry(path.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => match open_video(path, &mut self.failed) {
                    Some(video) => entry.insert(video),
                    None => continue,
                },
            };
            apply(video, *playback);
        }

        match viewer {
            Some(MediaView::Video { path, playback }) => {
                if self.viewer.as_ref().map(|(open, _)| open) != Some(path) {
                    self.viewer = open_video(path, &mut self.failed).map(|video| (path.clone(), video));
                }
                if let Some((_, video)) = &mut self.viewer {
                    apply(video, *playback);
                }
            }
            _ => {
                // Dropping the player stops it
                if let Some((path, _)) = self.viewer.take() {
                    debug!("Stopped {}", path.display());
                }
            }
        }
    }
}

fn open_video(path: &Path, failed: &mut HashSet<PathBuf>) -> Option<Video> {
    if failed.contains(path) {
        return None;
    }

    match try_open(path) {
        Ok(video) => {
            debug!("Opened video {}", path.display());
            Some(video)
        }
        Err(err) => {
            warn!("{}", err);
            failed.insert(path.to_path_buf());
            None
        }
    }
}

fn try_open(path: &Path) -> Result<Video> {
    let url = file_url(path).ok_or_else(|| GalleryError::Video {
        path: path.to_path_buf(),
        reason: "not a readable local file".to_string(),
    })?;

    Video::new(&url).map_err(|e| GalleryError::Video {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// `file://` URL of an existing file
pub fn file_url(path: &Path) -> Option<Url> {
    let absolute = path.canonicalize().ok()?;
    Url::from_file_path(absolute).ok()
}

fn apply(video: &mut Video, playback: VideoPlayback) {
    if video.muted() != playback.muted {
        video.set_muted(playback.muted);
    }
    if video.looping() != playback.looping {
        video.set_looping(playback.looping);
    }

    let paused = !playback.playing;
    if video.paused() == paused {
        return;
    }
    video.set_paused(paused);

    if paused && playback.rewinds_on_pause() {
        if let Err(err) = video.seek(Duration::ZERO, false) {
            warn!("Could not rewind video: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_needs_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("1.mp4");
        std::fs::write(&clip, b"").unwrap();

        let url = file_url(&clip).unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/1.mp4"));

        assert!(file_url(&dir.path().join("missing.mp4")).is_none());
    }

    #[test]
    fn test_unopenable_videos_keep_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.webm");
        let previews = vec![
            MediaView::Video {
                path: path.clone(),
                playback: VideoPlayback::preview(),
            },
            MediaView::Unsupported {
                file_name: "notes.txt".into(),
            },
        ];
        let viewer = MediaView::Video {
            path: path.clone(),
            playback: VideoPlayback::fullscreen(),
        };

        let mut players = VideoPlayers::new();
        players.sync(&previews, Some(&viewer));

        assert!(players.preview(&path).is_none());
        assert!(players.viewer(&path).is_none());
        assert!(players.failed.contains(&path));

        players.sync(&[], None);
        assert!(players.previews.is_empty());
    }
}
