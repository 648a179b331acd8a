/// Media file handling
///
/// This module handles:
/// - Generating and caching grid thumbnails
/// - Renumbering media files and rewriting the manifest
/// - Playing video previews and the fullscreen video

pub mod rebuild;
pub mod thumbnail;
pub mod video;
